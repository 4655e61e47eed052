//! Frame-time CSV export
//!
//! ```text
//! game,launcher
//! 17,16
//! 16,33
//! 50,
//! ```
//!
//! Header is the model titles. Row `i` holds the interval before commit
//! `i + 1` of every model, in whole milliseconds. Models with fewer frames
//! leave trailing cells empty.

#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::io::Write;

use log::info;

use crate::analysis::{commit_series, frame_deltas};
use crate::domain::ExportError;
use crate::trace_data::Model;

/// Quote a CSV field when it needs it.
fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Microseconds to whole milliseconds, half away from zero.
fn round_ms(delta_us: u64) -> u64 {
    (delta_us as f64 / 1000.0).round() as u64
}

/// Collects per-model frame times and writes them as CSV.
#[derive(Debug, Default)]
pub struct FrameTimesExporter {
    columns: Vec<(String, Vec<u64>)>,
}

impl FrameTimesExporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column with the commit intervals of `model`.
    pub fn add_model(&mut self, model: &Model) {
        let deltas = frame_deltas(&commit_series(model)).into_iter().map(|d| round_ms(d.delta)).collect();
        self.columns.push((model.title().to_string(), deltas));
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(|(_, deltas)| deltas.len()).max().unwrap_or(0)
    }

    /// Write the CSV to `writer`.
    ///
    /// # Errors
    /// Returns [`ExportError::NoModels`] when no model was added, or an I/O
    /// error if writing fails.
    pub fn export<W: Write>(&self, mut writer: W) -> Result<(), ExportError> {
        if self.columns.is_empty() {
            return Err(ExportError::NoModels);
        }
        let header: Vec<String> = self.columns.iter().map(|(title, _)| csv_field(title)).collect();
        writeln!(writer, "{}", header.join(","))?;

        let rows = self.row_count();
        for row in 0..rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .map(|(_, deltas)| deltas.get(row).map(u64::to_string).unwrap_or_default())
                .collect();
            writeln!(writer, "{}", cells.join(","))?;
        }
        writer.flush()?;
        info!("Exported {rows} frame times for {} models", self.columns.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(title: &str, commits: &[u64]) -> Model {
        let events: Vec<String> = commits.iter().map(|t| format!("[206, {t}]")).collect();
        let json = format!(
            r#"{{"information": {{"title": "{title}", "duration": 1000000}},
                "chrome": {{"global_events": [{}]}}}}"#,
            events.join(",")
        );
        Model::from_json_str(&json).unwrap()
    }

    fn export(exporter: &FrameTimesExporter) -> String {
        let mut buffer = Vec::new();
        exporter.export(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_no_models_is_an_error() {
        let exporter = FrameTimesExporter::new();
        assert!(matches!(exporter.export(Vec::new()), Err(ExportError::NoModels)));
    }

    #[test]
    fn test_columns_are_rounded_and_padded() {
        let mut exporter = FrameTimesExporter::new();
        exporter.add_model(&model("game", &[0, 16_667, 33_334, 83_334]));
        exporter.add_model(&model("launcher", &[0, 16_400]));
        assert_eq!(export(&exporter), "game,launcher\n17,16\n17,\n50,\n");
    }

    #[test]
    fn test_header_only_without_frames() {
        let mut exporter = FrameTimesExporter::new();
        exporter.add_model(&model("idle", &[]));
        assert_eq!(exporter.row_count(), 0);
        assert_eq!(export(&exporter), "idle\n");
    }

    #[test]
    fn test_titles_are_quoted() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("plain"), "plain");
    }
}
