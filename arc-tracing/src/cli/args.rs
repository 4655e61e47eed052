//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use crate::config::ViewConfig;

#[derive(Parser, Debug)]
#[command(
    name = "arc-tracing",
    about = "Analyze ARC graphics traces: frame rate, jank, CPU and system activity",
    after_help = "\
EXAMPLES:
    arc-tracing game.json                              Interactive timeline viewer
    arc-tracing a.json b.json --zoom-level 3           Compare two traces at 25 µs/px
    arc-tracing game.json --headless --svg out.svg     Render the overview without a terminal
    arc-tracing *.json --headless --export-frame-times frames.csv"
)]
pub struct Args {
    /// Trace files to load (JSON)
    #[arg(value_name = "TRACE", required = true)]
    pub traces: Vec<PathBuf>,

    /// Viewer configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Initial zoom level, index into the resolution table (0 = 2.5 µs/px)
    #[arg(short, long)]
    pub zoom_level: Option<usize>,

    /// Layout width in pixels
    #[arg(short, long)]
    pub window_width: Option<f64>,

    /// Export per-model frame times to a CSV file
    #[arg(long, value_name = "FILE")]
    pub export_frame_times: Option<PathBuf>,

    /// Render the overview to an SVG file
    #[arg(long, value_name = "FILE")]
    pub svg: Option<PathBuf>,

    /// Run without the terminal viewer (requires an export)
    #[arg(long)]
    pub headless: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Apply flag overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut ViewConfig) {
        if let Some(level) = self.zoom_level {
            config.zoom_level = level;
        }
        if let Some(width) = self.window_width {
            config.window_width = width;
        }
    }

    #[must_use]
    pub fn has_export(&self) -> bool {
        self.export_frame_times.is_some() || self.svg.is_some()
    }
}
