use arc_tracing::domain::ExportError;
use arc_tracing::export::FrameTimesExporter;
use arc_tracing::trace_data::Model;
use std::io::Write;

fn fixture() -> Model {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample_trace.json");
    Model::from_file(path).expect("Failed to load fixture")
}

#[test]
fn test_export_fixture_frame_times() {
    let mut exporter = FrameTimesExporter::new();
    exporter.add_model(&fixture());

    let mut buffer = Vec::new();
    exporter.export(&mut buffer).expect("Failed to export frame times");

    let csv = String::from_utf8(buffer).expect("Invalid UTF-8");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "sample-game");
    assert_eq!(&lines[1..], ["17", "17", "17", "17", "33", "17", "17", "17", "17", "17"]);
}

#[test]
fn test_export_pads_shorter_models() {
    let short = Model::from_json_str(
        r#"{"information": {"title": "short"}, "chrome": {"global_events": [[206, 0], [206, 40000]]}}"#,
    )
    .expect("Failed to parse trace");

    let mut exporter = FrameTimesExporter::new();
    exporter.add_model(&short);
    exporter.add_model(&fixture());

    let mut buffer = Vec::new();
    exporter.export(&mut buffer).expect("Failed to export frame times");
    let csv = String::from_utf8(buffer).expect("Invalid UTF-8");
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 11);
    assert_eq!(lines[0], "short,sample-game");
    assert_eq!(lines[1], "40,17");
    assert_eq!(lines[2], ",17");
    assert_eq!(lines[10], ",17");
}

#[test]
fn test_export_to_file() {
    let mut exporter = FrameTimesExporter::new();
    exporter.add_model(&fixture());

    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    exporter.export(file.as_file_mut()).expect("Failed to export frame times");
    file.flush().expect("Failed to flush");

    let written = std::fs::read_to_string(file.path()).expect("Failed to read export");
    assert!(written.starts_with("sample-game\n17\n"));
}

#[test]
fn test_export_without_models_fails() {
    let exporter = FrameTimesExporter::new();
    let err = exporter.export(Vec::new()).expect_err("Export without models must fail");
    assert!(matches!(err, ExportError::NoModels));
    assert_eq!(err.to_string(), "No models loaded, nothing to export");
}
