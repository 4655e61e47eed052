use arc_tracing::analysis::NO_POWER_DATA;
use arc_tracing::config::ViewConfig;
use arc_tracing::render::svg::write_svg;
use arc_tracing::render::{BandView, DrawCommand};
use arc_tracing::session::{ClickTarget, Key, TracingSession, ViewState};
use arc_tracing::trace_data::Model;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample_trace.json");

fn session() -> TracingSession {
    let mut session = TracingSession::new(ViewConfig::default());
    session.add_model(Model::from_file(FIXTURE).expect("Failed to load fixture"));
    session
}

#[test]
fn test_fixture_loads_merged_and_sorted() {
    let model = Model::from_file(FIXTURE).expect("Failed to load fixture");

    assert_eq!(model.title(), "sample-game");
    assert_eq!(model.duration(), 200_000);
    // 13 global, 10 Chrome buffer, 8 view buffer and 1 view global event.
    assert_eq!(model.graphics_events.len(), 32);
    assert!(model.graphics_events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(model.views.len(), 1);
    assert_eq!(model.views[0].activity, "org.chromium.arc.SampleGame");
    assert_eq!(model.system.cpu.len(), 2);
    assert_eq!(model.thread(1201).map(|t| t.pid), Some(1200));
}

#[test]
fn test_fixture_metrics() {
    let session = session();
    let metrics = &session.models()[0].metrics;

    assert!((metrics.commit_fps - 55.0).abs() < 1e-9);
    assert!((metrics.swap_fps - 25.0).abs() < 1e-9);
    assert_eq!(metrics.app_janks, 1);
    assert_eq!(metrics.chrome_janks, 2);
    assert!((metrics.cpu_power - 3.0).abs() < 1e-9);
    assert_eq!(metrics.gpu_power, NO_POWER_DATA);
    assert_eq!(metrics.histogram.total_count(), 10);
    assert!(metrics.to_string().starts_with("FPS 55.00 (swap 25.00)"));
}

#[test]
fn test_overview_panels() {
    let mut session = session();
    let titles: Vec<String> = session.layout().panels().iter().map(|p| p.title.clone()).collect();
    assert_eq!(
        titles,
        ["FPS", "FPS histogram (count)", "CPU sample-game", "System sample-game", "Summary"]
    );

    session.toggle_histogram_mode();
    assert!(session.is_dirty());
    assert_eq!(session.layout().panels()[1].title, "FPS histogram (time)");
}

#[test]
fn test_cpu_drill_down_round_trip() {
    let mut session = session();
    let cpu = session.layout().panels()[2].clone();

    // 500 px at 100 µs/px is t = 50 ms.
    session.click(ClickTarget::Overview { x: 500.0, y: cpu.content_top() + 4.0 });
    assert_eq!(session.view_state(), ViewState::DrillDown);

    let view = session.detailed_view().expect("Detail view should be open");
    assert_eq!(view.center(), 50_000);
    assert!(view.min_timestamp() < 50_000 && view.max_timestamp() > 50_000);
    assert!(view.title().starts_with("CPU view. 2/2 active processes/threads."));
    let texts: Vec<&str> = view
        .event_bands()
        .draw_list()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert!(texts.contains(&"RenderThread"));
    assert!(texts.iter().any(|t| t.starts_with("surfaceflinger")));

    // The overview highlights the detail window.
    let highlighted = session
        .draw_list()
        .iter()
        .any(|c| matches!(c, DrawCommand::Rect { opacity: Some(o), .. } if (*o - 0.1).abs() < 1e-9));
    assert!(highlighted);

    session.click(ClickTarget::Detail);
    assert_eq!(session.view_state(), ViewState::DrillDown);

    assert!(session.handle_key(Key::Escape));
    assert_eq!(session.view_state(), ViewState::Overview);
}

#[test]
fn test_zoom_rebuilds_layout() {
    let mut session = session();
    let width = session.layout().width();

    assert!(session.handle_key(Key::Char('s')));
    assert!(session.is_dirty());
    let zoomed_out = session.layout().width();
    assert!(zoomed_out < width);
}

#[test]
fn test_svg_export_of_overview() {
    let mut session = session();
    let (width, height) = {
        let overview = session.layout();
        (overview.width(), overview.height())
    };
    let draw = session.draw_list();

    let mut buffer = Vec::new();
    write_svg(&mut buffer, &draw, width, height).expect("Failed to write SVG");
    let svg = String::from_utf8(buffer).expect("Invalid UTF-8");

    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(svg.contains(">CPU sample-game</text>"));
    assert!(svg.contains("<polyline"));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn test_remove_model_empties_layout() {
    let mut session = session();
    let id = session.models()[0].id;
    assert!(session.remove_model(id));
    assert!(!session.remove_model(id));
    assert!(session.layout().panels().is_empty());
}
