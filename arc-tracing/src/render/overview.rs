//! Session overview: every panel of the loaded models, stacked
//!
//! ```text
//! FPS               smoothed commit rate per model, jank circles,
//!                   one frame-timing strip per model
//! FPS histogram     14 baskets, one bar per model, count or time
//! CPU <title>       one band per core (click opens the CPU detail view)
//! System <title>    memory, GPU, CPU and power value charts
//! Summary           metrics line per model
//! ```
//!
//! Each panel is its own [`EventBands`] laid out from y = 0; the overview
//! only records where each panel starts and offsets them when composing.

#![allow(clippy::cast_precision_loss)]

use std::sync::Arc;

use arc_tracing_common::ValueEventType;
use log::debug;

use crate::analysis::{
    app_jank_series, basket_label, chrome_jank_series, commit_series, create_fps_events,
    frame_deltas, frame_timing_classes, value_series, FrameTiming, HistogramMode, ModelMetrics,
    BASKET_LOWER_BOUNDS, FPS_EVENT_KIND,
};
use crate::attributes::{BarAttribute, BarPalette, ChartAttributes};
use crate::config::ViewConfig;
use crate::drilldown::CpuEventBands;
use crate::render::bands::{BandView, EventBands, GlobalRender, FONT_SIZE, LINE_HEIGHT, VERTICAL_GAP};
use crate::render::surface::{DrawList, DrawingSurface, TextAnchor};
use crate::render::tooltip::Tooltip;
use crate::series::EventSeries;
use crate::trace_data::{Event, Model};

// ============================================================================
// Layout constants
// ============================================================================

/// Rows above each panel for its title.
pub const TITLE_HEIGHT: f64 = 18.0;
const PANEL_GAP: f64 = 8.0;

const FPS_CHART_HEIGHT: f64 = 80.0;
/// Upper bound of the FPS chart. Grid lines fall on every 10 FPS.
const MAX_FPS: f64 = 70.0;
const FPS_GRID_LINES: usize = 6;
const APP_JANK_Y: f64 = 0.25;
const CHROME_JANK_Y: f64 = 0.75;
const TIMING_STRIP_HEIGHT: f64 = 6.0;
const TIMING_STRIP_PADDING: f64 = 2.0;

/// Event type of per-frame timing classes. Outside every producer catalogue.
const FRAME_TIMING_KIND: u32 = 20_001;

const HISTOGRAM_HEIGHT: f64 = 100.0;
const BASKET_WIDTH: f64 = 48.0;
const BASKET_PADDING: f64 = 4.0;
const HISTOGRAM_LABEL_HEIGHT: f64 = 16.0;
const HISTOGRAM_TOOLTIP_WIDTH: f64 = 180.0;

const VALUE_CHART_HEIGHT: f64 = 40.0;
const VALUE_CHART_PADDING: f64 = 4.0;
const CHART_LABEL_X: f64 = 2.0;

const SWATCH_SIZE: f64 = 10.0;
const SUMMARY_TEXT_X: f64 = 18.0;

/// Value charts of the system panel, each listing the series drawn into it.
const SYSTEM_CHARTS: [(&str, &[ValueEventType]); 4] = [
    ("memory", &[ValueEventType::MemUsed, ValueEventType::GemSize]),
    ("GPU", &[ValueEventType::GpuFrequency]),
    ("CPU", &[ValueEventType::CpuFrequency, ValueEventType::CpuTemperature]),
    (
        "power",
        &[
            ValueEventType::CpuPower,
            ValueEventType::GpuPower,
            ValueEventType::MemoryPower,
            ValueEventType::PackagePowerConstraint,
        ],
    ),
];

/// One loaded model as the overview needs it.
#[derive(Debug, Clone, Copy)]
pub struct OverviewModel<'a> {
    pub model: &'a Arc<Model>,
    pub color: &'a str,
    pub metrics: &'a ModelMetrics,
}

/// Content of a panel.
#[derive(Debug, Clone)]
pub enum PanelView {
    Bands(EventBands),
    Cpu(CpuEventBands),
}

impl BandView for PanelView {
    fn event_bands(&self) -> &EventBands {
        match self {
            Self::Bands(bands) => bands,
            Self::Cpu(cpu) => cpu.event_bands(),
        }
    }

    fn can_show_detailed_info(&self) -> bool {
        match self {
            Self::Bands(bands) => bands.can_show_detailed_info(),
            Self::Cpu(cpu) => cpu.can_show_detailed_info(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Panel {
    pub title: String,
    /// Top of the title row.
    pub top: f64,
    pub view: PanelView,
}

impl Panel {
    /// Top of the panel content, below the title.
    #[must_use]
    pub fn content_top(&self) -> f64 {
        self.top + TITLE_HEIGHT
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.content_top() + self.view.event_bands().height()
    }
}

/// All panels of a session at one zoom level.
#[derive(Debug, Clone, Default)]
pub struct Overview {
    panels: Vec<Panel>,
    width: f64,
    height: f64,
}

impl Overview {
    /// Lay out every panel for `models` at `resolution` µs/px.
    #[must_use]
    pub fn build(
        models: &[OverviewModel<'_>],
        resolution: f64,
        config: &ViewConfig,
        mode: HistogramMode,
    ) -> Self {
        let mut overview = Self::default();
        if models.is_empty() {
            return overview;
        }
        let duration = models.iter().map(|m| m.model.duration()).max().unwrap_or(0);

        overview.push("FPS".into(), PanelView::Bands(fps_panel(models, resolution, duration, config)));
        overview.push(
            format!("FPS histogram ({mode})"),
            PanelView::Bands(histogram_panel(models, mode)),
        );
        for m in models {
            let cpu = CpuEventBands::new(Arc::clone(m.model), resolution, 0, duration);
            if !cpu.event_bands().bands().is_empty() {
                overview.push(format!("CPU {}", m.model.title()), PanelView::Cpu(cpu));
            }
        }
        for m in models {
            let system = system_panel(m.model, resolution, duration);
            if system.height() > 0.0 {
                overview.push(format!("System {}", m.model.title()), PanelView::Bands(system));
            }
        }
        overview.push("Summary".into(), PanelView::Bands(summary_panel(models)));

        debug!(
            "Overview of {} models: {} panels, {:.0}x{:.0} px",
            models.len(),
            overview.panels.len(),
            overview.width,
            overview.height
        );
        overview
    }

    fn push(&mut self, title: String, view: PanelView) {
        let top = if self.panels.is_empty() { 0.0 } else { self.height + PANEL_GAP };
        let panel = Panel { title, top, view };
        self.width = self.width.max(panel.view.event_bands().width());
        self.height = panel.bottom();
        self.panels.push(panel);
    }

    #[must_use]
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Index of the panel whose content covers `y`.
    #[must_use]
    pub fn panel_at(&self, y: f64) -> Option<usize> {
        self.panels.iter().position(|p| p.content_top() <= y && p.bottom() > y)
    }

    /// Tooltip for overview pixel `(x, y)`.
    #[must_use]
    pub fn tooltip_at(&self, x: f64, y: f64) -> Option<Tooltip> {
        let panel = &self.panels[self.panel_at(y)?];
        panel.view.tooltip_at(x, y - panel.content_top())
    }

    /// CPU bands of the panel at `index`, if it is a CPU panel.
    pub fn cpu_bands_mut(&mut self, index: usize) -> Option<&mut CpuEventBands> {
        match &mut self.panels.get_mut(index)?.view {
            PanelView::Cpu(cpu) => Some(cpu),
            PanelView::Bands(_) => None,
        }
    }

    /// The CPU panel currently highlighting the range of a detail view.
    pub fn selected_cpu_bands_mut(&mut self) -> Option<&mut CpuEventBands> {
        self.panels.iter_mut().find_map(|p| match &mut p.view {
            PanelView::Cpu(cpu) if cpu.selection().is_some() => Some(cpu),
            _ => None,
        })
    }

    /// Every panel with its title, offset into place.
    #[must_use]
    pub fn draw_list(&self) -> DrawList {
        let mut draw = DrawList::new();
        for panel in &self.panels {
            draw.add_text(CHART_LABEL_X, panel.top + FONT_SIZE, FONT_SIZE, &panel.title, TextAnchor::Start);
            let top = panel.content_top();
            draw.append_translated(panel.view.event_bands().draw_list(), 0.0, top);
            if let PanelView::Cpu(cpu) = &panel.view {
                if let Some(selection) = cpu.selection_rect() {
                    draw.push(selection.translated(0.0, top));
                }
            }
        }
        draw
    }
}

// ============================================================================
// Panels
// ============================================================================

fn frame_timing_palette() -> BarPalette {
    let entry = |timing: FrameTiming| {
        (timing as i64, BarAttribute { color: timing.color(), name: timing.name() })
    };
    BarPalette::new(vec![
        entry(FrameTiming::OnTime),
        entry(FrameTiming::Late),
        entry(FrameTiming::Janky),
    ])
}

fn fps_panel(
    models: &[OverviewModel<'_>],
    resolution: f64,
    duration: u64,
    config: &ViewConfig,
) -> EventBands {
    let mut bands = EventBands::with_chart(resolution, duration, FPS_CHART_HEIGHT, FPS_GRID_LINES);
    for m in models {
        let fps = create_fps_events(
            &commit_series(m.model),
            m.model.duration(),
            config.fps_window_us,
            config.fps_step_us,
        );
        let attributes = ChartAttributes::fixed(m.color, format!("FPS {}", m.model.title()), 0.0, MAX_FPS);
        bands.add_chart_sources(&[EventSeries::single(fps.into(), FPS_EVENT_KIND)], true, Some(&attributes));
    }
    // Circles are placed relative to the FPS chart, before the strips grow the panel.
    for m in models {
        bands.add_global(app_jank_series(m.model), GlobalRender::Circle { y: APP_JANK_Y }, Some(m.color));
        bands.add_global(
            chrome_jank_series(m.model),
            GlobalRender::Circle { y: CHROME_JANK_Y },
            Some(m.color),
        );
    }
    for m in models {
        let deltas = frame_deltas(&commit_series(m.model));
        let timings: Vec<Event> = frame_timing_classes(&deltas, config.target_frame_time_us)
            .into_iter()
            .map(|(timestamp, timing)| {
                Event::with_value(FRAME_TIMING_KIND, timestamp, f64::from(timing as u8))
            })
            .collect();
        let top = bands.next_y_offset();
        bands.add_chart(TIMING_STRIP_HEIGHT, TIMING_STRIP_PADDING);
        bands.add_bar_source(
            EventSeries::single(timings.into(), FRAME_TIMING_KIND),
            frame_timing_palette(),
            top,
            TIMING_STRIP_HEIGHT,
        );
    }
    bands
}

fn histogram_panel(models: &[OverviewModel<'_>], mode: HistogramMode) -> EventBands {
    let mut bands = EventBands::new(1.0, 0, 0);
    bands.set_width(BASKET_LOWER_BOUNDS.len() as f64 * BASKET_WIDTH);
    bands.add_chart(HISTOGRAM_HEIGHT + HISTOGRAM_LABEL_HEIGHT, 0.0);

    let percentages: Vec<Vec<f64>> =
        models.iter().map(|m| m.metrics.histogram.percentages(mode)).collect();
    let bar_width = (BASKET_WIDTH - 2.0 * BASKET_PADDING) / models.len().max(1) as f64;
    // Title line plus the two lines of the basket tooltip.
    let tooltip_height = 2.0 * VERTICAL_GAP + 3.0 * FONT_SIZE;

    for basket in 0..BASKET_LOWER_BOUNDS.len() {
        let basket_x = basket as f64 * BASKET_WIDTH + BASKET_PADDING;
        for (j, m) in models.iter().enumerate() {
            let x = basket_x + j as f64 * bar_width;
            let height = HISTOGRAM_HEIGHT * percentages[j][basket] / 100.0;
            bands.add_chart_bar(x, HISTOGRAM_HEIGHT - height, bar_width, height, m.color);
            bands.add_chart_tooltip(
                x,
                0.0,
                bar_width,
                HISTOGRAM_HEIGHT,
                format!("{}\n{}", m.model.title(), m.metrics.histogram.tooltip(basket, mode)),
                HISTOGRAM_TOOLTIP_WIDTH,
                tooltip_height,
            );
        }
        bands.add_chart_text(
            &basket_label(basket),
            basket as f64 * BASKET_WIDTH + BASKET_WIDTH / 2.0,
            HISTOGRAM_HEIGHT + FONT_SIZE,
            TextAnchor::Middle,
        );
    }
    bands
}

fn system_panel(model: &Model, resolution: f64, duration: u64) -> EventBands {
    let mut bands = EventBands::new(resolution, 0, duration);
    bands.set_width(bands.timestamp_to_offset(duration as f64));
    for (label, kinds) in SYSTEM_CHARTS {
        let sources: Vec<EventSeries> = kinds
            .iter()
            .map(|&kind| value_series(model, kind))
            .filter(|s| s.count() > 0)
            .collect();
        if sources.is_empty() {
            continue;
        }
        let top = bands.next_y_offset();
        bands.add_chart(VALUE_CHART_HEIGHT, VALUE_CHART_PADDING);
        // Separate calls so each series keeps its own range and color.
        for source in &sources {
            bands.add_chart_sources(std::slice::from_ref(source), false, None);
        }
        bands.add_chart_text(label, CHART_LABEL_X, top + FONT_SIZE, TextAnchor::Start);
    }
    bands
}

fn summary_panel(models: &[OverviewModel<'_>]) -> EventBands {
    let mut bands = EventBands::new(1.0, 0, 0);
    for m in models {
        let y = bands.next_y_offset();
        let swatch_y = y + (LINE_HEIGHT - SWATCH_SIZE) / 2.0;
        bands.surface().add_rect(CHART_LABEL_X, swatch_y, SWATCH_SIZE, SWATCH_SIZE, m.color, None);
        bands.add_chart_text(
            &format!("{}: {}", m.model.title(), m.metrics),
            SUMMARY_TEXT_X,
            y + FONT_SIZE,
            TextAnchor::Start,
        );
        bands.update_height(LINE_HEIGHT, 0.0);
    }
    bands
}
