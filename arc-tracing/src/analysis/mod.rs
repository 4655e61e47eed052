//! Metric derivation for loaded traces
//!
//! Pure functions over [`EventSeries`](crate::series::EventSeries),
//! separated from layout and the terminal viewer. [`ModelMetrics`] bundles
//! the per-model numbers shown in the summary panel.

#![allow(clippy::cast_precision_loss)]

pub mod fps;
pub mod histogram;
pub mod power;
pub mod quality;

use arc_tracing_common::{GraphicsEventType, ValueEventType};
use std::fmt;

use crate::config::ViewConfig;
use crate::series::EventSeries;
use crate::trace_data::Model;

pub use fps::{calculate_fps, create_fps_events, frame_deltas, FrameDelta, FPS_EVENT_KIND};
pub use histogram::{basket_index, basket_label, FpsHistogram, HistogramMode, BASKET_LOWER_BOUNDS};
pub use power::{average_power, NO_POWER_DATA};
pub use quality::{frame_timing_classes, render_quality, FrameTiming, RenderQuality};

/// Surface commits of the app.
#[must_use]
pub fn commit_series(model: &Model) -> EventSeries {
    EventSeries::single(model.graphics_events.clone(), GraphicsEventType::ExoSurfaceCommit.id())
}

/// Frames Chrome finished swapping.
#[must_use]
pub fn swap_series(model: &Model) -> EventSeries {
    EventSeries::single(model.graphics_events.clone(), GraphicsEventType::ChromeOSSwapDone.id())
}

/// App-side jank markers.
#[must_use]
pub fn app_jank_series(model: &Model) -> EventSeries {
    EventSeries::single(
        model.graphics_events.clone(),
        GraphicsEventType::ExoSurfaceCommitJank.id(),
    )
}

/// Chrome-side jank markers (composition, perceived and swap jank).
#[must_use]
pub fn chrome_jank_series(model: &Model) -> EventSeries {
    EventSeries::new(
        model.graphics_events.clone(),
        GraphicsEventType::ChromeOSJank.id(),
        GraphicsEventType::ChromeOSSwapJank.id(),
    )
}

/// Counter samples of one value type.
#[must_use]
pub fn value_series(model: &Model, kind: ValueEventType) -> EventSeries {
    EventSeries::single(model.system.memory.clone(), kind.id())
}

/// Number of filtered events, for jank marker series.
#[must_use]
pub fn jank_count(series: &EventSeries) -> usize {
    series.count()
}

/// Summary numbers for one model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMetrics {
    pub commit_fps: f64,
    pub swap_fps: f64,
    pub app_janks: usize,
    pub chrome_janks: usize,
    pub render_quality: RenderQuality,
    pub histogram: FpsHistogram,
    /// Watts, or [`NO_POWER_DATA`].
    pub cpu_power: f64,
    pub gpu_power: f64,
    pub memory_power: f64,
}

impl ModelMetrics {
    #[must_use]
    pub fn compute(model: &Model, config: &ViewConfig) -> Self {
        let duration = model.duration();
        let commits = commit_series(model);
        let deltas = frame_deltas(&commits);
        let delta_values: Vec<u64> = deltas.iter().map(|d| d.delta).collect();

        Self {
            commit_fps: calculate_fps(&commits, duration),
            swap_fps: calculate_fps(&swap_series(model), duration),
            app_janks: jank_count(&app_jank_series(model)),
            chrome_janks: jank_count(&chrome_jank_series(model)),
            render_quality: render_quality(&delta_values, config.target_frame_time_us),
            histogram: FpsHistogram::from_deltas(&deltas),
            cpu_power: average_power(&value_series(model, ValueEventType::CpuPower)),
            gpu_power: average_power(&value_series(model, ValueEventType::GpuPower)),
            memory_power: average_power(&value_series(model, ValueEventType::MemoryPower)),
        }
    }
}

fn fmt_power(f: &mut fmt::Formatter<'_>, label: &str, watts: f64) -> fmt::Result {
    if watts < 0.0 {
        write!(f, "  {label}: n/a")
    } else {
        write!(f, "  {label}: {watts:.2} W")
    }
}

impl fmt::Display for ModelMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FPS {:.2} (swap {:.2})  janks {}/{}  quality {:.1}%  jitter {:.1} ms",
            self.commit_fps,
            self.swap_fps,
            self.app_janks,
            self.chrome_janks,
            self.render_quality.quality,
            self.render_quality.jitter / 1000.0
        )?;
        fmt_power(f, "CPU", self.cpu_power)?;
        fmt_power(f, "GPU", self.gpu_power)?;
        fmt_power(f, "memory", self.memory_power)
    }
}
