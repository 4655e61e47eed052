//! Zoomed per-thread CPU view opened from a CPU overview band
//!
//! The overview shows one band per core. Clicking it rebuilds, for a window
//! around the clicked time, one idle/active series per thread from the
//! per-core `Active` samples, then lays them out grouped by process with
//! name and usage columns on the left:
//!
//! ```text
//! │ name         │ usage │ bands at resolution / zoom_factor          │
//! │ app <1234>   │ 41.20 │ ████  ███     ██████                       │
//! │   RenderThr  │ 30.05 │   ██   █       ████                        │
//! ├──────────────┴───────┴────────────────────────────────────────────┤
//! ```

#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_tracing_common::{CpuEventType, GraphicsEventType};
use log::{debug, info};

use crate::config::ViewConfig;
use crate::domain::{Pid, Tid};
use crate::render::{BandView, DrawCommand, DrawingSurface, EventBands, GlobalRender, TextAnchor};
use crate::series::{Direction, EventSeries};
use crate::trace_data::{Event, Model};

// ============================================================================
// Layout constants
// ============================================================================

pub const COLUMN_NAME_WIDTH: f64 = 130.0;
pub const COLUMN_USAGE_WIDTH: f64 = 40.0;
pub const COLUMNS_WIDTH: f64 = COLUMN_NAME_WIDTH + COLUMN_USAGE_WIDTH;
const SCROLL_BAR_WIDTH: f64 = 3.0;
const CPU_BAND_HEIGHT: f64 = 14.0;
const PROCESS_INFO_HEIGHT: f64 = 14.0;
const PADDING: f64 = 2.0;
const PROCESS_INFO_PADDING: f64 = 2.0;
const THREAD_INFO_PADDING: f64 = 12.0;
const CPU_USAGE_PADDING: f64 = 2.0;
const SEPARATOR_PADDING: f64 = 2.0;

/// Overview band geometry.
const OVERVIEW_BAND_HEIGHT: f64 = 6.0;
const OVERVIEW_BAND_PADDING: f64 = 2.0;

const COLUMN_LINE_COLOR: &str = "#888";

/// Process name when the pid has no thread entry of its own.
const UNKNOWN_PROCESS: &str = "Others";

// ============================================================================
// Overview bands
// ============================================================================

/// One band per CPU core, idle/active. The only panel that supports a
/// drill-down.
#[derive(Debug, Clone)]
pub struct CpuEventBands {
    bands: EventBands,
    model: Arc<Model>,
    /// Time range of the open detail view, highlighted on the overview.
    selection: Option<(u64, u64)>,
}

impl CpuEventBands {
    #[must_use]
    pub fn new(model: Arc<Model>, resolution: f64, min_timestamp: u64, max_timestamp: u64) -> Self {
        let mut bands = EventBands::new(resolution, min_timestamp, max_timestamp);
        bands.set_width(bands.timestamp_to_offset(max_timestamp as f64));
        for core in &model.system.cpu {
            bands.add_band(
                EventSeries::new(
                    Arc::clone(core),
                    CpuEventType::IdleIn.id(),
                    CpuEventType::IdleOut.id(),
                ),
                OVERVIEW_BAND_HEIGHT,
                OVERVIEW_BAND_PADDING,
            );
        }
        Self { bands, model, selection: None }
    }

    #[must_use]
    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    #[must_use]
    pub fn selection(&self) -> Option<(u64, u64)> {
        self.selection
    }

    /// Highlight over the range of the open detail view, if any.
    #[must_use]
    pub fn selection_rect(&self) -> Option<DrawCommand> {
        self.selection.map(|(from, to)| self.bands.selection_rect(from, to))
    }

    /// Build the detail view for a click at pixel `x` and highlight its
    /// range here. The highlight stays until [`CpuDetailedView::discard`].
    pub fn show_detailed_info(&mut self, x: f64, config: &ViewConfig) -> CpuDetailedView {
        let center = self.bands.offset_to_time(x - self.bands.band_offset_x()).max(0.0).round() as u64;
        let view = CpuDetailedView::create(&self.model, self.bands.resolution(), center, config);
        self.selection = Some((view.min_timestamp, view.max_timestamp));
        view
    }
}

impl BandView for CpuEventBands {
    fn event_bands(&self) -> &EventBands {
        &self.bands
    }

    fn can_show_detailed_info(&self) -> bool {
        true
    }
}

// ============================================================================
// Detail view
// ============================================================================

/// Synthetic idle/active events of one thread inside the window.
#[derive(Debug, Default)]
struct ThreadActivity {
    tid: u32,
    events: Vec<Event>,
    total_time: u64,
}

/// Threads of one process, in the order they were first seen.
#[derive(Debug, Default)]
struct ProcessActivity {
    pid: u32,
    threads: Vec<ThreadActivity>,
    total_time: u64,
}

fn add_activity_time(per_tid: &mut BTreeMap<u32, ThreadActivity>, tid: u32, from: u64, to: u64) {
    if Tid(tid).is_idle() {
        return;
    }
    let thread = per_tid.entry(tid).or_insert_with(|| ThreadActivity { tid, ..Default::default() });
    thread.events.push(Event::new(GraphicsEventType::IdleOut.id(), from));
    thread.events.push(Event::new(GraphicsEventType::IdleIn.id(), to));
    thread.total_time += to.saturating_sub(from);
}

/// Per-thread activity of every core inside `[min, max)`. The thread
/// running when the window opens is carried in from the last sample before
/// it.
fn collect_activity(model: &Model, min: u64, max: u64) -> BTreeMap<u32, ThreadActivity> {
    let active = CpuEventType::Active.id();
    let mut per_tid = BTreeMap::new();
    for core in &model.system.cpu {
        let series = EventSeries::single(Arc::clone(core), active);
        let mut index = series.first_after(min);
        let carried = match index {
            Some(i) => series.next_event(i, Direction::Backward),
            None => series.last_event(),
        };
        let mut active_tid = carried.map_or(0, |i| event_tid(series.event(i)));
        let mut active_start = min;
        while let Some(i) = index {
            let event = series.event(i);
            if event.timestamp >= max {
                break;
            }
            add_activity_time(&mut per_tid, active_tid, active_start, event.timestamp);
            active_tid = event_tid(event);
            active_start = event.timestamp;
            index = series.next_event(i, Direction::Forward);
        }
        add_activity_time(&mut per_tid, active_tid, active_start, max - 1);
    }
    // The same thread may run on several cores.
    for thread in per_tid.values_mut() {
        thread.events.sort_by_key(|e| e.timestamp);
    }
    per_tid
}

fn event_tid(event: &Event) -> u32 {
    event.number().map_or(0, |v| v as u32)
}

/// Group threads by owning process, heaviest process first and heaviest
/// thread first inside each. Threads with no metadata go to pid 0.
fn group_by_process(model: &Model, per_tid: BTreeMap<u32, ThreadActivity>) -> Vec<ProcessActivity> {
    let mut processes: Vec<ProcessActivity> = Vec::new();
    for (tid, thread) in per_tid {
        let pid = model.thread(tid).map_or(0, |t| t.pid);
        let position = match processes.iter().position(|p| p.pid == pid) {
            Some(position) => position,
            None => {
                processes.push(ProcessActivity { pid, ..Default::default() });
                processes.len() - 1
            }
        };
        let process = &mut processes[position];
        process.total_time += thread.total_time;
        process.threads.push(thread);
    }
    processes.sort_by(|a, b| b.total_time.cmp(&a.total_time));
    for process in &mut processes {
        process.threads.sort_by(|a, b| b.total_time.cmp(&a.total_time));
    }
    processes
}

/// Zoomed CPU view around a clicked timestamp.
#[derive(Debug, Clone)]
pub struct CpuDetailedView {
    title: String,
    bands: EventBands,
    min_timestamp: u64,
    max_timestamp: u64,
    center: u64,
}

impl CpuDetailedView {
    /// Lay out the view centered on `center`, zoomed `zoom_factor` times
    /// relative to an overview at `resolution`.
    #[must_use]
    pub fn create(model: &Model, resolution: f64, center: u64, config: &ViewConfig) -> Self {
        let available = (config.window_width * config.detail_width_fraction
            - COLUMNS_WIDTH
            - SCROLL_BAR_WIDTH)
            .max(config.detail_min_width);
        let half = (available * resolution / (2.0 * config.zoom_factor)).floor() as u64;
        let min_timestamp = center.saturating_sub(half);
        let max_timestamp = center + half + 1;
        let duration = (max_timestamp - min_timestamp) as f64;

        let per_tid = collect_activity(model, min_timestamp, max_timestamp);
        let thread_count = per_tid.len();
        let processes = group_by_process(model, per_tid);
        let total_time: u64 = processes.iter().map(|p| p.total_time).sum();

        let title = format!(
            "CPU view. {}/{} active processes/threads. Total cpu usage: {:.2}%.",
            processes.len(),
            thread_count,
            100.0 * total_time as f64 / duration
        );
        info!("Opening {title}");

        let mut bands =
            EventBands::new(resolution / config.zoom_factor, min_timestamp, max_timestamp);
        bands.set_band_offset_x(COLUMNS_WIDTH);
        let bands_width = bands.timestamp_to_offset(max_timestamp as f64);
        bands.set_width(bands_width + COLUMNS_WIDTH);

        for process in processes {
            let pid = process.pid;
            let process_name = model.thread(pid).map_or(UNKNOWN_PROCESS, |t| t.name.as_str());
            let text_line = bands.next_y_offset() + PROCESS_INFO_HEIGHT - PADDING;
            bands.add_chart_text(
                &format!("{process_name} {}", Pid(pid)),
                PROCESS_INFO_PADDING,
                text_line,
                TextAnchor::Start,
            );
            bands.add_chart_text(
                &format!("{:.2}", 100.0 * process.total_time as f64 / duration),
                COLUMNS_WIDTH - CPU_USAGE_PADDING,
                text_line,
                TextAnchor::End,
            );

            if let [thread] = process.threads.as_slice() {
                if thread.tid == pid {
                    bands.add_band(thread_series(&thread.events), CPU_BAND_HEIGHT, PADDING);
                    bands.add_band_separator(SEPARATOR_PADDING);
                    continue;
                }
            }

            bands.skip(PROCESS_INFO_HEIGHT + PADDING);
            for thread in &process.threads {
                bands.add_band(thread_series(&thread.events), CPU_BAND_HEIGHT, PADDING);
                let thread_name = model
                    .thread(thread.tid)
                    .map_or_else(|| Tid(thread.tid).to_string(), |t| t.name.clone());
                bands.add_chart_text(
                    &thread_name,
                    THREAD_INFO_PADDING,
                    bands.next_y_offset() - PADDING,
                    TextAnchor::Start,
                );
                bands.add_chart_text(
                    &format!("{:.2}", 100.0 * thread.total_time as f64 / duration),
                    COLUMNS_WIDTH - CPU_USAGE_PADDING,
                    bands.next_y_offset() - 2.0 * PADDING,
                    TextAnchor::End,
                );
            }
            bands.add_band_separator(SEPARATOR_PADDING);
        }

        let time_mark = GraphicsEventType::TimeMark.id();
        let marks: Vec<Event> = vec![
            Event::new(time_mark, min_timestamp),
            Event::new(time_mark, center),
            Event::new(time_mark, max_timestamp - 1),
        ];
        bands.add_global(EventSeries::single(marks.into(), time_mark), GlobalRender::Line, None);

        let height = bands.height();
        for x in [COLUMN_NAME_WIDTH, COLUMNS_WIDTH] {
            bands.surface().add_line(x, 0.0, x, height, COLUMN_LINE_COLOR, 0.25);
        }
        debug!("Detail view [{min_timestamp}, {max_timestamp}) at {} µs/px", bands.resolution());

        Self { title, bands, min_timestamp, max_timestamp, center }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn min_timestamp(&self) -> u64 {
        self.min_timestamp
    }

    #[must_use]
    pub fn max_timestamp(&self) -> u64 {
        self.max_timestamp
    }

    #[must_use]
    pub fn center(&self) -> u64 {
        self.center
    }

    /// Left edge of the view so its center line sits under the click at
    /// `click_x`, kept inside `window_width`.
    #[must_use]
    pub fn overlay_left(&self, click_x: f64, window_width: f64) -> f64 {
        let bands_width = self.bands.width() - COLUMNS_WIDTH;
        (click_x - COLUMNS_WIDTH - bands_width * 0.5)
            .round()
            .min(window_width - self.bands.width())
            .max(0.0)
    }

    /// Close the view and drop its highlight from `overview`.
    pub fn discard(self, overview: &mut CpuEventBands) {
        debug!("Discarding detail view [{}, {})", self.min_timestamp, self.max_timestamp);
        overview.selection = None;
    }
}

fn thread_series(events: &[Event]) -> EventSeries {
    EventSeries::new(events.into(), GraphicsEventType::IdleIn.id(), GraphicsEventType::IdleOut.id())
}

impl BandView for CpuDetailedView {
    fn event_bands(&self) -> &EventBands {
        &self.bands
    }
}
