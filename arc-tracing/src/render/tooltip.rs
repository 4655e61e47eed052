//! Tooltip resolution for a laid-out panel
//!
//! Sources are tried in priority order:
//!
//! 1. fixed hit areas registered with `add_chart_tooltip` (histogram bars);
//! 2. global marker events within ±3 px, closest first, at most three;
//! 3. the band under the cursor, then the chart under the cursor.
//!
//! Bands and charts are only consulted when no global event matched.

#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use crate::attributes::{BAND_COLOR, UNUSED_COLOR};
use crate::domain::timestamp_to_ms_text;
use crate::render::bands::{
    EventBands, FONT_SIZE, HORIZONTAL_GAP, ICON_OFFSET, ICON_RADIUS, LINE_HEIGHT, TEXT_OFFSET,
    VERTICAL_GAP,
};
use crate::render::chart::{Chart, ChartSource};
use crate::render::surface::{DrawList, DrawingSurface, TextAnchor};
use crate::series::{Direction, EventSeries};
use crate::trace_data::Event;

/// Width of a generated tooltip.
pub const TOOLTIP_WIDTH: f64 = 220.0;
/// Pixel distance within which global events are shown.
const GLOBAL_EVENT_DISTANCE_PX: f64 = 3.0;
const MAX_GLOBAL_EVENTS: usize = 3;
/// Text start for chart values.
const VALUE_OFFSET: f64 = 32.0;

pub const CLICK_HINT: &str = "Click for detailed info";

/// Fixed tooltip registered for a rectangle, inclusive bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaTooltip {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub text: String,
    pub width: f64,
    pub height: f64,
}

impl AreaTooltip {
    fn contains(&self, x: f64, y: f64) -> bool {
        self.left <= x && self.top <= y && self.right >= x && self.bottom >= y
    }
}

/// One text line of a tooltip, with an optional colored icon to its left.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipLine {
    pub x: f64,
    /// Text baseline.
    pub y: f64,
    pub text: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub lines: Vec<TooltipLine>,
    pub width: f64,
    pub height: f64,
}

impl Tooltip {
    /// Plain text of every line, top to bottom.
    #[must_use]
    pub fn text_lines(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    /// Replay the tooltip onto a surface at the origin.
    #[must_use]
    pub fn to_draw_list(&self) -> DrawList {
        let mut draw = DrawList::new();
        for line in &self.lines {
            if let Some(color) = &line.icon {
                draw.add_circle(ICON_OFFSET, line.y - ICON_RADIUS, ICON_RADIUS, 1.0, color, "black");
            }
            draw.add_text(line.x, line.y, FONT_SIZE, &line.text, TextAnchor::Start);
        }
        draw
    }
}

/// Accumulates lines while tracking the running vertical offset.
struct Builder {
    lines: Vec<TooltipLine>,
    y: f64,
}

impl Builder {
    fn new() -> Self {
        Self { lines: Vec::new(), y: VERTICAL_GAP }
    }

    fn line(&mut self, x: f64, text: String, icon: Option<&str>) {
        self.y += LINE_HEIGHT;
        self.lines.push(TooltipLine { x, y: self.y, text, icon: icon.map(str::to_string) });
    }

    fn time(&mut self, timestamp: f64) {
        self.line(HORIZONTAL_GAP, format!("{} ms", timestamp_to_ms_text(timestamp)), None);
    }

    fn has_content(&self) -> bool {
        self.y > VERTICAL_GAP
    }
}

/// Smallest integral timestamp at or after `t`.
fn ceil_ts(t: f64) -> u64 {
    t.max(0.0).ceil() as u64
}

/// Largest integral timestamp at or before `t`, `None` before zero.
fn floor_ts(t: f64) -> Option<u64> {
    (t >= 0.0).then(|| t.floor() as u64)
}

impl EventBands {
    /// Tooltip for pixel `(x, y)`, or `None` when nothing is under it.
    ///
    /// `clickable` appends the hint that a click opens a detail view.
    #[must_use]
    pub fn tooltip(&self, x: f64, y: f64, clickable: bool) -> Option<Tooltip> {
        if let Some(area) = self.tooltips.iter().find(|a| a.contains(x, y)) {
            let mut lines = Vec::new();
            let mut line_y = VERTICAL_GAP + FONT_SIZE;
            for text in area.text.split('\n') {
                lines.push(TooltipLine { x: HORIZONTAL_GAP, y: line_y, text: text.into(), icon: None });
                line_y += FONT_SIZE;
            }
            return Some(Tooltip { lines, width: area.width, height: area.height });
        }

        if x < self.band_offset_x {
            return None;
        }
        let timestamp = self.offset_to_time(x - self.band_offset_x);

        let mut builder = Builder::new();
        self.global_events_tooltip(&mut builder, timestamp);
        if !builder.has_content() {
            if let Some(band) = self.bands.iter().find(|b| b.top <= y && b.bottom > y) {
                self.band_tooltip(&mut builder, timestamp, &band.series);
            }
            if let Some(chart) = self.charts.iter().find(|c| c.top <= y && c.bottom > y) {
                chart_tooltip(&mut builder, timestamp, chart);
            }
        }

        if !builder.has_content() {
            return None;
        }
        if clickable {
            builder.line(HORIZONTAL_GAP, CLICK_HINT.to_string(), None);
        }
        let height = builder.y + VERTICAL_GAP;
        Some(Tooltip { lines: builder.lines, width: TOOLTIP_WIDTH, height })
    }

    /// Global events within `distance` of `timestamp`, closest first.
    fn find_global_events(&self, timestamp: f64, distance: f64) -> Vec<&Event> {
        let right = timestamp + distance;
        let mut found = Vec::new();
        for series in &self.global_events {
            let mut index = series.first_after(ceil_ts(timestamp - distance));
            while let Some(i) = index {
                let event = series.event(i);
                if event.timestamp as f64 > right {
                    break;
                }
                found.push(event);
                index = series.next_event(i, Direction::Forward);
            }
        }
        found.sort_by(|a, b| {
            let da = (timestamp - a.timestamp as f64).abs();
            let db = (timestamp - b.timestamp as f64).abs();
            da.total_cmp(&db)
        });
        found
    }

    fn global_events_tooltip(&self, builder: &mut Builder, timestamp: f64) {
        let found =
            self.find_global_events(timestamp, GLOBAL_EVENT_DISTANCE_PX * self.resolution);
        if found.is_empty() {
            return;
        }
        for event in found.into_iter().take(MAX_GLOBAL_EVENTS) {
            builder.time(event.timestamp as f64);
            let attributes = crate::attributes::event_attributes(event.kind);
            let name = attributes.map_or("unknown", |a| a.name);
            let color = attributes.and_then(|a| a.color).unwrap_or(UNUSED_COLOR);
            builder.line(TEXT_OFFSET, name.to_string(), Some(color));
            if let Some(value) = &event.value {
                builder.line(TEXT_OFFSET + HORIZONTAL_GAP, value.to_string(), None);
            }
        }
        builder.y += VERTICAL_GAP;
    }

    /// Idle interval under the cursor, or the whole active sequence with the
    /// time spent in each step.
    fn band_tooltip(&self, builder: &mut Builder, timestamp: f64, series: &EventSeries) {
        let next = match floor_ts(timestamp) {
            Some(t) => series.first_after(t + 1),
            None => series.first_event(),
        };
        let current = match next {
            Some(n) => series.next_event(n, Direction::Backward),
            None => series.last_event(),
        };

        match current {
            Some(mut index) if !series.is_end_of_sequence(index) => {
                while let Some(previous) = series.next_event(index, Direction::Backward) {
                    if series.is_end_of_sequence(previous) {
                        break;
                    }
                    index = previous;
                }

                let sequence_start = series.event(index).timestamp;
                builder.time(sequence_start as f64);

                let mut entries: Vec<(String, &'static str)> = Vec::new();
                let mut last_timestamp = sequence_start;
                let mut cursor = Some(index);
                while let Some(i) = cursor {
                    let event = series.event(i);
                    let attributes = series.event_attributes(i);
                    let name = attributes.map_or("unknown", |a| a.name);
                    let color = attributes.and_then(|a| a.color).unwrap_or(UNUSED_COLOR);
                    let text = match &event.value {
                        Some(value) => format!("{name} {value}"),
                        None => name.to_string(),
                    };
                    if let Some((previous_text, _)) = entries.last_mut() {
                        previous_text.push_str(&format!(
                            " [{} ms]",
                            timestamp_to_ms_text((event.timestamp - last_timestamp) as f64)
                        ));
                    }
                    entries.push((text, color));
                    if series.is_end_of_sequence(i) {
                        break;
                    }
                    last_timestamp = event.timestamp;
                    cursor = series.next_event(i, Direction::Forward);
                }
                // The closing event marks the return to idle.
                if let Some(last) = entries.last_mut() {
                    last.1 = BAND_COLOR;
                }
                for (text, color) in entries {
                    builder.line(TEXT_OFFSET, text, Some(color));
                }
            }
            _ => {
                let start = current.map_or(0, |i| series.event(i).timestamp);
                let end = next.map_or(self.max_timestamp, |i| series.event(i).timestamp);
                builder.line(
                    HORIZONTAL_GAP,
                    format!(
                        "Idle {}...{} chart time ms.",
                        timestamp_to_ms_text(start as f64),
                        timestamp_to_ms_text(end as f64)
                    ),
                    None,
                );
            }
        }
        builder.y += VERTICAL_GAP;
    }
}

/// Value of every chart source at the cursor.
fn chart_tooltip(builder: &mut Builder, timestamp: f64, chart: &Chart) {
    let mut content_added = false;
    for source in &chart.sources {
        let (color, text) = match source {
            ChartSource::PerValue { source, palette } => {
                let Some(index) = floor_ts(timestamp).and_then(|t| source.last_before(t)) else {
                    continue;
                };
                let Some(attribute) = palette.get(source.event(index).number().unwrap_or(0.0))
                else {
                    continue;
                };
                (attribute.color.to_string(), attribute.name.to_string())
            }
            ChartSource::Continuous { source, attributes, smooth, .. } => {
                let Some(after) = source.first_after(ceil_ts(timestamp)) else {
                    continue;
                };
                let Some(before) = source.next_event(after, Direction::Backward) else {
                    continue;
                };
                let (event_before, event_after) = (source.event(before), source.event(after));
                let span = event_after.timestamp.saturating_sub(event_before.timestamp);
                let mut factor = if span == 0 {
                    1.0
                } else {
                    (timestamp - event_before.timestamp as f64) / span as f64
                };
                if !smooth && factor < 1.0 {
                    factor = 0.0;
                }
                let value_after = event_after.number().unwrap_or(0.0);
                let value_before = event_before.number().unwrap_or(0.0);
                let value = factor * value_after + (1.0 - factor) * value_before;
                (
                    attributes.color.clone(),
                    format!("{:.1} {}", value * attributes.scale, attributes.name),
                )
            }
        };
        if !content_added {
            builder.time(timestamp);
            content_added = true;
        }
        builder.line(VALUE_OFFSET, text, Some(color.as_str()));
    }
    if content_added {
        builder.y += VERTICAL_GAP;
    }
}
