//! Event bands: timeline layout of one panel
//!
//! An [`EventBands`] maps the time window `[min_timestamp, max_timestamp]`
//! at a fixed resolution (microseconds per pixel) onto pixels, and stacks
//! bands and charts top to bottom. Construction is a single forward pass:
//! every `add_*` call appends draw commands and may advance
//! `next_y_offset`, which never decreases. There is no way to edit a band
//! once added; a changed view is rebuilt from scratch.
//!
//! ```text
//!  band_offset_x
//!  │
//!  ├──────────────────────────────────────┐ ← band (height + padding)
//!  ├──────────────────────────────────────┤ ← separator
//!  │  ╱╲__╱‾‾╲___                         │ ← chart
//!  └──────────────────────────────────────┘
//!  min_timestamp                max_timestamp
//! ```

#![allow(clippy::cast_precision_loss)]

use crate::attributes::UNUSED_COLOR;
use crate::render::chart::Chart;
use crate::render::surface::{DrawCommand, DrawList, DrawingSurface, TextAnchor};
use crate::render::tooltip::{AreaTooltip, Tooltip};
use crate::series::{Direction, EventSeries};

/// Font size of chart labels and tooltips.
pub const FONT_SIZE: f64 = 12.0;
pub const VERTICAL_GAP: f64 = 5.0;
pub const HORIZONTAL_GAP: f64 = 10.0;
pub const LINE_HEIGHT: f64 = 16.0;
/// Tooltip icon center and radius, and the text start next to it.
pub const ICON_OFFSET: f64 = 24.0;
pub const ICON_RADIUS: f64 = 4.0;
pub const TEXT_OFFSET: f64 = 32.0;

const SEPARATOR_COLOR: &str = "#888";
const GRID_COLOR: &str = "#ccc";

/// Pixel rows occupied by one band.
#[derive(Debug, Clone)]
pub struct BandArea {
    pub series: EventSeries,
    pub top: f64,
    pub bottom: f64,
}

/// How [`EventBands::add_global`] draws marker events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlobalRender {
    /// Vertical line across the whole panel.
    Line,
    /// Circle at a fraction of the panel height, 0.5 is centered.
    Circle { y: f64 },
}

#[derive(Debug, Clone)]
pub struct EventBands {
    pub(super) resolution: f64,
    pub(super) min_timestamp: u64,
    pub(super) max_timestamp: u64,
    pub(super) band_offset_x: f64,
    pub(super) width: f64,
    pub(super) height: f64,
    pub(super) next_y_offset: f64,
    pub(super) bands: Vec<BandArea>,
    pub(super) charts: Vec<Chart>,
    pub(super) global_events: Vec<EventSeries>,
    pub(super) tooltips: Vec<AreaTooltip>,
    pub(super) draw: DrawList,
}

impl EventBands {
    /// Empty layout of `[min_timestamp, max_timestamp]` at `resolution` µs/px.
    #[must_use]
    pub fn new(resolution: f64, min_timestamp: u64, max_timestamp: u64) -> Self {
        Self {
            resolution,
            min_timestamp,
            max_timestamp,
            band_offset_x: 0.0,
            width: 0.0,
            height: 0.0,
            next_y_offset: 0.0,
            bands: Vec::new(),
            charts: Vec::new(),
            global_events: Vec::new(),
            tooltips: Vec::new(),
            draw: DrawList::new(),
        }
    }

    /// Layout with a single chart of `height` over `[0, duration]`, sized
    /// to fit, with `grid_lines` evenly spaced horizontal guides.
    #[must_use]
    pub fn with_chart(resolution: f64, duration: u64, height: f64, grid_lines: usize) -> Self {
        let mut bands = Self::new(resolution, 0, duration);
        bands.set_width(bands.timestamp_to_offset(duration as f64));
        bands.add_chart(height, 4.0);
        for i in 0..grid_lines {
            bands.add_chart_grid_line((i + 1) as f64 * height / (grid_lines + 1) as f64);
        }
        bands
    }

    /// Horizontal pixel offset where the time axis starts.
    pub fn set_band_offset_x(&mut self, offset_x: f64) {
        self.band_offset_x = offset_x;
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    #[must_use]
    pub fn resolution(&self) -> f64 {
        self.resolution
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
    pub fn band_offset_x(&self) -> f64 {
        self.band_offset_x
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn next_y_offset(&self) -> f64 {
        self.next_y_offset
    }

    /// Reserve vertical space without drawing.
    pub fn skip(&mut self, pixels: f64) {
        self.next_y_offset += pixels.max(0.0);
    }

    #[must_use]
    pub fn bands(&self) -> &[BandArea] {
        &self.bands
    }

    #[must_use]
    pub fn charts(&self) -> &[Chart] {
        &self.charts
    }

    #[must_use]
    pub fn draw_list(&self) -> &DrawList {
        &self.draw
    }

    /// Direct access for content that is neither band nor chart, such as
    /// column labels.
    pub fn surface(&mut self) -> &mut DrawList {
        &mut self.draw
    }

    /// Pixel offset of `timestamp` from the start of the time axis.
    #[must_use]
    pub fn timestamp_to_offset(&self, timestamp: f64) -> f64 {
        (timestamp - self.min_timestamp as f64) / self.resolution
    }

    /// Inverse of [`timestamp_to_offset`](Self::timestamp_to_offset).
    #[must_use]
    pub fn offset_to_time(&self, offset: f64) -> f64 {
        offset * self.resolution + self.min_timestamp as f64
    }

    fn x_of(&self, timestamp: u64) -> f64 {
        self.timestamp_to_offset(timestamp as f64) + self.band_offset_x
    }

    /// Add a band of `height` colored by the active runs of `series`.
    ///
    /// Each run is drawn from its first event up to the event that ends it
    /// in the color of the event that opened the current step. A run already
    /// open at `min_timestamp` starts at the left edge; a run still open at
    /// `max_timestamp` extends to the right edge.
    pub fn add_band(&mut self, series: EventSeries, height: f64, padding: f64) {
        let y = self.next_y_offset;
        let mut color = UNUSED_COLOR;
        let mut open = false;
        let mut x = self.band_offset_x;

        let mut index = series.first_after(self.min_timestamp);
        let carried = match index {
            Some(i) => series.next_event(i, Direction::Backward),
            None => series.last_event(),
        };
        if let Some(carried) = carried {
            if !series.is_end_of_sequence(carried) {
                open = true;
                color = run_color(&series, carried);
            }
        }

        while let Some(i) = index {
            let timestamp = series.event(i).timestamp;
            if timestamp >= self.max_timestamp {
                break;
            }
            let next_x = self.x_of(timestamp);
            if open {
                self.draw.add_rect(x, y, next_x - x, height, color, None);
            }
            if series.is_end_of_sequence(i) {
                color = UNUSED_COLOR;
                open = false;
            } else {
                color = run_color(&series, i);
                open = true;
            }
            x = next_x;
            index = series.next_event(i, Direction::Forward);
        }
        if open {
            let end = self.x_of(self.max_timestamp);
            self.draw.add_rect(x, y, end - x, height, color, None);
        }

        self.bands.push(BandArea { series, top: y, bottom: y + height });
        self.update_height(height, padding);
    }

    /// Thin horizontal line at the current offset.
    pub fn add_band_separator(&mut self, padding: f64) {
        let y = self.next_y_offset;
        self.draw.add_line(0.0, y, self.width, y, SEPARATOR_COLOR, 0.25);
        self.update_height(0.0, padding);
    }

    /// Open a new empty chart of `height`. Sources are added with
    /// [`add_chart_sources`](Self::add_chart_sources) or
    /// [`add_bar_source`](Self::add_bar_source).
    pub fn add_chart(&mut self, height: f64, padding: f64) {
        let top = self.next_y_offset;
        self.charts.push(Chart::new(top, top + height));
        self.update_height(height, padding);
    }

    /// Open a chart over rows that are already laid out, for overlays.
    pub fn add_chart_to_existing_area(&mut self, top: f64, bottom: f64) {
        self.charts.push(Chart::new(top, bottom));
    }

    pub fn add_chart_text(&mut self, text: &str, x: f64, y: f64, anchor: TextAnchor) {
        self.draw.add_multiline_text(x, y, FONT_SIZE, text, anchor);
    }

    pub fn add_chart_bar(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.draw.add_rect(x, y, width, height, color, Some(1.0));
    }

    /// Fixed tooltip for a rectangular area. Takes priority over every
    /// other tooltip source.
    #[allow(clippy::too_many_arguments)]
    pub fn add_chart_tooltip(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        text: impl Into<String>,
        tooltip_width: f64,
        tooltip_height: f64,
    ) {
        self.tooltips.push(AreaTooltip {
            left: x,
            top: y,
            right: x + width - 1.0,
            bottom: y + height - 1.0,
            text: text.into(),
            width: tooltip_width,
            height: tooltip_height,
        });
    }

    pub fn add_chart_grid_line(&mut self, y: f64) {
        self.draw.add_line(0.0, y, self.width, y, GRID_COLOR, 0.5);
    }

    /// Draw every event of `series` as a panel-wide marker. Lines span the
    /// current height, so globals go in after bands and charts.
    ///
    /// `color` overrides the per-type color.
    pub fn add_global(&mut self, series: EventSeries, render: GlobalRender, color: Option<&str>) {
        for index in series.iter_indices() {
            let attributes = series.event_attributes(index);
            let x = self.x_of(series.event(index).timestamp);
            let event_color = color
                .or_else(|| attributes.and_then(|a| a.color))
                .unwrap_or(UNUSED_COLOR);
            match render {
                GlobalRender::Circle { y } => {
                    let radius = attributes.and_then(|a| a.radius).unwrap_or(ICON_RADIUS);
                    self.draw.add_circle(x, self.height * y, radius, 1.0, event_color, "black");
                }
                GlobalRender::Line => {
                    let width = attributes.and_then(|a| a.width).unwrap_or(1.0);
                    self.draw.add_line(x, 0.0, x, self.height, event_color, width);
                }
            }
        }
        self.global_events.push(series);
    }

    /// Translucent box over `[from, to]` across the full height. Returned
    /// rather than recorded so the owner can drop it again.
    #[must_use]
    pub fn selection_rect(&self, from: u64, to: u64) -> DrawCommand {
        let x = self.timestamp_to_offset(from as f64) + self.band_offset_x;
        let width = self.timestamp_to_offset(to as f64) - self.timestamp_to_offset(from as f64);
        DrawCommand::Rect {
            x,
            y: 0.0,
            width,
            height: self.height,
            color: "#000".to_string(),
            opacity: Some(0.1),
        }
    }

    pub(super) fn update_height(&mut self, height: f64, padding: f64) {
        self.next_y_offset += height;
        self.height = self.next_y_offset;
        self.next_y_offset += padding;
    }
}

fn run_color(series: &EventSeries, index: usize) -> &'static str {
    series
        .event_attributes(index)
        .and_then(|a| a.color)
        .unwrap_or(UNUSED_COLOR)
}

/// A laid-out panel the viewer can hover and click.
pub trait BandView {
    fn event_bands(&self) -> &EventBands;

    /// Whether a click can open a detail view. Only panels that implement
    /// a drill-down override this.
    fn can_show_detailed_info(&self) -> bool {
        false
    }

    /// Tooltip for the pixel under the cursor.
    fn tooltip_at(&self, x: f64, y: f64) -> Option<Tooltip> {
        self.event_bands().tooltip(x, y, self.can_show_detailed_info())
    }
}

impl BandView for EventBands {
    fn event_bands(&self) -> &EventBands {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace_data::Event;

    fn cpu(events: &[(u32, u64)]) -> EventSeries {
        let events: Vec<Event> = events.iter().map(|&(k, t)| Event::new(k, t)).collect();
        EventSeries::new(events.into(), 0, 1)
    }

    fn rects(bands: &EventBands) -> Vec<(f64, f64, String)> {
        bands
            .draw_list()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { x, width, color, .. } => Some((*x, *width, color.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_offset_conversions_round_trip() {
        let bands = EventBands::new(100.0, 1000, 11_000);
        assert_eq!(bands.timestamp_to_offset(1000.0), 0.0);
        assert_eq!(bands.timestamp_to_offset(6000.0), 50.0);
        assert_eq!(bands.offset_to_time(50.0), 6000.0);
    }

    #[test]
    fn test_band_draws_active_runs_only() {
        let mut bands = EventBands::new(10.0, 0, 1000);
        bands.add_band(cpu(&[(1, 100), (0, 300), (1, 500), (0, 600)]), 6.0, 2.0);
        assert_eq!(
            rects(&bands),
            vec![(10.0, 20.0, "#ffbf00".to_string()), (50.0, 10.0, "#ffbf00".to_string())]
        );
        assert_eq!(bands.height(), 6.0);
        assert_eq!(bands.next_y_offset(), 8.0);
    }

    #[test]
    fn test_band_run_open_at_both_edges() {
        let mut bands = EventBands::new(10.0, 200, 800);
        bands.add_band(cpu(&[(1, 100), (0, 300), (1, 500)]), 6.0, 0.0);
        // Open before the window: from the left edge to 300.
        // Open at the end: from 500 to the right edge.
        assert_eq!(
            rects(&bands),
            vec![(0.0, 10.0, "#ffbf00".to_string()), (30.0, 30.0, "#ffbf00".to_string())]
        );
    }

    #[test]
    fn test_band_respects_offset_x() {
        let mut bands = EventBands::new(10.0, 0, 100);
        bands.set_band_offset_x(170.0);
        bands.add_band(cpu(&[(1, 0), (0, 50)]), 14.0, 2.0);
        assert_eq!(rects(&bands), vec![(170.0, 5.0, "#ffbf00".to_string())]);
    }

    #[test]
    fn test_y_offset_only_grows() {
        let mut bands = EventBands::new(10.0, 0, 100);
        bands.add_band(cpu(&[]), 6.0, 2.0);
        bands.add_band_separator(2.0);
        bands.add_chart(40.0, 4.0);
        bands.add_chart_to_existing_area(0.0, 10.0);
        assert_eq!(bands.next_y_offset(), 8.0 + 2.0 + 44.0);
        assert_eq!(bands.height(), 50.0);
        assert_eq!(bands.bands()[0].bottom, 6.0);
        assert_eq!(bands.charts().len(), 2);
    }

    #[test]
    fn test_global_lines_span_height() {
        let mut bands = EventBands::new(10.0, 0, 100);
        bands.add_chart(30.0, 0.0);
        let marks: Vec<Event> = vec![Event::new(10_000, 50)];
        bands.add_global(EventSeries::single(marks.into(), 10_000), GlobalRender::Line, None);
        assert_eq!(
            bands.draw_list().commands().last(),
            Some(&DrawCommand::Line {
                x1: 5.0,
                y1: 0.0,
                x2: 5.0,
                y2: 30.0,
                color: "#888".into(),
                width: 0.75
            })
        );
    }

    #[test]
    fn test_global_circles_use_override_color() {
        let mut bands = EventBands::new(10.0, 0, 100);
        bands.add_chart(40.0, 0.0);
        let janks: Vec<Event> = vec![Event::new(207, 20)];
        bands.add_global(
            EventSeries::single(janks.into(), 207),
            GlobalRender::Circle { y: 0.5 },
            Some("#5c6bc0"),
        );
        assert!(matches!(
            bands.draw_list().commands().last(),
            Some(DrawCommand::Circle { x, y, radius, color, .. })
                if *x == 2.0 && *y == 20.0 && *radius == 4.0 && color == "#5c6bc0"
        ));
    }

    #[test]
    fn test_with_chart_grid() {
        let bands = EventBands::with_chart(100.0, 10_000, 30.0, 2);
        assert_eq!(bands.width(), 100.0);
        assert_eq!(bands.charts().len(), 1);
        let grid: Vec<f64> = bands
            .draw_list()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { y1, .. } => Some(*y1),
                _ => None,
            })
            .collect();
        assert_eq!(grid, vec![10.0, 20.0]);
    }

    #[test]
    fn test_selection_rect_spans_height() {
        let mut bands = EventBands::new(10.0, 100, 1100);
        bands.add_band(cpu(&[]), 6.0, 2.0);
        assert_eq!(
            bands.selection_rect(300, 500),
            DrawCommand::Rect {
                x: 20.0,
                y: 0.0,
                width: 20.0,
                height: 6.0,
                color: "#000".into(),
                opacity: Some(0.1)
            }
        );
        assert!(bands.draw_list().is_empty());
    }

    #[test]
    fn test_plain_bands_cannot_show_detailed_info() {
        let bands = EventBands::new(10.0, 0, 100);
        assert!(!bands.can_show_detailed_info());
    }
}
