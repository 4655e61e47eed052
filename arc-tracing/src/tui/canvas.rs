//! Draw-list replay onto a ratatui canvas
//!
//! A terminal cell covers [`PX_PER_COLUMN`] × [`PX_PER_ROW`] layout pixels.
//! The canvas y axis grows upwards, so layout y is negated on the way in.

#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Line as TextLine,
    widgets::canvas::{Canvas, Circle, Context, Line, Rectangle},
    Frame,
};

use super::theme::{layout_color, GRID_DIM};
use crate::render::{DrawCommand, DrawList, TextAnchor};

pub const PX_PER_COLUMN: f64 = 8.0;
pub const PX_PER_ROW: f64 = 16.0;

/// Rects thinner than this are drawn as a single line.
const THIN_RECT: f64 = PX_PER_ROW / 4.0;

const TEXT_COLOR: Color = Color::Rgb(230, 230, 230);

/// Visible window of a layout, in layout pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Viewport whose top-left corner is `(left, top)` and whose size is
    /// what `area` can show.
    #[must_use]
    pub fn for_area(left: f64, top: f64, area: Rect) -> Self {
        Self {
            left,
            top,
            width: f64::from(area.width) * PX_PER_COLUMN,
            height: f64::from(area.height) * PX_PER_ROW,
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Layout position under terminal cell `(column, row)` of `area`.
    #[must_use]
    pub fn cell_to_layout(&self, area: Rect, column: u16, row: u16) -> Option<(f64, f64)> {
        if !area.contains((column, row).into()) {
            return None;
        }
        let x = self.left + f64::from(column - area.x) * PX_PER_COLUMN;
        let y = self.top + f64::from(row - area.y) * PX_PER_ROW;
        Some((x, y))
    }

    fn overlaps(&self, from: f64, to: f64) -> bool {
        to >= self.left && from <= self.right()
    }
}

/// Left edge of `text` drawn at `x` with `anchor`, assuming one column per
/// character.
#[must_use]
pub fn text_left(x: f64, text: &str, anchor: TextAnchor) -> f64 {
    let width = text.chars().count() as f64 * PX_PER_COLUMN;
    match anchor {
        TextAnchor::Start => x,
        TextAnchor::Middle => x - width / 2.0,
        TextAnchor::End => x - width,
    }
}

fn paint(ctx: &mut Context<'_>, draw: &DrawList, viewport: &Viewport) {
    for command in draw {
        match command {
            DrawCommand::Rect { x, y, width, height, color, opacity } => {
                if !viewport.overlaps(*x, x + width) {
                    continue;
                }
                let color = match opacity {
                    Some(opacity) if *opacity < 0.5 => GRID_DIM,
                    _ => layout_color(color),
                };
                if *height < THIN_RECT {
                    let mid = -(y + height / 2.0);
                    ctx.draw(&Line { x1: *x, y1: mid, x2: x + width, y2: mid, color });
                } else {
                    ctx.draw(&Rectangle { x: *x, y: -(y + height), width: *width, height: *height, color });
                }
            }
            DrawCommand::Line { x1, y1, x2, y2, color, .. } => {
                if viewport.overlaps(x1.min(*x2), x1.max(*x2)) {
                    ctx.draw(&Line { x1: *x1, y1: -y1, x2: *x2, y2: -y2, color: layout_color(color) });
                }
            }
            DrawCommand::Polyline { points, color, .. } => {
                let color = layout_color(color);
                for pair in points.windows(2) {
                    let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
                    if viewport.overlaps(x1.min(x2), x1.max(x2)) {
                        ctx.draw(&Line { x1, y1: -y1, x2, y2: -y2, color });
                    }
                }
            }
            DrawCommand::Circle { x, y, radius, color, .. } => {
                if viewport.overlaps(x - radius, x + radius) {
                    ctx.draw(&Circle { x: *x, y: -y, radius: *radius, color: layout_color(color) });
                }
            }
            DrawCommand::Text { x, y, text, anchor, .. } => {
                let left = text_left(*x, text, *anchor);
                let right = left + text.chars().count() as f64 * PX_PER_COLUMN;
                if viewport.overlaps(left, right) {
                    ctx.print(left, -y, TextLine::styled(text.clone(), Style::new().fg(TEXT_COLOR)));
                }
            }
        }
    }
}

/// Replay `draw` into `area`, showing the part of the layout `viewport`
/// covers.
pub fn render_draw_list(f: &mut Frame, area: Rect, draw: &DrawList, viewport: Viewport) {
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([viewport.left, viewport.right()])
        .y_bounds([-(viewport.top + viewport.height), -viewport.top])
        .paint(|ctx| paint(ctx, draw, &viewport));
    f.render_widget(canvas, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DrawingSurface;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(draw: &DrawList, viewport: Viewport) -> String {
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render_draw_list(f, area, draw, viewport);
            })
            .unwrap();
        terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_viewport_from_area() {
        let vp = Viewport::for_area(100.0, 20.0, Rect::new(0, 0, 40, 10));
        assert!((vp.width - 320.0).abs() < f64::EPSILON);
        assert!((vp.height - 160.0).abs() < f64::EPSILON);
        assert!((vp.right() - 420.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cell_to_layout() {
        let area = Rect::new(2, 3, 40, 10);
        let vp = Viewport::for_area(100.0, 0.0, area);
        assert_eq!(vp.cell_to_layout(area, 2, 3), Some((100.0, 0.0)));
        assert_eq!(vp.cell_to_layout(area, 12, 5), Some((180.0, 32.0)));
        assert_eq!(vp.cell_to_layout(area, 1, 5), None);
        assert_eq!(vp.cell_to_layout(area, 42, 5), None);
    }

    #[test]
    fn test_text_left_by_anchor() {
        assert!((text_left(80.0, "abcd", TextAnchor::Start) - 80.0).abs() < f64::EPSILON);
        assert!((text_left(80.0, "abcd", TextAnchor::Middle) - 64.0).abs() < f64::EPSILON);
        assert!((text_left(80.0, "abcd", TextAnchor::End) - 48.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_visible_text_is_printed() {
        let mut draw = DrawList::new();
        draw.add_text(16.0, 32.0, 12.0, "FPS", TextAnchor::Start);
        let vp = Viewport::for_area(0.0, 0.0, Rect::new(0, 0, 40, 10));
        assert!(screen_text(&draw, vp).contains("FPS"));
    }

    #[test]
    fn test_text_outside_viewport_is_skipped() {
        let mut draw = DrawList::new();
        draw.add_text(16.0, 32.0, 12.0, "FPS", TextAnchor::Start);
        let vp = Viewport::for_area(1000.0, 0.0, Rect::new(0, 0, 40, 10));
        assert!(!screen_text(&draw, vp).contains("FPS"));
    }
}
