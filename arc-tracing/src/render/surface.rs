//! Drawing surface abstraction
//!
//! Layout code never draws pixels. It issues declarative primitives through
//! [`DrawingSurface`]; [`DrawList`] records them so the terminal viewer and
//! the SVG writer can replay the same layout.

/// Horizontal alignment of text relative to its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    #[must_use]
    pub fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// One recorded primitive. Coordinates are pixels, y grows downwards.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
        opacity: Option<f64>,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: String,
        width: f64,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        color: String,
        width: f64,
    },
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        stroke_width: f64,
        color: String,
        stroke_color: String,
    },
    Text {
        x: f64,
        y: f64,
        font_size: f64,
        text: String,
        anchor: TextAnchor,
    },
}

impl DrawCommand {
    /// Same primitive moved by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let mut moved = self.clone();
        match &mut moved {
            Self::Rect { x, y, .. } | Self::Circle { x, y, .. } | Self::Text { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            Self::Line { x1, y1, x2, y2, .. } => {
                *x1 += dx;
                *x2 += dx;
                *y1 += dy;
                *y2 += dy;
            }
            Self::Polyline { points, .. } => {
                for (x, y) in points {
                    *x += dx;
                    *y += dy;
                }
            }
        }
        moved
    }
}

/// Sink for drawing primitives.
pub trait DrawingSurface {
    fn add_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: &str,
        opacity: Option<f64>,
    );

    fn add_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64);

    fn add_polyline(&mut self, points: Vec<(f64, f64)>, color: &str, width: f64);

    fn add_circle(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        stroke_width: f64,
        color: &str,
        stroke_color: &str,
    );

    fn add_text(&mut self, x: f64, y: f64, font_size: f64, text: &str, anchor: TextAnchor);

    /// Text with embedded newlines, one line per `font_size` downwards.
    fn add_multiline_text(
        &mut self,
        x: f64,
        mut y: f64,
        font_size: f64,
        text: &str,
        anchor: TextAnchor,
    ) {
        for line in text.split('\n') {
            self.add_text(x, y, font_size, line, anchor);
            y += font_size;
        }
    }
}

/// Recorded draw commands in paint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Append every command of `other` moved by `(dx, dy)`.
    pub fn append_translated(&mut self, other: &DrawList, dx: f64, dy: f64) {
        self.commands.extend(other.commands.iter().map(|c| c.translated(dx, dy)));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }
}

impl<'a> IntoIterator for &'a DrawList {
    type Item = &'a DrawCommand;
    type IntoIter = std::slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

impl DrawingSurface for DrawList {
    fn add_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: &str,
        opacity: Option<f64>,
    ) {
        self.push(DrawCommand::Rect { x, y, width, height, color: color.to_string(), opacity });
    }

    fn add_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64) {
        self.push(DrawCommand::Line { x1, y1, x2, y2, color: color.to_string(), width });
    }

    fn add_polyline(&mut self, points: Vec<(f64, f64)>, color: &str, width: f64) {
        self.push(DrawCommand::Polyline { points, color: color.to_string(), width });
    }

    fn add_circle(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        stroke_width: f64,
        color: &str,
        stroke_color: &str,
    ) {
        self.push(DrawCommand::Circle {
            x,
            y,
            radius,
            stroke_width,
            color: color.to_string(),
            stroke_color: stroke_color.to_string(),
        });
    }

    fn add_text(&mut self, x: f64, y: f64, font_size: f64, text: &str, anchor: TextAnchor) {
        self.push(DrawCommand::Text { x, y, font_size, text: text.to_string(), anchor });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_list_records_in_order() {
        let mut list = DrawList::new();
        list.add_rect(0.0, 0.0, 10.0, 5.0, "#fff", None);
        list.add_line(0.0, 0.0, 1.0, 1.0, "#888", 0.25);
        assert_eq!(list.len(), 2);
        assert!(matches!(list.commands()[0], DrawCommand::Rect { .. }));
        assert!(matches!(list.commands()[1], DrawCommand::Line { .. }));
    }

    #[test]
    fn test_multiline_text_advances_by_font_size() {
        let mut list = DrawList::new();
        list.add_multiline_text(5.0, 12.0, 12.0, "a\nb", TextAnchor::Start);
        let ys: Vec<f64> = list
            .iter()
            .map(|c| match c {
                DrawCommand::Text { y, .. } => *y,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(ys, vec![12.0, 24.0]);
    }

    #[test]
    fn test_append_translated() {
        let mut panel = DrawList::new();
        panel.add_polyline(vec![(0.0, 0.0), (2.0, 3.0)], "#000", 1.0);
        let mut page = DrawList::new();
        page.append_translated(&panel, 1.0, 10.0);
        assert_eq!(
            page.commands()[0],
            DrawCommand::Polyline {
                points: vec![(1.0, 10.0), (3.0, 13.0)],
                color: "#000".into(),
                width: 1.0
            }
        );
    }
}
