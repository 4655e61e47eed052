//! SVG serialization of a draw list
//!
//! Every [`DrawCommand`] becomes one SVG element, in paint order. Text is
//! escaped; colors are written as given.

use std::io::{self, Write};

use crate::render::surface::{DrawCommand, DrawList};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Write one element for `command`.
///
/// # Errors
/// Returns an error if writing to `out` fails.
pub fn write_command<W: Write>(out: &mut W, command: &DrawCommand) -> io::Result<()> {
    match command {
        DrawCommand::Rect { x, y, width, height, color, opacity } => {
            write!(
                out,
                r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{}" stroke="none""#,
                escape(color)
            )?;
            if let Some(opacity) = opacity {
                write!(out, r#" fill-opacity="{opacity}""#)?;
            }
            writeln!(out, "/>")
        }
        DrawCommand::Line { x1, y1, x2, y2, color, width } => writeln!(
            out,
            r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{}" stroke-width="{width}"/>"#,
            escape(color)
        ),
        DrawCommand::Polyline { points, color, width } => {
            let points: Vec<String> = points.iter().map(|(x, y)| format!("{x},{y}")).collect();
            writeln!(
                out,
                r#"<polyline points="{}" stroke="{}" stroke-width="{width}" fill="none"/>"#,
                points.join(" "),
                escape(color)
            )
        }
        DrawCommand::Circle { x, y, radius, stroke_width, color, stroke_color } => writeln!(
            out,
            r#"<circle cx="{x}" cy="{y}" r="{radius}" fill="{}" stroke="{}" stroke-width="{stroke_width}"/>"#,
            escape(color),
            escape(stroke_color)
        ),
        DrawCommand::Text { x, y, font_size, text, anchor } => writeln!(
            out,
            r#"<text x="{x}" y="{y}" fill="black" font-size="{font_size}" text-anchor="{}">{}</text>"#,
            anchor.as_svg(),
            escape(text)
        ),
    }
}

/// Write a standalone SVG document of `width` × `height` holding `draw`.
///
/// # Errors
/// Returns an error if writing to `out` fails.
pub fn write_svg<W: Write>(out: &mut W, draw: &DrawList, width: f64, height: f64) -> io::Result<()> {
    writeln!(
        out,
        r#"<svg xmlns="{SVG_NS}" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif">"#
    )?;
    for command in draw {
        write_command(out, command)?;
    }
    writeln!(out, "</svg>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::{DrawingSurface, TextAnchor};

    fn render(draw: &DrawList) -> String {
        let mut out = Vec::new();
        write_svg(&mut out, draw, 100.0, 50.0).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_document() {
        let svg = render(&DrawList::new());
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"100\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_rect_opacity_only_when_set() {
        let mut draw = DrawList::new();
        draw.add_rect(1.0, 2.0, 3.0, 4.0, "#d3d3d3", None);
        draw.add_rect(0.0, 0.0, 10.0, 10.0, "#000", Some(0.1));
        let svg = render(&draw);
        assert!(svg.contains(r##"<rect x="1" y="2" width="3" height="4" fill="#d3d3d3" stroke="none"/>"##));
        assert!(svg.contains(r#"fill-opacity="0.1""#));
    }

    #[test]
    fn test_polyline_points() {
        let mut draw = DrawList::new();
        draw.add_polyline(vec![(0.0, 1.5), (2.0, 3.0)], "#5c6bc0", 1.0);
        assert!(render(&draw).contains(r#"points="0,1.5 2,3""#));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut draw = DrawList::new();
        draw.add_text(0.0, 12.0, 12.0, "chrome <gpu> & \"ui\"", TextAnchor::End);
        let svg = render(&draw);
        assert!(svg.contains("chrome &lt;gpu&gt; &amp; &quot;ui&quot;</text>"));
        assert!(svg.contains(r#"text-anchor="end""#));
    }
}
