//! TUI color theme
//!
//! Dark terminal scheme plus the mapping from layout colors (`#rgb` /
//! `#rrggbb` strings) to terminal colors.

use ratatui::style::Color;

pub const ACCENT: Color = Color::Rgb(92, 107, 192);
pub const GOOD_GREEN: Color = Color::Rgb(101, 244, 65);
pub const CAUTION_AMBER: Color = Color::Rgb(255, 191, 0);
pub const CRITICAL_RED: Color = Color::Rgb(255, 61, 0);
pub const INFO_DIM: Color = Color::Rgb(150, 150, 150);
pub const BACKGROUND: Color = Color::Rgb(16, 16, 24);

/// Layout background colors vanish on a dark terminal; they are drawn with
/// this instead.
pub const GRID_DIM: Color = Color::Rgb(70, 70, 80);

/// Terminal color for a layout color string. Unparseable colors fall back
/// to [`INFO_DIM`].
#[must_use]
pub fn layout_color(color: &str) -> Color {
    parse_hex(color).map_or(INFO_DIM, |(r, g, b)| {
        if r > 200 && g > 200 && b > 200 {
            GRID_DIM
        } else if r < 40 && g < 40 && b < 40 {
            Color::Rgb(220, 220, 220)
        } else {
            Color::Rgb(r, g, b)
        }
    })
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#').filter(|h| h.is_ascii())?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut it = hex.chars().map(|c| channel(&c.to_string()).map(|v| v * 17));
            Some((it.next()??, it.next()??, it.next()??))
        }
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}

/// Color for a render quality percentage.
/// - Above 90%: Good (Green)
/// - Above 70%: Caution (Amber)
/// - Otherwise: Critical (Red)
#[must_use]
pub fn quality_color(quality: f64) -> Color {
    if quality > 90.0 {
        GOOD_GREEN
    } else if quality > 70.0 {
        CAUTION_AMBER
    } else {
        CRITICAL_RED
    }
}
