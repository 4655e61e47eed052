//! # Terminal User Interface (TUI)
//!
//! Interactive terminal viewer using `ratatui`. The overview draw list of a
//! [`TracingSession`] is replayed onto a braille canvas that can be panned
//! and scrolled; the CPU drill-down opens as an overlay under the click.
//!
//! ## View Modes
//!
//! - **Overview** - Panels of every loaded model (default)
//! - **`DrillDown`** - CPU detail overlay, closed by `Esc`/`Enter` or a
//!   click outside it
//! - **Help** - Keyboard shortcuts
//!
//! ## Sub-Modules
//!
//! - `canvas` - Draw-list replay and cell/pixel mapping
//! - `theme` - Color scheme

#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::too_many_lines
)]

use anyhow::{Context as _, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::debug;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::time::Duration;

pub mod canvas;
mod theme;

use canvas::{render_draw_list, Viewport, PX_PER_COLUMN, PX_PER_ROW};
use theme::{layout_color, quality_color, ACCENT, BACKGROUND, CAUTION_AMBER, INFO_DIM};

use crate::domain::TuiError;
use crate::render::{BandView, Tooltip};
use crate::session::{ClickTarget, Key, TracingSession, ViewState};

// =============================================================================
// STYLE CONSTANTS
// =============================================================================

const STYLE_HEADING: Style = Style::new().fg(ACCENT).add_modifier(Modifier::BOLD);
const STYLE_DIM: Style = Style::new().fg(INFO_DIM);
const STYLE_KEY: Style = Style::new().fg(CAUTION_AMBER);
const STYLE_TEXT: Style = Style::new().fg(ratatui::style::Color::White);

/// Model summary lines shown in the header.
const MAX_HEADER_MODELS: usize = 4;

/// Header borders plus the title line.
const HEADER_FRAME_ROWS: u16 = 3;
const STATUS_ROWS: u16 = 3;

/// Smallest detail overlay: borders plus one line of bands.
const MIN_DETAIL_ROWS: u16 = 3;

/// Smallest terminal the viewer lays out in. Leaves room for the detail
/// overlay under the tallest header.
const MIN_COLUMNS: u16 = 40;
const MIN_ROWS: u16 =
    MAX_HEADER_MODELS as u16 + HEADER_FRAME_ROWS + STATUS_ROWS + 2 + MIN_DETAIL_ROWS;

/// Rows moved per scroll step.
const SCROLL_ROWS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewMode {
    Timeline,
    Help,
}

// =============================================================================
// APP
// =============================================================================

/// Terminal viewer over one tracing session.
pub struct App {
    session: TracingSession,
    view_mode: ViewMode,
    /// Layout pixel at the left edge of the canvas.
    scroll_x: f64,
    /// Layout pixel at the top edge of the canvas.
    scroll_y: f64,
    /// Canvas area from the last frame, used to map mouse cells.
    canvas_area: Rect,
    /// Detail overlay area from the last frame.
    detail_area: Option<Rect>,
    /// Overlay left edge, in canvas pixels.
    detail_left: f64,
    tooltip: Option<Tooltip>,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(session: TracingSession) -> Self {
        Self {
            session,
            view_mode: ViewMode::Timeline,
            scroll_x: 0.0,
            scroll_y: 0.0,
            canvas_area: Rect::new(0, 0, 80, 24),
            detail_area: None,
            detail_left: 0.0,
            tooltip: None,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn session(&self) -> &TracingSession {
        &self.session
    }

    fn viewport(&self) -> Viewport {
        Viewport::for_area(self.scroll_x, self.scroll_y, self.canvas_area)
    }

    fn clamp_scroll(&mut self) {
        let viewport = self.viewport();
        let overview = self.session.layout();
        let max_x = (overview.width() - viewport.width).max(0.0);
        let max_y = (overview.height() - viewport.height).max(0.0);
        self.scroll_x = self.scroll_x.clamp(0.0, max_x);
        self.scroll_y = self.scroll_y.clamp(0.0, max_y);
    }

    fn pan(&mut self, direction: f64) {
        self.scroll_x += direction * self.viewport().width / 2.0;
        self.clamp_scroll();
    }

    fn scroll(&mut self, rows: f64) {
        self.scroll_y += rows * PX_PER_ROW;
        self.clamp_scroll();
    }

    /// Zoom through the session, keeping the time at the left edge.
    fn zoom(&mut self, key: char) {
        let before = self.session.zoom().resolution();
        if self.session.handle_key(Key::Char(key)) {
            let after = self.session.zoom().resolution();
            self.scroll_x *= before / after;
            self.clamp_scroll();
            self.tooltip = None;
            debug!("Zoom {}", self.session.zoom());
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyCode) {
        if self.view_mode == ViewMode::Help {
            self.view_mode = ViewMode::Timeline;
            return;
        }
        match key {
            KeyCode::Char('q' | 'Q') => self.should_quit = true,
            KeyCode::Char('?') => self.view_mode = ViewMode::Help,
            KeyCode::Char(c @ ('w' | 's')) => self.zoom(c),
            KeyCode::Char('W') => self.zoom('w'),
            KeyCode::Char('S') => self.zoom('s'),
            KeyCode::Char('a' | 'A') | KeyCode::Left => self.pan(-1.0),
            KeyCode::Char('d' | 'D') | KeyCode::Right => self.pan(1.0),
            KeyCode::Up => self.scroll(-SCROLL_ROWS),
            KeyCode::Down => self.scroll(SCROLL_ROWS),
            KeyCode::Char('h' | 'H') => {
                self.session.toggle_histogram_mode();
                self.tooltip = None;
            }
            KeyCode::Esc => {
                self.session.handle_key(Key::Escape);
            }
            KeyCode::Enter => {
                self.session.handle_key(Key::Enter);
            }
            _ => {}
        }
    }

    /// Overview position under a canvas cell. A cell is taller than the
    /// thinnest panels, so y lands on the middle of the panel content the
    /// cell overlaps, if any.
    fn overview_point(&mut self, column: u16, row: u16) -> Option<(f64, f64)> {
        let (x, top) = self.viewport().cell_to_layout(self.canvas_area, column, row)?;
        let bottom = top + PX_PER_ROW;
        let y = self
            .session
            .layout()
            .panels()
            .iter()
            .find(|p| p.content_top() < bottom && p.bottom() > top)
            .map_or(top + PX_PER_ROW / 2.0, |p| {
                (top.max(p.content_top()) + bottom.min(p.bottom())) / 2.0
            });
        Some((x, y))
    }

    fn in_detail(&self, column: u16, row: u16) -> bool {
        self.detail_area.is_some_and(|area| area.contains((column, row).into()))
    }

    /// Handle mouse input: hover updates the tooltip, a left click drills
    /// into a CPU band or closes the open detail view.
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved => {
                self.tooltip = if let Some(area) = self.detail_area.filter(|_| self.in_detail(column, row)) {
                    let inner = Block::default().borders(Borders::ALL).inner(area);
                    Viewport::for_area(0.0, 0.0, inner)
                        .cell_to_layout(inner, column, row)
                        .and_then(|(x, y)| self.session.detailed_view()?.tooltip_at(x, y))
                } else {
                    self.overview_point(column, row).and_then(|(x, y)| self.session.tooltip_at(x, y))
                };
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if self.in_detail(column, row) {
                    self.session.click(ClickTarget::Detail);
                    return;
                }
                let Some((x, y)) = self.overview_point(column, row) else {
                    return;
                };
                self.session.click(ClickTarget::Overview { x, y });
                self.tooltip = None;
                let width = self.viewport().width;
                if let Some(view) = self.session.detailed_view() {
                    self.detail_left = view.overlay_left(x - self.scroll_x, width);
                }
            }
            MouseEventKind::ScrollDown => self.scroll(SCROLL_ROWS),
            MouseEventKind::ScrollUp => self.scroll(-SCROLL_ROWS),
            _ => {}
        }
    }

    // =========================================================================
    // RENDERING
    // =========================================================================

    fn render(&mut self, f: &mut Frame) {
        let header_rows =
            self.session.models().len().clamp(1, MAX_HEADER_MODELS) as u16 + HEADER_FRAME_ROWS;
        let outer_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(header_rows),
                Constraint::Min(0),
                Constraint::Length(STATUS_ROWS),
            ])
            .split(f.area());

        self.render_header(f, outer_layout[0]);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Timeline ")
            .border_style(Style::new().fg(ACCENT))
            .style(Style::new().bg(BACKGROUND));
        self.canvas_area = block.inner(outer_layout[1]);
        f.render_widget(block, outer_layout[1]);
        self.clamp_scroll();

        let viewport = self.viewport();
        let draw = self.session.draw_list();
        render_draw_list(f, self.canvas_area, &draw, viewport);

        self.detail_area = None;
        if self.session.view_state() == ViewState::DrillDown {
            self.render_detail(f);
        }

        self.render_status(f, outer_layout[2]);

        if self.view_mode == ViewMode::Help {
            let area = f.area();
            render_help_overlay(f, area);
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let mut lines = vec![Line::from(vec![
            Span::styled("ARC TRACING", STYLE_HEADING),
            Span::styled(" | ", STYLE_DIM),
            Span::styled(format!("{} models", self.session.models().len()), STYLE_TEXT),
            Span::styled(" | ", STYLE_DIM),
            Span::styled(format!("zoom {}", self.session.zoom()), STYLE_TEXT),
            Span::styled(" | ", STYLE_DIM),
            Span::styled(format!("histogram by {}", self.session.histogram_mode()), STYLE_TEXT),
        ])];

        for loaded in self.session.models().iter().take(MAX_HEADER_MODELS) {
            let quality = loaded.metrics.render_quality.quality;
            lines.push(Line::from(vec![
                Span::styled("■ ", Style::new().fg(layout_color(loaded.color))),
                Span::styled(format!("{:<24} ", loaded.model.title()), STYLE_TEXT),
                Span::styled(format!("{:>5.1}% ", quality), Style::new().fg(quality_color(quality))),
                Span::styled(loaded.metrics.to_string(), STYLE_DIM),
            ]));
        }

        let header = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).border_style(Style::new().fg(ACCENT)));
        f.render_widget(header, area);
    }

    fn render_detail(&mut self, f: &mut Frame) {
        let Some(view) = self.session.detailed_view() else {
            return;
        };
        let canvas = self.canvas_area;
        if canvas.height < MIN_DETAIL_ROWS || canvas.width < 3 {
            debug!("Canvas {}x{} too small for the detail overlay", canvas.width, canvas.height);
            return;
        }
        let bands = view.event_bands();
        let columns = ((bands.width() / PX_PER_COLUMN).ceil() as u16 + 2).min(canvas.width);
        let rows =
            ((bands.height() / PX_PER_ROW).ceil() as u16 + 2).clamp(MIN_DETAIL_ROWS, canvas.height);
        let left = ((self.detail_left / PX_PER_COLUMN) as u16).min(canvas.width - columns);
        let area = Rect::new(canvas.x + left, canvas.bottom() - rows, columns, rows);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", view.title()))
            .border_style(Style::new().fg(CAUTION_AMBER))
            .style(Style::new().bg(BACKGROUND));
        let inner = block.inner(area);
        f.render_widget(Clear, area);
        f.render_widget(block, area);
        render_draw_list(f, inner, bands.draw_list(), Viewport::for_area(0.0, 0.0, inner));
        self.detail_area = Some(area);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let status_line = match &self.tooltip {
            Some(tooltip) => Line::from(Span::styled(tooltip.text_lines().join("  ·  "), STYLE_TEXT)),
            None => match self.session.view_state() {
                ViewState::Overview => Line::from(vec![
                    Span::styled("Q", STYLE_KEY),
                    Span::styled(":Quit ", STYLE_DIM),
                    Span::styled("W/S", STYLE_KEY),
                    Span::styled(":Zoom ", STYLE_DIM),
                    Span::styled("A/D", STYLE_KEY),
                    Span::styled(":Pan ", STYLE_DIM),
                    Span::styled("H", STYLE_KEY),
                    Span::styled(":Histogram ", STYLE_DIM),
                    Span::styled("Click", STYLE_KEY),
                    Span::styled(":CPU detail ", STYLE_DIM),
                    Span::styled("?", STYLE_KEY),
                    Span::styled(":Help", STYLE_DIM),
                ]),
                ViewState::DrillDown => Line::from(vec![
                    Span::styled("ESC", STYLE_KEY),
                    Span::styled(":Close ", STYLE_DIM),
                    Span::styled("[CPU detail]", STYLE_KEY),
                ]),
            },
        };
        let status = Paragraph::new(vec![status_line])
            .block(Block::default().borders(Borders::ALL).border_style(Style::new().fg(ACCENT)));
        f.render_widget(status, area);
    }

    /// Run the TUI event loop
    ///
    /// # Errors
    /// Returns an error if terminal setup or rendering fails
    pub fn run(mut self) -> Result<()> {
        let mut terminal = setup_terminal().context("Failed to initialize terminal")?;

        let result = self.event_loop(&mut terminal);

        restore_terminal(&mut terminal).context("Failed to restore terminal")?;
        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            let size = terminal.size()?;
            if size.width < MIN_COLUMNS || size.height < MIN_ROWS {
                return Err(TuiError::TerminalError(format!(
                    "terminal is {}x{}, need at least {MIN_COLUMNS}x{MIN_ROWS}",
                    size.width, size.height
                ))
                .into());
            }
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key.code),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<(), TuiError> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

// =============================================================================
// OVERLAY RENDERERS
// =============================================================================

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let popup_area = centered_popup(area, 70, 20);

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled("  What You're Looking At", STYLE_HEADING)),
        Line::from(Span::styled(
            "  Frame rate, jank markers and frame timing per trace, the FPS",
            STYLE_DIM,
        )),
        Line::from(Span::styled(
            "  histogram, per-core CPU activity and system counters.",
            STYLE_DIM,
        )),
        Line::from(""),
        Line::from(Span::styled("  CPU Detail", STYLE_HEADING)),
        Line::from(Span::styled(
            "  Click a CPU band to open processes and threads around that time.",
            STYLE_DIM,
        )),
        Line::from(""),
        Line::from(Span::styled("  Keys", STYLE_HEADING)),
        Line::from(vec![
            Span::styled("  W/S", STYLE_KEY),
            Span::styled(" Zoom   ", STYLE_TEXT),
            Span::styled("A/D", STYLE_KEY),
            Span::styled(" Pan   ", STYLE_TEXT),
            Span::styled("↑↓", STYLE_KEY),
            Span::styled(" Scroll   ", STYLE_TEXT),
            Span::styled("H", STYLE_KEY),
            Span::styled(" Histogram count/time", STYLE_TEXT),
        ]),
        Line::from(vec![
            Span::styled("  Esc/Enter", STYLE_KEY),
            Span::styled(" Close detail   ", STYLE_TEXT),
            Span::styled("Q", STYLE_KEY),
            Span::styled(" Quit", STYLE_TEXT),
        ]),
        Line::from(""),
        Line::from(Span::styled("  Press any key to close", STYLE_DIM)),
    ];

    let help_widget = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(Style::new().bg(ratatui::style::Color::Black).fg(ACCENT)),
    );

    f.render_widget(Clear, popup_area);
    f.render_widget(help_widget, popup_area);
}

/// Create a centered popup area with given width percentage and height in lines
fn centered_popup(area: Rect, width_percent: u16, height_lines: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(height_lines), Constraint::Fill(1)])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_percent) / 2),
            Constraint::Percentage(width_percent),
            Constraint::Percentage((100 - width_percent) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewConfig;
    use crate::trace_data::Model;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    const TRACE: &str = r#"{
        "information": {"title": "game", "timestamp": "1", "duration": 1000000},
        "chrome": {"global_events": [[206, 0], [206, 16000], [206, 33000], [206, 50000]]},
        "system": {
            "cpu": [[[3, 0, 10], [0, 400000], [3, 600000, 10]]],
            "memory": [],
            "threads": {"10": {"pid": 10, "name": "main"}}
        }
    }"#;

    fn app() -> App {
        let mut session = TracingSession::new(ViewConfig::default());
        session.add_model(Model::from_json_str(TRACE).unwrap());
        App::new(session)
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 60)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE }
    }

    /// Terminal cell of overview pixel `(x, y)` at the current scroll.
    fn cell(app: &App, x: f64, y: f64) -> (u16, u16) {
        let area = app.canvas_area;
        (
            area.x + ((x - app.scroll_x) / PX_PER_COLUMN) as u16,
            area.y + ((y - app.scroll_y) / PX_PER_ROW) as u16,
        )
    }

    #[test]
    fn test_quit_key() {
        let mut app = app();
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let mut app = app();
        app.handle_key(KeyCode::Char('?'));
        assert_eq!(app.view_mode, ViewMode::Help);
        app.handle_key(KeyCode::Char('q'));
        assert_eq!(app.view_mode, ViewMode::Timeline);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_zoom_keys_reach_session() {
        let mut app = app();
        let level = app.session().zoom().level();
        app.handle_key(KeyCode::Char('w'));
        assert_eq!(app.session().zoom().level(), level - 1);
        app.handle_key(KeyCode::Char('S'));
        assert_eq!(app.session().zoom().level(), level);
    }

    #[test]
    fn test_pan_is_clamped() {
        let mut app = app();
        draw(&mut app);
        app.handle_key(KeyCode::Char('a'));
        assert!(app.scroll_x.abs() < f64::EPSILON);

        // 1 s at 100 µs/px is far wider than the canvas.
        app.handle_key(KeyCode::Char('d'));
        assert!(app.scroll_x > 0.0);
        for _ in 0..100 {
            app.handle_key(KeyCode::Char('d'));
        }
        let max = app.session.layout().width() - app.viewport().width;
        assert!((app.scroll_x - max).abs() < 1e-6);
    }

    #[test]
    fn test_histogram_toggle() {
        let mut app = app();
        let mode = app.session().histogram_mode();
        app.handle_key(KeyCode::Char('h'));
        assert_eq!(app.session().histogram_mode(), mode.toggled());
    }

    #[test]
    fn test_render_shows_title_and_hints() {
        let mut app = app();
        let screen = draw(&mut app);
        assert!(screen.contains("ARC TRACING"));
        assert!(screen.contains("game"));
        assert!(screen.contains(":Zoom"));
    }

    #[test]
    fn test_click_on_cpu_band_opens_detail_and_escape_closes() {
        let mut app = app();
        draw(&mut app);
        let cpu_panel = app
            .session
            .layout()
            .panels()
            .iter()
            .find(|p| p.title.starts_with("CPU"))
            .map(|p| p.content_top())
            .unwrap();
        let (column, row) = cell(&app, 200.0, cpu_panel + 4.0);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), column, row));
        assert_eq!(app.session().view_state(), ViewState::DrillDown);

        let screen = draw(&mut app);
        assert!(screen.contains("CPU view."));
        assert!(app.detail_area.is_some());

        app.handle_key(KeyCode::Esc);
        assert_eq!(app.session().view_state(), ViewState::Overview);
    }

    #[test]
    fn test_click_inside_detail_keeps_it_open() {
        let mut app = app();
        draw(&mut app);
        let cpu_panel = app
            .session
            .layout()
            .panels()
            .iter()
            .find(|p| p.title.starts_with("CPU"))
            .map(|p| p.content_top())
            .unwrap();
        let (column, row) = cell(&app, 200.0, cpu_panel + 4.0);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), column, row));
        draw(&mut app);

        let area = app.detail_area.unwrap();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), area.x + 1, area.y + 1));
        assert_eq!(app.session().view_state(), ViewState::DrillDown);
    }

    #[test]
    fn test_detail_overlay_fits_smallest_terminal() {
        let mut session = TracingSession::new(ViewConfig::default());
        for _ in 0..MAX_HEADER_MODELS {
            session.add_model(Model::from_json_str(TRACE).unwrap());
        }
        let mut app = App::new(session);
        draw(&mut app);
        let cpu_panel = app
            .session
            .layout()
            .panels()
            .iter()
            .find(|p| p.title.starts_with("CPU"))
            .map(|p| p.content_top())
            .unwrap();
        let (column, row) = cell(&app, 200.0, cpu_panel + 4.0);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), column, row));
        assert_eq!(app.session().view_state(), ViewState::DrillDown);

        let mut terminal = Terminal::new(TestBackend::new(MIN_COLUMNS, MIN_ROWS)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        assert!(app.canvas_area.height >= MIN_DETAIL_ROWS);
        let area = app.detail_area.unwrap();
        assert!(area.height >= MIN_DETAIL_ROWS);
        assert!(area.bottom() <= app.canvas_area.bottom());
        assert!(area.right() <= app.canvas_area.right());

        // Below the minimum the overlay is skipped instead of overflowing.
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        assert!(app.detail_area.is_none());
        assert_eq!(app.session().view_state(), ViewState::DrillDown);
    }

    #[test]
    fn test_hover_sets_tooltip_in_status_bar() {
        let mut app = app();
        draw(&mut app);
        let (column, row) = cell(&app, 0.0, 0.0);
        app.handle_mouse(mouse(MouseEventKind::Moved, column + 1, row + 3));
        // Hovering the canvas never panics; an empty spot leaves hints.
        let screen = draw(&mut app);
        assert!(screen.contains("ARC TRACING"));
    }
}
