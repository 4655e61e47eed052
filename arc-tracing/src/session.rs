//! Tracing session: loaded models and the interactive view state
//!
//! The session owns every model, its color and cached metrics, the zoom
//! level and the open detail view. Mutations mark the layout dirty; the
//! next [`TracingSession::layout`] rebuilds the overview from scratch.

use std::sync::Arc;

use log::{debug, info};

use crate::analysis::{HistogramMode, ModelMetrics};
use crate::config::ViewConfig;
use crate::domain::{ModelId, Zoom};
use crate::drilldown::CpuDetailedView;
use crate::render::{DrawList, Overview, OverviewModel, Tooltip};
use crate::trace_data::Model;

/// Colors handed out to models, in preference order after hashing.
pub const MODEL_COLORS: [&str; 8] = [
    "#5c6bc0", "#ef6c00", "#2e7d32", "#c2185b", "#00838f", "#6d4c41", "#9e9d24", "#7b1fa2",
];

/// Color once every palette entry is taken.
pub const FALLBACK_COLOR: &str = "#757575";

/// A model with what the session derived from it.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub id: ModelId,
    pub model: Arc<Model>,
    pub color: &'static str,
    pub metrics: ModelMetrics,
}

/// Key presses the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    Enter,
}

/// Where a click landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickTarget {
    /// Overview pixel.
    Overview { x: f64, y: f64 },
    /// Anywhere inside the open detail view.
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Overview,
    DrillDown,
}

/// Palette index for a capture timestamp.
fn color_hash(timestamp: &str) -> usize {
    let hash = timestamp
        .bytes()
        .fold(0u32, |hash, b| hash.wrapping_mul(31).wrapping_add(u32::from(b)));
    hash as usize % MODEL_COLORS.len()
}

#[derive(Debug)]
pub struct TracingSession {
    config: ViewConfig,
    models: Vec<LoadedModel>,
    next_id: u64,
    zoom: Zoom,
    histogram_mode: HistogramMode,
    overview: Overview,
    detail: Option<CpuDetailedView>,
    dirty: bool,
}

impl TracingSession {
    #[must_use]
    pub fn new(config: ViewConfig) -> Self {
        Self {
            zoom: config.zoom(),
            config,
            models: Vec::new(),
            next_id: 0,
            histogram_mode: HistogramMode::default(),
            overview: Overview::default(),
            detail: None,
            dirty: true,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    #[must_use]
    pub fn models(&self) -> &[LoadedModel] {
        &self.models
    }

    #[must_use]
    pub fn model(&self, id: ModelId) -> Option<&LoadedModel> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Hash of the capture timestamp into the palette, else the first free
    /// palette color, else [`FALLBACK_COLOR`].
    fn assign_color(&self, model: &Model) -> &'static str {
        let taken = |color: &str| self.models.iter().any(|m| m.color == color);
        let preferred = MODEL_COLORS[color_hash(&model.information.timestamp)];
        if !taken(preferred) {
            return preferred;
        }
        MODEL_COLORS.into_iter().find(|&c| !taken(c)).unwrap_or(FALLBACK_COLOR)
    }

    /// Take ownership of `model`. Returns its id.
    pub fn add_model(&mut self, model: Model) -> ModelId {
        let id = ModelId(self.next_id);
        self.next_id += 1;
        let color = self.assign_color(&model);
        let metrics = ModelMetrics::compute(&model, &self.config);
        info!("Added {id} \"{}\" in {color}: {metrics}", model.title());
        self.models.push(LoadedModel { id, model: Arc::new(model), color, metrics });
        self.invalidate();
        id
    }

    /// Drop a model and free its color. Returns false for an unknown id.
    pub fn remove_model(&mut self, id: ModelId) -> bool {
        let Some(position) = self.models.iter().position(|m| m.id == id) else {
            return false;
        };
        let removed = self.models.remove(position);
        info!("Removed {id} \"{}\"", removed.model.title());
        self.invalidate();
        true
    }

    #[must_use]
    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    /// One zoom level closer. Returns false at the closest level.
    pub fn zoom_in(&mut self) -> bool {
        self.update_zoom(Zoom::zoom_in)
    }

    /// One zoom level farther. Returns false at the farthest level.
    pub fn zoom_out(&mut self) -> bool {
        self.update_zoom(Zoom::zoom_out)
    }

    fn update_zoom(&mut self, step: fn(&mut Zoom) -> bool) -> bool {
        if !step(&mut self.zoom) {
            debug!("Zoom level {} is already at the end of the table", self.zoom.level());
            return false;
        }
        debug!("Zoom now {}", self.zoom);
        self.invalidate();
        true
    }

    #[must_use]
    pub fn histogram_mode(&self) -> HistogramMode {
        self.histogram_mode
    }

    pub fn toggle_histogram_mode(&mut self) {
        self.histogram_mode = self.histogram_mode.toggled();
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.discard_detailed_info();
        self.dirty = true;
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Current overview, rebuilt first when anything changed.
    pub fn layout(&mut self) -> &Overview {
        if self.dirty {
            let models: Vec<OverviewModel<'_>> = self
                .models
                .iter()
                .map(|m| OverviewModel { model: &m.model, color: m.color, metrics: &m.metrics })
                .collect();
            self.overview =
                Overview::build(&models, self.zoom.resolution(), &self.config, self.histogram_mode);
            self.dirty = false;
        }
        &self.overview
    }

    #[must_use]
    pub fn view_state(&self) -> ViewState {
        if self.detail.is_some() {
            ViewState::DrillDown
        } else {
            ViewState::Overview
        }
    }

    #[must_use]
    pub fn detailed_view(&self) -> Option<&CpuDetailedView> {
        self.detail.as_ref()
    }

    /// Close the detail view, if one is open.
    pub fn discard_detailed_info(&mut self) {
        if let Some(view) = self.detail.take() {
            match self.overview.selected_cpu_bands_mut() {
                Some(cpu) => view.discard(cpu),
                None => debug!("Detail view closed without an overview highlight"),
            }
        }
    }

    /// `w`/`s` zoom, `Escape`/`Enter` close the detail view. Returns true
    /// when the key was handled.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Escape | Key::Enter => {
                self.discard_detailed_info();
                true
            }
            Key::Char('w') => self.zoom_in(),
            Key::Char('s') => self.zoom_out(),
            Key::Char(_) => false,
        }
    }

    /// A click on a CPU band opens its detail view, replacing any open one.
    /// A click anywhere else outside the detail view closes it.
    pub fn click(&mut self, target: ClickTarget) {
        let ClickTarget::Overview { x, y } = target else {
            return;
        };
        self.layout();
        self.discard_detailed_info();
        let Some(index) = self.overview.panel_at(y) else {
            return;
        };
        if let Some(cpu) = self.overview.cpu_bands_mut(index) {
            let view = cpu.show_detailed_info(x, &self.config);
            info!("Drill-down into [{}, {})", view.min_timestamp(), view.max_timestamp());
            self.detail = Some(view);
        }
    }

    /// Tooltip at overview pixel `(x, y)`.
    pub fn tooltip_at(&mut self, x: f64, y: f64) -> Option<Tooltip> {
        self.layout().tooltip_at(x, y)
    }

    /// Draw list of the overview, including the detail highlight.
    pub fn draw_list(&mut self) -> DrawList {
        self.layout().draw_list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PanelView;

    fn trace(timestamp: &str) -> Model {
        let json = format!(
            r#"{{
                "information": {{"title": "t{timestamp}", "timestamp": "{timestamp}", "duration": 100000}},
                "system": {{"cpu": [[[3, 0, 10], [1, 0], [0, 50000]]], "memory": [],
                            "threads": {{"10": {{"pid": 10, "name": "main"}}}}}}
            }}"#
        );
        Model::from_json_str(&json).unwrap()
    }

    fn session() -> TracingSession {
        TracingSession::new(ViewConfig::default())
    }

    #[test]
    fn test_color_comes_from_timestamp_hash() {
        let mut s = session();
        let id = s.add_model(trace("1"));
        assert_eq!(s.model(id).unwrap().color, MODEL_COLORS[color_hash("1")]);
    }

    #[test]
    fn test_colliding_hash_takes_first_free() {
        let mut s = session();
        let a = s.add_model(trace("7"));
        let b = s.add_model(trace("7"));
        let color_a = s.model(a).unwrap().color;
        let color_b = s.model(b).unwrap().color;
        assert_ne!(color_a, color_b);
        let first_free = MODEL_COLORS.into_iter().find(|&c| c != color_a).unwrap();
        assert_eq!(color_b, first_free);
    }

    #[test]
    fn test_palette_exhaustion_falls_back() {
        let mut s = session();
        for _ in 0..MODEL_COLORS.len() {
            s.add_model(trace("x"));
        }
        let extra = s.add_model(trace("x"));
        assert_eq!(s.model(extra).unwrap().color, FALLBACK_COLOR);
    }

    #[test]
    fn test_remove_frees_color() {
        let mut s = session();
        let a = s.add_model(trace("7"));
        let color = s.model(a).unwrap().color;
        assert!(s.remove_model(a));
        assert!(!s.remove_model(a));
        let b = s.add_model(trace("7"));
        assert_eq!(s.model(b).unwrap().color, color);
        assert_ne!(a, b);
    }

    #[test]
    fn test_add_and_remove_mark_dirty() {
        let mut s = session();
        s.layout();
        assert!(!s.is_dirty());
        let id = s.add_model(trace("1"));
        assert!(s.is_dirty());
        // No value samples, so no system panel.
        assert_eq!(s.layout().panels().len(), 4);
        s.remove_model(id);
        assert!(s.is_dirty());
        assert!(s.layout().panels().is_empty());
    }

    #[test]
    fn test_zoom_keys_are_bounded() {
        let mut s = session();
        assert!(s.handle_key(Key::Char('w')));
        assert_eq!(s.zoom().resolution(), 50.0);
        for _ in 0..10 {
            s.handle_key(Key::Char('w'));
        }
        assert_eq!(s.zoom().level(), 0);
        assert!(!s.handle_key(Key::Char('w')));
        assert!(s.handle_key(Key::Char('s')));
        assert!(!s.handle_key(Key::Char('x')));
    }

    #[test]
    fn test_zoom_steps_invalidate_layout() {
        let mut s = session();
        s.layout();
        assert!(s.zoom_out());
        assert_eq!(s.zoom().resolution(), 250.0);
        assert!(s.is_dirty());
        s.layout();
        assert!(s.zoom_in());
        assert_eq!(s.zoom().resolution(), 100.0);
        assert!(s.is_dirty());
    }

    fn cpu_panel_y(s: &mut TracingSession) -> f64 {
        let overview = s.layout();
        let panel = overview
            .panels()
            .iter()
            .find(|p| matches!(p.view, PanelView::Cpu(_)))
            .unwrap();
        panel.content_top() + 1.0
    }

    #[test]
    fn test_click_on_cpu_band_opens_drill_down() {
        let mut s = session();
        s.add_model(trace("1"));
        let y = cpu_panel_y(&mut s);
        s.click(ClickTarget::Overview { x: 100.0, y });
        assert_eq!(s.view_state(), ViewState::DrillDown);
        assert_eq!(s.detailed_view().unwrap().center(), 10_000);
        let highlighted = s.draw_list().len();

        // Clicks inside the detail view keep it open.
        s.click(ClickTarget::Detail);
        assert_eq!(s.view_state(), ViewState::DrillDown);

        assert!(s.handle_key(Key::Escape));
        assert_eq!(s.view_state(), ViewState::Overview);
        assert_eq!(s.draw_list().len(), highlighted - 1);
    }

    #[test]
    fn test_click_elsewhere_dismisses() {
        let mut s = session();
        s.add_model(trace("1"));
        let y = cpu_panel_y(&mut s);
        s.click(ClickTarget::Overview { x: 100.0, y });
        s.click(ClickTarget::Overview { x: 100.0, y: 1.0 });
        assert_eq!(s.view_state(), ViewState::Overview);
    }

    #[test]
    fn test_zoom_closes_drill_down() {
        let mut s = session();
        s.add_model(trace("1"));
        let y = cpu_panel_y(&mut s);
        s.click(ClickTarget::Overview { x: 100.0, y });
        s.handle_key(Key::Char('s'));
        assert_eq!(s.view_state(), ViewState::Overview);
        assert!(s.is_dirty());
    }
}
