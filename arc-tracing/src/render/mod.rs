//! Timeline layout
//!
//! [`EventBands`] turns event series into declarative draw commands on a
//! [`DrawingSurface`]; [`overview`] composes the session panels from it and
//! [`svg`] serializes a finished draw list.

pub mod bands;
pub mod chart;
pub mod overview;
pub mod surface;
pub mod svg;
pub mod tooltip;

pub use bands::{BandArea, BandView, EventBands, GlobalRender};
pub use chart::{Chart, ChartSource};
pub use overview::{Overview, OverviewModel, Panel, PanelView};
pub use surface::{DrawCommand, DrawList, DrawingSurface, TextAnchor};
pub use tooltip::{Tooltip, TooltipLine};
