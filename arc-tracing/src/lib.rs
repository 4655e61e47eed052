//! # ARC Tracing - Graphics Trace Timeline Analyzer
//!
//! Loads ARC graphics traces (Chrome compositor, Android view buffers, CPU
//! scheduling and system counters captured together) and turns them into
//! frame-rate metrics and a zoomable event-band timeline.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Trace JSON (per capture)                    │
//! └───────────────────────┬─────────────────────────────────────────┘
//!                         │ serde
//!                         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  trace_data::Model  ──▶  series::EventSeries (filtered views)   │
//! │                               │                                 │
//! │          ┌────────────────────┼────────────────────┐            │
//! │          ▼                    ▼                    ▼            │
//! │  ┌──────────────┐     ┌──────────────┐     ┌──────────────┐     │
//! │  │   Analysis   │     │    Render    │     │    Export    │     │
//! │  │ FPS, quality │     │ bands/charts │     │ frame times  │     │
//! │  │  histogram   │     │  draw lists  │     │    (CSV)     │     │
//! │  └──────────────┘     └──────┬───────┘     └──────────────┘     │
//! │                              │                                  │
//! │                   session::TracingSession                       │
//! │                 (models, zoom, CPU drill-down)                  │
//! │                              │                                  │
//! │               ┌──────────────┴──────────────┐                   │
//! │               ▼                             ▼                   │
//! │        ┌──────────────┐             ┌──────────────┐            │
//! │        │     TUI      │             │     SVG      │            │
//! │        │  (ratatui)   │             │   writer     │            │
//! │        └──────────────┘             └──────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! ### Data
//!
//! - [`trace_data`]: Trace JSON parsing; buffers merged into one sorted list
//! - [`series`]: Type-filtered navigation over a sorted event list
//! - [`sequence`]: Sequence tables classifying events as begin/end of a run
//! - [`attributes`]: Per-type colors, names and chart scaling
//! - [`domain`]: Core types (`Pid`, `Tid`, `ModelId`, `Zoom`) and errors
//!
//! ### Analysis and Layout
//!
//! - [`analysis`]: FPS, render quality, FPS histogram, average power
//! - [`render`]: Event bands, charts, tooltips and the session overview,
//!   all issued through a [`render::DrawingSurface`]
//! - [`drilldown`]: CPU bands and the per-process detail view
//! - [`session`]: Loaded models, colors, zoom and view state
//!
//! ### Front Ends
//!
//! - [`tui`]: Terminal viewer
//! - [`export`]: Frame-time CSV
//! - [`capture`]: Paced frame capture and palindromic loops. Library-only
//!   helpers for embedders that grab preview frames; the binary never
//!   captures
//! - [`cli`]: Command-line arguments
//! - [`config`]: TOML viewer configuration
//!
//! ## Typical Usage
//!
//! ```bash
//! # Browse a trace interactively
//! arc-tracing game.json
//!
//! # Compare two captures and export their frame times
//! arc-tracing before.json after.json --headless --export-frame-times frames.csv
//! ```
//!
//! ## Key Concepts
//!
//! - **Commit**: the app handing a new frame to the compositor
//! - **Jank**: a frame that missed its expected presentation time
//! - **Render quality**: 10th over 90th percentile of commit intervals;
//!   100% means perfectly even frame pacing
//! - **Band**: one row of the timeline; runs of begin/end events become bars

// Expose modules for testing
pub mod analysis;
pub mod attributes;
pub mod capture;
pub mod cli;
pub mod config;
pub mod domain;
pub mod drilldown;
pub mod export;
pub mod render;
pub mod sequence;
pub mod series;
pub mod session;
pub mod trace_data;
pub mod tui;
