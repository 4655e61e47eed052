//! Domain model for arc-tracing
//!
//! This module contains core domain types and errors that provide:
//! - Compile-time safety via newtype pattern
//! - Self-documenting function signatures
//! - Structured error handling

pub mod errors;
pub mod types;

// Re-export common types for convenience
pub use types::{timestamp_to_ms_text, CpuId, ModelId, Pid, Tid, Zoom, DEFAULT_ZOOM_LEVEL, ZOOMS};

pub use errors::{CaptureError, ConfigError, ExportError, TraceError, TuiError};
