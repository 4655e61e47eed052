//! Structured error types for arc-tracing
//!
//! Using thiserror for automatic Display implementation and error chaining.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Failed to read trace file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse trace JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid trace data: {0}")]
    InvalidTrace(String),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No models loaded, nothing to export")]
    NoModels,

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Number of frames must be positive, got {0}")]
    InvalidFrameCount(i64),

    #[error("Capture interval must be positive, got {0} ms")]
    InvalidInterval(i64),

    #[error("Frame {index} capture failed: {reason}")]
    FrameFailed { index: usize, reason: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

#[derive(Error, Debug)]
pub enum TuiError {
    #[error("Terminal error: {0}")]
    TerminalError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_error_display() {
        let err = CaptureError::InvalidFrameCount(0);
        assert_eq!(err.to_string(), "Number of frames must be positive, got 0");
        let err = CaptureError::InvalidInterval(-5);
        assert!(err.to_string().contains("-5 ms"));
    }

    #[test]
    fn test_trace_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ invalid").unwrap_err();
        let err = TraceError::from(json_err);
        assert!(err.to_string().starts_with("Failed to parse trace JSON"));
    }
}
