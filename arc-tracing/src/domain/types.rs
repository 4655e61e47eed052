//! Domain types providing compile-time safety and self-documentation
//!
//! These newtype wrappers prevent common bugs like passing a TID where a
//! PID is expected, and make function signatures more expressive.

use std::fmt;

/// Process ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid(pub u32);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// Thread ID
///
/// Reported by per-core `Active` CPU events. Tid 0 is the idle task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tid(pub u32);

impl Tid {
    /// Returns true for the idle task.
    #[must_use]
    pub fn is_idle(self) -> bool {
        self.0 == arc_tracing_common::IDLE_TID
    }
}

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TID:{}", self.0)
    }
}

/// CPU core index into `system.cpu`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CpuId(pub usize);

impl fmt::Display for CpuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CPU:{}", self.0)
    }
}

/// Stable id of a model loaded into a session. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub u64);

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "model#{}", self.0)
    }
}

/// Supported zooms, microseconds per pixel.
pub const ZOOMS: [f64; 13] = [
    2.5, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 25000.0,
];

/// Default zoom level, 100 µs per pixel.
pub const DEFAULT_ZOOM_LEVEL: usize = 5;

/// Discrete zoom level, an index into [`ZOOMS`].
///
/// Lower levels are closer (fewer microseconds per pixel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zoom(usize);

impl Zoom {
    /// Create a zoom at `level`, clamped to the table.
    #[must_use]
    pub fn new(level: usize) -> Self {
        Self(level.min(ZOOMS.len() - 1))
    }

    #[must_use]
    pub fn level(self) -> usize {
        self.0
    }

    /// Microseconds per pixel at this level.
    #[must_use]
    pub fn resolution(self) -> f64 {
        ZOOMS[self.0]
    }

    /// Moves by `delta` levels. Returns false and stays put when the target
    /// level is outside the table.
    fn adjust(&mut self, delta: isize) -> bool {
        match self.0.checked_add_signed(delta) {
            Some(level) if level < ZOOMS.len() => {
                self.0 = level;
                true
            }
            _ => false,
        }
    }

    /// One level closer.
    pub fn zoom_in(&mut self) -> bool {
        self.adjust(-1)
    }

    /// One level farther.
    pub fn zoom_out(&mut self) -> bool {
        self.adjust(1)
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self(DEFAULT_ZOOM_LEVEL)
    }
}

impl fmt::Display for Zoom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} µs/px", self.resolution())
    }
}

/// Text representation of a microsecond timestamp in milliseconds with one
/// digit after the decimal point.
#[must_use]
pub fn timestamp_to_ms_text(timestamp: f64) -> String {
    format!("{:.1}", timestamp / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_display() {
        assert_eq!(Pid(1234).to_string(), "<1234>");
        assert_eq!(Tid(7).to_string(), "TID:7");
    }

    #[test]
    fn test_idle_tid() {
        assert!(Tid(0).is_idle());
        assert!(!Tid(12).is_idle());
    }

    #[test]
    fn test_zoom_default_resolution() {
        let zoom = Zoom::default();
        assert_eq!(zoom.level(), 5);
        assert_eq!(zoom.resolution(), 100.0);
    }

    #[test]
    fn test_zoom_bounds() {
        let mut zoom = Zoom::new(0);
        assert!(!zoom.zoom_in());
        assert_eq!(zoom.level(), 0);
        assert!(zoom.zoom_out());
        assert_eq!(zoom.resolution(), 5.0);

        let mut zoom = Zoom::new(100);
        assert_eq!(zoom.level(), 12);
        assert!(!zoom.zoom_out());
        assert_eq!(zoom.resolution(), 25000.0);
    }

    #[test]
    fn test_timestamp_to_ms_text() {
        assert_eq!(timestamp_to_ms_text(16667.0), "16.7");
        assert_eq!(timestamp_to_ms_text(0.0), "0.0");
    }
}
