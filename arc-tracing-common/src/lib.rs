//! # Shared Event Type Catalogue (Producer ↔ Analyzer)
//!
//! Numeric event type ids used in the ARC graphics trace JSON. The producer
//! writes them as the first element of every `[type, timestamp, value?]`
//! tuple; the analyzer reads them back through the closed enums below.
//!
//! Ids must never be renumbered once added. Deprecation and removal are
//! allowed, so an id read from a trace may not map to any variant: every
//! lookup goes through `from_id` and returns `Option`.
//!
//! ## Id Spaces
//!
//! The three catalogues overlap numerically and are only meaningful for the
//! event list they come from:
//!
//! - [`GraphicsEventType`] - `graphics_events` (frame pipeline, jank, marks)
//! - [`CpuEventType`] - `system.cpu[core]` lists
//! - [`ValueEventType`] - `system.memory` counter samples

#![no_std]

// ============================================================================
// Graphics Events
// ============================================================================

/// Frame pipeline event as recorded in `graphics_events`.
///
/// Grouped by producer: buffer queue (1xx), Exo surface (2xx), Chrome
/// barrier (3xx), `SurfaceFlinger` (4xx), Chrome OS compositor (5xx),
/// custom (6xx) and service events (10000+).
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GraphicsEventType {
    /// Timeline goes idle. Always terminates a sequence.
    IdleIn = 0,
    /// Timeline leaves idle.
    IdleOut = 1,

    BufferQueueDequeueStart = 100,
    BufferQueueDequeueDone = 101,
    BufferQueueQueueStart = 102,
    BufferQueueQueueDone = 103,
    BufferQueueAcquire = 104,
    BufferQueueReleased = 105,
    BufferFillJank = 106,

    /// Wayland surface commit: the app hands a finished frame to Exo.
    ExoSurfaceCommit = 206,
    /// Commit arrived later than expected.
    ExoSurfaceCommitJank = 207,

    ChromeBarrierOrder = 300,
    ChromeBarrierFlush = 301,

    SurfaceFlingerInvalidationStart = 401,
    SurfaceFlingerInvalidationDone = 402,
    SurfaceFlingerCompositionStart = 403,
    SurfaceFlingerCompositionDone = 404,

    ChromeOSDraw = 500,
    ChromeOSSwap = 501,
    ChromeOSWaitForAck = 502,
    ChromeOSPresentationDone = 503,
    ChromeOSSwapDone = 504,
    ChromeOSJank = 505,
    ChromeOSPerceivedJank = 506,
    ChromeOSSwapJank = 507,

    CustomEvent = 600,

    /// Vertical guide line drawn by the analyzer itself.
    TimeMark = 10000,
    TimeMarkSmall = 10001,
}

impl GraphicsEventType {
    /// Maps a raw id from the trace to a known type.
    #[must_use]
    pub const fn from_id(id: u32) -> Option<Self> {
        Some(match id {
            0 => Self::IdleIn,
            1 => Self::IdleOut,
            100 => Self::BufferQueueDequeueStart,
            101 => Self::BufferQueueDequeueDone,
            102 => Self::BufferQueueQueueStart,
            103 => Self::BufferQueueQueueDone,
            104 => Self::BufferQueueAcquire,
            105 => Self::BufferQueueReleased,
            106 => Self::BufferFillJank,
            206 => Self::ExoSurfaceCommit,
            207 => Self::ExoSurfaceCommitJank,
            300 => Self::ChromeBarrierOrder,
            301 => Self::ChromeBarrierFlush,
            401 => Self::SurfaceFlingerInvalidationStart,
            402 => Self::SurfaceFlingerInvalidationDone,
            403 => Self::SurfaceFlingerCompositionStart,
            404 => Self::SurfaceFlingerCompositionDone,
            500 => Self::ChromeOSDraw,
            501 => Self::ChromeOSSwap,
            502 => Self::ChromeOSWaitForAck,
            503 => Self::ChromeOSPresentationDone,
            504 => Self::ChromeOSSwapDone,
            505 => Self::ChromeOSJank,
            506 => Self::ChromeOSPerceivedJank,
            507 => Self::ChromeOSSwapJank,
            600 => Self::CustomEvent,
            10000 => Self::TimeMark,
            10001 => Self::TimeMarkSmall,
            _ => return None,
        })
    }

    /// Raw id as written to the trace.
    #[must_use]
    pub const fn id(self) -> u32 {
        self as u32
    }
}

// ============================================================================
// CPU Events
// ============================================================================

/// Per-core scheduling event as recorded in `system.cpu[core]`.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CpuEventType {
    /// Core goes idle.
    IdleIn = 0,
    /// Core wakes up.
    IdleOut = 1,
    /// Core switched to the thread whose tid is the event value (0 = idle).
    Active = 3,
}

impl CpuEventType {
    #[must_use]
    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(Self::IdleIn),
            1 => Some(Self::IdleOut),
            3 => Some(Self::Active),
            _ => None,
        }
    }

    #[must_use]
    pub const fn id(self) -> u32 {
        self as u32
    }
}

/// Thread id reported by [`CpuEventType::Active`] when the core runs nothing.
pub const IDLE_TID: u32 = 0;

// ============================================================================
// Value Events
// ============================================================================

/// Counter sample as recorded in `system.memory`. The event value is the raw
/// reading in the unit named on each variant.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueEventType {
    /// Used memory, KB.
    MemUsed = 1,
    /// Swap sectors read.
    SwapRead = 2,
    /// Swap sectors written.
    SwapWrite = 3,
    /// GEM object count.
    GemObjects = 5,
    /// GEM object total size, KB.
    GemSize = 6,
    /// GPU frequency, MHz.
    GpuFrequency = 7,
    /// CPU temperature, millidegrees Celsius.
    CpuTemperature = 8,
    /// CPU frequency, KHz.
    CpuFrequency = 9,
    /// CPU power, milliwatts.
    CpuPower = 10,
    /// GPU power, milliwatts.
    GpuPower = 11,
    /// Memory power, milliwatts.
    MemoryPower = 12,
    /// Package power constraint, milliwatts.
    PackagePowerConstraint = 13,
}

impl ValueEventType {
    #[must_use]
    pub const fn from_id(id: u32) -> Option<Self> {
        Some(match id {
            1 => Self::MemUsed,
            2 => Self::SwapRead,
            3 => Self::SwapWrite,
            5 => Self::GemObjects,
            6 => Self::GemSize,
            7 => Self::GpuFrequency,
            8 => Self::CpuTemperature,
            9 => Self::CpuFrequency,
            10 => Self::CpuPower,
            11 => Self::GpuPower,
            12 => Self::MemoryPower,
            13 => Self::PackagePowerConstraint,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn id(self) -> u32 {
        self as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphics_round_trip_known_ids() {
        for id in [0, 1, 103, 206, 207, 404, 500, 503, 504, 600, 10000] {
            let kind = GraphicsEventType::from_id(id).unwrap();
            assert_eq!(kind.id(), id);
        }
    }

    #[test]
    fn test_unknown_ids_are_none() {
        assert_eq!(GraphicsEventType::from_id(2), None);
        assert_eq!(CpuEventType::from_id(2), None);
        assert_eq!(ValueEventType::from_id(4), None);
    }

    #[test]
    fn test_value_ids() {
        assert_eq!(ValueEventType::CpuPower.id(), 10);
        assert_eq!(ValueEventType::from_id(7), Some(ValueEventType::GpuFrequency));
        assert_eq!(CpuEventType::Active.id(), 3);
    }
}
