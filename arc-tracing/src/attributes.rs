//! Render attributes per event type
//!
//! Lookup tables keyed by the closed enums from `arc_tracing_common`. An id
//! with no entry returns `None` and callers fall back to their default
//! rendering.

use arc_tracing_common::{GraphicsEventType, ValueEventType};

/// Background color of a band, also used for the idle state.
pub const BAND_COLOR: &str = "#d3d3d3";

/// Color that should never appear on screen. Marks types that only close a
/// sequence and therefore never start a colored run.
pub const UNUSED_COLOR: &str = "#ff0000";

/// How a graphics event is drawn: fill `color`, tooltip `name`, `width` when
/// drawn as a line and `radius` when drawn as a circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventAttributes {
    pub color: Option<&'static str>,
    pub name: &'static str,
    pub width: Option<f64>,
    pub radius: Option<f64>,
}

impl EventAttributes {
    const fn colored(color: &'static str, name: &'static str) -> Self {
        Self { color: Some(color), name, width: None, radius: None }
    }

    const fn marker(color: Option<&'static str>, name: &'static str, radius: f64) -> Self {
        Self { color, name, width: Some(1.0), radius: Some(radius) }
    }

    /// Fill color, or [`UNUSED_COLOR`] when the type has none.
    #[must_use]
    pub fn color_or_unused(&self) -> &'static str {
        self.color.unwrap_or(UNUSED_COLOR)
    }
}

/// Render attributes for a graphics event id.
#[must_use]
pub fn event_attributes(kind: u32) -> Option<EventAttributes> {
    use GraphicsEventType as T;

    let kind = GraphicsEventType::from_id(kind)?;
    Some(match kind {
        T::IdleIn => EventAttributes::colored(BAND_COLOR, "idle"),
        T::IdleOut => EventAttributes::colored("#ffbf00", "active"),

        T::BufferQueueDequeueStart => EventAttributes::colored("#99cc00", "app requests buffer"),
        T::BufferQueueDequeueDone => EventAttributes::colored("#669999", "app fills buffer"),
        T::BufferQueueQueueStart => EventAttributes::colored("#cccc00", "app queues buffer"),
        T::BufferQueueQueueDone => EventAttributes::colored(UNUSED_COLOR, "buffer is queued"),
        T::BufferQueueAcquire => EventAttributes::colored("#66ffcc", "use buffer"),
        T::BufferQueueReleased => EventAttributes::colored(UNUSED_COLOR, "buffer released"),
        T::BufferFillJank => {
            EventAttributes::marker(Some("#ff0000"), "buffer filling jank", 4.0)
        }

        T::ExoSurfaceCommit => EventAttributes::colored("#5c6bc0", "commit"),
        T::ExoSurfaceCommitJank => EventAttributes {
            color: None,
            name: "commit jank",
            width: None,
            radius: Some(4.0),
        },

        T::ChromeBarrierOrder => EventAttributes::colored("#ff9933", "barrier order"),
        T::ChromeBarrierFlush => EventAttributes::colored(UNUSED_COLOR, "barrier flush"),

        T::SurfaceFlingerInvalidationStart => {
            EventAttributes::colored("#ff9933", "invalidation start")
        }
        T::SurfaceFlingerInvalidationDone => {
            EventAttributes::colored(UNUSED_COLOR, "invalidation done")
        }
        T::SurfaceFlingerCompositionStart => {
            EventAttributes::colored("#3399ff", "composition start")
        }
        T::SurfaceFlingerCompositionDone => {
            EventAttributes::colored(UNUSED_COLOR, "composition done")
        }

        T::ChromeOSDraw => EventAttributes::colored("#3399ff", "draw"),
        T::ChromeOSSwap => EventAttributes::colored("#cc9900", "swap"),
        T::ChromeOSWaitForAck => EventAttributes::colored("#ccffff", "wait for ack"),
        T::ChromeOSPresentationDone => EventAttributes::colored("#ffbf00", "presentation done"),
        T::ChromeOSSwapDone => EventAttributes::colored("#65f441", "swap done"),
        T::ChromeOSJank => {
            EventAttributes::marker(Some("#ff0000"), "Chrome composition jank", 4.0)
        }
        T::ChromeOSPerceivedJank => EventAttributes {
            color: None,
            name: "perceived jank",
            width: None,
            radius: Some(4.0),
        },
        T::ChromeOSSwapJank => {
            EventAttributes { color: None, name: "swap jank", width: None, radius: Some(4.0) }
        }

        T::CustomEvent => EventAttributes::marker(Some("#7cb342"), "Custom event", 4.0),

        T::TimeMark => EventAttributes {
            color: Some("#888"),
            name: "Time mark",
            width: Some(0.75),
            radius: None,
        },
        T::TimeMarkSmall => EventAttributes {
            color: Some("#888"),
            name: "Time mark",
            width: Some(0.15),
            radius: None,
        },
    })
}

/// How a value series is drawn in a chart.
///
/// When the value range is auto-detected, a small spread (say 1 MB of
/// memory) would fill the whole chart height and look like a huge change.
/// `min_range` is the smallest range shown, in scaled units. `min_value` and
/// `max_value` pin the range instead of detecting it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartAttributes {
    pub color: String,
    pub name: String,
    /// Multiplier from raw value to displayed value.
    pub scale: f64,
    pub width: f64,
    pub min_range: f64,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl ChartAttributes {
    /// Attributes with a fixed value range.
    #[must_use]
    pub fn fixed(color: impl Into<String>, name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            color: color.into(),
            name: name.into(),
            scale: 1.0,
            width: 1.0,
            min_range: 0.0,
            min_value: Some(min),
            max_value: Some(max),
        }
    }

    /// Attributes whose range is detected from the data, unscaled.
    #[must_use]
    pub fn auto(color: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            name: name.into(),
            scale: 1.0,
            width: 1.0,
            min_range: 0.0,
            min_value: None,
            max_value: None,
        }
    }

    /// True when the range must be detected from the data.
    #[must_use]
    pub fn auto_range(&self) -> bool {
        self.min_value.is_none() || self.max_value.is_none()
    }
}

fn value_entry(color: &str, min_range: f64, name: &str, scale: f64) -> ChartAttributes {
    ChartAttributes {
        color: color.to_string(),
        name: name.to_string(),
        scale,
        width: 1.0,
        min_range,
        min_value: None,
        max_value: None,
    }
}

/// Chart attributes for a value event id.
#[must_use]
pub fn value_attributes(kind: u32) -> Option<ChartAttributes> {
    use ValueEventType as V;

    let kind = ValueEventType::from_id(kind)?;
    Some(match kind {
        V::MemUsed => value_entry("#ff3d00", 512.0, "used mb", 1.0 / 1024.0),
        V::SwapRead => value_entry("#ffc400", 32.0, "swap read sectors", 1.0),
        V::SwapWrite => value_entry("#ff9100", 32.0, "swap write sectors", 1.0),
        V::GemObjects => value_entry("#3d5afe", 1000.0, "geom. objects", 1.0),
        V::GemSize => value_entry("#7c4dff", 256.0, "geom. size mb", 1.0 / 1024.0),
        V::GpuFrequency => value_entry("#01579b", 300.0, "GPU frequency mhz", 1.0),
        V::CpuTemperature => value_entry("#ff3d00", 20.0, "CPU celsius.", 1.0 / 1000.0),
        V::CpuFrequency => value_entry("#ff80ab", 300.0, "CPU Mhz.", 1.0 / 1000.0),
        V::CpuPower => value_entry("#dd2c00", 0.0, "CPU milli-watts.", 1.0),
        V::GpuPower => value_entry("#dd2c00", 0.0, "GPU milli-watts.", 1.0),
        V::MemoryPower => value_entry("#dd2c00", 0.0, "Memory milli-watts.", 1.0),
        V::PackagePowerConstraint => {
            value_entry("#dd0050", 0.0, "CPU package constraint milli-watts.", 1.0)
        }
    })
}

/// Color and name of one discrete value in a bar chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarAttribute {
    pub color: &'static str,
    pub name: &'static str,
}

/// Discrete value → bar attribute table. Values without an entry are drawn
/// in [`UNUSED_COLOR`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarPalette {
    entries: Vec<(i64, BarAttribute)>,
}

impl BarPalette {
    #[must_use]
    pub fn new(entries: Vec<(i64, BarAttribute)>) -> Self {
        Self { entries }
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn get(&self, value: f64) -> Option<&BarAttribute> {
        let key = value.round() as i64;
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, attr)| attr)
    }
}
