//! Trace data model
//!
//! Parses the ARC graphics trace JSON into a [`Model`]. Graphics events that
//! the producer splits per Chrome buffer and per Android view are merged into
//! one timestamp-ordered list at load time, and the split representation is
//! dropped. Every event list in a loaded model is sorted by timestamp; nothing
//! downstream re-checks that.

use log::{debug, info};
use serde::de::{self, Deserializer, IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use arc_tracing_common::CpuEventType;

use crate::domain::{CpuId, Pid, TraceError};

/// Event payload. Its meaning depends on the event type: a counter reading
/// for value events, a thread id for CPU `Active` events, free text for
/// custom events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventValue {
    Number(f64),
    Text(String),
}

impl EventValue {
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for EventValue {
    #[allow(clippy::cast_possible_truncation)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A single timestamped event: `[type, timestamp_us, value?]` on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Raw event type id. See `arc_tracing_common` for the catalogues.
    pub kind: u32,
    /// Microseconds from the start of the trace.
    pub timestamp: u64,
    pub value: Option<EventValue>,
}

impl Event {
    #[must_use]
    pub fn new(kind: u32, timestamp: u64) -> Self {
        Self { kind, timestamp, value: None }
    }

    #[must_use]
    pub fn with_value(kind: u32, timestamp: u64, value: f64) -> Self {
        Self { kind, timestamp, value: Some(EventValue::Number(value)) }
    }

    /// Numeric payload, if any.
    #[must_use]
    pub fn number(&self) -> Option<f64> {
        self.value.as_ref().and_then(EventValue::as_f64)
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EventVisitor;

        impl<'de> Visitor<'de> for EventVisitor {
            type Value = Event;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an event tuple [type, timestamp, value?]")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Event, A::Error> {
                let kind: u32 =
                    seq.next_element()?.ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let timestamp: WireTimestamp =
                    seq.next_element()?.ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let value: Option<EventValue> = seq.next_element()?;
                // Producers may append extra fields; they carry nothing we render.
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(Event { kind, timestamp: timestamp.micros(), value })
            }
        }

        deserializer.deserialize_seq(EventVisitor)
    }
}

/// Timestamps are integral microseconds, but some producers write them as
/// floats.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireTimestamp {
    Int(u64),
    Float(f64),
}

impl WireTimestamp {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn micros(self) -> u64 {
        match self {
            Self::Int(v) => v,
            Self::Float(v) => v.max(0.0).round() as u64,
        }
    }
}

/// Header of a loaded trace.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelInformation {
    #[serde(default)]
    pub title: String,
    /// Capture time as written by the producer. Used to pick a stable color.
    #[serde(default, deserialize_with = "string_or_number")]
    pub timestamp: String,
    /// Trace length in microseconds.
    #[serde(default, deserialize_with = "micros_or_float")]
    pub duration: u64,
    #[serde(default)]
    pub platform: String,
    /// Base64 PNG of the app icon.
    #[serde(default)]
    pub icon: Option<String>,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Number(serde_json::Number),
    }
    Ok(match Repr::deserialize(deserializer)? {
        Repr::Text(s) => s,
        Repr::Number(n) => n.to_string(),
    })
}

fn micros_or_float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    WireTimestamp::deserialize(deserializer).map(WireTimestamp::micros)
}

/// Thread metadata from `system.threads`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThreadInfo {
    pub pid: u32,
    #[serde(default)]
    pub name: String,
}

impl ThreadInfo {
    #[must_use]
    pub fn pid(&self) -> Pid {
        Pid(self.pid)
    }
}

/// System-wide activity captured alongside the graphics pipeline.
#[derive(Debug, Clone, Default)]
pub struct SystemInfo {
    /// Per-core scheduling events, one list per core.
    pub cpu: Vec<Arc<[Event]>>,
    /// Value counter samples (memory, frequencies, temperature, power).
    pub memory: Arc<[Event]>,
    /// Thread metadata keyed by tid.
    pub threads: HashMap<u32, ThreadInfo>,
}

/// Android view metadata kept after its buffers were merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewInfo {
    pub activity: String,
    pub task_id: i64,
}

/// One loaded trace.
#[derive(Debug, Clone)]
pub struct Model {
    pub information: ModelInformation,
    /// Chrome global, Chrome buffer and view buffer events merged and sorted.
    pub graphics_events: Arc<[Event]>,
    pub system: SystemInfo,
    pub views: Vec<ViewInfo>,
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Deserialize)]
struct RawModel {
    information: ModelInformation,
    #[serde(default)]
    chrome: RawChrome,
    #[serde(default)]
    views: Vec<RawView>,
    #[serde(default)]
    system: RawSystem,
}

#[derive(Default, Deserialize)]
struct RawChrome {
    #[serde(default)]
    global_events: Vec<Event>,
    #[serde(default)]
    buffers: Vec<Vec<Event>>,
}

#[derive(Deserialize)]
struct RawView {
    #[serde(default)]
    activity: String,
    #[serde(default)]
    task_id: i64,
    #[serde(default)]
    buffers: Vec<Vec<Event>>,
    #[serde(default)]
    global_events: Vec<Event>,
}

#[derive(Default, Deserialize)]
struct RawSystem {
    #[serde(default)]
    cpu: Vec<Vec<Event>>,
    #[serde(default)]
    memory: Vec<Event>,
    #[serde(default)]
    threads: HashMap<u32, ThreadInfo>,
}

/// `Active` events must name the thread they switch to.
fn validate_cpu_events(core: CpuId, events: &[Event]) -> Result<(), TraceError> {
    let active = CpuEventType::Active.id();
    for event in events.iter().filter(|e| e.kind == active) {
        let valid = event
            .number()
            .is_some_and(|tid| tid.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&tid));
        if !valid {
            let value = event.value.as_ref().map_or_else(|| "nothing".to_string(), ToString::to_string);
            return Err(TraceError::InvalidTrace(format!(
                "{core} Active event at {} us carries {value} instead of a thread id",
                event.timestamp
            )));
        }
    }
    Ok(())
}

fn sorted(mut events: Vec<Event>) -> Arc<[Event]> {
    // Stable: equal timestamps keep producer order.
    events.sort_by_key(|e| e.timestamp);
    events.into()
}

impl Model {
    /// Parse a trace file into a model.
    ///
    /// # Errors
    /// Returns an error if the file can't be read or is not a valid trace.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let model = Self::from_json_str(&content)?;
        info!(
            "Loaded {}: {} graphics events, {} cores, {} value samples",
            path.display(),
            model.graphics_events.len(),
            model.system.cpu.len(),
            model.system.memory.len()
        );
        Ok(model)
    }

    /// Parse trace JSON text into a model.
    ///
    /// # Errors
    /// Returns an error if the text is not a valid trace.
    pub fn from_json_str(text: &str) -> Result<Self, TraceError> {
        let raw: RawModel = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawModel) -> Result<Self, TraceError> {
        let RawModel { mut information, chrome, views, system } = raw;

        let mut graphics_events = chrome.global_events;
        for buffer in chrome.buffers {
            graphics_events.extend(buffer);
        }
        let mut view_infos = Vec::with_capacity(views.len());
        for view in views {
            for buffer in view.buffers {
                graphics_events.extend(buffer);
            }
            graphics_events.extend(view.global_events);
            view_infos.push(ViewInfo { activity: view.activity, task_id: view.task_id });
        }
        let graphics_events = sorted(graphics_events);

        for (core, events) in system.cpu.iter().enumerate() {
            validate_cpu_events(CpuId(core), events)?;
        }
        let system = SystemInfo {
            cpu: system.cpu.into_iter().map(sorted).collect(),
            memory: sorted(system.memory),
            threads: system.threads,
        };

        if information.duration == 0 {
            let last = graphics_events
                .iter()
                .chain(system.memory.iter())
                .chain(system.cpu.iter().flat_map(|core| core.iter()))
                .map(|e| e.timestamp)
                .max()
                .unwrap_or(0);
            debug!("Trace has no duration, using last event timestamp {last}");
            information.duration = last;
        }

        Ok(Self { information, graphics_events, system, views: view_infos })
    }

    /// Title used in legends and export headers.
    #[must_use]
    pub fn title(&self) -> &str {
        if self.information.title.is_empty() {
            "untitled"
        } else {
            &self.information.title
        }
    }

    #[must_use]
    pub fn duration(&self) -> u64 {
        self.information.duration
    }

    /// Thread metadata for `tid`, if the producer recorded it.
    #[must_use]
    pub fn thread(&self, tid: u32) -> Option<&ThreadInfo> {
        self.system.threads.get(&tid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACE: &str = r#"{
        "information": {"title": "Test app", "timestamp": "Tue Nov 05 2019", "duration": 1000000, "platform": "ARC"},
        "chrome": {
            "global_events": [[500, 30], [504, 40]],
            "buffers": [[[301, 25]]]
        },
        "views": [
            {"activity": "org.test/.Main", "task_id": 7, "buffers": [[[206, 20], [207, 10, "late"]]]}
        ],
        "system": {
            "cpu": [[[3, 100, 12], [3, 50, 0]]],
            "memory": [[10, 0, 1000], [10, 1000, 3000]],
            "threads": {"12": {"pid": 12, "name": "main"}}
        }
    }"#;

    #[test]
    fn test_parse_merges_and_sorts_graphics_events() {
        let model = Model::from_json_str(TRACE).unwrap();
        let kinds: Vec<u32> = model.graphics_events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![207, 206, 301, 500, 504]);
        let stamps: Vec<u64> = model.graphics_events.iter().map(|e| e.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_parse_keeps_view_metadata() {
        let model = Model::from_json_str(TRACE).unwrap();
        assert_eq!(model.views, vec![ViewInfo { activity: "org.test/.Main".into(), task_id: 7 }]);
    }

    #[test]
    fn test_parse_event_values() {
        let model = Model::from_json_str(TRACE).unwrap();
        assert_eq!(model.graphics_events[0].value, Some(EventValue::Text("late".into())));
        assert_eq!(model.system.memory[1].number(), Some(3000.0));
        assert_eq!(model.graphics_events[1].value, None);
    }

    #[test]
    fn test_parse_sorts_cpu_events() {
        let model = Model::from_json_str(TRACE).unwrap();
        assert_eq!(model.system.cpu[0][0].timestamp, 50);
        assert_eq!(model.system.cpu[0][1].timestamp, 100);
    }

    #[test]
    fn test_parse_threads_keyed_by_tid() {
        let model = Model::from_json_str(TRACE).unwrap();
        let thread = model.thread(12).unwrap();
        assert_eq!(thread.pid(), Pid(12));
        assert_eq!(thread.name, "main");
        assert!(model.thread(13).is_none());
    }

    #[test]
    fn test_missing_duration_uses_last_event() {
        let model = Model::from_json_str(
            r#"{"information": {"title": "t"}, "system": {"memory": [[1, 5, 1], [1, 900, 2]]}}"#,
        )
        .unwrap();
        assert_eq!(model.duration(), 900);
    }

    #[test]
    fn test_numeric_timestamp_information() {
        let model = Model::from_json_str(r#"{"information": {"timestamp": 1572912000}}"#).unwrap();
        assert_eq!(model.information.timestamp, "1572912000");
        assert_eq!(model.title(), "untitled");
    }

    #[test]
    fn test_float_timestamps_are_rounded() {
        let event: Event = serde_json::from_str("[206, 1000.6]").unwrap();
        assert_eq!(event.timestamp, 1001);
    }

    #[test]
    fn test_short_event_is_rejected() {
        assert!(serde_json::from_str::<Event>("[206]").is_err());
        assert!(Model::from_json_str("{ invalid").is_err());
    }

    #[test]
    fn test_cpu_active_without_thread_id_is_rejected() {
        let err = Model::from_json_str(
            r#"{"information": {}, "system": {"cpu": [[[3, 0, 1]], [[0, 5], [3, 10, "main"]]]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, TraceError::InvalidTrace(_)));
        assert_eq!(
            err.to_string(),
            "Invalid trace data: CPU:1 Active event at 10 us carries main instead of a thread id"
        );

        for bad in ["[3, 10]", "[3, 10, -4]", "[3, 10, 1.5]"] {
            let json = format!(r#"{{"information": {{}}, "system": {{"cpu": [[{bad}]]}}}}"#);
            assert!(matches!(Model::from_json_str(&json), Err(TraceError::InvalidTrace(_))), "{bad}");
        }
    }

    #[test]
    fn test_idle_events_need_no_value() {
        let model =
            Model::from_json_str(r#"{"information": {}, "system": {"cpu": [[[0, 5], [1, 6], [3, 7, 0]]]}}"#)
                .unwrap();
        assert_eq!(model.system.cpu[0].len(), 3);
    }

    #[test]
    fn test_event_value_display() {
        assert_eq!(EventValue::Number(1234.0).to_string(), "1234");
        assert_eq!(EventValue::Number(1.5).to_string(), "1.5");
        assert_eq!(EventValue::Text("x".into()).to_string(), "x");
    }
}
