//! Frame rate derivation
//!
//! Everything here works on an [`EventSeries`] of frame events (usually
//! surface commits) and is pure: no rendering, no session state.

// Rates are computed from event counts and microsecond spans
#![allow(clippy::cast_precision_loss)]

use log::debug;

use crate::series::EventSeries;
use crate::trace_data::Event;

/// Event type of resampled FPS values produced by [`create_fps_events`].
/// Outside every producer catalogue.
pub const FPS_EVENT_KIND: u32 = 20_000;

/// Interval between two consecutive frame events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDelta {
    /// Timestamp of the later event.
    pub timestamp: u64,
    /// Microseconds since the previous event.
    pub delta: u64,
}

/// Average frame rate: filtered event count per second of `duration_us`.
///
/// A zero duration has no meaningful rate and yields 0.
#[must_use]
pub fn calculate_fps(series: &EventSeries, duration_us: u64) -> f64 {
    if duration_us == 0 {
        debug!("FPS requested over an empty duration");
        return 0.0;
    }
    series.count() as f64 * 1_000_000.0 / duration_us as f64
}

/// Intervals between consecutive filtered events.
#[must_use]
pub fn frame_deltas(series: &EventSeries) -> Vec<FrameDelta> {
    let mut deltas = Vec::new();
    let mut previous: Option<u64> = None;
    for event in series.iter() {
        if let Some(previous) = previous {
            deltas.push(FrameDelta {
                timestamp: event.timestamp,
                delta: event.timestamp.saturating_sub(previous),
            });
        }
        previous = Some(event.timestamp);
    }
    deltas
}

/// Smoothed frame rate sampled every `step_us` across `[0, duration_us]`.
///
/// The rate at `t` counts events in `[t - window/2, t + window/2)`, the
/// window clamped to the trace, and divides by the clamped length. Each
/// sample is an event of type [`FPS_EVENT_KIND`] whose value is the rate.
#[must_use]
pub fn create_fps_events(
    series: &EventSeries,
    duration_us: u64,
    window_us: u64,
    step_us: u64,
) -> Vec<Event> {
    if step_us == 0 {
        return Vec::new();
    }
    let timestamps: Vec<u64> = series.iter().map(|e| e.timestamp).collect();
    let half = window_us / 2;

    let mut events = Vec::new();
    let mut t = 0;
    while t <= duration_us {
        let from = t.saturating_sub(half);
        let to = t.saturating_add(half).min(duration_us);
        let fps = if to > from {
            let count = timestamps.partition_point(|&ts| ts < to)
                - timestamps.partition_point(|&ts| ts < from);
            count as f64 * 1_000_000.0 / (to - from) as f64
        } else {
            0.0
        };
        events.push(Event::with_value(FPS_EVENT_KIND, t, fps));
        t += step_us;
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(timestamps: impl IntoIterator<Item = u64>) -> EventSeries {
        let events: Vec<Event> = timestamps.into_iter().map(|t| Event::new(206, t)).collect();
        EventSeries::single(events.into(), 206)
    }

    #[test]
    fn test_calculate_fps_sixty_frames() {
        let series = frames((0..60).map(|i| i * 16_667));
        assert!((calculate_fps(&series, 1_000_000) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_fps_zero_duration() {
        let series = frames([0, 10]);
        assert_eq!(calculate_fps(&series, 0), 0.0);
    }

    #[test]
    fn test_frame_deltas_use_later_timestamp() {
        let deltas = frame_deltas(&frames([100, 116, 150]));
        assert_eq!(
            deltas,
            vec![
                FrameDelta { timestamp: 116, delta: 16 },
                FrameDelta { timestamp: 150, delta: 34 },
            ]
        );
        assert!(frame_deltas(&frames([5])).is_empty());
    }

    #[test]
    fn test_fps_events_steady_rate() {
        let series = frames((0..100).map(|i| i * 10_000));
        let events = create_fps_events(&series, 1_000_000, 200_000, 100_000);
        assert_eq!(events.len(), 11);
        assert_eq!(events[0].kind, FPS_EVENT_KIND);
        // Interior windows see 20 events in 200 ms.
        let middle = events[5].number().unwrap();
        assert!((middle - 100.0).abs() < 1e-9, "{middle}");
        // The first window is clamped to [0, 100 ms).
        let first = events[0].number().unwrap();
        assert!((first - 100.0).abs() < 1e-9, "{first}");
    }

    #[test]
    fn test_fps_events_empty_series() {
        let events = create_fps_events(&frames([]), 100_000, 50_000, 50_000);
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.number() == Some(0.0)));
    }
}
