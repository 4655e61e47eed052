//! End-of-sequence detection
//!
//! Producers describe activity as runs of events: a band is colored from
//! the first event of a run until the event that ends it, and idle after
//! that. Which event ends a run depends on the producer, so the rule lives
//! in a table keyed by event type rather than in the renderer.

use arc_tracing_common::GraphicsEventType;

use crate::series::{Direction, EventSeries};

/// How an event type ends a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceEnd {
    /// The event always ends the sequence.
    Always,
    /// The event ends the sequence only if the next filtered event is one
    /// of these types, or if there is no next event.
    Before(&'static [GraphicsEventType]),
}

/// Chrome does not define which of presentation-done and swap-done comes
/// last; either ends the frame when the next draw starts.
const BEFORE_DRAW: &[GraphicsEventType] = &[GraphicsEventType::ChromeOSDraw];

/// End rule for `kind`. `None` means the type never ends a sequence.
#[must_use]
pub fn sequence_end(kind: GraphicsEventType) -> Option<SequenceEnd> {
    use GraphicsEventType as T;

    match kind {
        T::IdleIn
        | T::BufferQueueQueueDone
        | T::BufferQueueReleased
        | T::ChromeBarrierFlush
        | T::SurfaceFlingerInvalidationDone
        | T::SurfaceFlingerCompositionDone => Some(SequenceEnd::Always),
        T::ChromeOSPresentationDone | T::ChromeOSSwapDone => Some(SequenceEnd::Before(BEFORE_DRAW)),
        _ => None,
    }
}

/// Whether the event at `index` ends an active sequence in `series`.
///
/// Looks at most one filtered event ahead.
#[must_use]
pub fn is_end_of_sequence(series: &EventSeries, index: usize) -> bool {
    let rule = GraphicsEventType::from_id(series.event(index).kind).and_then(sequence_end);
    match rule {
        None => false,
        Some(SequenceEnd::Always) => true,
        Some(SequenceEnd::Before(successors)) => {
            match series.next_event(index, Direction::Forward) {
                None => true,
                Some(next) => successors.iter().any(|s| s.id() == series.event(next).kind),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace_data::Event;

    fn series(kinds: &[u32]) -> EventSeries {
        let events: Vec<Event> =
            kinds.iter().enumerate().map(|(i, &k)| Event::new(k, i as u64 * 10)).collect();
        EventSeries::new(events.into(), 0, u32::MAX)
    }

    #[test]
    fn test_always_terminators() {
        let s = series(&[0, 103, 105, 301, 402, 404]);
        for index in 0..6 {
            assert!(s.is_end_of_sequence(index), "index {index}");
        }
    }

    #[test]
    fn test_absent_type_never_terminates() {
        let s = series(&[1, 500, 206, 99_999]);
        for index in 0..4 {
            assert!(!s.is_end_of_sequence(index));
        }
    }

    #[test]
    fn test_presentation_done_needs_draw_or_end() {
        let s = series(&[503, 500, 504, 501, 504]);
        assert!(s.is_end_of_sequence(0));
        assert!(!s.is_end_of_sequence(2));
        assert!(s.is_end_of_sequence(4));
    }

    #[test]
    fn test_successor_is_next_filtered_event() {
        let events: Vec<Event> =
            vec![Event::new(504, 0), Event::new(700, 5), Event::new(500, 10)];
        let s = EventSeries::new(events.into(), 500, 510);
        assert!(s.is_end_of_sequence(0));
    }

    #[test]
    fn test_unrelated_later_events_do_not_matter() {
        let a = series(&[504, 500, 1, 1]);
        let b = series(&[504, 500, 0, 103]);
        assert_eq!(a.is_end_of_sequence(0), b.is_end_of_sequence(0));
    }
}
