//! Type-filtered views over a shared event list
//!
//! An [`EventSeries`] never owns its events: it holds an `Arc<[Event]>`
//! that any number of series may alias, plus an inclusive type range. All
//! queries return indices into the backing list, so callers can step from a
//! query result with [`EventSeries::next_event`] without re-searching.
//!
//! The backing list is sorted by timestamp once at load time. Queries rely
//! on that and never re-check it.

use std::sync::Arc;

use crate::attributes::{event_attributes, EventAttributes};
use crate::sequence;
use crate::trace_data::Event;

/// Scan direction for [`EventSeries::next_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Read-only view of the events in `[type_min, type_max]`.
#[derive(Debug, Clone)]
pub struct EventSeries {
    events: Arc<[Event]>,
    type_min: u32,
    type_max: u32,
}

impl EventSeries {
    #[must_use]
    pub fn new(events: Arc<[Event]>, type_min: u32, type_max: u32) -> Self {
        Self { events, type_min, type_max }
    }

    /// Series that only accepts `kind`.
    #[must_use]
    pub fn single(events: Arc<[Event]>, kind: u32) -> Self {
        Self::new(events, kind, kind)
    }

    /// The unfiltered backing list.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Event at a raw index returned by one of the queries.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds of the backing list.
    #[must_use]
    pub fn event(&self, index: usize) -> &Event {
        &self.events[index]
    }

    #[must_use]
    pub fn accepts(&self, kind: u32) -> bool {
        (self.type_min..=self.type_max).contains(&kind)
    }

    fn accepts_index(&self, index: usize) -> bool {
        self.accepts(self.events[index].kind)
    }

    /// Next filtered index after `index` (exclusive) in `direction`.
    #[must_use]
    pub fn next_event(&self, index: usize, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Forward => {
                (index.saturating_add(1)..self.events.len()).find(|&i| self.accepts_index(i))
            }
            Direction::Backward => {
                (0..index.min(self.events.len())).rev().find(|&i| self.accepts_index(i))
            }
        }
    }

    #[must_use]
    pub fn first_event(&self) -> Option<usize> {
        (0..self.events.len()).find(|&i| self.accepts_index(i))
    }

    #[must_use]
    pub fn last_event(&self) -> Option<usize> {
        (0..self.events.len()).rev().find(|&i| self.accepts_index(i))
    }

    /// Filtered index whose timestamp is nearest to `timestamp`.
    ///
    /// Binary search over the raw list brackets `timestamp`, then each side
    /// widens to the nearest filtered event. When both sides are equally
    /// far the earlier event wins.
    #[must_use]
    pub fn closest(&self, timestamp: u64) -> Option<usize> {
        let events = &self.events;
        let first = events.first()?;
        let last = events.last()?;
        if first.timestamp >= timestamp {
            return self.first_event();
        }
        if last.timestamp <= timestamp {
            return self.last_event();
        }

        // Invariant: events[before] < timestamp <= events[after].
        let mut before = 0;
        let mut after = events.len() - 1;
        while before + 1 != after {
            let candidate = (before + after).div_ceil(2);
            if events[candidate].timestamp < timestamp {
                before = candidate;
            } else {
                after = candidate;
            }
        }

        let before = self.next_event(before + 1, Direction::Backward);
        let after = self.next_event(after - 1, Direction::Forward);
        match (before, after) {
            (None, after) => after,
            (before, None) => before,
            (Some(before), Some(after)) => {
                let diff_before = timestamp - events[before].timestamp;
                let diff_after = events[after].timestamp - timestamp;
                if diff_before <= diff_after {
                    Some(before)
                } else {
                    Some(after)
                }
            }
        }
    }

    /// First filtered index at or after `timestamp`.
    #[must_use]
    pub fn first_after(&self, timestamp: u64) -> Option<usize> {
        let closest = self.closest(timestamp)?;
        if self.events[closest].timestamp >= timestamp {
            Some(closest)
        } else {
            self.next_event(closest, Direction::Forward)
        }
    }

    /// Last filtered index at or before `timestamp`.
    #[must_use]
    pub fn last_before(&self, timestamp: u64) -> Option<usize> {
        let closest = self.closest(timestamp)?;
        if self.events[closest].timestamp <= timestamp {
            Some(closest)
        } else {
            self.next_event(closest, Direction::Backward)
        }
    }

    /// All filtered indices in timestamp order.
    pub fn iter_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.events.len()).filter(|&i| self.accepts_index(i))
    }

    /// Filtered events in timestamp order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter().filter(|e| self.accepts(e.kind))
    }

    /// Number of events passing the filter.
    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_end_of_sequence(&self, index: usize) -> bool {
        sequence::is_end_of_sequence(self, index)
    }

    /// Render attributes of the event at `index`.
    #[must_use]
    pub fn event_attributes(&self, index: usize) -> Option<EventAttributes> {
        event_attributes(self.events[index].kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(events: &[(u32, u64)], min: u32, max: u32) -> EventSeries {
        let events: Vec<Event> = events.iter().map(|&(k, t)| Event::new(k, t)).collect();
        EventSeries::new(events.into(), min, max)
    }

    #[test]
    fn test_empty_series() {
        let s = series(&[], 0, 1);
        assert_eq!(s.first_event(), None);
        assert_eq!(s.last_event(), None);
        assert_eq!(s.closest(10), None);
        assert_eq!(s.first_after(10), None);
        assert_eq!(s.last_before(10), None);
        assert_eq!(s.next_event(0, Direction::Forward), None);
        assert_eq!(s.count(), 0);
    }

    #[test]
    fn test_first_event_and_closest_tie_prefers_earlier() {
        let s = series(&[(0, 0), (1, 10), (0, 20)], 0, 1);
        assert_eq!(s.first_event(), Some(0));
        assert_eq!(s.closest(15), Some(1));
        assert_eq!(s.closest(16), Some(2));
        assert_eq!(s.closest(14), Some(1));
    }

    #[test]
    fn test_next_event_skips_filtered_out() {
        let s = series(&[(1, 0), (5, 10), (5, 20), (1, 30)], 1, 1);
        assert_eq!(s.next_event(0, Direction::Forward), Some(3));
        assert_eq!(s.next_event(3, Direction::Backward), Some(0));
        assert_eq!(s.next_event(3, Direction::Forward), None);
        assert_eq!(s.next_event(0, Direction::Backward), None);
        assert_eq!(s.last_event(), Some(3));
        assert_eq!(s.count(), 2);
    }

    #[test]
    fn test_closest_boundaries() {
        let s = series(&[(1, 100), (1, 200)], 1, 1);
        assert_eq!(s.closest(0), Some(0));
        assert_eq!(s.closest(100), Some(0));
        assert_eq!(s.closest(500), Some(1));
    }

    #[test]
    fn test_closest_widens_past_filtered_run() {
        let s = series(&[(1, 0), (9, 40), (9, 50), (9, 60), (1, 100)], 1, 1);
        assert_eq!(s.closest(45), Some(0));
        assert_eq!(s.closest(55), Some(4));
    }

    #[test]
    fn test_closest_when_boundary_is_filtered_out() {
        let s = series(&[(9, 0), (1, 50), (9, 100)], 1, 1);
        assert_eq!(s.closest(0), Some(1));
        assert_eq!(s.closest(100), Some(1));
    }

    #[test]
    fn test_first_after_and_last_before() {
        let s = series(&[(1, 10), (1, 20), (1, 30)], 1, 1);
        assert_eq!(s.first_after(15), Some(1));
        assert_eq!(s.last_before(15), Some(0));
        assert_eq!(s.first_after(20), Some(1));
        assert_eq!(s.last_before(20), Some(1));
        assert_eq!(s.first_after(31), None);
        assert_eq!(s.last_before(9), None);
    }

    #[test]
    fn test_aliasing_series_share_backing() {
        let events: Arc<[Event]> =
            vec![Event::new(0, 0), Event::new(1, 5), Event::new(2, 9)].into();
        let idle = EventSeries::single(Arc::clone(&events), 0);
        let other = EventSeries::new(Arc::clone(&events), 1, 2);
        assert_eq!(idle.count(), 1);
        assert_eq!(other.count(), 2);
        assert!(std::ptr::eq(idle.events().as_ptr(), other.events().as_ptr()));
    }
}
