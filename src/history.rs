//! Append-only event history.
//!
//! Events are prepended as they are recorded, so iteration yields the most
//! recent event first. Nothing is ever removed.

use std::collections::VecDeque;

use crate::event::Event;

/// Recorded events in reverse arrival order.
#[derive(Debug, Clone, Default)]
pub struct EventHistory {
    events: VecDeque<Event>,
}

impl EventHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, event: Event) {
        self.events.push_front(event);
    }

    /// Sequence number the next recorded event will receive.
    #[must_use]
    pub fn next_sequence(&self) -> u64 {
        self.events.len() as u64
    }

    /// Events, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// The most recently recorded event.
    #[must_use]
    pub fn latest(&self) -> Option<&Event> {
        self.events.front()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
