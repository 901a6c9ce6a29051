//! Recorded and outgoing event types.
//!
//! These types are serializable so they can be handed to a downstream sink
//! as-is.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::trigger::TriggerId;

/// Unique identifier for a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated incoming event as stored in history.
///
/// Only the engine creates these, after the payload passed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    name: String,
    payload: Value,
    sequence: u64,
    recorded_at: DateTime<Utc>,
}

impl Event {
    pub(crate) fn new(name: impl Into<String>, payload: Value, sequence: u64) -> Self {
        Self {
            id: EventId::new(),
            name: name.into(),
            payload,
            sequence,
            recorded_at: Utc::now(),
        }
    }

    /// Unique id assigned when the event was recorded.
    #[must_use]
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// The event name the payload was validated under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw payload exactly as submitted.
    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.payload
    }

    /// Zero-based arrival position within the owning history.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Wall-clock time the event was recorded.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// A derived payload produced by a trigger, ready for delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingEvent {
    /// Unique id of this outgoing event.
    pub event_id: Uuid,
    /// Trigger that produced it.
    pub trigger_id: TriggerId,
    /// Matcher the trigger was registered under.
    pub matcher: String,
    /// Incoming event that fired the trigger.
    pub source_event_id: EventId,
    /// When the encoder ran.
    pub timestamp: DateTime<Utc>,
    /// Encoder output.
    pub payload: Value,
}

impl OutgoingEvent {
    pub(crate) fn new(
        trigger_id: TriggerId,
        matcher: impl Into<String>,
        source_event_id: EventId,
        payload: Value,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            trigger_id,
            matcher: matcher.into(),
            source_event_id,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Discards the envelope and returns the encoded payload.
    #[must_use]
    pub fn into_payload(self) -> Value {
        self.payload
    }
}
