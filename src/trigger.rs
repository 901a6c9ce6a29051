//! Trigger registrations.
//!
//! A trigger pairs a matcher string with an outgoing encoder. Triggers are
//! kept in evaluation order; newly added triggers go to the front.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::engine::StreamEngine;
use crate::error::DecodeError;

/// Caller-supplied encoder attached to a trigger.
///
/// Called as `(matcher, raw_payload, engine)` with the engine state that
/// already includes the event being processed.
pub type OutgoingEncoder =
    Arc<dyn Fn(&str, &Value, &StreamEngine) -> Result<Value, DecodeError> + Send + Sync>;

/// Wraps a closure as an [`OutgoingEncoder`].
pub fn encoder<F>(f: F) -> OutgoingEncoder
where
    F: Fn(&str, &Value, &StreamEngine) -> Result<Value, DecodeError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Unique identifier for a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerId(Uuid);

impl TriggerId {
    /// Create a new random trigger id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TriggerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered (matcher, encoder) pair.
#[derive(Clone)]
pub struct Trigger {
    id: TriggerId,
    matcher: String,
    encoder: OutgoingEncoder,
}

impl Trigger {
    /// Creates a trigger with a fresh id.
    #[must_use]
    pub fn new(matcher: impl Into<String>, encoder: OutgoingEncoder) -> Self {
        Self {
            id: TriggerId::new(),
            matcher: matcher.into(),
            encoder,
        }
    }

    /// This trigger's id.
    #[must_use]
    pub const fn id(&self) -> TriggerId {
        self.id
    }

    /// Matcher this trigger fires on.
    #[must_use]
    pub fn matcher(&self) -> &str {
        &self.matcher
    }

    /// Runs this trigger's encoder against a payload.
    pub fn encode(&self, payload: &Value, engine: &StreamEngine) -> Result<Value, DecodeError> {
        (self.encoder)(&self.matcher, payload, engine)
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("id", &self.id)
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

/// Ordered trigger list. No uniqueness constraint on matchers.
#[derive(Debug, Clone, Default)]
pub struct TriggerRegistry {
    triggers: VecDeque<Trigger>,
}

impl TriggerRegistry {
    /// Builds a registry that evaluates `registrations` in the given order.
    pub fn new(registrations: impl IntoIterator<Item = (String, OutgoingEncoder)>) -> Self {
        let triggers = registrations
            .into_iter()
            .map(|(matcher, encoder)| Trigger::new(matcher, encoder))
            .collect();
        Self { triggers }
    }

    /// Prepends a trigger so it evaluates before every existing one.
    pub fn add(&mut self, matcher: impl Into<String>, encoder: OutgoingEncoder) -> TriggerId {
        let trigger = Trigger::new(matcher, encoder);
        let id = trigger.id();
        self.triggers.push_front(trigger);
        id
    }

    /// Triggers in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &Trigger> {
        self.triggers.iter()
    }

    /// Number of registered triggers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    /// Returns true if no trigger is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}
