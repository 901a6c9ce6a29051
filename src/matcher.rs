//! Matcher registry and the shared matching rule.
//!
//! A matcher is a plain string. It matches a recorded event either by exact
//! equality with the event name, or through the predicate registered for that
//! event name. The same rule drives trigger firing and history queries.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::error::DecodeError;
use crate::event::Event;

/// Caller-supplied predicate for one event name.
///
/// Called as `(matcher, raw_payload)`. At submission time it runs with the
/// event's own name to validate the payload shape; at match time it decides
/// whether an arbitrary matcher applies to a stored event.
pub type MatcherPredicate = Arc<dyn Fn(&str, &Value) -> Result<bool, DecodeError> + Send + Sync>;

/// Wraps a closure as a [`MatcherPredicate`].
pub fn predicate<F>(f: F) -> MatcherPredicate
where
    F: Fn(&str, &Value) -> Result<bool, DecodeError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Event name to predicate mapping. Fixed after construction.
#[derive(Clone, Default)]
pub struct MatcherRegistry {
    predicates: HashMap<String, MatcherPredicate>,
}

impl MatcherRegistry {
    /// Builds a registry. Later duplicates replace earlier ones.
    ///
    /// Empty names can never be a valid event name and are dropped.
    pub fn new(registrations: impl IntoIterator<Item = (String, MatcherPredicate)>) -> Self {
        let mut predicates = HashMap::new();
        for (name, predicate) in registrations {
            if name.is_empty() {
                warn!("dropping matcher registration with empty event name");
                continue;
            }
            predicates.insert(name, predicate);
        }
        Self { predicates }
    }

    /// Returns the predicate registered for `event_name`.
    #[must_use]
    pub fn lookup(&self, event_name: &str) -> Option<&MatcherPredicate> {
        self.predicates.get(event_name)
    }

    /// Returns true if `event_name` has a registered predicate.
    #[must_use]
    pub fn contains(&self, event_name: &str) -> bool {
        self.predicates.contains_key(event_name)
    }

    /// Registered event names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.predicates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered event names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Returns true if no predicate is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Does `event` satisfy `matcher`?
    ///
    /// Never fails: an unregistered name or a predicate error is a non-match.
    #[must_use]
    pub fn matches(&self, matcher: &str, event: &Event) -> bool {
        if matcher == event.name() {
            return true;
        }
        let Some(predicate) = self.lookup(event.name()) else {
            return false;
        };
        predicate(matcher, event.payload()).unwrap_or(false)
    }
}

impl fmt::Debug for MatcherRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherRegistry")
            .field("names", &self.names())
            .finish()
    }
}
