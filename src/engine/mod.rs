//! Stream engine.
//!
//! `StreamEngine` validates incoming payloads against the predicate registered
//! for their event name, records them in history, and evaluates triggers to
//! produce outgoing events. Everything runs synchronously on the caller's
//! thread.

mod builder;

pub use builder::StreamEngineBuilder;

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::config::StreamConfig;
use crate::error::{DecodeError, StreamError, StreamResult};
use crate::event::{Event, OutgoingEvent};
use crate::history::EventHistory;
use crate::matcher::{MatcherPredicate, MatcherRegistry};
use crate::schema;
use crate::trigger::{OutgoingEncoder, Trigger, TriggerId, TriggerRegistry};

/// In-process event stream engine.
///
/// The engine is a plain value: cloning it snapshots the history and shares
/// the registered predicates and encoders. Mutations require `&mut self`, and
/// the `with_*` methods return an updated value instead.
///
/// # Example
/// ```rust
/// use eventgate::{encoder, predicate, StreamEngine};
/// use serde_json::json;
///
/// let mut engine = StreamEngine::new(
///     [("Click".to_string(), predicate(|_, _| Ok(false)))],
///     [("Click".to_string(), encoder(|_, payload, _| Ok(payload["eventData"].clone())))],
/// );
///
/// let out = engine
///     .add_event(json!({"eventName": "Click", "eventData": {"x": 1}}))
///     .unwrap();
/// assert_eq!(out[0].payload, json!({"x": 1}));
/// assert_eq!(engine.get_events("Click").len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StreamEngine {
    config: StreamConfig,
    matchers: MatcherRegistry,
    triggers: TriggerRegistry,
    history: EventHistory,
}

impl StreamEngine {
    /// Creates an engine with the default configuration.
    ///
    /// Triggers evaluate in the order given here; triggers added later with
    /// [`StreamEngine::add_trigger`] evaluate before all of them.
    pub fn new(
        matchers: impl IntoIterator<Item = (String, MatcherPredicate)>,
        triggers: impl IntoIterator<Item = (String, OutgoingEncoder)>,
    ) -> Self {
        Self::from_parts(
            StreamConfig::default(),
            MatcherRegistry::new(matchers),
            TriggerRegistry::new(triggers),
        )
    }

    /// Starts a validated builder.
    #[must_use]
    pub fn builder() -> StreamEngineBuilder {
        StreamEngineBuilder::new()
    }

    pub(crate) fn from_parts(
        config: StreamConfig,
        matchers: MatcherRegistry,
        triggers: TriggerRegistry,
    ) -> Self {
        Self {
            config,
            matchers,
            triggers,
            history: EventHistory::new(),
        }
    }

    /// Validates, records and fans out one incoming payload.
    ///
    /// Validation failures leave the engine untouched. If a trigger encoder
    /// fails, the event stays recorded and the first encoder error is
    /// returned.
    pub fn add_event(&mut self, payload: Value) -> StreamResult<Vec<OutgoingEvent>> {
        let event = self.validate(payload)?;
        debug!(
            event = %event.name(),
            sequence = event.sequence(),
            event_id = %event.id(),
            "recorded event"
        );
        self.history.record(event.clone());
        self.fire_triggers(&event)
    }

    /// Value-style variant of [`StreamEngine::add_event`].
    ///
    /// Works on a clone, so `self` is unchanged whatever the outcome. On a
    /// trigger failure the updated clone is dropped along with the error;
    /// use `add_event` to keep the recorded event.
    pub fn with_event(&self, payload: Value) -> StreamResult<(Self, Vec<OutgoingEvent>)> {
        let mut next = self.clone();
        let out = next.add_event(payload)?;
        Ok((next, out))
    }

    /// Registers a trigger ahead of every existing trigger.
    ///
    /// It only fires for events submitted after this call.
    pub fn add_trigger(&mut self, matcher: impl Into<String>, encoder: OutgoingEncoder) -> TriggerId {
        let matcher = matcher.into();
        let id = self.triggers.add(matcher.clone(), encoder);
        debug!(trigger_id = %id, matcher = %matcher, "registered trigger");
        id
    }

    /// Value-style variant of [`StreamEngine::add_trigger`].
    #[must_use]
    pub fn with_trigger(mut self, matcher: impl Into<String>, encoder: OutgoingEncoder) -> Self {
        self.add_trigger(matcher, encoder);
        self
    }

    /// Raw payloads of every recorded event matching `matcher`, most recent
    /// first. Never fails.
    #[must_use]
    pub fn get_events(&self, matcher: &str) -> Vec<&Value> {
        self.history
            .iter()
            .filter(|event| self.matchers.matches(matcher, event))
            .map(Event::payload)
            .collect()
    }

    /// Recorded events matching `matcher`, most recent first.
    pub fn matching_events<'a>(&'a self, matcher: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.history
            .iter()
            .filter(move |event| self.matchers.matches(matcher, event))
    }

    /// Does `event` satisfy `matcher` under this engine's registry?
    #[must_use]
    pub fn matches(&self, matcher: &str, event: &Event) -> bool {
        self.matchers.matches(matcher, event)
    }

    /// All recorded events, most recent first.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.history.iter()
    }

    /// The most recently recorded event.
    #[must_use]
    pub fn latest(&self) -> Option<&Event> {
        self.history.latest()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Returns true if no event has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Triggers in evaluation order.
    pub fn triggers(&self) -> impl Iterator<Item = &Trigger> {
        self.triggers.iter()
    }

    /// Number of registered triggers.
    #[must_use]
    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    /// Event names with a registered predicate, sorted.
    #[must_use]
    pub fn registered_events(&self) -> Vec<&str> {
        self.matchers.names()
    }

    /// Wire-shape configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &StreamConfig {
        &self.config
    }

    fn validate(&self, payload: Value) -> StreamResult<Event> {
        let name = schema::event_name(&payload, &self.config.event_name_field).map_err(|e| {
            debug!(error = %e, "rejected payload without a readable event name");
            StreamError::from(e)
        })?;

        let Some(predicate) = self.matchers.lookup(&name) else {
            debug!(event = %name, "rejected unknown event");
            return Err(StreamError::unknown_event(name));
        };

        // Only a decode error rejects; the boolean result is irrelevant here.
        if let Err(e) = predicate(&name, &payload) {
            debug!(event = %name, error = %e, "rejected malformed event");
            return Err(e.into());
        }

        Ok(Event::new(name, payload, self.history.next_sequence()))
    }

    fn fire_triggers(&self, event: &Event) -> StreamResult<Vec<OutgoingEvent>> {
        let results: Vec<(&Trigger, Result<Value, DecodeError>)> = self
            .triggers
            .iter()
            .filter(|trigger| self.matchers.matches(trigger.matcher(), event))
            .map(|trigger| {
                trace!(trigger_id = %trigger.id(), matcher = %trigger.matcher(), event = %event.name(), "trigger fired");
                (trigger, trigger.encode(event.payload(), self))
            })
            .collect();

        let mut first_err: Option<DecodeError> = None;
        let mut out = Vec::with_capacity(results.len());
        for (trigger, result) in results {
            match result {
                Ok(payload) => {
                    out.push(OutgoingEvent::new(trigger.id(), trigger.matcher(), event.id(), payload));
                }
                Err(e) => {
                    warn!(
                        trigger_id = %trigger.id(),
                        matcher = %trigger.matcher(),
                        event = %event.name(),
                        error = %e,
                        "trigger encoder failed"
                    );
                    first_err.get_or_insert(e);
                }
            }
        }

        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::predicate;
    use crate::trigger::encoder;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn click_validator() -> MatcherPredicate {
        predicate(|matcher, payload| {
            let x = schema::decode_field::<serde_json::Map<String, Value>>(payload, "eventData")?
                .get("x")
                .and_then(Value::as_i64)
                .ok_or_else(|| DecodeError::MissingField {
                    field: "x".to_string(),
                })?;
            Ok(matcher == "PositiveClick" && x > 0)
        })
    }

    fn click(x: i64) -> Value {
        json!({"eventName": "Click", "eventData": {"x": x}})
    }

    fn engine() -> StreamEngine {
        StreamEngine::new([("Click".to_string(), click_validator())], [])
    }

    fn tag(label: &'static str) -> OutgoingEncoder {
        encoder(move |_, _, _| Ok(json!(label)))
    }

    fn payloads(out: Vec<OutgoingEvent>) -> Vec<Value> {
        out.into_iter().map(OutgoingEvent::into_payload).collect()
    }

    #[test]
    fn valid_event_without_triggers_yields_nothing() {
        let mut engine = engine();
        let out = engine.add_event(click(1)).unwrap();
        assert!(out.is_empty());
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.get_events("Click"), vec![&click(1)]);
    }

    #[test]
    fn unknown_event_is_rejected_without_recording() {
        let mut engine = engine();
        let err = engine.add_event(json!({"eventName": "Unknown"})).unwrap_err();
        assert_eq!(err, StreamError::unknown_event("Unknown"));
        assert!(engine.is_empty());
    }

    #[test]
    fn missing_event_name_is_a_decode_error() {
        let mut engine = engine();
        let err = engine.add_event(json!({"eventData": {"x": 1}})).unwrap_err();
        assert_eq!(
            err,
            StreamError::Decode(DecodeError::MissingField {
                field: "eventName".to_string()
            })
        );
        assert!(engine.is_empty());
    }

    #[test]
    fn self_validation_error_rejects_event() {
        let mut engine = engine();
        let err = engine
            .add_event(json!({"eventName": "Click", "eventData": {"y": 2}}))
            .unwrap_err();
        assert!(err.is_decode());
        assert!(engine.is_empty());
    }

    #[test]
    fn self_validation_false_still_records() {
        // The Click predicate returns false for its own name.
        let mut engine = engine();
        engine.add_event(click(-5)).unwrap();
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn triggers_fire_most_recent_first() {
        let mut engine = engine();
        engine.add_trigger("Click", tag("first"));
        engine.add_trigger("Click", tag("second"));

        let out = engine.add_event(click(1)).unwrap();
        assert_eq!(payloads(out), vec![json!("second"), json!("first")]);
    }

    #[test]
    fn initial_triggers_fire_in_given_order_after_added_ones() {
        let mut engine = StreamEngine::new(
            [("Click".to_string(), click_validator())],
            [
                ("Click".to_string(), tag("init-a")),
                ("Click".to_string(), tag("init-b")),
            ],
        );
        engine.add_trigger("Click", tag("late"));

        let out = engine.add_event(click(1)).unwrap();
        assert_eq!(
            payloads(out),
            vec![json!("late"), json!("init-a"), json!("init-b")]
        );
    }

    #[test]
    fn predicate_matched_trigger_fires() {
        let mut engine = engine().with_trigger("PositiveClick", tag("positive"));

        assert_eq!(payloads(engine.add_event(click(3)).unwrap()), vec![json!("positive")]);
        assert!(engine.add_event(click(-3)).unwrap().is_empty());
    }

    #[test]
    fn non_matching_trigger_is_not_invoked() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut engine = engine().with_trigger(
            "Scroll",
            encoder(move |_, _, _| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Null)
            }),
        );
        engine.add_event(click(1)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn encoder_sees_the_new_event_in_history() {
        let mut engine = engine().with_trigger(
            "Click",
            encoder(|matcher, _, engine| Ok(json!(engine.get_events(matcher).len()))),
        );
        assert_eq!(payloads(engine.add_event(click(1)).unwrap()), vec![json!(1)]);
        assert_eq!(payloads(engine.add_event(click(2)).unwrap()), vec![json!(2)]);
    }

    #[test]
    fn first_trigger_error_wins_but_all_matching_encoders_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counting = |label: &'static str, fail: bool| {
            let calls = Arc::clone(&calls);
            encoder(move |_, _, _| {
                calls.fetch_add(1, Ordering::SeqCst);
                if fail {
                    Err(DecodeError::failure(label))
                } else {
                    Ok(json!(label))
                }
            })
        };

        let mut engine = engine();
        engine.add_trigger("Click", counting("third-ok", false));
        engine.add_trigger("Click", counting("second-bad", true));
        engine.add_trigger("Click", counting("first-bad", true));

        let err = engine.add_event(click(1)).unwrap_err();
        assert_eq!(err, StreamError::Decode(DecodeError::failure("first-bad")));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn trigger_failure_keeps_event_recorded() {
        let mut engine =
            engine().with_trigger("Click", encoder(|_, _, _| Err(DecodeError::failure("nope"))));
        assert!(engine.add_event(click(1)).is_err());
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.get_events("Click").len(), 1);
    }

    #[test]
    fn with_event_returns_updated_value() {
        let (engine, out) = engine().with_event(click(1)).unwrap();
        assert!(out.is_empty());
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn with_event_leaves_original_untouched_on_rejection() {
        let mut original = engine();
        original.add_event(click(1)).unwrap();

        let err = original
            .with_event(json!({"eventName": "Unknown"}))
            .unwrap_err();
        assert!(err.is_unknown_event());

        assert_eq!(original.len(), 1);
        original.add_event(click(2)).unwrap();
        assert_eq!(original.get_events("Click"), vec![&click(2), &click(1)]);
    }

    #[test]
    fn with_event_does_not_mutate_receiver_on_success() {
        let original = engine();
        let (next, _) = original.with_event(click(1)).unwrap();
        assert!(original.is_empty());
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn get_events_outlives_matcher_string() {
        let mut engine = engine();
        engine.add_event(click(4)).unwrap();
        let found = {
            let matcher = String::from("PositiveClick");
            engine.get_events(&matcher)
        };
        assert_eq!(found, vec![&click(4)]);
    }

    #[test]
    fn clones_are_independent_snapshots() {
        let mut a = engine();
        a.add_event(click(1)).unwrap();
        let b = a.clone();
        a.add_event(click(2)).unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn outgoing_event_links_trigger_and_source() {
        let mut engine = engine();
        let id = engine.add_trigger("Click", tag("x"));
        let out = engine.add_event(click(1)).unwrap();
        let latest = engine.latest().unwrap();
        assert_eq!(out[0].trigger_id, id);
        assert_eq!(out[0].matcher, "Click");
        assert_eq!(out[0].source_event_id, latest.id());
    }

    #[test]
    fn introspection_reports_registrations() {
        let engine = engine().with_trigger("Click", tag("x"));
        assert_eq!(engine.registered_events(), vec!["Click"]);
        assert_eq!(engine.trigger_count(), 1);
        assert_eq!(engine.triggers().next().map(Trigger::matcher), Some("Click"));
        assert_eq!(engine.config(), &StreamConfig::default());
    }
}
