//! Fluent construction of a [`StreamEngine`].

use crate::config::StreamConfig;
use crate::error::ConfigError;
use crate::matcher::{MatcherPredicate, MatcherRegistry};
use crate::trigger::{OutgoingEncoder, TriggerRegistry};

use super::StreamEngine;

/// Builder for a [`StreamEngine`].
///
/// Unlike [`StreamEngine::new`], `build` rejects empty event names and an
/// invalid configuration instead of silently dropping them.
///
/// # Example
/// ```rust,ignore
/// let engine = StreamEngine::builder()
///     .config(StreamConfig::from_json_str(r#"{"event_name_field":"type"}"#)?)
///     .matcher("Click", predicates::name_only())
///     .trigger("Click", encoders::event_data())
///     .build()?;
/// ```
#[derive(Default)]
pub struct StreamEngineBuilder {
    config: StreamConfig,
    matchers: Vec<(String, MatcherPredicate)>,
    triggers: Vec<(String, OutgoingEncoder)>,
}

impl StreamEngineBuilder {
    /// Creates a new builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wire-shape configuration (default: [`StreamConfig::default`]).
    #[must_use]
    pub fn config(mut self, config: StreamConfig) -> Self {
        self.config = config;
        self
    }

    /// Register the predicate for an event name. Last registration wins.
    #[must_use]
    pub fn matcher(mut self, event_name: impl Into<String>, predicate: MatcherPredicate) -> Self {
        self.matchers.push((event_name.into(), predicate));
        self
    }

    /// Add a trigger. Triggers evaluate in the order they are added here.
    #[must_use]
    pub fn trigger(mut self, matcher: impl Into<String>, encoder: OutgoingEncoder) -> Self {
        self.triggers.push((matcher.into(), encoder));
        self
    }

    /// Build the engine.
    ///
    /// Returns `ConfigError::EmptyEventName` if any matcher was registered
    /// under an empty or whitespace-only name.
    pub fn build(self) -> Result<StreamEngine, ConfigError> {
        self.config.validate()?;

        if self.matchers.iter().any(|(name, _)| name.trim().is_empty()) {
            return Err(ConfigError::EmptyEventName);
        }

        Ok(StreamEngine::from_parts(
            self.config,
            MatcherRegistry::new(self.matchers),
            TriggerRegistry::new(self.triggers),
        ))
    }
}
