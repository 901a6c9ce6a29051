//! # eventgate - validated event streams with derived outgoing events
//!
//! eventgate sits between an application emitting domain events and a
//! downstream sink that expects a specific payload shape. Incoming payloads
//! are validated against the predicate registered for their event name,
//! recorded in an append-only history, and run through registered triggers
//! that produce outgoing payloads for the caller to deliver.
//!
//! ## Core Concepts
//!
//! - **Matcher**: a string that matches an event by exact name, or through the
//!   predicate registered for that event's name
//! - **Predicate**: validates a payload's shape and answers matcher queries
//! - **Trigger**: a matcher plus an encoder producing an outgoing payload
//! - **History**: every accepted event, most recent first
//!
//! ## Usage
//!
//! ```rust,ignore
//! use eventgate::schema::{encoders, predicates};
//! use eventgate::StreamEngine;
//!
//! let mut engine = StreamEngine::builder()
//!     .matcher("Click", predicates::field_pattern("Click", "/eventData/target"))
//!     .trigger("Click:^submit", encoders::event_data())
//!     .build()?;
//!
//! let outgoing = engine.add_event(serde_json::json!({
//!     "eventName": "Click",
//!     "eventData": {"target": "submit-order"},
//! }))?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod history;
pub mod matcher;
pub mod schema;
pub mod trigger;

// Re-export primary types at crate root for convenience
pub use config::StreamConfig;
pub use engine::{StreamEngine, StreamEngineBuilder};
pub use error::{error_to_string, ConfigError, DecodeError, StreamError, StreamResult};
pub use event::{Event, EventId, OutgoingEvent};
pub use history::EventHistory;
pub use matcher::{predicate, MatcherPredicate, MatcherRegistry};
pub use trigger::{encoder, OutgoingEncoder, Trigger, TriggerId, TriggerRegistry};
