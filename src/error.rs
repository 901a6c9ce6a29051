//! Error types for eventgate.
//!
//! All errors are strongly typed using thiserror so callers can pattern
//! match on the failure kind instead of parsing messages.

use thiserror::Error;

/// Errors raised while decoding or encoding a raw payload.
///
/// Produced by the engine when the event name field cannot be read, and by
/// caller-supplied predicates and encoders.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A required field is absent.
    #[error("Required field '{field}' is missing")]
    MissingField {
        /// Field name or JSON pointer.
        field: String,
    },

    /// A field holds the wrong JSON type.
    #[error("Field '{field}' expected {expected}, found {found}")]
    UnexpectedType {
        /// Field name or JSON pointer.
        field: String,
        /// Expected JSON type.
        expected: String,
        /// Actual JSON type.
        found: String,
    },

    /// A nested error raised while decoding `field`.
    #[error("at '{field}': {source}")]
    AtField {
        /// Field the inner error was raised under.
        field: String,
        /// The wrapped error.
        source: Box<DecodeError>,
    },

    /// Any other decode failure.
    #[error("{message}")]
    Failure {
        /// Human-readable message.
        message: String,
    },
}

impl DecodeError {
    /// Creates a free-form decode failure.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    /// Wraps this error with the field it was raised under.
    #[must_use]
    pub fn at(self, field: impl Into<String>) -> Self {
        Self::AtField {
            field: field.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all field wrappers removed.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::AtField { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::failure(err.to_string())
    }
}

/// Errors building a stream engine or loading its configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is empty.
    #[error("Required field '{field}' is missing")]
    MissingField {
        /// Setting name.
        field: String,
    },

    /// A setting is longer than allowed.
    #[error("Field '{field}' exceeds maximum length of {max_length}")]
    FieldTooLong {
        /// Setting name.
        field: String,
        /// Maximum allowed length in bytes.
        max_length: usize,
    },

    /// A predicate was registered under an empty event name.
    #[error("Event name cannot be empty")]
    EmptyEventName,

    /// The configuration is otherwise unusable.
    #[error("Invalid configuration: {reason}")]
    Invalid {
        /// Why it was rejected.
        reason: String,
    },
}

/// Top-level error type for stream operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The event name has no registered predicate.
    #[error("Unknown event: {name}")]
    UnknownEvent {
        /// The unregistered event name.
        name: String,
    },

    /// The payload or an encoder output failed to decode.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl StreamError {
    /// Creates an unknown-event error.
    #[must_use]
    pub fn unknown_event(name: impl Into<String>) -> Self {
        Self::UnknownEvent { name: name.into() }
    }

    /// Returns true if the event name had no registered predicate.
    #[must_use]
    pub const fn is_unknown_event(&self) -> bool {
        matches!(self, Self::UnknownEvent { .. })
    }

    /// Returns true if this is a decode error.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// The decode error, if any.
    #[must_use]
    pub const fn as_decode(&self) -> Option<&DecodeError> {
        match self {
            Self::Decode(e) => Some(e),
            Self::UnknownEvent { .. } => None,
        }
    }
}

/// Result type alias for stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Renders an error as a human-readable string.
#[must_use]
pub fn error_to_string(err: &StreamError) -> String {
    err.to_string()
}
