//! Stream engine configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, DecodeError};
use crate::schema;

/// Default field carrying the event name of an incoming payload.
pub const DEFAULT_EVENT_NAME_FIELD: &str = "eventName";

/// Default field carrying the event data of an incoming payload.
pub const DEFAULT_EVENT_DATA_FIELD: &str = "eventData";

/// Upper bound for configured field names.
pub const MAX_FIELD_NAME_LEN: usize = 256;

/// Wire-shape settings for incoming payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Field read to determine the event name.
    pub event_name_field: String,
    /// Field holding the event-specific data.
    pub event_data_field: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            event_name_field: DEFAULT_EVENT_NAME_FIELD.to_string(),
            event_data_field: DEFAULT_EVENT_DATA_FIELD.to_string(),
        }
    }
}

impl StreamConfig {
    /// Parses and validates a configuration from JSON.
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| ConfigError::Invalid {
            reason: format!("invalid config json: {e}"),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_field_name("event_name_field", &self.event_name_field)?;
        validate_field_name("event_data_field", &self.event_data_field)?;
        if self.event_name_field == self.event_data_field {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "event_name_field and event_data_field must differ (both '{}')",
                    self.event_name_field
                ),
            });
        }
        Ok(())
    }

    /// Returns the event data of `payload`.
    pub fn data_of<'a>(&self, payload: &'a Value) -> Result<&'a Value, DecodeError> {
        schema::field(payload, &self.event_data_field)
    }
}

fn validate_field_name(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField {
            field: field.to_string(),
        });
    }
    if value.len() > MAX_FIELD_NAME_LEN {
        return Err(ConfigError::FieldTooLong {
            field: field.to_string(),
            max_length: MAX_FIELD_NAME_LEN,
        });
    }
    Ok(())
}
