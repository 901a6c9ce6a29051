//! Payload access helpers and ready-made capabilities.
//!
//! The engine treats decoding and encoding as opaque caller-supplied
//! functions. This module provides the field accessors the engine itself
//! needs, plus common predicate and encoder constructors built on serde.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::DecodeError;

/// Ready-made outgoing encoders.
pub mod encoders;
/// Ready-made matcher predicates.
pub mod predicates;

/// Returns a human-readable name for a JSON value's type.
#[must_use]
pub const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Looks up a top-level field of an object payload.
pub fn field<'a>(payload: &'a Value, name: &str) -> Result<&'a Value, DecodeError> {
    let Value::Object(map) = payload else {
        return Err(DecodeError::UnexpectedType {
            field: name.to_string(),
            expected: "object".to_string(),
            found: json_type_name(payload).to_string(),
        });
    };
    map.get(name).ok_or_else(|| DecodeError::MissingField {
        field: name.to_string(),
    })
}

/// Reads the event name of a payload as a string.
pub fn event_name(payload: &Value, name_field: &str) -> Result<String, DecodeError> {
    match field(payload, name_field)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(DecodeError::UnexpectedType {
            field: name_field.to_string(),
            expected: "string".to_string(),
            found: json_type_name(other).to_string(),
        }),
    }
}

/// Decodes a top-level field into `T`.
pub fn decode_field<T: DeserializeOwned>(payload: &Value, name: &str) -> Result<T, DecodeError> {
    let raw = field(payload, name)?;
    T::deserialize(raw).map_err(|e| DecodeError::from(e).at(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Point {
        x: i64,
    }

    #[test]
    fn event_name_reads_string_field() {
        let p = json!({"eventName": "Click", "eventData": {}});
        assert_eq!(event_name(&p, "eventName").unwrap(), "Click");
    }

    #[test]
    fn event_name_rejects_missing_or_wrong_type() {
        let missing = json!({"eventData": {}});
        assert_eq!(
            event_name(&missing, "eventName").unwrap_err(),
            DecodeError::MissingField {
                field: "eventName".to_string()
            }
        );

        let number = json!({"eventName": 7});
        assert!(matches!(
            event_name(&number, "eventName").unwrap_err(),
            DecodeError::UnexpectedType { ref found, .. } if found == "number"
        ));

        let not_object = json!(["Click"]);
        assert!(matches!(
            event_name(&not_object, "eventName").unwrap_err(),
            DecodeError::UnexpectedType { ref expected, .. } if expected == "object"
        ));
    }

    #[test]
    fn decode_field_wraps_errors_with_path() {
        let ok = json!({"eventData": {"x": 3}});
        assert_eq!(decode_field::<Point>(&ok, "eventData").unwrap(), Point { x: 3 });

        let bad = json!({"eventData": {"x": "three"}});
        let err = decode_field::<Point>(&bad, "eventData").unwrap_err();
        assert!(matches!(err, DecodeError::AtField { ref field, .. } if field == "eventData"));
    }
}
