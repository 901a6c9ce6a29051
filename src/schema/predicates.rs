use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::DecodeError;
use crate::matcher::{predicate, MatcherPredicate};
use crate::schema::{self, json_type_name};

const REGEX_CACHE_MAX: usize = 1024;

static REGEX_CACHE: OnceLock<RwLock<HashMap<String, Regex>>> = OnceLock::new();

fn cached_regex(pattern: &str) -> Result<Regex, DecodeError> {
    let cache = REGEX_CACHE.get_or_init(|| RwLock::new(HashMap::new()));

    {
        let guard = cache
            .read()
            .map_err(|_| DecodeError::failure("regex cache lock poisoned"))?;
        if let Some(re) = guard.get(pattern) {
            return Ok(re.clone());
        }
    }

    let compiled = Regex::new(pattern)
        .map_err(|e| DecodeError::failure(format!("invalid regex '{pattern}': {e}")))?;

    let mut guard = cache
        .write()
        .map_err(|_| DecodeError::failure("regex cache lock poisoned"))?;

    if guard.len() >= REGEX_CACHE_MAX {
        guard.clear();
    }

    guard
        .entry(pattern.to_string())
        .or_insert_with(|| compiled.clone());
    Ok(compiled)
}

fn string_at<'a>(payload: &'a Value, pointer: &str) -> Result<&'a str, DecodeError> {
    let value = payload.pointer(pointer).ok_or_else(|| DecodeError::MissingField {
        field: pointer.to_string(),
    })?;
    value.as_str().ok_or_else(|| DecodeError::UnexpectedType {
        field: pointer.to_string(),
        expected: "string".to_string(),
        found: json_type_name(value).to_string(),
    })
}

/// Accepts any payload; the event matches only by its exact name.
#[must_use]
pub fn name_only() -> MatcherPredicate {
    predicate(|_, _| Ok(false))
}

/// Decodes `data_field` into `T` and hands it to `f` with the matcher.
///
/// Self-validation therefore requires the data to decode as `T`.
pub fn with_data<T, F>(data_field: impl Into<String>, f: F) -> MatcherPredicate
where
    T: DeserializeOwned + 'static,
    F: Fn(&str, &T) -> bool + Send + Sync + 'static,
{
    let data_field = data_field.into();
    predicate(move |matcher, payload| {
        let data: T = schema::decode_field(payload, &data_field)?;
        Ok(f(matcher, &data))
    })
}

/// Regex matching on a string inside the payload.
///
/// Matchers of the form `"<event_name>:<regex>"` match when the string at
/// JSON pointer `pointer` matches `<regex>`. Other matchers never match.
/// The string must be present for the payload to validate.
pub fn field_pattern(event_name: impl Into<String>, pointer: impl Into<String>) -> MatcherPredicate {
    let prefix = format!("{}:", event_name.into());
    let pointer = pointer.into();
    predicate(move |matcher, payload| {
        let target = string_at(payload, &pointer)?;
        let Some(pattern) = matcher.strip_prefix(prefix.as_str()) else {
            return Ok(false);
        };
        Ok(cached_regex(pattern)?.is_match(target))
    })
}
