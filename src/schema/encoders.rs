use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::engine::StreamEngine;
use crate::error::DecodeError;
use crate::schema;
use crate::trigger::{encoder, OutgoingEncoder};

/// Emits the event data field of the payload unchanged.
#[must_use]
pub fn event_data() -> OutgoingEncoder {
    encoder(|_, payload, engine| Ok(engine.config().data_of(payload)?.clone()))
}

/// Emits how many recorded events match the trigger's matcher, including the
/// one being processed.
#[must_use]
pub fn match_count() -> OutgoingEncoder {
    encoder(|matcher, _, engine| {
        Ok(json!({
            "matcher": matcher,
            "count": engine.get_events(matcher).len(),
        }))
    })
}

/// Decodes the event data into `T`, maps it with `f`, and serializes the
/// result.
pub fn typed<T, O, F>(f: F) -> OutgoingEncoder
where
    T: DeserializeOwned + 'static,
    O: Serialize + 'static,
    F: Fn(&str, T, &StreamEngine) -> Result<O, DecodeError> + Send + Sync + 'static,
{
    encoder(move |matcher, payload, engine| {
        let data: T = schema::decode_field(payload, &engine.config().event_data_field)?;
        let out = f(matcher, data, engine)?;
        serde_json::to_value(out).map_err(DecodeError::from)
    })
}
