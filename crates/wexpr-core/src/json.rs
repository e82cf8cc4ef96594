//! Conversions between Wexpr values and `serde_json::Value`.
//!
//! JSON has no binary type and no numeric object keys, so binary blobs cross
//! over as `data:application/octet-stream;base64,...` strings (and such
//! strings convert back to binary) and numeric keys stringify.

use serde_json::Value as Json;

use crate::base64;
use crate::types::{Key, Value};

const BINARY_URI_PREFIX: &str = "data:application/octet-stream;base64,";

pub fn to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        // Integral values cross over as JSON integers so that a JSON number
        // survives a there-and-back conversion (serde_json treats 1 and 1.0
        // as distinct).
        Value::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
            Json::Number((*n as i64).into())
        }
        Value::Number(n) => serde_json::Number::from_f64(*n)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Value::String(s) => Json::String(s.clone()),
        Value::Binary(bytes) => {
            Json::String(format!("{BINARY_URI_PREFIX}{}", base64::to_base64(bytes)))
        }
        Value::Array(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::Map(entries) => Json::Object(
            entries
                .iter()
                .map(|(key, value)| (key.to_string(), to_json(value)))
                .collect(),
        ),
    }
}

pub fn from_json(json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => Value::Number(n.as_f64().unwrap_or_default()),
        Json::String(s) => match s.strip_prefix(BINARY_URI_PREFIX) {
            Some(b64) => Value::Binary(base64::from_base64(b64.as_bytes())),
            None => Value::String(s.clone()),
        },
        Json::Array(items) => Value::Array(items.iter().map(from_json).collect()),
        Json::Object(map) => Value::Map(
            map.iter()
                .map(|(key, value)| (Key::String(key.clone()), from_json(value)))
                .collect(),
        ),
    }
}
