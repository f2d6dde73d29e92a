//! Converts between JSON and [`Value`].
//!
//! JSON coming in (CLI arguments, fixtures) maps onto the loosest matching
//! `Value`; the encoder then coerces it against the target type, so a JSON
//! string can stand for an address, a big integer or hex bytes. JSON going
//! out uses `Value`'s own serialization.

use abicodec_core::{
    error::{AbiError, EncodeError},
    Type, Value,
};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use crate::decoder;

/// Convert parsed JSON into a `Value`.
pub fn from_json(json: &serde_json::Value) -> Result<Value, EncodeError> {
    match json {
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok(Value::Uint(u))
            } else if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else {
                // Floats lose precision; big integers must be passed as strings.
                Err(EncodeError::InvalidLiteral {
                    ty: "integer".into(),
                    literal: n.to_string(),
                })
            }
        }
        serde_json::Value::String(s) => Ok(Value::Str(s.clone())),
        serde_json::Value::Array(items) => items
            .iter()
            .map(from_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_json::Value::Object(map) => map
            .iter()
            .map(|(k, v)| Ok((k.clone(), from_json(v)?)))
            .collect::<Result<IndexMap<String, Value>, EncodeError>>()
            .map(Value::Tuple),
        serde_json::Value::Null => Err(EncodeError::InvalidLiteral {
            ty: "value".into(),
            literal: "null".into(),
        }),
    }
}

/// Parse JSON text into a `Value`.
pub fn from_json_str(text: &str) -> Result<Value, AbiError> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    Ok(from_json(&json)?)
}

/// Render a `Value` as JSON.
pub fn to_json(value: &Value) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

/// Decode `data` as `ty` and deserialize the result into `T`.
///
/// Tuple members map to struct fields by name; unnamed members are keyed
/// `"0"`, `"1"`, ... Big integers arrive as decimal strings, so `U256` and
/// `String` fields both work for them.
pub fn decode_into<T: DeserializeOwned>(ty: &Type, data: &[u8]) -> Result<T, AbiError> {
    let value = decoder::decode(ty, data)?;
    Ok(serde_json::from_value(to_json(&value))?)
}
