//! Request/response transcoding.

use serde::Serialize;
use serde_json::Value as Json;

use crate::{Value, MAX_SAFE_INTEGER};

/// An outgoing integer cannot be represented on the wire without loss.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "integer {value} at {path} is outside the safe integer range (|n| <= {max})",
    max = MAX_SAFE_INTEGER
)]
pub struct EncodingRangeError {
    /// JSON path of the offending number, e.g. `$.custom_tlvs[0].type`.
    pub path: String,
    /// Decimal rendering of the offending number.
    pub value: String,
}

/// Failure to turn a request body into wire text.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// An integer exceeded the safe range.
    #[error(transparent)]
    Range(#[from] EncodingRangeError),
    /// The body could not be serialized to JSON at all.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Decodes a response body.
///
/// Every integer is parsed exactly and narrowed into [`crate::Int`]; key
/// and element order are kept. Empty or malformed input yields `None`, the
/// explicit "no value" marker, rather than an error.
pub fn decode(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    serde_json::from_str::<Value>(text).ok()
}

/// Encodes an already-built JSON tree, refusing any integer whose magnitude
/// exceeds [`MAX_SAFE_INTEGER`].
pub fn encode(value: &Json) -> Result<String, EncodingRangeError> {
    let mut path = String::from("$");
    check_range(value, &mut path)?;
    Ok(value.to_string())
}

/// Serializes `body` and applies [`encode`] to the result.
pub fn to_wire<T: Serialize + ?Sized>(body: &T) -> Result<String, EncodeError> {
    let json = serde_json::to_value(body).map_err(|e| EncodeError::Serialization(e.to_string()))?;
    Ok(encode(&json)?)
}

fn check_range(value: &Json, path: &mut String) -> Result<(), EncodingRangeError> {
    match value {
        Json::Number(n) => {
            let out_of_range = if let Some(u) = n.as_u64() {
                u > MAX_SAFE_INTEGER
            } else if let Some(i) = n.as_i64() {
                i.unsigned_abs() > MAX_SAFE_INTEGER
            } else {
                false
            };
            if out_of_range {
                return Err(EncodingRangeError { path: path.clone(), value: n.to_string() });
            }
            Ok(())
        }
        Json::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                let len = path.len();
                path.push_str(&format!("[{}]", i));
                check_range(item, path)?;
                path.truncate(len);
            }
            Ok(())
        }
        Json::Object(map) => {
            for (key, item) in map {
                let len = path.len();
                path.push('.');
                path.push_str(key);
                check_range(item, path)?;
                path.truncate(len);
            }
            Ok(())
        }
        Json::Null | Json::Bool(_) | Json::String(_) => Ok(()),
    }
}
