//! Request/response envelope codec.
//!
//! Responses are decoded into a generic [`serde_json::Value`] rather than a
//! typed struct: the service is loose about which keys it sends, and callers
//! may ask for the untouched envelope.

use serde::Serialize;
use serde_json::Value;

use crate::error::{RemoteError, Result, SaploError, UNKNOWN_ERROR_MESSAGE};

/// Outgoing JSON-RPC request.
///
/// Serializes to exactly `{"method", "params", "id"}`.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<'a> {
    pub method: &'a str,
    pub params: &'a Value,
    pub id: u64,
}

impl<'a> RpcRequest<'a> {
    pub fn new(method: &'a str, params: &'a Value, id: u64) -> Self {
        Self { method, params, id }
    }
}

/// Encode a request envelope into the POST body.
pub fn encode_request(method: &str, params: &Value, id: u64) -> Result<Vec<u8>> {
    serde_json::to_vec(&RpcRequest::new(method, params, id))
        .map_err(|e| SaploError::Protocol(format!("Failed to serialize request: {}", e)))
}

/// Decode a response body into a generic JSON value.
pub fn decode_response(body: &[u8]) -> Result<Value> {
    serde_json::from_slice(body)
        .map_err(|e| SaploError::Protocol(format!("Failed to parse response: {}", e)))
}

/// Fail with [`RemoteError`] if the envelope carries an `error` key.
///
/// Any `error` key counts, `null` included. Missing `msg` becomes
/// `"Unknown error"`, missing `code` stays `None`.
pub fn check_error(envelope: Value) -> Result<Value> {
    match envelope.get("error") {
        None => Ok(envelope),
        Some(error) => Err(SaploError::Remote(remote_error(error))),
    }
}

fn remote_error(error: &Value) -> RemoteError {
    match error {
        Value::Object(fields) => RemoteError {
            message: match fields.get("msg") {
                None | Some(Value::Null) => UNKNOWN_ERROR_MESSAGE.to_string(),
                Some(Value::String(msg)) => msg.clone(),
                Some(other) => other.to_string(),
            },
            code: fields.get("code").filter(|c| !c.is_null()).cloned(),
        },
        // Some gateways send a bare string instead of an object
        Value::String(msg) => RemoteError {
            message: msg.clone(),
            code: None,
        },
        _ => RemoteError {
            message: UNKNOWN_ERROR_MESSAGE.to_string(),
            code: None,
        },
    }
}

/// Per-operation trimming of successful responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimPolicy {
    /// Unwrap `result` instead of returning the full envelope.
    pub enabled: bool,
    /// Narrow `result` further to this key.
    pub result_key: Option<String>,
}

impl Default for TrimPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            result_key: None,
        }
    }
}

impl TrimPolicy {
    /// Return the full envelope untouched.
    pub fn full() -> Self {
        Self {
            enabled: false,
            result_key: None,
        }
    }

    /// Return `result[key]`.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            enabled: true,
            result_key: Some(key.into()),
        }
    }
}

/// Unwrap a successful envelope according to `policy`.
///
/// Only called on envelopes that already passed [`check_error`].
pub fn apply_trim(envelope: Value, policy: &TrimPolicy) -> Result<Value> {
    if !policy.enabled {
        return Ok(envelope);
    }

    let mut result = match envelope {
        Value::Object(mut fields) => fields
            .remove("result")
            .ok_or_else(|| SaploError::Protocol("Response missing result".to_string()))?,
        _ => {
            return Err(SaploError::Protocol(
                "Response is not a JSON object".to_string(),
            ))
        }
    };

    match &policy.result_key {
        None => Ok(result),
        Some(key) => result
            .as_object_mut()
            .and_then(|fields| fields.remove(key.as_str()))
            .ok_or_else(|| SaploError::Protocol(format!("Result missing '{}'", key))),
    }
}
