//! Classification of raw response bodies and tolerant field access.

use crate::error::RpcError;
use serde_json::Value;

/// A classified JSON-RPC response.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcResponse {
    Success { id: Option<u64>, result: Value },
    Failure { id: Option<u64>, error: RpcError },
    /// Not valid JSON, not an object, or neither `result` nor `error`.
    Malformed(String),
}

impl RpcResponse {
    pub fn id(&self) -> Option<u64> {
        match self {
            RpcResponse::Success { id, .. } | RpcResponse::Failure { id, .. } => *id,
            RpcResponse::Malformed(_) => None,
        }
    }
}

/// Classifies a raw response body. Total: every input maps to exactly one
/// variant.
///
/// When a payload carries both `error` and `result`, `error` wins.
pub fn interpret(raw: &str) -> RpcResponse {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => return RpcResponse::Malformed(e.to_string()),
    };
    let mut object = match value {
        Value::Object(object) => object,
        other => {
            return RpcResponse::Malformed(format!(
                "expected a JSON object, got {}",
                kind_of(&other)
            ));
        }
    };
    let id = object.get("id").and_then(Value::as_u64);
    if let Some(error) = object.get("error") {
        return RpcResponse::Failure {
            id,
            error: RpcError::from_value(error),
        };
    }
    match object.remove("result") {
        Some(result) => RpcResponse::Success { id, result },
        None => RpcResponse::Malformed("response has neither `result` nor `error`".to_string()),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// Field projection. Missing or wrongly-typed fields fall back to defaults.

pub(crate) fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn opt_str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

pub(crate) fn f64_field(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(Value::as_f64)
}

pub(crate) fn u64_field(value: &Value, key: &str) -> u64 {
    value.get(key).and_then(Value::as_u64).unwrap_or(0)
}

pub(crate) fn bool_field(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Reads `[[price, amount], ...]` levels, skipping entries of any other shape.
pub(crate) fn levels_field(value: &Value, key: &str) -> Vec<(f64, f64)> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|levels| {
            levels
                .iter()
                .filter_map(|level| match level.as_array()?.as_slice() {
                    [price, amount] => Some((price.as_f64()?, amount.as_f64()?)),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}
