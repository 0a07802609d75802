use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Error object carried by a JSON-RPC failure response.
///
/// Every field is optional on the wire; the exchange sends `data` only for
/// some errors, and with varying shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ErrorData>,
}

/// Known shapes of `error.data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorData {
    Param { param: String, reason: String },
    Other(Value),
}

impl RpcError {
    /// Builds an `RpcError` from an arbitrary `error` value.
    ///
    /// Never fails: a value that is not an object, or fields with the wrong
    /// type, fall back to `code = 0` and an empty message.
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            return Self {
                code: 0,
                message: value.as_str().unwrap_or_default().to_string(),
                data: None,
            };
        }
        let code = value.get("code").and_then(Value::as_i64).unwrap_or(0);
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let data = value.get("data").filter(|d| !d.is_null()).map(|d| {
            match (
                d.get("param").and_then(Value::as_str),
                d.get("reason").and_then(Value::as_str),
            ) {
                (Some(param), Some(reason)) => ErrorData::Param {
                    param: param.to_string(),
                    reason: reason.to_string(),
                },
                _ => ErrorData::Other(d.clone()),
            }
        });
        Self {
            code,
            message,
            data,
        }
    }

    /// Message suitable for showing to a user, e.g.
    /// `Invalid params (amount: must be positive)`. When `data` carries only
    /// one of `param` and `reason`, that one is shown alone.
    pub fn summary(&self) -> String {
        let message = if self.message.is_empty() {
            format!("RPC error {}", self.code)
        } else {
            self.message.clone()
        };
        match &self.data {
            Some(ErrorData::Param { param, reason }) => format!("{message} ({param}: {reason})"),
            Some(ErrorData::Other(data)) => {
                let field = |key: &str| data.get(key).and_then(Value::as_str);
                match field("param").or_else(|| field("reason")) {
                    Some(detail) => format!("{message} ({detail})"),
                    None => message,
                }
            }
            None => message,
        }
    }
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}

/// The HTTP call did not produce a usable body.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("empty response body")]
    EmptyBody,
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError::Request(e.to_string())
    }
}

/// Client-side pre-flight check failure. Requests failing these checks are
/// never sent.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{0} must be positive")]
    NotPositive(&'static str),
    #[error("either amount or contracts must be positive")]
    MissingQuantity,
    #[error("price is required for {0} orders")]
    MissingPrice(&'static str),
    #[error("label must be at most {max} characters, got {len}")]
    LabelTooLong { len: usize, max: usize },
    #[error("unsupported order book depth {0}")]
    InvalidDepth(u32),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    RpcError(RpcError),
    #[error("Transport error: {0}")]
    TransportError(#[from] TransportError),
    #[error("JSON decode error: {0}")]
    ParseError(String),
    #[error("Invalid request: {0}")]
    ValidationError(#[from] ValidationError),
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    #[error("Cancelled")]
    Cancelled,
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::ParseError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
