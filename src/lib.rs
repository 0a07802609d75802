use serde::Serialize;
use serde_json::Value;

pub mod auth;
pub mod call;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod requests;
pub mod response;
pub mod rpc;
pub mod transport;

pub use auth::{Credentials, Session};
pub use call::{CallHandle, CallSlot, CallState};
pub use client::DeribitClient;
pub use config::{ClientConfig, ClientConfigBuilder, Env};
pub use error::{Error, ErrorData, Result, RpcError, TransportError, ValidationError};
pub use models::*;
pub use requests::*;
pub use response::{RpcResponse, interpret};
pub use rpc::{IdGenerator, JsonRpcVersion, RpcRequest};
pub use transport::{HttpTransport, RawResponse, Transport};

// ApiRequest trait for all request types
pub trait ApiRequest: Serialize {
    type Response;
    fn method_name(&self) -> &'static str;

    fn is_private(&self) -> bool {
        self.method_name().starts_with("private/")
    }

    fn to_params(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Pre-flight checks; a request that fails them is never sent.
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        Ok(())
    }

    /// Projects the typed response out of a successful `result`.
    fn parse_result(result: Value) -> Result<Self::Response>;
}
