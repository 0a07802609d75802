use crate::ApiRequest;
use crate::auth::Session;
use crate::config::ClientConfig;
use crate::error::{Error, Result, TransportError};
use crate::models::{ApiVersion, Instrument, Order, OrderBook, PlacedOrder, Position};
use crate::requests::{
    Kind, OpenOrdersType, OrderRequest, PrivateCancelRequest, PrivateEditRequest,
    PrivateGetOpenOrdersRequest, PrivateGetPositionRequest, PublicGetInstrumentsRequest,
    PublicGetOrderBookRequest, PublicTestRequest,
};
use crate::response::{RpcResponse, interpret};
use crate::rpc::{IdGenerator, RpcRequest};
use crate::transport::{HttpTransport, RawResponse, Transport};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Longest slice of an unparsable body kept in an error message.
const BODY_EXCERPT_LEN: usize = 200;

#[derive(Clone)]
pub struct DeribitClient {
    transport: Arc<dyn Transport>,
    config: Arc<ClientConfig>,
    ids: IdGenerator,
    pub(crate) session: Arc<RwLock<Option<Session>>>,
}

impl std::fmt::Debug for DeribitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeribitClient")
            .field("config", &self.config)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

impl DeribitClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.request_timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Client for the public test exchange with default timeouts.
    pub fn testnet() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            config: Arc::new(config),
            ids: IdGenerator::new(),
            session: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Drops the stored session; private calls fail until the next
    /// `authenticate`.
    pub async fn clear_session(&self) {
        *self.session.write().await = None;
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.config.base_url, method)
    }

    async fn access_token(&self) -> Result<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|session| session.access_token.clone())
            .ok_or(Error::NotAuthenticated)
    }

    /// Sends `method` with `params` and returns the raw `result`.
    ///
    /// Methods under `private/` carry the session's bearer token and fail with
    /// `Error::NotAuthenticated` when there is none.
    pub async fn call_raw(&self, method: &str, params: Value) -> Result<Value> {
        let token = if method.starts_with("private/") {
            Some(self.access_token().await?)
        } else {
            None
        };
        let request = RpcRequest::new(self.ids.next_id(), method, params);
        tracing::debug!(method, id = request.id, "sending request");

        let raw = self
            .transport
            .send(&self.endpoint(method), request.to_body(), token.as_deref())
            .await
            .inspect_err(|e| tracing::error!(method, id = request.id, error = %e, "transport failed"))?;
        resolve(&request, raw)
    }

    /// Validates `req`, sends it and projects the typed result.
    pub async fn call<R: ApiRequest>(&self, req: R) -> Result<R::Response> {
        req.validate().inspect_err(|e| {
            tracing::warn!(method = req.method_name(), error = %e, "request rejected before sending");
        })?;
        let result = self.call_raw(req.method_name(), req.to_params()).await?;
        R::parse_result(result).inspect_err(|e| {
            tracing::warn!(method = req.method_name(), error = %e, "unusable result");
        })
    }

    pub async fn list_instruments(&self) -> Result<Vec<Instrument>> {
        self.call(PublicGetInstrumentsRequest::default()).await
    }

    pub async fn list_instrument_names(&self) -> Result<Vec<String>> {
        Ok(self
            .list_instruments()
            .await?
            .into_iter()
            .map(|instrument| instrument.name)
            .collect())
    }

    pub async fn test_connectivity(&self) -> Result<ApiVersion> {
        self.call(PublicTestRequest {}).await
    }

    pub async fn get_order_book(&self, instrument_name: &str, depth: u32) -> Result<OrderBook> {
        self.call(PublicGetOrderBookRequest {
            instrument_name: instrument_name.to_string(),
            depth,
        })
        .await
    }

    pub async fn get_position(&self, instrument_name: &str) -> Result<Position> {
        self.call(PrivateGetPositionRequest {
            instrument_name: instrument_name.to_string(),
        })
        .await
    }

    pub async fn get_open_orders(&self, kind: Kind, r#type: OpenOrdersType) -> Result<Vec<Order>> {
        self.call(PrivateGetOpenOrdersRequest { kind, r#type }).await
    }

    pub async fn place_order(&self, order: OrderRequest) -> Result<PlacedOrder> {
        self.call(order).await
    }

    pub async fn modify_order(
        &self,
        order_id: &str,
        amount: Option<f64>,
        contracts: Option<f64>,
    ) -> Result<PlacedOrder> {
        self.call(PrivateEditRequest {
            order_id: order_id.to_string(),
            amount,
            contracts,
        })
        .await
    }

    /// Fails unless the exchange reports the order as `cancelled`.
    pub async fn cancel_order(&self, order_id: &str) -> Result<Order> {
        self.call(PrivateCancelRequest {
            order_id: order_id.to_string(),
        })
        .await
    }
}

/// Turns one HTTP exchange into the request's `result`.
///
/// A JSON-RPC body decides the outcome whatever the status code. A body that
/// is not one is reported as a status error on non-2xx, and as a parse error
/// otherwise.
fn resolve(request: &RpcRequest, raw: RawResponse) -> Result<Value> {
    if raw.body.trim().is_empty() {
        let error = if raw.is_success() {
            TransportError::EmptyBody
        } else {
            TransportError::Status {
                status: raw.status,
                body: String::new(),
            }
        };
        tracing::error!(method = %request.method, id = request.id, error = %error, "no response body");
        return Err(error.into());
    }

    match interpret(&raw.body) {
        RpcResponse::Success { id, result } => {
            if let Some(id) = id
                && id != request.id
            {
                tracing::warn!(method = %request.method, sent = request.id, received = id, "response id mismatch");
                return Err(Error::UnexpectedResponse(format!(
                    "response id {id} does not match request id {}",
                    request.id
                )));
            }
            Ok(result)
        }
        RpcResponse::Failure { error, .. } => {
            tracing::warn!(
                method = %request.method,
                id = request.id,
                code = error.code,
                message = %error.message,
                "exchange returned an error"
            );
            Err(Error::RpcError(error))
        }
        RpcResponse::Malformed(diagnostic) => {
            tracing::warn!(method = %request.method, id = request.id, status = raw.status, %diagnostic, "malformed response");
            if raw.is_success() {
                Err(Error::ParseError(diagnostic))
            } else {
                Err(TransportError::Status {
                    status: raw.status,
                    body: raw.body.chars().take(BODY_EXCERPT_LEN).collect(),
                }
                .into())
            }
        }
    }
}
