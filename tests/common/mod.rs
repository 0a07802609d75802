#![allow(dead_code)]

use async_trait::async_trait;
use deribit_http_client::{
    ClientConfig, Credentials, DeribitClient, RawResponse, Transport, TransportError,
};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BASE_URL: &str = "https://test.deribit.com/api/v2";

#[derive(Debug, Clone)]
pub struct SentRequest {
    pub url: String,
    pub body: Value,
    pub token: Option<String>,
}

/// Replays canned responses in order, then repeats `fallback`, and records
/// everything it was asked to send.
pub struct MockTransport {
    queued: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    fallback: Result<RawResponse, TransportError>,
    delay: Option<Duration>,
    sent: Mutex<Vec<SentRequest>>,
}

impl MockTransport {
    pub fn replying(body: &str) -> Arc<Self> {
        Arc::new(Self::new(Ok(RawResponse::ok(body)), None))
    }

    pub fn replying_value(body: Value) -> Arc<Self> {
        Self::replying(&body.to_string())
    }

    pub fn replying_with(response: RawResponse) -> Arc<Self> {
        Arc::new(Self::new(Ok(response), None))
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self::new(
            Err(TransportError::Request("connection refused".into())),
            None,
        ))
    }

    pub fn slow(body: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self::new(Ok(RawResponse::ok(body)), Some(delay)))
    }

    fn new(fallback: Result<RawResponse, TransportError>, delay: Option<Duration>) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            fallback,
            delay,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn enqueue(&self, body: Value) {
        self.queued
            .lock()
            .unwrap()
            .push_back(Ok(RawResponse::ok(body.to_string())));
    }

    pub fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_sent(&self) -> SentRequest {
        self.sent().last().cloned().expect("nothing was sent")
    }

    pub fn clear_sent(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        url: &str,
        body: String,
        bearer_token: Option<&str>,
    ) -> Result<RawResponse, TransportError> {
        self.sent.lock().unwrap().push(SentRequest {
            url: url.to_string(),
            body: serde_json::from_str(&body).expect("client sent invalid JSON"),
            token: bearer_token.map(str::to_string),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.queued.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

pub fn client(transport: &Arc<MockTransport>) -> DeribitClient {
    let config = ClientConfig::builder().base_url(BASE_URL).build().unwrap();
    DeribitClient::with_transport(config, transport.clone())
}

pub fn auth_result() -> Value {
    json!({
        "jsonrpc": "2.0",
        "result": {
            "access_token": "tok123",
            "refresh_token": "r1",
            "expires_in": 900,
            "scope": "all",
            "token_type": "bearer"
        }
    })
}

/// Client whose session was established through the mock; the auth
/// request is removed from the sent log.
pub async fn authenticated_client(transport: &Arc<MockTransport>) -> DeribitClient {
    let client = client(transport);
    transport.enqueue(auth_result());
    client
        .authenticate(&Credentials::new("X", "Y"))
        .await
        .expect("mock authentication should succeed");
    transport.clear_sent();
    client
}
