//! In-memory `TradingApi` that records the credentials it was called with.

use std::sync::Mutex;

use async_trait::async_trait;
use kraken_proxy_lib::models::{CredentialPair, PrivateRequest};
use kraken_proxy_lib::services::{TradingApi, UpstreamError};
use secrecy::ExposeSecret;
use serde_json::Value;

/// A recorded upstream call: method plus the credentials used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: String,
    pub api_key: String,
    pub api_secret: String,
}

pub struct MockTradingApi {
    ws_token: Result<String, UpstreamError>,
    private_result: Result<Value, UpstreamError>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTradingApi {
    pub fn new() -> Self {
        Self {
            ws_token: Ok("mocked-ws-token".to_string()),
            private_result: Ok(serde_json::json!({ "ZUSD": "171288.6158" })),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_ws_token_error(mut self, err: UpstreamError) -> Self {
        self.ws_token = Err(err);
        self
    }

    pub fn with_private_error(mut self, err: UpstreamError) -> Self {
        self.private_result = Err(err);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, method: &str, creds: &CredentialPair) {
        self.calls.lock().unwrap().push(RecordedCall {
            method: method.to_string(),
            api_key: creds.api_key.clone(),
            api_secret: creds.api_secret.expose_secret().to_string(),
        });
    }
}

#[async_trait]
impl TradingApi for MockTradingApi {
    async fn get_ws_auth_token(&self, creds: &CredentialPair) -> Result<String, UpstreamError> {
        self.record("GetWebSocketsToken", creds);
        self.ws_token.clone()
    }

    async fn private_request(
        &self,
        request: &PrivateRequest,
        creds: &CredentialPair,
    ) -> Result<Value, UpstreamError> {
        self.record(&request.method, creds);
        self.private_result.clone()
    }
}
