//! Kraken proxy request and response bodies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// WebSocket token payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WsToken {
    pub token: String,
}

/// Response for `GET /ws-token`, shaped like Kraken's own `{ result }` envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WsTokenResponse {
    pub result: WsToken,
}

impl WsTokenResponse {
    pub fn new(token: String) -> Self {
        Self {
            result: WsToken { token },
        }
    }
}

/// A call to a Kraken private REST method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateRequest {
    /// Method name appended to `/0/private/`, e.g. `Balance`.
    pub method: String,
    /// Extra form parameters sent after the nonce.
    pub params: Vec<(String, String)>,
}

impl PrivateRequest {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// URL path used both for the request and for signing.
    pub fn path(&self) -> String {
        format!("/0/private/{}", self.method)
    }
}
