//! Kraken private REST API access on behalf of a token holder.
//!
//! [`TradingApi`] is the seam handlers depend on; [`KrakenClient`] is the
//! reqwest-backed implementation used in production and [`KrakenService`]
//! is the thin facade registered as app data.
//!
//! Request signing follows Kraken's documented scheme:
//! `API-Sign = base64(HMAC-SHA512(base64decode(secret), path || SHA256(nonce || body)))`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use serde::Deserialize;
use sha2::{Digest, Sha256, Sha512};
use tracing::{debug, warn};

use crate::models::{CredentialPair, PrivateRequest};

type HmacSha512 = Hmac<Sha512>;

/// HTTP connect timeout for Kraken API calls.
const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// HTTP total timeout for Kraken API calls.
const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Private method returning a WebSocket authentication token.
const WS_TOKEN_METHOD: &str = "GetWebSocketsToken";
/// Private method returning account balances.
const BALANCE_METHOD: &str = "Balance";

/// A failed trading API call.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct UpstreamError {
    /// HTTP status to surface, when the upstream supplied a meaningful one.
    pub status: Option<u16>,
    pub message: String,
}

impl UpstreamError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Operations the proxy needs from the trading API.
#[async_trait]
pub trait TradingApi: Send + Sync {
    /// Fetch a token for Kraken's authenticated WebSocket feed.
    async fn get_ws_auth_token(&self, creds: &CredentialPair) -> Result<String, UpstreamError>;

    /// Call a private REST method and return its `result` object.
    async fn private_request(
        &self,
        request: &PrivateRequest,
        creds: &CredentialPair,
    ) -> Result<serde_json::Value, UpstreamError>;
}

/// Kraken response envelope.
#[derive(Deserialize)]
struct KrakenResponse {
    #[serde(default)]
    error: Vec<String>,
    result: Option<serde_json::Value>,
}

/// reqwest-backed Kraken private API client.
#[derive(Clone)]
pub struct KrakenClient {
    base_url: String,
    http_client: reqwest::Client,
    /// Last nonce handed out; shared by clones so nonces stay strictly increasing.
    last_nonce: Arc<AtomicU64>,
}

impl KrakenClient {
    pub fn new(base_url: &str) -> Result<Self, UpstreamError> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| UpstreamError::new(None, format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            last_nonce: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Microsecond timestamp, bumped past the previous nonce when calls collide.
    fn next_nonce(&self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_micros()).unwrap_or(0);
        let previous = self
            .last_nonce
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

/// Form-encode the request body, nonce first.
pub fn encode_body(nonce: &str, params: &[(String, String)]) -> String {
    let mut body = format!("nonce={}", urlencoding::encode(nonce));
    for (name, value) in params {
        body.push('&');
        body.push_str(&urlencoding::encode(name));
        body.push('=');
        body.push_str(&urlencoding::encode(value));
    }
    body
}

/// Compute the `API-Sign` header for a private call.
pub fn sign(path: &str, nonce: &str, body: &str, secret: &str) -> Result<String, UpstreamError> {
    let secret = STANDARD
        .decode(secret)
        .map_err(|_| UpstreamError::new(Some(401), "API secret is not valid base64"))?;

    let mut sha = Sha256::new();
    sha.update(nonce.as_bytes());
    sha.update(body.as_bytes());
    let digest = sha.finalize();

    let mut mac = HmacSha512::new_from_slice(&secret)
        .map_err(|_| UpstreamError::new(Some(401), "API secret has an invalid length"))?;
    mac.update(path.as_bytes());
    mac.update(&digest);

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

#[async_trait]
impl TradingApi for KrakenClient {
    async fn get_ws_auth_token(&self, creds: &CredentialPair) -> Result<String, UpstreamError> {
        let result = self
            .private_request(&PrivateRequest::new(WS_TOKEN_METHOD), creds)
            .await?;

        result
            .get("token")
            .and_then(|t| t.as_str())
            .map(str::to_string)
            .ok_or_else(|| UpstreamError::new(Some(502), "Kraken response did not include a token"))
    }

    async fn private_request(
        &self,
        request: &PrivateRequest,
        creds: &CredentialPair,
    ) -> Result<serde_json::Value, UpstreamError> {
        let path = request.path();
        let nonce = self.next_nonce().to_string();
        let body = encode_body(&nonce, &request.params);
        let signature = sign(&path, &nonce, &body, creds.api_secret.expose_secret())?;

        debug!(method = %request.method, "Calling Kraken private API");

        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, path))
            .header("API-Key", &creds.api_key)
            .header("API-Sign", signature)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded; charset=utf-8",
            )
            .body(body)
            .send()
            .await
            .map_err(|e| {
                warn!("Kraken request to {} failed: {}", path, e);
                UpstreamError::new(Some(502), "Failed to reach the Kraken API")
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Kraken returned HTTP {} for {}", status, path);
            return Err(UpstreamError::new(
                Some(status.as_u16()),
                format!("Kraken API returned HTTP {}", status.as_u16()),
            ));
        }

        let parsed: KrakenResponse = response.json().await.map_err(|e| {
            warn!("Kraken response for {} was not valid JSON: {}", path, e);
            UpstreamError::new(Some(502), "Invalid response from the Kraken API")
        })?;

        if !parsed.error.is_empty() {
            return Err(UpstreamError::new(None, parsed.error.join(", ")));
        }

        parsed
            .result
            .ok_or_else(|| UpstreamError::new(Some(502), "Kraken response did not include a result"))
    }
}

/// Facade over the trading API injected into handlers.
#[derive(Clone)]
pub struct KrakenService {
    api: Arc<dyn TradingApi>,
}

impl KrakenService {
    pub fn new(api: Arc<dyn TradingApi>) -> Self {
        Self { api }
    }

    pub async fn get_ws_token(&self, creds: &CredentialPair) -> Result<String, UpstreamError> {
        self.api.get_ws_auth_token(creds).await
    }

    pub async fn get_balance(
        &self,
        creds: &CredentialPair,
    ) -> Result<serde_json::Value, UpstreamError> {
        self.api
            .private_request(&PrivateRequest::new(BALANCE_METHOD), creds)
            .await
    }
}
