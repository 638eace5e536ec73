//! Credential token issuance and redemption.
//!
//! A token is the standard base64 encoding of
//! `{"key": Envelope, "secret": Envelope}`. It carries no expiry: a token
//! stays valid for as long as the server secret does not change.

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::crypto::{CodecError, Envelope, EnvelopeCodec, ServerSecret};
use crate::models::CredentialPair;

/// Token issuance/redemption failures.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The token is not base64 or does not contain the expected structure.
    #[error("Malformed token: {0}")]
    Format(String),

    /// One of the envelopes failed to open.
    #[error("Token failed integrity check: {0}")]
    Integrity(#[source] CodecError),

    /// Sealing or serialization failed while issuing a token.
    #[error("Failed to issue token: {0}")]
    Issue(String),
}

#[derive(Serialize, Deserialize)]
struct TokenPayload {
    key: Envelope,
    secret: Envelope,
}

/// Turns credential pairs into opaque tokens and back.
#[derive(Debug, Clone)]
pub struct CredentialTokenService {
    codec: Arc<EnvelopeCodec>,
}

impl CredentialTokenService {
    pub fn new(secret: &ServerSecret) -> Self {
        Self::with_codec(EnvelopeCodec::new(secret))
    }

    pub fn with_codec(codec: EnvelopeCodec) -> Self {
        Self {
            codec: Arc::new(codec),
        }
    }

    /// Seal both credential fields under independent IVs and encode the result.
    pub fn issue(&self, pair: &CredentialPair) -> Result<String, TokenError> {
        let payload = TokenPayload {
            key: self
                .codec
                .seal(&pair.api_key)
                .map_err(|e| TokenError::Issue(e.to_string()))?,
            secret: self
                .codec
                .seal(pair.api_secret.expose_secret())
                .map_err(|e| TokenError::Issue(e.to_string()))?,
        };

        let json = serde_json::to_vec(&payload).map_err(|e| TokenError::Issue(e.to_string()))?;
        Ok(STANDARD.encode(json))
    }

    /// Decode a token and open both envelopes.
    pub fn redeem(&self, token: &str) -> Result<CredentialPair, TokenError> {
        let json = STANDARD
            .decode(token)
            .map_err(|e| TokenError::Format(format!("invalid base64: {}", e)))?;

        let payload: TokenPayload = serde_json::from_slice(&json)
            .map_err(|e| TokenError::Format(format!("invalid payload: {}", e)))?;

        let api_key = self.codec.open(&payload.key).map_err(TokenError::Integrity)?;
        let api_secret = self
            .codec
            .open(&payload.secret)
            .map_err(TokenError::Integrity)?;

        Ok(CredentialPair {
            api_key,
            api_secret: SecretString::from(api_secret),
        })
    }
}
