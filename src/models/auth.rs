//! Login request and response bodies.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::CredentialPair;

/// Login request: the raw Kraken credentials to seal.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub api_key: String,
    #[schema(value_type = String)]
    pub api_secret: SecretString,
}

impl LoginRequest {
    /// Field names that are present but empty.
    pub fn empty_fields(&self) -> Vec<&'static str> {
        let mut empty = Vec::new();
        if self.api_key.trim().is_empty() {
            empty.push("apiKey");
        }
        if self.api_secret.expose_secret().trim().is_empty() {
            empty.push("apiSecret");
        }
        empty
    }

    pub fn into_credentials(self) -> CredentialPair {
        CredentialPair {
            api_key: self.api_key,
            api_secret: self.api_secret,
        }
    }
}

/// Login response carrying the sealed credential token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}
