//! Exchange API credentials recovered from a token.

use secrecy::SecretString;

/// A Kraken API key and its private secret.
///
/// Lives only for the duration of a request or a token issuance call.
/// `Debug` redacts both fields.
#[derive(Clone)]
pub struct CredentialPair {
    pub api_key: String,
    pub api_secret: SecretString,
}

impl CredentialPair {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }
}

impl std::fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPair")
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}
