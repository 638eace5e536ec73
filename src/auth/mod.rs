//! Bearer-token authorization gate.
//!
//! The gate runs before any handler that needs exchange credentials:
//!
//! - no header, or a header without the `Bearer ` scheme → "No credentials provided"
//! - `Bearer ` with an empty token → "Invalid authentication token"
//! - a token that fails to redeem → "Invalid authentication token"
//! - a token that redeems → the recovered [`CredentialPair`]
//!
//! The token service is never invoked for a header that fails the first two checks.

mod extractor;

use tracing::debug;

use crate::models::CredentialPair;
use crate::services::token::{CredentialTokenService, TokenError};

pub use extractor::Credentials;

/// Authorization scheme prefix. Matched literally and case-sensitively.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Why a request was refused credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    NoCredentials,
    InvalidToken,
}

impl AuthRejection {
    /// Fixed client-facing message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoCredentials => "No credentials provided",
            Self::InvalidToken => "Invalid authentication token",
        }
    }
}

impl std::fmt::Display for AuthRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AuthRejection {}

/// Outcome of a failed authorization, keeping the redeem failure for logging.
#[derive(Debug)]
pub enum GateError {
    Rejected(AuthRejection),
    Unredeemable(TokenError),
}

impl GateError {
    pub fn rejection(&self) -> AuthRejection {
        match self {
            Self::Rejected(rejection) => *rejection,
            Self::Unredeemable(_) => AuthRejection::InvalidToken,
        }
    }
}

/// Pull the token out of a raw `Authorization` header value.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthRejection> {
    let rest = header
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthRejection::NoCredentials)?;

    match rest.split(' ').next() {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthRejection::InvalidToken),
    }
}

/// Run the gate for one request.
pub fn authorize(
    header: Option<&str>,
    tokens: &CredentialTokenService,
) -> Result<CredentialPair, GateError> {
    let token = extract_bearer(header).map_err(GateError::Rejected)?;

    let pair = tokens.redeem(token).map_err(GateError::Unredeemable)?;
    debug!("Credential token redeemed");
    Ok(pair)
}
