//! Actix-web extractor for credential-token authentication.
//!
//! # Security
//! - The raw token is never logged
//! - Rejections carry fixed messages; the redeem failure is logged server-side only
//! - The recovered secret stays in a `SecretString` for the life of the request

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use std::future::{Ready, ready};
use tracing::error;

use super::{GateError, authorize};
use crate::error::AppError;
use crate::models::CredentialPair;
use crate::services::token::CredentialTokenService;

/// Credentials recovered from the request's bearer token.
///
/// Use this in handlers that call the trading API:
/// ```ignore
/// async fn protected_handler(creds: Credentials) -> impl Responder {
///     // creds.pair holds the caller's Kraken key and secret
/// }
/// ```
#[derive(Debug)]
pub struct Credentials {
    pub pair: CredentialPair,
}

impl FromRequest for Credentials {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let tokens = match req.app_data::<web::Data<CredentialTokenService>>() {
            Some(tokens) => tokens,
            None => {
                error!("CredentialTokenService is not registered as app data");
                return ready(Err(AppError::Internal(
                    "Credential token service not configured".to_string(),
                )));
            }
        };

        // A header with non-visible-ASCII bytes counts as present but malformed.
        let header = req.headers().get(AUTHORIZATION).map(|v| v.to_str());
        let result = match header {
            Some(Err(_)) => Err(AppError::Unauthorized(super::AuthRejection::InvalidToken)),
            Some(Ok(value)) => authorize(Some(value), tokens.get_ref()).map_err(gate_error),
            None => authorize(None, tokens.get_ref()).map_err(gate_error),
        };

        ready(result.map(|pair| Credentials { pair }))
    }
}

fn gate_error(err: GateError) -> AppError {
    match err {
        GateError::Rejected(rejection) => AppError::Unauthorized(rejection),
        GateError::Unredeemable(token_err) => AppError::InvalidToken(token_err),
    }
}
