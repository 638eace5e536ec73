//! Login endpoint: seals exchange credentials into a bearer token.

use actix_web::{HttpResponse, post, web};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{LoginRequest, LoginResponse};
use crate::services::token::CredentialTokenService;

/// Configure login routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login);
}

/// Exchange a Kraken API key and secret for a credential token.
///
/// POST /login
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credential token issued", body = LoginResponse),
        (status = 400, description = "Missing or invalid apiKey/apiSecret", body = crate::error::ErrorResponse)
    )
)]
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    tokens: web::Data<CredentialTokenService>,
) -> AppResult<HttpResponse> {
    let request = body.into_inner();

    let empty = request.empty_fields();
    if !empty.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "Missing or invalid {}",
            empty.join("/")
        )));
    }

    let pair = request.into_credentials();
    let token = tokens.issue(&pair).map_err(|e| AppError::Internal(e.to_string()))?;

    info!("Issued credential token");

    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}
