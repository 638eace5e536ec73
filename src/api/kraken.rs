//! Protected endpoints proxied to the Kraken private API.

use actix_web::{HttpResponse, get, web};

use crate::auth::Credentials;
use crate::error::AppResult;
use crate::models::WsTokenResponse;
use crate::services::KrakenService;

/// Configure Kraken proxy routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_ws_token).service(get_balance);
}

/// Get a token for Kraken's authenticated WebSocket API.
///
/// The frontend uses it to connect directly to `wss://ws-auth.kraken.com/`.
#[utoipa::path(
    get,
    path = "/ws-token",
    tag = "Kraken",
    responses(
        (status = 200, description = "WebSocket token", body = WsTokenResponse),
        (status = 401, description = "Missing or invalid credential token", body = crate::error::ErrorResponse)
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[get("/ws-token")]
pub async fn get_ws_token(
    creds: Credentials,
    kraken: web::Data<KrakenService>,
) -> AppResult<HttpResponse> {
    let token = kraken.get_ws_token(&creds.pair).await?;
    Ok(HttpResponse::Ok().json(WsTokenResponse::new(token)))
}

/// Get account balances.
#[utoipa::path(
    get,
    path = "/balance",
    tag = "Kraken",
    responses(
        (status = 200, description = "Asset balances keyed by asset code", body = Object),
        (status = 401, description = "Missing or invalid credential token", body = crate::error::ErrorResponse)
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[get("/balance")]
pub async fn get_balance(
    creds: Credentials,
    kraken: web::Data<KrakenService>,
) -> AppResult<HttpResponse> {
    let balance = kraken.get_balance(&creds.pair).await?;
    Ok(HttpResponse::Ok().json(balance))
}
