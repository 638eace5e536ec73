//! Shared test helpers for the proxy E2E tests.

use std::sync::Arc;

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use kraken_proxy_lib::api;
use kraken_proxy_lib::crypto::ServerSecret;
use kraken_proxy_lib::middleware::{ErrorBoundary, RequestLogger};
use kraken_proxy_lib::services::{CredentialTokenService, KrakenService, TradingApi};
use serde_json::Value;

/// Server secret used by most tests.
pub const TEST_APP_SECRET: &str = "e2e-test-secret-0123456789abcdef";

/// Build a token service for a passphrase.
pub fn token_service(passphrase: &str) -> CredentialTokenService {
    CredentialTokenService::new(&ServerSecret::from_passphrase(passphrase))
}

/// Create a test app wired like the server binary.
pub async fn create_test_app(
    tokens: CredentialTokenService,
    trading_api: Arc<dyn TradingApi>,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<BoxBody>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .wrap(ErrorBoundary)
            .wrap(RequestLogger)
            .app_data(web::Data::new(tokens))
            .app_data(web::Data::new(KrakenService::new(trading_api)))
            .app_data(api::json_config())
            .configure(api::configure_routes)
            .default_service(web::route().to(api::not_found)),
    )
    .await
}

/// POST /login with a JSON body.
pub async fn login<S, B>(app: &S, body: Value) -> (u16, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(body)
        .to_request();

    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// Log in and return the issued token, asserting success.
pub async fn login_token<S, B>(app: &S, api_key: &str, api_secret: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = login(
        app,
        serde_json::json!({ "apiKey": api_key, "apiSecret": api_secret }),
    )
    .await;
    assert_eq!(status, 200, "login failed: {}", body);
    body["token"]
        .as_str()
        .expect("login response has no token")
        .to_string()
}

/// GET a path with an optional raw Authorization header.
pub async fn get_with_auth<S, B>(app: &S, uri: &str, authorization: Option<&str>) -> (u16, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut req = test::TestRequest::get().uri(uri);
    if let Some(value) = authorization {
        req = req.insert_header(("Authorization", value.to_string()));
    }

    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// GET a path with `Authorization: Bearer <token>`.
pub async fn get_with_token<S, B>(app: &S, uri: &str, token: &str) -> (u16, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    get_with_auth(app, uri, Some(&format!("Bearer {}", token))).await
}
