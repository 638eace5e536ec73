//! E2E tests: banner, health check and unknown routes.

use std::sync::Arc;

use actix_web::test;

use super::mock_trading_api::MockTradingApi;
use super::test_helpers::*;

#[actix_rt::test]
async fn test_root_returns_banner() {
    let app = create_test_app(
        token_service(TEST_APP_SECRET),
        Arc::new(MockTradingApi::new()),
    )
    .await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    let body = test::read_body(resp).await;
    assert_eq!(body, "Kraken Proxy is running");
}

#[actix_rt::test]
async fn test_health_reports_healthy() {
    let app = create_test_app(
        token_service(TEST_APP_SECRET),
        Arc::new(MockTradingApi::new()),
    )
    .await;

    let (status, body) = get_with_auth(&app, "/health", None).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[actix_rt::test]
async fn test_unknown_route_is_json_404() {
    let app = create_test_app(
        token_service(TEST_APP_SECRET),
        Arc::new(MockTradingApi::new()),
    )
    .await;

    let (status, body) = get_with_auth(&app, "/does-not-exist", None).await;

    assert_eq!(status, 404);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "NOT_FOUND");
}
