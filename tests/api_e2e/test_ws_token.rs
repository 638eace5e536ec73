//! E2E tests: GET /ws-token and the authorization gate.

use std::sync::Arc;

use kraken_proxy_lib::config::defaults::DEV_APP_SECRET;
use kraken_proxy_lib::models::CredentialPair;
use kraken_proxy_lib::services::UpstreamError;

use super::mock_trading_api::{MockTradingApi, RecordedCall};
use super::test_helpers::*;

/// Token issued by the existing deployment with the development secret.
const LEGACY_TOKEN: &str = "eyJrZXkiOnsiaXYiOiI2Zjg3OTA1OWE5ZjYzNjE5Mzk4MjgzYTAxZGMwZThlNyIsImRhdGEiOiI0YzBmNDUxNWY4M2I4N2FjOTQ3MTVlYTNjYmUyNTYiLCJhdXRoVGFnIjoiYmQ0YjJlN2FiZDQzMDZmNDA3ZmI4MjY4Yzc1Zjc3YjIifSwic2VjcmV0Ijp7Iml2IjoiYTVlOTgyMWZkYTQyZWUwYzU2ZTNhZTBhODkyNzYzZjUiLCJkYXRhIjoiMWMzOWJhY2UyNzYxYmVhMmFkNzE0YTA0NGU5ODAxOTgzYmI0IiwiYXV0aFRhZyI6IjBlM2Q0YzZmMzlhNzdmNDAyMDlhOGQ5NzVlYWQyZTM3In19";

#[actix_rt::test]
async fn test_missing_header_returns_401_no_credentials() {
    let app = create_test_app(
        token_service(TEST_APP_SECRET),
        Arc::new(MockTradingApi::new()),
    )
    .await;

    let (status, body) = get_with_auth(&app, "/ws-token", None).await;

    assert_eq!(status, 401);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "No credentials provided");
}

#[actix_rt::test]
async fn test_login_then_ws_token_returns_upstream_token() {
    let mock = Arc::new(MockTradingApi::new());
    let app = create_test_app(token_service(TEST_APP_SECRET), mock.clone()).await;

    let token = login_token(&app, "valid-key-12345", "valid-secret-12345").await;
    let (status, body) = get_with_token(&app, "/ws-token", &token).await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        serde_json::json!({ "result": { "token": "mocked-ws-token" } })
    );
    assert_eq!(
        mock.calls(),
        vec![RecordedCall {
            method: "GetWebSocketsToken".to_string(),
            api_key: "valid-key-12345".to_string(),
            api_secret: "valid-secret-12345".to_string(),
        }]
    );
}

#[actix_rt::test]
async fn test_gate_rejection_matrix() {
    let mock = Arc::new(MockTradingApi::new());
    let app = create_test_app(token_service(TEST_APP_SECRET), mock.clone()).await;

    let foreign = token_service("some-other-deployment-secret-xyz")
        .issue(&CredentialPair::new("valid-key-12345", "valid-secret-12345"))
        .unwrap();
    let valid = token_service(TEST_APP_SECRET)
        .issue(&CredentialPair::new("valid-key-12345", "valid-secret-12345"))
        .unwrap();

    let cases = vec![
        (valid.clone(), "No credentials provided"),
        (format!("bearer {}", valid), "No credentials provided"),
        (format!("Basic {}", valid), "No credentials provided"),
        ("Bearer ".to_string(), "Invalid authentication token"),
        ("Bearer garbage".to_string(), "Invalid authentication token"),
        ("Bearer e30=".to_string(), "Invalid authentication token"),
        (format!("Bearer {}", foreign), "Invalid authentication token"),
    ];

    for (header, expected) in cases {
        let (status, body) = get_with_auth(&app, "/ws-token", Some(&header)).await;
        assert_eq!(status, 401, "header {:?}", header);
        assert_eq!(body["message"], expected, "header {:?}", header);
    }

    assert!(mock.calls().is_empty(), "upstream must not be called");
}

#[actix_rt::test]
async fn test_tampered_token_is_rejected() {
    let app = create_test_app(
        token_service(TEST_APP_SECRET),
        Arc::new(MockTradingApi::new()),
    )
    .await;

    let token = login_token(&app, "valid-key-12345", "valid-secret-12345").await;
    let mut tampered = token.into_bytes();
    // Change a character inside the base64 body without breaking the encoding.
    let idx = tampered.len() / 2;
    tampered[idx] = if tampered[idx] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).unwrap();

    let (status, body) = get_with_token(&app, "/ws-token", &tampered).await;

    assert_eq!(status, 401);
    assert_eq!(body["message"], "Invalid authentication token");
}

#[actix_rt::test]
async fn test_token_from_existing_deployment_is_accepted() {
    let mock = Arc::new(MockTradingApi::new());
    let app = create_test_app(token_service(DEV_APP_SECRET), mock.clone()).await;

    let (status, body) = get_with_token(&app, "/ws-token", LEGACY_TOKEN).await;

    assert_eq!(status, 200);
    assert_eq!(body["result"]["token"], "mocked-ws-token");
    assert_eq!(mock.calls()[0].api_key, "valid-key-12345");
    assert_eq!(mock.calls()[0].api_secret, "valid-secret-12345");
}

#[actix_rt::test]
async fn test_upstream_error_without_status_is_500_with_message() {
    let mock = Arc::new(
        MockTradingApi::new().with_ws_token_error(UpstreamError::new(None, "EAPI:Invalid key")),
    );
    let app = create_test_app(token_service(TEST_APP_SECRET), mock).await;

    let token = login_token(&app, "valid-key-12345", "valid-secret-12345").await;
    let (status, body) = get_with_token(&app, "/ws-token", &token).await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "UPSTREAM_ERROR");
    assert_eq!(body["message"], "EAPI:Invalid key");
}
