//! Mock Kraken private REST API for E2E tests.
//!
//! Starts an in-process HTTP server that checks `API-Key` and recomputes
//! `API-Sign` for every request, then answers with Kraken-shaped bodies.

use std::net::TcpListener;

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, post, web};
use base64::{Engine, engine::general_purpose::STANDARD};
use kraken_proxy_lib::services::kraken::sign;
use serde_json::json;

/// API key the mock accepts.
pub const MOCK_API_KEY: &str = "mock-kraken-key";

/// WebSocket token the mock hands out.
pub const MOCK_WS_TOKEN: &str = "mock-server-ws-token";

/// The base64 API secret paired with [`MOCK_API_KEY`].
pub fn mock_api_secret() -> String {
    STANDARD.encode(b"mock-kraken-private-secret-bytes")
}

struct MockState {
    api_secret: String,
}

fn kraken_error(message: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "error": [message] }))
}

fn nonce_of(body: &str) -> Option<&str> {
    body.split('&')
        .find_map(|pair| pair.strip_prefix("nonce="))
}

#[post("/0/private/{method}")]
async fn private_endpoint(
    req: HttpRequest,
    method: web::Path<String>,
    body: String,
    state: web::Data<MockState>,
) -> HttpResponse {
    let method = method.into_inner();
    if method == "Fail" {
        return HttpResponse::InternalServerError().body("upstream exploded");
    }

    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };

    if header("API-Key") != MOCK_API_KEY {
        return kraken_error("EAPI:Invalid key");
    }

    let Some(nonce) = nonce_of(&body) else {
        return kraken_error("EAPI:Invalid nonce");
    };
    let path = format!("/0/private/{}", method);
    let expected = sign(&path, nonce, &body, &state.api_secret).unwrap();
    if header("API-Sign") != expected {
        return kraken_error("EAPI:Invalid signature");
    }

    match method.as_str() {
        "GetWebSocketsToken" => HttpResponse::Ok().json(json!({
            "error": [],
            "result": { "token": MOCK_WS_TOKEN, "expires": 900 }
        })),
        "Balance" => HttpResponse::Ok().json(json!({
            "error": [],
            "result": { "ZUSD": "171288.6158", "XXBT": "0.0011" }
        })),
        "NoResult" => HttpResponse::Ok().json(json!({ "error": [] })),
        _ => kraken_error("EGeneral:Unknown method"),
    }
}

/// Mock Kraken API listening on an ephemeral port.
pub struct MockKrakenServer {
    pub base_url: String,
}

impl MockKrakenServer {
    /// Start the mock server.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let api_secret = mock_api_secret();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(MockState {
                    api_secret: api_secret.clone(),
                }))
                .service(private_endpoint)
        })
        .workers(1)
        .listen(listener)
        .expect("failed to listen")
        .disable_signals()
        .run();

        tokio::spawn(server);

        MockKrakenServer { base_url }
    }
}
