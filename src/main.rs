//! Kraken Proxy - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use secrecy::ExposeSecret;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use kraken_proxy_lib::api::{self, ApiDoc};
use kraken_proxy_lib::config::Config;
use kraken_proxy_lib::crypto::ServerSecret;
use kraken_proxy_lib::middleware::{ErrorBoundary, RequestLogger};
use kraken_proxy_lib::services::{CredentialTokenService, KrakenClient, KrakenService};

/// Perform health check (for Docker healthcheck).
fn health_check() -> bool {
    // Simple check - just verify we can load config
    Config::from_env().is_ok()
}

fn build_cors(config: &Config) -> Cors {
    if config.is_development() && config.cors_allowed_origins.is_empty() {
        return Cors::permissive();
    }

    config
        .cors_allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Check for --health-check flag (used by Docker HEALTHCHECK)
    if std::env::args().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        std::process::exit(if health_check() { 0 } else { 1 });
    }

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        std::process::exit(1);
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, APP_SECRET must be set to at least 32 bytes");
            error!("  - In production, APP_SECRET must not match the development default");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Kraken Proxy");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    let server_secret = ServerSecret::from_passphrase(config.app_secret.expose_secret());
    if server_secret.was_padded() {
        warn!("APP_SECRET is shorter than 32 bytes and has been space-padded; tokens are weakly protected");
    }

    let token_service = CredentialTokenService::new(&server_secret);
    drop(server_secret);

    let kraken_client = match KrakenClient::new(&config.kraken_api_url) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to initialize Kraken client: {}", e);
            std::process::exit(1);
        }
    };
    let kraken_service = KrakenService::new(Arc::new(kraken_client));
    info!("Kraken API: {}", config.kraken_api_url);

    let bind_address = config.bind_address();
    let worker_count = if config.is_development() {
        4
    } else {
        num_cpus::get()
    };
    info!(
        "Starting server at http://{} ({} workers)",
        bind_address, worker_count
    );

    let token_data = web::Data::new(token_service);
    let kraken_data = web::Data::new(kraken_service);
    let openapi = ApiDoc::openapi();

    HttpServer::new(move || {
        App::new()
            .wrap(ErrorBoundary)
            .wrap(build_cors(&config))
            .wrap(RequestLogger)
            .app_data(token_data.clone())
            .app_data(kraken_data.clone())
            .app_data(api::json_config())
            .configure(api::configure_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            .default_service(web::route().to(api::not_found))
    })
    .workers(worker_count)
    .bind(&bind_address)?
    .run()
    .await
}
