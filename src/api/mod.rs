//! API endpoint modules.

pub mod health;
pub mod kraken;
pub mod login;
pub mod openapi;

use actix_web::{HttpRequest, HttpResponse, ResponseError, error, web};

use crate::error::AppError;

pub use health::configure_health_routes;
pub use kraken::configure_routes as configure_kraken_routes;
pub use login::configure_routes as configure_login_routes;
pub use openapi::ApiDoc;

/// Register every proxy route.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health_routes)
        .configure(configure_login_routes)
        .configure(configure_kraken_routes);
}

/// JSON extractor config routing body errors through [`AppError`].
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Rejected JSON body: {}", err);
    let message = match err {
        error::JsonPayloadError::ContentType => "Expected a JSON body".to_string(),
        _ => "Missing or invalid apiKey/apiSecret".to_string(),
    };
    AppError::InvalidInput(message).into()
}

/// JSON 404 for unknown routes.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    AppError::NotFound(format!("Route {}", req.path())).error_response()
}
