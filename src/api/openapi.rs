//! OpenAPI documentation configuration.

use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kraken Proxy",
        version = "0.1.0",
        description = "Stateless credential proxy: seals Kraken API credentials into a bearer token and calls the private API on the holder's behalf"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::hello,
        api::health::health,
        // Auth endpoints
        api::login::login,
        // Kraken endpoints
        api::kraken::get_ws_token,
        api::kraken::get_balance,
    ),
    components(
        schemas(
            error::ErrorResponse,
            api::health::HealthResponse,
            models::LoginRequest,
            models::LoginResponse,
            models::WsToken,
            models::WsTokenResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Credential token issuance"),
        (name = "Kraken", description = "Kraken private API proxy")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add bearer credential-token security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_token",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Credential token returned by POST /login"))
                    .build(),
            ),
        );
    }
}
