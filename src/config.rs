//! Application configuration loaded from environment variables.

use std::env;

use secrecy::{ExposeSecret, SecretString};

use crate::crypto::KEY_LENGTH;

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_APP_SECRET: &str =
        "dev-secret-do-not-use-in-prod-01234567890123456789012345678901";
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 3000;
    pub const KRAKEN_API_URL: &str = "https://api.kraken.com";
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Passphrase the token-sealing key is derived from
    pub app_secret: SecretString,
    /// Base URL of the Kraken REST API
    pub kraken_api_url: String,
    /// Origins allowed by CORS (empty means environment default)
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode (RUST_ENV=development) every variable has a default.
    /// In production mode `APP_SECRET` is required, must not be the development
    /// default and must be at least 32 bytes long.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `HOST`: Server host (default: 127.0.0.1)
    /// - `PORT`: Server port (default: 3000)
    /// - `APP_SECRET`: Token sealing passphrase (required in production)
    /// - `KRAKEN_API_URL`: Kraken REST base URL (default: https://api.kraken.com)
    /// - `CORS_ALLOWED_ORIGINS`: Comma-separated list of allowed origins
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("PORT must be a valid port number"))?;

        let app_secret = match env::var("APP_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if environment.is_development() => defaults::DEV_APP_SECRET.to_string(),
            _ => return Err(ConfigError::MissingEnvVar("APP_SECRET")),
        };

        let kraken_api_url = env::var("KRAKEN_API_URL")
            .unwrap_or_else(|_| defaults::KRAKEN_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();

        let config = Config {
            environment,
            host,
            port,
            app_secret: SecretString::from(app_secret),
            kraken_api_url,
            cors_allowed_origins,
        };

        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not use development defaults
    /// or a secret that would need padding to reach the AES-256 key length.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        let secret = self.app_secret.expose_secret();

        if secret == defaults::DEV_APP_SECRET {
            errors.push(
                "APP_SECRET is using the development default. Generate one with `generate-app-secret`."
                    .to_string(),
            );
        }

        if secret.len() < KEY_LENGTH {
            errors.push(format!(
                "APP_SECRET is {} bytes long; at least {} bytes are required.",
                secret.len(),
                KEY_LENGTH
            ));
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Whether the configured secret is shorter than the key and will be padded.
    pub fn has_short_secret(&self) -> bool {
        self.app_secret.expose_secret().len() < KEY_LENGTH
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
