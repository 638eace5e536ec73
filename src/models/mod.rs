//! Domain models for the Kraken proxy.

pub mod auth;
pub mod credentials;
pub mod kraken;

pub use auth::{LoginRequest, LoginResponse};
pub use credentials::CredentialPair;
pub use kraken::{PrivateRequest, WsToken, WsTokenResponse};
