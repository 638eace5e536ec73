//! Business logic services.

pub mod kraken;
pub mod token;

pub use kraken::{KrakenClient, KrakenService, TradingApi, UpstreamError};
pub use token::{CredentialTokenService, TokenError};
