//! Kraken Proxy library.
//!
//! Seals Kraken API credentials into stateless bearer tokens and proxies
//! private API calls for token holders.

pub mod api;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
