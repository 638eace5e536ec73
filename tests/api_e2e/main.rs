//! Kraken proxy E2E test suite.
//!
//! Drives the full actix-web app (routes, gate, error boundary) against a mock
//! trading API, and the reqwest Kraken client against an in-process mock server.
//!
//! Run with: cargo test --test api_e2e

mod mock_kraken_server;
mod mock_trading_api;
mod test_helpers;

mod test_misc;
mod test_ws_token;
