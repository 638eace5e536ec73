//! Middleware modules.

mod error_boundary;
mod request_logger;

pub use error_boundary::ErrorBoundary;
pub use request_logger::RequestLogger;
