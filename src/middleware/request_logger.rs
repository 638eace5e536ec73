//! Access log for proxy requests.
//!
//! Records method, path, peer, status and latency. The `Authorization`
//! header is only classified, its value never leaves the request.

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::auth::BEARER_PREFIX;

/// Access log middleware factory.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: S,
}

/// How the caller presented credentials.
fn auth_kind(req: &ServiceRequest) -> &'static str {
    match req.headers().get(AUTHORIZATION).map(|v| v.to_str()) {
        None => "none",
        Some(Ok(v)) if v.starts_with(BEARER_PREFIX) => "bearer",
        Some(_) => "other",
    }
}

struct RequestLine {
    method: String,
    path: String,
    peer: String,
    auth: &'static str,
}

impl RequestLine {
    fn finished(&self, status: StatusCode, elapsed: Duration) {
        let status_code = status.as_u16();
        let duration_ms = elapsed.as_millis();

        if status.is_success() || status.is_redirection() {
            info!(
                target: "api",
                method = %self.method,
                path = %self.path,
                peer = %self.peer,
                auth = self.auth,
                status = status_code,
                duration_ms = %duration_ms,
                "request served"
            );
        } else {
            warn!(
                target: "api",
                method = %self.method,
                path = %self.path,
                peer = %self.peer,
                auth = self.auth,
                status = status_code,
                duration_ms = %duration_ms,
                "request failed"
            );
        }
    }
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let line = RequestLine {
            method: req.method().to_string(),
            path: req.path().to_string(),
            peer: req
                .connection_info()
                .realip_remote_addr()
                .unwrap_or("unknown")
                .to_string(),
            auth: auth_kind(&req),
        };

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;
            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            line.finished(status, start.elapsed());
            result
        })
    }
}
