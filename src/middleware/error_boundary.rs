//! Terminal error boundary.
//!
//! Converts 5xx service-level errors and handler panics into the generic JSON
//! 500 body so that no request ends without a structured response and no
//! internal detail reaches the client. Other service errors keep their own
//! response.
//!
//! The boundary never holds a handle to the request: the router needs sole
//! ownership of it to record path matches. Failures are therefore returned as
//! an [`AppError::Internal`] and rendered by the dispatcher.

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use futures_util::FutureExt;
use futures_util::future::{LocalBoxFuture, ready as ready_future};
use std::any::Any;
use std::future::{Ready, ready};
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::error::AppError;

/// Error boundary middleware factory.
pub struct ErrorBoundary;

impl<S, B> Transform<S, ServiceRequest> for ErrorBoundary
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorBoundaryMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorBoundaryMiddleware { service }))
    }
}

/// Error boundary middleware service.
pub struct ErrorBoundaryMiddleware<S> {
    service: S,
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

fn panicked(path: &str, panic: &(dyn Any + Send)) -> Error {
    AppError::Internal(format!("handler for {} panicked: {}", path, panic_message(panic))).into()
}

impl<S, B> Service<ServiceRequest> for ErrorBoundaryMiddleware<S>
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
        let path = req.path().to_string();

        // Routing runs synchronously inside `call`, so it can panic too.
        let fut = match catch_unwind(AssertUnwindSafe(|| self.service.call(req))) {
            Ok(fut) => fut,
            Err(panic) => return ready_future(Err(panicked(&path, panic.as_ref()))).boxed_local(),
        };

        Box::pin(async move {
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(Ok(res)) => Ok(res),
                Ok(Err(err)) if err.as_response_error().status_code().is_server_error() => Err(
                    AppError::Internal(format!("service error on {}: {}", path, err)).into(),
                ),
                Ok(Err(err)) => Err(err),
                Err(panic) => Err(panicked(&path, panic.as_ref())),
            }
        })
    }
}
