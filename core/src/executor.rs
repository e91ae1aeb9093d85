//! The I/O seam: anything that can turn an `HttpRequest` into an
//! `HttpResponse`.
//!
//! # Design
//! Transport, authentication and the account context all live behind this
//! trait. Implementations are expected to call `AccountContext::render` and
//! hand the result to their HTTP library; non-2xx statuses must come back as
//! `Ok(HttpResponse)` so the core can interpret them. Only failures where no
//! response exists at all should be `Err(ApiError::Transport)`.

use std::sync::Arc;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one request descriptor and returns the raw response.
pub trait RequestExecutor {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<E: RequestExecutor + ?Sized> RequestExecutor for &E {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<E: RequestExecutor + ?Sized> RequestExecutor for Box<E> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<E: RequestExecutor + ?Sized> RequestExecutor for Arc<E> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Adapts a closure into a `RequestExecutor`.
#[derive(Debug, Clone, Copy)]
pub struct FnExecutor<F>(F);

impl<F> RequestExecutor for FnExecutor<F>
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (self.0)(request)
    }
}

/// Wrap `f` so it can be injected wherever a `RequestExecutor` is expected.
pub fn executor_fn<F>(f: F) -> FnExecutor<F>
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError>,
{
    FnExecutor(f)
}
