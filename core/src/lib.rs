//! Synchronous client core for the provider's Outgoing Caller IDs resource.
//!
//! # Overview
//! Translates typed calls (fetch, list, request verification, rename,
//! delete) into declarative `HttpRequest` descriptors and maps raw
//! `HttpResponse` values back to typed records or `ApiError`s. Network I/O,
//! authentication and the account context belong to an injected
//! `RequestExecutor`.
//!
//! # Design
//! - `CallerIdClient` is stateless and split into `build_*` / `parse_*`, so
//!   the I/O boundary stays explicit and testable without a network.
//! - `CallerIdResourceClient` composes build, execute and parse for callers
//!   that supply an executor.
//! - `AccountContext::render` is the one place that turns a descriptor into
//!   a URL, query string or form body.
//! - Argument checks run before a request is built, never after.

pub mod client;
pub mod error;
pub mod executor;
pub mod http;
pub mod resource;
pub mod types;

pub use client::CallerIdClient;
pub use error::ApiError;
pub use executor::{executor_fn, FnExecutor, RequestExecutor};
pub use http::{
    AccountContext, HttpMethod, HttpRequest, HttpResponse, Parameter, ParameterKind, RenderedRequest,
};
pub use resource::CallerIdResourceClient;
pub use types::{
    CallerIdListPage, CallerIdRecord, DeleteStatus, ListCallerIdsOptions, VerificationOptions,
    VerificationRequest,
};
