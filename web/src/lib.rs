//! Axum plumbing for the callback relay.
//!
//! Handlers in `callback-relay-auth` stay thin: they parse the request, call
//! the relay service, and map the outcome to a response. This crate supplies
//! the shared pieces of that shell:
//!
//! - [`AppError`]: status code plus a plain-text, human-readable message
//! - [`CorrelationId`] / [`ClientIp`]: request metadata for logs
//! - [`correlation_id_layer`]: tags every request with a tracing span
//! - [`handlers::health_check`]: liveness probe

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;

pub use error::AppError;
pub use extractors::{ClientIp, CorrelationId};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
