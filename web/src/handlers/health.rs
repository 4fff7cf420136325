//! Liveness endpoint.
//!
//! Used by the hosting platform to check the process is serving. It does not
//! touch Google or the pending-session store.

use axum::http::StatusCode;

/// Simple health check endpoint.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
