//! Custom Axum extractors.
//!
//! - `CorrelationId`: the request's correlation id (set by the middleware, or
//!   taken from the `X-Correlation-ID` header, or freshly generated)
//! - `ClientIp`: best-effort client address from proxy headers
//!
//! # Examples
//!
//! ```ignore
//! async fn handler(correlation_id: CorrelationId, client_ip: ClientIp) -> &'static str {
//!     tracing::info!(correlation_id = %correlation_id.0, client_ip = ?client_ip.0, "callback");
//!     "ok"
//! }
//! ```

use crate::middleware::CORRELATION_ID_HEADER;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use std::net::IpAddr;
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Prefers the id stored in request extensions by
/// [`correlation_id_layer`](crate::middleware::correlation_id_layer) so that
/// handler logs and the response header agree.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Uuid>() {
            return Ok(Self(*id));
        }

        let correlation_id = parts
            .headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}

/// Client IP address, if a proxy header carried one.
///
/// # Priority
///
/// 1. `X-Forwarded-For` (first IP in the list)
/// 2. `X-Real-IP`
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub Option<IpAddr>);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(extract_client_ip(&parts.headers)))
    }
}

fn extract_client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let forwarded = headers
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    forwarded.or_else(|| {
        headers
            .get("X-Real-IP")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_correlation_id_from_header() {
        let uuid = Uuid::new_v4();
        let req = Request::builder()
            .header(CORRELATION_ID_HEADER, uuid.to_string())
            .body(())
            .expect("Valid request");

        let (mut parts, _) = req.into_parts();
        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(correlation_id.0, uuid);
    }

    #[tokio::test]
    async fn test_correlation_id_prefers_extension() {
        let from_layer = Uuid::new_v4();
        let req = Request::builder()
            .header(CORRELATION_ID_HEADER, Uuid::new_v4().to_string())
            .body(())
            .expect("Valid request");

        let (mut parts, _) = req.into_parts();
        parts.extensions.insert(from_layer);
        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(correlation_id.0, from_layer);
    }

    #[tokio::test]
    async fn test_correlation_id_generates_new() {
        let req = Request::builder().body(()).expect("Valid request");

        let (mut parts, _) = req.into_parts();
        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_ne!(correlation_id.0, Uuid::nil());
    }

    #[tokio::test]
    async fn test_client_ip_from_x_forwarded_for() {
        let req = Request::builder()
            .header("X-Forwarded-For", "203.0.113.1, 198.51.100.1")
            .body(())
            .expect("Valid request");

        let (mut parts, _) = req.into_parts();
        let client_ip = ClientIp::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(client_ip.0.map(|ip| ip.to_string()).as_deref(), Some("203.0.113.1"));
    }

    #[tokio::test]
    async fn test_client_ip_from_x_real_ip() {
        let req = Request::builder()
            .header("X-Real-IP", "198.51.100.42")
            .body(())
            .expect("Valid request");

        let (mut parts, _) = req.into_parts();
        let client_ip = ClientIp::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(client_ip.0.map(|ip| ip.to_string()).as_deref(), Some("198.51.100.42"));
    }

    #[tokio::test]
    async fn test_client_ip_absent() {
        let req = Request::builder().body(()).expect("Valid request");

        let (mut parts, _) = req.into_parts();
        let client_ip = ClientIp::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert!(client_ip.0.is_none());
    }
}
