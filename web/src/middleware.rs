//! Correlation-id middleware.
//!
//! 1. **Extract** the id from the `X-Correlation-ID` header (or generate a UUID)
//! 2. **Store** it in request extensions for [`CorrelationId`](crate::CorrelationId)
//! 3. **Instrument** the request with an `http_request` span
//! 4. **Echo** it back in the response `X-Correlation-ID` header
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/getProfile", get(get_profile))
//!     .layer(correlation_id_layer());
//! ```

use axum::{extract::Request, http::HeaderValue, response::Response};
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Create a layer that adds correlation ID tracking to all requests.
#[must_use]
pub const fn correlation_id_layer() -> CorrelationIdLayer {
    CorrelationIdLayer
}

/// Layer for correlation ID tracking.
#[derive(Clone, Debug)]
pub struct CorrelationIdLayer;

impl<S> Layer<S> for CorrelationIdLayer {
    type Service = CorrelationIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorrelationIdMiddleware { inner }
    }
}

/// Middleware service for correlation ID tracking.
#[derive(Clone, Debug)]
pub struct CorrelationIdMiddleware<S> {
    inner: S,
}

impl<S> Service<Request> for CorrelationIdMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let correlation_id = req
            .headers()
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        req.extensions_mut().insert(correlation_id);

        // Only the path: query strings carry authorization codes.
        let span = tracing::info_span!(
            "http_request",
            correlation_id = %correlation_id,
            method = %req.method(),
            path = %req.uri().path(),
        );

        let fut = self.inner.call(req);

        Box::pin(async move {
            let mut response = fut.instrument(span).await?;

            if let Ok(header_value) = HeaderValue::from_str(&correlation_id.to_string()) {
                response
                    .headers_mut()
                    .insert(CORRELATION_ID_HEADER, header_value);
            }

            Ok(response)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::{Router, routing::get};
    use axum_test::TestServer;

    fn app() -> Router {
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(correlation_id_layer())
    }

    #[tokio::test]
    async fn test_generates_correlation_header() {
        let server = TestServer::new(app()).expect("server");
        let response = server.get("/ping").await;

        let header = response.header(CORRELATION_ID_HEADER);
        let value = header.to_str().expect("ascii header");
        assert!(Uuid::parse_str(value).is_ok());
    }

    #[tokio::test]
    async fn test_echoes_incoming_correlation_header() {
        let id = Uuid::new_v4();
        let server = TestServer::new(app()).expect("server");
        let response = server
            .get("/ping")
            .add_header(
                http::HeaderName::from_static("x-correlation-id"),
                HeaderValue::from_str(&id.to_string()).expect("valid header"),
            )
            .await;

        assert_eq!(
            response.header(CORRELATION_ID_HEADER).to_str().expect("ascii header"),
            id.to_string()
        );
    }
}
