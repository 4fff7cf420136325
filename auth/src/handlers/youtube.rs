//! `YouTube` share handler.

use crate::providers::{OAuth2Provider, SessionStore, VideoPublisher};
use crate::relay::{CallbackRelay, ShareRequest};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use callback_relay_web::{AppError, CorrelationId, WebResult};
use serde_json::Value;
use std::sync::Arc;

/// Insert a video on the caller's channel.
///
/// # Endpoint
///
/// ```text
/// POST /shareToYouTube
/// ```
///
/// # Request
///
/// ```json
/// {
///   "accessToken": "ya29...",
///   "videoTitle": "Run 42",
///   "description": "Speedrun",
///   "privacyStatus": "unlisted"
/// }
/// ```
///
/// # Response
///
/// `YouTube`'s video resource verbatim. 400 if any field is missing or the
/// body is not JSON; 500 if `YouTube` rejects the insert.
#[tracing::instrument(skip_all, name = "share_to_youtube", fields(correlation_id = %correlation_id.0))]
pub async fn share_to_youtube<O, V, S>(
    State(relay): State<Arc<CallbackRelay<O, V, S>>>,
    correlation_id: CorrelationId,
    payload: Result<Json<ShareRequest>, JsonRejection>,
) -> WebResult<Json<Value>>
where
    O: OAuth2Provider + 'static,
    V: VideoPublisher + 'static,
    S: SessionStore + 'static,
{
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected share body");
        AppError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    Ok(Json(relay.share_to_youtube(request).await?))
}
