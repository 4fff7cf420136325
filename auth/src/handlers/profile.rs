//! Poll handler.

use crate::providers::{OAuth2Provider, SessionStore, VideoPublisher};
use crate::relay::{CallbackRelay, RetrieveParams};
use axum::Json;
use axum::extract::{Query, State};
use callback_relay_web::{CorrelationId, WebResult};
use serde_json::Value;
use std::sync::Arc;

/// Collect the pending session for `state`.
///
/// # Endpoint
///
/// ```text
/// GET /getProfile?state=...
/// ```
///
/// # Response
///
/// - 200 with the stored payload (consumed by this call)
/// - 404 `Profile not found.` when nothing is stored, it was already
///   collected, or it expired
/// - 401 in live mode when Google rejects the retained token
#[tracing::instrument(
    skip_all,
    name = "get_profile",
    fields(correlation_id = %correlation_id.0, state = tracing::field::Empty)
)]
pub async fn get_profile<O, V, S>(
    State(relay): State<Arc<CallbackRelay<O, V, S>>>,
    correlation_id: CorrelationId,
    Query(params): Query<RetrieveParams>,
) -> WebResult<Json<Value>>
where
    O: OAuth2Provider + 'static,
    V: VideoPublisher + 'static,
    S: SessionStore + 'static,
{
    if let Some(state) = params.state.as_deref() {
        tracing::Span::current().record("state", state);
    }

    Ok(Json(relay.retrieve_profile(params).await?))
}
