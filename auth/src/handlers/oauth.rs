//! Google sign-in handlers.

use crate::handlers::page::render_success_page;
use crate::providers::{OAuth2Provider, SessionStore, VideoPublisher};
use crate::relay::{CallbackParams, CallbackRelay};
use axum::extract::{Query, State};
use axum::response::{Html, Redirect};
use callback_relay_web::{ClientIp, CorrelationId, WebResult};
use serde::Deserialize;
use std::sync::Arc;

/// Query parameters of the start route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartQuery {
    /// Client-chosen state; generated when absent.
    pub state: Option<String>,
}

/// Send the browser to Google's consent screen.
///
/// # Endpoint
///
/// ```text
/// GET /auth/google?state=...
/// ```
///
/// # Response
///
/// HTTP 303 redirect to the consent URL. Clients that let the relay pick the
/// state read it back from the `state` parameter of the `Location` header.
#[tracing::instrument(skip_all, name = "auth_start", fields(correlation_id = %correlation_id.0))]
pub async fn start<O, V, S>(
    State(relay): State<Arc<CallbackRelay<O, V, S>>>,
    correlation_id: CorrelationId,
    Query(query): Query<StartQuery>,
) -> WebResult<Redirect>
where
    O: OAuth2Provider + 'static,
    V: VideoPublisher + 'static,
    S: SessionStore + 'static,
{
    let (state, url) = relay.authorization_url(query.state)?;
    tracing::debug!(state = %state, "Redirecting to consent screen");
    Ok(Redirect::to(&url))
}

/// Handle Google's redirect after consent.
///
/// # Endpoint
///
/// ```text
/// GET /auth/google/callback?code=...&state=...
/// ```
///
/// # Flow
///
/// 1. Reject Google `error` responses and missing `code` / `state` (400)
/// 2. Exchange the code and fetch the profile (500 on any failure)
/// 3. Store the payload under `state`
/// 4. Render the success page
#[tracing::instrument(
    skip_all,
    name = "auth_callback",
    fields(
        correlation_id = %correlation_id.0,
        client_ip = ?client_ip.0,
        state = tracing::field::Empty
    )
)]
pub async fn callback<O, V, S>(
    State(relay): State<Arc<CallbackRelay<O, V, S>>>,
    correlation_id: CorrelationId,
    client_ip: ClientIp,
    Query(params): Query<CallbackParams>,
) -> WebResult<Html<String>>
where
    O: OAuth2Provider + 'static,
    V: VideoPublisher + 'static,
    S: SessionStore + 'static,
{
    if let Some(state) = params.state.as_deref() {
        tracing::Span::current().record("state", state);
    }

    let outcome = relay.handle_callback(params).await?;
    let page = render_success_page(relay.config().app_uri_scheme.as_deref(), &outcome.state)?;

    Ok(Html(page))
}
