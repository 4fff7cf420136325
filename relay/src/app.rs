//! Application assembly.

use crate::config::RelayServerConfig;
use axum::{Router, routing::get};
use callback_relay_auth::{
    CallbackRelay, GoogleOAuthProvider, InMemorySessionStore, RelayEnvironment, RelayError,
    SessionTokenIssuer, SystemClock, YouTubeClient,
    providers::{OAuth2Provider, SessionStore, VideoPublisher},
    relay_router,
};
use callback_relay_web::correlation_id_layer;
use callback_relay_web::handlers::health_check;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Relay wired to Google's production collaborators.
pub type GoogleRelay = CallbackRelay<GoogleOAuthProvider, YouTubeClient, InMemorySessionStore>;

/// Build the relay from server configuration.
///
/// `sessions` is passed in so the caller can hand the same store to the
/// expiry sweeper.
///
/// # Errors
///
/// Returns [`RelayError::InvalidConfig`] if the configuration is inconsistent
/// (for example a session-token mode without a usable secret).
pub fn build_relay(
    config: &RelayServerConfig,
    sessions: InMemorySessionStore,
) -> Result<GoogleRelay, RelayError> {
    let http_client = reqwest::Client::new();

    let mut oauth = GoogleOAuthProvider::new(
        config.client_id.clone(),
        config.client_secret.clone(),
        config.redirect_uri.clone(),
    )
    .with_http_client(http_client.clone());
    if let Some(url) = &config.endpoints.auth_url {
        oauth = oauth.with_auth_url(url.clone());
    }
    if let Some(url) = &config.endpoints.token_url {
        oauth = oauth.with_token_url(url.clone());
    }
    if let Some(url) = &config.endpoints.userinfo_url {
        oauth = oauth.with_userinfo_url(url.clone());
    }

    let mut videos = YouTubeClient::new().with_http_client(http_client);
    if let Some(url) = &config.endpoints.youtube_upload_url {
        videos = videos.with_upload_url(url.clone());
    }

    let relay_config = config
        .relay_config()
        .map_err(|e| RelayError::InvalidConfig(e.to_string()))?;

    let issuer = config
        .jwt_secret
        .as_deref()
        .map(|secret| {
            SessionTokenIssuer::new(
                secret.as_bytes(),
                relay_config.session_token_validity,
                Arc::new(SystemClock),
            )
        })
        .transpose()?;

    let env = RelayEnvironment::new(oauth, videos, sessions);
    CallbackRelay::new(env, relay_config, issuer)
}

/// Build the HTTP application: relay routes plus `/health`, with request
/// tracing and correlation ids.
pub fn build_router<O, V, S>(relay: Arc<CallbackRelay<O, V, S>>) -> Router
where
    O: OAuth2Provider + 'static,
    V: VideoPublisher + 'static,
    S: SessionStore + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .merge(relay_router(relay))
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
}
