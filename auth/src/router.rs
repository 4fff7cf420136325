//! Relay router composition.
//!
//! Composes the relay handlers into a single Axum router.

use crate::handlers::{oauth, profile, youtube};
use crate::providers::{OAuth2Provider, SessionStore, VideoPublisher};
use crate::relay::CallbackRelay;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

/// Create the relay router.
///
/// # Routes
///
/// - `GET /auth/google` - Redirect to Google's consent screen
/// - `GET /auth/google/callback` - Complete the flow and store the result
/// - `GET /getProfile` - Collect the stored result
/// - `POST /shareToYouTube` - Insert a video with the caller's token
///
/// # Example
///
/// ```rust,ignore
/// let relay = Arc::new(CallbackRelay::new(environment, config, issuer)?);
///
/// let app = Router::new()
///     .merge(relay_router(relay))
///     .layer(TraceLayer::new_for_http());
/// ```
pub fn relay_router<O, V, S>(relay: Arc<CallbackRelay<O, V, S>>) -> Router
where
    O: OAuth2Provider + 'static,
    V: VideoPublisher + 'static,
    S: SessionStore + 'static,
{
    Router::new()
        .route("/auth/google", get(oauth::start::<O, V, S>))
        .route("/auth/google/callback", get(oauth::callback::<O, V, S>))
        .route("/getProfile", get(profile::get_profile::<O, V, S>))
        .route("/shareToYouTube", post(youtube::share_to_youtube::<O, V, S>))
        .with_state(relay)
}
