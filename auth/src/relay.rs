//! The callback relay.
//!
//! Three operations make up the handoff:
//!
//! 1. [`CallbackRelay::handle_callback`]: Google redirects the browser here;
//!    the code is exchanged, the profile fetched, and the result parked
//!    under `state`.
//! 2. [`CallbackRelay::retrieve_profile`]: the client polls with the same
//!    `state` and collects the result (once, except in live mode).
//! 3. [`CallbackRelay::share_to_youtube`]: proxies a metadata-only video
//!    insert with the caller's own access token.
//!
//! Every outbound call is attempted exactly once per inbound request.

use crate::config::{PayloadMode, RelayConfig};
use crate::environment::RelayEnvironment;
use crate::error::{RelayError, Result};
use crate::providers::{
    OAuth2Provider, OAuthTokenResponse, SessionStore, VideoMetadata, VideoPublisher,
};
use crate::state::{PendingSession, StateKey, UserProfile};
use crate::token::SessionTokenIssuer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query parameters Google sends to the callback.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CallbackParams {
    /// Authorization code.
    pub code: Option<String>,

    /// Opaque client state.
    pub state: Option<String>,

    /// Set instead of `code` when the user declined consent.
    pub error: Option<String>,

    /// Human-readable detail for `error`.
    pub error_description: Option<String>,
}

/// Query parameters of a poll.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RetrieveParams {
    /// State the client started the flow with.
    pub state: Option<String>,
}

/// Body of a share request.
///
/// Fields are optional so missing ones can be reported together.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    /// Caller's Google access token with the `youtube.upload` scope.
    pub access_token: Option<String>,

    /// Video title.
    pub video_title: Option<String>,

    /// Video description.
    pub description: Option<String>,

    /// `public`, `unlisted` or `private`; passed through unchecked.
    pub privacy_status: Option<String>,
}

/// Result of a completed callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackOutcome {
    /// State the pending session was stored under.
    pub state: StateKey,
}

/// Empty strings count as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Google OAuth callback relay.
///
/// # Type Parameters
///
/// - `O`: `OAuth2` provider
/// - `V`: Video publisher
/// - `S`: Pending-session store
pub struct CallbackRelay<O, V, S>
where
    O: OAuth2Provider,
    V: VideoPublisher,
    S: SessionStore,
{
    env: RelayEnvironment<O, V, S>,
    config: RelayConfig,
    tokens: Option<SessionTokenIssuer>,
}

impl<O, V, S> CallbackRelay<O, V, S>
where
    O: OAuth2Provider,
    V: VideoPublisher,
    S: SessionStore,
{
    /// Create a relay.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidConfig`] if the payload mode needs a
    /// session-token issuer and none was given.
    pub fn new(
        env: RelayEnvironment<O, V, S>,
        config: RelayConfig,
        tokens: Option<SessionTokenIssuer>,
    ) -> Result<Self> {
        if config.payload_mode.requires_signing_key() && tokens.is_none() {
            return Err(RelayError::InvalidConfig(format!(
                "payload mode '{}' requires a session token secret",
                config.payload_mode
            )));
        }

        Ok(Self {
            env,
            config,
            tokens,
        })
    }

    /// Relay configuration.
    #[must_use]
    pub const fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Relay environment.
    #[must_use]
    pub const fn environment(&self) -> &RelayEnvironment<O, V, S> {
        &self.env
    }

    /// Consent-screen URL for a new flow.
    ///
    /// Uses the client's `state` when given, otherwise generates one.
    ///
    /// # Errors
    ///
    /// Returns error if the provider cannot build the URL.
    pub fn authorization_url(&self, state: Option<String>) -> Result<(StateKey, String)> {
        let state = present(state).map_or_else(StateKey::generate, StateKey::new);
        let url = self.env.oauth.build_authorization_url(state.as_str())?;
        Ok((state, url))
    }

    /// Complete the authorization-code flow and park the result under `state`.
    ///
    /// Nothing is stored unless every step succeeds.
    ///
    /// # Errors
    ///
    /// - [`RelayError::ProviderDenied`] if Google sent `error`
    /// - [`RelayError::MissingParameter`] if `code` or `state` is missing
    /// - Collaborator errors from the exchange or userinfo call
    /// - [`RelayError::SessionToken`] if signing fails
    pub async fn handle_callback(&self, params: CallbackParams) -> Result<CallbackOutcome> {
        if let Some(error) = present(params.error) {
            metrics::counter!("relay.callback", "outcome" => "denied").increment(1);
            return Err(RelayError::ProviderDenied {
                error,
                description: present(params.error_description),
            });
        }

        let (code, state) = match (present(params.code), present(params.state)) {
            (Some(code), Some(state)) => (code, StateKey::new(state)),
            (None, _) => {
                metrics::counter!("relay.callback", "outcome" => "bad_request").increment(1);
                return Err(RelayError::MissingParameter { name: "code" });
            }
            (_, None) => {
                metrics::counter!("relay.callback", "outcome" => "bad_request").increment(1);
                return Err(RelayError::MissingParameter { name: "state" });
            }
        };

        let session = match self.complete_flow(&code).await {
            Ok(session) => session,
            Err(e) => {
                metrics::counter!("relay.callback", "outcome" => "failed").increment(1);
                return Err(e);
            }
        };

        self.env
            .sessions
            .put(state.clone(), session, self.config.pending_ttl)
            .await?;

        metrics::counter!("relay.callback", "outcome" => "stored").increment(1);
        tracing::info!(
            state = %state,
            mode = %self.config.payload_mode,
            "Pending session stored"
        );

        Ok(CallbackOutcome { state })
    }

    async fn complete_flow(&self, code: &str) -> Result<PendingSession> {
        let tokens = self.env.oauth.exchange_code(code).await?;

        Ok(match self.config.payload_mode {
            // Only the token is kept; the profile is fetched at poll time.
            PayloadMode::LiveProfile => PendingSession::RetainedToken {
                access_token: tokens.access_token,
            },
            PayloadMode::Profile => PendingSession::Profile(self.fetch_profile(&tokens).await?),
            PayloadMode::ProfileWithAccessToken => PendingSession::ProfileWithAccessToken {
                profile: self.fetch_profile(&tokens).await?,
                access_token: tokens.access_token,
            },
            PayloadMode::Tokens => {
                self.fetch_profile(&tokens).await?;
                PendingSession::Tokens(tokens.token_pair())
            }
            PayloadMode::SessionToken => {
                let profile = self.fetch_profile(&tokens).await?;
                let issuer = self.tokens.as_ref().ok_or_else(|| {
                    RelayError::InvalidConfig("no session token issuer".to_string())
                })?;
                let session_token = issuer.issue(&profile, tokens.refresh_token.as_deref())?;
                PendingSession::SessionToken {
                    profile,
                    session_token,
                }
            }
        })
    }

    async fn fetch_profile(&self, tokens: &OAuthTokenResponse) -> Result<UserProfile> {
        let profile = self.env.oauth.fetch_user_info(&tokens.access_token).await?;
        tracing::debug!(subject = ?profile.subject(), "Fetched Google profile");
        Ok(profile)
    }

    /// Collect the pending session stored under `state`.
    ///
    /// Consumes the entry, so a second poll gets [`RelayError::SessionNotFound`].
    /// In live mode the entry is kept and the profile fetched fresh instead.
    ///
    /// # Errors
    ///
    /// - [`RelayError::MissingParameter`] if `state` is missing
    /// - [`RelayError::SessionNotFound`] if nothing live is stored under it
    /// - [`RelayError::RetainedTokenRejected`] if the live fetch fails
    pub async fn retrieve_profile(&self, params: RetrieveParams) -> Result<Value> {
        let Some(state) = present(params.state).map(StateKey::new) else {
            metrics::counter!("relay.retrieve", "outcome" => "bad_request").increment(1);
            return Err(RelayError::MissingParameter { name: "state" });
        };

        let result = if self.config.payload_mode == PayloadMode::LiveProfile {
            self.retrieve_live(&state).await
        } else {
            self.retrieve_stored(&state).await
        };

        let outcome = match &result {
            Ok(_) => "delivered",
            Err(RelayError::SessionNotFound) => "not_found",
            Err(_) => "failed",
        };
        metrics::counter!("relay.retrieve", "outcome" => outcome).increment(1);

        if result.is_ok() {
            tracing::info!(state = %state, "Pending session delivered");
        } else {
            tracing::debug!(state = %state, outcome, "Pending session not delivered");
        }

        result
    }

    async fn retrieve_stored(&self, state: &StateKey) -> Result<Value> {
        let session = self
            .env
            .sessions
            .take(state)
            .await?
            .ok_or(RelayError::SessionNotFound)?;

        session.body().ok_or_else(|| {
            RelayError::InternalError("stored session has no deliverable body".to_string())
        })
    }

    async fn retrieve_live(&self, state: &StateKey) -> Result<Value> {
        let session = self
            .env
            .sessions
            .peek(state)
            .await?
            .ok_or(RelayError::SessionNotFound)?;

        let access_token = match session {
            PendingSession::RetainedToken { access_token } => access_token,
            other => return other.body().ok_or(RelayError::SessionNotFound),
        };

        let profile = self
            .env
            .oauth
            .fetch_user_info(&access_token)
            .await
            .map_err(|e| {
                tracing::warn!(state = %state, error = %e, "Retained access token rejected");
                RelayError::RetainedTokenRejected(e.to_string())
            })?;

        Ok(profile.to_json())
    }

    /// Insert a video resource on the caller's channel.
    ///
    /// Tags and category are fixed; the response is returned verbatim.
    ///
    /// # Errors
    ///
    /// - [`RelayError::MissingFields`] if any field is missing (no call is made)
    /// - [`RelayError::VideoUploadFailed`] if `YouTube` rejects the insert
    pub async fn share_to_youtube(&self, request: ShareRequest) -> Result<Value> {
        let access_token = present(request.access_token);
        let title = present(request.video_title);
        let description = present(request.description);
        let privacy = present(request.privacy_status);

        let (Some(access_token), Some(title), Some(description), Some(privacy)) =
            (access_token.as_ref(), title.as_ref(), description.as_ref(), privacy.as_ref())
        else {
            let fields = [
                ("accessToken", access_token.is_none()),
                ("videoTitle", title.is_none()),
                ("description", description.is_none()),
                ("privacyStatus", privacy.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, missing)| missing.then_some(name))
            .collect();

            metrics::counter!("relay.youtube_share", "outcome" => "bad_request").increment(1);
            return Err(RelayError::MissingFields { fields });
        };

        let metadata = VideoMetadata::new(title.as_str(), description.as_str(), privacy.as_str());

        match self.env.videos.insert_video(access_token, &metadata).await {
            Ok(resource) => {
                metrics::counter!("relay.youtube_share", "outcome" => "uploaded").increment(1);
                let video_id = resource.get("id").and_then(Value::as_str);
                tracing::info!(
                    video_id = ?video_id,
                    privacy = %privacy,
                    "Video inserted"
                );
                Ok(resource)
            }
            Err(e) => {
                metrics::counter!("relay.youtube_share", "outcome" => "failed").increment(1);
                Err(e)
            }
        }
    }
}

impl<O, V, S> std::fmt::Debug for CallbackRelay<O, V, S>
where
    O: OAuth2Provider,
    V: VideoPublisher,
    S: SessionStore,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRelay")
            .field("config", &self.config)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}
