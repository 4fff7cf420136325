//! Relay configuration.
//!
//! Values are provided by the application (the server binary reads them from
//! the environment); nothing here touches the process environment.

use crate::constants::{DEFAULT_PENDING_TTL_SECS, SESSION_TOKEN_VALIDITY_DAYS};
use crate::error::RelayError;
use chrono::Duration;
use std::fmt;
use std::str::FromStr;

/// Shape of the value a successful callback leaves for the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadMode {
    /// Userinfo verbatim.
    Profile,
    /// Userinfo with an extra `accessToken` field.
    ProfileWithAccessToken,
    /// `{accessToken, refreshToken}` only.
    Tokens,
    /// `{profile, sessionToken}` with a signed 30-day session token.
    SessionToken,
    /// Keep the access token and fetch the profile live on each poll.
    /// Polls do not consume the entry.
    LiveProfile,
}

impl PayloadMode {
    /// Wire name used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::ProfileWithAccessToken => "profile_with_token",
            Self::Tokens => "tokens",
            Self::SessionToken => "session_token",
            Self::LiveProfile => "live_profile",
        }
    }

    /// Whether this mode needs a session-token signing key.
    #[must_use]
    pub const fn requires_signing_key(self) -> bool {
        matches!(self, Self::SessionToken)
    }
}

impl fmt::Display for PayloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayloadMode {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "profile" => Ok(Self::Profile),
            "profile_with_token" => Ok(Self::ProfileWithAccessToken),
            "tokens" => Ok(Self::Tokens),
            "session_token" => Ok(Self::SessionToken),
            "live_profile" => Ok(Self::LiveProfile),
            other => Err(RelayError::InvalidConfig(format!(
                "unknown payload mode '{other}' (expected profile, profile_with_token, tokens, session_token or live_profile)"
            ))),
        }
    }
}

/// Callback relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// What the callback stores and the poll returns.
    pub payload_mode: PayloadMode,

    /// How long an uncollected pending session survives.
    ///
    /// Default: 10 minutes
    pub pending_ttl: Duration,

    /// Validity window of issued session tokens.
    ///
    /// Default: 30 days
    pub session_token_validity: Duration,

    /// Custom URI scheme of the client app (e.g. `"mygame"`).
    ///
    /// When set, the success page redirects to `{scheme}://auth?state=...`.
    pub app_uri_scheme: Option<String>,
}

impl RelayConfig {
    /// Create a configuration for the given payload mode.
    #[must_use]
    pub fn new(payload_mode: PayloadMode) -> Self {
        Self {
            payload_mode,
            pending_ttl: Duration::seconds(DEFAULT_PENDING_TTL_SECS),
            session_token_validity: Duration::days(SESSION_TOKEN_VALIDITY_DAYS),
            app_uri_scheme: None,
        }
    }

    /// Set pending-session time-to-live.
    #[must_use]
    pub const fn with_pending_ttl(mut self, ttl: Duration) -> Self {
        self.pending_ttl = ttl;
        self
    }

    /// Set session token validity.
    #[must_use]
    pub const fn with_session_token_validity(mut self, validity: Duration) -> Self {
        self.session_token_validity = validity;
        self
    }

    /// Redirect the success page into the client app.
    #[must_use]
    pub fn with_app_uri_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.app_uri_scheme = Some(scheme.into());
        self
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::new(PayloadMode::Profile)
    }
}
