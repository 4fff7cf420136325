//! Relay environment.
//!
//! Collects the relay's external collaborators so tests can swap each one:
//! the Google OAuth client, the `YouTube` client and the pending-session
//! store. Time is injected separately into the store and the token issuer
//! through [`Clock`].

use crate::providers::{OAuth2Provider, SessionStore, VideoPublisher};
use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Drives pending-session expiry and session-token timestamps.
pub trait Clock: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Relay environment.
///
/// # Type Parameters
///
/// - `O`: `OAuth2` provider (token exchange and userinfo)
/// - `V`: Video publisher (`YouTube` insert)
/// - `S`: Pending-session store
#[derive(Clone)]
pub struct RelayEnvironment<O, V, S>
where
    O: OAuth2Provider,
    V: VideoPublisher,
    S: SessionStore,
{
    /// `OAuth2` provider.
    pub oauth: O,

    /// Video publisher.
    pub videos: V,

    /// Pending-session store.
    pub sessions: S,
}

impl<O, V, S> RelayEnvironment<O, V, S>
where
    O: OAuth2Provider,
    V: VideoPublisher,
    S: SessionStore,
{
    /// Create a new relay environment.
    #[must_use]
    pub const fn new(oauth: O, videos: V, sessions: S) -> Self {
        Self {
            oauth,
            videos,
            sessions,
        }
    }
}
