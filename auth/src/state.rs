//! Relay data types.
//!
//! A [`PendingSession`] is what the callback leaves behind for the client to
//! collect. It is keyed by a [`StateKey`], the opaque `state` value the
//! client chose and Google echoed back.

use crate::constants::GENERATED_STATE_BYTES;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════
// Keys
// ═══════════════════════════════════════════════════════════════════════

/// Correlation handle shared by the callback and the poll.
///
/// The relay trusts this value as the only authorization to collect a
/// pending session, so clients must make it unguessable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(String);

impl StateKey {
    /// Wrap a caller-supplied state.
    #[must_use]
    pub fn new(state: impl Into<String>) -> Self {
        Self(state.into())
    }

    /// Generate a random url-safe state (256 bits).
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; GENERATED_STATE_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Borrow the raw value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Profile and tokens
// ═══════════════════════════════════════════════════════════════════════

/// Userinfo document exactly as Google returned it.
///
/// The relay passes it through; only [`UserProfile::subject`] looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(Map<String, Value>);

impl UserProfile {
    /// Wrap a userinfo JSON object.
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Stable Google account id: `id` (v2 userinfo) or `sub` (OIDC userinfo).
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.0
            .get("id")
            .or_else(|| self.0.get("sub"))
            .and_then(Value::as_str)
    }

    /// Copy of this profile with one extra top-level field.
    #[must_use]
    pub fn with_field(&self, name: &str, value: impl Into<Value>) -> Self {
        let mut fields = self.0.clone();
        fields.insert(name.to_string(), value.into());
        Self(fields)
    }

    /// Profile as a JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl TryFrom<Value> for UserProfile {
    type Error = Value;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}

/// Tokens granted by the authorization-code exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Bearer token for Google APIs.
    pub access_token: String,

    /// Only present when consent was given with `access_type=offline`.
    pub refresh_token: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// Pending sessions
// ═══════════════════════════════════════════════════════════════════════

/// Value parked under a [`StateKey`] between callback and poll.
///
/// The variant is chosen by [`PayloadMode`](crate::config::PayloadMode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingSession {
    /// Userinfo verbatim.
    Profile(UserProfile),

    /// Userinfo plus the access token as an extra `accessToken` field.
    ProfileWithAccessToken {
        /// Userinfo.
        profile: UserProfile,
        /// Access token from the exchange.
        access_token: String,
    },

    /// Raw token pair, no profile.
    Tokens(TokenPair),

    /// Userinfo plus a signed session token for later re-authentication.
    SessionToken {
        /// Userinfo.
        profile: UserProfile,
        /// Signed session token.
        session_token: String,
    },

    /// Only the access token; the profile is fetched again on every poll.
    RetainedToken {
        /// Access token from the exchange.
        access_token: String,
    },
}

impl PendingSession {
    /// Response body handed to the polling client.
    ///
    /// `None` for [`PendingSession::RetainedToken`], whose body is a fresh
    /// userinfo fetch rather than anything stored.
    #[must_use]
    pub fn body(&self) -> Option<Value> {
        match self {
            Self::Profile(profile) => Some(profile.to_json()),
            Self::ProfileWithAccessToken {
                profile,
                access_token,
            } => Some(
                profile
                    .with_field("accessToken", access_token.clone())
                    .to_json(),
            ),
            Self::Tokens(tokens) => serde_json::to_value(tokens).ok(),
            Self::SessionToken {
                profile,
                session_token,
            } => Some(serde_json::json!({
                "profile": profile.to_json(),
                "sessionToken": session_token,
            })),
            Self::RetainedToken { .. } => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile() -> UserProfile {
        UserProfile::try_from(json!({"id": "1", "name": "A"})).unwrap()
    }

    #[test]
    fn test_generated_states_are_unique_and_url_safe() {
        let a = StateKey::generate();
        let b = StateKey::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 43);
        assert!(
            a.as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_profile_rejects_non_object() {
        assert!(UserProfile::try_from(json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn test_profile_subject_prefers_id_then_sub() {
        assert_eq!(profile().subject(), Some("1"));
        let oidc = UserProfile::try_from(json!({"sub": "abc"})).unwrap();
        assert_eq!(oidc.subject(), Some("abc"));
        let anonymous = UserProfile::try_from(json!({"name": "A"})).unwrap();
        assert_eq!(anonymous.subject(), None);
    }

    #[test]
    fn test_profile_body_is_verbatim() {
        let body = PendingSession::Profile(profile()).body();
        assert_eq!(body, Some(json!({"id": "1", "name": "A"})));
    }

    #[test]
    fn test_profile_with_access_token_body() {
        let body = PendingSession::ProfileWithAccessToken {
            profile: profile(),
            access_token: "T".into(),
        }
        .body();
        assert_eq!(body, Some(json!({"id": "1", "name": "A", "accessToken": "T"})));
    }

    #[test]
    fn test_tokens_body_uses_camel_case() {
        let body = PendingSession::Tokens(TokenPair {
            access_token: "T".into(),
            refresh_token: None,
        })
        .body();
        assert_eq!(body, Some(json!({"accessToken": "T", "refreshToken": null})));
    }

    #[test]
    fn test_session_token_body() {
        let body = PendingSession::SessionToken {
            profile: profile(),
            session_token: "jwt".into(),
        }
        .body();
        assert_eq!(
            body,
            Some(json!({"profile": {"id": "1", "name": "A"}, "sessionToken": "jwt"}))
        );
    }

    #[test]
    fn test_retained_token_has_no_stored_body() {
        let session = PendingSession::RetainedToken {
            access_token: "T".into(),
        };
        assert_eq!(session.body(), None);
    }
}
