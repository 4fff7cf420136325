//! Error types for relay operations.

use thiserror::Error;

/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Every failure mode of the relay, grouped the way callers see them:
/// bad input, collaborator failures, and lookup misses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    // ═══════════════════════════════════════════════════════════
    // Client Input Errors
    // ═══════════════════════════════════════════════════════════

    /// A required query parameter was absent or empty.
    #[error("Missing required parameter: {name}")]
    MissingParameter {
        /// Parameter name as it appears on the wire.
        name: &'static str,
    },

    /// One or more required body fields were absent or empty.
    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields {
        /// Field names as they appear on the wire.
        fields: Vec<&'static str>,
    },

    /// Google redirected back with an `error` instead of a `code`.
    #[error(
        "Authorization was not granted: {error}{}",
        .description.as_deref().map(|d| format!(" ({d})")).unwrap_or_default()
    )]
    ProviderDenied {
        /// `error` query parameter (e.g. `access_denied`).
        error: String,
        /// Optional `error_description` query parameter.
        description: Option<String>,
    },

    // ═══════════════════════════════════════════════════════════
    // Collaborator Failures
    // ═══════════════════════════════════════════════════════════

    /// Authorization-code exchange failed (transport, non-2xx or bad body).
    #[error("OAuth token exchange failed: {0}")]
    OAuthTokenExchangeFailed(String),

    /// Userinfo request failed during the callback.
    #[error("OAuth userinfo request failed: {0}")]
    OAuthUserInfoFailed(String),

    /// Userinfo request failed while serving a poll with a retained token.
    #[error("Retained access token was rejected: {0}")]
    RetainedTokenRejected(String),

    /// `YouTube` video-insert call failed.
    #[error("YouTube upload failed: {0}")]
    VideoUploadFailed(String),

    /// Session token could not be signed or verified.
    #[error("Session token error: {0}")]
    SessionToken(String),

    // ═══════════════════════════════════════════════════════════
    // Lookup Misses
    // ═══════════════════════════════════════════════════════════

    /// No pending session under this state (never stored, consumed, or expired).
    #[error("Pending session not found")]
    SessionNotFound,

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// Configuration is incomplete or inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal error (should not be exposed to users).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl RelayError {
    /// Returns `true` if this error is due to invalid caller input.
    ///
    /// # Examples
    ///
    /// ```
    /// # use callback_relay_auth::RelayError;
    /// assert!(RelayError::MissingParameter { name: "code" }.is_user_error());
    /// assert!(!RelayError::SessionNotFound.is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter { .. } | Self::MissingFields { .. } | Self::ProviderDenied { .. }
        )
    }

    /// Returns `true` if an outbound call to Google caused this error.
    #[must_use]
    pub const fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            Self::OAuthTokenExchangeFailed(_)
                | Self::OAuthUserInfoFailed(_)
                | Self::RetainedTokenRejected(_)
                | Self::VideoUploadFailed(_)
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_lists_fields() {
        let err = RelayError::MissingFields {
            fields: vec!["accessToken", "privacyStatus"],
        };
        assert_eq!(
            err.to_string(),
            "Missing required fields: accessToken, privacyStatus"
        );
    }

    #[test]
    fn test_provider_denied_message_carries_description() {
        let bare = RelayError::ProviderDenied {
            error: "access_denied".into(),
            description: None,
        };
        assert_eq!(bare.to_string(), "Authorization was not granted: access_denied");

        let described = RelayError::ProviderDenied {
            error: "access_denied".into(),
            description: Some("User cancelled".into()),
        };
        assert_eq!(
            described.to_string(),
            "Authorization was not granted: access_denied (User cancelled)"
        );
    }

    #[test]
    fn test_classification() {
        assert!(RelayError::ProviderDenied {
            error: "access_denied".into(),
            description: None
        }
        .is_user_error());
        assert!(RelayError::OAuthTokenExchangeFailed("boom".into()).is_collaborator_failure());
        assert!(!RelayError::SessionNotFound.is_collaborator_failure());
        assert!(!RelayError::InternalError("x".into()).is_user_error());
    }
}
