//! Relay constants: Google endpoints, default lifetimes, fixed upload metadata.

/// Google endpoints used when no override is configured.
pub mod google {
    /// Consent screen.
    pub const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

    /// Authorization-code exchange.
    pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

    /// Profile of the token's owner.
    pub const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

    /// `YouTube` Data API video insert, with the parts the relay sends.
    pub const YOUTUBE_UPLOAD_URL: &str =
        "https://www.googleapis.com/youtube/v3/videos?part=snippet,status";

    /// Scopes requested on the consent screen.
    pub const SCOPES: [&str; 4] = [
        "openid",
        "email",
        "profile",
        "https://www.googleapis.com/auth/youtube.upload",
    ];
}

/// Fixed metadata attached to every shared video.
pub mod youtube {
    /// Tags on every shared video.
    pub const TAGS: [&str; 2] = ["Unity", "Gameplay"];

    /// `YouTube` category "Gaming".
    pub const CATEGORY_ID: &str = "20";
}

/// Seconds an uncollected pending session survives.
pub const DEFAULT_PENDING_TTL_SECS: i64 = 600;

/// Days a signed session token stays valid.
pub const SESSION_TOKEN_VALIDITY_DAYS: i64 = 30;

/// Random bytes in a relay-generated `state`.
pub const GENERATED_STATE_BYTES: usize = 32;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_url_requests_snippet_and_status() {
        assert!(google::YOUTUBE_UPLOAD_URL.ends_with("part=snippet,status"));
    }

    #[test]
    fn test_session_token_validity_is_thirty_days() {
        assert_eq!(SESSION_TOKEN_VALIDITY_DAYS, 30);
    }
}
