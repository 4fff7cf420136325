//! Google OAuth 2.0 provider implementation.

use crate::constants::google;
use crate::error::{RelayError, Result};
use crate::providers::{OAuth2Provider, OAuthTokenResponse};
use crate::state::UserProfile;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Google OAuth 2.0 provider.
///
/// Implements the `OAuth2Provider` trait for Google Identity Platform.
///
/// # Configuration
///
/// 1. Create OAuth 2.0 credentials in Google Cloud Console
/// 2. Register the relay's `/auth/google/callback` URL as a redirect URI
/// 3. Set `CLIENT_ID`, `CLIENT_SECRET` and `REDIRECT_URI`
///
/// # Example
///
/// ```no_run
/// use callback_relay_auth::providers::GoogleOAuthProvider;
///
/// let google = GoogleOAuthProvider::new(
///     "your-client-id".to_string(),
///     "your-client-secret".to_string(),
///     "https://relay.example.com/auth/google/callback".to_string(),
/// );
/// ```
#[derive(Clone, Debug)]
pub struct GoogleOAuthProvider {
    /// OAuth 2.0 client ID from Google Cloud Console.
    client_id: String,

    /// OAuth 2.0 client secret (keep confidential).
    client_secret: String,

    /// Callback URL registered with Google; sent with both the consent
    /// request and the code exchange.
    redirect_uri: String,

    /// HTTP client for making requests.
    http_client: Client,

    /// Consent screen endpoint.
    auth_url: String,

    /// Token endpoint.
    token_url: String,

    /// Userinfo endpoint.
    userinfo_url: String,
}

impl GoogleOAuthProvider {
    /// Create a new Google OAuth provider against Google's production endpoints.
    #[must_use]
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            http_client: Client::new(),
            auth_url: google::AUTH_URL.to_string(),
            token_url: google::TOKEN_URL.to_string(),
            userinfo_url: google::USERINFO_URL.to_string(),
        }
    }

    /// Override the consent screen endpoint.
    #[must_use]
    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    /// Override the token endpoint.
    #[must_use]
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Override the userinfo endpoint.
    #[must_use]
    pub fn with_userinfo_url(mut self, url: impl Into<String>) -> Self {
        self.userinfo_url = url.into();
        self
    }

    /// Use a custom HTTP client (connection pool reuse or timeouts).
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }
}

impl OAuth2Provider for GoogleOAuthProvider {
    fn build_authorization_url(&self, state: &str) -> Result<String> {
        let scope = google::SCOPES.join(" ");
        // Google only returns a refresh token for offline access on a fresh consent.
        let params = [
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("state", state),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ];

        let query = serde_urlencoded::to_string(&params)
            .map_err(|e| RelayError::InternalError(format!("Failed to build URL: {e}")))?;

        Ok(format!("{}?{query}", self.auth_url))
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthTokenResponse> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Google token endpoint unreachable");
                RelayError::OAuthTokenExchangeFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %error_body, "Google token exchange failed");
            return Err(RelayError::OAuthTokenExchangeFailed(format!(
                "token endpoint returned {status}"
            )));
        }

        let google_response: GoogleTokenResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Google token response malformed");
            RelayError::OAuthTokenExchangeFailed(e.to_string())
        })?;

        Ok(OAuthTokenResponse {
            access_token: google_response.access_token,
            refresh_token: google_response.refresh_token,
        })
    }

    async fn fetch_user_info(&self, access_token: &str) -> Result<UserProfile> {
        let response = self
            .http_client
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Google userinfo endpoint unreachable");
                RelayError::OAuthUserInfoFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %error_body, "Google userinfo request failed");
            return Err(RelayError::OAuthUserInfoFailed(format!(
                "userinfo endpoint returned {status}"
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Google userinfo response malformed");
            RelayError::OAuthUserInfoFailed(e.to_string())
        })?;

        UserProfile::try_from(body).map_err(|other| {
            tracing::error!(body = %other, "Google userinfo response is not an object");
            RelayError::OAuthUserInfoFailed("userinfo response is not a JSON object".to_string())
        })
    }
}

/// Google's token endpoint response format.
#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    /// Access token for API requests.
    access_token: String,

    /// Refresh token (only on consent with access_type=offline).
    refresh_token: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn provider() -> GoogleOAuthProvider {
        GoogleOAuthProvider::new(
            "test_client_id".to_string(),
            "test_secret".to_string(),
            "http://localhost:10000/auth/google/callback".to_string(),
        )
    }

    #[test]
    fn test_google_provider_defaults() {
        let google = provider();

        assert_eq!(google.token_url, "https://oauth2.googleapis.com/token");
        assert_eq!(
            google.userinfo_url,
            "https://www.googleapis.com/oauth2/v2/userinfo"
        );
        assert_eq!(google.auth_url, "https://accounts.google.com/o/oauth2/v2/auth");
    }

    #[test]
    fn test_authorization_url() {
        let url = provider().build_authorization_url("test_state_123").unwrap();

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=test_client_id"));
        assert!(url.contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A10000%2Fauth%2Fgoogle%2Fcallback"
        ));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=openid+email+profile"));
        assert!(url.contains("state=test_state_123"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
    }

    #[test]
    fn test_state_is_url_encoded() {
        let url = provider().build_authorization_url("a b&c").unwrap();
        assert!(url.contains("state=a+b%26c"));
    }
}
