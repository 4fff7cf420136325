//! `OAuth2` provider trait.

use crate::error::Result;
use crate::state::{TokenPair, UserProfile};

/// `OAuth2` authorization-code collaborator.
///
/// Each method makes at most one outbound call and never retries.
pub trait OAuth2Provider: Send + Sync {
    /// Build the consent-screen URL carrying `state`.
    ///
    /// # Errors
    ///
    /// Returns error if URL construction fails.
    fn build_authorization_url(&self, state: &str) -> Result<String>;

    /// Exchange an authorization code for tokens.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::OAuthTokenExchangeFailed`](crate::RelayError::OAuthTokenExchangeFailed) if:
    /// - Network request fails
    /// - Provider rejects the code
    /// - Response is malformed
    fn exchange_code(
        &self,
        code: &str,
    ) -> impl std::future::Future<Output = Result<OAuthTokenResponse>> + Send;

    /// Fetch the profile of the access token's owner.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::OAuthUserInfoFailed`](crate::RelayError::OAuthUserInfoFailed) if:
    /// - Network request fails
    /// - Token is invalid or expired
    /// - Response is not a JSON object
    fn fetch_user_info(
        &self,
        access_token: &str,
    ) -> impl std::future::Future<Output = Result<UserProfile>> + Send;
}

/// OAuth token response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthTokenResponse {
    /// Access token.
    pub access_token: String,

    /// Refresh token (if available).
    pub refresh_token: Option<String>,
}

impl OAuthTokenResponse {
    /// The access/refresh pair.
    #[must_use]
    pub fn token_pair(&self) -> TokenPair {
        TokenPair {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}
