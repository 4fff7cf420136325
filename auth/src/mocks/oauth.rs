//! Mock `OAuth2` provider for testing.

use crate::error::{RelayError, Result};
use crate::providers::{OAuth2Provider, OAuthTokenResponse};
use crate::state::UserProfile;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Mock `OAuth2` provider.
///
/// Returns a canned token pair and profile. Failures can be switched on per
/// call type, and the userinfo switch can be flipped while a test runs (the
/// state is shared by clones).
#[derive(Debug, Clone)]
pub struct MockOAuth2Provider {
    tokens: OAuthTokenResponse,
    profile: UserProfile,
    fail_exchange: Arc<AtomicBool>,
    fail_user_info: Arc<AtomicBool>,
    exchange_calls: Arc<AtomicUsize>,
    user_info_calls: Arc<AtomicUsize>,
    last_code: Arc<Mutex<Option<String>>>,
}

impl MockOAuth2Provider {
    /// Create a mock that succeeds with access token `"T"`, refresh token
    /// `"R"` and profile `{"id": "1", "name": "A"}`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokens: OAuthTokenResponse {
                access_token: "T".to_string(),
                refresh_token: Some("R".to_string()),
            },
            profile: UserProfile::try_from(json!({"id": "1", "name": "A"}))
                .unwrap_or_else(|_| UserProfile::new(serde_json::Map::new())),
            fail_exchange: Arc::new(AtomicBool::new(false)),
            fail_user_info: Arc::new(AtomicBool::new(false)),
            exchange_calls: Arc::new(AtomicUsize::new(0)),
            user_info_calls: Arc::new(AtomicUsize::new(0)),
            last_code: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a mock whose code exchange fails.
    #[must_use]
    pub fn failing() -> Self {
        let mock = Self::new();
        mock.set_fail_exchange(true);
        mock
    }

    /// Return this profile from userinfo.
    ///
    /// Non-object values are ignored.
    #[must_use]
    pub fn with_profile(mut self, profile: Value) -> Self {
        if let Ok(profile) = UserProfile::try_from(profile) {
            self.profile = profile;
        }
        self
    }

    /// Return these tokens from the exchange.
    #[must_use]
    pub fn with_tokens(mut self, access_token: &str, refresh_token: Option<&str>) -> Self {
        self.tokens.access_token = access_token.to_string();
        self.tokens.refresh_token = refresh_token.map(ToString::to_string);
        self
    }

    /// Make the code exchange fail (or succeed again).
    pub fn set_fail_exchange(&self, fail: bool) {
        self.fail_exchange.store(fail, Ordering::SeqCst);
    }

    /// Make userinfo fail (or succeed again).
    pub fn set_fail_user_info(&self, fail: bool) {
        self.fail_user_info.store(fail, Ordering::SeqCst);
    }

    /// Number of `exchange_code` calls so far.
    #[must_use]
    pub fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }

    /// Number of `fetch_user_info` calls so far.
    #[must_use]
    pub fn user_info_calls(&self) -> usize {
        self.user_info_calls.load(Ordering::SeqCst)
    }

    /// Code passed to the most recent exchange.
    #[must_use]
    pub fn last_code(&self) -> Option<String> {
        self.last_code
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for MockOAuth2Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl OAuth2Provider for MockOAuth2Provider {
    fn build_authorization_url(&self, state: &str) -> Result<String> {
        let query = serde_urlencoded::to_string([("state", state)])
            .map_err(|e| RelayError::InternalError(e.to_string()))?;
        Ok(format!("https://accounts.example.com/auth?{query}"))
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthTokenResponse> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_code.lock().unwrap_or_else(PoisonError::into_inner) = Some(code.to_string());

        if self.fail_exchange.load(Ordering::SeqCst) {
            return Err(RelayError::OAuthTokenExchangeFailed(
                "invalid_grant".to_string(),
            ));
        }

        Ok(self.tokens.clone())
    }

    async fn fetch_user_info(&self, access_token: &str) -> Result<UserProfile> {
        self.user_info_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_user_info.load(Ordering::SeqCst) || access_token != self.tokens.access_token {
            return Err(RelayError::OAuthUserInfoFailed(
                "userinfo endpoint returned 401 Unauthorized".to_string(),
            ));
        }

        Ok(self.profile.clone())
    }
}
