//! Signed session tokens.
//!
//! Issued in the `session_token` payload mode so the client can prove who
//! it is later without another Google round-trip. Tokens are HS256 JWTs:
//!
//! ```text
//! { "sub": "<google id>", "profile": {...}, "refreshToken": "...", "iat": ..., "exp": ... }
//! ```

use crate::environment::Clock;
use crate::error::{RelayError, Result};
use crate::state::UserProfile;
use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// Google account id, when the profile has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Userinfo at issue time.
    pub profile: UserProfile,

    /// Refresh token from the exchange, if Google granted one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Issued at (unix seconds).
    pub iat: i64,

    /// Expires at (unix seconds).
    pub exp: i64,
}

/// Issues and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct SessionTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
    clock: Arc<dyn Clock>,
}

impl SessionTokenIssuer {
    /// Create an issuer signing with `secret`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidConfig`] if the secret is empty.
    pub fn new(secret: &[u8], validity: Duration, clock: Arc<dyn Clock>) -> Result<Self> {
        if secret.is_empty() {
            return Err(RelayError::InvalidConfig(
                "session token secret must not be empty".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validity,
            clock,
        })
    }

    /// Validity window of issued tokens.
    #[must_use]
    pub const fn validity(&self) -> Duration {
        self.validity
    }

    /// Sign a token for `profile`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::SessionToken`] if signing fails.
    pub fn issue(&self, profile: &UserProfile, refresh_token: Option<&str>) -> Result<String> {
        let now = self.clock.now();
        let claims = SessionClaims {
            sub: profile.subject().map(ToString::to_string),
            profile: profile.clone(),
            refresh_token: refresh_token.map(ToString::to_string),
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| RelayError::SessionToken(format!("failed to sign: {e}")))
    }

    /// Check signature and expiry, returning the claims.
    ///
    /// Expiry is judged against the injected clock, not the wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::SessionToken`] if the token is malformed, signed
    /// with another key, or expired.
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| RelayError::SessionToken(format!("invalid token: {e}")))?
            .claims;

        if claims.exp <= self.clock.now().timestamp() {
            return Err(RelayError::SessionToken("token expired".to_string()));
        }

        Ok(claims)
    }
}

impl fmt::Debug for SessionTokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokenIssuer")
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::environment::SystemClock;
    use crate::mocks::ManualClock;
    use chrono::Utc;
    use serde_json::json;

    fn profile() -> UserProfile {
        UserProfile::try_from(json!({"id": "1", "name": "A"})).unwrap()
    }

    fn issuer(secret: &[u8]) -> SessionTokenIssuer {
        SessionTokenIssuer::new(secret, Duration::days(30), Arc::new(SystemClock)).unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = issuer(b"test-secret");
        let token = issuer.issue(&profile(), Some("R")).unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("1"));
        assert_eq!(claims.profile, profile());
        assert_eq!(claims.refresh_token.as_deref(), Some("R"));
        assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
    }

    #[test]
    fn test_claims_wire_names() {
        let claims = SessionClaims {
            sub: Some("1".into()),
            profile: profile(),
            refresh_token: Some("R".into()),
            iat: 10,
            exp: 20,
        };
        let value = serde_json::to_value(claims).unwrap();
        assert_eq!(value["refreshToken"], "R");
        assert_eq!(value["profile"]["name"], "A");
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result = SessionTokenIssuer::new(b"", Duration::days(30), Arc::new(SystemClock));
        assert!(matches!(result, Err(RelayError::InvalidConfig(_))));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = issuer(b"secret-one").issue(&profile(), None).unwrap();
        let result = issuer(b"secret-two").verify(&token);
        assert!(matches!(result, Err(RelayError::SessionToken(_))));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let issuer = issuer(b"test-secret");
        let token = issuer.issue(&profile(), None).unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = base64::Engine::encode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            br#"{"sub":"2","profile":{"id":"2"},"iat":0,"exp":99999999999}"#,
        );
        parts[1] = &forged_payload;
        let forged = parts.join(".");

        assert!(issuer.verify(&forged).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let clock = ManualClock::new(Utc::now());
        let issuer =
            SessionTokenIssuer::new(b"test-secret", Duration::days(30), Arc::new(clock.clone()))
                .unwrap();
        let token = issuer.issue(&profile(), None).unwrap();

        clock.advance(Duration::days(29));
        assert!(issuer.verify(&token).is_ok());

        clock.advance(Duration::days(1));
        assert!(matches!(
            issuer.verify(&token),
            Err(RelayError::SessionToken(_))
        ));
    }

    #[test]
    fn test_debug_hides_keys() {
        let rendered = format!("{:?}", issuer(b"super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}
