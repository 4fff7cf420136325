//! Server configuration loaded from environment variables.
//!
//! Read once at start-up. A `.env` file in the working directory is honoured
//! (loaded by `main` before this runs).

use callback_relay_auth::{PayloadMode, RelayConfig};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 10000;

/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default lifetime of an uncollected pending session, in seconds.
pub const DEFAULT_PENDING_TTL_SECS: u64 = 600;

/// Upper bound on the pending-session lifetime, in seconds (one week).
pub const MAX_PENDING_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Default period of the expiry sweep, in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable is set to something unusable.
    #[error("{name} has invalid value '{value}': {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Google endpoint overrides, mostly for tests against a local mock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointOverrides {
    /// `GOOGLE_AUTH_URL`
    pub auth_url: Option<String>,
    /// `GOOGLE_TOKEN_URL`
    pub token_url: Option<String>,
    /// `GOOGLE_USERINFO_URL`
    pub userinfo_url: Option<String>,
    /// `YOUTUBE_UPLOAD_URL`
    pub youtube_upload_url: Option<String>,
}

/// Relay server configuration.
#[derive(Clone)]
pub struct RelayServerConfig {
    /// Google OAuth client id.
    pub client_id: String,
    /// Google OAuth client secret.
    pub client_secret: String,
    /// Callback URL registered with Google.
    pub redirect_uri: String,
    /// Session token signing key.
    pub jwt_secret: Option<String>,
    /// Bind address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// What the callback stores and the poll returns.
    pub payload_mode: PayloadMode,
    /// Lifetime of an uncollected pending session.
    pub pending_ttl: Duration,
    /// Period of the background expiry sweep.
    pub sweep_interval: Duration,
    /// Client app URI scheme for the success page redirect.
    pub app_uri_scheme: Option<String>,
    /// Endpoint overrides.
    pub endpoints: EndpointOverrides,
}

impl RelayServerConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a value
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a value
    /// does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));

        let jwt_secret = var("JWT_SECRET");

        let payload_mode = match var("RELAY_PAYLOAD") {
            Some(value) => value.parse::<PayloadMode>().map_err(|e| ConfigError::Invalid {
                name: "RELAY_PAYLOAD",
                value,
                reason: e.to_string(),
            })?,
            None if jwt_secret.is_some() => PayloadMode::SessionToken,
            None => PayloadMode::Profile,
        };

        if payload_mode.requires_signing_key() && jwt_secret.is_none() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }

        let app_uri_scheme = var("APP_URI_SCHEME");
        if let Some(scheme) = &app_uri_scheme {
            validate_scheme(scheme)?;
        }

        Ok(Self {
            client_id: required("CLIENT_ID")?,
            client_secret: required("CLIENT_SECRET")?,
            redirect_uri: required("REDIRECT_URI")?,
            jwt_secret,
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or("PORT", var("PORT"), DEFAULT_PORT)?,
            payload_mode,
            pending_ttl: Duration::from_secs(at_most(
                "PENDING_SESSION_TTL_SECS",
                positive(
                    "PENDING_SESSION_TTL_SECS",
                    parse_or(
                        "PENDING_SESSION_TTL_SECS",
                        var("PENDING_SESSION_TTL_SECS"),
                        DEFAULT_PENDING_TTL_SECS,
                    )?,
                )?,
                MAX_PENDING_TTL_SECS,
            )?),
            sweep_interval: Duration::from_secs(positive(
                "SWEEP_INTERVAL_SECS",
                parse_or(
                    "SWEEP_INTERVAL_SECS",
                    var("SWEEP_INTERVAL_SECS"),
                    DEFAULT_SWEEP_INTERVAL_SECS,
                )?,
            )?),
            app_uri_scheme,
            endpoints: EndpointOverrides {
                auth_url: var("GOOGLE_AUTH_URL"),
                token_url: var("GOOGLE_TOKEN_URL"),
                userinfo_url: var("GOOGLE_USERINFO_URL"),
                youtube_upload_url: var("YOUTUBE_UPLOAD_URL"),
            },
        })
    }

    /// `host:port` to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Domain configuration for the relay.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the TTL does not fit a
    /// `chrono::Duration`.
    pub fn relay_config(&self) -> Result<RelayConfig, ConfigError> {
        let ttl = chrono::Duration::from_std(self.pending_ttl).map_err(|e| ConfigError::Invalid {
            name: "PENDING_SESSION_TTL_SECS",
            value: self.pending_ttl.as_secs().to_string(),
            reason: e.to_string(),
        })?;

        let mut config = RelayConfig::new(self.payload_mode).with_pending_ttl(ttl);
        if let Some(scheme) = &self.app_uri_scheme {
            config = config.with_app_uri_scheme(scheme.clone());
        }
        Ok(config)
    }
}

impl fmt::Debug for RelayServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayServerConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("payload_mode", &self.payload_mode)
            .field("pending_ttl", &self.pending_ttl)
            .field("sweep_interval", &self.sweep_interval)
            .field("app_uri_scheme", &self.app_uri_scheme)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

fn parse_or<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value.map_or(Ok(default), |value| {
        value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        })
    })
}

fn positive(name: &'static str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

fn at_most(name: &'static str, value: u64, max: u64) -> Result<u64, ConfigError> {
    if value > max {
        return Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: format!("must be at most {max}"),
        });
    }
    Ok(value)
}

// RFC 3986: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
fn validate_scheme(scheme: &str) -> Result<(), ConfigError> {
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            name: "APP_URI_SCHEME",
            value: scheme.to_string(),
            reason: "not a valid URI scheme".to_string(),
        })
    }
}
