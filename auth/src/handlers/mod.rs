//! HTTP handlers for the relay endpoints.
//!
//! Handlers are thin: they extract query or body parameters, call the
//! matching [`CallbackRelay`](crate::relay::CallbackRelay) operation, and map
//! [`RelayError`] onto an [`AppError`] with a plain-text body.

pub mod oauth;
pub mod page;
pub mod profile;
pub mod youtube;

use crate::error::RelayError;
use callback_relay_web::AppError;

impl From<RelayError> for AppError {
    fn from(error: RelayError) -> Self {
        match error {
            RelayError::MissingParameter { .. }
            | RelayError::MissingFields { .. }
            | RelayError::ProviderDenied { .. } => Self::bad_request(error.to_string()),

            RelayError::SessionNotFound => Self::not_found("Profile not found."),

            RelayError::RetainedTokenRejected(_) => {
                Self::unauthorized("Failed to fetch profile.").with_source(error)
            }

            RelayError::OAuthTokenExchangeFailed(_)
            | RelayError::OAuthUserInfoFailed(_)
            | RelayError::SessionToken(_) => Self::internal("Authentication failed.").with_source(error),

            RelayError::VideoUploadFailed(_) => {
                Self::internal("Failed to upload video.").with_source(error)
            }

            RelayError::InvalidConfig(_) | RelayError::InternalError(_) => {
                Self::internal("Internal server error.").with_source(error)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_client_errors_keep_their_message() {
        let app_error = AppError::from(RelayError::MissingParameter { name: "code" });
        assert_eq!(app_error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(app_error.message(), "Missing required parameter: code");
    }

    #[test]
    fn test_collaborator_failures_are_generic() {
        let app_error = AppError::from(RelayError::OAuthTokenExchangeFailed(
            "invalid_grant from 10.0.0.1".to_string(),
        ));
        assert_eq!(app_error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(app_error.message(), "Authentication failed.");
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (RelayError::SessionNotFound, StatusCode::NOT_FOUND),
            (
                RelayError::RetainedTokenRejected("401".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                RelayError::VideoUploadFailed("403".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                RelayError::ProviderDenied {
                    error: "access_denied".into(),
                    description: None,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                RelayError::InternalError("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(AppError::from(error).status(), status);
        }
    }
}
