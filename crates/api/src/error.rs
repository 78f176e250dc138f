//! Unified error handling with Sentry integration.
//!
//! Every route handler returns `Result<T, AppError>`. Server errors are
//! captured to Sentry before responding; client errors are mapped to the
//! status code and `{"message": "..."}` body the frontend expects.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::cache::CacheError;
use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication flow or guard failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Cache operation failed.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Auth(err) => match err {
                AuthError::Validation(_)
                | AuthError::UserAlreadyExists
                | AuthError::InvalidCredentials => StatusCode::BAD_REQUEST,
                AuthError::NoAccessToken
                | AuthError::AccessTokenExpired
                | AuthError::InvalidAccessToken
                | AuthError::UserNotFound
                | AuthError::NoRefreshToken
                | AuthError::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
                AuthError::AdminRequired => StatusCode::FORBIDDEN,
                AuthError::PasswordHash
                | AuthError::Token(_)
                | AuthError::Repository(_)
                | AuthError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Cache(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message. Internal details never leak through here.
    fn message(&self) -> String {
        match self {
            Self::Auth(err) => match err {
                AuthError::Validation(fields) => fields
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
                AuthError::UserAlreadyExists => "User already exists".to_string(),
                AuthError::InvalidCredentials => "Invalid email or password".to_string(),
                AuthError::NoAccessToken => {
                    "Unauthorized - No access token provided".to_string()
                }
                AuthError::AccessTokenExpired => "Unauthorized - Access token expired".to_string(),
                AuthError::InvalidAccessToken => "Unauthorized - Invalid access token".to_string(),
                AuthError::UserNotFound => "User not found".to_string(),
                AuthError::AdminRequired => "Access denied - Admin only".to_string(),
                AuthError::NoRefreshToken => "No refresh token provided".to_string(),
                AuthError::InvalidRefreshToken => "Invalid refresh token".to_string(),
                AuthError::PasswordHash
                | AuthError::Token(_)
                | AuthError::Repository(_)
                | AuthError::Cache(_) => "Internal server error".to_string(),
            },
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::Database(_) | Self::Cache(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(json!({ "message": self.message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::FieldError;

    #[test]
    fn test_guard_errors_are_unauthorized_and_distinguished() {
        let cases = [
            (
                AuthError::NoAccessToken,
                "Unauthorized - No access token provided",
            ),
            (
                AuthError::AccessTokenExpired,
                "Unauthorized - Access token expired",
            ),
            (
                AuthError::InvalidAccessToken,
                "Unauthorized - Invalid access token",
            ),
            (AuthError::UserNotFound, "User not found"),
        ];
        for (err, message) in cases {
            let err = AppError::Auth(err);
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(err.message(), message);
        }
    }

    #[test]
    fn test_refresh_errors_are_unauthorized() {
        assert_eq!(
            AppError::Auth(AuthError::NoRefreshToken).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Auth(AuthError::InvalidRefreshToken).message(),
            "Invalid refresh token"
        );
    }

    #[test]
    fn test_admin_gate_is_forbidden() {
        let err = AppError::Auth(AuthError::AdminRequired);
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "Access denied - Admin only");
    }

    #[test]
    fn test_credential_errors_are_bad_request() {
        assert_eq!(
            AppError::Auth(AuthError::UserAlreadyExists).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Auth(AuthError::InvalidCredentials).message(),
            "Invalid email or password"
        );
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let err = AppError::Auth(AuthError::Validation(vec![FieldError {
            field: "password",
            message: "Password must be at least 6 characters".to_string(),
        }]));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.message().contains("password"));
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Internal("connection pool exhausted".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Internal server error");
    }
}
