//! Authentication error taxonomy.

use thiserror::Error;

use crate::cache::CacheError;
use crate::db::RepositoryError;
use crate::models::FieldError;

use super::token::TokenError;

/// Errors from authentication flows and the access guard.
///
/// Client-facing status codes and messages are assigned centrally in
/// [`crate::error::AppError`].
#[derive(Debug, Error)]
pub enum AuthError {
    /// Signup payload failed field validation.
    #[error("validation failed: {}", format_fields(.0))]
    Validation(Vec<FieldError>),

    /// Signup with an email that already has an account.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Login with an unknown email or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Guarded route hit without an access token cookie.
    #[error("no access token provided")]
    NoAccessToken,

    /// Access token has expired.
    #[error("access token expired")]
    AccessTokenExpired,

    /// Access token failed verification.
    #[error("invalid access token")]
    InvalidAccessToken,

    /// Access token verified but the account no longer exists.
    #[error("user not found")]
    UserNotFound,

    /// Non-admin on an admin-only route.
    #[error("admin role required")]
    AdminRequired,

    /// Refresh hit without a refresh token cookie.
    #[error("no refresh token provided")]
    NoRefreshToken,

    /// Refresh token failed verification or does not match the session
    /// record.
    #[error("invalid refresh token")]
    InvalidRefreshToken,

    /// bcrypt failed to hash the password.
    #[error("password hashing failed")]
    PasswordHash,

    /// Signing a new token failed.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// The user store failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The session cache failed.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

fn format_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
