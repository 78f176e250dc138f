//! Access guard and admin gate extractors.
//!
//! Routes opt into authentication by taking [`CurrentUser`] (or
//! [`RequireAdmin`]) as a handler argument. Rejections are [`AppError`]
//! values, so the guard produces the same `{"message"}` bodies as everything
//! else.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use tamarind_core::UserId;

use crate::error::AppError;
use crate::middleware::session;
use crate::models::UserProfile;
use crate::services::auth::{AuthError, TokenError};
use crate::state::AppState;

/// The authenticated user, as the password-free projection.
///
/// The account is re-fetched on every request, so a deleted account is
/// rejected even while its access token is still cryptographically valid.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub profile: UserProfile,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = session::access_token(&jar).ok_or(AuthError::NoAccessToken)?;

        let claims = state.tokens().decode_access(&token).map_err(|e| match e {
            TokenError::Expired => AuthError::AccessTokenExpired,
            _ => AuthError::InvalidAccessToken,
        })?;
        let user_id = claims
            .user_id()
            .map_err(|_| AuthError::InvalidAccessToken)?;

        let user = state
            .users()
            .find_by_id(user_id)
            .await
            .map_err(AuthError::from)?
            .ok_or(AuthError::UserNotFound)?;

        let profile = UserProfile::from(&user);
        crate::error::set_sentry_user(&profile.id, Some(profile.email.as_str()));
        Ok(Self {
            id: user.id,
            profile,
        })
    }
}

/// [`CurrentUser`] plus an admin role check.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub UserProfile);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;
        if !current.profile.role.is_admin() {
            return Err(AuthError::AdminRequired.into());
        }
        Ok(Self(current.profile))
    }
}
