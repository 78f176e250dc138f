//! Auth route handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::Result;
use crate::middleware::auth::CurrentUser;
use crate::middleware::session;
use crate::models::UserProfile;
use crate::services::auth::AuthService;
use crate::state::AppState;

fn auth_service(state: &AppState) -> AuthService<'_> {
    AuthService::new(
        state.users(),
        state.sessions(),
        state.tokens(),
        state.config().bcrypt_cost,
    )
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/signup`
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<UserProfile>)> {
    let (profile, pair) = auth_service(&state)
        .signup(&body.name, &body.email, &body.password)
        .await?;

    tracing::info!(user_id = %profile.id, "Account created");
    let jar = session::attach_session_cookies(jar, &pair, state.secure_cookies());
    Ok((StatusCode::CREATED, jar, Json(profile)))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<UserProfile>)> {
    let (profile, pair) = auth_service(&state)
        .login(&body.email, &body.password)
        .await?;

    tracing::info!(user_id = %profile.id, "Logged in");
    let jar = session::attach_session_cookies(jar, &pair, state.secure_cookies());
    Ok((jar, Json(profile)))
}

/// `POST /api/auth/logout`
///
/// Always clears the cookies and reports success, even without a valid
/// session to revoke.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>)> {
    let refresh_token = session::refresh_token(&jar);
    auth_service(&state).logout(refresh_token.as_deref()).await?;

    crate::error::clear_sentry_user();
    let jar = session::clear_session_cookies(jar);
    Ok((jar, Json(json!({ "message": "Logged out successfully" }))))
}

/// `POST /api/auth/refresh`
///
/// Re-mints the access token from the refresh cookie. The refresh token is
/// not rotated.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>)> {
    let refresh_token = session::refresh_token(&jar);
    let access_token = auth_service(&state)
        .refresh(refresh_token.as_deref())
        .await?;

    let jar = session::attach_access_cookie(jar, access_token, state.secure_cookies());
    Ok((jar, Json(json!({ "message": "Token refreshed successfully" }))))
}

/// `GET /api/auth/profile`
pub async fn profile(user: CurrentUser) -> Json<UserProfile> {
    Json(user.profile)
}
