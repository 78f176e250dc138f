//! Session cookie management.
//!
//! Both tokens travel in HttpOnly, SameSite=Strict cookies so scripts never
//! see them and cross-site requests never send them. The Secure flag is on
//! in production only, so local HTTP development still works.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::services::auth::TokenPair;

/// Cookie carrying the access token.
pub const ACCESS_COOKIE_NAME: &str = "accessToken";

/// Cookie carrying the refresh token.
pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

/// Access cookie lifetime: 15 minutes, matching the token.
pub const ACCESS_COOKIE_MAX_AGE_SECS: i64 = 15 * 60;

/// Refresh cookie lifetime: 7 days, matching the token.
pub const REFRESH_COOKIE_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

fn session_cookie(
    name: &'static str,
    value: String,
    max_age_secs: i64,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

/// Add both session cookies for a freshly issued token pair.
#[must_use]
pub fn attach_session_cookies(jar: CookieJar, pair: &TokenPair, secure: bool) -> CookieJar {
    jar.add(session_cookie(
        ACCESS_COOKIE_NAME,
        pair.access_token.clone(),
        ACCESS_COOKIE_MAX_AGE_SECS,
        secure,
    ))
    .add(session_cookie(
        REFRESH_COOKIE_NAME,
        pair.refresh_token.clone(),
        REFRESH_COOKIE_MAX_AGE_SECS,
        secure,
    ))
}

/// Replace only the access cookie (used by the refresh endpoint).
#[must_use]
pub fn attach_access_cookie(jar: CookieJar, access_token: String, secure: bool) -> CookieJar {
    jar.add(session_cookie(
        ACCESS_COOKIE_NAME,
        access_token,
        ACCESS_COOKIE_MAX_AGE_SECS,
        secure,
    ))
}

/// Expire both session cookies.
///
/// Removal cookies must match the path they were set with.
#[must_use]
pub fn clear_session_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ACCESS_COOKIE_NAME).path("/").build())
        .remove(Cookie::build(REFRESH_COOKIE_NAME).path("/").build())
}

/// The access token presented by the client, if any.
#[must_use]
pub fn access_token(jar: &CookieJar) -> Option<String> {
    jar.get(ACCESS_COOKIE_NAME).map(|c| c.value().to_string())
}

/// The refresh token presented by the client, if any.
#[must_use]
pub fn refresh_token(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_COOKIE_NAME).map(|c| c.value().to_string())
}
