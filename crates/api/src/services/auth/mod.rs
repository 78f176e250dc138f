//! Authentication flows: signup, login, logout, refresh.
//!
//! The dual-token scheme in one place: a 15 minute access token proves
//! identity on guarded routes, a 7 day refresh token re-mints access tokens.
//! The refresh token is also held server side (one record per user), so a
//! presented refresh token must both verify and match the record.

mod error;
pub mod password;
pub mod session;
pub mod token;

pub use error::AuthError;
pub use session::SessionCache;
pub use token::{Claims, TokenError, TokenIssuer, TokenPair};

use tamarind_core::Email;

use crate::db::{RepositoryError, UserStore};
use crate::models::{UserProfile, validate_signup};

/// Authentication flows over the user store and session cache.
///
/// Borrowed from [`crate::state::AppState`] per request.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
    sessions: &'a SessionCache,
    tokens: &'a TokenIssuer,
    bcrypt_cost: u32,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub fn new(
        users: &'a dyn UserStore,
        sessions: &'a SessionCache,
        tokens: &'a TokenIssuer,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            sessions,
            tokens,
            bcrypt_cost,
        }
    }

    /// Create an account and start a session.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] for bad fields, [`AuthError::UserAlreadyExists`]
    /// for a taken email, otherwise storage/cache/signing failures.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(UserProfile, TokenPair), AuthError> {
        let email = validate_signup(name, email, password).map_err(AuthError::Validation)?;

        // Pre-check for a friendly error; the unique index backstops the
        // race where two signups pass this check concurrently.
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = password::hash_password(password, self.bcrypt_cost)?;
        let user = self
            .users
            .create(crate::models::NewUser {
                name: name.trim().to_string(),
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        let pair = self.start_session(&user).await?;
        Ok((UserProfile::from(&user), pair))
    }

    /// Verify credentials and start a session.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] for unknown email and wrong
    /// password alike, so responses do not reveal which accounts exist.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(UserProfile, TokenPair), AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::InvalidCredentials);
        };

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !password::verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self.start_session(&user).await?;
        Ok((UserProfile::from(&user), pair))
    }

    /// End the session identified by the presented refresh token.
    ///
    /// Idempotent: an absent or undecodable token still succeeds, since the
    /// caller clears the cookies either way.
    ///
    /// # Errors
    ///
    /// Returns an error only if revoking the session record fails.
    pub async fn logout(&self, refresh_token: Option<&str>) -> Result<(), AuthError> {
        let Some(token) = refresh_token else {
            return Ok(());
        };
        let Ok(claims) = self.tokens.decode_refresh(token) else {
            return Ok(());
        };
        let Ok(user_id) = claims.user_id() else {
            return Ok(());
        };
        self.sessions.revoke(user_id).await?;
        Ok(())
    }

    /// Re-mint an access token from a valid refresh token.
    ///
    /// The refresh token itself is not rotated; it stays valid until it
    /// expires, is overwritten by a new login, or is revoked by logout.
    ///
    /// # Errors
    ///
    /// [`AuthError::NoRefreshToken`] if no token was presented;
    /// [`AuthError::InvalidRefreshToken`] if it fails verification or does
    /// not match the session record.
    pub async fn refresh(&self, refresh_token: Option<&str>) -> Result<String, AuthError> {
        let token = refresh_token.ok_or(AuthError::NoRefreshToken)?;

        let claims = self
            .tokens
            .decode_refresh(token)
            .map_err(|_| AuthError::InvalidRefreshToken)?;
        let user_id = claims
            .user_id()
            .map_err(|_| AuthError::InvalidRefreshToken)?;

        let stored = self.sessions.lookup(user_id).await?;
        if stored.as_deref() != Some(token) {
            return Err(AuthError::InvalidRefreshToken);
        }

        Ok(self.tokens.issue_access_token(user_id)?)
    }

    async fn start_session(&self, user: &crate::models::User) -> Result<TokenPair, AuthError> {
        let pair = self.tokens.issue_pair(user.id)?;
        self.sessions.record(user.id, &pair.refresh_token).await?;
        Ok(pair)
    }
}
