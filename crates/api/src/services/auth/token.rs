//! JWT issuing and verification.
//!
//! Two token classes with distinct signing keys: short-lived access tokens
//! and long-lived refresh tokens. Sharing a key would let a stolen refresh
//! token pass the access guard, so the issuer refuses to be built that way
//! (enforced at config load).

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tamarind_core::UserId;
use thiserror::Error;

/// Access token lifetime: 15 minutes.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 15 * 60;

/// Refresh token lifetime: 7 days.
pub const REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Token verification and issuing errors.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token's signature and shape are fine but it has expired.
    #[error("token expired")]
    Expired,
    /// The token failed verification for any other reason.
    #[error("token invalid")]
    Invalid,
    /// Signing a new token failed.
    #[error("token encoding failed: {0}")]
    Encoding(jsonwebtoken::errors::Error),
}

/// JWT claims carried by both token classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id in hex.
    pub sub: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl Claims {
    fn new(user_id: UserId, ttl_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_hex(),
            iat: now,
            exp: now + ttl_secs,
        }
    }

    /// Parse the subject back into a [`UserId`].
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] if the subject is not a valid id.
    pub fn user_id(&self) -> Result<UserId, TokenError> {
        UserId::parse(&self.sub).map_err(|_| TokenError::Invalid)
    }
}

/// An access/refresh token pair issued at login or signup.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and verifies both token classes.
pub struct TokenIssuer {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(access_secret: &SecretString, refresh_secret: &SecretString) -> Self {
        let access = access_secret.expose_secret().as_bytes();
        let refresh = refresh_secret.expose_secret().as_bytes();
        Self {
            access_encoding: EncodingKey::from_secret(access),
            access_decoding: DecodingKey::from_secret(access),
            refresh_encoding: EncodingKey::from_secret(refresh),
            refresh_decoding: DecodingKey::from_secret(refresh),
        }
    }

    /// Issue a fresh access/refresh pair for a user.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Encoding`] if signing fails.
    pub fn issue_pair(&self, user_id: UserId) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(user_id)?,
            refresh_token: sign(
                &Claims::new(user_id, REFRESH_TOKEN_TTL_SECS),
                &self.refresh_encoding,
            )?,
        })
    }

    /// Issue a fresh access token (used by the refresh endpoint).
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Encoding`] if signing fails.
    pub fn issue_access_token(&self, user_id: UserId) -> Result<String, TokenError> {
        sign(
            &Claims::new(user_id, ACCESS_TOKEN_TTL_SECS),
            &self.access_encoding,
        )
    }

    /// Verify an access token.
    ///
    /// # Errors
    ///
    /// [`TokenError::Expired`] for lapsed tokens, [`TokenError::Invalid`]
    /// for anything else (bad signature, malformed, wrong class).
    pub fn decode_access(&self, token: &str) -> Result<Claims, TokenError> {
        verify(token, &self.access_decoding)
    }

    /// Verify a refresh token.
    ///
    /// # Errors
    ///
    /// Same mapping as [`Self::decode_access`].
    pub fn decode_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        verify(token, &self.refresh_decoding)
    }
}

fn sign(claims: &Claims, key: &EncodingKey) -> Result<String, TokenError> {
    encode(&Header::new(Algorithm::HS256), claims, key).map_err(TokenError::Encoding)
}

fn verify(token: &str, key: &DecodingKey) -> Result<Claims, TokenError> {
    let validation = Validation::new(Algorithm::HS256);
    match decode::<Claims>(token, key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => Err(TokenError::Expired),
        Err(_) => Err(TokenError::Invalid),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(
            &SecretString::from("a".repeat(32)),
            &SecretString::from("b".repeat(32)),
        )
    }

    #[test]
    fn test_round_trip_both_classes() {
        let issuer = issuer();
        let user_id = UserId::new();
        let pair = issuer.issue_pair(user_id).unwrap();

        let access = issuer.decode_access(&pair.access_token).unwrap();
        assert_eq!(access.user_id().unwrap(), user_id);
        assert_eq!(access.exp - access.iat, ACCESS_TOKEN_TTL_SECS);

        let refresh = issuer.decode_refresh(&pair.refresh_token).unwrap();
        assert_eq!(refresh.user_id().unwrap(), user_id);
        assert_eq!(refresh.exp - refresh.iat, REFRESH_TOKEN_TTL_SECS);
    }

    #[test]
    fn test_token_classes_do_not_cross_verify() {
        let issuer = issuer();
        let pair = issuer.issue_pair(UserId::new()).unwrap();

        assert!(matches!(
            issuer.decode_access(&pair.refresh_token),
            Err(TokenError::Invalid)
        ));
        assert!(matches!(
            issuer.decode_refresh(&pair.access_token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_garbage_is_invalid_not_expired() {
        assert!(matches!(
            issuer().decode_access("not.a.jwt"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_expired_token_is_distinguished() {
        let issuer = issuer();
        // Backdate past the default 60s validation leeway.
        let claims = Claims {
            sub: UserId::new().to_hex(),
            iat: Utc::now().timestamp() - 300,
            exp: Utc::now().timestamp() - 120,
        };
        let token = sign(&claims, &issuer.access_encoding).unwrap();

        assert!(matches!(
            issuer.decode_access(&token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_tampered_signature_is_invalid() {
        let issuer = issuer();
        let other = TokenIssuer::new(
            &SecretString::from("c".repeat(32)),
            &SecretString::from("d".repeat(32)),
        );
        let pair = other.issue_pair(UserId::new()).unwrap();

        assert!(matches!(
            issuer.decode_access(&pair.access_token),
            Err(TokenError::Invalid)
        ));
    }
}
