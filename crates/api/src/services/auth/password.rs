//! Password hashing with bcrypt.

use super::AuthError;

/// Hash a plaintext password.
///
/// # Errors
///
/// Returns [`AuthError::PasswordHash`] if bcrypt fails (bad cost factor or
/// input over bcrypt's 72-byte limit).
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(password, cost).map_err(|_| AuthError::PasswordHash)
}

/// Verify a plaintext password against a stored hash.
///
/// A malformed stored hash verifies as a mismatch rather than an error, so
/// a corrupted record degrades to a failed login instead of a 500.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // Minimum cost keeps the tests fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("hunter22", TEST_COST).unwrap();
        assert_ne!(hash, "hunter22");
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let a = hash_password("hunter22", TEST_COST).unwrap();
        let b = hash_password("hunter22", TEST_COST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        assert!(!verify_password("hunter22", "not-a-bcrypt-hash"));
    }
}
