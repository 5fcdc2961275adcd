//! Password hashing and verification
//!
//! One-way credential hashing using bcrypt. Each call to [`hash_password`]
//! generates a fresh salt, so the same plaintext never produces the same
//! stored hash twice.

/// Cost factor for bcrypt hashing (12 is recommended for production)
const BCRYPT_COST: u32 = 12;

/// Password hashing error types
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingError(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// Hash a plaintext password using bcrypt with automatic salt generation
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| PasswordError::HashingError(e.to_string()))
}

/// Verify a candidate password against a bcrypt hash
///
/// Returns `Ok(false)` on a mismatch. A stored hash that bcrypt cannot parse
/// is an error, never a silent false positive.
pub fn verify_password(candidate: &str, hash: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(candidate, hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))
}
