//! Password hashing and verification using Argon2id.
//!
//! Hashes are PHC-formatted strings carrying their own salt and parameters.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),
    #[error("invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hash a plaintext password. Called exactly once, when a plaintext secret
/// is first persisted; the profile-update path carries no password field,
/// so stored hashes are never re-hashed.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Verify a candidate password against a stored hash. Uses the hashing
/// primitive's own comparison, never raw string equality.
pub fn verify_password(candidate: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;
    Ok(Argon2::default().verify_password(candidate.as_bytes(), &parsed).is_ok())
}
