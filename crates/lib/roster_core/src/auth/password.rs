//! Password hashing via bcrypt.
//!
//! The `*_blocking` variants run bcrypt on tokio's blocking pool.

use super::{AuthError, UserCreationError};

/// Default bcrypt cost factor.
pub const BCRYPT_COST: u32 = 10;

/// Hash a password with bcrypt at the given cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, UserCreationError> {
    bcrypt::hash(password, cost).map_err(|e| UserCreationError::Hashing(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Internal(format!("bcrypt verify: {e}")))
}

/// [`hash_password`] on the blocking thread pool.
pub async fn hash_password_blocking(
    password: String,
    cost: u32,
) -> Result<String, UserCreationError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| UserCreationError::Hashing(format!("hash task: {e}")))?
}

/// [`verify_password`] on the blocking thread pool.
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AuthError::Internal(format!("verify task: {e}")))?
}
