use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AppError;
use crate::models::user::MAX_PASSWORD_BYTES;

/// Hashes a password with bcrypt, using a fresh per-call salt.
///
/// bcrypt silently truncates input beyond 72 bytes, so oversized passwords
/// are rejected up front instead of being hashed with dropped bytes.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::ValidationError(
            "Password cannot be longer than 72 bytes".into(),
        ));
    }
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// Checks a plaintext password against a stored bcrypt hash.
///
/// Returns `Ok(false)` on a simple mismatch; errors only when the stored
/// hash itself is malformed.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}
