use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Maximum password length in UTF-8 bytes, imposed by bcrypt.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// A registered user as stored in the database.
///
/// The bcrypt hash is carried for credential checks but never serialized
/// into API responses.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
}

/// Payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email address for the new account; doubles as the login handle.
    #[validate(email)]
    pub email: String,
    /// Password for the new account.
    /// Must not exceed 72 bytes when UTF-8 encoded (bcrypt's limit).
    #[validate(custom = "validate_password_length")]
    pub password: String,
}

/// Rejects passwords longer than bcrypt can consume.
///
/// The check is on encoded bytes, not characters: multi-byte UTF-8 input
/// hits the limit sooner than its character count suggests.
fn validate_password_length(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::new("password_too_long"));
    }
    Ok(())
}
