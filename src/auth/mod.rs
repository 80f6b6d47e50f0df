pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};

// Re-export necessary items
pub use extractors::CurrentUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

/// Represents the payload for a user login request.
///
/// Login is form-encoded in the OAuth2 password-flow shape: the `username`
/// field carries the user's email address.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// The user's email address.
    pub username: String,
    /// The user's password.
    pub password: String,
}

/// Response structure after a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The JWT access token for subsequent authenticated requests.
    pub access_token: String,
    /// The token scheme; always `"bearer"`.
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
