use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Fixed lifetime of issued tokens.
const TOKEN_TTL_HOURS: i64 = 24;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's unique identifier.
    pub sub: i32,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: usize,
}

/// Issues and verifies signed, expiring access tokens.
///
/// Constructed once at startup from the configured signing secret and shared
/// as read-only application data, so issuance and verification are guaranteed
/// to use the same key within a process lifetime.
///
/// Verification is stateless: only the signature and expiry are consulted,
/// never the database. A token for a since-deleted user therefore still
/// passes here; the authentication middleware catches that case when the
/// subject lookup comes back empty.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issues a JWT bound to the given user id, expiring in 24 hours.
    pub fn issue(&self, user_id: i32) -> Result<String, AppError> {
        let expiration = chrono::Utc::now()
            .checked_add_signed(chrono::Duration::hours(TOKEN_TTL_HOURS))
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims = Claims {
            sub: user_id,
            exp: expiration,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a JWT and returns the embedded subject (user id).
    ///
    /// Fails with `AppError::Unauthorized` if the token is malformed, its
    /// signature is invalid, or it has expired.
    pub fn verify(&self, token: &str) -> Result<i32, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims.sub)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_issuance_and_verification() {
        let tokens = TokenService::new("test_secret_for_issue_verify");
        let user_id = 1;
        let token = tokens.issue(user_id).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_token_expiration() {
        let secret = "test_secret_for_expiration";
        let tokens = TokenService::new(secret);

        let expiration = chrono::Utc::now()
            .checked_sub_signed(chrono::Duration::hours(2))
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims_expired = Claims {
            sub: 2,
            exp: expiration,
        };
        let expired_token = encode(
            &Header::default(),
            &claims_expired,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        match tokens.verify(&expired_token) {
            Err(AppError::Unauthorized(msg)) => {
                assert!(msg.contains("Invalid token: ExpiredSignature"));
            }
            Ok(_) => panic!("Token should have been invalid due to expiration"),
            Err(e) => panic!("Unexpected error type for expired token: {:?}", e),
        }
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let tokens = TokenService::new("a_completely_different_secret");
        let other = TokenService::new("the_original_secret");
        let foreign_token = other.issue(3).unwrap();

        match tokens.verify(&foreign_token) {
            Err(AppError::Unauthorized(msg)) => {
                assert!(msg.contains("Invalid token: InvalidSignature"));
            }
            Ok(_) => panic!("Token should have been invalid due to signature mismatch"),
            Err(e) => panic!("Unexpected error type for invalid signature: {:?}", e),
        }
    }

    #[test]
    fn test_tampered_token_rejected() {
        let tokens = TokenService::new("test_secret_for_tampering");
        let token = tokens.issue(4).unwrap();

        // Flip one character in the signature segment.
        let mut tampered: Vec<char> = token.chars().collect();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == 'A' { 'B' } else { 'A' };
        let tampered: String = tampered.into_iter().collect();

        assert!(tokens.verify(&tampered).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let tokens = TokenService::new("test_secret_for_garbage");
        assert!(tokens.verify("not-a-jwt").is_err());
        assert!(tokens.verify("").is_err());
    }
}
