//! JWT Token Generation and Validation
//!
//! HS256 access tokens signed with the shared `JWT_SECRET`. Token issuance
//! (login/refresh flows) lives in the identity service; this server only
//! needs to mint tokens for tests and validate them on requests.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{AuthError, AuthResult};

/// JWT claims for access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID as UUID string).
    pub sub: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at (Unix timestamp).
    pub iat: i64,
}

/// Generate an access token for the given user.
pub fn generate_access_token(
    user_id: Uuid,
    secret: &str,
    expiry_seconds: i64,
) -> AuthResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + Duration::seconds(expiry_seconds)).timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate and decode an access token.
///
/// Returns an error if the token is invalid or expired.
pub fn validate_access_token(token: &str, secret: &str) -> AuthResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret";

    #[test]
    fn test_generate_and_validate_access_token() {
        let user_id = Uuid::now_v7();

        let token = generate_access_token(user_id, TEST_SECRET, 900).unwrap();
        let claims = validate_access_token(&token, TEST_SECRET).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
    }

    #[test]
    fn test_wrong_secret_fails() {
        let user_id = Uuid::now_v7();

        let token = generate_access_token(user_id, TEST_SECRET, 900).unwrap();
        let result = validate_access_token(&token, "other-secret");

        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token_fails() {
        let user_id = Uuid::now_v7();

        let token = generate_access_token(user_id, TEST_SECRET, -60).unwrap();
        let result = validate_access_token(&token, TEST_SECRET);

        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_garbage_token_fails() {
        let result = validate_access_token("not-a-jwt", TEST_SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
