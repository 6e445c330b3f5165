//! # Bearer Tokens
//!
//! Signing and verification of the stateless credential tokens issued at
//! login. Tokens are HS256 JWTs carrying the user id as `sub` plus the
//! standard `iat`/`exp` timestamps; they are never persisted server-side,
//! which is why the auth middleware follows verification with a database
//! existence check.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Claims embedded in every issued token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id the token was issued to
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Sign a new token for `user_id`, valid for `ttl_hours`.
pub fn sign(user_id: &str, secret: &str, ttl_hours: i64) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}

/// Verify signature and expiry, returning the claims on success.
///
/// Any failure (malformed token, bad signature, expired) collapses to
/// `InvalidToken`; callers never learn which check failed.
pub fn verify(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_sign_and_verify_round_trip() {
        let token = sign("user-123", SECRET, 1).unwrap();
        let claims = verify(&token, SECRET).unwrap();

        assert_eq!(claims.sub, "user-123");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign("user-123", SECRET, 1).unwrap();
        let err = verify(&token, "other-secret").unwrap_err();

        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let err = verify("not.a.jwt", SECRET).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Negative TTL puts the expiry in the past
        let token = sign("user-123", SECRET, -1).unwrap();
        let err = verify(&token, SECRET).unwrap_err();

        assert!(matches!(err, AppError::InvalidToken));
    }
}
