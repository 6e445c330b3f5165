//! # Error Handling
//!
//! Application-wide error taxonomy and its mapping onto HTTP responses.
//!
//! Every request stage (rate limiting, credential verification, identity
//! existence, validation, ownership) fails fast by returning one of these
//! variants; the `IntoResponse` impl is the single place where error
//! categories become status codes and wire bodies.
//!
//! Wire format: `{ "msg": "..." }` for everything except validation
//! failures, which return the aggregated list as `{ "errors": [...] }`.
//! Internal failures (database, hashing) are logged with their detail and
//! surface to clients as a generic 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::validation::Violation;

/// Application-wide error type.
///
/// The first three variants are deliberately distinct: a missing token, a
/// token that fails cryptographic verification, and a valid token whose
/// subject no longer exists are different conditions even though all three
/// map to 401.
#[derive(Error, Debug)]
pub enum AppError {
    /// No bearer token on a protected route (401)
    #[error("No token, authorization denied")]
    Unauthenticated,

    /// Token present but malformed, expired, or badly signed (401)
    #[error("Token is not valid")]
    InvalidToken,

    /// Token verified but the identity was deleted after issuance (401)
    #[error("User belonging to this token no longer exists.")]
    IdentityRevoked,

    /// One or more field constraints violated (400, full list returned)
    #[error("validation failed")]
    ValidationFailed(Vec<Violation>),

    /// Resource absent (404)
    #[error("{0}")]
    NotFound(String),

    /// Resource exists but is owned by someone else (403)
    #[error("{0}")]
    Forbidden(String),

    /// Connection request addressed to the requester themselves (400)
    #[error("You cannot connect with yourself")]
    SelfConnection,

    /// A connection already exists between this pair, in either direction (400)
    #[error("A connection or request already exists with this user.")]
    DuplicateConnection,

    /// Too many authentication requests from one address (429)
    #[error("Too many requests from this IP, please try again after 15 minutes")]
    RateLimited,

    /// Client sent data we can't act on (400)
    #[error("{0}")]
    BadRequest(String),

    /// SQLx errors, surfaced to clients as a generic 500
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing/verification failure
    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    /// Unexpected internal failures (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Unauthenticated | AppError::InvalidToken | AppError::IdentityRevoked => {
                (StatusCode::UNAUTHORIZED, json!({ "msg": self.to_string() }))
            }
            AppError::ValidationFailed(violations) => {
                (StatusCode::BAD_REQUEST, json!({ "errors": violations }))
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, json!({ "msg": self.to_string() })),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, json!({ "msg": self.to_string() })),
            AppError::SelfConnection | AppError::DuplicateConnection | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, json!({ "msg": self.to_string() }))
            }
            AppError::RateLimited => {
                (StatusCode::TOO_MANY_REQUESTS, json!({ "msg": self.to_string() }))
            }
            AppError::Database(e) => {
                // Log the detail, never leak it to the client
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "msg": "Server Error" }),
                )
            }
            AppError::Bcrypt(e) => {
                tracing::error!("Bcrypt error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "msg": "Server Error" }),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "msg": "Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Convenience alias for handler and query results.
pub type AppResult<T> = Result<T, AppError>;
