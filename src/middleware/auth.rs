//! Credential verification for protected routes.
//!
//! Three stages, each short-circuiting with its own 401:
//! 1. extract the bearer token from the `Authorization` header,
//! 2. verify signature and expiry (no storage involved),
//! 3. confirm the claimed identity still exists (tokens are stateless,
//!    so this lookup is the only way a deleted account is locked out).

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::db::users;
use crate::error::AppError;
use crate::state::AppState;
use crate::token;

/// The authenticated identity, attached to request extensions for handlers.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthenticated)?;

    let claims = token::verify(token, &state.config.jwt_secret)?;

    // The token was valid when issued; make sure the account still exists.
    if !users::exists(&state.db, &claims.sub).await? {
        return Err(AppError::IdentityRevoked);
    }

    request.extensions_mut().insert(AuthUser { id: claims.sub });
    Ok(next.run(request).await)
}
