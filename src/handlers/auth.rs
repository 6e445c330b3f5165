//! Registration and login: the two endpoints that issue bearer tokens.
//!
//! Both sit behind the auth rate limiter and validate their payloads
//! before touching storage. Passwords are bcrypt-hashed; login failures
//! are deliberately indistinguishable between unknown email and wrong
//! password.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::users;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::token;

#[derive(Debug, Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

/// POST /api/auth/register
///
/// Body: `{email, password}`. Duplicate email → 400. On success, 201 with
/// `{token}` so the client is logged in immediately.
pub async fn register(
    State(state): State<AppState>,
    Json(mut body): Json<Value>,
) -> AppResult<(StatusCode, Json<Value>)> {
    state
        .rules
        .register
        .apply(&mut body)
        .map_err(AppError::ValidationFailed)?;
    let req: Credentials = serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("Malformed request body: {}", e)))?;

    if users::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(AppError::BadRequest("User already exists".to_string()));
    }

    let hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)?;
    let user = users::create(&state.db, &req.email, &hash).await?;

    let token = token::sign(
        &user.id,
        &state.config.jwt_secret,
        state.config.token_ttl_hours,
    )?;

    Ok((StatusCode::CREATED, Json(json!({ "token": token }))))
}

/// POST /api/auth/login
///
/// Body: `{email, password}`. Returns `{token}`; any credential failure is
/// a 400 "Invalid credentials".
pub async fn login(
    State(state): State<AppState>,
    Json(mut body): Json<Value>,
) -> AppResult<Json<Value>> {
    state
        .rules
        .login
        .apply(&mut body)
        .map_err(AppError::ValidationFailed)?;
    let req: Credentials = serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("Malformed request body: {}", e)))?;

    let user = users::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid credentials".to_string()))?;

    if !bcrypt::verify(&req.password, &user.password_hash)? {
        return Err(AppError::BadRequest("Invalid credentials".to_string()));
    }

    let token = token::sign(
        &user.id,
        &state.config.jwt_secret,
        state.config.token_ttl_hours,
    )?;

    Ok(Json(json!({ "token": token })))
}
