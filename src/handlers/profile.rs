//! Profile updates for the authenticated user.

use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::db::users::{self, ProfileUpdate};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// PUT /api/profile
///
/// Body validated against the profile rule set; the handler only ever sees
/// trimmed/escaped values. Returns `{success, user}` with the refreshed
/// row. 404 if the account disappeared between the auth check and the
/// update.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(mut body): Json<Value>,
) -> AppResult<Json<Value>> {
    state
        .rules
        .profile
        .apply(&mut body)
        .map_err(AppError::ValidationFailed)?;
    let update: ProfileUpdate = serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("Malformed request body: {}", e)))?;

    match users::update_profile(&state.db, &auth.id, &update).await? {
        Some(user) => Ok(Json(json!({ "success": true, "user": user }))),
        None => Err(AppError::NotFound("User not found".to_string())),
    }
}
