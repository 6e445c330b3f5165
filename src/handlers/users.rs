//! Peer-to-peer connection requests.

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::{connections, users};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    target_user_id: Option<String>,
}

/// POST /api/users/connect
///
/// Creates a connection request from the acting user to `targetUserId`.
/// Rejected when the target is the requester themselves or when a record
/// already exists between the pair in either direction. The notification
/// email is dispatched from a detached task: a delivery failure is logged
/// there and never affects this response.
pub async fn connect(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<ConnectRequest>,
) -> AppResult<Json<Value>> {
    let recipient_id = req
        .target_user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("Target user ID is required".to_string()))?;

    if auth.id == recipient_id {
        return Err(AppError::SelfConnection);
    }

    if connections::exists_between(&state.db, &auth.id, &recipient_id).await? {
        return Err(AppError::DuplicateConnection);
    }

    let recipient_email = users::find_email(&state.db, &recipient_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Target user not found".to_string()))?;
    // Accounts that never filled in a profile have an empty name; fall
    // back to the sender's email so the notification reads sensibly
    let sender_name = match users::find_name(&state.db, &auth.id).await? {
        Some(name) if !name.is_empty() => name,
        _ => users::find_email(&state.db, &auth.id).await?.unwrap_or_default(),
    };

    connections::create(&state.db, &auth.id, &recipient_id).await?;

    // Fire and forget; the connection is created regardless of delivery
    let mailer = state.mailer.clone();
    tokio::spawn(async move {
        if let Err(e) = mailer
            .send_connection_request(&recipient_email, &sender_name)
            .await
        {
            tracing::error!("Failed to send connection email: {}", e);
        }
    });

    Ok(Json(json!({
        "success": true,
        "message": "Connection request sent"
    })))
}
