//! Housing listings: public browsing, plus owner-gated mutations.
//!
//! Update and delete each re-run the ownership check through the shared
//! authorizer; a passing check is never carried over from an earlier
//! request in the same session.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::listings::{self, ListingInput};
use crate::db::models::Listing;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::ownership;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListingsQuery {
    city: Option<String>,
}

/// GET /api/listings
///
/// Public. Active listings, newest first; `?city=` filters by
/// case-insensitive substring.
pub async fn list_listings(
    State(state): State<AppState>,
    Query(query): Query<ListingsQuery>,
) -> AppResult<Json<Vec<Listing>>> {
    let listings = listings::list(&state.db, query.city.as_deref()).await?;
    Ok(Json(listings))
}

/// POST /api/listings
///
/// Authenticated. Body validated against the listing rule set; the acting
/// user becomes the immutable owner reference. 201 with the created row.
pub async fn create_listing(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(mut body): Json<Value>,
) -> AppResult<(StatusCode, Json<Listing>)> {
    state
        .rules
        .listing
        .apply(&mut body)
        .map_err(AppError::ValidationFailed)?;
    let input: ListingInput = serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("Malformed request body: {}", e)))?;

    let listing = listings::create(&state.db, &auth.id, &input).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// PUT /api/listings/{id}
///
/// Authenticated + owner only: 404 when the listing is missing, 403 when
/// it belongs to someone else, and no row is touched in either case.
pub async fn update_listing(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(listing_id): Path<String>,
    Json(mut body): Json<Value>,
) -> AppResult<Json<Listing>> {
    state
        .rules
        .listing
        .apply(&mut body)
        .map_err(AppError::ValidationFailed)?;
    let input: ListingInput = serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("Malformed request body: {}", e)))?;

    let owner = listings::find_owner(&state.db, &listing_id).await?;
    ownership::authorize(owner, &auth.id, "Listing")?;

    match listings::update(&state.db, &listing_id, &input).await? {
        Some(listing) => Ok(Json(listing)),
        None => Err(AppError::NotFound("Listing not found".to_string())),
    }
}

/// DELETE /api/listings/{id}
///
/// Same ownership gate as update. Deleting an already-deleted listing
/// yields 404, so repeated deletes have no further side effect.
pub async fn delete_listing(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(listing_id): Path<String>,
) -> AppResult<Json<Value>> {
    let owner = listings::find_owner(&state.db, &listing_id).await?;
    ownership::authorize(owner, &auth.id, "Listing")?;

    listings::delete(&state.db, &listing_id).await?;

    Ok(Json(json!({
        "success": true,
        "msg": "Listing deleted successfully"
    })))
}
