use chrono::Utc;
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::Listing;
use crate::error::AppResult;

/// Sanitized listing fields accepted by the create and update endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingInput {
    pub address: String,
    pub city: String,
    pub price: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub description: String,
    pub vibe_tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Active listings, newest first, optionally filtered by city substring
/// (case-insensitive).
pub async fn list(pool: &SqlitePool, city: Option<&str>) -> AppResult<Vec<Listing>> {
    let listings = match city {
        Some(city) => {
            sqlx::query_as::<_, Listing>(
                "SELECT * FROM listings WHERE is_active = 1 AND city LIKE ?
                 ORDER BY created_at DESC",
            )
            .bind(format!("%{}%", city))
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Listing>(
                "SELECT * FROM listings WHERE is_active = 1 ORDER BY created_at DESC",
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(listings)
}

pub async fn create(pool: &SqlitePool, user_id: &str, input: &ListingInput) -> AppResult<Listing> {
    let now = Utc::now().to_rfc3339();
    let listing = Listing {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        address: input.address.clone(),
        city: input.city.clone(),
        price: input.price,
        bedrooms: input.bedrooms,
        bathrooms: input.bathrooms,
        description: input.description.clone(),
        vibe_tags: Json(input.vibe_tags.clone()),
        images: Json(input.images.clone()),
        is_active: true,
        created_at: now.clone(),
        updated_at: now,
    };

    sqlx::query(
        "INSERT INTO listings (id, user_id, address, city, price, bedrooms, bathrooms,
                               description, vibe_tags, images, is_active, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&listing.id)
    .bind(&listing.user_id)
    .bind(&listing.address)
    .bind(&listing.city)
    .bind(listing.price)
    .bind(listing.bedrooms)
    .bind(listing.bathrooms)
    .bind(&listing.description)
    .bind(&listing.vibe_tags)
    .bind(&listing.images)
    .bind(listing.is_active)
    .bind(&listing.created_at)
    .bind(&listing.updated_at)
    .execute(pool)
    .await?;

    Ok(listing)
}

/// Owner reference for the ownership authorizer. None when no such listing.
pub async fn find_owner(pool: &SqlitePool, listing_id: &str) -> AppResult<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT user_id FROM listings WHERE id = ?")
        .bind(listing_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(user_id,)| user_id))
}

/// Overwrite the mutable fields of a listing. The caller must have already
/// passed the ownership check; `user_id` is never touched here.
pub async fn update(
    pool: &SqlitePool,
    listing_id: &str,
    input: &ListingInput,
) -> AppResult<Option<Listing>> {
    let listing = sqlx::query_as::<_, Listing>(
        "UPDATE listings
         SET address = ?, city = ?, price = ?, bedrooms = ?, bathrooms = ?,
             description = ?, vibe_tags = ?, images = ?, updated_at = ?
         WHERE id = ?
         RETURNING *",
    )
    .bind(&input.address)
    .bind(&input.city)
    .bind(input.price)
    .bind(input.bedrooms)
    .bind(input.bathrooms)
    .bind(&input.description)
    .bind(Json(&input.vibe_tags))
    .bind(Json(&input.images))
    .bind(Utc::now().to_rfc3339())
    .bind(listing_id)
    .fetch_optional(pool)
    .await?;

    Ok(listing)
}

pub async fn delete(pool: &SqlitePool, listing_id: &str) -> AppResult<()> {
    sqlx::query("DELETE FROM listings WHERE id = ?")
        .bind(listing_id)
        .execute(pool)
        .await?;

    Ok(())
}
