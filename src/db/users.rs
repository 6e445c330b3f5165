use serde::Deserialize;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::db::models::User;
use crate::error::AppResult;

/// Sanitized profile fields accepted by `PUT /api/profile`.
#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub age: i64,
    pub occupation: String,
    pub status: String,
    pub bio: String,
    pub likes: Vec<String>,
    pub dislikes: Vec<String>,
}

pub async fn create(pool: &SqlitePool, email: &str, password_hash: &str) -> AppResult<User> {
    let user = User::new(email.to_string(), password_hash.to_string());

    sqlx::query(
        "INSERT INTO users (id, email, password_hash, name, age, occupation, status, bio,
                            likes, dislikes, rating, past_stays, media_posts, is_premium,
                            followers, following, like_count, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&user.id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.name)
    .bind(user.age)
    .bind(&user.occupation)
    .bind(&user.status)
    .bind(&user.bio)
    .bind(&user.likes)
    .bind(&user.dislikes)
    .bind(user.rating)
    .bind(&user.past_stays)
    .bind(&user.media_posts)
    .bind(user.is_premium)
    .bind(user.followers)
    .bind(user.following)
    .bind(user.like_count)
    .bind(&user.created_at)
    .bind(&user.updated_at)
    .execute(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

/// Existence check used by the auth middleware on every protected request.
pub async fn exists(pool: &SqlitePool, user_id: &str) -> AppResult<bool> {
    let row: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

pub async fn find_name(pool: &SqlitePool, user_id: &str) -> AppResult<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT name FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(name,)| name))
}

pub async fn find_email(pool: &SqlitePool, user_id: &str) -> AppResult<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT email FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(email,)| email))
}

/// Apply a profile update, returning the refreshed row (None if the user
/// vanished between the auth check and the update).
pub async fn update_profile(
    pool: &SqlitePool,
    user_id: &str,
    update: &ProfileUpdate,
) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE users
         SET name = ?, age = ?, occupation = ?, status = ?, bio = ?,
             likes = ?, dislikes = ?, updated_at = ?
         WHERE id = ?
         RETURNING *",
    )
    .bind(&update.name)
    .bind(update.age)
    .bind(&update.occupation)
    .bind(&update.status)
    .bind(&update.bio)
    .bind(Json(&update.likes))
    .bind(Json(&update.dislikes))
    .bind(chrono::Utc::now().to_rfc3339())
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
