use sqlx::SqlitePool;

use crate::db::models::Connection;
use crate::error::{AppError, AppResult};

/// True when a connection record exists between the pair in either
/// direction. The unique pair index on the table enforces the same
/// invariant for writes that race past this check.
pub async fn exists_between(pool: &SqlitePool, a: &str, b: &str) -> AppResult<bool> {
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM connections
         WHERE (requester_id = ? AND recipient_id = ?)
            OR (requester_id = ? AND recipient_id = ?)",
    )
    .bind(a)
    .bind(b)
    .bind(b)
    .bind(a)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}

pub async fn create(
    pool: &SqlitePool,
    requester_id: &str,
    recipient_id: &str,
) -> AppResult<Connection> {
    let connection = Connection::new(requester_id.to_string(), recipient_id.to_string());

    sqlx::query(
        "INSERT INTO connections (id, requester_id, recipient_id, created_at)
         VALUES (?, ?, ?, ?)",
    )
    .bind(&connection.id)
    .bind(&connection.requester_id)
    .bind(&connection.recipient_id)
    .bind(&connection.created_at)
    .execute(pool)
    .await
    .map_err(|e| match e {
        // The unique pair index backstops exists_between: two requests
        // racing past the existence check still produce a single record
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::DuplicateConnection
        }
        other => AppError::Database(other),
    })?;

    Ok(connection)
}
