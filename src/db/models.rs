//! # Database Models
//!
//! Row structs for the three tables, mapped with `sqlx::FromRow`.
//!
//! Timestamps are RFC3339 strings (SQLite stores them as text) and
//! array-valued columns use `sqlx::types::Json`, which serializes
//! transparently as the inner value in API responses.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use uuid::Uuid;

/// A user account plus the roommate-matching profile fields.
///
/// `past_stays` and `media_posts` are opaque JSON blobs: stored and
/// returned verbatim, never validated field-by-field.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub age: Option<i64>,
    pub occupation: String,
    pub status: String,
    pub bio: String,
    pub likes: Json<Vec<String>>,
    pub dislikes: Json<Vec<String>>,
    pub rating: Option<f64>,
    pub past_stays: Json<Value>,
    pub media_posts: Json<Value>,
    pub is_premium: bool,
    pub followers: i64,
    pub following: i64,
    pub like_count: i64,
    #[serde(skip_serializing)]
    pub created_at: String,
    #[serde(skip_serializing)]
    pub updated_at: String,
}

impl User {
    /// Fresh account with an empty profile; the profile is filled in later
    /// via `PUT /api/profile`.
    pub fn new(email: String, password_hash: String) -> Self {
        let now = Utc::now().to_rfc3339();

        Self {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            name: String::new(),
            age: None,
            occupation: String::new(),
            status: "seeking_roommate".to_string(),
            bio: String::new(),
            likes: Json(Vec::new()),
            dislikes: Json(Vec::new()),
            rating: None,
            past_stays: Json(Value::Array(Vec::new())),
            media_posts: Json(Value::Array(Vec::new())),
            is_premium: false,
            followers: 0,
            following: 0,
            like_count: 0,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// A housing listing. `user_id` is the ownership reference: set at
/// creation, immutable thereafter, and checked on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub user_id: String,
    pub address: String,
    pub city: String,
    pub price: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub description: String,
    pub vibe_tags: Json<Vec<String>>,
    pub images: Json<Vec<String>>,
    pub is_active: bool,
    pub created_at: String,
    #[serde(skip_serializing)]
    pub updated_at: String,
}

/// A directed connection-request record. At most one record may exist
/// between any unordered pair of users; that invariant is enforced by the
/// existence query in `db::connections`, not by this struct.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Connection {
    pub id: String,
    pub requester_id: String,
    pub recipient_id: String,
    pub created_at: String,
}

impl Connection {
    pub fn new(requester_id: String, recipient_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            requester_id,
            recipient_id,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}
