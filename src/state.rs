//! # Application State
//!
//! Shared state handed to every request handler. Axum clones the state per
//! request, which is cheap: the pool clones a handle, everything else is
//! behind an `Arc`.
//!
//! The validation rule sets live here: constructed once at startup,
//! immutable, and shared read-only across all requests via `Arc`.

use std::sync::Arc;

use anyhow::Result;
use sqlx::sqlite::SqlitePool;

use crate::config::Config;
use crate::mailer::Mailer;
use crate::middleware::rate_limit::{RateLimitConfig, RateLimiter};
use crate::validation::RuleSets;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, shared by all in-flight requests
    pub db: SqlitePool,

    /// Configuration (JWT secret, TTL) needed at request time
    pub config: Arc<Config>,

    /// Outbound mail client for connection notifications
    pub mailer: Mailer,

    /// Per-endpoint validation rule sets
    pub rules: Arc<RuleSets>,

    /// Fixed-window limiter guarding the auth endpoints
    pub auth_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Connect the pool, run embedded migrations, and build the shared
    /// collaborators.
    ///
    /// # Errors
    /// Fails if the database is unreachable, migrations fail, or the SMTP
    /// transport cannot be constructed from the configuration.
    pub async fn new(config: Config) -> Result<Self> {
        let db = SqlitePool::connect(&config.database_url).await?;
        sqlx::migrate!("./migrations").run(&db).await?;

        let mailer = Mailer::new(&config)?;

        let auth_limiter = Arc::new(RateLimiter::new(RateLimitConfig {
            max_requests: config.auth_rate_max,
            window: std::time::Duration::from_secs(config.auth_rate_window_minutes * 60),
        }));

        Ok(AppState {
            db,
            config: Arc::new(config),
            mailer,
            rules: Arc::new(RuleSets::default()),
            auth_limiter,
        })
    }
}
