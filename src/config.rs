//! # Configuration Management
//!
//! Loads configuration from environment variables following the 12-factor
//! methodology, with sensible defaults for local development.
//!
//! ## Environment Variables
//! - `HOST` / `PORT`: server bind address (default: 127.0.0.1:5000)
//! - `DATABASE_URL`: SQLite connection string
//! - `JWT_SECRET`: shared secret for signing bearer tokens
//! - `TOKEN_TTL_HOURS`: bearer token lifetime (default: 24)
//! - `FRONTEND_URL`: allowed CORS origin
//! - `SMTP_HOST`, `GMAIL_USER`, `GMAIL_APP_PASS`: outbound mail settings
//! - `AUTH_RATE_WINDOW_MINUTES` / `AUTH_RATE_MAX`: auth rate limit
//!   (default: 20 requests per 15 minutes per address)

use anyhow::Result;
use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host/IP address to bind to
    pub host: String,

    /// Server port number
    pub port: u16,

    /// SQLite database connection URL
    /// Format: "sqlite:rentscout.db?mode=rwc" (read, write, create)
    pub database_url: String,

    /// Shared secret used to sign and verify bearer tokens.
    /// Must be identical across instances serving the same clients.
    pub jwt_secret: String,

    /// Bearer token lifetime in hours
    pub token_ttl_hours: i64,

    /// Origin allowed by CORS (the frontend)
    pub frontend_url: String,

    /// SMTP relay host for outbound notification mail
    pub smtp_host: String,

    /// SMTP username; also used as the From address
    pub smtp_user: String,

    /// SMTP app password
    pub smtp_pass: String,

    /// Rolling window for the auth-endpoint rate limiter, in minutes
    pub auth_rate_window_minutes: u64,

    /// Maximum auth requests per address within the window
    pub auth_rate_max: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file first if one exists (dotenvy doesn't error when
    /// the file is missing), then falls back to defaults for anything unset.
    ///
    /// # Errors
    /// Returns an error if a numeric variable fails to parse.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:rentscout.db?mode=rwc".to_string()),
            // Dev-only fallback; production deployments set JWT_SECRET
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "insecure-dev-secret".to_string()),
            token_ttl_hours: env::var("TOKEN_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_user: env::var("GMAIL_USER").unwrap_or_default(),
            smtp_pass: env::var("GMAIL_APP_PASS").unwrap_or_default(),
            auth_rate_window_minutes: env::var("AUTH_RATE_WINDOW_MINUTES")
                .unwrap_or_else(|_| "15".to_string())
                .parse()?,
            auth_rate_max: env::var("AUTH_RATE_MAX")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,
        })
    }

    /// Socket address string for `tokio::net::TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
