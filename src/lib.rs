//! # RentScout API Server
//!
//! REST backend for the RentScout roommate/rental-matching application:
//! token-based authentication, user profiles, housing listings, and
//! peer-to-peer connection requests with best-effort email notification.
//!
//! Request pipeline for a protected mutation:
//! rate limiter (auth routes only) → credential verifier → identity
//! existence check → request shape validator → handler, which may invoke
//! the ownership authorizer before touching storage. Every stage can
//! short-circuit with a terminal response.
//!
//! The router lives here rather than in `main` so integration tests can
//! drive the full pipeline in-process.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod middleware;
pub mod ownership;
pub mod state;
pub mod token;
pub mod validation;

use axum::{
    http::HeaderValue,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::auth::{login, register};
use crate::handlers::health::health_check;
use crate::handlers::listings::{create_listing, delete_listing, list_listings, update_listing};
use crate::handlers::profile::update_profile;
use crate::handlers::users::connect;
use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    // Restrict CORS to the configured frontend origin; fall back to Any
    // when the origin doesn't parse (e.g. unset in development).
    let cors = match state.config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    // Authentication endpoints sit behind the per-address rate limiter
    let auth_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::limit_auth_requests,
        ));

    // Everything here requires a valid bearer token
    let protected_routes = Router::new()
        .route("/api/profile", put(update_profile))
        .route("/api/users/connect", post(connect))
        .route("/api/listings", post(create_listing))
        .route(
            "/api/listings/{id}",
            put(update_listing).delete(delete_listing),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .route("/", get(health_check))
        .route("/api/listings", get(list_listings))
        .merge(auth_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
