//! # HTTP Request Handlers
//!
//! One submodule per route group:
//! - `health`: liveness probe
//! - `auth`: register and login (token issuance)
//! - `profile`: profile updates for the authenticated user
//! - `users`: peer-to-peer connection requests
//! - `listings`: public browsing plus owner-gated mutations
//!
//! Handlers receive sanitized input only: bodies pass through the
//! validation engine before being deserialized into typed structs, and
//! protected routes read the acting identity from the `AuthUser`
//! extension installed by the auth middleware.

pub mod auth;
pub mod health;
pub mod listings;
pub mod profile;
pub mod users;
