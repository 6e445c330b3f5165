//! # Middleware Module
//!
//! Request-gating stages that run before route handlers:
//! - `auth`: bearer-token verification and identity existence check
//! - `rate_limit`: per-address fixed-window limiting for auth endpoints
//!
//! Either stage may short-circuit the request with a terminal response;
//! nothing downstream runs after a failing stage.

pub mod auth;
pub mod rate_limit;
