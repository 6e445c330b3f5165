//! # Database Module
//!
//! Query modules, one per table:
//! - `models`: row structs (`User`, `Listing`, `Connection`)
//! - `users`: accounts and profile updates
//! - `listings`: listing CRUD and owner lookups
//! - `connections`: pairwise connection records

pub mod connections;
pub mod listings;
pub mod models;
pub mod users;
