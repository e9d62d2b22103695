//! Client library for the CareerLaunch career-fair platform.
//!
//! - [`backend`]: REST client, response envelope, domain types, listing caches
//! - [`cache`]: TTL cache slots with injectable clock and transport
//! - [`search`]: suggestions and results over cached listings
//! - [`session`]: persisted bearer token

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod search;
pub mod session;

pub use error::{ApiError, Result};
