//! CareerLaunch REST API: client, wire types, domain types and listing caches.

pub mod api_types;
pub mod cache;
pub mod cached_client;
pub mod client;
pub mod types;

pub use cache::CacheKey;
pub use cached_client::ListingCaches;
pub use client::CareerLaunchClient;
