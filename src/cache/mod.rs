//! Client-side TTL cache for listing endpoints.
//!
//! Each entity list lives in its own `TtlCache` slot:
//! - valid while data is present and younger than `max_age`
//! - refetched through an injected `Transport` when invalid
//! - stamped even when the fetch fails, serving the entity's fallback data
//! - cleared explicitly with `invalidate`

mod clock;
mod layer;
mod record;
mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use clock::{Clock, ManualClock, SystemClock};
pub use layer::{default_max_age, TtlCache};
pub use record::CacheRecord;
pub use traits::{Listing, Transport};
