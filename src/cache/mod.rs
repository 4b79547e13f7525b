//! Cache keys, TTLs and freshness decisions
//!
//! Records themselves live in the [`crate::store::LocalStore`]; this module
//! decides when they are fresh enough to serve without a network round-trip.

pub mod key;
pub mod staleness;

use std::time::Duration;

/// Cache TTL configuration per data type
pub struct CacheTtl;

impl CacheTtl {
    // Forum activity - new posts appear frequently
    pub const POSTS: Duration = Duration::from_secs(5 * 60); // 5 min
    pub const WORKOUT: Duration = Duration::from_secs(5 * 60); // 5 min

    // Rosters change as members sign up and cancel
    pub const ROSTERS: Duration = Duration::from_secs(2 * 60); // 2 min

    // Race calendar is fairly stable
    pub const RACES: Duration = Duration::from_secs(10 * 60); // 10 min
}

pub use key::{CacheKey, ResourceKind};
#[cfg(test)]
pub use staleness::ManualClock;
pub use staleness::{Clock, StalenessPolicy, SystemClock};
