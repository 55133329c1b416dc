//! In-memory TTL cache
//!
//! Used to memoize channel metadata lookups so repeated links into the
//! same channel do not hit the Discord API on every message.
//!
//! Key features:
//! - One TTL for every entry, fixed at construction
//! - Expired entries read as a miss and are dropped on access
//! - Janitor task sweeps entries nobody reads again
//! - Safe for concurrent use from many event handlers

mod ttl;

pub use ttl::{CacheError, CacheStats, TtlCache, spawn_janitor};
