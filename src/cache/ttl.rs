use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Errors returned by cache lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The key was never set or its entry has expired
    #[error("cache entry not found")]
    NotFound,
}

/// Cache statistics for monitoring
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that returned a live value
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
    /// Entries currently stored, expired ones included
    pub entries: usize,
}

/// A cached value with its expiry time
#[derive(Debug, Clone)]
struct Entry<V> {
    /// Cached value
    value: V,
    /// First instant at which the entry reads as missing
    expires_at: Instant,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Key-value store whose entries expire a fixed time after they are written
pub struct TtlCache<V> {
    /// Entries keyed by caller-chosen string
    entries: DashMap<String, Entry<V>>,
    /// Lifetime of every entry
    ttl: Duration,
    /// Cache hits counter
    hits: AtomicU64,
    /// Cache misses counter
    misses: AtomicU64,
}

impl<V: Clone> TtlCache<V> {
    /// Create an empty cache whose entries live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        tracing::debug!(ttl_secs = ttl.as_secs(), "Creating TTL cache");

        Self {
            entries: DashMap::new(),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Lifetime of every entry
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store `value` under `key`, replacing any previous entry
    pub fn set(&self, key: impl Into<String>, value: V) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.insert(key.into(), entry);
    }

    /// Look up an unexpired value
    pub fn get(&self, key: &str) -> Result<V, CacheError> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(entry.value.clone());
            }
        }

        // Only drop the entry if it is still the expired one; a concurrent
        // set may have refreshed it in between.
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        self.misses.fetch_add(1, Ordering::Relaxed);
        Err(CacheError::NotFound)
    }

    /// Remove every expired entry, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of hit/miss counters and current size
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }

    /// Log cache statistics (for periodic monitoring)
    pub fn log_stats(&self, name: &str) {
        let stats = self.stats();
        let lookups = stats.hits + stats.misses;
        let hit_rate = if lookups > 0 {
            (stats.hits as f32 / lookups as f32 * 100.0) as u32
        } else {
            0
        };

        tracing::info!(
            cache = name,
            entries = stats.entries,
            hits = stats.hits,
            misses = stats.misses,
            hit_rate = hit_rate,
            "Cache statistics"
        );
    }
}

/// Periodically purge expired entries from `cache`
///
/// The returned handle runs until aborted.
pub fn spawn_janitor<V>(
    name: &'static str,
    cache: Arc<TtlCache<V>>,
    every: Duration,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;
            let removed = cache.purge_expired();
            if removed > 0 {
                tracing::debug!(
                    cache = name,
                    removed = removed,
                    "Purged expired cache entries"
                );
            }
            cache.log_stats(name);
        }
    })
}
