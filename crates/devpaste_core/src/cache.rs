//! Time-bounded paste cache in front of the durable store.
//!
//! The cache is a derived copy. Every engine call tolerates a cache that
//! misses, errors, or is gone entirely.

use crate::constants::CACHE_KEY_PREFIX;
use crate::models::paste::Paste;
use moka::sync::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Cache backend failures. Callers treat these as a miss or a no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    #[error("cache operation timed out")]
    Timeout,
}

/// Internal cached representation of a paste.
///
/// Holds the credential hash so password checks can run on a cache hit. It has
/// no serialization impls; it only leaves the cache as a [`Paste`] handed back
/// to the lifecycle engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPaste(Paste);

impl CachedPaste {
    /// Wrap a store record for caching.
    pub fn new(paste: Paste) -> Self {
        Self(paste)
    }

    /// Borrow the cached record.
    pub fn paste(&self) -> &Paste {
        &self.0
    }

    /// Unwrap into the cached record.
    pub fn into_paste(self) -> Paste {
        self.0
    }
}

/// Key-value cache capability used by the lifecycle engine.
pub trait PasteCache: Send + Sync {
    /// Look up `key`; `Ok(None)` is a miss.
    fn get(&self, key: &str) -> Result<Option<CachedPaste>, CacheError>;

    /// Store `value` under `key` for `ttl`.
    fn set(&self, key: &str, value: CachedPaste, ttl: Duration) -> Result<(), CacheError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Derive the cache key for a paste id.
pub fn cache_key(id: &str) -> String {
    format!("{}{}", CACHE_KEY_PREFIX, id)
}

#[derive(Debug, Clone)]
struct Entry {
    value: CachedPaste,
    ttl: Duration,
}

struct EntryTtl;

impl Expiry<String, Entry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process bounded cache with per-entry time-to-live.
#[derive(Clone)]
pub struct MemoryCache {
    entries: Cache<String, Entry>,
}

impl MemoryCache {
    /// Create a cache holding at most `capacity` pastes.
    pub fn new(capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .expire_after(EntryTtl)
            .build();
        Self { entries }
    }

    /// Number of live entries, after flushing pending maintenance.
    pub fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }
}

impl PasteCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<CachedPaste>, CacheError> {
        Ok(self.entries.get(key).map(|entry| entry.value))
    }

    fn set(&self, key: &str, value: CachedPaste, ttl: Duration) -> Result<(), CacheError> {
        if ttl.is_zero() {
            self.entries.invalidate(key);
            return Ok(());
        }
        self.entries.insert(key.to_string(), Entry { value, ttl });
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.invalidate(key);
        Ok(())
    }
}

/// Cache that stores nothing, for deployments running without a cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl PasteCache for NoCache {
    fn get(&self, _key: &str) -> Result<Option<CachedPaste>, CacheError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: CachedPaste, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }
}
