//! In-memory TTL cache for upstream responses.
//!
//! Entries are valid while `now - fetched_at < ttl`. Expired entries are
//! never evicted proactively; they stay until the next successful fetch
//! for the same key overwrites them. Every read and write has an `_at`
//! variant taking an explicit `now` so TTL behaviour is testable without
//! sleeping.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// A cached value and when it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    /// Cached value.
    pub data: T,
    /// When the value was fetched from upstream.
    pub fetched_at: DateTime<Utc>,
}

/// Map of string keys to timestamped values with a fixed TTL.
#[derive(Debug, Clone)]
pub struct TtlCache<T> {
    ttl: TimeDelta,
    entries: BTreeMap<String, CacheEntry<T>>,
}

impl<T> TtlCache<T> {
    /// Creates an empty cache. TTLs too large for `chrono` saturate.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            entries: BTreeMap::new(),
        }
    }

    /// The configured TTL.
    #[must_use]
    pub const fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Returns the value for `key` if present and fresh now.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.get_at(key, Utc::now())
    }

    /// Returns the value for `key` if present and fresh at `now`.
    #[must_use]
    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<&T> {
        self.entries
            .get(key)
            .filter(|entry| !self.is_expired(entry, now))
            .map(|entry| &entry.data)
    }

    /// Stores `data` under `key`, stamped with the current time.
    pub fn insert(&mut self, key: impl Into<String>, data: T) {
        self.insert_at(key, data, Utc::now());
    }

    /// Stores `data` under `key`, stamped with `fetched_at`.
    pub fn insert_at(&mut self, key: impl Into<String>, data: T, fetched_at: DateTime<Utc>) {
        self.entries
            .insert(key.into(), CacheEntry { data, fetched_at });
    }

    /// Returns `true` if `entry` is no longer fresh at `now`.
    #[must_use]
    pub fn is_expired(&self, entry: &CacheEntry<T>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.fetched_at) >= self.ttl
    }

    /// Raw entry lookup, ignoring freshness.
    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&CacheEntry<T>> {
        self.entries.get(key)
    }

    /// Number of stored entries, fresh or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
