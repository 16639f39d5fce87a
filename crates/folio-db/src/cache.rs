//! # Matrix Cache
//!
//! Read-through cache of parsed matrices, owned by one `MatrixStore`.
//!
//! ## Entry Lifecycle
//! ```text
//! get(key) ──► fresh entry? ──yes──► cached lookup
//!                  │
//!                  no (absent or older than ttl)
//!                  ▼
//!            read storage ──► insert(key, lookup)
//!                                  │
//!                                  ├─ Missing: not kept
//!                                  └─ expired entries dropped
//!
//! save / delete / cleanup / clear_cache ──► invalidate
//! ```
//!
//! Only lookups backed by a stored blob are kept, so the cache never holds
//! more keys than storage does. Malformed lookups are kept too, so a broken
//! blob does not hit storage and log an error on every request. A TTL of
//! zero disables the cache.

use folio_core::{BookSizeKey, PricingMatrix};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Result of reading one matrix from storage.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixLookup {
    /// A parseable matrix is stored under the key.
    Found(Arc<PricingMatrix>),
    /// Nothing is stored under the key.
    Missing,
    /// Something is stored but it is not a usable matrix.
    Malformed { reason: String },
}

impl MatrixLookup {
    /// The matrix, if one was found.
    pub fn matrix(&self) -> Option<&Arc<PricingMatrix>> {
        match self {
            MatrixLookup::Found(matrix) => Some(matrix),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    lookup: MatrixLookup,
    stored_at: Instant,
}

/// TTL cache keyed by normalized book size.
#[derive(Debug)]
pub struct MatrixCache {
    ttl: Duration,
    entries: RwLock<HashMap<BookSizeKey, CacheEntry>>,
}

impl MatrixCache {
    /// Creates a cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns true if entries are ever kept.
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Returns a fresh entry for `key`.
    pub fn get(&self, key: &BookSizeKey) -> Option<MatrixLookup> {
        if !self.is_enabled() {
            return None;
        }
        let entries = self.entries.read().expect("Matrix cache lock poisoned");
        entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.lookup.clone())
    }

    /// Keeps `lookup` for `key`. `Missing` is never kept.
    pub fn insert(&self, key: BookSizeKey, lookup: MatrixLookup) {
        if !self.is_enabled() || lookup == MatrixLookup::Missing {
            return;
        }
        let mut entries = self.entries.write().expect("Matrix cache lock poisoned");
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        entries.insert(
            key,
            CacheEntry {
                lookup,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drops the entry for `key`, or every entry when `key` is `None`.
    pub fn invalidate(&self, key: Option<&BookSizeKey>) {
        let mut entries = self.entries.write().expect("Matrix cache lock poisoned");
        match key {
            Some(key) => {
                entries.remove(key);
            }
            None => entries.clear(),
        }
    }

    /// Number of entries held, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.read().expect("Matrix cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> BookSizeKey {
        BookSizeKey::normalize(name)
    }

    fn malformed() -> MatrixLookup {
        MatrixLookup::Malformed {
            reason: "expected value".into(),
        }
    }

    #[test]
    fn test_insert_get_invalidate() {
        let cache = MatrixCache::new(Duration::from_secs(60));
        cache.insert(key("A5"), malformed());
        cache.insert(key("A4"), malformed());

        assert_eq!(cache.get(&key("A5 (148×210)")), Some(malformed()));

        cache.invalidate(Some(&key("A5")));
        assert_eq!(cache.get(&key("A5")), None);
        assert_eq!(cache.len(), 1);

        cache.invalidate(None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let cache = MatrixCache::new(Duration::ZERO);
        cache.insert(key("A5"), malformed());
        assert_eq!(cache.get(&key("A5")), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_entries_are_not_returned() {
        let cache = MatrixCache::new(Duration::from_millis(1));
        cache.insert(key("A5"), malformed());
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get(&key("A5")), None);
    }

    #[test]
    fn test_missing_lookups_are_not_kept() {
        let cache = MatrixCache::new(Duration::from_secs(60));
        for i in 0..1_000 {
            cache.insert(key(&format!("size-{i}")), MatrixLookup::Missing);
        }
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_drops_expired_entries() {
        let cache = MatrixCache::new(Duration::from_millis(1));
        cache.insert(key("A5"), malformed());
        cache.insert(key("A4"), malformed());
        std::thread::sleep(Duration::from_millis(5));

        cache.insert(key("B5"), malformed());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key("B5")), Some(malformed()));
    }
}
