//! # Matrix Store
//!
//! Persists one [`PricingMatrix`] per book size, under a key derived from
//! the normalized book size name.
//!
//! ## Key Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "رقعی (14×20)"   admin input, any variant                              │
//! │        │                                                                │
//! │        ▼  BookSizeKey::normalize                                        │
//! │  "رقعی"                                                                 │
//! │        │                                                                │
//! │        ▼  base64 (standard alphabet, padded)                            │
//! │  "2LHZgti524w="                                                         │
//! │        │                                                                │
//! │        ▼  prefix                                                        │
//! │  "pricing_matrix_2LHZgti524w="   ← blob_store.key                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Normalization always happens before encoding, so `"رقعی (14×20)"` and
//! `"رقعی"` address the same blob. The codec is private to this module;
//! nothing else builds a storage key.
//!
//! ## Failure Handling
//! | Situation                  | Result                                  |
//! |----------------------------|-----------------------------------------|
//! | Name empty once normalized | `Rejected(Validation)`, no write        |
//! | Size not configured (save) | `Rejected(NotConfigured)`, no write     |
//! | Invalid matrix (save)      | `Rejected(Validation)`, no write        |
//! | Blob unparseable (read)    | `Malformed`, logged at error            |
//! | Storage down / timed out   | `DbError`, propagated                   |

use base64::{engine::general_purpose, Engine as _};
use folio_core::validation::validate_book_size_name;
use folio_core::{BookSizeKey, ConfiguredParameters, CoreError, PricingMatrix, SelectionField};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::cache::{MatrixCache, MatrixLookup};
use crate::error::{DbError, DbResult};
use crate::repository::blob::BlobStore;

/// Prefix shared by every matrix key.
pub const MATRIX_KEY_PREFIX: &str = "pricing_matrix_";

// =============================================================================
// Key Codec
// =============================================================================

fn encode_key(key: &BookSizeKey) -> String {
    format!(
        "{}{}",
        MATRIX_KEY_PREFIX,
        general_purpose::STANDARD.encode(key.as_str())
    )
}

/// Decodes the book size name stored in a key; `None` if it is not valid
/// base64 or not UTF-8.
fn decode_key(storage_key: &str) -> Option<String> {
    let encoded = storage_key.strip_prefix(MATRIX_KEY_PREFIX)?;
    let bytes = general_purpose::STANDARD.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

// =============================================================================
// Store
// =============================================================================

/// Keyed matrix persistence with a read-through cache.
#[derive(Debug)]
pub struct MatrixStore<S> {
    store: S,
    cache: MatrixCache,
}

impl<S: BlobStore> MatrixStore<S> {
    /// Creates a store over `store` whose cache entries live for `cache_ttl`.
    pub fn new(store: S, cache_ttl: Duration) -> Self {
        Self {
            store,
            cache: MatrixCache::new(cache_ttl),
        }
    }

    /// Saves a matrix for `name`, replacing any previous one.
    ///
    /// ## Errors
    /// - `Rejected(Validation)` if the name normalizes to nothing
    /// - `Rejected(NotConfigured)` if the normalized name is not among the
    ///   configured book sizes; nothing is written
    /// - `Rejected(Validation)` if the matrix fails validation
    /// - Storage failures
    pub async fn save(
        &self,
        params: &ConfiguredParameters,
        name: &str,
        matrix: &PricingMatrix,
    ) -> DbResult<BookSizeKey> {
        let key = BookSizeKey::normalize(name);

        if let Err(e) = validate_book_size_name(key.as_str()) {
            warn!(name = %name, "Rejected matrix save without a book size name");
            return Err(CoreError::from(e).into());
        }

        if !params.is_book_size_configured(&key) {
            warn!(book_size = %key, "Rejected matrix save for unconfigured book size");
            return Err(CoreError::NotConfigured {
                field: SelectionField::BookSize,
                value: key.into_string(),
            }
            .into());
        }

        if let Err(e) = matrix.validate() {
            warn!(book_size = %key, error = %e, "Rejected invalid matrix");
            return Err(CoreError::from(e).into());
        }

        let raw = serde_json::to_string(matrix).map_err(|e| DbError::Internal(e.to_string()))?;
        self.store.set(&encode_key(&key), &raw).await?;
        self.cache.invalidate(Some(&key));

        info!(book_size = %key, "Pricing matrix saved");
        Ok(key)
    }

    /// Reads the matrix for `name`, reporting why it is unavailable.
    pub async fn load(&self, name: &str) -> DbResult<MatrixLookup> {
        let key = BookSizeKey::normalize(name);

        if let Some(lookup) = self.cache.get(&key) {
            debug!(book_size = %key, "Matrix cache hit");
            return Ok(lookup);
        }

        let lookup = match self.store.get(&encode_key(&key)).await? {
            None => MatrixLookup::Missing,
            Some(raw) => match serde_json::from_str::<PricingMatrix>(&raw) {
                Ok(matrix) => MatrixLookup::Found(Arc::new(matrix)),
                Err(e) => {
                    error!(book_size = %key, error = %e, "Stored pricing matrix is malformed");
                    MatrixLookup::Malformed {
                        reason: e.to_string(),
                    }
                }
            },
        };

        debug!(book_size = %key, found = lookup.matrix().is_some(), "Matrix loaded from storage");
        self.cache.insert(key, lookup.clone());
        Ok(lookup)
    }

    /// Reads the matrix for `name`.
    ///
    /// A malformed blob reads as `None`; only storage failures are errors.
    pub async fn get(&self, name: &str) -> DbResult<Option<Arc<PricingMatrix>>> {
        Ok(self.load(name).await?.matrix().cloned())
    }

    /// Deletes the matrix for `name`. Returns true if one existed.
    pub async fn delete(&self, name: &str) -> DbResult<bool> {
        let key = BookSizeKey::normalize(name);
        let removed = self.store.delete(&encode_key(&key)).await?;
        self.cache.invalidate(Some(&key));

        info!(book_size = %key, removed, "Pricing matrix deleted");
        Ok(removed)
    }

    /// Book sizes that have a matrix stored under their canonical key.
    pub async fn list_configured_sizes(&self) -> DbResult<BTreeSet<BookSizeKey>> {
        let keys = self.store.list_by_prefix(MATRIX_KEY_PREFIX).await?;

        Ok(keys
            .iter()
            .filter_map(|storage_key| decode_key(storage_key))
            .map(|name| BookSizeKey::normalize(&name))
            .filter(|key| keys.contains(&encode_key(key)))
            .collect())
    }

    /// Deletes matrices whose book size is no longer configured.
    ///
    /// Returns the number removed; running it again removes nothing. Keys
    /// that cannot be decoded are left alone.
    pub async fn cleanup_orphans(&self, params: &ConfiguredParameters) -> DbResult<usize> {
        let configured = params.configured_book_sizes();
        let keys = self.store.list_by_prefix(MATRIX_KEY_PREFIX).await?;

        let mut removed = 0;
        for storage_key in keys {
            let Some(name) = decode_key(&storage_key) else {
                warn!(key = %storage_key, "Skipping matrix key that cannot be decoded");
                continue;
            };

            let key = BookSizeKey::normalize(&name);
            if configured.contains(&key) {
                continue;
            }

            if self.store.delete(&storage_key).await? {
                debug!(book_size = %key, "Removed orphaned matrix");
                removed += 1;
            }
            self.cache.invalidate(Some(&key));
        }

        info!(removed, "Orphaned matrix sweep complete");
        Ok(removed)
    }

    /// Drops cached entries: one book size, or all of them.
    pub fn clear_cache(&self, key: Option<&BookSizeKey>) {
        self.cache.invalidate(key);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::blob::BlobRepository;
    use folio_core::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn params() -> ConfiguredParameters {
        ConfiguredParameters::empty()
            .with_book_size("رقعی (14×20)")
            .with_book_size("وزیری (17×24)")
            .with_paper_type("تحریر", &[70])
            .with_binding_type("شومیز")
            .with_cover_weight(250)
    }

    fn matrix() -> PricingMatrix {
        serde_json::from_str(
            r#"{
                "pageCosts": {"تحریر": {"70": {"bw": 300, "color": 1000}}},
                "bindingCosts": {"شومیز": {"250": 15000}},
                "extrasCosts": {"سلفون": {"kind": "fixed", "price": 50000}},
                "profitMargin": 1000,
                "quantityConstraints": {"minimum": 1, "maximum": 1000, "step": 1}
            }"#,
        )
        .unwrap()
    }

    async fn blobs() -> BlobRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().blobs()
    }

    async fn store() -> (MatrixStore<BlobRepository>, BlobRepository) {
        let blobs = blobs().await;
        (MatrixStore::new(blobs.clone(), Duration::from_secs(60)), blobs)
    }

    /// Counts reads that reach storage.
    struct CountingStore {
        inner: BlobRepository,
        reads: Arc<AtomicUsize>,
    }

    impl BlobStore for CountingStore {
        async fn get(&self, key: &str) -> DbResult<Option<String>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.get(key).await
        }
        async fn set(&self, key: &str, value: &str) -> DbResult<()> {
            self.inner.set(key, value).await
        }
        async fn delete(&self, key: &str) -> DbResult<bool> {
            self.inner.delete(key).await
        }
        async fn list_by_prefix(&self, prefix: &str) -> DbResult<Vec<String>> {
            self.inner.list_by_prefix(prefix).await
        }
    }

    /// Storage that is always down.
    struct UnavailableStore;

    impl BlobStore for UnavailableStore {
        async fn get(&self, _key: &str) -> DbResult<Option<String>> {
            Err(DbError::ConnectionFailed("unreachable".into()))
        }
        async fn set(&self, _key: &str, _value: &str) -> DbResult<()> {
            Err(DbError::ConnectionFailed("unreachable".into()))
        }
        async fn delete(&self, _key: &str) -> DbResult<bool> {
            Err(DbError::ConnectionFailed("unreachable".into()))
        }
        async fn list_by_prefix(&self, _prefix: &str) -> DbResult<Vec<String>> {
            Err(DbError::ConnectionFailed("unreachable".into()))
        }
    }

    #[test]
    fn test_key_codec() {
        let key = BookSizeKey::normalize("A5 (148×210)");
        assert_eq!(encode_key(&key), "pricing_matrix_QTU=");
        assert_eq!(decode_key("pricing_matrix_QTU=").as_deref(), Some("A5"));
        assert_eq!(
            decode_key(&encode_key(&BookSizeKey::normalize("رقعی"))).as_deref(),
            Some("رقعی")
        );
        assert_eq!(decode_key("pricing_matrix_!!"), None);
        assert_eq!(decode_key("pricing_matrix_/w=="), None); // 0xFF is not UTF-8
        assert_eq!(decode_key("other_QTU="), None);
    }

    #[tokio::test]
    async fn test_save_then_get() {
        let (store, _) = store().await;
        let key = store.save(&params(), "رقعی (14×20)", &matrix()).await.unwrap();
        assert_eq!(key.as_str(), "رقعی");

        let loaded = store.get("رقعی (14×20)").await.unwrap().unwrap();
        assert_eq!(*loaded, matrix());
    }

    #[tokio::test]
    async fn test_names_share_one_key() {
        let (store, _) = store().await;

        store.save(&params(), "رقعی (14×20)", &matrix()).await.unwrap();
        assert!(store.get("رقعی").await.unwrap().is_some());

        let mut updated = matrix();
        updated.profit_margin = folio_core::Rate::from_bps(2000);
        store.save(&params(), "  رقعی ", &updated).await.unwrap();
        let loaded = store.get("رقعی (14×20)").await.unwrap().unwrap();
        assert_eq!(loaded.profit_margin.bps(), 2000);
    }

    #[tokio::test]
    async fn test_unconfigured_save_writes_nothing() {
        let (store, blobs) = store().await;

        let err = store.save(&params(), "خشتی", &matrix()).await.unwrap_err();
        match err {
            DbError::Rejected(core) => assert_eq!(core.kind(), ErrorKind::NotConfigured),
            other => panic!("unexpected error: {other}"),
        }
        assert!(blobs.list_by_prefix(MATRIX_KEY_PREFIX).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let (store, blobs) = store().await;

        for name in ["", "   ", "(14×20)"] {
            let err = store.save(&params(), name, &matrix()).await.unwrap_err();
            assert!(matches!(err, DbError::Rejected(CoreError::Validation(_))));
        }
        assert!(blobs.list_by_prefix(MATRIX_KEY_PREFIX).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_matrix_is_rejected() {
        let (store, blobs) = store().await;
        let mut bad = matrix();
        bad.quantity_constraints.step = 0;

        let err = store.save(&params(), "رقعی", &bad).await.unwrap_err();
        assert!(matches!(err, DbError::Rejected(CoreError::Validation(_))));
        assert!(blobs.list_by_prefix(MATRIX_KEY_PREFIX).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_blob_reads_as_none() {
        let (store, blobs) = store().await;
        let key = BookSizeKey::normalize("رقعی");

        blobs.set(&encode_key(&key), r#"{"pageCosts": {}}"#).await.unwrap();
        assert!(store.get("رقعی").await.unwrap().is_none());
        assert!(matches!(
            store.load("رقعی").await.unwrap(),
            MatrixLookup::Malformed { .. }
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let (store, _) = store().await;
        store.save(&params(), "رقعی", &matrix()).await.unwrap();

        assert!(store.delete("رقعی (14×20)").await.unwrap());
        assert!(store.get("رقعی").await.unwrap().is_none());
        assert!(!store.delete("رقعی").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_configured_sizes_only_counts_canonical_keys() {
        let (store, blobs) = store().await;
        store.save(&params(), "رقعی (14×20)", &matrix()).await.unwrap();

        // A key written from an un-normalized name.
        let legacy = format!(
            "{}{}",
            MATRIX_KEY_PREFIX,
            general_purpose::STANDARD.encode("وزیری (17×24)")
        );
        blobs.set(&legacy, "{}").await.unwrap();

        let sizes = store.list_configured_sizes().await.unwrap();
        assert_eq!(sizes.len(), 1);
        assert!(sizes.contains(&BookSizeKey::normalize("رقعی")));
    }

    #[tokio::test]
    async fn test_cleanup_orphans_is_idempotent() {
        let (store, blobs) = store().await;
        store.save(&params(), "رقعی", &matrix()).await.unwrap();
        store.save(&params(), "وزیری", &matrix()).await.unwrap();
        blobs.set("pricing_matrix_%%%", "{}").await.unwrap();

        let narrowed = ConfiguredParameters::empty().with_book_size("رقعی (14×20)");
        assert_eq!(store.cleanup_orphans(&narrowed).await.unwrap(), 1);
        assert_eq!(store.cleanup_orphans(&narrowed).await.unwrap(), 0);

        assert!(store.get("رقعی").await.unwrap().is_some());
        assert!(store.get("وزیری").await.unwrap().is_none());
        // Undecodable keys are never touched.
        assert_eq!(blobs.get("pricing_matrix_%%%").await.unwrap().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_reads_are_cached_until_invalidated() {
        let reads = Arc::new(AtomicUsize::new(0));
        let store = MatrixStore::new(
            CountingStore {
                inner: blobs().await,
                reads: reads.clone(),
            },
            Duration::from_secs(60),
        );

        store.save(&params(), "رقعی", &matrix()).await.unwrap();
        store.get("رقعی").await.unwrap();
        store.get("رقعی (14×20)").await.unwrap();
        assert_eq!(reads.load(Ordering::SeqCst), 1);

        store.clear_cache(Some(&BookSizeKey::normalize("رقعی")));
        store.get("رقعی").await.unwrap();
        assert_eq!(reads.load(Ordering::SeqCst), 2);

        store.save(&params(), "رقعی", &matrix()).await.unwrap();
        store.get("رقعی").await.unwrap();
        assert_eq!(reads.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let store = MatrixStore::new(UnavailableStore, Duration::from_secs(60));

        let err = store.get("رقعی").await.unwrap_err();
        assert!(err.is_storage_failure());
        assert!(store.cleanup_orphans(&params()).await.unwrap_err().is_storage_failure());
    }

    #[tokio::test]
    async fn test_unknown_names_do_not_grow_cache() {
        let (store, _) = store().await;
        store.save(&params(), "رقعی", &matrix()).await.unwrap();
        store.get("رقعی").await.unwrap();

        for i in 0..5_000 {
            let lookup = store.load(&format!("unknown-{i}")).await.unwrap();
            assert_eq!(lookup, MatrixLookup::Missing);
        }
        assert_eq!(store.cache.len(), 1);
    }
}
