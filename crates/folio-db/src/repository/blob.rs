//! # Blob Repository
//!
//! The string-keyed JSON store every other repository is built on.
//!
//! ## Table Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  blob_store                                                             │
//! │  ─────────────────────────────────────────────────────────────────────  │
//! │  key (PK)                           value (JSON)        updated_at      │
//! │  print_settings                     {"bookSizes": …}    2026-…Z         │
//! │  pricing_matrix_2LHZgti524w=        {"pageCosts": …}    2026-…Z         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store knows nothing about what it holds. Callers own their key
//! prefixes and their JSON shapes.
//!
//! ## Timeouts
//! Every call is bounded by the repository's timeout. An elapsed call becomes
//! [`DbError::Timeout`]; the query itself is dropped.

use chrono::Utc;
use sqlx::SqlitePool;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};

// =============================================================================
// Trait
// =============================================================================

/// Abstract string-keyed JSON persistence.
///
/// `MatrixStore` and `SettingsRepository` are generic over this so tests and
/// embedders can plug in other backends.
pub trait BlobStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = DbResult<Option<String>>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = DbResult<()>> + Send;

    /// Removes `key`. Returns true if something was removed.
    fn delete(&self, key: &str) -> impl Future<Output = DbResult<bool>> + Send;

    /// Every key starting with `prefix`, sorted.
    fn list_by_prefix(&self, prefix: &str) -> impl Future<Output = DbResult<Vec<String>>> + Send;
}

// =============================================================================
// SQLite Implementation
// =============================================================================

/// Default bound on a single storage call.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed [`BlobStore`] on the `blob_store` table.
#[derive(Debug, Clone)]
pub struct BlobRepository {
    pool: SqlitePool,
    timeout: Duration,
}

impl BlobRepository {
    /// Creates a new BlobRepository.
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        BlobRepository { pool, timeout }
    }

    /// The per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> DbResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                warn!(operation, timeout_ms = self.timeout.as_millis() as u64, "Storage call timed out");
                Err(DbError::Timeout {
                    operation,
                    after: self.timeout,
                })
            }
        }
    }
}

impl BlobStore for BlobRepository {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        debug!(key = %key, "Reading blob");

        self.bounded(
            "get",
            sqlx::query_scalar::<_, String>("SELECT value FROM blob_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing blob");

        let now = Utc::now().to_rfc3339();
        self.bounded(
            "set",
            sqlx::query(
                r#"
                INSERT INTO blob_store (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(key)
            .bind(value)
            .bind(now)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> DbResult<bool> {
        debug!(key = %key, "Deleting blob");

        let result = self
            .bounded(
                "delete",
                sqlx::query("DELETE FROM blob_store WHERE key = ?1")
                    .bind(key)
                    .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_prefix(&self, prefix: &str) -> DbResult<Vec<String>> {
        // substr/length instead of LIKE: prefixes may contain '%' or '_'.
        self.bounded(
            "list_by_prefix",
            sqlx::query_scalar::<_, String>(
                "SELECT key FROM blob_store WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
            )
            .bind(prefix)
            .fetch_all(&self.pool),
        )
        .await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
