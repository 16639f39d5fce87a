//! # Database Handle
//!
//! Opens the SQLite file that holds the blob store and hands out the
//! repositories built on it.
//!
//! ```text
//! EngineConfig::db_config() ─► DbConfig { path, max_connections, storage_timeout }
//!                                   │
//!                                   ▼
//!                      Database::new ─► open pool (WAL) ─► apply migrations
//!                                   │
//!            ┌──────────────────────┼──────────────────────┐
//!            ▼                      ▼                      ▼
//!         blobs()              settings()            matrices(ttl)
//!     BlobRepository      SettingsRepository        MatrixStore
//! ```
//!
//! Every repository shares the pool and carries the same per-call storage
//! timeout. WAL keeps price lookups readable while an admin save is being
//! written.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::matrix_store::MatrixStore;
use crate::migrations;
use crate::repository::blob::{BlobRepository, DEFAULT_STORAGE_TIMEOUT};
use crate::repository::settings::SettingsRepository;

/// Where the blob store lives and how hard to lean on it.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: PathBuf,

    /// Pool size. Default: 5
    pub max_connections: u32,

    /// Bound on each blob read, write or listing; also used when waiting for
    /// a pooled connection. Default: 5 seconds
    pub storage_timeout: Duration,
}

impl DbConfig {
    /// File-backed store at `path`, created on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            storage_timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }

    /// Private in-memory store, used by tests and the seed tool's dry runs.
    ///
    /// Pinned to one connection: each SQLite `:memory:` connection is its own
    /// database.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            storage_timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn storage_timeout(mut self, timeout: Duration) -> Self {
        self.storage_timeout = timeout;
        self
    }
}

/// Open blob store plus the repositories on top of it.
///
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./folio.db")).await?;
/// let params = db.settings().load().await?;
/// let matrix = db.matrices(Duration::from_secs(300)).get("رقعی (14×20)").await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    storage_timeout: Duration,
}

impl Database {
    /// Opens (or creates) the store and brings its schema up to date.
    ///
    /// ## Errors
    /// - `ConnectionFailed` if the file cannot be opened
    /// - `MigrationFailed` if the schema cannot be applied
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let url = format!("sqlite://{}?mode=rwc", config.database_path.display());
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.storage_timeout)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        migrations::run_migrations(&pool).await?;

        info!(
            path = %config.database_path.display(),
            max_connections = config.max_connections,
            storage_timeout_ms = config.storage_timeout.as_millis() as u64,
            "Blob store ready"
        );

        Ok(Database {
            pool,
            storage_timeout: config.storage_timeout,
        })
    }

    /// Raw string-keyed access to the blob store.
    pub fn blobs(&self) -> BlobRepository {
        BlobRepository::new(self.pool.clone(), self.storage_timeout)
    }

    pub fn settings(&self) -> SettingsRepository<BlobRepository> {
        SettingsRepository::new(self.blobs())
    }

    /// A matrix store with a fresh cache. Keep one per process.
    pub fn matrices(&self, cache_ttl: Duration) -> MatrixStore<BlobRepository> {
        MatrixStore::new(self.blobs(), cache_ttl)
    }

    /// `(embedded, applied)` migration counts.
    pub async fn migration_status(&self) -> DbResult<(usize, usize)> {
        migrations::migration_status(&self.pool).await
    }

    /// Waits for open connections to finish, then closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Blob store closed");
    }
}
