//! # folio-db: Persistence Layer for Folio
//!
//! This crate provides storage for the pricing engine: print settings and
//! one pricing matrix per book size, kept as JSON blobs in SQLite.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Folio Data Flow                                  │
//! │                                                                         │
//! │  PricingEngine (folio-engine)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     folio-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  MatrixStore  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  + MatrixCache│    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ Settings repo │    │ 001_blob_    │  │   │
//! │  │   │               │    │ Blob repo     │    │   store.sql  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   blob_store(key, value, updated_at)                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//! - [`repository`] - Blob and settings repositories
//! - [`matrix_store`] - Normalized matrix keys, orphan sweep
//! - [`cache`] - Matrix read cache
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/folio.db")).await?;
//! let params = db.settings().load().await?;
//!
//! let matrices = db.matrices(Duration::from_secs(300));
//! matrices.save(&params, "رقعی (14×20)", &matrix).await?;
//! let removed = matrices.cleanup_orphans(&params).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod error;
pub mod matrix_store;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use cache::{MatrixCache, MatrixLookup};
pub use error::{DbError, DbResult};
pub use matrix_store::{MatrixStore, MATRIX_KEY_PREFIX};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::blob::{BlobRepository, BlobStore, DEFAULT_STORAGE_TIMEOUT};
pub use repository::settings::{SettingsRepository, SETTINGS_KEY};
