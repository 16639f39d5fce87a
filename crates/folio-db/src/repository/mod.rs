//! # Repository Module
//!
//! Storage repositories for the pricing engine.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SettingsRepository        MatrixStore (crate::matrix_store)            │
//! │  print_settings            pricing_matrix_<base64>                      │
//! │          │                        │                                     │
//! │          └──────────┬─────────────┘                                     │
//! │                     ▼                                                   │
//! │              BlobStore trait                                            │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │              BlobRepository ─► SQLite blob_store table                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`BlobRepository`](blob::BlobRepository) - Raw key → JSON persistence
//! - [`SettingsRepository`](settings::SettingsRepository) - Configured parameters

pub mod blob;
pub mod settings;
