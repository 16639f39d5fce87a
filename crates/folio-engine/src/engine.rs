//! # Pricing Engine
//!
//! The call surface the order form and the admin panel talk to.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Price Request Flow                                   │
//! │                                                                         │
//! │  calculate_price({ selection, quantity })                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SettingsRepository::load ─► ConfiguredParameters                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  MatrixStore::load(book size) ─► Found / Missing / Malformed            │
//! │       │            (cache hit skips storage)                            │
//! │       ▼                                                                 │
//! │  PriceCalculator::calculate ─► validate, then price                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Result<PriceQuote, ApiError>                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Settings are read on every call so an admin edit takes effect at once;
//! matrices go through the store's cache.

use folio_core::{
    validate_combination, AllowedOptions, BookSizeAvailability, BookSizeKey, CombinationVerdict,
    ConfiguredParameters, ConstraintResolver, CoreError, FullSelection, PartialSelection,
    PriceCalculator, PriceQuote, PricingMatrix, SelectionField,
};
use folio_db::{BlobRepository, BlobStore, Database, MatrixLookup, MatrixStore, SettingsRepository};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::{ApiError, ApiResult};

// =============================================================================
// Requests
// =============================================================================

/// A price request from the order form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CalculatePriceRequest {
    pub selection: FullSelection,
    pub quantity: u32,
}

/// Asks which options remain for a book size given the picks so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AllowedOptionsRequest {
    pub book_size: String,
    #[serde(default)]
    pub current_selection: PartialSelection,
}

// =============================================================================
// Engine
// =============================================================================

/// Pricing and constraint engine over one settings source and one matrix
/// store.
///
/// Holds no per-request state. Share one instance (behind an `Arc`) so every
/// caller sees the same matrix cache.
#[derive(Debug)]
pub struct PricingEngine<S = BlobRepository> {
    settings: SettingsRepository<S>,
    matrices: MatrixStore<S>,
}

impl PricingEngine<BlobRepository> {
    /// Creates an engine on the SQLite database.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = EngineConfig::load(None)?;
    /// let db = Database::new(config.db_config()).await?;
    /// let engine = PricingEngine::new(&db, config.cache_ttl());
    /// ```
    pub fn new(db: &Database, cache_ttl: Duration) -> Self {
        PricingEngine {
            settings: db.settings(),
            matrices: db.matrices(cache_ttl),
        }
    }
}

impl<S: BlobStore + Clone> PricingEngine<S> {
    /// Creates an engine over any blob store.
    pub fn with_store(store: S, cache_ttl: Duration) -> Self {
        PricingEngine {
            settings: SettingsRepository::new(store.clone()),
            matrices: MatrixStore::new(store, cache_ttl),
        }
    }
}

impl<S: BlobStore> PricingEngine<S> {
    // =========================================================================
    // Order Form
    // =========================================================================

    /// Prices a full selection.
    ///
    /// ## Errors
    /// - `NOT_CONFIGURED` / `FORBIDDEN` / `OUT_OF_RANGE` for rule violations,
    ///   with `field` set
    /// - `MALFORMED_MATRIX` if the size's stored matrix is unusable
    /// - `STORAGE_ERROR` if storage failed
    pub async fn calculate_price(&self, request: CalculatePriceRequest) -> ApiResult<PriceQuote> {
        let start = Instant::now();
        let params = self.settings.load().await?;
        let key = BookSizeKey::normalize(&request.selection.book_size);
        let matrix = self.matrix_for(&params, &key).await?;

        let quote = PriceCalculator::new(&params, &matrix)
            .calculate(&request.selection, request.quantity)
            .map_err(|e| {
                debug!(book_size = %key, error = %e, "Price request rejected");
                ApiError::from(e)
            })?;

        info!(
            book_size = %key,
            quantity = request.quantity,
            total = quote.total.minor(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Price calculated"
        );
        Ok(quote)
    }

    /// Options still usable for a book size, narrowed by the picks so far.
    pub async fn get_allowed_options(&self, request: AllowedOptionsRequest) -> ApiResult<AllowedOptions> {
        let params = self.settings.load().await?;
        let key = BookSizeKey::normalize(&request.book_size);
        let matrix = self.matrix_for(&params, &key).await?;

        let options = ConstraintResolver::new(&params, &matrix).allowed_options(&request.current_selection);
        debug!(
            book_size = %key,
            papers = options.papers.len(),
            bindings = options.bindings.len(),
            "Allowed options resolved"
        );
        Ok(options)
    }

    /// Checks a full selection without pricing it.
    ///
    /// Rule violations come back as a rejected verdict; only storage and
    /// settings failures are errors.
    pub async fn validate_combination(&self, selection: &FullSelection) -> ApiResult<CombinationVerdict> {
        let params = self.settings.load().await?;
        let key = BookSizeKey::normalize(&selection.book_size);

        // Unconfigured names never reach the matrix store or its cache.
        if !params.is_book_size_configured(&key) {
            let verdict = validate_combination(&params, None, selection);
            debug!(book_size = %key, reason = ?verdict.reason, "Combination checked");
            return Ok(verdict);
        }

        let verdict = match self.matrices.load(key.as_str()).await? {
            MatrixLookup::Found(matrix) => validate_combination(&params, Some(matrix.as_ref()), selection),
            MatrixLookup::Missing => validate_combination(&params, None, selection),
            MatrixLookup::Malformed { reason } => CombinationVerdict::rejected(
                CoreError::MalformedMatrix {
                    book_size: key.to_string(),
                    reason,
                },
                Vec::new(),
            ),
        };

        debug!(book_size = %key, allowed = verdict.allowed, reason = ?verdict.reason, "Combination checked");
        Ok(verdict)
    }

    /// Every configured book size, in settings order, with whether it can be
    /// ordered.
    ///
    /// A size is enabled only when its matrix exists, parses, and leaves at
    /// least one paper and one binding usable.
    pub async fn available_book_sizes(&self) -> ApiResult<Vec<BookSizeAvailability>> {
        let params = self.settings.load().await?;
        let mut sizes = Vec::new();

        for key in params.ordered_book_sizes() {
            let availability = match self.matrices.load(key.as_str()).await? {
                MatrixLookup::Found(matrix) => ConstraintResolver::new(&params, &matrix).availability(key),
                MatrixLookup::Missing => BookSizeAvailability::disabled(key),
                MatrixLookup::Malformed { .. } => {
                    warn!(book_size = %key, "Book size disabled: stored matrix is malformed");
                    BookSizeAvailability::disabled(key)
                }
            };
            sizes.push(availability);
        }

        debug!(
            total = sizes.len(),
            enabled = sizes.iter().filter(|s| s.enabled).count(),
            "Book size availability resolved"
        );
        Ok(sizes)
    }

    // =========================================================================
    // Admin
    // =========================================================================

    /// The configured parameter lists, read-only.
    pub async fn configured_parameters(&self) -> ApiResult<ConfiguredParameters> {
        Ok(self.settings.load().await?)
    }

    /// Saves the matrix for a configured book size.
    ///
    /// Returns the normalized key it was stored under.
    pub async fn save_matrix(&self, name: &str, matrix: &PricingMatrix) -> ApiResult<BookSizeKey> {
        let params = self.settings.load().await?;
        Ok(self.matrices.save(&params, name, matrix).await?)
    }

    /// Deletes the matrix for a book size. Returns true if one existed.
    pub async fn delete_matrix(&self, name: &str) -> ApiResult<bool> {
        Ok(self.matrices.delete(name).await?)
    }

    /// Book sizes that currently have a stored matrix.
    pub async fn priced_book_sizes(&self) -> ApiResult<BTreeSet<BookSizeKey>> {
        Ok(self.matrices.list_configured_sizes().await?)
    }

    /// Deletes matrices for book sizes no longer configured.
    pub async fn cleanup_orphans(&self) -> ApiResult<usize> {
        let params = self.settings.load().await?;
        Ok(self.matrices.cleanup_orphans(&params).await?)
    }

    /// Drops the cached matrix for `name`, or every cached matrix.
    pub fn clear_cache(&self, name: Option<&str>) {
        let key = name.map(BookSizeKey::normalize);
        self.matrices.clear_cache(key.as_ref());
        debug!(book_size = ?key, "Matrix cache cleared");
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn matrix_for(
        &self,
        params: &ConfiguredParameters,
        key: &BookSizeKey,
    ) -> ApiResult<Arc<PricingMatrix>> {
        let not_configured = || {
            ApiError::from(CoreError::NotConfigured {
                field: SelectionField::BookSize,
                value: key.to_string(),
            })
        };

        if !params.is_book_size_configured(key) {
            return Err(not_configured());
        }

        match self.matrices.load(key.as_str()).await? {
            MatrixLookup::Found(matrix) => Ok(matrix),
            MatrixLookup::Missing => Err(not_configured()),
            MatrixLookup::Malformed { reason } => Err(CoreError::MalformedMatrix {
                book_size: key.to_string(),
                reason,
            }
            .into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
