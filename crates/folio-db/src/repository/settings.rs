//! # Settings Repository
//!
//! Reads and writes the print settings ([`ConfiguredParameters`]) kept under
//! the `print_settings` blob key.
//!
//! ## Absent vs Malformed
//! ```text
//! no blob           → empty parameters (nothing orderable)
//! unparseable blob  → DbError::MalformedSettings (hard failure)
//! ```
//! There is no fallback list of book sizes or papers.

use folio_core::ConfiguredParameters;
use tracing::{debug, error, info};

use crate::error::{DbError, DbResult};
use crate::repository::blob::BlobStore;

/// Blob key of the print settings document.
pub const SETTINGS_KEY: &str = "print_settings";

/// Repository for the configured parameters.
#[derive(Debug, Clone)]
pub struct SettingsRepository<S> {
    store: S,
}

impl<S: BlobStore> SettingsRepository<S> {
    /// Creates a new SettingsRepository.
    pub fn new(store: S) -> Self {
        SettingsRepository { store }
    }

    /// Loads the configured parameters.
    pub async fn load(&self) -> DbResult<ConfiguredParameters> {
        let Some(raw) = self.store.get(SETTINGS_KEY).await? else {
            debug!("No print settings stored; nothing is orderable");
            return Ok(ConfiguredParameters::empty());
        };

        serde_json::from_str(&raw).map_err(|e| {
            error!(error = %e, "Print settings are malformed");
            DbError::MalformedSettings(e.to_string())
        })
    }

    /// Replaces the configured parameters.
    pub async fn save(&self, params: &ConfiguredParameters) -> DbResult<()> {
        let raw = serde_json::to_string(params).map_err(|e| DbError::Internal(e.to_string()))?;
        self.store.set(SETTINGS_KEY, &raw).await?;

        info!(
            book_sizes = params.book_size_names().len(),
            "Print settings saved"
        );
        Ok(())
    }
}
