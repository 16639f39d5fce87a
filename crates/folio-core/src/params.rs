//! # Configured Parameters
//!
//! The administrator's list of what the shop offers at all: book sizes, paper
//! types with their weights, bindings, cover weights and extra services.
//!
//! A pricing matrix can only price what appears here. An empty list means
//! nothing is orderable; there is no fallback list anywhere.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use ts_rs::TS;

use crate::book_size::BookSizeKey;

/// Read-only view of the print settings.
///
/// Fields are private; callers go through the accessors so book sizes are
/// always compared in normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredParameters {
    #[serde(default)]
    book_sizes: Vec<String>,
    #[serde(default)]
    paper_types: BTreeMap<String, Vec<u32>>,
    #[serde(default)]
    binding_types: Vec<String>,
    #[serde(default)]
    cover_weights: Vec<u32>,
    #[serde(default)]
    extra_services: Vec<String>,
}

impl ConfiguredParameters {
    /// Creates an empty parameter set (nothing orderable).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends a book size (raw name, as the admin typed it).
    pub fn with_book_size(mut self, name: impl Into<String>) -> Self {
        self.book_sizes.push(name.into());
        self
    }

    /// Adds a paper type with its available weights.
    pub fn with_paper_type(mut self, paper: impl Into<String>, weights: &[u32]) -> Self {
        self.paper_types
            .entry(paper.into())
            .or_default()
            .extend_from_slice(weights);
        self
    }

    pub fn with_binding_type(mut self, binding: impl Into<String>) -> Self {
        self.binding_types.push(binding.into());
        self
    }

    pub fn with_cover_weight(mut self, weight: u32) -> Self {
        self.cover_weights.push(weight);
        self
    }

    pub fn with_extra_service(mut self, extra: impl Into<String>) -> Self {
        self.extra_services.push(extra.into());
        self
    }

    /// Raw book size names in admin order.
    pub fn book_size_names(&self) -> &[String] {
        &self.book_sizes
    }

    /// Normalized set of configured book sizes.
    ///
    /// Sizes that normalize to the same key collapse into one entry.
    pub fn configured_book_sizes(&self) -> BTreeSet<BookSizeKey> {
        self.book_sizes
            .iter()
            .map(|name| BookSizeKey::normalize(name))
            .filter(|key| !key.is_empty())
            .collect()
    }

    /// Normalized book sizes in admin order, without duplicates.
    pub fn ordered_book_sizes(&self) -> Vec<BookSizeKey> {
        let mut seen = BTreeSet::new();
        self.book_sizes
            .iter()
            .map(|name| BookSizeKey::normalize(name))
            .filter(|key| !key.is_empty() && seen.insert(key.clone()))
            .collect()
    }

    pub fn is_book_size_configured(&self, key: &BookSizeKey) -> bool {
        self.book_sizes
            .iter()
            .any(|name| &BookSizeKey::normalize(name) == key)
    }

    /// Configured paper types.
    pub fn configured_paper_types(&self) -> impl Iterator<Item = &str> {
        self.paper_types.keys().map(String::as_str)
    }

    /// Configured weights for a paper type (empty if the paper is unknown).
    pub fn weights_for(&self, paper: &str) -> &[u32] {
        self.paper_types
            .get(paper)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_paper_configured(&self, paper: &str) -> bool {
        self.paper_types.contains_key(paper)
    }

    pub fn is_weight_configured(&self, paper: &str, weight: u32) -> bool {
        self.weights_for(paper).contains(&weight)
    }

    pub fn binding_types(&self) -> &[String] {
        &self.binding_types
    }

    pub fn is_binding_configured(&self, binding: &str) -> bool {
        self.binding_types.iter().any(|b| b == binding)
    }

    pub fn cover_weights(&self) -> &[u32] {
        &self.cover_weights
    }

    pub fn is_cover_weight_configured(&self, weight: u32) -> bool {
        self.cover_weights.contains(&weight)
    }

    pub fn extra_services(&self) -> &[String] {
        &self.extra_services
    }

    pub fn is_extra_configured(&self, extra: &str) -> bool {
        self.extra_services.iter().any(|e| e == extra)
    }

    /// Returns true if no book size is configured.
    pub fn is_empty(&self) -> bool {
        self.configured_book_sizes().is_empty()
    }
}
