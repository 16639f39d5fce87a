//! # folio-core: Pure Pricing Logic for Folio
//!
//! This crate is the **heart** of the Folio pricing engine. It holds the
//! pricing matrix model and every pricing and availability rule as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Folio Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Order form / admin panel (any transport)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    folio-engine (PricingEngine)                 │   │
//! │  │   calculate_price, get_allowed_options, validate_combination    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ folio-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌─────────────┐  ┌──────────┐  │   │
//! │  │   │  matrix   │  │   money   │  │ constraints │  │ pricing  │  │   │
//! │  │   │  params   │  │   Money   │  │  Resolver   │  │Calculator│  │   │
//! │  │   │ book_size │  │   Rate    │  │  Verdict    │  │Breakdown │  │   │
//! │  │   └───────────┘  └───────────┘  └─────────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO ASYNC • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    folio-db (Persistence Layer)                 │   │
//! │  │          SQLite blob store, matrix store, settings, cache       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`book_size`] - Book size name normalization (`BookSizeKey`)
//! - [`money`] - Money and Rate with integer arithmetic
//! - [`matrix`] - The per-size pricing matrix and its validation
//! - [`params`] - Admin-configured parameter lists
//! - [`selection`] - Partial and full order selections
//! - [`constraints`] - Availability rules and combination checks
//! - [`pricing`] - Price calculation and breakdown
//! - [`error`] - Domain error types
//! - [`validation`] - Field validators
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same matrix + same selection = same price
//! 2. **No I/O**: storage, caching and logging sinks live in other crates
//! 3. **Integer Money**: every amount is in the smallest currency unit
//! 4. **No Defaults**: unconfigured means unavailable, never a fallback list
//!
//! ## Example Usage
//!
//! ```rust
//! use folio_core::BookSizeKey;
//! use folio_core::money::{Money, Rate};
//!
//! let key = BookSizeKey::normalize("رقعی (14×20)");
//! assert_eq!(key.as_str(), "رقعی");
//!
//! let subtotal = Money::from_minor(750_000);
//! let discount = subtotal.checked_apply_rate(Rate::from_bps(500));
//! assert_eq!(discount, Some(Money::from_minor(37_500)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod book_size;
pub mod constraints;
pub mod error;
pub mod matrix;
pub mod money;
pub mod params;
pub mod pricing;
pub mod selection;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use folio_core::Money` instead of
// `use folio_core::money::Money`

pub use book_size::{normalize, BookSizeKey};
pub use constraints::{
    validate_combination, AllowedOptions, BookSizeAvailability, CombinationVerdict,
    ConstraintResolver,
};
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use matrix::{
    ExtraKind, ExtraServiceConfig, PageCost, PricingMatrix, QuantityConstraints,
    QuantityDiscount, RestrictionSet,
};
pub use money::{Money, Rate};
pub use params::ConfiguredParameters;
pub use pricing::{ExtraLine, PriceBreakdown, PriceCalculator, PriceQuote};
pub use selection::{
    FullSelection, PageCounts, PartialSelection, PrintMode, PrintType, SelectionField,
};
