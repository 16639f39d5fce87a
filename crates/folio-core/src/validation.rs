//! # Validation Module
//!
//! Field validators for admin-entered matrices and customer quantities.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Order form / admin panel                                      │
//! │  └── Basic format checks, immediate feedback                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Deserialization                                               │
//! │  └── Required sub-maps present, known extra kinds                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE                                                   │
//! │  └── Money non-negative, fractions within 0..=100%                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use folio_core::money::{Money, Rate};
//! use folio_core::validation::{validate_money, validate_rate};
//!
//! assert!(validate_money("price", Money::from_minor(0)).is_ok());
//! assert!(validate_rate("margin", Rate::from_bps(10_001)).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::{Money, Rate, BPS_SCALE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a configured price.
///
/// ## Rules
/// - Must be non-negative
/// - Zero is allowed (free service)
pub fn validate_money(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a margin or discount fraction in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_rate(field: &str, rate: Rate) -> ValidationResult<()> {
    if !rate.is_fraction() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: BPS_SCALE as i64,
        });
    }

    Ok(())
}

/// Validates a normalized book size name before it becomes a storage key.
///
/// ## Rules
/// - Must not be empty after trimming (a name that is only a parenthesised
///   note normalizes to nothing)
pub fn validate_book_size_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "bookSize".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_money() {
        assert!(validate_money("price", Money::from_minor(0)).is_ok());
        assert!(validate_money("price", Money::from_minor(1099)).is_ok());
        assert!(validate_money("price", Money::from_minor(-1)).is_err());
    }

    #[test]
    fn test_validate_rate() {
        assert!(validate_rate("margin", Rate::from_bps(0)).is_ok());
        assert!(validate_rate("margin", Rate::from_bps(1500)).is_ok());
        assert!(validate_rate("margin", Rate::from_bps(10_000)).is_ok());
        assert!(validate_rate("margin", Rate::from_bps(10_001)).is_err());
    }

    #[test]
    fn test_validate_book_size_name() {
        assert!(validate_book_size_name("رقعی (14×20)").is_ok());
        assert!(validate_book_size_name("   ").is_err());
    }
}
