//! # Money Module
//!
//! Provides the `Money` and `Rate` types used by every price in the engine.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Page prices are tiny, quantities are large:                            │
//! │    0.35 × 450 pages × 1000 copies in f64 drifts by whole units          │
//! │                                                                         │
//! │  OUR SOLUTION: Smallest Currency Unit                                   │
//! │    350 × 450 × 1000 = 157,500,000 exactly                               │
//! │    Every ceil/max in the calculator is done on integers too             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use folio_core::money::{Money, Rate};
//!
//! let per_page = Money::from_minor(350);
//! let per_copy = per_page.checked_mul(200).unwrap();
//! assert_eq!(per_copy.minor(), 70_000);
//!
//! let margin = Rate::from_bps(1500); // 15%
//! assert_eq!(per_copy.checked_apply_rate(margin).unwrap().minor(), 10_500);
//!
//! // Page counts and quantities come from customers: products are checked.
//! assert!(per_page.checked_mul(i64::MAX).is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

/// Basis points in 100%.
pub const BPS_SCALE: u32 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: discounts are computed as positive amounts and
///   subtracted, but intermediate differences may go negative
/// - **Single field tuple struct**: serializes as a bare JSON number, which is
///   exactly what the admin form stores in the matrix blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// let price = Money::from_minor(50_000);
    /// assert_eq!(price.minor(), 50_000);
    /// ```
    #[inline]
    pub const fn from_minor(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the value in the smallest currency unit.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a page count or quantity; `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// let per_copy = Money::from_minor(2_000);
    /// assert_eq!(per_copy.checked_mul(10), Some(Money::from_minor(20_000)));
    /// assert_eq!(per_copy.checked_mul(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_mul(&self, factor: i64) -> Option<Money> {
        match self.0.checked_mul(factor) {
            Some(amount) => Some(Money(amount)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(amount) => Some(Money(amount)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_sub(&self, other: Money) -> Option<Money> {
        match self.0.checked_sub(other.0) {
            Some(amount) => Some(Money(amount)),
            None => None,
        }
    }

    /// Sums `amounts`, or `None` if the total does not fit.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Money> {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, m| acc.checked_add(m))
    }

    /// Returns `rate` of this amount, rounded half-up on integers.
    ///
    /// ## Implementation
    /// `(amount * bps + 5000) / 10000` computed in i128, then narrowed back;
    /// `None` if the result does not fit in i64.
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::money::{Money, Rate};
    ///
    /// let subtotal = Money::from_minor(1_000_005);
    /// let discount = subtotal.checked_apply_rate(Rate::from_bps(1000)).unwrap(); // 10%
    /// assert_eq!(discount.minor(), 100_001); // 100000.5 rounds up
    /// ```
    pub fn checked_apply_rate(&self, rate: Rate) -> Option<Money> {
        let scaled = (self.0 as i128 * rate.bps() as i128 + (BPS_SCALE as i128 / 2))
            .div_euclid(BPS_SCALE as i128);
        i64::try_from(scaled).ok().map(Money)
    }

    /// Divides evenly among `parts`, rounding down.
    ///
    /// Used for the per-copy display price; the remainder is reported by the
    /// caller, never silently redistributed.
    pub fn split_floor(&self, parts: i64) -> Money {
        if parts <= 0 {
            return Money::zero();
        }
        Money(self.0.div_euclid(parts))
    }
}

// =============================================================================
// Rate Type
// =============================================================================

/// A fraction in basis points (1 bps = 0.01%, 10000 bps = 100%).
///
/// Used for the profit margin and quantity discounts. Stored as an integer so
/// the matrix blob never carries a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if the rate lies within 0%..=100%.
    #[inline]
    pub const fn is_fraction(&self) -> bool {
        self.0 <= BPS_SCALE
    }

    /// Returns the rate as a percentage (for display only).
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display groups thousands, without a currency symbol.
///
/// ## Note
/// Currency formatting belongs to the UI; this is for logs.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if self.0 < 0 {
            write!(f, "-{}", grouped)
        } else {
            write!(f, "{}", grouped)
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
