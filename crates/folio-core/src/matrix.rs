//! # Pricing Matrix
//!
//! The full admin-configured cost and restriction dataset for one book size.
//!
//! ## Shape
//! ```text
//! PricingMatrix
//! ├── pageCosts          paper ─► weight ─► {bw, color}     per single page
//! ├── bindingCosts       binding ─► cover weight ─► amount  per copy
//! ├── extrasCosts        name ─► {kind: fixed|perUnit|pageBased, price, step}
//! ├── restrictions
//! │   ├── forbiddenPrintTypes    paper ─► weight ─► {bw, color}
//! │   ├── forbiddenBindingTypes  {binding}
//! │   ├── forbiddenCoverWeights  binding ─► {cover weight}
//! │   └── forbiddenExtras        binding ─► {extra}
//! ├── profitMargin       bps
//! ├── quantityDiscounts  [{thresholdQuantity, discountFraction}]
//! └── quantityConstraints {minimum, maximum, step}
//! ```
//!
//! Print-type restrictions are keyed per individual weight. Storing them per
//! paper type makes every weight of that paper share one restriction state,
//! which is exactly the shape that used to reset on save.
//!
//! Saves replace the whole matrix; there are no partial patches.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{Money, Rate};
use crate::selection::PrintType;
use crate::validation::{validate_money, validate_rate, ValidationResult};

// =============================================================================
// Cost Entries
// =============================================================================

/// Price of one printed page for a paper/weight pair.
///
/// Already includes paper and printing; there is no separate multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PageCost {
    pub bw: Money,
    pub color: Money,
}

impl PageCost {
    /// Price for the given print type.
    pub fn for_type(&self, print_type: PrintType) -> Money {
        match print_type {
            PrintType::Bw => self.bw,
            PrintType::Color => self.color,
        }
    }
}

/// How an extra service is billed.
///
/// ## Billing Kinds
/// ```text
/// fixed      price once per order, whatever the quantity
/// perUnit    price × quantity
/// pageBased  price × max(1, ceil(pagesPerCopy × quantity / step))
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExtraServiceConfig {
    Fixed { price: Money },
    PerUnit { price: Money },
    PageBased { price: Money, step: u32 },
}

impl ExtraServiceConfig {
    /// The configured unit price.
    pub fn price(&self) -> Money {
        match self {
            ExtraServiceConfig::Fixed { price }
            | ExtraServiceConfig::PerUnit { price }
            | ExtraServiceConfig::PageBased { price, .. } => *price,
        }
    }

    /// The billing kind, without its parameters.
    pub fn kind(&self) -> ExtraKind {
        match self {
            ExtraServiceConfig::Fixed { .. } => ExtraKind::Fixed,
            ExtraServiceConfig::PerUnit { .. } => ExtraKind::PerUnit,
            ExtraServiceConfig::PageBased { .. } => ExtraKind::PageBased,
        }
    }

    /// Returns true for invoice-level charges.
    pub fn is_fixed(&self) -> bool {
        matches!(self, ExtraServiceConfig::Fixed { .. })
    }
}

/// Billing kind of an extra service, as reported on a price breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum ExtraKind {
    Fixed,
    PerUnit,
    PageBased,
}

/// A threshold-based discount on the per-copy subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuantityDiscount {
    pub threshold_quantity: u32,
    pub discount_fraction: Rate,
}

/// Orderable quantities: `minimum..=maximum`, multiples of `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuantityConstraints {
    pub minimum: u32,
    pub maximum: u32,
    pub step: u32,
}

impl QuantityConstraints {
    /// Returns true if `quantity` may be ordered.
    pub fn accepts(&self, quantity: u32) -> bool {
        self.step > 0
            && quantity >= self.minimum
            && quantity <= self.maximum
            && quantity % self.step == 0
    }
}

// =============================================================================
// Restrictions
// =============================================================================

/// Explicit disablements of otherwise-configured combinations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RestrictionSet {
    #[serde(default)]
    pub forbidden_print_types: BTreeMap<String, BTreeMap<u32, BTreeSet<PrintType>>>,
    #[serde(default)]
    pub forbidden_binding_types: BTreeSet<String>,
    #[serde(default)]
    pub forbidden_cover_weights: BTreeMap<String, BTreeSet<u32>>,
    #[serde(default)]
    pub forbidden_extras: BTreeMap<String, BTreeSet<String>>,
}

impl RestrictionSet {
    /// Returns true if `print_type` is disabled for this exact paper weight.
    pub fn is_print_type_forbidden(&self, paper: &str, weight: u32, print_type: PrintType) -> bool {
        self.forbidden_print_types
            .get(paper)
            .and_then(|weights| weights.get(&weight))
            .is_some_and(|types| types.contains(&print_type))
    }

    pub fn is_binding_forbidden(&self, binding: &str) -> bool {
        self.forbidden_binding_types.contains(binding)
    }

    pub fn is_cover_weight_forbidden(&self, binding: &str, cover_weight: u32) -> bool {
        self.forbidden_cover_weights
            .get(binding)
            .is_some_and(|weights| weights.contains(&cover_weight))
    }

    pub fn is_extra_forbidden(&self, binding: &str, extra: &str) -> bool {
        self.forbidden_extras
            .get(binding)
            .is_some_and(|extras| extras.contains(extra))
    }
}

// =============================================================================
// Pricing Matrix
// =============================================================================

/// The pricing dataset for one book size.
///
/// `pageCosts`, `bindingCosts`, `profitMargin` and `quantityConstraints` are
/// required: a stored blob without them fails to deserialize and is treated
/// as malformed, never filled in with defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingMatrix {
    pub page_costs: BTreeMap<String, BTreeMap<u32, PageCost>>,
    pub binding_costs: BTreeMap<String, BTreeMap<u32, Money>>,
    #[serde(default)]
    pub extras_costs: BTreeMap<String, ExtraServiceConfig>,
    #[serde(default)]
    pub restrictions: RestrictionSet,
    pub profit_margin: Rate,
    #[serde(default)]
    pub quantity_discounts: Vec<QuantityDiscount>,
    pub quantity_constraints: QuantityConstraints,
}

impl PricingMatrix {
    /// Page cost entry for a paper/weight pair.
    pub fn page_cost(&self, paper: &str, weight: u32) -> Option<&PageCost> {
        self.page_costs.get(paper).and_then(|w| w.get(&weight))
    }

    /// Per-copy binding cost for a binding/cover-weight pair.
    pub fn binding_cost(&self, binding: &str, cover_weight: u32) -> Option<Money> {
        self.binding_costs
            .get(binding)
            .and_then(|w| w.get(&cover_weight))
            .copied()
    }

    /// Discount whose threshold is the highest one not above `quantity`.
    ///
    /// Evaluated highest-threshold-first regardless of stored order.
    pub fn discount_for(&self, quantity: u32) -> Option<&QuantityDiscount> {
        self.quantity_discounts
            .iter()
            .filter(|d| d.threshold_quantity <= quantity)
            .max_by_key(|d| d.threshold_quantity)
    }

    /// Validates an admin-submitted matrix before it is persisted.
    ///
    /// ## Rules
    /// - No negative money anywhere
    /// - Margin and discount fractions within 0%..=100%
    /// - `minimum >= 1`, `maximum >= minimum`, `step >= 1`
    /// - Page-based extras need `step >= 1`
    /// - Discount thresholds are positive and unique
    pub fn validate(&self) -> ValidationResult<()> {
        for (paper, weights) in &self.page_costs {
            for (weight, cost) in weights {
                validate_money(&format!("pageCosts.{}.{}.bw", paper, weight), cost.bw)?;
                validate_money(&format!("pageCosts.{}.{}.color", paper, weight), cost.color)?;
            }
        }

        for (binding, covers) in &self.binding_costs {
            for (cover, cost) in covers {
                validate_money(&format!("bindingCosts.{}.{}", binding, cover), *cost)?;
            }
        }

        for (name, extra) in &self.extras_costs {
            validate_money(&format!("extrasCosts.{}.price", name), extra.price())?;
            if let ExtraServiceConfig::PageBased { step, .. } = extra {
                if *step == 0 {
                    return Err(ValidationError::MustBePositive {
                        field: format!("extrasCosts.{}.step", name),
                    });
                }
            }
        }

        validate_rate("profitMargin", self.profit_margin)?;

        let mut thresholds = BTreeSet::new();
        for discount in &self.quantity_discounts {
            if discount.threshold_quantity == 0 {
                return Err(ValidationError::MustBePositive {
                    field: "quantityDiscounts.thresholdQuantity".to_string(),
                });
            }
            if !thresholds.insert(discount.threshold_quantity) {
                return Err(ValidationError::Duplicate {
                    field: "quantityDiscounts.thresholdQuantity".to_string(),
                    value: discount.threshold_quantity.to_string(),
                });
            }
            validate_rate("quantityDiscounts.discountFraction", discount.discount_fraction)?;
        }

        let limits = &self.quantity_constraints;
        if limits.minimum == 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantityConstraints.minimum".to_string(),
            });
        }
        if limits.step == 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantityConstraints.step".to_string(),
            });
        }
        if limits.maximum < limits.minimum {
            return Err(ValidationError::OutOfRange {
                field: "quantityConstraints.maximum".to_string(),
                min: limits.minimum as i64,
                max: u32::MAX as i64,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PricingMatrix {
        serde_json::from_str(
            r#"{
                "pageCosts": {"تحریر": {"70": {"bw": 350, "color": 1200}}},
                "bindingCosts": {"شومیز": {"250": 15000}},
                "extrasCosts": {
                    "سلفون": {"kind": "fixed", "price": 50000},
                    "لب گرد": {"kind": "perUnit", "price": 2000},
                    "شیرینک": {"kind": "pageBased", "price": 100000, "step": 4000}
                },
                "restrictions": {
                    "forbiddenPrintTypes": {"تحریر": {"70": ["color"]}}
                },
                "profitMargin": 1500,
                "quantityDiscounts": [
                    {"thresholdQuantity": 100, "discountFraction": 500},
                    {"thresholdQuantity": 500, "discountFraction": 1000}
                ],
                "quantityConstraints": {"minimum": 10, "maximum": 5000, "step": 10}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_matrix_wire_format() {
        let matrix = sample();
        assert_eq!(matrix.page_cost("تحریر", 70).unwrap().bw, Money::from_minor(350));
        assert_eq!(matrix.binding_cost("شومیز", 250), Some(Money::from_minor(15000)));
        assert_eq!(
            matrix.extras_costs["شیرینک"],
            ExtraServiceConfig::PageBased {
                price: Money::from_minor(100000),
                step: 4000
            }
        );
        assert!(matrix
            .restrictions
            .is_print_type_forbidden("تحریر", 70, PrintType::Color));
        assert!(!matrix
            .restrictions
            .is_print_type_forbidden("تحریر", 70, PrintType::Bw));
        assert!(matrix.validate().is_ok());
    }

    #[test]
    fn test_missing_required_submap_fails_to_parse() {
        let result: Result<PricingMatrix, _> = serde_json::from_str(
            r#"{"bindingCosts": {}, "profitMargin": 0,
                "quantityConstraints": {"minimum": 1, "maximum": 10, "step": 1}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_extra_kind_fails_to_parse() {
        let result: Result<ExtraServiceConfig, _> =
            serde_json::from_str(r#"{"kind": "perPage", "price": 10}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_discount_picks_highest_reached_threshold() {
        let mut matrix = sample();
        matrix.quantity_discounts.reverse();
        assert!(matrix.discount_for(99).is_none());
        assert_eq!(matrix.discount_for(100).unwrap().threshold_quantity, 100);
        assert_eq!(matrix.discount_for(499).unwrap().threshold_quantity, 100);
        assert_eq!(matrix.discount_for(2000).unwrap().threshold_quantity, 500);
    }

    #[test]
    fn test_quantity_constraints() {
        let limits = sample().quantity_constraints;
        assert!(limits.accepts(10));
        assert!(limits.accepts(5000));
        assert!(!limits.accepts(5));
        assert!(!limits.accepts(15));
        assert!(!limits.accepts(5010));
    }

    #[test]
    fn test_validate_rejects_bad_matrices() {
        let mut matrix = sample();
        matrix.profit_margin = Rate::from_bps(10_001);
        assert!(matrix.validate().is_err());

        let mut matrix = sample();
        matrix.quantity_constraints.maximum = 5;
        assert!(matrix.validate().is_err());

        let mut matrix = sample();
        matrix.quantity_constraints.step = 0;
        assert!(matrix.validate().is_err());

        let mut matrix = sample();
        matrix.extras_costs.insert(
            "bad".to_string(),
            ExtraServiceConfig::PageBased {
                price: Money::from_minor(10),
                step: 0,
            },
        );
        assert!(matrix.validate().is_err());

        let mut matrix = sample();
        matrix.quantity_discounts.push(QuantityDiscount {
            threshold_quantity: 100,
            discount_fraction: Rate::from_bps(200),
        });
        assert!(matches!(
            matrix.validate(),
            Err(ValidationError::Duplicate { .. })
        ));

        let mut matrix = sample();
        matrix
            .binding_costs
            .get_mut("شومیز")
            .unwrap()
            .insert(300, Money::from_minor(-1));
        assert!(matches!(matrix.validate(), Err(ValidationError::Negative { .. })));
    }
}
