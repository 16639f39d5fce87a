//! # Price Calculation
//!
//! Turns a validated selection and a quantity into a price.
//!
//! ## Calculation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. validate_combination + quantity in [min, max], multiple of step     │
//! │  2. page cost / copy    = bw_price × bw_pages + color_price × color_pages│
//! │  3. binding cost / copy = bindingCosts[binding][cover]                   │
//! │  4. per-copy subtotal   = (2) + (3)                                      │
//! │  5. printing subtotal   = (4) × quantity                                 │
//! │  6. discount            = (5) × highest reached threshold fraction       │
//! │  7. extras              = fixed (once) + variable (perUnit, pageBased)   │
//! │  8. margin              = ((5) − (6) + (7)) × profitMargin               │
//! │  9. grand total         = (5) − (6) + (7) + (8)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The discount never touches extras. Every step is integer arithmetic on
//! [`Money`]; the per-copy display price is the grand total divided by the
//! quantity, rounded down.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::constraints::validate_combination;
use crate::error::{CoreError, CoreResult};
use crate::matrix::{ExtraKind, ExtraServiceConfig, PricingMatrix};
use crate::money::{Money, Rate};
use crate::params::ConfiguredParameters;
use crate::selection::{FullSelection, PrintType, SelectionField};

// =============================================================================
// Breakdown Types
// =============================================================================

/// One billed extra service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExtraLine {
    pub name: String,
    pub kind: ExtraKind,
    pub amount: Money,
}

/// Itemized price of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub quantity: u32,
    pub pages_per_copy: i64,
    pub page_cost_per_copy: Money,
    pub binding_cost_per_copy: Money,
    pub per_copy_subtotal: Money,
    pub printing_subtotal: Money,
    pub discount_rate: Rate,
    pub discount_amount: Money,
    pub fixed_extras: Money,
    pub variable_extras: Money,
    pub extras: Vec<ExtraLine>,
    pub margin_rate: Rate,
    pub margin_amount: Money,
    pub grand_total: Money,
    /// Grand total per copy, rounded down.
    pub unit_price: Money,
}

/// Result of a successful price calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceQuote {
    pub total: Money,
    pub breakdown: PriceBreakdown,
}

// =============================================================================
// Calculator
// =============================================================================

/// Prices selections for one book size.
#[derive(Debug, Clone, Copy)]
pub struct PriceCalculator<'a> {
    params: &'a ConfiguredParameters,
    matrix: &'a PricingMatrix,
}

impl<'a> PriceCalculator<'a> {
    pub fn new(params: &'a ConfiguredParameters, matrix: &'a PricingMatrix) -> Self {
        Self { params, matrix }
    }

    /// Calculates the price of `quantity` copies of `selection`.
    ///
    /// ## Errors
    /// - Any violation [`validate_combination`] reports
    /// - `OutOfRange` on `quantity` when outside `[minimum, maximum]` or not
    ///   a multiple of `step`
    ///
    /// ## Example
    /// ```rust,ignore
    /// let quote = PriceCalculator::new(&params, &matrix).calculate(&selection, 100)?;
    /// println!("{} total, {} per copy", quote.total, quote.breakdown.unit_price);
    /// ```
    pub fn calculate(&self, selection: &FullSelection, quantity: u32) -> CoreResult<PriceQuote> {
        validate_combination(self.params, Some(self.matrix), selection).into_result()?;
        self.check_quantity(quantity)?;

        let page_cost = self
            .matrix
            .page_cost(&selection.paper_type, selection.paper_weight)
            .ok_or_else(|| CoreError::not_configured(SelectionField::PaperWeight, selection.paper_weight))?;
        let binding_cost = self
            .matrix
            .binding_cost(&selection.binding_type, selection.cover_weight)
            .ok_or_else(|| CoreError::not_configured(SelectionField::CoverWeight, selection.cover_weight))?;

        let pages_per_copy = selection.pages.per_copy();
        let too_many_pages = || {
            let dearest = page_cost.bw.max(page_cost.color).minor().max(1);
            CoreError::OutOfRange {
                field: SelectionField::Pages,
                value: pages_per_copy,
                min: 1,
                max: i64::MAX / dearest,
                step: 1,
            }
        };

        let page_cost_per_copy = Money::checked_sum(
            PrintType::ALL
                .into_iter()
                .map(|pt| page_cost.for_type(pt).checked_mul(selection.pages.of(pt) as i64))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(too_many_pages)?,
        )
        .ok_or_else(too_many_pages)?;
        let per_copy_subtotal = page_cost_per_copy
            .checked_add(binding_cost)
            .ok_or_else(too_many_pages)?;

        // Everything below scales with the quantity.
        let too_many_copies = || self.quantity_overflow(quantity, per_copy_subtotal);
        let printing_subtotal = per_copy_subtotal
            .checked_mul(quantity as i64)
            .ok_or_else(too_many_copies)?;

        let discount_rate = self
            .matrix
            .discount_for(quantity)
            .map(|d| d.discount_fraction)
            .unwrap_or_default();
        let discount_amount = printing_subtotal
            .checked_apply_rate(discount_rate)
            .ok_or_else(too_many_copies)?;

        let extras = self.extra_lines(&selection.extras, pages_per_copy, quantity)?;
        let fixed_extras = Money::checked_sum(
            extras
                .iter()
                .filter(|line| line.kind == ExtraKind::Fixed)
                .map(|line| line.amount),
        )
        .ok_or_else(too_many_copies)?;
        let variable_extras = Money::checked_sum(
            extras
                .iter()
                .filter(|line| line.kind != ExtraKind::Fixed)
                .map(|line| line.amount),
        )
        .ok_or_else(too_many_copies)?;

        let margin_rate = self.matrix.profit_margin;
        let before_margin = printing_subtotal
            .checked_sub(discount_amount)
            .and_then(|m| Money::checked_sum([m, fixed_extras, variable_extras]))
            .ok_or_else(too_many_copies)?;
        let margin_amount = before_margin
            .checked_apply_rate(margin_rate)
            .ok_or_else(too_many_copies)?;
        let grand_total = before_margin
            .checked_add(margin_amount)
            .ok_or_else(too_many_copies)?;

        let breakdown = PriceBreakdown {
            quantity,
            pages_per_copy,
            page_cost_per_copy,
            binding_cost_per_copy: binding_cost,
            per_copy_subtotal,
            printing_subtotal,
            discount_rate,
            discount_amount,
            fixed_extras,
            variable_extras,
            extras,
            margin_rate,
            margin_amount,
            grand_total,
            unit_price: grand_total.split_floor(quantity as i64),
        };

        Ok(PriceQuote {
            total: grand_total,
            breakdown,
        })
    }

    fn check_quantity(&self, quantity: u32) -> CoreResult<()> {
        let limits = &self.matrix.quantity_constraints;
        if limits.accepts(quantity) {
            return Ok(());
        }
        Err(CoreError::OutOfRange {
            field: SelectionField::Quantity,
            value: quantity as i64,
            min: limits.minimum as i64,
            max: limits.maximum as i64,
            step: limits.step as i64,
        })
    }

    /// Quantity whose total no longer fits in [`Money`].
    ///
    /// `max` is the largest quantity whose printing subtotal still fits.
    fn quantity_overflow(&self, quantity: u32, per_copy_subtotal: Money) -> CoreError {
        let limits = &self.matrix.quantity_constraints;
        let fitting = i64::MAX / per_copy_subtotal.minor().max(1);
        CoreError::OutOfRange {
            field: SelectionField::Quantity,
            value: quantity as i64,
            min: limits.minimum as i64,
            max: fitting.min(limits.maximum as i64),
            step: limits.step as i64,
        }
    }

    /// Bills each selected extra once, in selection order.
    fn extra_lines(
        &self,
        names: &[String],
        pages_per_copy: i64,
        quantity: u32,
    ) -> CoreResult<Vec<ExtraLine>> {
        let mut lines: Vec<ExtraLine> = Vec::with_capacity(names.len());
        for name in names {
            if lines.iter().any(|line| &line.name == name) {
                continue;
            }
            let config = self
                .matrix
                .extras_costs
                .get(name.as_str())
                .ok_or_else(|| CoreError::not_configured(SelectionField::Extra, name))?;
            let amount = extra_amount(config, pages_per_copy, quantity).ok_or_else(|| {
                CoreError::OutOfRange {
                    field: SelectionField::Quantity,
                    value: quantity as i64,
                    min: self.matrix.quantity_constraints.minimum as i64,
                    max: self.matrix.quantity_constraints.maximum as i64,
                    step: self.matrix.quantity_constraints.step as i64,
                }
            })?;
            lines.push(ExtraLine {
                name: name.clone(),
                kind: config.kind(),
                amount,
            });
        }
        Ok(lines)
    }
}

/// Amount billed for one extra service, or `None` if it does not fit in
/// [`Money`].
///
/// ```text
/// Fixed      price
/// PerUnit    price × quantity
/// PageBased  price × max(1, ceil(pages × quantity / step))
/// ```
pub fn extra_amount(config: &ExtraServiceConfig, pages_per_copy: i64, quantity: u32) -> Option<Money> {
    match *config {
        ExtraServiceConfig::Fixed { price } => Some(price),
        ExtraServiceConfig::PerUnit { price } => price.checked_mul(quantity as i64),
        ExtraServiceConfig::PageBased { price, step } => {
            let total_pages = pages_per_copy.checked_mul(quantity as i64)?;
            let step = (step as i64).max(1);
            let blocks = total_pages / step + i64::from(total_pages % step != 0);
            price.checked_mul(blocks.max(1))
        }
    }
}

/// Convenience wrapper around [`PriceCalculator::calculate`].
pub fn calculate(
    params: &ConfiguredParameters,
    matrix: &PricingMatrix,
    selection: &FullSelection,
    quantity: u32,
) -> CoreResult<PriceQuote> {
    PriceCalculator::new(params, matrix).calculate(selection, quantity)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::selection::{PageCounts, PrintMode};

    fn params() -> ConfiguredParameters {
        ConfiguredParameters::empty()
            .with_book_size("رقعی (14×20)")
            .with_paper_type("تحریر", &[70])
            .with_binding_type("شومیز")
            .with_cover_weight(250)
            .with_extra_service("سلفون")
            .with_extra_service("لب گرد")
            .with_extra_service("شیرینک")
    }

    fn matrix() -> PricingMatrix {
        serde_json::from_str(
            r#"{
                "pageCosts": {"تحریر": {"70": {"bw": 300, "color": 1000}}},
                "bindingCosts": {"شومیز": {"250": 15000}},
                "extrasCosts": {
                    "سلفون": {"kind": "fixed", "price": 50000},
                    "لب گرد": {"kind": "perUnit", "price": 2000},
                    "شیرینک": {"kind": "pageBased", "price": 100000, "step": 4000}
                },
                "profitMargin": 0,
                "quantityConstraints": {"minimum": 1, "maximum": 2000, "step": 1}
            }"#,
        )
        .unwrap()
    }

    fn selection(bw: u32, extras: &[&str]) -> FullSelection {
        FullSelection {
            book_size: "رقعی".to_string(),
            paper_type: "تحریر".to_string(),
            paper_weight: 70,
            print_mode: PrintMode::Bw,
            pages: PageCounts { bw, color: 0 },
            binding_type: "شومیز".to_string(),
            cover_weight: 250,
            extras: extras.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn test_fixed_extra_ignores_quantity() {
        let params = params();
        let matrix = matrix();
        for quantity in [1u32, 10, 1000] {
            let quote = calculate(&params, &matrix, &selection(200, &["سلفون"]), quantity).unwrap();
            assert_eq!(quote.breakdown.fixed_extras, Money::from_minor(50_000));
            assert_eq!(quote.breakdown.variable_extras, Money::zero());
        }
    }

    #[test]
    fn test_per_unit_extra() {
        let config = ExtraServiceConfig::PerUnit {
            price: Money::from_minor(2000),
        };
        assert_eq!(extra_amount(&config, 200, 10), Some(Money::from_minor(20_000)));
    }

    #[test]
    fn test_page_based_extra_rounds_up_blocks() {
        let config = ExtraServiceConfig::PageBased {
            price: Money::from_minor(100_000),
            step: 4000,
        };
        assert_eq!(extra_amount(&config, 200, 10), Some(Money::from_minor(100_000)));
        assert_eq!(extra_amount(&config, 450, 10), Some(Money::from_minor(200_000)));
        assert_eq!(extra_amount(&config, 400, 10), Some(Money::from_minor(100_000)));
        assert_eq!(extra_amount(&config, 1, 1), Some(Money::from_minor(100_000)));
        assert_eq!(extra_amount(&config, i64::MAX, 2), None);
    }

    #[test]
    fn test_combined_extras() {
        let params = params();
        let matrix = matrix();
        let quote = calculate(
            &params,
            &matrix,
            &selection(200, &["سلفون", "لب گرد", "شیرینک"]),
            10,
        )
        .unwrap();

        let b = &quote.breakdown;
        assert_eq!(b.fixed_extras, Money::from_minor(50_000));
        assert_eq!(b.variable_extras, Money::from_minor(120_000));
        assert_eq!(b.extras.len(), 3);
        let extras_total: Money = b.extras.iter().map(|l| l.amount).sum();
        assert_eq!(extras_total, Money::from_minor(170_000));
    }

    #[test]
    fn test_full_breakdown() {
        let params = params();
        let mut matrix = matrix();
        matrix.profit_margin = Rate::from_bps(1000);
        matrix.quantity_discounts = vec![
            crate::matrix::QuantityDiscount {
                threshold_quantity: 10,
                discount_fraction: Rate::from_bps(500),
            },
            crate::matrix::QuantityDiscount {
                threshold_quantity: 100,
                discount_fraction: Rate::from_bps(1000),
            },
        ];

        let quote = calculate(&params, &matrix, &selection(200, &["سلفون"]), 10).unwrap();
        let b = &quote.breakdown;

        // 300 × 200 + 15000
        assert_eq!(b.page_cost_per_copy, Money::from_minor(60_000));
        assert_eq!(b.per_copy_subtotal, Money::from_minor(75_000));
        assert_eq!(b.printing_subtotal, Money::from_minor(750_000));
        assert_eq!(b.discount_rate, Rate::from_bps(500));
        assert_eq!(b.discount_amount, Money::from_minor(37_500));
        // (750000 − 37500 + 50000) × 10%
        assert_eq!(b.margin_amount, Money::from_minor(76_250));
        assert_eq!(b.grand_total, Money::from_minor(838_750));
        assert_eq!(quote.total, b.grand_total);
        assert_eq!(b.unit_price, Money::from_minor(83_875));
    }

    #[test]
    fn test_mixed_mode_bills_both_page_types() {
        let params = params();
        let matrix = matrix();
        let mut sel = selection(180, &[]);
        sel.print_mode = PrintMode::Mixed;
        sel.pages.color = 20;

        let quote = calculate(&params, &matrix, &sel, 1).unwrap();
        assert_eq!(quote.breakdown.page_cost_per_copy, Money::from_minor(300 * 180 + 1000 * 20));
        assert_eq!(quote.breakdown.pages_per_copy, 200);
    }

    #[test]
    fn test_quantity_out_of_range() {
        let params = params();
        let mut matrix = matrix();
        matrix.quantity_constraints.minimum = 10;
        matrix.quantity_constraints.step = 10;

        for quantity in [5u32, 15, 2010] {
            let err = calculate(&params, &matrix, &selection(200, &[]), quantity).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::OutOfRange);
            assert_eq!(err.field(), Some(SelectionField::Quantity));
        }
        assert!(calculate(&params, &matrix, &selection(200, &[]), 20).is_ok());
    }

    #[test]
    fn test_rejected_selection_is_not_priced() {
        let params = params();
        let matrix = matrix();
        let mut sel = selection(200, &[]);
        sel.cover_weight = 300;

        let err = calculate(&params, &matrix, &sel, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotConfigured);
        assert_eq!(err.field(), Some(SelectionField::CoverWeight));
    }

    #[test]
    fn test_duplicate_extra_billed_once() {
        let params = params();
        let matrix = matrix();
        let quote = calculate(&params, &matrix, &selection(200, &["سلفون", "سلفون"]), 1).unwrap();
        assert_eq!(quote.breakdown.extras.len(), 1);
        assert_eq!(quote.breakdown.fixed_extras, Money::from_minor(50_000));
    }

    #[test]
    fn test_huge_page_count_is_out_of_range() {
        let params = params();
        let mut matrix = matrix();
        matrix.quantity_constraints.maximum = 1_000_000;
        matrix.page_costs.get_mut("تحریر").unwrap().get_mut(&70).unwrap().bw = Money::from_minor(3_000);

        // Fits per copy, overflows once multiplied by the quantity.
        let err = calculate(&params, &matrix, &selection(u32::MAX, &[]), 1_000_000).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert_eq!(err.field(), Some(SelectionField::Quantity));

        assert!(calculate(&params, &matrix, &selection(u32::MAX, &[]), 1).is_ok());
    }

    #[test]
    fn test_page_cost_overflow_points_at_pages() {
        let params = params();
        let mut matrix = matrix();
        matrix.page_costs.get_mut("تحریر").unwrap().get_mut(&70).unwrap().bw =
            Money::from_minor(i64::MAX / 2);

        let err = calculate(&params, &matrix, &selection(3, &[]), 1).unwrap_err();
        assert_eq!(err.field(), Some(SelectionField::Pages));
        match err {
            CoreError::OutOfRange { value, max, .. } => {
                assert_eq!(value, 3);
                assert_eq!(max, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_page_based_extra_overflow_points_at_quantity() {
        let params = params();
        let mut matrix = matrix();
        matrix.quantity_constraints.maximum = u32::MAX;
        matrix.extras_costs.insert(
            "شیرینک".to_string(),
            ExtraServiceConfig::PageBased {
                price: Money::from_minor(i64::MAX / 4),
                step: 1,
            },
        );

        let err = calculate(&params, &matrix, &selection(1, &["شیرینک"]), 8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert_eq!(err.field(), Some(SelectionField::Quantity));
    }
}
