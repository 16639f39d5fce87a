//! # Constraint Resolution
//!
//! Decides which parameter values are currently orderable for a book size,
//! and whether a complete selection may be priced.
//!
//! ## Usability Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  (paper, weight)     configured ∧ page cost ∧ ≥1 print type allowed     │
//! │                      for THIS weight                                     │
//! │                                                                         │
//! │  (binding, cover)    configured ∧ binding cost ∧ cover not forbidden    │
//! │                                                                         │
//! │  binding             configured ∧ priced ∧ not forbidden                │
//! │                      ∧ ≥1 usable cover weight                            │
//! │                                                                         │
//! │  extra for binding   configured ∧ priced ∧ not forbidden for binding    │
//! │                                                                         │
//! │  book size enabled   configured ∧ parseable matrix                      │
//! │                      ∧ ≥1 usable (paper, weight) ∧ ≥1 usable binding     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Weights with no usable print type never appear in option lists. A binding
//! without a usable cover weight never appears either.
//!
//! ## Combination Checks
//! [`ConstraintResolver::validate`] walks a full selection in a fixed order
//! and stops at the first violation:
//!
//! ```text
//! book size ─► paper ─► weight ─► print mode ─► pages ─► binding ─► cover ─► extras
//! ```
//!
//! It never auto-corrects; it only suggests usable alternatives for the field
//! that failed.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use ts_rs::TS;

use crate::book_size::BookSizeKey;
use crate::error::{CoreError, CoreResult, ErrorKind};
use crate::matrix::PricingMatrix;
use crate::params::ConfiguredParameters;
use crate::selection::{FullSelection, PageCounts, PartialSelection, PrintMode, PrintType, SelectionField};

// =============================================================================
// Results
// =============================================================================

/// Orderable values for one book size, narrowed by the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AllowedOptions {
    /// Usable weights per paper type, ascending.
    pub papers: BTreeMap<String, Vec<u32>>,
    /// Allowed print types for every usable paper weight.
    pub print_types_per_weight: BTreeMap<String, BTreeMap<u32, Vec<PrintType>>>,
    /// Usable bindings, in admin order.
    pub bindings: Vec<String>,
    pub cover_weights: Vec<u32>,
    pub extras: Vec<String>,
}

/// One entry of the book size picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BookSizeAvailability {
    pub size: BookSizeKey,
    pub enabled: bool,
    pub paper_type_count: usize,
    pub binding_type_count: usize,
}

impl BookSizeAvailability {
    /// A configured size that cannot be ordered (no matrix, or unusable).
    pub fn disabled(size: BookSizeKey) -> Self {
        Self {
            size,
            enabled: false,
            paper_type_count: 0,
            binding_type_count: 0,
        }
    }
}

/// Outcome of checking a full selection.
///
/// A rejected verdict is a normal result, not an error: the order form shows
/// the message and the suggestions next to the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CombinationVerdict {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<SelectionField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Usable values for `field`, best first.
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(skip)]
    #[ts(skip)]
    violation: Option<CoreError>,
}

impl CombinationVerdict {
    /// The selection passed every check.
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
            field: None,
            message: None,
            suggestions: Vec::new(),
            violation: None,
        }
    }

    /// The selection failed with `error`.
    pub fn rejected(error: CoreError, suggestions: Vec<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(error.kind()),
            field: error.field(),
            message: Some(error.to_string()),
            suggestions,
            violation: Some(error),
        }
    }

    /// The violation behind a rejected verdict.
    pub fn violation(&self) -> Option<&CoreError> {
        self.violation.as_ref()
    }

    /// Converts the verdict into a result, for callers that must stop.
    pub fn into_result(self) -> CoreResult<()> {
        match self.violation {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Applies the usability rules of one book size.
///
/// Borrows the configured parameters and the size's matrix; holds no state of
/// its own.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintResolver<'a> {
    params: &'a ConfiguredParameters,
    matrix: &'a PricingMatrix,
}

impl<'a> ConstraintResolver<'a> {
    pub fn new(params: &'a ConfiguredParameters, matrix: &'a PricingMatrix) -> Self {
        Self { params, matrix }
    }

    /// Print types allowed for an exact paper weight.
    ///
    /// Empty when the pair is unconfigured or has no page cost.
    pub fn usable_print_types(&self, paper: &str, weight: u32) -> Vec<PrintType> {
        if !self.params.is_weight_configured(paper, weight)
            || self.matrix.page_cost(paper, weight).is_none()
        {
            return Vec::new();
        }
        PrintType::ALL
            .into_iter()
            .filter(|pt| {
                !self
                    .matrix
                    .restrictions
                    .is_print_type_forbidden(paper, weight, *pt)
            })
            .collect()
    }

    /// Usable weights of one paper type, ascending.
    pub fn usable_weights(&self, paper: &str) -> Vec<u32> {
        let weights: BTreeSet<u32> = self.params.weights_for(paper).iter().copied().collect();
        weights
            .into_iter()
            .filter(|w| !self.usable_print_types(paper, *w).is_empty())
            .collect()
    }

    /// Paper types with at least one usable weight.
    pub fn usable_papers(&self) -> BTreeMap<String, Vec<u32>> {
        self.params
            .configured_paper_types()
            .filter_map(|paper| {
                let weights = self.usable_weights(paper);
                (!weights.is_empty()).then(|| (paper.to_string(), weights))
            })
            .collect()
    }

    /// Usable cover weights of one binding, ascending.
    pub fn usable_cover_weights(&self, binding: &str) -> Vec<u32> {
        if !self.params.is_binding_configured(binding) {
            return Vec::new();
        }
        let Some(costs) = self.matrix.binding_costs.get(binding) else {
            return Vec::new();
        };
        costs
            .keys()
            .copied()
            .filter(|cover| {
                self.params.is_cover_weight_configured(*cover)
                    && !self
                        .matrix
                        .restrictions
                        .is_cover_weight_forbidden(binding, *cover)
            })
            .collect()
    }

    pub fn is_binding_usable(&self, binding: &str) -> bool {
        !self.matrix.restrictions.is_binding_forbidden(binding)
            && !self.usable_cover_weights(binding).is_empty()
    }

    /// Usable bindings, in admin order.
    pub fn usable_bindings(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.params
            .binding_types()
            .iter()
            .filter(|b| seen.insert(b.as_str()) && self.is_binding_usable(b))
            .cloned()
            .collect()
    }

    /// Extras usable together with `binding`, in admin order.
    pub fn usable_extras(&self, binding: &str) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.params
            .extra_services()
            .iter()
            .filter(|extra| {
                seen.insert(extra.as_str())
                    && self.matrix.extras_costs.contains_key(extra.as_str())
                    && !self.matrix.restrictions.is_extra_forbidden(binding, extra)
            })
            .cloned()
            .collect()
    }

    /// Option lists for the order form.
    ///
    /// A selected paper type (and weight) narrows the paper lists; a selected
    /// binding narrows cover weights and extras to that binding. Without a
    /// binding, cover weights and extras are the union over usable bindings.
    pub fn allowed_options(&self, current: &PartialSelection) -> AllowedOptions {
        let mut papers = self.usable_papers();
        if let Some(paper) = &current.paper_type {
            papers.retain(|p, _| p == paper);
        }
        if let Some(weight) = current.paper_weight {
            for weights in papers.values_mut() {
                weights.retain(|w| *w == weight);
            }
            papers.retain(|_, weights| !weights.is_empty());
        }

        let print_types_per_weight = papers
            .iter()
            .map(|(paper, weights)| {
                let per_weight = weights
                    .iter()
                    .map(|w| (*w, self.usable_print_types(paper, *w)))
                    .collect();
                (paper.clone(), per_weight)
            })
            .collect();

        let bindings = self.usable_bindings();
        let (cover_weights, extras) = match &current.binding_type {
            Some(binding) if bindings.contains(binding) => {
                (self.usable_cover_weights(binding), self.usable_extras(binding))
            }
            Some(_) => (Vec::new(), Vec::new()),
            None => {
                let covers: BTreeSet<u32> = bindings
                    .iter()
                    .flat_map(|b| self.usable_cover_weights(b))
                    .collect();
                let mut extras: Vec<String> = Vec::new();
                for binding in &bindings {
                    for extra in self.usable_extras(binding) {
                        if !extras.contains(&extra) {
                            extras.push(extra);
                        }
                    }
                }
                (covers.into_iter().collect(), extras)
            }
        };

        AllowedOptions {
            papers,
            print_types_per_weight,
            bindings,
            cover_weights,
            extras,
        }
    }

    /// Picker entry for `size`, assuming this resolver holds its matrix.
    pub fn availability(&self, size: BookSizeKey) -> BookSizeAvailability {
        if !self.params.is_book_size_configured(&size) {
            return BookSizeAvailability::disabled(size);
        }
        let paper_type_count = self.usable_papers().len();
        let binding_type_count = self.usable_bindings().len();
        BookSizeAvailability {
            size,
            enabled: paper_type_count > 0 && binding_type_count > 0,
            paper_type_count,
            binding_type_count,
        }
    }

    /// Checks a full selection against every rule, in order.
    pub fn validate(&self, selection: &FullSelection) -> CombinationVerdict {
        match self.check(selection) {
            Ok(()) => CombinationVerdict::allowed(),
            Err((error, suggestions)) => CombinationVerdict::rejected(error, suggestions),
        }
    }

    fn check(&self, selection: &FullSelection) -> Result<(), (CoreError, Vec<String>)> {
        let key = BookSizeKey::normalize(&selection.book_size);
        if !self.params.is_book_size_configured(&key) {
            return Err((
                CoreError::not_configured(SelectionField::BookSize, &key),
                self.book_size_suggestions(),
            ));
        }

        // Paper type
        let paper = selection.paper_type.as_str();
        let papers = self.usable_papers();
        if !papers.contains_key(paper) {
            let error = if self.params.is_paper_configured(paper)
                && self.matrix.page_costs.contains_key(paper)
            {
                CoreError::forbidden(SelectionField::PaperType, paper, "no weight of this paper can be printed")
            } else {
                CoreError::not_configured(SelectionField::PaperType, paper)
            };
            return Err((error, papers.into_keys().collect()));
        }

        // Weight
        let weight = selection.paper_weight;
        let usable_types = self.usable_print_types(paper, weight);
        if usable_types.is_empty() {
            let error = if self.params.is_weight_configured(paper, weight)
                && self.matrix.page_cost(paper, weight).is_some()
            {
                CoreError::forbidden(SelectionField::PaperWeight, weight, "every print type is disabled for this weight")
            } else {
                CoreError::not_configured(SelectionField::PaperWeight, weight)
            };
            return Err((error, to_strings(&papers[paper])));
        }

        // Print mode
        if let Some(missing) = selection
            .print_mode
            .required_print_types()
            .iter()
            .find(|pt| !usable_types.contains(pt))
        {
            return Err((
                CoreError::forbidden(
                    SelectionField::PrintType,
                    missing,
                    format!("{} printing is disabled for {} {}g", missing, paper, weight),
                ),
                to_strings(&usable_types),
            ));
        }

        check_pages(selection.print_mode, &selection.pages).map_err(|e| (e, Vec::new()))?;

        // Binding
        let binding = selection.binding_type.as_str();
        let bindings = self.usable_bindings();
        if !bindings.iter().any(|b| b == binding) {
            let error = if !self.params.is_binding_configured(binding)
                || !self.matrix.binding_costs.contains_key(binding)
            {
                CoreError::not_configured(SelectionField::BindingType, binding)
            } else if self.matrix.restrictions.is_binding_forbidden(binding) {
                CoreError::forbidden(SelectionField::BindingType, binding, "binding is disabled for this book size")
            } else {
                CoreError::forbidden(SelectionField::BindingType, binding, "no cover weight is available for this binding")
            };
            return Err((error, bindings));
        }

        // Cover weight
        let cover = selection.cover_weight;
        let covers = self.usable_cover_weights(binding);
        if !covers.contains(&cover) {
            let error = if self.params.is_cover_weight_configured(cover)
                && self.matrix.binding_cost(binding, cover).is_some()
            {
                CoreError::forbidden(SelectionField::CoverWeight, cover, format!("cover weight is disabled for {}", binding))
            } else {
                CoreError::not_configured(SelectionField::CoverWeight, cover)
            };
            return Err((error, to_strings(&covers)));
        }

        // Extras
        let extras = self.usable_extras(binding);
        for extra in &selection.extras {
            if extras.contains(extra) {
                continue;
            }
            let error = if self.params.is_extra_configured(extra)
                && self.matrix.extras_costs.contains_key(extra.as_str())
            {
                CoreError::forbidden(SelectionField::Extra, extra, format!("not available with {}", binding))
            } else {
                CoreError::not_configured(SelectionField::Extra, extra)
            };
            return Err((error, extras));
        }

        Ok(())
    }

    fn book_size_suggestions(&self) -> Vec<String> {
        self.params
            .ordered_book_sizes()
            .into_iter()
            .map(BookSizeKey::into_string)
            .collect()
    }
}

// =============================================================================
// Free Functions
// =============================================================================

/// Checks a selection when the size's matrix may be missing.
///
/// A configured size without a matrix is reported as not configured: there is
/// nothing to price it with.
pub fn validate_combination(
    params: &ConfiguredParameters,
    matrix: Option<&PricingMatrix>,
    selection: &FullSelection,
) -> CombinationVerdict {
    let key = BookSizeKey::normalize(&selection.book_size);
    match matrix {
        Some(matrix) => ConstraintResolver::new(params, matrix).validate(selection),
        None => {
            let suggestions = params
                .ordered_book_sizes()
                .into_iter()
                .filter(|k| k != &key)
                .map(BookSizeKey::into_string)
                .collect();
            CombinationVerdict::rejected(
                CoreError::not_configured(SelectionField::BookSize, &key),
                suggestions,
            )
        }
    }
}

/// Page counts must match the print mode.
///
/// `bw` needs black-and-white pages only, `color` needs color pages only and
/// `mixed` needs some of each.
pub fn check_pages(mode: PrintMode, pages: &PageCounts) -> CoreResult<()> {
    let (required, forbidden): (&[PrintType], &[PrintType]) = match mode {
        PrintMode::Bw => (&[PrintType::Bw], &[PrintType::Color]),
        PrintMode::Color => (&[PrintType::Color], &[PrintType::Bw]),
        PrintMode::Mixed => (&PrintType::ALL, &[]),
    };

    for pt in required {
        if pages.of(*pt) == 0 {
            return Err(CoreError::OutOfRange {
                field: SelectionField::Pages,
                value: 0,
                min: 1,
                max: u32::MAX as i64,
                step: 1,
            });
        }
    }
    for pt in forbidden {
        let count = pages.of(*pt);
        if count > 0 {
            return Err(CoreError::OutOfRange {
                field: SelectionField::Pages,
                value: count as i64,
                min: 0,
                max: 0,
                step: 1,
            });
        }
    }

    Ok(())
}

fn to_strings<T: ToString>(values: &[T]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ConfiguredParameters {
        ConfiguredParameters::empty()
            .with_book_size("رقعی (14×20)")
            .with_book_size("وزیری (17×24)")
            .with_paper_type("تحریر", &[70, 80, 100])
            .with_paper_type("گلاسه", &[135])
            .with_binding_type("شومیز")
            .with_binding_type("گالینگور")
            .with_binding_type("سیمی")
            .with_cover_weight(250)
            .with_cover_weight(300)
            .with_extra_service("سلفون")
            .with_extra_service("لب گرد")
    }

    fn matrix() -> PricingMatrix {
        serde_json::from_str(
            r#"{
                "pageCosts": {
                    "تحریر": {
                        "70": {"bw": 300, "color": 1000},
                        "80": {"bw": 350, "color": 1100},
                        "100": {"bw": 400, "color": 1200}
                    }
                },
                "bindingCosts": {
                    "شومیز": {"250": 15000, "300": 17000},
                    "گالینگور": {"300": 60000},
                    "سیمی": {"250": 9000}
                },
                "extrasCosts": {
                    "سلفون": {"kind": "fixed", "price": 50000},
                    "لب گرد": {"kind": "perUnit", "price": 2000}
                },
                "restrictions": {
                    "forbiddenPrintTypes": {
                        "تحریر": {"70": ["color"], "80": ["bw", "color"]}
                    },
                    "forbiddenBindingTypes": ["سیمی"],
                    "forbiddenCoverWeights": {"گالینگور": [300]},
                    "forbiddenExtras": {"شومیز": ["لب گرد"]}
                },
                "profitMargin": 1000,
                "quantityConstraints": {"minimum": 1, "maximum": 1000, "step": 1}
            }"#,
        )
        .unwrap()
    }

    fn selection() -> FullSelection {
        FullSelection {
            book_size: "رقعی".to_string(),
            paper_type: "تحریر".to_string(),
            paper_weight: 100,
            print_mode: PrintMode::Mixed,
            pages: PageCounts { bw: 180, color: 20 },
            binding_type: "شومیز".to_string(),
            cover_weight: 250,
            extras: vec!["سلفون".to_string()],
        }
    }

    #[test]
    fn test_print_restrictions_are_per_weight() {
        let params = params();
        let matrix = matrix();
        let resolver = ConstraintResolver::new(&params, &matrix);

        let options = resolver.allowed_options(&PartialSelection::default());
        assert_eq!(options.papers["تحریر"], vec![70, 100]);
        let per_weight = &options.print_types_per_weight["تحریر"];
        assert!(!per_weight.contains_key(&80));
        assert_eq!(per_weight[&70], vec![PrintType::Bw]);
        assert_eq!(per_weight[&100], vec![PrintType::Bw, PrintType::Color]);
    }

    #[test]
    fn test_unpriced_paper_is_excluded() {
        let params = params();
        let matrix = matrix();
        let options = ConstraintResolver::new(&params, &matrix).allowed_options(&PartialSelection::default());
        assert!(!options.papers.contains_key("گلاسه"));
    }

    #[test]
    fn test_bindings_need_a_usable_cover() {
        let params = params();
        let matrix = matrix();
        let resolver = ConstraintResolver::new(&params, &matrix);

        // گالینگور: only cover weight forbidden. سیمی: binding forbidden.
        assert_eq!(resolver.usable_bindings(), vec!["شومیز".to_string()]);
        let options = resolver.allowed_options(&PartialSelection::default());
        assert_eq!(options.cover_weights, vec![250, 300]);
        assert_eq!(options.extras, vec!["سلفون".to_string()]);
    }

    #[test]
    fn test_selection_narrows_options() {
        let params = params();
        let matrix = matrix();
        let resolver = ConstraintResolver::new(&params, &matrix);

        let current = PartialSelection {
            paper_type: Some("تحریر".to_string()),
            paper_weight: Some(70),
            binding_type: Some("گالینگور".to_string()),
            ..Default::default()
        };
        let options = resolver.allowed_options(&current);
        assert_eq!(options.papers.len(), 1);
        assert_eq!(options.papers["تحریر"], vec![70]);
        assert!(options.cover_weights.is_empty());
        assert!(options.extras.is_empty());
    }

    #[test]
    fn test_availability_counts() {
        let params = params();
        let matrix = matrix();
        let resolver = ConstraintResolver::new(&params, &matrix);

        let entry = resolver.availability(BookSizeKey::normalize("رقعی"));
        assert!(entry.enabled);
        assert_eq!(entry.paper_type_count, 1);
        assert_eq!(entry.binding_type_count, 1);

        let entry = resolver.availability(BookSizeKey::normalize("خشتی"));
        assert!(!entry.enabled);
    }

    #[test]
    fn test_availability_disabled_without_usable_binding() {
        let params = params();
        let mut matrix = matrix();
        matrix
            .restrictions
            .forbidden_binding_types
            .insert("شومیز".to_string());

        let entry = ConstraintResolver::new(&params, &matrix).availability(BookSizeKey::normalize("رقعی"));
        assert!(!entry.enabled);
        assert_eq!(entry.paper_type_count, 1);
        assert_eq!(entry.binding_type_count, 0);
    }

    #[test]
    fn test_valid_selection_is_allowed() {
        let params = params();
        let matrix = matrix();
        let verdict = validate_combination(&params, Some(&matrix), &selection());
        assert!(verdict.allowed, "{:?}", verdict.message);
        assert!(verdict.into_result().is_ok());
    }

    #[test]
    fn test_forbidden_weight_suggests_other_weights() {
        let params = params();
        let matrix = matrix();
        let mut sel = selection();
        sel.paper_weight = 80;

        let verdict = validate_combination(&params, Some(&matrix), &sel);
        assert!(!verdict.allowed);
        assert_eq!(verdict.reason, Some(ErrorKind::Forbidden));
        assert_eq!(verdict.field, Some(SelectionField::PaperWeight));
        assert_eq!(verdict.suggestions, vec!["70".to_string(), "100".to_string()]);
    }

    #[test]
    fn test_print_mode_checked_against_weight() {
        let params = params();
        let matrix = matrix();
        let mut sel = selection();
        sel.paper_weight = 70;

        let verdict = validate_combination(&params, Some(&matrix), &sel);
        assert_eq!(verdict.field, Some(SelectionField::PrintType));
        assert_eq!(verdict.reason, Some(ErrorKind::Forbidden));
        assert_eq!(verdict.suggestions, vec!["bw".to_string()]);
    }

    #[test]
    fn test_page_counts_must_match_mode() {
        let params = params();
        let matrix = matrix();
        let mut sel = selection();
        sel.print_mode = PrintMode::Bw;

        let verdict = validate_combination(&params, Some(&matrix), &sel);
        assert_eq!(verdict.field, Some(SelectionField::Pages));
        assert_eq!(verdict.reason, Some(ErrorKind::OutOfRange));

        assert!(check_pages(PrintMode::Mixed, &PageCounts { bw: 10, color: 0 }).is_err());
        assert!(check_pages(PrintMode::Color, &PageCounts { bw: 0, color: 8 }).is_ok());
    }

    #[test]
    fn test_first_violation_wins() {
        let params = params();
        let matrix = matrix();
        let mut sel = selection();
        sel.binding_type = "سیمی".to_string();
        sel.extras = vec!["نامعلوم".to_string()];

        let verdict = validate_combination(&params, Some(&matrix), &sel);
        assert_eq!(verdict.field, Some(SelectionField::BindingType));
        assert_eq!(verdict.reason, Some(ErrorKind::Forbidden));
        assert_eq!(verdict.suggestions, vec!["شومیز".to_string()]);
    }

    #[test]
    fn test_extra_forbidden_for_binding() {
        let params = params();
        let matrix = matrix();
        let mut sel = selection();
        sel.extras.push("لب گرد".to_string());

        let verdict = validate_combination(&params, Some(&matrix), &sel);
        assert_eq!(verdict.field, Some(SelectionField::Extra));
        assert_eq!(verdict.reason, Some(ErrorKind::Forbidden));
    }

    #[test]
    fn test_missing_matrix_is_not_configured() {
        let params = params();
        let mut sel = selection();
        sel.book_size = "وزیری (17×24)".to_string();

        let verdict = validate_combination(&params, None, &sel);
        assert_eq!(verdict.reason, Some(ErrorKind::NotConfigured));
        assert_eq!(verdict.field, Some(SelectionField::BookSize));
        assert_eq!(verdict.suggestions, vec!["رقعی".to_string()]);
    }

    #[test]
    fn test_unconfigured_book_size() {
        let params = params();
        let matrix = matrix();
        let mut sel = selection();
        sel.book_size = "خشتی".to_string();

        let verdict = validate_combination(&params, Some(&matrix), &sel);
        assert_eq!(verdict.reason, Some(ErrorKind::NotConfigured));
        assert_eq!(
            verdict.message.as_deref(),
            Some("book size 'خشتی' is not configured")
        );
    }

    #[test]
    fn test_verdict_wire_format() {
        let json = serde_json::to_value(CombinationVerdict::allowed()).unwrap();
        assert_eq!(json, serde_json::json!({"allowed": true, "suggestions": []}));
    }
}
