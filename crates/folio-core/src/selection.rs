//! # Order Selections
//!
//! What the order form sends: a partial selection while the customer is still
//! choosing, a full selection once every parameter is picked.
//!
//! ## Selection Flow
//! ```text
//! book size ─► paper type ─► weight ─► print type ─► binding ─► cover
//!     └──────────── PartialSelection (drives allowed_options) ────────┘
//!                                   │
//!                                   ▼
//!          + pages + extras ─► FullSelection ─► validate ─► calculate
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Print Types
// =============================================================================

/// Per-page print type, as priced and restricted in the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PrintType {
    /// Black and white.
    Bw,
    /// Full color.
    Color,
}

impl PrintType {
    /// Both print types, in display order.
    pub const ALL: [PrintType; 2] = [PrintType::Bw, PrintType::Color];
}

impl fmt::Display for PrintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintType::Bw => f.write_str("bw"),
            PrintType::Color => f.write_str("color"),
        }
    }
}

/// Order-level print mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PrintMode {
    /// Every page black and white.
    Bw,
    /// Every page in color.
    Color,
    /// Some pages of each; both page counts are billed.
    Mixed,
}

impl PrintMode {
    /// Print types this mode needs to be enabled for the chosen weight.
    pub fn required_print_types(&self) -> &'static [PrintType] {
        match self {
            PrintMode::Bw => &[PrintType::Bw],
            PrintMode::Color => &[PrintType::Color],
            PrintMode::Mixed => &PrintType::ALL,
        }
    }
}

impl fmt::Display for PrintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintMode::Bw => f.write_str("bw"),
            PrintMode::Color => f.write_str("color"),
            PrintMode::Mixed => f.write_str("mixed"),
        }
    }
}

/// Page counts of one copy, split by print type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PageCounts {
    #[serde(default)]
    pub bw: u32,
    #[serde(default)]
    pub color: u32,
}

impl PageCounts {
    /// Pages in one copy.
    pub fn per_copy(&self) -> i64 {
        self.bw as i64 + self.color as i64
    }

    /// Pages of the given print type.
    pub fn of(&self, print_type: PrintType) -> u32 {
        match print_type {
            PrintType::Bw => self.bw,
            PrintType::Color => self.color,
        }
    }
}

// =============================================================================
// Selection Fields
// =============================================================================

/// Names the part of a selection a verdict or error points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum SelectionField {
    BookSize,
    PaperType,
    PaperWeight,
    PrintType,
    Pages,
    BindingType,
    CoverWeight,
    Extra,
    Quantity,
}

impl fmt::Display for SelectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SelectionField::BookSize => "book size",
            SelectionField::PaperType => "paper type",
            SelectionField::PaperWeight => "paper weight",
            SelectionField::PrintType => "print type",
            SelectionField::Pages => "pages",
            SelectionField::BindingType => "binding type",
            SelectionField::CoverWeight => "cover weight",
            SelectionField::Extra => "extra service",
            SelectionField::Quantity => "quantity",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Selections
// =============================================================================

/// What the customer has picked so far.
///
/// Every field is optional; `allowed_options` narrows its answer by the
/// fields that are present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PartialSelection {
    #[serde(default)]
    pub paper_type: Option<String>,
    #[serde(default)]
    pub paper_weight: Option<u32>,
    #[serde(default)]
    pub print_type: Option<PrintType>,
    #[serde(default)]
    pub binding_type: Option<String>,
    #[serde(default)]
    pub cover_weight: Option<u32>,
}

/// A complete order configuration, ready to validate and price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FullSelection {
    /// Raw book size name as shown in the form; normalized on every use.
    pub book_size: String,
    pub paper_type: String,
    pub paper_weight: u32,
    pub print_mode: PrintMode,
    pub pages: PageCounts,
    pub binding_type: String,
    pub cover_weight: u32,
    #[serde(default)]
    pub extras: Vec<String>,
}
