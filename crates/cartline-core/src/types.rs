//! # Domain Types
//!
//! Small value types shared by every line item.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │    LineKind     │   │   TaxStatus     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Product        │   │  Taxable        │       │
//! │  │  825 = 8.25%    │   │  Fee            │   │  NotTaxable     │       │
//! │  └─────────────────┘   │  Shipping       │   │  ("none")       │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 825 bps = 8.25%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Line Kind
// =============================================================================

/// Discriminant of a cart line. Fixed for the lifetime of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Product,
    Fee,
    Shipping,
}

impl LineKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LineKind::Product => "product",
            LineKind::Fee => "fee",
            LineKind::Shipping => "shipping",
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tax Status
// =============================================================================

/// Whether a line is taxed.
///
/// The `tax_status` attribute itself stays a free-form string so that
/// statuses introduced by other systems survive a round trip untouched.
/// Anything that is not `"taxable"` is treated as not taxable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxStatus {
    #[default]
    Taxable,
    #[serde(rename = "none")]
    NotTaxable,
}

impl TaxStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TaxStatus::Taxable => "taxable",
            TaxStatus::NotTaxable => "none",
        }
    }

    /// Reads a `tax_status` attribute.
    pub fn of(value: Option<&Value>) -> TaxStatus {
        match value.and_then(Value::as_str) {
            Some("taxable") => TaxStatus::Taxable,
            _ => TaxStatus::NotTaxable,
        }
    }
}

impl From<TaxStatus> for Value {
    fn from(status: TaxStatus) -> Self {
        Value::from(status.as_str())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
