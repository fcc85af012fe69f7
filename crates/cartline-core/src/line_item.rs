//! # Line-Item Base Entity
//!
//! Storage and behavior shared by every cart line: attribute get/set,
//! default merging, the owned tax breakdown, and serialization.
//!
//! ## Variant Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     trait LineItem                                      │
//! │   get · set · to_json · taxes · recalculate                             │
//! │                                                                         │
//! │   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐                │
//! │   │ ProductLine  │   │     Fee      │   │ ShippingLine │                │
//! │   │ stored       │   │ subtotal ──► │   │ subtotal ──► │                │
//! │   │ subtotal     │   │   total      │   │   total      │                │
//! │   └──────┬───────┘   └──────┬───────┘   └──────┬───────┘                │
//! │          └──────────────────┼──────────────────┘                        │
//! │                             ▼                                           │
//! │                      LineItemBase                                       │
//! │        kind · cid · attributes · TaxLines                               │
//! │                                                                         │
//! │   `CartLine` (cart.rs) is the closed sum of the three variants.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::attributes::Attributes;
use crate::money::Money;
use crate::services::Services;
use crate::tax::{TaxLine, TaxLines, TaxRateTable};
use crate::types::{LineKind, TaxStatus};

/// Attribute under which persisted records carry their tax breakdown.
pub const TAXES_KEY: &str = "taxes";

// =============================================================================
// Traits
// =============================================================================

/// Per-variant default attributes, resolved once at construction.
pub trait LineItemDefaults {
    fn defaults(services: &Services) -> Attributes;
}

/// The contract every cart line satisfies.
///
/// Reads of unknown names return `None`; writes of unknown names create the
/// attribute. Nothing here fails.
pub trait LineItem {
    fn base(&self) -> &LineItemBase;

    fn base_mut(&mut self) -> &mut LineItemBase;

    fn kind(&self) -> LineKind {
        self.base().kind()
    }

    /// Client-side id, stable for the lifetime of the line.
    fn cid(&self) -> Uuid {
        self.base().cid()
    }

    fn get(&self, attr: &str) -> Option<&Value> {
        self.base().get(attr)
    }

    fn set(&mut self, attr: &str, value: Value) {
        self.base_mut().set(attr, value);
    }

    /// Reads `attr` as money.
    fn money(&self, attr: &str) -> Option<Money> {
        self.get(attr).and_then(Money::from_value)
    }

    fn taxes(&self) -> &TaxLines {
        self.base().taxes()
    }

    fn taxes_mut(&mut self) -> &mut TaxLines {
        self.base_mut().taxes_mut()
    }

    /// Plain record of the line.
    fn to_json(&self) -> Value {
        self.base().to_json()
    }

    /// Recomputes totals and the tax breakdown against `rates`.
    fn recalculate(&mut self, rates: &TaxRateTable);
}

/// Maps the quantity-scaled names onto the stored totals, for lines whose
/// subtotal is by definition their total.
pub(crate) fn subtotal_alias(attr: &str) -> &str {
    match attr {
        "subtotal" => "total",
        "subtotal_tax" => "total_tax",
        other => other,
    }
}

// =============================================================================
// Base Entity
// =============================================================================

/// Common state of a line item.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemBase {
    kind: LineKind,
    cid: Uuid,
    attributes: Attributes,
    taxes: TaxLines,
}

impl LineItemBase {
    /// Merges `supplied` over `defaults` (supplied values win).
    ///
    /// A supplied `taxes` array is taken as the initial tax breakdown and is
    /// not kept as an attribute.
    pub fn initialize(kind: LineKind, defaults: Attributes, supplied: Option<Attributes>) -> Self {
        let mut attributes = defaults;
        let mut taxes = TaxLines::new();

        if let Some(mut supplied) = supplied {
            if let Some(records) = supplied.remove(TAXES_KEY) {
                taxes = TaxLines::from_records(&records);
            }
            attributes.extend(supplied);
        }

        let base = LineItemBase {
            kind,
            cid: Uuid::new_v4(),
            attributes,
            taxes,
        };
        debug!(kind = %base.kind, cid = %base.cid, "line item initialized");
        base
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    pub fn cid(&self) -> Uuid {
        self.cid
    }

    pub fn get(&self, attr: &str) -> Option<&Value> {
        self.attributes.get(attr)
    }

    pub fn set(&mut self, attr: &str, value: Value) {
        self.attributes.insert(attr.to_string(), value);
    }

    pub fn taxes(&self) -> &TaxLines {
        &self.taxes
    }

    pub fn taxes_mut(&mut self) -> &mut TaxLines {
        &mut self.taxes
    }

    /// Copy of all attributes, for variants that extend the record.
    pub fn record(&self) -> Attributes {
        self.attributes.clone()
    }

    /// Copy of all attributes with the tax breakdown attached.
    pub fn record_with_taxes(&self) -> Value {
        let mut record = self.record();
        record.insert(TAXES_KEY.to_string(), self.taxes.to_json());
        Value::Object(record)
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.record())
    }

    /// Rebuilds the tax breakdown for `amount` and returns the tax charged.
    ///
    /// Lines whose `tax_status` is not `taxable` end up with no tax lines.
    /// Compound rates are charged on `amount` plus the simple taxes.
    pub fn apply_taxes(&mut self, amount: Money, rates: &TaxRateTable) -> Money {
        self.taxes.clear();

        if TaxStatus::of(self.get("tax_status")) != TaxStatus::Taxable {
            return Money::zero();
        }

        let class = self
            .get("tax_class")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let mut simple = Money::zero();
        let mut compound = Money::zero();
        for rate in rates.for_class(&class) {
            let taxable = if rate.compound { amount + simple } else { amount };
            let tax = taxable.calculate_tax(rate.rate());
            self.taxes.push(TaxLine::for_rate(rate, tax));
            if rate.compound {
                compound += tax;
            } else {
                simple += tax;
            }
        }

        debug!(
            kind = %self.kind,
            cid = %self.cid,
            %amount,
            tax = %(simple + compound),
            lines = self.taxes.len(),
            "taxes applied"
        );
        simple + compound
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
