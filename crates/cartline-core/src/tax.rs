//! # Tax Rates and Tax Lines
//!
//! A [`TaxRateTable`] is the store's configured rates. Recalculating a line
//! item turns the applicable rates into [`TaxLine`]s, which the line owns in
//! a [`TaxLines`] collection.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TaxRateTable                                                           │
//! │  ├── { id: 1, class: "",        label: "State", 600 bps }               │
//! │  ├── { id: 2, class: "",        label: "City",  225 bps }               │
//! │  └── { id: 3, class: "reduced", label: "State", 300 bps }               │
//! │           │                                                             │
//! │           │ for_class("")                                               │
//! │           ▼                                                             │
//! │  Fee (price 10.00, tax_class "")                                        │
//! │  └── TaxLines                                                           │
//! │      ├── TaxLine { id: 1, total: 0.60 }                                 │
//! │      └── TaxLine { id: 2, total: 0.23 }                                 │
//! │           │                                                             │
//! │           │ to_json()                                                   │
//! │           ▼                                                             │
//! │  [ { "id": 1, "total": "0.60", ... }, { "id": 2, ... } ]                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;
use ts_rs::TS;

use crate::money::Money;
use crate::types::TaxRate;

// =============================================================================
// Tax Rate Records
// =============================================================================

/// One configured tax rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRateRecord {
    /// Rate identifier, copied into every tax line this rate produces.
    pub id: u64,

    /// Tax class the rate applies to. Empty string is the standard class.
    #[serde(default)]
    pub class: String,

    /// Label printed on receipts ("VAT", "State Tax").
    pub label: String,

    /// Rate in basis points.
    pub rate_bps: u32,

    /// Compound rates are charged on the amount plus the simple taxes.
    #[serde(default)]
    pub compound: bool,

    /// Lower priorities are applied first.
    #[serde(default)]
    pub priority: u32,
}

impl TaxRateRecord {
    pub fn new(id: u64, class: impl Into<String>, label: impl Into<String>, rate_bps: u32) -> Self {
        TaxRateRecord {
            id,
            class: class.into(),
            label: label.into(),
            rate_bps,
            compound: false,
            priority: 0,
        }
    }

    /// Marks the rate as compound.
    pub fn compound(mut self) -> Self {
        self.compound = true;
        self
    }

    #[inline]
    pub fn rate(&self) -> TaxRate {
        TaxRate::from_bps(self.rate_bps)
    }
}

/// The store's tax rates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxRateTable {
    rates: Vec<TaxRateRecord>,
}

impl TaxRateTable {
    pub fn new(rates: Vec<TaxRateRecord>) -> Self {
        TaxRateTable { rates }
    }

    pub fn rates(&self) -> &[TaxRateRecord] {
        &self.rates
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Rates for one tax class, in application order: simple rates before
    /// compound ones, then by priority, then by id.
    pub fn for_class(&self, class: &str) -> Vec<&TaxRateRecord> {
        let mut rates: Vec<_> = self.rates.iter().filter(|r| r.class == class).collect();
        rates.sort_by_key(|r| (r.compound, r.priority, r.id));
        rates
    }
}

// =============================================================================
// Tax Line
// =============================================================================

/// One row of a line item's tax breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxLine {
    /// Id of the rate that produced this line.
    pub id: u64,
    pub label: String,
    pub compound: bool,
    /// Tax before line-level discounts.
    pub subtotal: Money,
    /// Tax actually charged.
    pub total: Money,
}

impl TaxLine {
    /// A tax line charging `amount` at `rate`.
    pub fn for_rate(rate: &TaxRateRecord, amount: Money) -> Self {
        TaxLine {
            id: rate.id,
            label: rate.label.clone(),
            compound: rate.compound,
            subtotal: amount,
            total: amount,
        }
    }

    /// The plain record this line serializes to.
    pub fn to_record(&self) -> Value {
        json!({
            "id": self.id,
            "label": self.label,
            "compound": self.compound,
            "subtotal": self.subtotal.to_decimal_string(),
            "total": self.total.to_decimal_string(),
        })
    }

    /// Reads a persisted tax record, e.g. from an order's fee line.
    ///
    /// `id` (or legacy `rate_id`) is required. Amounts may be numbers or
    /// decimal strings and default to zero; `subtotal` defaults to `total`.
    pub fn from_record(record: &Value) -> Option<TaxLine> {
        let id = record
            .get("id")
            .or_else(|| record.get("rate_id"))
            .and_then(|v| v.as_u64().or_else(|| v.as_str()?.trim().parse().ok()))?;

        let amount = |key: &str| record.get(key).and_then(Money::from_value);
        let total = amount("total").unwrap_or_default();

        Some(TaxLine {
            id,
            label: record
                .get("label")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            compound: record.get("compound").and_then(Value::as_bool).unwrap_or(false),
            subtotal: amount("subtotal").unwrap_or(total),
            total,
        })
    }
}

// =============================================================================
// Tax Line Collection
// =============================================================================

/// Ordered tax breakdown owned by a single line item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxLines {
    lines: Vec<TaxLine>,
}

impl TaxLines {
    pub fn new() -> Self {
        TaxLines::default()
    }

    /// Parses an array of persisted tax records.
    ///
    /// Entries that cannot be read are skipped; a non-array yields an empty
    /// collection.
    pub fn from_records(records: &Value) -> Self {
        let Some(items) = records.as_array() else {
            warn!(%records, "expected an array of tax records");
            return TaxLines::new();
        };

        let lines = items
            .iter()
            .filter_map(|record| {
                let line = TaxLine::from_record(record);
                if line.is_none() {
                    warn!(%record, "skipping tax record without a rate id");
                }
                line
            })
            .collect();

        TaxLines { lines }
    }

    pub fn push(&mut self, line: TaxLine) {
        self.lines.push(line);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaxLine> {
        self.lines.iter()
    }

    /// Sum of the charged tax.
    pub fn total(&self) -> Money {
        self.lines.iter().map(|l| l.total).sum()
    }

    /// Sum of the pre-discount tax.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(|l| l.subtotal).sum()
    }

    /// Array of plain records, in collection order.
    pub fn to_json(&self) -> Value {
        Value::Array(self.lines.iter().map(TaxLine::to_record).collect())
    }
}

impl<'a> IntoIterator for &'a TaxLines {
    type Item = &'a TaxLine;
    type IntoIter = std::slice::Iter<'a, TaxLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

impl FromIterator<TaxLine> for TaxLines {
    fn from_iter<I: IntoIterator<Item = TaxLine>>(iter: I) -> Self {
        TaxLines {
            lines: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TaxRateTable {
        TaxRateTable::new(vec![
            TaxRateRecord::new(3, "", "City", 225).compound(),
            TaxRateRecord::new(2, "", "County", 100),
            TaxRateRecord::new(1, "", "State", 600),
            TaxRateRecord::new(9, "reduced", "State", 300),
        ])
    }

    #[test]
    fn test_for_class_orders_simple_before_compound() {
        let table = table();
        let ids: Vec<u64> = table.for_class("").iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let reduced: Vec<u64> = table.for_class("reduced").iter().map(|r| r.id).collect();
        assert_eq!(reduced, vec![9]);
        assert!(table.for_class("zero").is_empty());
    }

    #[test]
    fn test_tax_line_record_shape() {
        let rate = TaxRateRecord::new(4, "", "VAT", 2000);
        let line = TaxLine::for_rate(&rate, Money::from_cents(250));
        assert_eq!(
            line.to_record(),
            json!({
                "id": 4,
                "label": "VAT",
                "compound": false,
                "subtotal": "2.50",
                "total": "2.50",
            })
        );
    }

    #[test]
    fn test_tax_line_from_order_record() {
        let line = TaxLine::from_record(&json!({ "id": "7", "total": "1.05" })).unwrap();
        assert_eq!(line.id, 7);
        assert_eq!(line.total, Money::from_cents(105));
        assert_eq!(line.subtotal, Money::from_cents(105));
        assert_eq!(line.label, "");
        assert!(!line.compound);

        let legacy = TaxLine::from_record(&json!({ "rate_id": 2, "total": 0.5, "subtotal": 1 }))
            .unwrap();
        assert_eq!(legacy.id, 2);
        assert_eq!(legacy.total, Money::from_cents(50));
        assert_eq!(legacy.subtotal, Money::from_cents(100));

        assert!(TaxLine::from_record(&json!({ "total": "1.00" })).is_none());
    }

    #[test]
    fn test_tax_lines_from_records_skips_invalid() {
        let lines = TaxLines::from_records(&json!([
            { "id": 1, "total": "0.60" },
            { "label": "no id" },
            { "id": 2, "total": "0.23" },
        ]));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines.total(), Money::from_cents(83));

        assert!(TaxLines::from_records(&json!({ "id": 1 })).is_empty());
    }

    #[test]
    fn test_tax_lines_to_json_keeps_order() {
        let table = table();
        let lines: TaxLines = table
            .for_class("")
            .into_iter()
            .map(|r| TaxLine::for_rate(r, Money::from_cents(r.id as i64)))
            .collect();

        let json = lines.to_json();
        let records = json.as_array().unwrap();
        assert_eq!(records.len(), 3);
        for (record, line) in records.iter().zip(&lines) {
            assert_eq!(record, &line.to_record());
        }
        assert_eq!(TaxLines::new().to_json(), json!([]));
    }
}
