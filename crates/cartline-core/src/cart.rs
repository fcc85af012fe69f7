//! # Cart
//!
//! The aggregator over heterogeneous line items.
//!
//! ## Uniform Summation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cart.sum("subtotal")                                                   │
//! │                                                                         │
//! │  ProductLine  get("subtotal") ──► stored subtotal    8.97               │
//! │  Fee          get("subtotal") ──► total (alias)      2.50               │
//! │  ShippingLine get("subtotal") ──► total (alias)      5.00               │
//! │                                                     ──────              │
//! │                                                     16.47               │
//! │                                                                         │
//! │  No variant is special-cased here: each answers for itself.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use crate::attributes::Attributes;
use crate::error::{CoreError, CoreResult};
use crate::fee::Fee;
use crate::line_item::{LineItem, LineItemBase};
use crate::money::Money;
use crate::product::ProductLine;
use crate::services::Services;
use crate::shipping::ShippingLine;
use crate::tax::TaxRateTable;
use crate::types::LineKind;
use crate::MAX_CART_LINES;

// =============================================================================
// Cart Line
// =============================================================================

/// Closed set of line-item variants.
#[derive(Debug, Clone, PartialEq)]
pub enum CartLine {
    Product(ProductLine),
    Fee(Fee),
    Shipping(ShippingLine),
}

impl CartLine {
    fn item(&self) -> &dyn LineItem {
        match self {
            CartLine::Product(line) => line,
            CartLine::Fee(line) => line,
            CartLine::Shipping(line) => line,
        }
    }

    fn item_mut(&mut self) -> &mut dyn LineItem {
        match self {
            CartLine::Product(line) => line,
            CartLine::Fee(line) => line,
            CartLine::Shipping(line) => line,
        }
    }
}

impl LineItem for CartLine {
    fn base(&self) -> &LineItemBase {
        self.item().base()
    }

    fn base_mut(&mut self) -> &mut LineItemBase {
        self.item_mut().base_mut()
    }

    fn get(&self, attr: &str) -> Option<&Value> {
        self.item().get(attr)
    }

    fn set(&mut self, attr: &str, value: Value) {
        self.item_mut().set(attr, value);
    }

    fn to_json(&self) -> Value {
        self.item().to_json()
    }

    fn recalculate(&mut self, rates: &TaxRateTable) {
        self.item_mut().recalculate(rates);
    }
}

impl From<ProductLine> for CartLine {
    fn from(line: ProductLine) -> Self {
        CartLine::Product(line)
    }
}

impl From<Fee> for CartLine {
    fn from(line: Fee) -> Self {
        CartLine::Fee(line)
    }
}

impl From<ShippingLine> for CartLine {
    fn from(line: ShippingLine) -> Self {
        CartLine::Shipping(line)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// An ordered set of cart lines.
///
/// ## Invariants
/// - Each line's `cid` is unique within the cart
/// - At most [`MAX_CART_LINES`] lines
/// - Removing a line drops it together with its tax lines
#[derive(Debug, Clone)]
pub struct Cart {
    lines: Vec<CartLine>,

    /// When the cart was created/last cleared
    pub created_at: DateTime<Utc>,
}

impl Cart {
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Appends a line and returns its client id.
    pub fn add(&mut self, line: impl Into<CartLine>) -> CoreResult<Uuid> {
        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        let line = line.into();
        let cid = line.cid();
        debug!(kind = %line.kind(), %cid, "cart line added");
        self.lines.push(line);
        Ok(cid)
    }

    /// Builds a fee from `attributes` (with configured defaults) and adds it.
    pub fn add_fee(&mut self, services: &Services, attributes: Option<Attributes>) -> CoreResult<Uuid> {
        self.add(Fee::with_attributes(services, attributes))
    }

    /// Removes and returns the line with client id `cid`.
    pub fn remove(&mut self, cid: Uuid) -> CoreResult<CartLine> {
        let index = self
            .lines
            .iter()
            .position(|line| line.cid() == cid)
            .ok_or(CoreError::LineNotFound(cid))?;
        Ok(self.lines.remove(index))
    }

    pub fn get(&self, cid: Uuid) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.cid() == cid)
    }

    pub fn get_mut(&mut self, cid: Uuid) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.cid() == cid)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    /// Recalculates every line against `rates`.
    pub fn recalculate(&mut self, rates: &TaxRateTable) {
        for line in &mut self.lines {
            line.recalculate(rates);
        }
    }

    /// Sums `attr` across all lines. Missing or unreadable values count as
    /// zero; the sum clamps at the `Money` bounds.
    pub fn sum(&self, attr: &str) -> Money {
        self.lines
            .iter()
            .filter_map(|line| line.money(attr))
            .fold(Money::zero(), Money::saturating_add)
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }

    /// Order-shaped record: lines grouped by kind, cart order preserved.
    pub fn to_json(&self) -> Value {
        let mut line_items = Vec::new();
        let mut fee_lines = Vec::new();
        let mut shipping_lines = Vec::new();

        for line in &self.lines {
            let group = match line.kind() {
                LineKind::Product => &mut line_items,
                LineKind::Fee => &mut fee_lines,
                LineKind::Shipping => &mut shipping_lines,
            };
            group.push(line.to_json());
        }

        json!({
            "line_items": line_items,
            "fee_lines": fee_lines,
            "shipping_lines": shipping_lines,
        })
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

/// Cart totals summary for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub subtotal: Money,
    pub subtotal_tax: Money,
    pub total: Money,
    pub total_tax: Money,
    /// `total + total_tax`
    pub grand_total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        let total = cart.sum("total");
        let total_tax = cart.sum("total_tax");
        CartTotals {
            line_count: cart.len(),
            subtotal: cart.sum("subtotal"),
            subtotal_tax: cart.sum("subtotal_tax"),
            total,
            total_tax,
            grand_total: total.saturating_add(total_tax),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::attributes;
    use crate::services::testing::services;
    use crate::tax::TaxRateRecord;

    fn rates() -> TaxRateTable {
        TaxRateTable::new(vec![TaxRateRecord::new(1, "", "Sales", 1000)])
    }

    fn product(price: &str, quantity: i64) -> ProductLine {
        ProductLine::with_attributes(
            &Services::detached(),
            Some(attributes([("price", json!(price)), ("quantity", json!(quantity))])),
        )
    }

    #[test]
    fn test_sum_reads_every_variant_uniformly() {
        let services = services(Some(json!({ "price": 2.5 })));
        let mut cart = Cart::new();
        cart.add(product("2.99", 3)).unwrap();
        cart.add_fee(&services, None).unwrap();
        cart.add(ShippingLine::with_attributes(
            &services,
            Some(attributes([("total", "5.00")])),
        ))
        .unwrap();
        cart.recalculate(&rates());

        assert_eq!(cart.sum("subtotal"), Money::from_cents(897 + 250 + 500));
        assert_eq!(cart.sum("subtotal"), cart.sum("total"));
        // 0.90 + 0.25 + 0.50
        assert_eq!(cart.sum("subtotal_tax"), Money::from_cents(165));

        let totals = cart.totals();
        assert_eq!(totals.line_count, 3);
        assert_eq!(totals.grand_total, Money::from_cents(1647 + 165));
    }

    #[test]
    fn test_sum_skips_unreadable_values() {
        let mut cart = Cart::new();
        let mut fee = Fee::new(&Services::detached());
        fee.set("total", json!("n/a"));
        cart.add(fee).unwrap();
        cart.add(product("1.00", 1)).unwrap();

        assert_eq!(cart.sum("total"), Money::zero());
        cart.recalculate(&TaxRateTable::default());
        assert_eq!(cart.sum("total"), Money::from_cents(100));
    }

    #[test]
    fn test_remove_line() {
        let mut cart = Cart::new();
        let cid = cart.add_fee(&Services::detached(), None).unwrap();
        cart.add(product("1.00", 1)).unwrap();

        let removed = cart.remove(cid).unwrap();
        assert_eq!(removed.kind(), LineKind::Fee);
        assert_eq!(cart.len(), 1);
        assert!(cart.get(cid).is_none());
        assert!(matches!(cart.remove(cid), Err(CoreError::LineNotFound(id)) if id == cid));
    }

    #[test]
    fn test_cart_line_dispatches_overrides() {
        let mut line = CartLine::from(Fee::new(&Services::detached()));
        line.set("total", json!(4));
        assert_eq!(line.get("subtotal"), Some(&json!(4)));
        assert_eq!(line.to_json()["taxes"], json!([]));
    }

    #[test]
    fn test_cart_limit() {
        let mut cart = Cart::new();
        for _ in 0..MAX_CART_LINES {
            cart.add_fee(&Services::detached(), None).unwrap();
        }
        assert!(matches!(
            cart.add_fee(&Services::detached(), None),
            Err(CoreError::CartTooLarge { .. })
        ));
    }

    #[test]
    fn test_to_json_groups_by_kind() {
        let mut cart = Cart::new();
        cart.add_fee(&Services::detached(), Some(attributes([("name", "A")]))).unwrap();
        cart.add(product("1.00", 2)).unwrap();
        cart.add_fee(&Services::detached(), Some(attributes([("name", "B")]))).unwrap();

        let json = cart.to_json();
        assert_eq!(json["line_items"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["fee_lines"][0]["name"], json!("A"));
        assert_eq!(json["fee_lines"][1]["name"], json!("B"));
        assert_eq!(json["shipping_lines"], json!([]));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(product("1.00", 1)).unwrap();
        assert!(!cart.is_empty());
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_sum_clamps_instead_of_overflowing() {
        let mut cart = Cart::new();
        for _ in 0..2 {
            cart.add_fee(
                &Services::detached(),
                Some(attributes([("price", "90000000000000000")])),
            )
            .unwrap();
        }
        cart.recalculate(&rates());

        assert_eq!(cart.sum("total"), Money::from_cents(i64::MAX));
        let totals = cart.totals();
        assert_eq!(totals.total, Money::from_cents(i64::MAX));
        assert_eq!(totals.grand_total, Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_edit_line_in_place() {
        let mut cart = Cart::new();
        let cid = cart.add(product("2.00", 1)).unwrap();

        if let Some(line) = cart.get_mut(cid) {
            line.set("quantity", json!(4));
        }
        cart.recalculate(&TaxRateTable::default());

        assert_eq!(cart.sum("total"), Money::from_cents(800));
        assert!(cart.get_mut(Uuid::new_v4()).is_none());
    }
}
