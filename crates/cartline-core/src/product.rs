//! # Product Line
//!
//! A quantity-scaled line. Unlike fees and shipping, a product stores a real
//! `subtotal` (`price × quantity`) next to its `total`.

use serde_json::Value;
use tracing::warn;

use crate::attributes::Attributes;
use crate::line_item::{LineItem, LineItemBase, LineItemDefaults};
use crate::money::Money;
use crate::services::Services;
use crate::tax::TaxRateTable;
use crate::types::{LineKind, TaxStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct ProductLine {
    base: LineItemBase,
}

impl ProductLine {
    pub fn new(services: &Services) -> Self {
        ProductLine::with_attributes(services, None)
    }

    pub fn with_attributes(services: &Services, attributes: Option<Attributes>) -> Self {
        ProductLine {
            base: LineItemBase::initialize(LineKind::Product, Self::defaults(services), attributes),
        }
    }

    /// Quantity as an integer. Numeric strings are accepted; anything
    /// unreadable counts as zero so it never produces a charge.
    pub fn quantity(&self) -> i64 {
        match self.get("quantity") {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }
}

impl LineItemDefaults for ProductLine {
    fn defaults(_services: &Services) -> Attributes {
        let mut defaults = Attributes::new();
        defaults.insert("id".to_string(), Value::Null);
        defaults.insert("product_id".to_string(), Value::Null);
        defaults.insert("name".to_string(), Value::from(""));
        defaults.insert("quantity".to_string(), Value::from(1));
        defaults.insert("price".to_string(), Value::from(0));
        defaults.insert("tax_status".to_string(), Value::from(TaxStatus::Taxable));
        defaults.insert("tax_class".to_string(), Value::from(""));
        defaults
    }
}

impl LineItem for ProductLine {
    fn base(&self) -> &LineItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LineItemBase {
        &mut self.base
    }

    fn to_json(&self) -> Value {
        self.base.record_with_taxes()
    }

    fn recalculate(&mut self, rates: &TaxRateTable) {
        let price = self.money("price").unwrap_or_default();
        let quantity = self.quantity();
        let subtotal = price.checked_multiply_quantity(quantity).unwrap_or_else(|| {
            warn!(cid = %self.cid(), %price, quantity, "line amount overflows, priced at zero");
            Money::zero()
        });
        let tax = self.base.apply_taxes(subtotal, rates);

        self.base.set("subtotal", subtotal.to_value());
        self.base.set("subtotal_tax", tax.to_value());
        self.base.set("total", subtotal.to_value());
        self.base.set("total_tax", tax.to_value());
    }
}
