//! # Shipping Line
//!
//! Like a fee, shipping has no quantity: `subtotal` and `subtotal_tax` read
//! through to `total` and `total_tax`. Legacy records carry `cost` instead of
//! `total`.

use serde_json::Value;
use tracing::debug;

use crate::attributes::Attributes;
use crate::line_item::{subtotal_alias, LineItem, LineItemBase, LineItemDefaults};
use crate::services::Services;
use crate::tax::TaxRateTable;
use crate::types::{LineKind, TaxStatus};

/// Translation key of the default shipping title.
pub const SHIPPING_TITLE_KEY: &str = "titles.shipping";

/// Title used when no translation is available.
pub const DEFAULT_SHIPPING_TITLE: &str = "Shipping";

#[derive(Debug, Clone, PartialEq)]
pub struct ShippingLine {
    base: LineItemBase,
}

impl ShippingLine {
    pub fn new(services: &Services) -> Self {
        ShippingLine::with_attributes(services, None)
    }

    pub fn with_attributes(services: &Services, attributes: Option<Attributes>) -> Self {
        let supplied = attributes.map(total_from_cost);
        ShippingLine {
            base: LineItemBase::initialize(LineKind::Shipping, Self::defaults(services), supplied),
        }
    }
}

fn total_from_cost(mut attributes: Attributes) -> Attributes {
    if !attributes.contains_key("total") {
        if let Some(cost) = attributes.get("cost").cloned() {
            debug!(%cost, "shipping total taken from legacy cost");
            attributes.insert("total".to_string(), cost);
        }
    }
    attributes
}

impl LineItemDefaults for ShippingLine {
    fn defaults(services: &Services) -> Attributes {
        let title = services
            .translate(SHIPPING_TITLE_KEY)
            .unwrap_or_else(|| DEFAULT_SHIPPING_TITLE.to_string());

        let mut defaults = Attributes::new();
        defaults.insert("id".to_string(), Value::Null);
        defaults.insert("method_title".to_string(), Value::from(title));
        defaults.insert("method_id".to_string(), Value::from(""));
        defaults.insert("total".to_string(), Value::from(0));
        defaults.insert("tax_status".to_string(), Value::from(TaxStatus::Taxable));
        defaults.insert("tax_class".to_string(), Value::from(""));
        defaults
    }
}

impl LineItem for ShippingLine {
    fn base(&self) -> &LineItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LineItemBase {
        &mut self.base
    }

    fn get(&self, attr: &str) -> Option<&Value> {
        self.base.get(subtotal_alias(attr))
    }

    fn to_json(&self) -> Value {
        self.base.record_with_taxes()
    }

    fn recalculate(&mut self, rates: &TaxRateTable) {
        let total = self.money("total").unwrap_or_default();
        let tax = self.base.apply_taxes(total, rates);

        self.base.set("total", total.to_value());
        self.base.set("total_tax", tax.to_value());
    }
}
