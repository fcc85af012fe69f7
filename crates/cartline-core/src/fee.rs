//! # Fee Line
//!
//! A flat, non-quantity charge (service charge, bag levy, card surcharge).
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Fee::new(&services)                  Fee::with_attributes(.., order)   │
//! │        │                                     │                          │
//! │        │                              { total: 7 } and no price?        │
//! │        │                                     │ yes: price = 7           │
//! │        ▼                                     ▼                          │
//! │  defaults: option "fee" field by field, else                            │
//! │    name       = t("titles.fee")  (or "Fee")                             │
//! │    tax_status = "taxable"                                               │
//! │    tax_class  = ""                                                      │
//! │    price      = 0                                                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  merge (supplied wins) ──► Fee                                          │
//! │                                                                         │
//! │  get("subtotal")     == get("total")                                    │
//! │  get("subtotal_tax") == get("total_tax")                                │
//! │  to_json()           == { ...attributes, taxes: [...] }                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A fee has no quantity, so its subtotal *is* its total. Reading the
//! subtotal names through to the totals lets the cart sum `subtotal` across
//! products, fees and shipping alike.

use serde_json::Value;
use tracing::debug;

use crate::attributes::{lookup, Attributes};
use crate::line_item::{subtotal_alias, LineItem, LineItemBase, LineItemDefaults};
use crate::services::Services;
use crate::tax::TaxRateTable;
use crate::types::{LineKind, TaxStatus};

/// Store option holding the configured fee defaults.
pub const FEE_OPTION: &str = "fee";

/// Translation key of the default fee title.
pub const FEE_TITLE_KEY: &str = "titles.fee";

/// Title used when no translation is available.
pub const DEFAULT_FEE_TITLE: &str = "Fee";

/// Fields resolved from the `fee` option, in resolution order.
const CONFIGURABLE: [&str; 4] = ["name", "tax_status", "tax_class", "price"];

#[derive(Debug, Clone, PartialEq)]
pub struct Fee {
    base: LineItemBase,
}

impl Fee {
    /// A fresh fee with configured defaults.
    pub fn new(services: &Services) -> Self {
        Fee::with_attributes(services, None)
    }

    /// A fee built from supplied attributes, such as a persisted order's fee
    /// line. Supplied values win over defaults.
    ///
    /// Order fee lines carry `total` rather than `price`: when `price` is not
    /// among the supplied keys, `total` is copied into it. Key presence
    /// decides, so an explicit `price: 0` is kept.
    pub fn with_attributes(services: &Services, attributes: Option<Attributes>) -> Self {
        let supplied = attributes.map(price_from_order_total);

        let fully_supplied = supplied
            .as_ref()
            .is_some_and(|attrs| CONFIGURABLE.iter().all(|k| attrs.contains_key(*k)));
        let defaults = if fully_supplied {
            Fee::defaults(&Services::detached())
        } else {
            Fee::defaults(services)
        };

        Fee {
            base: LineItemBase::initialize(LineKind::Fee, defaults, supplied),
        }
    }
}

fn price_from_order_total(mut attributes: Attributes) -> Attributes {
    if !attributes.contains_key("price") {
        if let Some(total) = attributes.get("total").cloned() {
            debug!(%total, "fee price taken from order total");
            attributes.insert("price".to_string(), total);
        }
    }
    attributes
}

impl LineItemDefaults for Fee {
    fn defaults(services: &Services) -> Attributes {
        let option = services.option(FEE_OPTION);
        let title = services
            .translate(FEE_TITLE_KEY)
            .unwrap_or_else(|| DEFAULT_FEE_TITLE.to_string());
        debug!(configured = option.is_some(), "resolving fee defaults");

        let fallbacks = [
            Value::from(title),
            Value::from(TaxStatus::Taxable),
            Value::from(""),
            Value::from(0),
        ];

        let mut defaults = Attributes::new();
        defaults.insert("id".to_string(), Value::Null);
        for (field, fallback) in CONFIGURABLE.into_iter().zip(fallbacks) {
            defaults.insert(field.to_string(), lookup(option.as_ref(), field, fallback));
        }
        defaults
    }
}

impl LineItem for Fee {
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

    /// `total = price`, taxed on the price.
    fn recalculate(&mut self, rates: &TaxRateTable) {
        let price = self.money("price").unwrap_or_default();
        let tax = self.base.apply_taxes(price, rates);

        self.base.set("total", price.to_value());
        self.base.set("total_tax", tax.to_value());
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::attributes;
    use crate::money::Money;
    use crate::services::testing::services;
    use crate::tax::{TaxLine, TaxRateRecord};
    use serde_json::json;

    fn assert_subtotals_alias(fee: &Fee) {
        assert_eq!(fee.get("subtotal"), fee.get("total"));
        assert_eq!(fee.get("subtotal_tax"), fee.get("total_tax"));
    }

    #[test]
    fn test_defaults_without_fee_option() {
        let fee = Fee::new(&services(None));

        assert_eq!(fee.get("id"), Some(&Value::Null));
        assert_eq!(fee.get("name"), Some(&json!("Surcharge")));
        assert_eq!(fee.get("tax_status"), Some(&json!("taxable")));
        assert_eq!(fee.get("tax_class"), Some(&json!("")));
        assert_eq!(fee.get("price"), Some(&json!(0)));
        assert_eq!(fee.kind(), LineKind::Fee);
        assert_subtotals_alias(&fee);
    }

    #[test]
    fn test_defaults_without_any_collaborator() {
        let fee = Fee::new(&Services::detached());
        assert_eq!(fee.get("name"), Some(&json!("Fee")));
        assert_eq!(fee.get("price"), Some(&json!(0)));
    }

    #[test]
    fn test_partial_fee_option_mixes_with_hard_defaults() {
        let fee = Fee::new(&services(Some(json!({ "price": 12.5 }))));

        assert_eq!(fee.get("price"), Some(&json!(12.5)));
        assert_eq!(fee.get("name"), Some(&json!("Surcharge")));
        assert_eq!(fee.get("tax_status"), Some(&json!("taxable")));
        assert_eq!(fee.get("tax_class"), Some(&json!("")));
    }

    #[test]
    fn test_full_fee_option() {
        let option = json!({
            "name": "Bag levy",
            "tax_status": "none",
            "tax_class": "zero",
            "price": "0.10",
        });
        let fee = Fee::new(&services(Some(option)));

        assert_eq!(fee.get("name"), Some(&json!("Bag levy")));
        assert_eq!(fee.get("tax_status"), Some(&json!("none")));
        assert_eq!(fee.get("tax_class"), Some(&json!("zero")));
        assert_eq!(fee.get("price"), Some(&json!("0.10")));
    }

    #[test]
    fn test_order_total_becomes_price() {
        let fee = Fee::with_attributes(&services(None), Some(attributes([("total", 7)])));

        assert_eq!(fee.get("price"), Some(&json!(7)));
        assert_eq!(fee.get("total"), Some(&json!(7)));
        assert_subtotals_alias(&fee);
    }

    #[test]
    fn test_explicit_price_is_not_replaced_by_total() {
        let attrs = attributes([("price", 3), ("total", 7)]);
        let fee = Fee::with_attributes(&services(None), Some(attrs));
        assert_eq!(fee.get("price"), Some(&json!(3)));

        let zero = attributes([("price", 0), ("total", 7)]);
        let fee = Fee::with_attributes(&services(None), Some(zero));
        assert_eq!(fee.get("price"), Some(&json!(0)));
    }

    #[test]
    fn test_total_aliasing_happens_only_at_construction() {
        let mut fee = Fee::with_attributes(&services(None), Some(attributes([("total", 7)])));
        fee.set("total", json!(9));

        assert_eq!(fee.get("price"), Some(&json!(7)));
        assert_eq!(fee.get("subtotal"), Some(&json!(9)));
    }

    #[test]
    fn test_supplied_attributes_without_total_keep_default_price() {
        let option = json!({ "price": 2 });
        let fee = Fee::with_attributes(
            &services(Some(option)),
            Some(attributes([("name", "Corkage")])),
        );
        assert_eq!(fee.get("name"), Some(&json!("Corkage")));
        assert_eq!(fee.get("price"), Some(&json!(2)));
    }

    #[test]
    fn test_fully_supplied_fee_skips_option_store() {
        let attrs = attributes([
            ("name", json!("Delivery surcharge")),
            ("tax_status", json!("none")),
            ("tax_class", json!("")),
            ("price", json!(4)),
        ]);
        let fee = Fee::with_attributes(&services(Some(json!({ "price": 99 }))), Some(attrs));
        assert_eq!(fee.get("price"), Some(&json!(4)));
        assert_eq!(fee.get("id"), Some(&Value::Null));
    }

    #[test]
    fn test_subtotal_reads_follow_total_writes() {
        let mut fee = Fee::new(&services(None));
        assert_subtotals_alias(&fee);
        assert_eq!(fee.get("subtotal"), None);

        fee.set("total", json!("5.00"));
        fee.set("total_tax", json!("1.00"));
        assert_eq!(fee.get("subtotal"), Some(&json!("5.00")));
        assert_eq!(fee.get("subtotal_tax"), Some(&json!("1.00")));
        assert_subtotals_alias(&fee);

        // Writing the alias name does not touch the total.
        fee.set("subtotal", json!("99.00"));
        assert_eq!(fee.get("subtotal"), Some(&json!("5.00")));
    }

    #[test]
    fn test_to_json_without_tax_lines_has_empty_taxes() {
        let fee = Fee::new(&services(None));
        let json = fee.to_json();

        assert_eq!(json["taxes"], json!([]));
        assert_eq!(json["name"], json!("Surcharge"));
        assert_eq!(json["price"], json!(0));
        assert_eq!(json["id"], Value::Null);
    }

    #[test]
    fn test_to_json_with_tax_lines() {
        let mut fee = Fee::new(&services(None));
        let rates = [
            TaxRateRecord::new(1, "", "State", 600),
            TaxRateRecord::new(2, "", "City", 225),
            TaxRateRecord::new(3, "", "Transit", 50),
        ];
        for (i, rate) in rates.iter().enumerate() {
            fee.taxes_mut().push(TaxLine::for_rate(rate, Money::from_cents(i as i64 + 1)));
        }

        let json = fee.to_json();
        let taxes = json["taxes"].as_array().unwrap();
        assert_eq!(taxes.len(), 3);
        for (record, line) in taxes.iter().zip(fee.taxes()) {
            assert_eq!(record, &line.to_record());
        }
    }

    #[test]
    fn test_order_fee_line_with_taxes() {
        let order_line = attributes([
            ("id", json!(31)),
            ("name", json!("Gift wrap")),
            ("total", json!("2.00")),
            ("total_tax", json!("0.40")),
            ("taxes", json!([{ "id": 1, "total": "0.40" }])),
        ]);
        let fee = Fee::with_attributes(&services(None), Some(order_line));

        assert_eq!(fee.get("price"), Some(&json!("2.00")));
        assert_eq!(fee.get("subtotal_tax"), Some(&json!("0.40")));
        assert_eq!(fee.taxes().len(), 1);
        assert_eq!(fee.to_json()["taxes"][0]["total"], json!("0.40"));
    }

    #[test]
    fn test_recalculate_taxable_fee() {
        let rates = TaxRateTable::new(vec![TaxRateRecord::new(1, "", "VAT", 2000)]);
        let mut fee = Fee::new(&services(Some(json!({ "price": 12.5 }))));
        fee.recalculate(&rates);

        assert_eq!(fee.get("total"), Some(&json!("12.50")));
        assert_eq!(fee.get("total_tax"), Some(&json!("2.50")));
        assert_eq!(fee.taxes().len(), 1);
        assert_subtotals_alias(&fee);
        assert_eq!(fee.money("subtotal"), Some(Money::from_cents(1250)));
    }

    #[test]
    fn test_recalculate_untaxed_fee() {
        let rates = TaxRateTable::new(vec![TaxRateRecord::new(1, "", "VAT", 2000)]);
        let mut fee = Fee::new(&services(Some(json!({ "price": 3, "tax_status": "none" }))));
        fee.recalculate(&rates);

        assert_eq!(fee.get("total"), Some(&json!("3.00")));
        assert_eq!(fee.get("total_tax"), Some(&json!("0.00")));
        assert!(fee.taxes().is_empty());
        assert_eq!(fee.to_json()["taxes"], json!([]));
    }
}
