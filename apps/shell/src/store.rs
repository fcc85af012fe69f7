//! # Option Store and Catalog
//!
//! The collaborators handed to line-item constructors through
//! [`Services`]. Both are filled from [`AppConfig`] at startup and are
//! read-only afterwards.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cartline.toml                                                          │
//! │    [options.fee] ───────────► OptionStore ──► Services::option("fee")   │
//! │    [translations] ──────────► Catalog ──────► Services::translate(key)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use cartline_core::services::OPTION_KIND;
use cartline_core::{EntityQuery, OptionLookup, Services, Translate};
use serde_json::Value;
use tracing::trace;

use crate::state::AppConfig;

/// Configured option records, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct OptionStore {
    records: BTreeMap<String, Value>,
}

impl OptionStore {
    pub fn new(records: BTreeMap<String, Value>) -> Self {
        OptionStore { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl OptionLookup for OptionStore {
    fn lookup(&self, query: &EntityQuery<'_>) -> Option<Value> {
        if query.kind != OPTION_KIND {
            return None;
        }
        let record = self.records.get(query.name).cloned();
        trace!(name = query.name, found = record.is_some(), "option lookup");
        record
    }
}

/// Display phrases for one locale.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    locale: String,
    phrases: BTreeMap<String, String>,
}

impl Catalog {
    pub fn new(locale: impl Into<String>, phrases: BTreeMap<String, String>) -> Self {
        Catalog {
            locale: locale.into(),
            phrases,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }
}

impl Translate for Catalog {
    fn translate(&self, key: &str) -> Option<String> {
        self.phrases.get(key).cloned()
    }
}

/// Builds the collaborator bundle described by `config`.
pub fn services_from_config(config: &AppConfig) -> Services {
    Services::default()
        .with_options(Arc::new(OptionStore::new(config.options.clone())))
        .with_translator(Arc::new(Catalog::new(
            config.store.locale.clone(),
            config.translations.clone(),
        )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_option_store_answers_option_kind_only() {
        let store = OptionStore::new(BTreeMap::from([("fee".to_string(), json!({ "price": 1 }))]));

        assert_eq!(store.lookup(&EntityQuery::option("fee")), Some(json!({ "price": 1 })));
        assert_eq!(store.lookup(&EntityQuery::option("other")), None);
        assert_eq!(
            store.lookup(&EntityQuery {
                kind: "product",
                name: "fee"
            }),
            None
        );
    }

    #[test]
    fn test_catalog() {
        let catalog = Catalog::new(
            "fr",
            BTreeMap::from([("titles.fee".to_string(), "Frais".to_string())]),
        );
        assert_eq!(catalog.locale(), "fr");
        assert_eq!(catalog.translate("titles.fee").as_deref(), Some("Frais"));
        assert_eq!(catalog.translate("titles.shipping"), None);
    }

    #[test]
    fn test_services_from_config() {
        let mut config = AppConfig::default();
        config.options.insert("fee".to_string(), json!({ "name": "Levy" }));

        let services = services_from_config(&config);
        assert_eq!(services.option("fee"), Some(json!({ "name": "Levy" })));
        assert_eq!(services.translate("titles.fee").as_deref(), Some("Fee"));
    }
}
