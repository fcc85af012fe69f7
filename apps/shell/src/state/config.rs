//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`CARTLINE_*`)
//! 2. Config file (`cartline.toml`, located by `CARTLINE_CONFIG` or the
//!    platform config directory)
//! 3. Defaults (this file)
//!
//! ## File Format
//! ```toml
//! [store]
//! name = "Corner Shop"
//! locale = "en"
//!
//! [options.fee]
//! name = "Service charge"
//! price = 2.5
//!
//! [translations]
//! "titles.fee" = "Fee"
//!
//! [[tax_rates]]
//! id = 1
//! label = "VAT"
//! rate_bps = 2000
//! ```
//!
//! Configuration is read-only after initialization, so no mutex needed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cartline_core::validation::validate_tax_rates;
use cartline_core::{Money, TaxRateRecord, TaxRateTable};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::error::ConfigError;

/// Points at an explicit config file.
pub const CONFIG_PATH_VAR: &str = "CARTLINE_CONFIG";
/// Overrides `store.name`.
pub const STORE_NAME_VAR: &str = "CARTLINE_STORE_NAME";
/// Overrides `options.fee.price` (decimal string).
pub const FEE_PRICE_VAR: &str = "CARTLINE_FEE_PRICE";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,

    /// Option records served to line items, keyed by option name.
    pub options: BTreeMap<String, Value>,

    /// Display phrases keyed by translation key.
    pub translations: BTreeMap<String, String>,

    pub tax_rates: Vec<TaxRateRecord>,
}

/// Store identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store name (displayed on receipts)
    pub name: String,

    /// Locale of the translation catalog
    pub locale: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            name: "Cartline Dev Store".to_string(),
            locale: "en".to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}

impl Default for AppConfig {
    /// Development defaults: no configured options, no tax rates, and the
    /// English titles.
    fn default() -> Self {
        AppConfig {
            store: StoreConfig::default(),
            options: BTreeMap::new(),
            translations: BTreeMap::from([
                ("titles.fee".to_string(), "Fee".to_string()),
                ("titles.shipping".to_string(), "Shipping".to_string()),
            ]),
            tax_rates: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Loads the config file at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(?path, "no config file, using defaults");
            return Ok(AppConfig::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        validate_tax_rates(&config.tax_rates)?;

        info!(
            ?path,
            options = config.options.len(),
            tax_rates = config.tax_rates.len(),
            "config loaded"
        );
        Ok(config)
    }

    /// Loads from the default location, then applies environment overrides.
    ///
    /// ## Environment Variables
    /// - `CARTLINE_CONFIG`: config file path
    /// - `CARTLINE_STORE_NAME`: override store name
    /// - `CARTLINE_FEE_PRICE`: override the default fee price (e.g. "2.50")
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match config_path() {
            Some(path) => AppConfig::load(&path)?,
            None => AppConfig::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Applies `CARTLINE_*` overrides read through `var`.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(name) = var(STORE_NAME_VAR) {
            self.store.name = name;
        }

        if let Some(price) = var(FEE_PRICE_VAR) {
            let price = price.trim();
            if Money::parse_decimal(price).is_some() {
                let fee = self
                    .options
                    .entry("fee".to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                match fee {
                    Value::Object(record) => {
                        record.insert("price".to_string(), Value::from(price));
                    }
                    other => *other = json!({ "price": price }),
                }
            } else {
                warn!(price, "ignoring {FEE_PRICE_VAR}: not a decimal amount");
            }
        }
    }

    pub fn tax_rate_table(&self) -> TaxRateTable {
        TaxRateTable::new(self.tax_rates.clone())
    }

    /// Formats an amount with the store's currency symbol.
    pub fn format_currency(&self, amount: Money) -> String {
        let text = amount.to_decimal_string();
        match text.strip_prefix('-') {
            Some(abs) => format!("-{}{}", self.store.currency_symbol, abs),
            None => format!("{}{}", self.store.currency_symbol, text),
        }
    }
}

/// `CARTLINE_CONFIG`, or `cartline.toml` in the platform config directory.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.cartline.pos/cartline.toml`
/// - **Windows**: `%APPDATA%\cartline\pos\config\cartline.toml`
/// - **Linux**: `~/.config/pos/cartline.toml`
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        return Some(PathBuf::from(path));
    }

    ProjectDirs::from("com", "cartline", "pos").map(|dirs| dirs.config_dir().join("cartline.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.store.name, "Cartline Dev Store");
        assert_eq!(config.translations["titles.fee"], "Fee");
        assert!(config.options.is_empty());
    }

    #[test]
    fn test_load_options_and_rates() {
        let file = write_config(
            r#"
            [store]
            name = "Corner Shop"

            [options.fee]
            name = "Service charge"
            price = 2.5

            [[tax_rates]]
            id = 1
            label = "VAT"
            rate_bps = 2000
            "#,
        );
        let config = AppConfig::load(file.path()).unwrap();

        assert_eq!(config.store.name, "Corner Shop");
        assert_eq!(config.store.locale, "en");
        assert_eq!(config.options["fee"], json!({ "name": "Service charge", "price": 2.5 }));
        assert_eq!(config.tax_rate_table().for_class("").len(), 1);
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let file = write_config("[store\nname = ");
        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_invalid_tax_rates_rejected() {
        let file = write_config(
            r#"
            [[tax_rates]]
            id = 1
            label = "Broken"
            rate_bps = 12000
            "#,
        );
        assert!(matches!(
            AppConfig::load(file.path()),
            Err(ConfigError::InvalidTaxRates(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.options.insert("fee".to_string(), json!({ "name": "Levy" }));
        config.apply_overrides(|name| match name {
            STORE_NAME_VAR => Some("Night Market".to_string()),
            FEE_PRICE_VAR => Some(" 1.25 ".to_string()),
            _ => None,
        });

        assert_eq!(config.store.name, "Night Market");
        assert_eq!(config.options["fee"], json!({ "name": "Levy", "price": "1.25" }));
    }

    #[test]
    fn test_bad_fee_price_override_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|name| (name == FEE_PRICE_VAR).then(|| "cheap".to_string()));
        assert!(config.options.get("fee").is_none());
    }

    #[test]
    fn test_format_currency() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
        assert_eq!(config.format_currency(Money::from_cents(-1234)), "-$12.34");
        assert_eq!(config.format_currency(Money::zero()), "$0.00");
    }
}
