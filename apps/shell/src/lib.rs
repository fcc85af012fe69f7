//! # Cartline Shell Library
//!
//! Wires the pricing core to configuration, collaborators and the header
//! service, then rings up a demonstration cart.
//!
//! ## Module Organization
//! ```text
//! cartline_shell/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── context.rs      ◄─── AppContext and the Service trait
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── Cart state management
//! │   └── config.rs   ◄─── Configuration (TOML + env)
//! ├── store.rs        ◄─── Option store and translation catalog
//! ├── channel.rs      ◄─── Request/reply channels
//! ├── header/         ◄─── Title bar / menu service
//! └── error.rs        ◄─── Shell error types
//! ```

pub mod channel;
pub mod context;
pub mod error;
pub mod header;
pub mod state;
pub mod store;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use context::AppContext;
use error::ShellResult;
use header::{HEADER_CHANNEL, UPDATE_TITLE};
use state::{AppConfig, CartSnapshot};

/// Runs the shell.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter                                │
/// │     • Default: info,cartline=debug; override with RUST_LOG              │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • CARTLINE_CONFIG or the platform config dir                        │
/// │     • CARTLINE_* overrides                                              │
/// │                                                                         │
/// │  3. Build AppContext and start services ──────────────────────────────► │
/// │                                                                         │
/// │  4. Ring up the default fee, recalculate, print the cart ─────────────► │
/// │                                                                         │
/// │  5. Stop services                                                       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> ShellResult<()> {
    init_tracing();
    info!("Starting Cartline shell");

    let config = AppConfig::from_env()?;
    let mut context = AppContext::new(config);
    context.start();

    let snapshot = ring_up_default_fee(&context)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    let config = context.config();
    let totals = snapshot.totals;
    let summary = format!(
        "{}: {} line(s), total {} + tax {} = {}",
        config.store.name,
        totals.line_count,
        config.format_currency(totals.total),
        config.format_currency(totals.total_tax),
        config.format_currency(totals.grand_total),
    );
    context
        .channels()
        .request(HEADER_CHANNEL, UPDATE_TITLE, summary.clone().into())?;
    info!(%summary, "cart priced");

    context.stop();
    Ok(())
}

/// Adds a fee built from configured defaults and prices the cart.
pub fn ring_up_default_fee(context: &AppContext) -> ShellResult<CartSnapshot> {
    let services = context.services();
    let rates = context.tax_rates();

    let cid = context.cart().with_cart_mut(|cart| {
        let cid = cart.add_fee(services, None)?;
        cart.recalculate(rates);
        Ok::<_, cartline_core::CoreError>(cid)
    })?;
    debug!(%cid, "default fee added");

    Ok(context.cart().snapshot())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=cartline_core=trace` - Show trace for the core only
/// - Default: `info,cartline=debug`
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cartline=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartline_core::{Money, TaxRateRecord};
    use serde_json::json;

    #[test]
    fn test_ring_up_default_fee() {
        let mut config = AppConfig::default();
        config
            .options
            .insert("fee".to_string(), json!({ "price": "2.50", "tax_class": "reduced" }));
        config.tax_rates.push(TaxRateRecord::new(1, "reduced", "Reduced", 500));
        config.tax_rates.push(TaxRateRecord::new(2, "", "Standard", 2000));

        let context = AppContext::new(config);
        let snapshot = ring_up_default_fee(&context).unwrap();

        let fee = &snapshot.order["fee_lines"][0];
        assert_eq!(fee["name"], json!("Fee"));
        assert_eq!(fee["tax_class"], json!("reduced"));
        assert_eq!(fee["taxes"][0]["label"], json!("Reduced"));
        assert_eq!(snapshot.totals.total, Money::from_cents(250));
        // 5% of 2.50 = 0.125 → 0.13
        assert_eq!(snapshot.totals.total_tax, Money::from_cents(13));
    }

    #[test]
    fn test_init_tracing_twice() {
        init_tracing();
        init_tracing();
    }
}
