//! # Cartline Shell Entry Point
//!
//! Loads configuration, starts the header service, prices a cart holding
//! the store's default fee and prints it as JSON.
//!
//! ## Configuration
//! - `CARTLINE_CONFIG`: path to `cartline.toml`
//! - `CARTLINE_STORE_NAME`, `CARTLINE_FEE_PRICE`: overrides
//! - `RUST_LOG`: log filter (logs go to stderr)

use std::process::ExitCode;

fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    match cartline_shell::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "cartline shell failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
