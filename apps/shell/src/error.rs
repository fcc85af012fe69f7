//! # Shell Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the shell                              │
//! │                                                                         │
//! │  load config ──── ConfigError::Read / Parse / InvalidTaxRates ──┐      │
//! │                                                                  │      │
//! │  channel.request ─ ChannelError::NoHandler ──────────────────────┤      │
//! │                                                                  │      │
//! │  cart ops ──────── CoreError (cartline-core) ────────────────────┤      │
//! │                                                                  ▼      │
//! │                                                            ShellError   │
//! │                                                                         │
//! │  Option and translation lookups never error: absence is a value.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use cartline_core::{CoreError, ValidationError};
use thiserror::Error;

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`crate::state::AppConfig`].
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The tax rate table failed validation.
    #[error("Invalid tax rates: {0}")]
    InvalidTaxRates(#[from] ValidationError),
}

/// Messaging failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChannelError {
    /// Nobody answers `request` on `channel`.
    #[error("No handler for '{request}' on channel '{channel}'")]
    NoHandler { channel: String, request: String },
}

/// Top-level error for the shell binary.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ShellResult<T> = Result<T, ShellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_handler_message() {
        let err = ChannelError::NoHandler {
            channel: "header".to_string(),
            request: "open:menu".to_string(),
        };
        assert_eq!(err.to_string(), "No handler for 'open:menu' on channel 'header'");
    }

    #[test]
    fn test_errors_convert_to_shell_error() {
        let err: ShellError = ChannelError::NoHandler {
            channel: "header".to_string(),
            request: "x".to_string(),
        }
        .into();
        assert!(matches!(err, ShellError::Channel(_)));

        let err: ShellError = ConfigError::from(ValidationError::Required {
            field: "label".to_string(),
        })
        .into();
        assert_eq!(err.to_string(), "Invalid tax rates: label is required");
    }
}
