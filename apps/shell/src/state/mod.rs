//! # State Module
//!
//! Application state for the shell, split by concern instead of one big
//! struct so each consumer takes only what it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────┐              │
//! │  │      AppConfig       │        │      CartState       │              │
//! │  │                      │        │                      │              │
//! │  │  store name/locale   │        │  Arc<Mutex<Cart>>    │              │
//! │  │  options             │        │                      │              │
//! │  │  translations        │        │                      │              │
//! │  │  tax_rates           │        │                      │              │
//! │  └──────────────────────┘        └──────────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • AppConfig: Read-only after initialization                           │
//! │  • CartState: Protected by Arc<Mutex<T>> for exclusive access          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;

pub use cart::{CartSnapshot, CartState};
pub use config::{config_path, AppConfig, StoreConfig};
