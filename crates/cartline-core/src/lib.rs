//! # cartline-core: Line-Item Pricing Model
//!
//! The pricing/tax data model behind a point-of-sale cart. Every cart line
//! (product, fee, shipping) exposes the same derived monetary fields so the
//! cart can sum heterogeneous lines without knowing which is which.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cartline Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/shell                                   │   │
//! │  │   config (TOML/env) · option store · catalog · channels         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Services (injected)                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cartline-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ line_item │  │    fee    │  │    tax    │  │   cart    │  │   │
//! │  │   │  base +   │  │  product  │  │ TaxLines  │  │  CartLine │  │   │
//! │  │   │  trait    │  │  shipping │  │ RateTable │  │  sum()    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CONFIG FILES • NO UI                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`attributes`] - Attribute map and the `lookup` helper
//! - [`services`] - Option store / translator collaborator traits
//! - [`line_item`] - Shared base entity and the `LineItem` trait
//! - [`fee`], [`product`], [`shipping`] - The line variants
//! - [`tax`] - Tax rates and tax line collections
//! - [`cart`] - Cart aggregator
//! - [`money`] - Integer money
//! - [`error`] - Domain error types
//! - [`validation`] - Tax rate table checks
//!
//! ## Example Usage
//!
//! ```rust
//! use cartline_core::{Fee, LineItem, Services};
//! use serde_json::json;
//!
//! let fee = Fee::new(&Services::detached());
//! assert_eq!(fee.get("name"), Some(&json!("Fee")));
//! assert_eq!(fee.get("subtotal"), fee.get("total"));
//! assert_eq!(fee.to_json()["taxes"], json!([]));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod attributes;
pub mod cart;
pub mod error;
pub mod fee;
pub mod line_item;
pub mod money;
pub mod product;
pub mod services;
pub mod shipping;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use attributes::{lookup, Attributes};
pub use cart::{Cart, CartLine, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use fee::Fee;
pub use line_item::{LineItem, LineItemBase, LineItemDefaults};
pub use money::Money;
pub use product::ProductLine;
pub use services::{EntityQuery, OptionLookup, Services, Translate};
pub use shipping::ShippingLine;
pub use tax::{TaxLine, TaxLines, TaxRateRecord, TaxRateTable};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart.
///
/// Prevents runaway carts and keeps transactions a reasonable size.
pub const MAX_CART_LINES: usize = 100;
