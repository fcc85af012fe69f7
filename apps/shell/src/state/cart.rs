//! # Cart State
//!
//! Holds the cart being rung up.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>`: channel handlers and the shell
//! itself may both reach it, and only one of them should modify it at a
//! time.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Caller                     CartState                 Cart change       │
//! │  ──────                     ─────────                 ───────────       │
//! │                                                                         │
//! │  add default fee ─────────► with_cart_mut ──────────► add_fee()         │
//! │                                                                         │
//! │  price the cart ──────────► with_cart_mut ──────────► recalculate()     │
//! │                                                                         │
//! │  show receipt ────────────► snapshot() ─────────────► (read only)       │
//! │                                                                         │
//! │  NOTE: All operations acquire the Mutex lock exclusively.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use cartline_core::{Cart, CartTotals};
use serde::Serialize;
use serde_json::Value;

/// Cart contents plus totals, ready for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Lines grouped as `line_items` / `fee_lines` / `shipping_lines`
    pub order: Value,
    pub totals: CartTotals,
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        CartSnapshot {
            order: cart.to_json(),
            totals: cart.totals(),
        }
    }
}

/// Shared cart state.
///
/// Cloning shares the same cart.
#[derive(Debug, Clone)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState {
            cart: Arc::new(Mutex::new(Cart::new())),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(|cart| cart.totals());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_fee(&services, None))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    pub fn snapshot(&self) -> CartSnapshot {
        self.with_cart(|cart| CartSnapshot::from(cart))
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartline_core::{Money, Services, TaxRateTable};
    use serde_json::json;

    #[test]
    fn test_clones_share_the_cart() {
        let state = CartState::new();
        let other = state.clone();

        state
            .with_cart_mut(|cart| cart.add_fee(&Services::detached(), None))
            .unwrap();

        assert_eq!(other.with_cart(Cart::len), 1);
    }

    #[test]
    fn test_snapshot() {
        let state = CartState::new();
        let fee = cartline_core::attributes::attributes([("total", json!("3.50"))]);
        state.with_cart_mut(|cart| {
            cart.add_fee(&Services::detached(), Some(fee)).unwrap();
            cart.recalculate(&TaxRateTable::default());
        });

        let snapshot = state.snapshot();
        assert_eq!(snapshot.order["fee_lines"][0]["price"], json!("3.50"));
        assert_eq!(snapshot.totals.total, Money::from_cents(350));

        let encoded = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(encoded["totals"]["lineCount"], json!(1));
    }
}
