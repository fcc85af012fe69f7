//! # Error Types
//!
//! Domain-specific error types for cartline-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cartline-core errors (this file)                                      │
//! │  ├── CoreError        - Cart operations                                │
//! │  └── ValidationError  - Tax rate records supplied by configuration     │
//! │                                                                         │
//! │  shell errors (apps/shell)                                             │
//! │  ├── ConfigError      - Config file read/parse                         │
//! │  └── ChannelError     - Request with no registered handler             │
//! │                                                                         │
//! │  NOT errors: missing options, missing translations, unknown            │
//! │  attributes. Those resolve to defaults or `None`.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use uuid::Uuid;

// =============================================================================
// Core Error
// =============================================================================

/// Cart-level errors.
///
/// Line items themselves never fail; only operations addressing a line that
/// is not in the cart, or growing the cart past its limit, do.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No line with this client id is in the cart.
    #[error("Cart line not found: {0}")]
    LineNotFound(Uuid),

    /// Cart has reached the maximum number of lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Two records claim the same identifier.
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
