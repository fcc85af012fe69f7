//! # Validation Module
//!
//! Checks for tax rate tables handed to the core by configuration.
//!
//! Line-item attributes are deliberately NOT validated: any name may be read
//! or written. Only the rate table, which drives tax math, is checked, and
//! only once when it is loaded.
//!
//! ## Usage
//! ```rust
//! use cartline_core::tax::TaxRateRecord;
//! use cartline_core::validation::validate_tax_rates;
//!
//! let rates = vec![TaxRateRecord::new(1, "", "VAT", 2000)];
//! assert!(validate_tax_rates(&rates).is_ok());
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::tax::TaxRateRecord;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest label a rate may carry (it is printed on receipts).
pub const MAX_TAX_LABEL_LEN: usize = 100;

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "rate_bps".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates a tax rate label.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_TAX_LABEL_LEN`] characters
pub fn validate_tax_label(label: &str) -> ValidationResult<()> {
    let label = label.trim();

    if label.is_empty() {
        return Err(ValidationError::Required {
            field: "label".to_string(),
        });
    }

    if label.chars().count() > MAX_TAX_LABEL_LEN {
        return Err(ValidationError::TooLong {
            field: "label".to_string(),
            max: MAX_TAX_LABEL_LEN,
        });
    }

    Ok(())
}

/// Validates a whole rate table: every record, plus unique ids.
pub fn validate_tax_rates(rates: &[TaxRateRecord]) -> ValidationResult<()> {
    let mut seen = HashSet::new();

    for rate in rates {
        validate_tax_rate_bps(rate.rate_bps)?;
        validate_tax_label(&rate.label)?;

        if !seen.insert(rate.id) {
            return Err(ValidationError::Duplicate {
                field: "tax rate id".to_string(),
                value: rate.id.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
