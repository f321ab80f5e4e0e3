//! # Validation Module
//!
//! Input validation for product records.
//!
//! ## Where Validation Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Points                                  │
//! │                                                                         │
//! │  Product::new(...)            ← admin adds a slot                       │
//! │  Product::try_from(record)    ← snapshot restore                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  THIS MODULE: code, name, price rules                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Catalog only ever holds valid products                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vend_core::validation::{validate_code, validate_price_cents};
//!
//! assert!(validate_code("A1").is_ok());
//! assert!(validate_price_cents(175).is_ok());
//! ```

use crate::error::ValidationError;
use crate::{MAX_CODE_LEN, MAX_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a slot code.
///
/// ## Rules
/// - Must not be empty
/// - At most `MAX_CODE_LEN` characters
/// - ASCII letters and digits only ("A1", "F4", "H3")
///
/// ## Example
/// ```rust
/// use vend_core::validation::validate_code;
///
/// assert!(validate_code("B2").is_ok());
/// assert!(validate_code("").is_err());
/// assert!(validate_code("B 2").is_err());
/// ```
pub fn validate_code(code: &str) -> ValidationResult<()> {
    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > MAX_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_CODE_LEN,
        });
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters and digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a product display name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most `MAX_NAME_LEN` characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use vend_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(175).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
