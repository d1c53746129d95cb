//! # Validation Module
//!
//! Input validation for BillMitra.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Screen / client                                              │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (business rule validation)                       │
//! │  ├── Discount policy (the primary gate before totals run)             │
//! │  └── Field rules (HSN, GST rate, prefix, quantities)                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Calculation engine                                           │
//! │  └── Defensive clamps only (discount capped at subtotal)              │
//! │                                                                         │
//! │  The validator REJECTS with a message; the engine CLAMPS silently.     │
//! │  Both exist on purpose: the validator is what the user sees, the      │
//! │  clamp is the fallback when a caller skips validation.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::DiscountType;
use crate::{HSN_MAX_LEN, HSN_MIN_LEN, MAX_INVOICE_PREFIX_LEN, MAX_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Discount Validation
// =============================================================================

/// Validates a discount against the current subtotal.
///
/// This runs BEFORE totals are computed; the calculation engine's clamp is
/// only a defensive fallback. The error messages are shown to the user
/// verbatim.
///
/// ## Rules
/// - `None` is always valid
/// - value must not be negative
/// - a flat discount must not exceed the subtotal
/// - a percentage discount must not exceed 100%
///
/// ## Example
/// ```rust
/// use billmitra_core::types::DiscountType;
/// use billmitra_core::validation::validate_discount;
///
/// assert!(validate_discount(DiscountType::Percent, 10.0, 1000.0).is_ok());
/// assert!(validate_discount(DiscountType::Percent, 101.0, 1000.0).is_err());
/// assert!(validate_discount(DiscountType::Flat, 1500.0, 1000.0).is_err());
/// ```
pub fn validate_discount(
    discount_type: DiscountType,
    value: f64,
    subtotal: f64,
) -> ValidationResult<()> {
    if discount_type == DiscountType::None {
        return Ok(());
    }

    if value < 0.0 {
        return Err(ValidationError::NegativeDiscount);
    }

    if discount_type == DiscountType::Flat && value > subtotal {
        return Err(ValidationError::DiscountExceedsSubtotal);
    }

    if discount_type == DiscountType::Percent && value > 100.0 {
        return Err(ValidationError::DiscountPercentTooLarge);
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("product name", name)
}

/// Validates an outlet name.
pub fn validate_outlet_name(name: &str) -> ValidationResult<()> {
    validate_name("outlet name", name)
}

fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an HSN code (4-8 digits).
///
/// ## Example
/// ```rust
/// use billmitra_core::validation::validate_hsn_code;
///
/// assert!(validate_hsn_code("3401").is_ok());
/// assert!(validate_hsn_code("34011190").is_ok());
/// assert!(validate_hsn_code("34").is_err());
/// assert!(validate_hsn_code("34A1").is_err());
/// ```
pub fn validate_hsn_code(hsn: &str) -> ValidationResult<()> {
    let hsn = hsn.trim();

    if hsn.is_empty() {
        return Err(ValidationError::Required {
            field: "hsn_code".to_string(),
        });
    }

    if hsn.len() < HSN_MIN_LEN || hsn.len() > HSN_MAX_LEN || !hsn.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ValidationError::InvalidFormat {
            field: "hsn_code".to_string(),
            reason: format!("must be {HSN_MIN_LEN}-{HSN_MAX_LEN} digits"),
        });
    }

    Ok(())
}

/// Validates an invoice number prefix.
///
/// ## Rules
/// - Must not be empty
/// - Maximum 20 characters
/// - Letters and digits only. In particular no `-`: the printed number is
///   `"{prefix}-{n}"` and parsing it back splits on the dash, so a dash
///   inside the prefix would make the number ambiguous.
pub fn validate_invoice_prefix(prefix: &str) -> ValidationResult<()> {
    let prefix = prefix.trim();

    if prefix.is_empty() {
        return Err(ValidationError::Required {
            field: "invoice_prefix".to_string(),
        });
    }

    if prefix.len() > MAX_INVOICE_PREFIX_LEN {
        return Err(ValidationError::TooLong {
            field: "invoice_prefix".to_string(),
            max: MAX_INVOICE_PREFIX_LEN,
        });
    }

    if !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: "invoice_prefix".to_string(),
            reason: "must contain only letters and digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a GST rate as a whole percent (0-100).
pub fn validate_gst_rate(rate: f64) -> ValidationResult<()> {
    if !rate.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "gst_rate".to_string(),
        });
    }

    if !(0.0..=100.0).contains(&rate) {
        return Err(ValidationError::OutOfRange {
            field: "gst_rate".to_string(),
            min: 0.0,
            max: 100.0,
        });
    }

    Ok(())
}

/// Validates a rupee price.
///
/// ## Rules
/// - Must be finite (NaN/infinity would poison every downstream total)
/// - Must be non-negative; zero is allowed (free items)
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "price".to_string(),
        });
    }

    if price < 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a billed quantity.
///
/// ## Rules
/// - Must be finite
/// - Must be strictly positive (fractional quantities are fine - loose
///   goods are sold by weight)
pub fn validate_quantity(quantity: f64) -> ValidationResult<()> {
    if !quantity.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "quantity".to_string(),
        });
    }

    if quantity <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_discount_none_always_valid() {
        assert!(validate_discount(DiscountType::None, -999.0, 0.0).is_ok());
    }

    #[test]
    fn test_validate_discount_negative() {
        let err = validate_discount(DiscountType::Flat, -1.0, 100.0).unwrap_err();
        assert_eq!(err.to_string(), "Discount cannot be negative");

        let err = validate_discount(DiscountType::Percent, -0.01, 100.0).unwrap_err();
        assert_eq!(err.to_string(), "Discount cannot be negative");
    }

    #[test]
    fn test_validate_discount_flat_exceeds_subtotal() {
        assert!(validate_discount(DiscountType::Flat, 100.0, 100.0).is_ok());
        let err = validate_discount(DiscountType::Flat, 100.01, 100.0).unwrap_err();
        assert_eq!(err.to_string(), "Discount cannot exceed subtotal");
    }

    #[test]
    fn test_validate_discount_percent_over_100() {
        assert!(validate_discount(DiscountType::Percent, 100.0, 50.0).is_ok());
        let err = validate_discount(DiscountType::Percent, 100.5, 50.0).unwrap_err();
        assert_eq!(err.to_string(), "Discount percentage cannot exceed 100%");
    }

    #[test]
    fn test_validate_names() {
        assert!(validate_product_name("Detergent Bar 250g").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());

        assert!(validate_outlet_name("Corner Store").is_ok());
        assert!(validate_outlet_name("").is_err());
    }

    #[test]
    fn test_validate_hsn_code() {
        assert!(validate_hsn_code("3401").is_ok());
        assert!(validate_hsn_code("340111").is_ok());
        assert!(validate_hsn_code("34011190").is_ok());

        assert!(validate_hsn_code("").is_err());
        assert!(validate_hsn_code("340").is_err());
        assert!(validate_hsn_code("340111901").is_err());
        assert!(validate_hsn_code("34O1").is_err()); // letter O, not zero
    }

    #[test]
    fn test_validate_invoice_prefix() {
        assert!(validate_invoice_prefix("KTMVS").is_ok());
        assert!(validate_invoice_prefix("INV2024").is_ok());

        assert!(validate_invoice_prefix("").is_err());
        assert!(validate_invoice_prefix("INV-2024").is_err()); // dash is reserved
        assert!(validate_invoice_prefix(&"A".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_gst_rate() {
        assert!(validate_gst_rate(0.0).is_ok());
        assert!(validate_gst_rate(18.0).is_ok());
        assert!(validate_gst_rate(100.0).is_ok());

        assert!(validate_gst_rate(-1.0).is_err());
        assert!(validate_gst_rate(101.0).is_err());
        assert!(validate_gst_rate(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(99.99).is_ok());
        assert!(validate_price(-0.01).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1.0).is_ok());
        assert!(validate_quantity(2.5).is_ok());

        assert!(validate_quantity(0.0).is_err());
        assert!(validate_quantity(-1.0).is_err());
        assert!(validate_quantity(f64::NAN).is_err());
    }
}
