//! # Error Types
//!
//! Domain-specific error types for billmitra-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  billmitra-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  billmitra-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  billmitra-engine errors (separate crate)                              │
//! │  └── EngineError      - Finalize / counter / backup failures           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → caller              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, field, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message, so the UI can show
//!    validation failures without any translation layer

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Insufficient stock to bill the requested quantity.
    ///
    /// ## When This Occurs
    /// - Product has stock tracking enabled (`stock` is `Some`)
    /// - Draft invoice bills more than the available quantity
    ///
    /// ## User Workflow
    /// ```text
    /// Add line (billed qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Detergent Bar", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Detergent Bar: Available 3, Required 5"
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: f64,
        requested: f64,
    },

    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any computation runs. The discount
/// variants carry the exact wording shown on the invoice screen.
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
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be a finite number (not NaN or infinity).
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Invalid format (e.g., invalid HSN code, invalid prefix).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Discount value is negative.
    #[error("Discount cannot be negative")]
    NegativeDiscount,

    /// Flat discount is larger than the invoice subtotal.
    #[error("Discount cannot exceed subtotal")]
    DiscountExceedsSubtotal,

    /// Percentage discount is above 100%.
    #[error("Discount percentage cannot exceed 100%")]
    DiscountPercentTooLarge,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
