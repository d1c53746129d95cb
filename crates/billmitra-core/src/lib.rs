//! # billmitra-core: Pure Business Logic for BillMitra
//!
//! This crate is the **heart** of BillMitra, a GST billing system for small
//! businesses. It contains all business logic as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       BillMitra Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   Client (screens / CLI tooling)                │   │
//! │  │   Catalog UI ──► Draft Invoice UI ──► Preview ──► PDF Share    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 billmitra-engine (services)                     │   │
//! │  │    invoice counter, finalize flow, stock, backup               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ billmitra-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │  ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌────────────────┐ │   │
//! │  │  │   types   │ │ calculate │ │   words   │ │ invoice_number │ │   │
//! │  │  │  Product  │ │ line item │ │  Rupees   │ │ format/parse   │ │   │
//! │  │  │  Invoice  │ │  totals   │ │  in words │ │  PREFIX-N      │ │   │
//! │  │  └───────────┘ └───────────┘ └───────────┘ └────────────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 billmitra-db (Database Layer)                   │   │
//! │  │           SQLite queries, migrations, repositories              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Outlet, Invoice, CompanySettings)
//! - [`money`] - Centralized rounding and currency formatting
//! - [`calculate`] - GST line-item and invoice totals engine
//! - [`words`] - Amount-to-words (Indian numbering system)
//! - [`invoice_number`] - Invoice number formatting and parsing
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **One Rounding Utility**: All monetary rounding flows through [`money::round2`]
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use billmitra_core::calculate::compute_line_item;
//! use billmitra_core::types::Product;
//!
//! let soap = Product::sample("Detergent Bar", 100.0, 18.0);
//!
//! // 2 units at ₹100 each, 18% GST split evenly across CGST/SGST
//! let line = compute_line_item(&soap, 2.0, 100.0);
//! assert_eq!(line.taxable_amount, 200.0);
//! assert_eq!(line.cgst_amount, 18.0);
//! assert_eq!(line.sgst_amount, 18.0);
//! assert_eq!(line.total_amount, 236.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculate;
pub mod error;
pub mod invoice_number;
pub mod money;
pub mod types;
pub mod validation;
pub mod words;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use billmitra_core::Product` instead of
// `use billmitra_core::types::Product`

pub use calculate::{compute_invoice_totals, compute_line_item, LineItemAmounts};
pub use error::{CoreError, ValidationError};
pub use invoice_number::{format_invoice_number, parse_invoice_number, ParsedInvoiceNumber};
pub use types::*;
pub use words::number_to_words;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product, outlet, or company name.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of an invoice number prefix.
///
/// ## Business Reason
/// Prefixes appear on every printed invoice ("KTMVS-101"); anything longer
/// than this is a data-entry mistake, not a real prefix.
pub const MAX_INVOICE_PREFIX_LEN: usize = 20;

/// Valid HSN code lengths under GST (4, 6 or 8 digits; we accept 4-8).
pub const HSN_MIN_LEN: usize = 4;
pub const HSN_MAX_LEN: usize = 8;
