//! # Domain Types
//!
//! Core domain types used throughout BillMitra.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Outlet      │   │    Invoice      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  hsn_code       │   │  name           │   │  prefix+number  │       │
//! │  │  base_price     │   │  address        │   │  items[]        │       │
//! │  │  gst_rate (%)   │   │  gst_no?        │   │  totals         │       │
//! │  │  stock?         │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  InvoiceItem    │   │  DiscountType   │   │ CompanySettings │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product snap   │   │  None           │   │  gstin, state   │       │
//! │  │  billed qty     │   │  Flat           │   │  bank details   │       │
//! │  │  CGST/SGST      │   │  Percent        │   │  invoice_prefix │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Monetary Fields
//! All amounts are rupee values rounded to 2 decimal places through
//! [`crate::money::round2`] before they are stored on any of these types.
//! GST rates are whole-percent values (18.0 means 18%), split evenly
//! between CGST and SGST as intra-state tax law requires.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Discount Type
// =============================================================================

/// How an invoice-level discount is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// No discount applied.
    #[default]
    None,
    /// A fixed rupee amount off the subtotal.
    Flat,
    /// A percentage of the subtotal.
    Percent,
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// Immutable once created except for stock adjustments and soft deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in the catalog and on the invoice.
    pub name: String,

    /// HSN (Harmonized System of Nomenclature) code printed per GST rules.
    pub hsn_code: String,

    /// Default unit price in rupees.
    pub base_price: f64,

    /// GST rate as a whole percent (18.0 = 18%).
    pub gst_rate: f64,

    /// Unit of measure shown on the invoice ("PCS", "KG", "BOX").
    pub unit: String,

    /// Current stock level. `None` disables stock tracking for this product.
    pub stock: Option<f64>,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether stock tracking is enabled for this product.
    #[inline]
    pub fn tracks_stock(&self) -> bool {
        self.stock.is_some()
    }

    /// Checks if the requested quantity can be billed.
    ///
    /// Products without stock tracking can always be billed.
    pub fn has_stock_for(&self, quantity: f64) -> bool {
        match self.stock {
            Some(available) => available >= quantity,
            None => true,
        }
    }

    /// Builds a minimal product for tests, seeds and documentation examples.
    ///
    /// ## Example
    /// ```rust
    /// use billmitra_core::types::Product;
    ///
    /// let p = Product::sample("Detergent Bar", 100.0, 18.0);
    /// assert_eq!(p.gst_rate, 18.0);
    /// assert!(!p.tracks_stock());
    /// ```
    pub fn sample(name: &str, base_price: f64, gst_rate: f64) -> Self {
        let now = Utc::now();
        Product {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            hsn_code: "3401".to_string(),
            base_price,
            gst_rate,
            unit: "PCS".to_string(),
            stock: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Outlet
// =============================================================================

/// A customer outlet that invoices are billed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Outlet {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Outlet / shop name.
    pub name: String,

    /// Complete billing address.
    pub address: String,

    /// GSTIN of the outlet. Optional for B2C, required for B2B invoices.
    pub gst_no: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Invoice Item
// =============================================================================

/// A line item on a draft or finalized invoice.
///
/// Uses snapshot pattern: the full product is frozen onto the line so the
/// invoice stays consistent even if the catalog changes afterwards.
///
/// ## Field Semantics
/// - `actual_quantity`: physically counted quantity, informational only;
///   it never participates in tax math
/// - `billed_quantity`: the quantity actually charged
/// - `taxable_amount` = round2(billed_quantity × unit_price)
/// - `cgst_amount` / `sgst_amount`: each half of the GST on the taxable
///   amount (intra-state split)
/// - `rot_percent`: Rate of Tax, mirrors `product.gst_rate` for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: String,
    pub product: Product,
    pub actual_quantity: f64,
    pub billed_quantity: f64,
    pub unit_price: f64,
    pub taxable_amount: f64,
    pub cgst_amount: f64,
    pub sgst_amount: f64,
    pub total_amount: f64,
    pub rot_percent: f64,
}

impl InvoiceItem {
    /// Creates a line item from a product, computing all tax fields.
    ///
    /// Mutating quantity or price means rebuilding the line through this
    /// constructor; the tax fields are never edited piecemeal.
    pub fn compute(
        id: impl Into<String>,
        product: Product,
        actual_quantity: f64,
        billed_quantity: f64,
        unit_price: f64,
    ) -> Self {
        let amounts = crate::calculate::compute_line_item(&product, billed_quantity, unit_price);
        InvoiceItem {
            id: id.into(),
            product,
            actual_quantity,
            billed_quantity,
            unit_price,
            taxable_amount: amounts.taxable_amount,
            cgst_amount: amounts.cgst_amount,
            sgst_amount: amounts.sgst_amount,
            total_amount: amounts.total_amount,
            rot_percent: amounts.rot_percent,
        }
    }
}

// =============================================================================
// Invoice Totals
// =============================================================================

/// Invoice-level totals, every field rounded to 2 decimal places.
///
/// Produced by [`crate::calculate::compute_invoice_totals`]; copied onto the
/// [`Invoice`] at finalization time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct InvoiceTotals {
    /// Sum of all taxable amounts (before discount).
    pub subtotal: f64,
    /// Calculated discount in rupees (capped at subtotal).
    pub discount_amount: f64,
    /// Subtotal minus discount.
    pub subtotal_after_discount: f64,
    /// Total CGST, recomputed on the discounted taxable base.
    pub total_cgst: f64,
    /// Total SGST, recomputed on the discounted taxable base.
    pub total_sgst: f64,
    /// CGST + SGST.
    pub total_tax: f64,
    /// Subtotal after discount plus taxes.
    pub total_before_round_off: f64,
    /// Delta to the nearest whole rupee (can be negative). Zero when
    /// round-off is disabled.
    pub round_off: f64,
    /// Final payable amount.
    pub grand_total: f64,
}

// =============================================================================
// Invoice
// =============================================================================

/// A finalized GST invoice.
///
/// ## Invariants
/// - `grand_total = subtotal_after_discount + total_cgst + total_sgst + round_off`
/// - `subtotal_after_discount = subtotal - discount_amount`
/// - `discount_amount <= subtotal`
/// - `full_invoice_number = "{invoice_prefix}-{invoice_number}"`
///
/// Created at finalization time (the moment a number is committed); the
/// in-memory draft it came from is discarded afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,

    /// Bare sequence number as a string ("101").
    pub invoice_number: String,
    /// Company-configured prefix ("KTMVS").
    pub invoice_prefix: String,
    /// Complete printed number ("KTMVS-101").
    pub full_invoice_number: String,

    /// Invoice date.
    pub date: DateTime<Utc>,

    // Customer/Outlet snapshot
    pub outlet_name: String,
    pub outlet_address: String,
    /// Optional for B2C, required for B2B.
    pub customer_gst_no: Option<String>,

    // Tax jurisdiction display
    pub state: String,
    pub state_code: String,

    pub items: Vec<InvoiceItem>,

    // Discount configuration as entered
    pub discount_type: DiscountType,
    pub discount_value: f64,

    // Totals (see InvoiceTotals for field meanings)
    pub subtotal: f64,
    pub discount_amount: f64,
    pub subtotal_after_discount: f64,
    pub total_cgst: f64,
    pub total_sgst: f64,
    pub total_tax: f64,
    pub total_before_round_off: f64,
    pub round_off: f64,
    pub grand_total: f64,

    /// Grand total in words ("One Thousand ... Rupees Only"), the legal
    /// representation printed under the totals table.
    pub amount_in_words: String,
}

impl Invoice {
    /// Copies computed totals onto the invoice.
    pub fn apply_totals(&mut self, totals: &InvoiceTotals) {
        self.subtotal = totals.subtotal;
        self.discount_amount = totals.discount_amount;
        self.subtotal_after_discount = totals.subtotal_after_discount;
        self.total_cgst = totals.total_cgst;
        self.total_sgst = totals.total_sgst;
        self.total_tax = totals.total_tax;
        self.total_before_round_off = totals.total_before_round_off;
        self.round_off = totals.round_off;
        self.grand_total = totals.grand_total;
    }
}

// =============================================================================
// Company Settings
// =============================================================================

/// Bank details printed in the invoice footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BankDetails {
    pub account_holder: String,
    pub bank_name: String,
    pub account_number: String,
    pub branch: String,
    pub ifsc_code: String,
}

/// Company configuration used on every invoice.
///
/// All fields are enumerated explicitly; `Default` yields the all-empty
/// settings a fresh install starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CompanySettings {
    pub name: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub state_code: String,
    pub pincode: String,
    pub gstin: String,
    pub mobile1: String,
    pub mobile2: String,
    pub office_phone: String,
    pub email: String,
    pub bank_details: BankDetails,
    /// Prefix for generated invoice numbers. Must not contain `-`.
    pub invoice_prefix: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_type_default() {
        assert_eq!(DiscountType::default(), DiscountType::None);
    }

    #[test]
    fn test_product_stock_tracking() {
        let mut p = Product::sample("Detergent Bar", 100.0, 18.0);
        assert!(!p.tracks_stock());
        assert!(p.has_stock_for(1_000_000.0));

        p.stock = Some(5.0);
        assert!(p.tracks_stock());
        assert!(p.has_stock_for(5.0));
        assert!(!p.has_stock_for(5.5));
    }

    #[test]
    fn test_company_settings_default_is_empty() {
        let settings = CompanySettings::default();
        assert_eq!(settings.name, "");
        assert_eq!(settings.invoice_prefix, "");
        assert_eq!(settings.bank_details, BankDetails::default());
    }

    #[test]
    fn test_invoice_apply_totals() {
        let totals = InvoiceTotals {
            subtotal: 1000.0,
            discount_amount: 100.0,
            subtotal_after_discount: 900.0,
            total_cgst: 81.0,
            total_sgst: 81.0,
            total_tax: 162.0,
            total_before_round_off: 1062.0,
            round_off: 0.0,
            grand_total: 1062.0,
        };

        let mut invoice = Invoice {
            id: "inv-1".to_string(),
            invoice_number: "1".to_string(),
            invoice_prefix: "INV".to_string(),
            full_invoice_number: "INV-1".to_string(),
            date: Utc::now(),
            outlet_name: "Corner Store".to_string(),
            outlet_address: "MG Road".to_string(),
            customer_gst_no: None,
            state: "Kerala".to_string(),
            state_code: "32".to_string(),
            items: Vec::new(),
            discount_type: DiscountType::Percent,
            discount_value: 10.0,
            subtotal: 0.0,
            discount_amount: 0.0,
            subtotal_after_discount: 0.0,
            total_cgst: 0.0,
            total_sgst: 0.0,
            total_tax: 0.0,
            total_before_round_off: 0.0,
            round_off: 0.0,
            grand_total: 0.0,
            amount_in_words: String::new(),
        };

        invoice.apply_totals(&totals);

        // Grand total must decompose exactly into its parts.
        assert_eq!(
            invoice.grand_total,
            invoice.subtotal_after_discount + invoice.total_cgst + invoice.total_sgst
                + invoice.round_off
        );
        assert_eq!(
            invoice.subtotal_after_discount,
            invoice.subtotal - invoice.discount_amount
        );
    }
}
