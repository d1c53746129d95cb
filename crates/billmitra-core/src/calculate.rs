//! # GST Calculation Engine
//!
//! Line-item and invoice-level tax computation.
//!
//! ## Two-Pass Totals Design
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Why Totals Are Computed In Two Passes                      │
//! │                                                                         │
//! │  Pass 1 (per line, at entry time):                                     │
//! │    taxable = qty × price                                               │
//! │    CGST = SGST = taxable × rate / 2 / 100                              │
//! │                                                                         │
//! │  Pass 2 (whole invoice, at totals time):                               │
//! │    GST is owed on the POST-discount taxable value. A 10% invoice      │
//! │    discount shrinks every line's taxable base by the same ratio, so   │
//! │    tax is recomputed from each line's own taxable amount and its own  │
//! │    GST rate:                                                           │
//! │                                                                         │
//! │      ratio = subtotal_after_discount / subtotal                        │
//! │      item_cgst = (item.taxable × ratio) × item.rate / 2 / 100          │
//! │                                                                         │
//! │    NEVER by scaling the already-rounded per-line CGST/SGST fields;    │
//! │    that compounds rounding error across mixed-rate invoices.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Numeric Contract
//! - Inputs are caller-validated (see [`crate::validation`]); these
//!   functions are total over f64 and never panic.
//! - NaN and infinity propagate through unchanged. They are NOT silently
//!   converted to zero; screens must reject garbage before calling in.
//! - Each output field is independently rounded to 2 decimals via
//!   [`round2`] at the point of return.

use serde::{Deserialize, Serialize};

use crate::money::{round2, round_to_rupee};
use crate::types::{DiscountType, InvoiceItem, InvoiceTotals, Product};

// =============================================================================
// Line Item
// =============================================================================

/// Computed monetary fields for a single invoice line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineItemAmounts {
    /// round2(billed_quantity × unit_price)
    pub taxable_amount: f64,
    /// Half of the GST, computed from the rounded taxable amount.
    pub cgst_amount: f64,
    /// Identical to CGST (intra-state even split).
    pub sgst_amount: f64,
    /// taxable + CGST + SGST, from the already-rounded components.
    pub total_amount: f64,
    /// Rate of Tax: mirrors `product.gst_rate` for display/audit.
    pub rot_percent: f64,
}

/// Computes the taxed amounts for one invoice line.
///
/// The taxable amount is rounded first and the tax halves are derived from
/// that rounded value (straightforward sequential computation), so the
/// printed tax always matches the printed taxable amount it was taken from.
///
/// ## Example
/// ```rust
/// use billmitra_core::calculate::compute_line_item;
/// use billmitra_core::types::Product;
///
/// let product = Product::sample("Detergent Bar", 100.0, 18.0);
/// let line = compute_line_item(&product, 2.0, 100.0);
///
/// assert_eq!(line.taxable_amount, 200.0);
/// assert_eq!(line.cgst_amount, 18.0);
/// assert_eq!(line.sgst_amount, 18.0);
/// assert_eq!(line.total_amount, 236.0);
/// ```
pub fn compute_line_item(
    product: &Product,
    billed_quantity: f64,
    unit_price: f64,
) -> LineItemAmounts {
    let taxable_amount = round2(billed_quantity * unit_price);
    let cgst_amount = round2(taxable_amount * product.gst_rate / 2.0 / 100.0);
    let sgst_amount = round2(taxable_amount * product.gst_rate / 2.0 / 100.0);
    let total_amount = round2(taxable_amount + cgst_amount + sgst_amount);

    LineItemAmounts {
        taxable_amount,
        cgst_amount,
        sgst_amount,
        total_amount,
        rot_percent: product.gst_rate,
    }
}

// =============================================================================
// Invoice Totals
// =============================================================================

/// Computes invoice-level totals with discount and optional round-off.
///
/// ## Algorithm (order matters for reproducibility)
/// 1. subtotal = Σ item.taxable_amount
/// 2. raw discount: none → 0, flat → value, percent → subtotal × value / 100
/// 3. discount capped at subtotal (silent clamp; rejection belongs to
///    [`crate::validation::validate_discount`], which runs first)
/// 4. subtotal_after_discount = subtotal − discount
/// 5. ratio = after / subtotal, or 1 when subtotal is 0 (empty invoice)
/// 6. per item: CGST/SGST recomputed from item.taxable × ratio at the
///    item's own rate, summed unrounded
/// 7. round-off (when enabled) nudges the total to the nearest whole rupee
/// 8. every returned field rounded to 2 decimals independently
///
/// ## Example
/// ```rust
/// use billmitra_core::calculate::compute_invoice_totals;
/// use billmitra_core::types::{DiscountType, InvoiceItem, Product};
///
/// let product = Product::sample("Detergent Bar", 100.0, 18.0);
/// let item = InvoiceItem::compute("line-1", product, 10.0, 10.0, 100.0);
///
/// let totals = compute_invoice_totals(&[item], DiscountType::Percent, 10.0, false);
/// assert_eq!(totals.discount_amount, 100.0);
/// assert_eq!(totals.subtotal_after_discount, 900.0);
/// assert_eq!(totals.total_cgst, 81.0);
/// assert_eq!(totals.grand_total, 1062.0);
/// ```
pub fn compute_invoice_totals(
    items: &[InvoiceItem],
    discount_type: DiscountType,
    discount_value: f64,
    enable_round_off: bool,
) -> InvoiceTotals {
    // Step 1: subtotal before discount
    let subtotal: f64 = items.iter().map(|item| item.taxable_amount).sum();

    // Step 2: raw discount amount
    let raw_discount = match discount_type {
        DiscountType::None => 0.0,
        DiscountType::Flat => discount_value,
        DiscountType::Percent => subtotal * discount_value / 100.0,
    };

    // Step 3: discount can never push the subtotal negative
    let discount_amount = raw_discount.min(subtotal);

    // Step 4
    let subtotal_after_discount = subtotal - discount_amount;

    // Step 5: guard divide-by-zero for empty or all-zero invoices
    let discount_ratio = if subtotal > 0.0 {
        subtotal_after_discount / subtotal
    } else {
        1.0
    };

    // Step 6: re-tax every line on its discounted taxable base.
    // Restart from taxable_amount and the line's own rate; the rounded
    // per-line cgst/sgst fields are display values, not inputs.
    let mut total_cgst = 0.0;
    let mut total_sgst = 0.0;
    for item in items {
        let discounted_taxable = item.taxable_amount * discount_ratio;
        total_cgst += discounted_taxable * item.product.gst_rate / 2.0 / 100.0;
        total_sgst += discounted_taxable * item.product.gst_rate / 2.0 / 100.0;
    }

    let total_tax = total_cgst + total_sgst;
    let total_before_round_off = subtotal_after_discount + total_tax;

    // Step 7: round-off to the nearest whole rupee
    let round_off = if enable_round_off {
        round_to_rupee(total_before_round_off) - total_before_round_off
    } else {
        0.0
    };

    let grand_total = total_before_round_off + round_off;

    // Step 8: round each field independently at the boundary
    InvoiceTotals {
        subtotal: round2(subtotal),
        discount_amount: round2(discount_amount),
        subtotal_after_discount: round2(subtotal_after_discount),
        total_cgst: round2(total_cgst),
        total_sgst: round2(total_sgst),
        total_tax: round2(total_tax),
        total_before_round_off: round2(total_before_round_off),
        round_off: round2(round_off),
        grand_total: round2(grand_total),
    }
}

// =============================================================================
// Display Helpers
// =============================================================================

/// Formats a discount for display in the totals table.
///
/// Returns `-` when there is nothing to show.
pub fn format_discount(discount_type: DiscountType, value: f64) -> String {
    if discount_type == DiscountType::None || value == 0.0 {
        return "-".to_string();
    }
    match discount_type {
        DiscountType::Flat => format!("₹{:.2}", value),
        DiscountType::Percent => format!("{}%", value),
        DiscountType::None => "-".to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, gst_rate: f64, qty: f64, price: f64) -> InvoiceItem {
        let product = Product::sample(name, price, gst_rate);
        InvoiceItem::compute("test-line", product, qty, qty, price)
    }

    // -------------------------------------------------------------------------
    // Line items
    // -------------------------------------------------------------------------

    #[test]
    fn test_line_item_basic() {
        // 2 × ₹100 at 18% GST: classic worked example
        let line = item("Detergent Bar", 18.0, 2.0, 100.0);
        assert_eq!(line.taxable_amount, 200.0);
        assert_eq!(line.cgst_amount, 18.0);
        assert_eq!(line.sgst_amount, 18.0);
        assert_eq!(line.total_amount, 236.0);
        assert_eq!(line.rot_percent, 18.0);
    }

    #[test]
    fn test_line_item_cgst_always_equals_sgst() {
        for (rate, qty, price) in [
            (18.0, 2.0, 100.0),
            (5.0, 3.0, 33.33),
            (28.0, 1.5, 749.99),
            (12.0, 0.25, 18.0),
            (0.0, 7.0, 42.0),
        ] {
            let line = item("X", rate, qty, price);
            assert_eq!(line.cgst_amount, line.sgst_amount);
            assert_eq!(
                line.total_amount,
                round2(line.taxable_amount + line.cgst_amount + line.sgst_amount)
            );
        }
    }

    #[test]
    fn test_line_item_zero_quantity() {
        let line = item("X", 18.0, 0.0, 100.0);
        assert_eq!(line.taxable_amount, 0.0);
        assert_eq!(line.cgst_amount, 0.0);
        assert_eq!(line.total_amount, 0.0);
    }

    #[test]
    fn test_line_item_fractional_quantity() {
        // 2.5 kg at ₹99.90: taxable rounds to 249.75, tax halves to 14.99 each
        let line = item("Loose Rice", 12.0, 2.5, 99.90);
        assert_eq!(line.taxable_amount, 249.75);
        // 249.75 * 12 / 2 / 100 = 14.985 -> 14.99 from the ROUNDED taxable
        assert_eq!(line.cgst_amount, 14.99);
        assert_eq!(line.sgst_amount, 14.99);
        assert_eq!(line.total_amount, 279.73);
    }

    #[test]
    fn test_line_item_tax_derived_from_rounded_taxable() {
        // qty 0.333 × ₹100 = 33.3, taxable rounds to 33.30.
        // Tax must come from 33.30, not from the raw 33.300000000000004.
        let line = item("X", 18.0, 0.333, 100.0);
        assert_eq!(line.taxable_amount, 33.3);
        assert_eq!(line.cgst_amount, round2(33.3 * 18.0 / 2.0 / 100.0));
    }

    #[test]
    fn test_line_item_nan_propagates() {
        // Garbage in, garbage out - but never a silent zero and never a panic.
        let line = item("X", 18.0, f64::NAN, 100.0);
        assert!(line.taxable_amount.is_nan());
        assert!(line.cgst_amount.is_nan());
        assert!(line.total_amount.is_nan());
    }

    // -------------------------------------------------------------------------
    // Invoice totals
    // -------------------------------------------------------------------------

    #[test]
    fn test_totals_no_discount_is_naive_sum() {
        let items = vec![
            item("A", 18.0, 2.0, 100.0),  // taxable 200, tax 18+18
            item("B", 5.0, 4.0, 50.0),    // taxable 200, tax 5+5
            item("C", 28.0, 1.0, 999.99), // taxable 999.99, tax 140+140
        ];
        let totals = compute_invoice_totals(&items, DiscountType::None, 0.0, false);

        let expected_subtotal: f64 = items.iter().map(|i| i.taxable_amount).sum();
        assert_eq!(totals.subtotal, round2(expected_subtotal));
        assert_eq!(totals.discount_amount, 0.0);
        assert_eq!(totals.subtotal_after_discount, totals.subtotal);

        // With ratio 1 the recomputed tax matches per-line math.
        let expected_cgst: f64 = items
            .iter()
            .map(|i| i.taxable_amount * i.product.gst_rate / 2.0 / 100.0)
            .sum();
        assert_eq!(totals.total_cgst, round2(expected_cgst));
        assert_eq!(totals.total_sgst, totals.total_cgst);
    }

    #[test]
    fn test_totals_percent_discount_reference_scenario() {
        // Single line with taxable 1000 at 18%, 10% discount, no round-off
        let items = vec![item("A", 18.0, 10.0, 100.0)];
        let totals = compute_invoice_totals(&items, DiscountType::Percent, 10.0, false);

        assert_eq!(totals.subtotal, 1000.0);
        assert_eq!(totals.discount_amount, 100.0);
        assert_eq!(totals.subtotal_after_discount, 900.0);
        assert_eq!(totals.total_cgst, 81.0);
        assert_eq!(totals.total_sgst, 81.0);
        assert_eq!(totals.total_tax, 162.0);
        assert_eq!(totals.round_off, 0.0);
        assert_eq!(totals.grand_total, 1062.0);
    }

    #[test]
    fn test_totals_flat_discount() {
        let items = vec![item("A", 18.0, 10.0, 100.0)];
        let totals = compute_invoice_totals(&items, DiscountType::Flat, 250.0, false);

        assert_eq!(totals.discount_amount, 250.0);
        assert_eq!(totals.subtotal_after_discount, 750.0);
        // Tax on the discounted base: 750 * 9% = 67.50 each head
        assert_eq!(totals.total_cgst, 67.5);
        assert_eq!(totals.grand_total, 885.0);
    }

    #[test]
    fn test_totals_discount_clamped_at_subtotal() {
        // A flat discount larger than the subtotal is capped, never negative.
        let items = vec![item("A", 18.0, 1.0, 100.0)];
        let totals = compute_invoice_totals(&items, DiscountType::Flat, 10_000.0, false);

        assert_eq!(totals.discount_amount, 100.0);
        assert_eq!(totals.subtotal_after_discount, 0.0);
        assert_eq!(totals.total_cgst, 0.0);
        assert_eq!(totals.total_sgst, 0.0);
        assert_eq!(totals.grand_total, 0.0);
    }

    #[test]
    fn test_totals_empty_invoice() {
        // Ratio guard: no items means subtotal 0, ratio defaults to 1.
        let totals = compute_invoice_totals(&[], DiscountType::Percent, 50.0, true);
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.discount_amount, 0.0);
        assert_eq!(totals.grand_total, 0.0);
    }

    #[test]
    fn test_totals_mixed_rates_discount_is_proportional() {
        // Discount shrinks each line's taxable base by the same ratio,
        // regardless of that line's own rate.
        let items = vec![
            item("Low", 5.0, 1.0, 600.0),   // taxable 600
            item("High", 28.0, 1.0, 400.0), // taxable 400
        ];
        let totals = compute_invoice_totals(&items, DiscountType::Percent, 10.0, false);

        assert_eq!(totals.subtotal, 1000.0);
        assert_eq!(totals.discount_amount, 100.0);
        // CGST = 600*0.9*2.5% + 400*0.9*14% = 13.50 + 50.40 = 63.90
        assert_eq!(totals.total_cgst, 63.9);
        assert_eq!(totals.total_sgst, 63.9);
    }

    #[test]
    fn test_totals_round_off_closes_gap_to_whole_rupee() {
        // taxable 333.33 at 18% -> tax 59.9994, total 393.3294
        let items = vec![item("A", 18.0, 1.0, 333.33)];
        let totals = compute_invoice_totals(&items, DiscountType::None, 0.0, true);

        assert_eq!(totals.total_before_round_off, 393.33);
        assert_eq!(totals.grand_total, 393.0);
        assert_eq!(totals.round_off, round2(393.0 - 393.3294));
        // Grand total is a whole rupee amount
        assert_eq!(totals.grand_total, totals.grand_total.round());
    }

    #[test]
    fn test_totals_round_off_disabled_is_zero() {
        let items = vec![item("A", 18.0, 1.0, 333.33)];
        let totals = compute_invoice_totals(&items, DiscountType::None, 0.0, false);
        assert_eq!(totals.round_off, 0.0);
        assert_eq!(totals.grand_total, totals.total_before_round_off);
    }

    // -------------------------------------------------------------------------
    // Display helpers
    // -------------------------------------------------------------------------

    #[test]
    fn test_format_discount() {
        assert_eq!(format_discount(DiscountType::None, 50.0), "-");
        assert_eq!(format_discount(DiscountType::Flat, 0.0), "-");
        assert_eq!(format_discount(DiscountType::Flat, 50.0), "₹50.00");
        assert_eq!(format_discount(DiscountType::Percent, 10.0), "10%");
    }
}
