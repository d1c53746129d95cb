//! # Money Module
//!
//! Centralized rounding and currency formatting for BillMitra.
//!
//! ## Why One Rounding Utility?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE SCATTERED-ROUNDING PROBLEM                                         │
//! │                                                                         │
//! │  If every screen formats with its own `toFixed`-style call, the       │
//! │  stored value and the displayed value drift apart:                     │
//! │                                                                         │
//! │    stored:    81.00000000000003                                         │
//! │    displayed: "81.00"                                                   │
//! │    re-parsed: 81.0          ← three different values for one amount    │
//! │                                                                         │
//! │  OUR SOLUTION: round at every API boundary, through ONE function.      │
//! │  Every monetary field handed out by this crate has already been        │
//! │  through `round2`. Display, storage and math all agree.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Rules
//! - [`round2`]: 2 decimal places, half away from zero (standard decimal
//!   rounding: 0.005 → 0.01, -0.005 → -0.01)
//! - [`round_to_rupee`]: nearest whole rupee, half away from zero (used for
//!   the invoice round-off line)
//!
//! Both propagate NaN and infinity unchanged; guarding against garbage
//! input is the caller's job, silently zeroing it is not ours.

// =============================================================================
// Rounding
// =============================================================================

/// Rounds a monetary value to 2 decimal places, half away from zero.
///
/// ## Example
/// ```rust
/// use billmitra_core::money::round2;
///
/// assert_eq!(round2(81.004), 81.0);
/// assert_eq!(round2(0.125), 0.13);
/// assert_eq!(round2(-0.125), -0.13);
/// ```
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds a monetary value to the nearest whole rupee, half away from zero.
///
/// Used for the round-off line on invoices: the grand total is nudged to a
/// whole-rupee amount and the nudge is shown as its own row.
///
/// ## Example
/// ```rust
/// use billmitra_core::money::round_to_rupee;
///
/// assert_eq!(round_to_rupee(1061.64), 1062.0);
/// assert_eq!(round_to_rupee(1061.49), 1061.0);
/// assert_eq!(round_to_rupee(1061.5), 1062.0);
/// ```
#[inline]
pub fn round_to_rupee(value: f64) -> f64 {
    value.round()
}

// =============================================================================
// Formatting
// =============================================================================

/// Formats an amount as Indian Rupees with two decimals, e.g. `₹1062.00`.
///
/// ## Note
/// This is for logs, receipts and debugging. UI display formatting
/// (digit grouping, locale) belongs to the presentation layer.
pub fn format_inr(value: f64) -> String {
    format!("₹{:.2}", value)
}

// =============================================================================
// Unit Tests
// =============================================================================
