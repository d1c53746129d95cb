//! # Invoice Number Formatting
//!
//! A printed invoice number is `"{prefix}-{n}"`, e.g. `KTMVS-101`. The
//! prefix is company-configured and must not contain `-` (enforced by
//! [`crate::validation::validate_invoice_prefix`]) so that parsing back is
//! unambiguous.

use serde::{Deserialize, Serialize};

/// A parsed invoice number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedInvoiceNumber {
    pub prefix: String,
    pub number: i64,
}

/// Formats an invoice number as `"{prefix}-{n}"`.
///
/// ## Example
/// ```rust
/// use billmitra_core::invoice_number::format_invoice_number;
///
/// assert_eq!(format_invoice_number("KTMVS", 101), "KTMVS-101");
/// ```
pub fn format_invoice_number(prefix: &str, number: i64) -> String {
    format!("{prefix}-{number}")
}

/// Formats an invoice number with the numeric part zero-padded to `width`.
///
/// ## Example
/// ```rust
/// use billmitra_core::invoice_number::format_invoice_number_padded;
///
/// assert_eq!(format_invoice_number_padded("KTMVS", 5, 3), "KTMVS-005");
/// assert_eq!(format_invoice_number_padded("KTMVS", 1234, 3), "KTMVS-1234");
/// ```
pub fn format_invoice_number_padded(prefix: &str, number: i64, width: usize) -> String {
    format!("{prefix}-{number:0width$}")
}

/// Parses `"{prefix}-{n}"` back into its parts.
///
/// Returns `None` unless the string has exactly one `-` and an integer
/// tail; a prefix containing `-` is rejected at configuration time
/// precisely so this stays unambiguous.
///
/// ## Example
/// ```rust
/// use billmitra_core::invoice_number::{parse_invoice_number, ParsedInvoiceNumber};
///
/// assert_eq!(
///     parse_invoice_number("KTMVS-101"),
///     Some(ParsedInvoiceNumber { prefix: "KTMVS".to_string(), number: 101 })
/// );
/// assert_eq!(parse_invoice_number("no-dash-here"), None);
/// ```
pub fn parse_invoice_number(full_number: &str) -> Option<ParsedInvoiceNumber> {
    let mut parts = full_number.split('-');
    let prefix = parts.next()?;
    let tail = parts.next()?;
    if parts.next().is_some() {
        return None; // more than one dash: ambiguous
    }

    let number: i64 = tail.parse().ok()?;
    Some(ParsedInvoiceNumber {
        prefix: prefix.to_string(),
        number,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(format_invoice_number("KTMVS", 1), "KTMVS-1");
        assert_eq!(format_invoice_number("INV", 101), "INV-101");
    }

    #[test]
    fn test_format_padded() {
        assert_eq!(format_invoice_number_padded("KTMVS", 5, 3), "KTMVS-005");
        assert_eq!(format_invoice_number_padded("KTMVS", 5, 0), "KTMVS-5");
        // Width never truncates
        assert_eq!(format_invoice_number_padded("KTMVS", 12345, 3), "KTMVS-12345");
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            parse_invoice_number("KTMVS-101"),
            Some(ParsedInvoiceNumber {
                prefix: "KTMVS".to_string(),
                number: 101,
            })
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_invoice_number("KTMVS"), None); // no dash
        assert_eq!(parse_invoice_number("KTMVS-"), None); // empty tail
        assert_eq!(parse_invoice_number("KTMVS-abc"), None); // non-numeric
        assert_eq!(parse_invoice_number("A-B-1"), None); // two dashes
    }

    #[test]
    fn test_round_trip() {
        for n in [1, 42, 101, 99999] {
            let formatted = format_invoice_number("KTMVS", n);
            let parsed = parse_invoice_number(&formatted).unwrap();
            assert_eq!(parsed.prefix, "KTMVS");
            assert_eq!(parsed.number, n);
        }
    }
}
