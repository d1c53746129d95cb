//! # Amount In Words
//!
//! Converts rupee amounts to English words using the Indian numbering
//! system (Hundred, Thousand, Lakh = 10^5, Crore = 10^7). The result is the
//! legal amount representation printed under an invoice's totals table.

// Lookup tables for 0-99. Index 0 of `ones`/`tens` is intentionally empty:
// a zero remainder contributes nothing at any recursion level.
const ONES: [&str; 10] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];
const TEENS: [&str; 10] = [
    "Ten",
    "Eleven",
    "Twelve",
    "Thirteen",
    "Fourteen",
    "Fifteen",
    "Sixteen",
    "Seventeen",
    "Eighteen",
    "Nineteen",
];
const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// Converts a non-negative integer to words, Indian system.
///
/// Returns `""` for 0 so that a zero remainder never produces a dangling
/// joiner ("One Hundred" rather than "One Hundred Zero").
fn convert(n: u64) -> String {
    match n {
        0..=9 => ONES[n as usize].to_string(),
        10..=19 => TEENS[(n - 10) as usize].to_string(),
        20..=99 => join(TENS[(n / 10) as usize], &convert(n % 10)),
        100..=999 => join(&format!("{} Hundred", ONES[(n / 100) as usize]), &convert(n % 100)),
        1_000..=99_999 => join(&format!("{} Thousand", convert(n / 1_000)), &convert(n % 1_000)),
        100_000..=9_999_999 => {
            join(&format!("{} Lakh", convert(n / 100_000)), &convert(n % 100_000))
        }
        _ => join(&format!("{} Crore", convert(n / 10_000_000)), &convert(n % 10_000_000)),
    }
}

/// Joins a unit phrase with a (possibly empty) remainder.
fn join(head: &str, tail: &str) -> String {
    if tail.is_empty() {
        head.to_string()
    } else {
        format!("{head} {tail}")
    }
}

/// Renders a rupee amount in words for printing.
///
/// The amount is split into whole rupees and paise (hundredths); paise are
/// only mentioned when non-zero.
///
/// ## Example
/// ```rust
/// use billmitra_core::words::number_to_words;
///
/// assert_eq!(number_to_words(0.0), "Zero Rupees Only");
/// assert_eq!(number_to_words(100.0), "One Hundred Rupees Only");
/// assert_eq!(
///     number_to_words(1234.50),
///     "One Thousand Two Hundred Thirty Four Rupees and Fifty Paise Only"
/// );
/// ```
pub fn number_to_words(amount: f64) -> String {
    if amount == 0.0 {
        return "Zero Rupees Only".to_string();
    }

    let rupees = amount.floor() as u64;
    let paise = ((amount - amount.floor()) * 100.0).round() as u64;

    let mut result = format!("{} Rupees", convert(rupees));
    if paise > 0 {
        result.push_str(&format!(" and {} Paise", convert(paise)));
    }
    result.push_str(" Only");
    result
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(number_to_words(0.0), "Zero Rupees Only");
    }

    #[test]
    fn test_small_numbers() {
        assert_eq!(number_to_words(1.0), "One Rupees Only");
        assert_eq!(number_to_words(13.0), "Thirteen Rupees Only");
        assert_eq!(number_to_words(45.0), "Forty Five Rupees Only");
        assert_eq!(number_to_words(99.0), "Ninety Nine Rupees Only");
    }

    #[test]
    fn test_round_hundreds_have_no_dangling_joiner() {
        // convert(0) must yield "" at every recursion level
        assert_eq!(number_to_words(100.0), "One Hundred Rupees Only");
        assert_eq!(number_to_words(1000.0), "One Thousand Rupees Only");
        assert_eq!(number_to_words(100000.0), "One Lakh Rupees Only");
        assert_eq!(number_to_words(10000000.0), "One Crore Rupees Only");
    }

    #[test]
    fn test_compound_numbers() {
        assert_eq!(number_to_words(101.0), "One Hundred One Rupees Only");
        assert_eq!(
            number_to_words(999.0),
            "Nine Hundred Ninety Nine Rupees Only"
        );
        assert_eq!(
            number_to_words(1234.0),
            "One Thousand Two Hundred Thirty Four Rupees Only"
        );
    }

    #[test]
    fn test_indian_system_units() {
        // 12,34,567 = 12 Lakh 34 Thousand 5 Hundred 67
        assert_eq!(
            number_to_words(1234567.0),
            "Twelve Lakh Thirty Four Thousand Five Hundred Sixty Seven Rupees Only"
        );
        // 9,87,65,432 = 9 Crore 87 Lakh 65 Thousand 4 Hundred 32
        assert_eq!(
            number_to_words(98765432.0),
            "Nine Crore Eighty Seven Lakh Sixty Five Thousand Four Hundred Thirty Two Rupees Only"
        );
    }

    #[test]
    fn test_paise() {
        assert_eq!(
            number_to_words(1234.50),
            "One Thousand Two Hundred Thirty Four Rupees and Fifty Paise Only"
        );
        assert_eq!(number_to_words(1.05), "One Rupees and Five Paise Only");
    }

    #[test]
    fn test_whole_amount_has_no_paise_clause() {
        assert_eq!(number_to_words(500.0), "Five Hundred Rupees Only");
    }
}
