//! Free-text price extraction.
//!
//! Listing text mixes prices with stock counts, model numbers and review
//! counts. The extractor prefers "price-shaped" numbers: dot-grouped
//! amounts ("1.500.000") or long bare digit runs, above a plausibility
//! floor. Best first plausible match, no stronger guarantee.

use regex_lite::Regex;

/// Default plausibility floor in rupiah. Amounts at or below this are
/// treated as noise (stock counts, storage sizes, review counts).
pub const DEFAULT_MIN_PLAUSIBLE_PRICE: u64 = 100_000;

/// Either a run of digits grouped in chunks of three separated by dots
/// (at least one dot), or a bare run of six or more digits.
const PRICE_PATTERN: &str = r"\d{1,3}(?:\.\d{3})+|\d{6,}";

/// Extracts a rupiah amount from unstructured listing text.
pub struct PriceExtractor {
    pattern: Regex,
    min_plausible: u64,
}

impl PriceExtractor {
    /// Creates an extractor with the given plausibility floor.
    pub fn new(min_plausible: u64) -> Self {
        Self {
            pattern: Regex::new(PRICE_PATTERN).expect("price pattern is valid"),
            min_plausible,
        }
    }

    /// Returns the first candidate amount strictly above the plausibility
    /// floor, scanning candidates in the order they appear in the text.
    pub fn extract_price(&self, text: &str) -> Option<u64> {
        // Scan positions only ever land on ASCII digit/dot boundaries, so
        // the byte slicing below cannot split a multi-byte character.
        let mut pos = 0;
        while pos < text.len() {
            let m = match self.pattern.find(&text[pos..]) {
                Some(m) => m,
                None => break,
            };

            let start = pos + m.start();
            let mut end = pos + m.end();
            let mut candidate = m.as_str();

            // A grouped amount must not run straight into another digit.
            // Retry with one fewer ".ddd" group, as "1.500.0001" still
            // contains the grouped amount "1.500".
            if candidate.contains('.') && next_is_digit(text, end) {
                if let Some(cut) = candidate.rfind('.') {
                    if candidate[..cut].contains('.') {
                        candidate = &candidate[..cut];
                        end = start + cut;
                    } else {
                        candidate = "";
                    }
                }
            }

            if candidate.is_empty() {
                // No grouped amount starts here after all; rescan from the
                // next position so a later bare digit run is still found.
                pos = start + 1;
                continue;
            }

            let digits: String = candidate.chars().filter(|c| c.is_ascii_digit()).collect();
            if let Ok(value) = digits.parse::<u64>() {
                if value > self.min_plausible {
                    return Some(value);
                }
            }

            pos = end.max(start + 1);
        }
        None
    }
}

impl Default for PriceExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PLAUSIBLE_PRICE)
    }
}

fn next_is_digit(text: &str, at: usize) -> bool {
    text[at..].chars().next().is_some_and(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<u64> {
        PriceExtractor::default().extract_price(text)
    }

    #[test]
    fn test_grouped_amount_with_currency_marker() {
        assert_eq!(extract("Rp 1.500.000"), Some(1_500_000));
        assert_eq!(extract("Rp.2.750.000 nego"), Some(2_750_000));
    }

    #[test]
    fn test_grouped_amount_without_marker() {
        assert_eq!(extract("harga 15.000.000 mulus"), Some(15_000_000));
    }

    #[test]
    fn test_bare_digit_run() {
        assert_eq!(extract("dijual 8500000 saja"), Some(8_500_000));
    }

    #[test]
    fn test_below_floor_is_absent() {
        assert_eq!(extract("Rp 99.999"), None);
        assert_eq!(extract("Rp 100.000"), None); // floor is strict
        assert_eq!(extract("Rp 100.001"), Some(100_001));
    }

    #[test]
    fn test_short_ungrouped_is_absent() {
        assert_eq!(extract("stok 12345 unit"), None);
        assert_eq!(extract("tahun 2023"), None);
    }

    #[test]
    fn test_no_numbers() {
        assert_eq!(extract("kondisi mulus lengkap"), None);
    }

    #[test]
    fn test_first_plausible_candidate_wins() {
        // 1.000 is below the floor, scanning continues to the real price.
        assert_eq!(extract("cicilan 1.000 x12, cash Rp 5.000.000"), Some(5_000_000));
        // Two plausible amounts: the earlier one wins.
        assert_eq!(extract("dari 3.000.000 jadi 2.500.000"), Some(3_000_000));
    }

    #[test]
    fn test_grouped_followed_by_digit_is_rejected() {
        // "1.500.0001" is not a grouped amount; the inner "1.500" is below
        // the floor, so nothing qualifies.
        assert_eq!(extract("kode 1.500.0001"), None);
    }

    #[test]
    fn test_bare_run_after_failed_grouping() {
        // "12.345" runs into more digits and is not a grouped amount, but
        // the digit run starting at "3456789" still qualifies bare.
        assert_eq!(extract("kode 12.3456789"), Some(3_456_789));
    }

    #[test]
    fn test_model_numbers_ignored() {
        assert_eq!(extract("iPhone 14 Pro 256GB second Rp 13.500.000"), Some(13_500_000));
    }

    #[test]
    fn test_custom_floor() {
        let extractor = PriceExtractor::new(10_000);
        assert_eq!(extractor.extract_price("Rp 50.000"), Some(50_000));
    }
}
