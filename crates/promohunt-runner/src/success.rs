//! Best-effort detection of an accepted code.
//!
//! Checkout pages confirm discounts in wildly different ways; these
//! patterns catch the common phrasings and nothing more. Treat a match as
//! a hint worth checking by hand, not a guarantee.

use regex::Regex;

const SUCCESS_PATTERNS: &[&str] = &[
    r"(?i)(discount|coupon|promo|voucher|gift card)[^.!\n]{0,40}(applied|accepted|added|redeemed)",
    r"(?i)(applied|accepted)[^.!\n]{0,20}(discount|coupon|promo|code)",
    r"(?i)code\s+(accepted|applied|redeemed)",
    r"(?i)you\s+saved",
    r"(?i)promo(tion)?\s+savings",
];

/// Scans visible page text for signs that a code was accepted.
#[derive(Debug, Clone)]
pub struct SuccessDetector {
    patterns: Vec<Regex>,
}

impl SuccessDetector {
    /// Detector with the built-in patterns.
    pub fn new() -> Self {
        Self {
            patterns: SUCCESS_PATTERNS
                .iter()
                .filter_map(|p| Regex::new(p).ok())
                .collect(),
        }
    }

    /// Whether the page text contains a success phrase.
    pub fn matches(&self, page_text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(page_text))
    }
}

impl Default for SuccessDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_common_confirmations() {
        let detector = SuccessDetector::new();
        assert!(detector.matches("Discount applied: -$10.00"));
        assert!(detector.matches("Your coupon was accepted."));
        assert!(detector.matches("Code redeemed successfully"));
        assert!(detector.matches("You saved $5.00 on this order"));
        assert!(detector.matches("PROMO SAVINGS"));
    }

    #[test]
    fn ignores_unrelated_text() {
        let detector = SuccessDetector::new();
        assert!(!detector.matches("Enter a discount code"));
        assert!(!detector.matches("Invalid coupon"));
        assert!(!detector.matches("Subtotal: $42.00"));
        assert!(!detector.matches(""));
    }

    #[test]
    fn all_builtin_patterns_compile() {
        assert_eq!(SuccessDetector::new().patterns.len(), SUCCESS_PATTERNS.len());
    }
}
