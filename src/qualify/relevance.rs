//! Token-based relevance checking against the product name.

use super::{NormalizedListing, Rule};

/// Requires every essential token of the product name to appear as a
/// substring of the listing text.
///
/// Strict AND: missing any token disqualifies the listing. Search
/// engines return loosely related results; this sharply cuts false
/// positives at the cost of recall for listings that abbreviate.
pub struct TokenRelevanceRule {
    tokens: Vec<String>,
}

impl TokenRelevanceRule {
    /// Creates a rule from the free-text product name. Tokens of one
    /// character are ignored.
    pub fn new(product_name: &str) -> Self {
        Self {
            tokens: product_name
                .to_lowercase()
                .split_whitespace()
                .filter(|word| word.chars().count() > 1)
                .map(str::to_string)
                .collect(),
        }
    }
}

impl Rule for TokenRelevanceRule {
    fn name(&self) -> &'static str {
        "relevance"
    }

    fn passes(&self, listing: &NormalizedListing) -> bool {
        self.tokens.iter().all(|token| listing.text.contains(token))
    }

    fn description(&self) -> String {
        format!("Text must contain: {}", self.tokens.join(", "))
    }
}
