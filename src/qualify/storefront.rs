//! Storefront-page rejection.

use super::{NormalizedListing, Rule};

/// Phrases typical of store/catalog pages rather than single-item
/// listings.
const STOREFRONT_PHRASES: &[&str] = &[
    "toko",
    "store",
    "online",
    "daftar harga",
    "daftar produk",
    "harga terbaik",
    "best price",
    "katalog",
];

/// A sell indicator rescues a storefront phrase: marketplace listings
/// routinely carry "Jual ... - Tokopedia" style titles.
const SELL_WORDS: &[&str] = &["jual", "sale"];

/// Rejects generic storefront pages unless the text also contains a
/// sell-indicating word.
pub struct StorefrontRule;

impl StorefrontRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StorefrontRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for StorefrontRule {
    fn name(&self) -> &'static str {
        "storefront"
    }

    fn passes(&self, listing: &NormalizedListing) -> bool {
        let has_storefront_phrase =
            STOREFRONT_PHRASES.iter().any(|p| listing.text.contains(p));
        if !has_storefront_phrase {
            return true;
        }
        SELL_WORDS.iter().any(|w| listing.text.contains(w))
    }

    fn description(&self) -> String {
        "No storefront phrases unless a sell word is present".to_string()
    }
}
