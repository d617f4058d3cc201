//! Data models for product identity and marketplace listings.

use serde::{Deserialize, Serialize};

/// The product being searched for, as entered by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductIdentity {
    /// Manufacturer or brand name (e.g. "Samsung")
    pub brand: String,
    /// Model name, possibly multi-word (e.g. "Z Flip 5")
    pub model: String,
    /// Optional variant/spec suffix (e.g. "256GB")
    pub spec: Option<String>,
}

impl ProductIdentity {
    /// Creates a new product identity.
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        spec: Option<String>,
    ) -> Self {
        Self { brand: brand.into(), model: model.into(), spec }
    }

    /// Returns the full free-text product name ("brand model spec").
    pub fn name(&self) -> String {
        let mut parts = vec![self.brand.trim(), self.model.trim()];
        if let Some(spec) = &self.spec {
            parts.push(spec.trim());
        }
        parts.retain(|p| !p.is_empty());
        parts.join(" ")
    }

    /// Returns a URL-safe slug of brand+model: lowercase, non-alphanumeric
    /// stripped, whitespace collapsed to hyphens.
    pub fn slug(&self) -> String {
        let raw = format!("{} {}", self.brand, self.model).to_lowercase();
        let cleaned: String =
            raw.chars().map(|c| if c.is_alphanumeric() { c } else { ' ' }).collect();
        cleaned.split_whitespace().collect::<Vec<_>>().join("-")
    }
}

/// A single raw search result as returned by the search API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawListing {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub link: String,
}

impl RawListing {
    /// Returns title and snippet joined, the text price extraction and
    /// qualification operate on.
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.snippet)
    }
}

/// A listing that passed qualification and yielded a plausible price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualifiedListing {
    /// Listing title
    pub title: String,
    /// Listing URL, unique within a single run
    pub link: String,
    /// Extracted price in whole rupiah
    pub price: u64,
}
