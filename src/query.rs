//! Search-query composition from a product identity.

use crate::listing::ProductIdentity;
use regex_lite::Regex;

/// Used-condition synonyms requested as a disjunction.
const USED_SYNONYMS: &[&str] = &["bekas", "second", "seken"];

/// Fixed negative terms excluding new-condition and installment offers.
const NEGATIVE_TERMS: &[&str] = &["baru", "kredit"];

/// Default marketplace domains the search is scoped to.
pub const DEFAULT_SITES: &[&str] = &["tokopedia.com", "shopee.co.id"];

/// Composes the search-engine query string for a product.
pub struct QueryBuilder {
    sites: Vec<String>,
    generation_window: u32,
    slug_in_url: bool,
    number_pattern: Regex,
}

impl QueryBuilder {
    /// Creates a builder with the given site scope, negative-generation
    /// window and slug restriction.
    pub fn new(sites: Vec<String>, generation_window: u32, slug_in_url: bool) -> Self {
        Self {
            sites,
            generation_window,
            slug_in_url,
            number_pattern: Regex::new(r"\b(\d+)\b").expect("number pattern is valid"),
        }
    }

    /// Builds the full query string: quoted product name, used-condition
    /// synonyms, site scope, fixed negative terms, dynamic negative
    /// keywords for preceding model generations, and optionally an
    /// `inurl:` slug restriction.
    pub fn build(&self, identity: &ProductIdentity) -> String {
        let name = identity.name();
        let phrase = if name.contains(char::is_whitespace) {
            format!("\"{}\"", name)
        } else {
            name.clone()
        };

        let sites = self
            .sites
            .iter()
            .map(|s| format!("site:{}", s))
            .collect::<Vec<_>>()
            .join(" OR ");

        let negatives = NEGATIVE_TERMS
            .iter()
            .map(|t| format!("-{}", t))
            .collect::<Vec<_>>()
            .join(" ");

        let mut query = format!(
            "harga {} ({}) ({}) {}",
            phrase,
            USED_SYNONYMS.join("|"),
            sites,
            negatives
        );

        let generations = self.negative_generations(&name);
        if !generations.is_empty() {
            query.push(' ');
            query.push_str(&generations);
        }

        if self.slug_in_url {
            query.push_str(" inurl:");
            query.push_str(&identity.slug());
        }

        query
    }

    /// Exclusion phrases for the preceding model generations: the first
    /// standalone integer token in the name, decremented 1..=window.
    /// Suppresses cross-contamination from older models sharing most of
    /// the name.
    fn negative_generations(&self, name: &str) -> String {
        let m = match self.number_pattern.find(name) {
            Some(m) => m,
            None => return String::new(),
        };
        let current: u32 = match m.as_str().parse() {
            Ok(n) => n,
            Err(_) => return String::new(),
        };

        let base = name[..m.start()].trim();
        let mut terms = Vec::new();
        for i in 1..=self.generation_window {
            if current > i {
                terms.push(format!("-\"{} {}\"", base, current - i));
            }
        }
        terms.join(" ")
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_SITES.iter().map(|s| s.to_string()).collect(), 3, false)
    }
}
