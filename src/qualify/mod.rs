//! Listing qualification: an ordered set of named rules deciding whether
//! a search result is a genuine used-item listing.
//!
//! Rules run in a fixed order and short-circuit on the first failure, so
//! the rejection reason stays inspectable.

pub mod accessory;
pub mod condition;
pub mod relevance;
pub mod storefront;

pub use accessory::AccessoryRule;
pub use condition::{NewSignalRule, UsedSignalRule};
pub use relevance::TokenRelevanceRule;
pub use storefront::StorefrontRule;

/// A listing lowered to the form the rules operate on.
#[derive(Debug, Clone)]
pub struct NormalizedListing {
    /// Lowercased title + snippet.
    pub text: String,
    /// Lowercased link.
    pub link: String,
}

impl NormalizedListing {
    /// Normalizes a (title, snippet, link) triple.
    pub fn of(title: &str, snippet: &str, link: &str) -> Self {
        Self {
            text: format!("{} {}", title, snippet).to_lowercase(),
            link: link.to_lowercase(),
        }
    }
}

/// Why a listing was rejected: the name of the rule that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    pub rule: &'static str,
}

/// Trait for a single qualification rule.
pub trait Rule: Send + Sync {
    /// Stable rule name, reported on rejection.
    fn name(&self) -> &'static str;

    /// Returns true if the listing passes this rule.
    fn passes(&self, listing: &NormalizedListing) -> bool;

    /// Returns a description of this rule.
    fn description(&self) -> String;
}

/// An ordered set of rules that must all pass.
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Adds a rule to the set.
    pub fn add(&mut self, rule: impl Rule + 'static) -> &mut Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Evaluates rules in order, returning the first failure.
    pub fn evaluate(&self, listing: &NormalizedListing) -> Result<(), Rejection> {
        for rule in &self.rules {
            if !rule.passes(listing) {
                return Err(Rejection { rule: rule.name() });
            }
        }
        Ok(())
    }

    /// Checks whether a listing passes every rule.
    pub fn is_valid(&self, listing: &NormalizedListing) -> bool {
        self.evaluate(listing).is_ok()
    }

    /// Returns true if no rules are configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns descriptions of all rules, in evaluation order.
    pub fn descriptions(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.description()).collect()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder assembling a [`RuleSet`] in the canonical evaluation order:
/// relevance, link blocklist, accessory, storefront, used-signal,
/// new-signal.
pub struct RuleSetBuilder {
    set: RuleSet,
}

impl RuleSetBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self { set: RuleSet::new() }
    }

    /// Requires every essential token of the product name in the text.
    pub fn relevance(mut self, product_name: Option<&str>) -> Self {
        if let Some(name) = product_name {
            self.set.add(TokenRelevanceRule::new(name));
        }
        self
    }

    /// Rejects links on the blocklist (video/news pages).
    pub fn link_blocklist(mut self) -> Self {
        self.set.add(LinkBlocklistRule::new());
        self
    }

    /// Rejects accessory and spare-part listings.
    pub fn accessories(mut self) -> Self {
        self.set.add(AccessoryRule::new());
        self
    }

    /// Rejects generic storefront pages without a sell indicator.
    pub fn storefront(mut self) -> Self {
        self.set.add(StorefrontRule::new());
        self
    }

    /// Requires a used-condition signal word.
    pub fn used_signal(mut self) -> Self {
        self.set.add(UsedSignalRule::new());
        self
    }

    /// Rejects listings with a definitely-new signal.
    pub fn new_signal(mut self) -> Self {
        self.set.add(NewSignalRule::new());
        self
    }

    /// Assembles the full default set for a product name. The relevance
    /// rule is skipped when `product_name` is `None`.
    pub fn standard(product_name: Option<&str>) -> RuleSet {
        Self::new()
            .relevance(product_name)
            .link_blocklist()
            .accessories()
            .storefront()
            .used_signal()
            .new_signal()
            .build()
    }

    /// Builds the rule set.
    pub fn build(self) -> RuleSet {
        self.set
    }
}

impl Default for RuleSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Link substrings that are never product listings.
const BLOCKED_LINK_PARTS: &[&str] = &["youtube.com", "/berita/"];

/// Rejects video and news links regardless of text content.
pub struct LinkBlocklistRule;

impl LinkBlocklistRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LinkBlocklistRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for LinkBlocklistRule {
    fn name(&self) -> &'static str {
        "link-blocklist"
    }

    fn passes(&self, listing: &NormalizedListing) -> bool {
        !BLOCKED_LINK_PARTS.iter().any(|part| listing.link.contains(part))
    }

    fn description(&self) -> String {
        format!("Link must not contain: {}", BLOCKED_LINK_PARTS.join(", "))
    }
}
