//! Used-condition and new-condition signal rules.

use super::{NormalizedListing, Rule};

/// Words confirming the unit is offered in used condition.
const USED_SIGNALS: &[&str] = &["bekas", "second", "seken", "2nd", "preloved", "used"];

/// Words marking the unit as definitely new. These override any
/// used-signal false positive in the same text.
const NEW_SIGNALS: &[&str] = &[
    "bnib",
    "brand new",
    "segel",
    "sealed",
    "garansi resmi",
    "official store",
    "baru",
    "new",
];

/// Requires at least one used-condition signal word. Without one the
/// condition cannot be confirmed.
pub struct UsedSignalRule;

impl UsedSignalRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UsedSignalRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for UsedSignalRule {
    fn name(&self) -> &'static str {
        "used-signal"
    }

    fn passes(&self, listing: &NormalizedListing) -> bool {
        USED_SIGNALS.iter().any(|w| listing.text.contains(w))
    }

    fn description(&self) -> String {
        format!("Must contain one of: {}", USED_SIGNALS.join(", "))
    }
}

/// Rejects listings carrying a definitely-new signal.
pub struct NewSignalRule;

impl NewSignalRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NewSignalRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for NewSignalRule {
    fn name(&self) -> &'static str {
        "new-signal"
    }

    fn passes(&self, listing: &NormalizedListing) -> bool {
        !NEW_SIGNALS.iter().any(|w| listing.text.contains(w))
    }

    fn description(&self) -> String {
        format!("Must not contain: {}", NEW_SIGNALS.join(", "))
    }
}
