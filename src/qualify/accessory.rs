//! Accessory and spare-part rejection.

use super::{NormalizedListing, Rule};

/// Keywords marking a listing as an accessory or spare part rather than
/// a phone unit.
const ACCESSORY_KEYWORDS: &[&str] = &[
    "case",
    "casing",
    "softcase",
    "hardcase",
    "cover",
    "charger",
    "kabel",
    "cable",
    "baterai",
    "battery",
    "batre",
    "screen",
    "anti gores",
    "tempered glass",
    "housing",
    "backdoor",
    "sparepart",
    "spare part",
    "earphone",
    "headset",
];

/// Rejects non-phone-unit listings, regardless of any used-condition
/// signals in the same text.
pub struct AccessoryRule;

impl AccessoryRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AccessoryRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for AccessoryRule {
    fn name(&self) -> &'static str {
        "accessory"
    }

    fn passes(&self, listing: &NormalizedListing) -> bool {
        !ACCESSORY_KEYWORDS.iter().any(|kw| listing.text.contains(kw))
    }

    fn description(&self) -> String {
        format!("No accessory keywords ({} known)", ACCESSORY_KEYWORDS.len())
    }
}
