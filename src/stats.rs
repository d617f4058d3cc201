//! Price-sample statistics: outlier removal and summary figures.

use serde::{Deserialize, Serialize};

/// Minimum sample size for a robust quartile estimate. Smaller samples
/// are returned unchanged.
pub const MIN_SAMPLE_FOR_FENCES: usize = 4;

/// Strategy for computing the retain-bounds of a price sample.
///
/// Only one policy ships today, but keeping it behind a trait isolates
/// the percentile math for unit testing against known quartile values.
pub trait OutlierStrategy: Send + Sync {
    /// Returns the inclusive `(low, high)` bounds to retain, or `None`
    /// when the sample is too small to judge.
    fn bounds(&self, sample: &[u64]) -> Option<(f64, f64)>;
}

/// The standard Tukey fence method: retain values within
/// `[Q1 - k*IQR, Q3 + k*IQR]`.
#[derive(Debug, Clone, Copy)]
pub struct TukeyFences {
    /// Fence multiplier applied to the inter-quartile range.
    pub multiplier: f64,
}

impl TukeyFences {
    /// Creates fences with the given multiplier.
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }
}

impl Default for TukeyFences {
    fn default() -> Self {
        Self::new(1.5)
    }
}

impl OutlierStrategy for TukeyFences {
    fn bounds(&self, sample: &[u64]) -> Option<(f64, f64)> {
        if sample.len() < MIN_SAMPLE_FOR_FENCES {
            return None;
        }

        let mut sorted = sample.to_vec();
        sorted.sort_unstable();

        let q1 = percentile(&sorted, 0.25);
        let q3 = percentile(&sorted, 0.75);
        let iqr = q3 - q1;

        Some((q1 - self.multiplier * iqr, q3 + self.multiplier * iqr))
    }
}

/// Removes statistically extreme values from a price sample. Input order
/// is preserved; samples below [`MIN_SAMPLE_FOR_FENCES`] come back
/// unchanged.
pub fn remove_outliers(prices: &[u64], strategy: &dyn OutlierStrategy) -> Vec<u64> {
    match strategy.bounds(prices) {
        None => prices.to_vec(),
        Some((low, high)) => prices
            .iter()
            .copied()
            .filter(|&p| {
                let v = p as f64;
                v >= low && v <= high
            })
            .collect(),
    }
}

/// Percentile with linear interpolation between closest ranks.
/// `sorted` must be non-empty and ascending.
fn percentile(sorted: &[u64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0] as f64;
    }

    let rank = (n - 1) as f64 * p;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    let a = sorted[lo] as f64;
    let b = sorted[hi] as f64;
    a + (b - a) * frac
}

/// Summary statistics over a cleaned price sample. Mean and median are
/// truncated to whole rupiah.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub mean: u64,
    pub median: u64,
    pub min: u64,
    pub max: u64,
}

impl PriceSummary {
    /// Computes the summary, or `None` for an empty sample.
    pub fn from_sample(prices: &[u64]) -> Option<Self> {
        if prices.is_empty() {
            return None;
        }

        let sum: u128 = prices.iter().map(|&p| p as u128).sum();
        let mean = (sum / prices.len() as u128) as u64;

        let mut sorted = prices.to_vec();
        sorted.sort_unstable();

        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 1 {
            sorted[mid]
        } else {
            (sorted[mid - 1] + sorted[mid]) / 2
        };

        Some(Self { mean, median, min: sorted[0], max: sorted[sorted.len() - 1] })
    }
}
