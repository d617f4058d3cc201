//! harga-bekas - Used-market price checker CLI
//!
//! Estimates the resale price of a consumer product on Indonesian
//! marketplaces: queries the Google Custom Search JSON API, qualifies
//! listings as genuine used-item offers, extracts rupiah amounts from
//! free text, removes outliers and reports summary statistics.

pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod google;
pub mod listing;
pub mod pipeline;
pub mod qualify;
pub mod query;
pub mod stats;

pub use config::Config;
pub use error::{Error, Result};
pub use listing::{ProductIdentity, QualifiedListing, RawListing};
pub use pipeline::{Pipeline, PipelineOutcome, PriceReport};
