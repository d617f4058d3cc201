//! The price-check pipeline: build query, fetch pages, qualify listings,
//! extract prices, deduplicate, remove outliers, report.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::extract::PriceExtractor;
use crate::google::SearchApi;
use crate::listing::{ProductIdentity, QualifiedListing, RawListing};
use crate::qualify::{NormalizedListing, RuleSet, RuleSetBuilder};
use crate::query::QueryBuilder;
use crate::stats::{OutlierStrategy, PriceSummary, TukeyFences};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Everything the presentation layer needs for a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct PriceReport {
    /// The query string sent to the search collaborator.
    pub query: String,
    /// Raw results returned by the search.
    pub raw_count: usize,
    /// Listings that passed qualification and yielded a price.
    pub qualified_count: usize,
    /// Prices remaining after outlier removal.
    pub cleaned_count: usize,
    /// Summary over the cleaned sample.
    pub summary: PriceSummary,
    /// Surviving listings, sorted by ascending price.
    pub listings: Vec<QualifiedListing>,
}

/// Terminal states of a pipeline run. The empty states are ordinary
/// outcomes with their own user-facing messages, not errors.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// The search returned nothing at all.
    NoResults { query: String },
    /// Results came back, but none qualified as a priced used-item
    /// listing.
    NoValidListings { query: String, raw_count: usize },
    /// Outlier filtering discarded the whole sample.
    TooVariable { query: String, raw_count: usize, qualified_count: usize },
    /// A non-empty cleaned sample with statistics.
    Report(PriceReport),
}

/// Single-pass orchestrator over the qualification and extraction
/// components. One instance per configuration; each run is independent.
pub struct Pipeline {
    config: Config,
    query_builder: QueryBuilder,
    extractor: PriceExtractor,
    outliers: Box<dyn OutlierStrategy>,
}

impl Pipeline {
    /// Creates a pipeline with the standard Tukey-fence outlier policy.
    pub fn new(config: Config) -> Self {
        Self::with_strategy(config, Box::new(TukeyFences::default()))
    }

    /// Creates a pipeline with a custom outlier strategy.
    pub fn with_strategy(config: Config, outliers: Box<dyn OutlierStrategy>) -> Self {
        let query_builder = QueryBuilder::new(
            config.sites.clone(),
            config.generation_window,
            config.slug_in_url,
        );
        let extractor = PriceExtractor::new(config.min_plausible_price);
        Self { config, query_builder, extractor, outliers }
    }

    /// Returns the query that `run` would send, for display.
    pub fn build_query(&self, identity: &ProductIdentity) -> String {
        self.query_builder.build(identity)
    }

    /// Runs the full pipeline against the given search collaborator.
    pub async fn run(
        &self,
        client: &impl SearchApi,
        identity: &ProductIdentity,
    ) -> Result<PipelineOutcome> {
        let name = identity.name();
        if name.is_empty() {
            return Err(Error::EmptyProductName);
        }

        let query = self.query_builder.build(identity);
        info!("Query: {}", query);

        let raw = self.fetch_all(client, &query).await?;
        let raw_count = raw.len();
        if raw.is_empty() {
            return Ok(PipelineOutcome::NoResults { query });
        }

        let rules =
            RuleSetBuilder::standard(self.config.relevance_check.then_some(name.as_str()));
        let qualified = self.qualify(&raw, &rules);
        let qualified_count = qualified.len();
        if qualified.is_empty() {
            return Ok(PipelineOutcome::NoValidListings { query, raw_count });
        }

        let sample: Vec<u64> = qualified.iter().map(|l| l.price).collect();
        let survivors: Vec<QualifiedListing> = match self.outliers.bounds(&sample) {
            None => qualified,
            Some((low, high)) => qualified
                .into_iter()
                .filter(|l| {
                    let v = l.price as f64;
                    v >= low && v <= high
                })
                .collect(),
        };

        let cleaned: Vec<u64> = survivors.iter().map(|l| l.price).collect();
        let summary = match PriceSummary::from_sample(&cleaned) {
            Some(summary) => summary,
            None => {
                return Ok(PipelineOutcome::TooVariable {
                    query,
                    raw_count,
                    qualified_count,
                })
            }
        };

        let mut listings = survivors;
        listings.sort_by_key(|l| l.price);

        info!(
            "{} raw, {} qualified, {} after outlier removal",
            raw_count,
            qualified_count,
            cleaned.len()
        );

        Ok(PipelineOutcome::Report(PriceReport {
            query,
            raw_count,
            qualified_count,
            cleaned_count: cleaned.len(),
            summary,
            listings,
        }))
    }

    /// Fetches up to `pages` pages sequentially, stopping early on an
    /// empty page. A failure before anything was fetched is a transport
    /// error; a failure on a later page only aborts the remaining
    /// pagination, the pages already fetched are still processed.
    async fn fetch_all(
        &self,
        client: &impl SearchApi,
        query: &str,
    ) -> Result<Vec<RawListing>> {
        let mut all = Vec::new();

        for page in 0..self.config.pages {
            let start = page * client.page_size() + 1;
            debug!("Fetching page {} (start {})", page + 1, start);

            match client.search(query, start).await {
                Ok(items) => {
                    if items.is_empty() {
                        debug!("Page {} is empty, stopping", page + 1);
                        break;
                    }
                    all.extend(items);
                }
                Err(e) => {
                    if all.is_empty() {
                        return Err(Error::Transport(e));
                    }
                    warn!(
                        "Page {} failed ({:#}); continuing with {} fetched results",
                        page + 1,
                        e,
                        all.len()
                    );
                    break;
                }
            }
        }

        Ok(all)
    }

    /// Applies the rule set, link deduplication and price extraction in
    /// discovery order.
    fn qualify(&self, raw: &[RawListing], rules: &RuleSet) -> Vec<QualifiedListing> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut qualified = Vec::new();

        for item in raw {
            let normalized = NormalizedListing::of(&item.title, &item.snippet, &item.link);

            if let Err(rejection) = rules.evaluate(&normalized) {
                debug!("Rejected by {}: {}", rejection.rule, item.title);
                continue;
            }

            if seen.contains(&item.link) {
                debug!("Duplicate link dropped: {}", item.link);
                continue;
            }

            let price = match self.extractor.extract_price(&item.combined_text()) {
                Some(price) => price,
                None => {
                    debug!("No plausible price: {}", item.title);
                    continue;
                }
            };

            seen.insert(item.link.clone());
            qualified.push(QualifiedListing {
                title: item.title.clone(),
                link: item.link.clone(),
                price,
            });
        }

        qualified
    }
}
