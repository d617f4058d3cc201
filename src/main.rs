//! harga-bekas - Used-market price checker CLI
//!
//! Estimates the resale price of a used product from marketplace
//! listings surfaced by Google Custom Search.

use anyhow::Result;
use clap::{Parser, Subcommand};
use harga_bekas::config::{Config, OutputFormat};
use harga_bekas::format::Formatter;
use harga_bekas::google::GoogleClient;
use harga_bekas::listing::ProductIdentity;
use harga_bekas::pipeline::Pipeline;
use harga_bekas::qualify::RuleSetBuilder;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "harga-bekas",
    version,
    about = "Used-market price checker for Indonesian marketplaces",
    long_about = "Estimates the resale price of a used product by qualifying \
                  marketplace listings from Google Custom Search and reporting \
                  statistics over the cleaned price sample."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the used-market price of a product
    #[command(alias = "s")]
    Search {
        /// Brand name (e.g. "Samsung")
        brand: String,

        /// Model name (e.g. "Z Flip 5")
        model: String,

        /// Variant or spec suffix (e.g. "256GB")
        #[arg(short, long)]
        spec: Option<String>,

        /// Number of result pages to fetch
        #[arg(short, long)]
        pages: Option<u32>,

        /// How many preceding model generations to exclude
        #[arg(long)]
        generation_window: Option<u32>,

        /// Require the product slug in listing URLs
        #[arg(long)]
        slug_in_url: bool,

        /// Skip the token-relevance check
        #[arg(long)]
        no_relevance: bool,
    },

    /// Print the query that would be sent, without searching
    #[command(alias = "q")]
    Query {
        /// Brand name
        brand: String,

        /// Model name
        model: String,

        /// Variant or spec suffix
        #[arg(short, long)]
        spec: Option<String>,

        /// How many preceding model generations to exclude
        #[arg(long)]
        generation_window: Option<u32>,

        /// Require the product slug in listing URLs
        #[arg(long)]
        slug_in_url: bool,
    },

    /// List the qualification rules in evaluation order
    Rules,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();
    config.format = cli.format;

    match cli.command {
        Commands::Search {
            brand,
            model,
            spec,
            pages,
            generation_window,
            slug_in_url,
            no_relevance,
        } => {
            if let Some(pages) = pages {
                config.pages = pages;
            }
            if let Some(window) = generation_window {
                config.generation_window = window;
            }
            if slug_in_url {
                config.slug_in_url = true;
            }
            if no_relevance {
                config.relevance_check = false;
            }

            let identity = ProductIdentity::new(brand, model, spec);
            let client = GoogleClient::new(&config)?;
            let formatter = Formatter::new(config.format);

            let pipeline = Pipeline::new(config);
            let outcome = pipeline.run(&client, &identity).await?;
            println!("{}", formatter.format_outcome(&outcome));
        }

        Commands::Query { brand, model, spec, generation_window, slug_in_url } => {
            if let Some(window) = generation_window {
                config.generation_window = window;
            }
            if slug_in_url {
                config.slug_in_url = true;
            }

            let identity = ProductIdentity::new(brand, model, spec);
            let pipeline = Pipeline::new(config);
            println!("{}", pipeline.build_query(&identity));
        }

        Commands::Rules => {
            // The relevance rule is assembled per search from the product
            // name; the content rules below are fixed.
            let rules = RuleSetBuilder::standard(None);

            println!("Qualification rules, in evaluation order:\n");
            for (i, description) in rules.descriptions().iter().enumerate() {
                println!("{:>2}. {}", i + 1, description);
            }
        }
    }

    Ok(())
}
