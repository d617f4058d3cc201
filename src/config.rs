//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::extract::DEFAULT_MIN_PLAUSIBLE_PRICE;
use crate::query::DEFAULT_SITES;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Google API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Google Custom Search engine id
    #[serde(default)]
    pub search_engine_id: Option<String>,

    /// Proxy URL (e.g. socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Number of result pages to request
    #[serde(default = "default_pages")]
    pub pages: u32,

    /// Results per page (the API caps this at 10)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Base delay between paginated requests in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Random jitter added to delay (0 to this value)
    #[serde(default = "default_delay_jitter_ms")]
    pub delay_jitter_ms: u64,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Plausibility floor for extracted prices, in rupiah
    #[serde(default = "default_min_plausible_price")]
    pub min_plausible_price: u64,

    /// How many preceding model generations to exclude from the query
    #[serde(default = "default_generation_window")]
    pub generation_window: u32,

    /// Require the product slug in listing URLs (precision over recall)
    #[serde(default)]
    pub slug_in_url: bool,

    /// Marketplace domains the search is scoped to
    #[serde(default = "default_sites")]
    pub sites: Vec<String>,

    /// Require every product-name token in the listing text
    #[serde(default = "default_true")]
    pub relevance_check: bool,
}

fn default_pages() -> u32 {
    3
}

fn default_page_size() -> u32 {
    10
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_delay_jitter_ms() -> u64 {
    500
}

fn default_min_plausible_price() -> u64 {
    DEFAULT_MIN_PLAUSIBLE_PRICE
}

fn default_generation_window() -> u32 {
    3
}

fn default_sites() -> Vec<String> {
    DEFAULT_SITES.iter().map(|s| s.to_string()).collect()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            search_engine_id: None,
            proxy: None,
            pages: default_pages(),
            page_size: default_page_size(),
            delay_ms: default_delay_ms(),
            delay_jitter_ms: default_delay_jitter_ms(),
            format: OutputFormat::Table,
            min_plausible_price: default_min_plausible_price(),
            generation_window: default_generation_window(),
            slug_in_url: false,
            sites: default_sites(),
            relevance_check: true,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("harga-bekas").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }

        if let Ok(cx) = std::env::var("GOOGLE_CX") {
            if !cx.is_empty() {
                self.search_engine_id = Some(cx);
            }
        }

        if let Ok(proxy) = std::env::var("HARGA_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(delay) = std::env::var("HARGA_DELAY") {
            if let Ok(d) = delay.parse() {
                self.delay_ms = d;
            }
        }

        self
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
