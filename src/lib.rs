//! Shelf-Scraper: a selector-driven product scraper
//!
//! This crate crawls paginated listing pages, follows product links, extracts
//! configured fields from every product block and appends the results to a CSV
//! file. Which elements are read is decided entirely by CSS selectors in the
//! configuration file.

pub mod config;
pub mod crawler;
pub mod output;
pub mod record;
pub mod state;

use thiserror::Error;

/// Main error type for Shelf-Scraper operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Sink(#[from] SinkError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector for '{field}': {message}")]
    InvalidSelector { field: &'static str, message: String },
}

/// Errors raised while fetching a listing or product page
///
/// These never abort a run; the coordinator logs them and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Cannot resolve link '{href}' against {base}")]
    UnresolvableLink { href: String, base: String },
}

/// Errors raised while writing records to the output file
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Header of {path} is [{existing}], records have [{expected}]")]
    HeaderMismatch {
        path: String,
        existing: String,
        expected: String,
    },
}

/// Result type alias for Shelf-Scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{CompiledSelectors, Config};
pub use crawler::{run_scrape, Coordinator, Fetcher};
pub use output::{append_records, RunReport};
pub use record::{FieldValue, ProductRecord};
pub use state::RunPhase;
