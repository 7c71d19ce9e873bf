//! Configuration module for Shelf-Scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and compiling the configured CSS selectors.
//!
//! # Example
//!
//! ```no_run
//! use shelf_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Scraping {} seed URLs", config.urls.len());
//! ```

mod parser;
mod selectors;
mod types;
mod validation;

// Re-export types
pub use selectors::CompiledSelectors;
pub use types::{Config, SelectorConfig, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
