//! Crawler module for page fetching and product extraction
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with a browser user agent
//! - Link, field and product extraction from parsed HTML
//! - The run loop that ties them together

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{run_scrape, Coordinator, ScrapeOutcome};
pub use fetcher::{build_http_client, page_url, Fetcher};
pub use parser::{extract_document_text, extract_links, extract_text, parse_products};
