//! Run report
//!
//! Counters and fetch failures collected while the run loop works, printed by
//! the CLI once the records are written.

use std::fmt;

/// Which kind of page a failed request was for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchStage {
    Listing,
    Product,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listing => write!(f, "listing"),
            Self::Product => write!(f, "product"),
        }
    }
}

/// A request that failed and was skipped
#[derive(Debug, Clone)]
pub struct FailedFetch {
    /// The URL that failed
    pub url: String,

    /// Listing or product page
    pub stage: FetchStage,

    /// Error message
    pub message: String,
}

/// Summary of one run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub listing_pages_fetched: u64,
    pub listing_pages_failed: u64,
    pub links_found: u64,
    pub product_pages_fetched: u64,
    pub product_pages_failed: u64,
    pub records_extracted: u64,
    pub records_written: u64,

    /// Every skipped request, in the order it happened
    pub failures: Vec<FailedFetch>,
}

impl RunReport {
    /// Creates a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failed request and bumps the matching counter
    pub fn record_failure(&mut self, stage: FetchStage, url: &str, message: impl Into<String>) {
        match stage {
            FetchStage::Listing => self.listing_pages_failed += 1,
            FetchStage::Product => self.product_pages_failed += 1,
        }
        self.failures.push(FailedFetch {
            url: url.to_string(),
            stage,
            message: message.into(),
        });
    }

    /// Failures for one kind of page
    pub fn failures_for(&self, stage: FetchStage) -> impl Iterator<Item = &FailedFetch> {
        self.failures.iter().filter(move |f| f.stage == stage)
    }

    /// Total number of requests attempted
    pub fn total_requests(&self) -> u64 {
        self.listing_pages_fetched
            + self.listing_pages_failed
            + self.product_pages_fetched
            + self.product_pages_failed
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        ((self.listing_pages_fetched + self.product_pages_fetched) as f64 / total as f64) * 100.0
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_report(report: &RunReport) {
    println!("=== Scrape Report ===\n");

    println!("Listing pages:");
    println!("  Fetched: {}", report.listing_pages_fetched);
    println!("  Failed: {}", report.listing_pages_failed);
    println!("  Product links found: {}", report.links_found);
    println!();

    println!("Product pages:");
    println!("  Fetched: {}", report.product_pages_fetched);
    println!("  Failed: {}", report.product_pages_failed);
    println!();

    println!("Records:");
    println!("  Extracted: {}", report.records_extracted);
    println!("  Written: {}", report.records_written);
    println!();

    if !report.failures.is_empty() {
        println!("Failures ({}):", report.failures.len());
        for failure in &report.failures {
            println!("  [{}] {}: {}", failure.stage, failure.url, failure.message);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} requests)",
        report.success_rate(),
        report.total_requests()
    );
}
