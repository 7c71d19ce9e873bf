//! Scrape coordinator - main run loop
//!
//! This module contains the loop that drives a run:
//! - Walking every seed URL and page index in order
//! - Fetching listing pages and following their product links
//! - Extracting records from product pages into the run's collection
//! - Pausing between seed URLs
//!
//! Requests are issued one at a time. A failed listing or product fetch is
//! logged and recorded in the run report, then skipped.

use crate::config::{CompiledSelectors, Config};
use crate::crawler::fetcher::{page_url, Fetcher};
use crate::crawler::parser::{extract_links, parse_products};
use crate::output::{append_records, FetchStage, RunReport};
use crate::record::{CaptureStamp, ProductRecord};
use crate::state::RunPhase;
use crate::{ConfigError, FetchError, ScrapeError};
use scraper::Html;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Records and statistics produced by one run
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    /// Every extracted record, in extraction order
    pub records: Vec<ProductRecord>,

    pub report: RunReport,
}

/// Main scrape coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    selectors: Arc<CompiledSelectors>,
    fetcher: Fetcher,
    pause: Duration,
    phase: RunPhase,
    report: RunReport,
    #[cfg(test)]
    trail: Vec<(RunPhase, usize)>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Selectors compiled and HTTP client built
    /// * `Err(ScrapeError)` - A selector failed to compile, `time` is not a
    ///   valid pause, or the client failed to build
    pub fn new(config: Config) -> Result<Self, ScrapeError> {
        let selectors = CompiledSelectors::compile(&config.selectors)?;
        let pause = config.pause().ok_or_else(|| {
            ConfigError::Validation(format!(
                "time must be a non-negative number of seconds, got {}",
                config.time
            ))
        })?;
        let fetcher = Fetcher::new(&config.user_agent)?;

        Ok(Self {
            config: Arc::new(config),
            selectors: Arc::new(selectors),
            fetcher,
            pause,
            phase: RunPhase::Idle,
            report: RunReport::new(),
            #[cfg(test)]
            trail: Vec::new(),
        })
    }

    /// Current phase of the run loop
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Runs the scrape loop over every seed URL and page
    ///
    /// Never fails: fetch errors are logged, recorded in the report and
    /// skipped. The returned collection holds every record extracted.
    pub async fn run(&mut self) -> ScrapeOutcome {
        self.phase = RunPhase::Idle;
        self.report = RunReport::new();

        let config = Arc::clone(&self.config);
        let start_time = std::time::Instant::now();
        let mut records = Vec::new();

        tracing::info!(
            "Starting scrape: {} seed URLs, {} pages each",
            config.urls.len(),
            config.pages
        );

        for (index, seed) in config.urls.iter().enumerate() {
            self.scrape_seed(seed, &mut records).await;

            let is_last = index + 1 == config.urls.len();
            if !is_last && !self.pause.is_zero() {
                tracing::info!("Pausing {:?} before the next seed URL", self.pause);
                tokio::time::sleep(self.pause).await;
            }
        }

        self.enter(RunPhase::Done);
        self.report.records_extracted = records.len() as u64;

        tracing::info!(
            "Scrape completed: {} records from {} product pages in {:?}",
            records.len(),
            self.report.product_pages_fetched,
            start_time.elapsed()
        );

        ScrapeOutcome {
            records,
            report: self.report.clone(),
        }
    }

    /// Scrapes pages 1..=pages of one seed URL
    ///
    /// All records of the seed share one capture timestamp, taken here.
    async fn scrape_seed(&mut self, seed: &str, records: &mut Vec<ProductRecord>) {
        let captured_at = CaptureStamp::now();

        for page in 1..=self.config.pages {
            self.scrape_listing_page(seed, page, &captured_at, records)
                .await;
        }
    }

    /// Processes a single listing page
    ///
    /// This method:
    /// 1. Fetches the listing page
    /// 2. Extracts product links
    /// 3. Fetches each product page
    /// 4. Parses product blocks and accumulates records
    async fn scrape_listing_page(
        &mut self,
        seed: &str,
        page: u32,
        captured_at: &CaptureStamp,
        records: &mut Vec<ProductRecord>,
    ) {
        let listing_url = page_url(seed, Some(page));
        tracing::info!("Scraping page {} ({})", page, listing_url);

        self.enter(RunPhase::FetchingListing);
        let listing = match self.fetcher.fetch(seed, Some(page)).await {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("Skipping listing page {}: {}", listing_url, e);
                self.report
                    .record_failure(FetchStage::Listing, &listing_url, e.to_string());
                self.enter(RunPhase::Idle);
                return;
            }
        };
        self.report.listing_pages_fetched += 1;

        self.enter(RunPhase::ExtractingLinks);
        let selectors = Arc::clone(&self.selectors);
        let base = Url::parse(&listing_url).ok();

        for href in extract_links(&listing, &selectors.homepage) {
            self.report.links_found += 1;

            let product_url = match resolve_link(base.as_ref(), &listing_url, &href) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Skipping product link: {}", e);
                    self.report
                        .record_failure(FetchStage::Product, &href, e.to_string());
                    continue;
                }
            };

            self.enter(RunPhase::FetchingProduct);
            let product_page = match self.fetcher.fetch(&product_url, None).await {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!("Skipping product page {}: {}", product_url, e);
                    self.report
                        .record_failure(FetchStage::Product, &product_url, e.to_string());
                    self.enter(RunPhase::ExtractingLinks);
                    continue;
                }
            };
            self.report.product_pages_fetched += 1;

            let extracted = self.extract_products(&product_page, &selectors, captured_at, records);
            tracing::debug!("{} products on {}", extracted, product_url);
        }

        self.enter(RunPhase::Idle);
    }

    /// Runs the product parser over one product page and accumulates its records
    fn extract_products(
        &mut self,
        document: &Html,
        selectors: &CompiledSelectors,
        captured_at: &CaptureStamp,
        records: &mut Vec<ProductRecord>,
    ) -> usize {
        self.enter(RunPhase::ExtractingFields);
        let batch: Vec<ProductRecord> =
            parse_products(document, selectors, captured_at, self.config.sequential_ids).collect();

        self.enter(RunPhase::Accumulating);
        #[cfg(test)]
        self.trail.push((RunPhase::Accumulating, records.len()));
        let extracted = batch.len();
        for record in batch {
            tracing::info!("Extracted: {}", record.product_name);
            records.push(record);
        }

        self.enter(RunPhase::ExtractingLinks);
        extracted
    }

    fn enter(&mut self, next: RunPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "invalid run phase transition: {} -> {}",
            self.phase,
            next
        );
        tracing::trace!("Run phase: {} -> {}", self.phase, next);
        self.phase = next;
    }
}

/// Resolves a product href against the listing page it was found on
///
/// Absolute hrefs pass through; relative ones are joined onto the listing
/// URL. Empty hrefs and non-HTTP(S) targets cannot be fetched.
fn resolve_link(base: Option<&Url>, base_str: &str, href: &str) -> Result<String, FetchError> {
    let unresolvable = || FetchError::UnresolvableLink {
        href: href.to_string(),
        base: base_str.to_string(),
    };

    let href_trimmed = href.trim();
    if href_trimmed.is_empty() {
        return Err(unresolvable());
    }

    let resolved = match base {
        Some(base) => base.join(href_trimmed),
        None => Url::parse(href_trimmed),
    }
    .map_err(|_| unresolvable())?;

    if resolved.scheme() == "http" || resolved.scheme() == "https" {
        Ok(resolved.to_string())
    } else {
        Err(unresolvable())
    }
}

/// Runs a complete scrape and writes its records
///
/// 1. Compile selectors and build the HTTP client
/// 2. Walk every seed URL and page, accumulating records
/// 3. Append the whole collection to `destination` in one sink call
///
/// Fetch failures never abort the run; a sink failure does.
///
/// # Example
///
/// ```no_run
/// use shelf_scraper::config::load_config;
/// use shelf_scraper::crawler::run_scrape;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let destination = Path::new(&config.csv_name).to_path_buf();
/// let outcome = run_scrape(config, &destination).await?;
/// println!("{} records written", outcome.report.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: Config, destination: &Path) -> Result<ScrapeOutcome, ScrapeError> {
    let mut coordinator = Coordinator::new(config)?;
    let mut outcome = coordinator.run().await;

    let written = append_records(&outcome.records, destination)?;
    outcome.report.records_written = written as u64;

    Ok(outcome)
}
