//! Shelf-Scraper main entry point
//!
//! This is the command-line interface for the Shelf-Scraper product scraper.

use anyhow::Context;
use clap::Parser;
use shelf_scraper::config::{load_config_with_hash, Config};
use shelf_scraper::crawler::{page_url, run_scrape};
use shelf_scraper::output::print_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shelf-Scraper: a selector-driven product scraper
///
/// Shelf-Scraper walks paginated listing pages, follows every product link
/// and appends the fields picked out by the configured CSS selectors to a
/// CSV file.
#[derive(Parser, Debug)]
#[command(name = "shelf-scraper")]
#[command(version = "1.0.0")]
#[command(about = "A selector-driven product scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Write records to this CSV file instead of the configured csv_name
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Validate config and show what would be scraped without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let destination = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.csv_name));

    if cli.dry_run {
        handle_dry_run(&config, &destination);
        return Ok(());
    }

    handle_scrape(config, destination, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelf_scraper=info,warn"),
            1 => EnvFilter::new("shelf_scraper=debug,info"),
            2 => EnvFilter::new("shelf_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved config and every listing URL
fn handle_dry_run(config: &Config, destination: &std::path::Path) {
    println!("=== Shelf-Scraper Dry Run ===\n");

    println!("Pacing:");
    println!("  Pages per seed: {}", config.pages);
    println!("  Pause between seeds: {}s", config.time);
    println!("  User agent: {}", config.user_agent);

    println!("\nOutput:");
    println!("  CSV: {}", destination.display());
    println!("  Sequential ids: {}", config.sequential_ids);

    println!("\nSelectors:");
    for (field, selector) in config.selectors.entries() {
        println!("  {}: {}", field, selector);
    }

    println!("\nListing pages ({}):", config.urls.len() as u64 * config.pages as u64);
    for seed in &config.urls {
        for page in 1..=config.pages {
            println!("  - {}", page_url(seed, Some(page)));
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main scrape operation
async fn handle_scrape(config: Config, destination: PathBuf, quiet: bool) -> anyhow::Result<()> {
    tracing::info!(
        "Seed URLs: {}, pages per seed: {}, output: {}",
        config.urls.len(),
        config.pages,
        destination.display()
    );

    match run_scrape(config, &destination).await {
        Ok(outcome) => {
            tracing::info!("Scrape completed successfully");
            if !quiet {
                print_report(&outcome.report);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
