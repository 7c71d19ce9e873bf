use crate::config::selectors::compile_one;
use crate::config::types::{Config, SelectorConfig};
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_seed_urls(&config.urls)?;
    validate_pacing(config.pages, config.time)?;
    validate_output(&config.csv_name)?;
    validate_user_agent(&config.user_agent)?;
    validate_selectors(&config.selectors)?;
    Ok(())
}

/// Validates seed URLs
///
/// A seed is a prefix: the page number is appended verbatim, so the check
/// runs against the URL of page 1.
fn validate_seed_urls(urls: &[String]) -> Result<(), ConfigError> {
    if urls.is_empty() {
        return Err(ConfigError::Validation(
            "urls must contain at least one seed URL".to_string(),
        ));
    }

    for seed in urls {
        let first_page = format!("{}1", seed);
        let url = Url::parse(&first_page)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use http or https",
                seed
            )));
        }
    }

    Ok(())
}

fn validate_pacing(pages: u32, time: f64) -> Result<(), ConfigError> {
    if pages < 1 {
        return Err(ConfigError::Validation(format!(
            "pages must be >= 1, got {}",
            pages
        )));
    }

    if Duration::try_from_secs_f64(time).is_err() {
        return Err(ConfigError::Validation(format!(
            "time must be a non-negative number of seconds, got {}",
            time
        )));
    }

    Ok(())
}

fn validate_output(csv_name: &str) -> Result<(), ConfigError> {
    if csv_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "csv_name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Every selector must be non-empty and parse as CSS
fn validate_selectors(selectors: &SelectorConfig) -> Result<(), ConfigError> {
    for (field, raw) in selectors.entries() {
        if raw.trim().is_empty() {
            return Err(ConfigError::InvalidSelector {
                field,
                message: "selector cannot be empty".to_string(),
            });
        }
        compile_one(field, raw)?;
    }
    Ok(())
}
