use serde::Deserialize;
use std::time::Duration;

/// Browser user agent sent when the config does not override it
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure for Shelf-Scraper
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Seed URLs, each ending where the page number gets appended
    pub urls: Vec<String>,

    /// Number of listing pages fetched per seed URL
    pub pages: u32,

    /// Pause after each seed URL (seconds)
    pub time: f64,

    /// Path of the CSV file records are appended to
    pub csv_name: String,

    /// Prefix every record with its 1-based position on the product page
    #[serde(default)]
    pub sequential_ids: bool,

    /// User agent override
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    pub selectors: SelectorConfig,
}

/// CSS selectors driving every extraction stage
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    /// Links from a listing page to product pages
    pub homepage: String,

    /// One product block on a product page
    pub home_product: String,

    pub product_name: String,
    pub review: String,
    pub price: String,
    pub discount_price: String,
}

impl Config {
    /// Pause after each seed URL, or `None` when `time` is negative, not
    /// finite or too large for a `Duration`
    pub fn pause(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.time).ok()
    }
}

impl SelectorConfig {
    /// All selectors paired with their config key, in declaration order
    pub fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("homepage", self.homepage.as_str()),
            ("home_product", self.home_product.as_str()),
            ("product_name", self.product_name.as_str()),
            ("review", self.review.as_str()),
            ("price", self.price.as_str()),
            ("discount_price", self.discount_price.as_str()),
        ]
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
