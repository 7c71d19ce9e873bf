use crate::config::types::SelectorConfig;
use crate::ConfigError;
use scraper::Selector;

/// Selectors parsed once at startup so extraction never re-parses them
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub homepage: Selector,
    pub home_product: Selector,
    pub product_name: Selector,
    pub review: Selector,
    pub price: Selector,
    pub discount_price: Selector,
}

impl CompiledSelectors {
    /// Compiles every selector of the config
    ///
    /// # Returns
    ///
    /// * `Ok(CompiledSelectors)` - All selectors parsed
    /// * `Err(ConfigError::InvalidSelector)` - The first selector that failed, by key
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            homepage: compile_one("homepage", &config.homepage)?,
            home_product: compile_one("home_product", &config.home_product)?,
            product_name: compile_one("product_name", &config.product_name)?,
            review: compile_one("review", &config.review)?,
            price: compile_one("price", &config.price)?,
            discount_price: compile_one("discount_price", &config.discount_price)?,
        })
    }
}

pub(crate) fn compile_one(field: &'static str, raw: &str) -> Result<Selector, ConfigError> {
    Selector::parse(raw).map_err(|e| ConfigError::InvalidSelector {
        field,
        message: format!("{:?}", e),
    })
}
