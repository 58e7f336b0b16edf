//! Configuration for the price aggregator

use serde::{Deserialize, Serialize};

/// Configuration for the price aggregator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Per-source lookup timeout in seconds
    pub lookup_timeout_secs: u64,

    /// User agent sent with outgoing requests
    pub user_agent: String,

    /// External source endpoints
    pub sources: SourceEndpoints,
}

/// Endpoints for the baseline external sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEndpoints {
    /// Search page of the general marketplace (HTML scrape)
    pub marketplace_search_url: String,

    /// CSS selector for the price element on the marketplace search page
    pub marketplace_price_selector: String,

    /// Books metadata API endpoint (JSON)
    pub books_api_url: String,

    /// Digital storefront search API endpoint (JSON)
    pub storefront_api_url: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            sources: SourceEndpoints::default(),
        }
    }
}

impl Default for SourceEndpoints {
    fn default() -> Self {
        Self {
            marketplace_search_url: "https://www.amazon.com/s".to_string(),
            marketplace_price_selector: ".s-result-item .a-price .a-offscreen".to_string(),
            books_api_url: "https://www.googleapis.com/books/v1/volumes".to_string(),
            storefront_api_url: "https://itunes.apple.com/search".to_string(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(timeout) = std::env::var("PRICE_LOOKUP_TIMEOUT_SECS") {
            config.lookup_timeout_secs = timeout.parse().unwrap_or(10);
        }

        if let Ok(user_agent) = std::env::var("PRICE_SCRAPER_USER_AGENT") {
            config.user_agent = user_agent;
        }

        if let Ok(url) = std::env::var("MARKETPLACE_SEARCH_URL") {
            config.sources.marketplace_search_url = url;
        }

        if let Ok(selector) = std::env::var("MARKETPLACE_PRICE_SELECTOR") {
            config.sources.marketplace_price_selector = selector;
        }

        if let Ok(url) = std::env::var("BOOKS_API_URL") {
            config.sources.books_api_url = url;
        }

        if let Ok(url) = std::env::var("STOREFRONT_API_URL") {
            config.sources.storefront_api_url = url;
        }

        Ok(config)
    }
}
