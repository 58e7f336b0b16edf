//! Concurrent fan-out over the configured price sources.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::ScraperConfig;
use crate::sources::{ApiSchema, HtmlScrapeSource, JsonApiSource, PriceSource};
use crate::types::{BookQuery, MarketPrices};

/// Aggregates competitor prices across independent external sources.
///
/// Each lookup runs as its own task with a per-lookup timeout; results are
/// merged by source name, so the output is deterministic regardless of
/// completion order. One source failing, timing out, or returning garbage
/// never affects the others.
pub struct PriceAggregator {
    sources: Vec<Arc<dyn PriceSource>>,
    lookup_timeout: Duration,
}

impl PriceAggregator {
    /// Create an aggregator over the three baseline sources
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.lookup_timeout_secs);

        let sources: Vec<Arc<dyn PriceSource>> = vec![
            Arc::new(HtmlScrapeSource::new(
                "amazon",
                &config.sources.marketplace_search_url,
                "k",
                &config.sources.marketplace_price_selector,
                &config.user_agent,
                timeout,
            )?),
            Arc::new(JsonApiSource::new(
                "google",
                &config.sources.books_api_url,
                ApiSchema::BooksMetadata,
                timeout,
            )?),
            Arc::new(JsonApiSource::new(
                "apple",
                &config.sources.storefront_api_url,
                ApiSchema::Storefront,
                timeout,
            )?),
        ];

        Ok(Self { sources, lookup_timeout: timeout })
    }

    /// Create an aggregator over an explicit source set
    pub fn with_sources(sources: Vec<Arc<dyn PriceSource>>, lookup_timeout: Duration) -> Self {
        Self { sources, lookup_timeout }
    }

    /// Fetch competitor prices for one catalog item.
    ///
    /// Always returns a map with one key per configured source; a source
    /// that produced no usable price maps to `None`.
    pub async fn fetch_market_prices(&self, query: &BookQuery) -> MarketPrices {
        info!(
            "Fetching market prices from {} sources for \"{}\" by {}",
            self.sources.len(),
            query.title,
            query.author
        );

        let mut handles = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let source = Arc::clone(source);
            let query = query.clone();
            let timeout = self.lookup_timeout;
            let name = source.name().to_string();

            let handle = tokio::spawn(async move {
                match tokio::time::timeout(timeout, source.lookup(&query)).await {
                    Ok(price) => price,
                    Err(_) => {
                        warn!("{}: lookup timed out after {:?}", source.name(), timeout);
                        None
                    }
                }
            });
            handles.push((name, handle));
        }

        let mut prices = MarketPrices::new();
        for (name, handle) in handles {
            match handle.await {
                Ok(price) => prices.insert(name, price),
                Err(e) => {
                    warn!("{}: lookup task failed: {}", name, e);
                    prices.insert(name, None);
                }
            }
        }

        info!(
            "Collected {} usable prices from {} sources",
            prices.present_count(),
            prices.len()
        );

        prices
    }
}
