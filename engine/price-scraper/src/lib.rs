//! Competitor price aggregation for the ebook marketplace.
//!
//! Queries every configured external price source concurrently and collects
//! the results into a [`MarketPrices`] map. Sources are best-effort: a
//! timeout, a bad response, or an unparseable payload from one source never
//! fails the aggregate call; that source simply reports no price.

pub mod aggregator;
pub mod config;
pub mod sources;
pub mod types;

pub use aggregator::PriceAggregator;
pub use config::ScraperConfig;
pub use sources::{ApiSchema, HtmlScrapeSource, JsonApiSource, PriceSource};
pub use types::{BookQuery, MarketPrices};
