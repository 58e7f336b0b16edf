//! External price sources.
//!
//! Each source knows how to turn a [`BookQuery`] into one vendor request and
//! extract a single best-match price from the response. Sources recover from
//! their own failures: anything that prevents extracting a price (transport
//! errors, non-200 responses, schema drift) is logged and reported as
//! "no price" so one broken vendor never fails an aggregation.

use anyhow::{Context, Result};
use bigdecimal::{BigDecimal, FromPrimitive, RoundingMode};
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::types::BookQuery;

/// A single external price data provider
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    /// Source identifier used as the key in the aggregated result
    fn name(&self) -> &str;

    /// Look up the best-match price for one catalog item.
    ///
    /// Returns `None` for any failure; implementations must not propagate
    /// errors to the aggregator.
    async fn lookup(&self, query: &BookQuery) -> Option<BigDecimal>;
}

/// Marketplace search-page scraper.
///
/// Fetches a rendered search-results page and extracts the first price
/// element matched by the configured CSS selector. Version-sensitive by
/// nature: markup drift degrades to "no price".
pub struct HtmlScrapeSource {
    name: String,
    client: Client,
    search_url: String,
    query_param: String,
    price_selector: String,
}

impl HtmlScrapeSource {
    pub fn new(
        name: impl Into<String>,
        search_url: impl Into<String>,
        query_param: impl Into<String>,
        price_selector: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            name: name.into(),
            client,
            search_url: search_url.into(),
            query_param: query_param.into(),
            price_selector: price_selector.into(),
        })
    }

    async fn try_lookup(&self, query: &BookQuery) -> Result<Option<BigDecimal>> {
        let url = Url::parse_with_params(
            &self.search_url,
            &[(self.query_param.as_str(), query.search_term())],
        )
        .context("Failed to build search URL")?;

        let response =
            self.client.get(url).send().await.context("Failed to fetch search page")?;

        if !response.status().is_success() {
            anyhow::bail!("Search request failed with status: {}", response.status());
        }

        let html = response.text().await.context("Failed to read search page body")?;

        Ok(self.extract_price(&html))
    }

    /// Extract the first parseable price matched by the configured selector
    fn extract_price(&self, html: &str) -> Option<BigDecimal> {
        let document = Html::parse_document(html);
        let selector = Selector::parse(&self.price_selector).ok()?;

        for element in document.select(&selector) {
            let text = element.text().collect::<String>();
            if let Some(price) = parse_price_text(&text) {
                return Some(price);
            }
        }

        None
    }
}

#[async_trait::async_trait]
impl PriceSource for HtmlScrapeSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(&self, query: &BookQuery) -> Option<BigDecimal> {
        match self.try_lookup(query).await {
            Ok(Some(price)) => {
                info!("{}: found price {} for \"{}\"", self.name, price, query.title);
                Some(price)
            }
            Ok(None) => {
                info!("{}: no price found for \"{}\"", self.name, query.title);
                None
            }
            Err(e) => {
                warn!("{}: lookup failed for \"{}\": {:#}", self.name, query.title, e);
                None
            }
        }
    }
}

/// Response shape spoken by a [`JsonApiSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiSchema {
    /// Books-metadata API: `items[].saleInfo.{retailPrice,listPrice}.amount`
    BooksMetadata,
    /// Digital-storefront search API: `results[].price`
    Storefront,
}

/// Structured JSON API source.
///
/// Best-effort integration against a documented response schema; missing
/// fields or drifted schemas degrade to "no price".
pub struct JsonApiSource {
    name: String,
    client: Client,
    endpoint: String,
    schema: ApiSchema,
}

impl JsonApiSource {
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        schema: ApiSchema,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { name: name.into(), client, endpoint: endpoint.into(), schema })
    }

    fn request_url(&self, query: &BookQuery) -> Result<Url> {
        let url = match self.schema {
            ApiSchema::BooksMetadata => {
                // The books API supports structured queries; use the exact
                // identifier when the catalog has one.
                let q = match &query.identifier {
                    Some(identifier) => format!("isbn:{identifier}"),
                    None => format!("intitle:{} inauthor:{}", query.title, query.author),
                };
                Url::parse_with_params(&self.endpoint, &[("q", q.as_str()), ("maxResults", "5")])
            }
            ApiSchema::Storefront => Url::parse_with_params(
                &self.endpoint,
                &[("media", "ebook"), ("limit", "5"), ("term", query.search_term().as_str())],
            ),
        };

        url.context("Failed to build API request URL")
    }

    async fn try_lookup(&self, query: &BookQuery) -> Result<Option<BigDecimal>> {
        let url = self.request_url(query)?;

        let response = self.client.get(url).send().await.context("Failed to fetch API response")?;

        if !response.status().is_success() {
            anyhow::bail!("API request failed with status: {}", response.status());
        }

        let body = response.text().await.context("Failed to read API response body")?;

        Ok(self.extract_price(&body))
    }

    /// Extract the first matching item's sale/retail price
    fn extract_price(&self, body: &str) -> Option<BigDecimal> {
        match self.schema {
            ApiSchema::BooksMetadata => {
                let volumes: VolumeList = serde_json::from_str(body).ok()?;
                volumes.items?.into_iter().find_map(|volume| {
                    let sale_info = volume.sale_info?;
                    let field = sale_info.retail_price.or(sale_info.list_price)?;
                    decimal_from_f64(field.amount?)
                })
            }
            ApiSchema::Storefront => {
                let response: StorefrontResponse = serde_json::from_str(body).ok()?;
                response.results.into_iter().find_map(|item| decimal_from_f64(item.price?))
            }
        }
    }
}

#[async_trait::async_trait]
impl PriceSource for JsonApiSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(&self, query: &BookQuery) -> Option<BigDecimal> {
        match self.try_lookup(query).await {
            Ok(Some(price)) => {
                info!("{}: found price {} for \"{}\"", self.name, price, query.title);
                Some(price)
            }
            Ok(None) => {
                info!("{}: no price found for \"{}\"", self.name, query.title);
                None
            }
            Err(e) => {
                warn!("{}: lookup failed for \"{}\": {:#}", self.name, query.title, e);
                None
            }
        }
    }
}

/// Parse a scraped price string like "$12.99" or "1,299.00"
fn parse_price_text(text: &str) -> Option<BigDecimal> {
    for token in text.split_whitespace() {
        let cleaned: String =
            token.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
        if cleaned.is_empty() {
            continue;
        }
        if let Ok(price) = cleaned.parse::<BigDecimal>() {
            return Some(price.with_scale_round(2, RoundingMode::HalfUp));
        }
    }
    None
}

fn decimal_from_f64(value: f64) -> Option<BigDecimal> {
    BigDecimal::from_f64(value).map(|d| d.with_scale_round(2, RoundingMode::HalfUp))
}

#[derive(Debug, Deserialize)]
struct VolumeList {
    items: Option<Vec<Volume>>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    #[serde(rename = "saleInfo")]
    sale_info: Option<SaleInfo>,
}

#[derive(Debug, Deserialize)]
struct SaleInfo {
    #[serde(rename = "retailPrice")]
    retail_price: Option<PriceField>,
    #[serde(rename = "listPrice")]
    list_price: Option<PriceField>,
}

#[derive(Debug, Deserialize)]
struct PriceField {
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct StorefrontResponse {
    #[serde(default)]
    results: Vec<StorefrontItem>,
}

#[derive(Debug, Deserialize)]
struct StorefrontItem {
    price: Option<f64>,
}
