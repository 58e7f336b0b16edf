use bigdecimal::{BigDecimal, RoundingMode, Zero};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A catalog item lookup request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookQuery {
    /// Title of the ebook
    pub title: String,

    /// Author name
    pub author: String,

    /// External identifier (ISBN), preferred over free-text search when present
    pub identifier: Option<String>,
}

impl BookQuery {
    /// Create a free-text query from title and author
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self { title: title.into(), author: author.into(), identifier: None }
    }

    /// Attach an external identifier (ISBN)
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Free-text search term: the identifier when present, otherwise title + author
    pub fn search_term(&self) -> String {
        match &self.identifier {
            Some(identifier) => identifier.clone(),
            None => format!("{} {}", self.title, self.author),
        }
    }
}

/// Per-source market prices collected by one aggregation call.
///
/// Every configured source appears as a key; `None` means the source did not
/// return a usable price (timeout, bad response, unparseable payload). Keys
/// are kept sorted so merged results are deterministic regardless of which
/// lookup finished first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketPrices {
    prices: BTreeMap<String, Option<BigDecimal>>,
}

impl MarketPrices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one source's lookup
    pub fn insert(&mut self, source: impl Into<String>, price: Option<BigDecimal>) {
        self.prices.insert(source.into(), price);
    }

    /// Price reported by one source, if it returned one
    pub fn price_for(&self, source: &str) -> Option<&BigDecimal> {
        self.prices.get(source).and_then(|price| price.as_ref())
    }

    /// Whether a source was queried at all, regardless of outcome
    pub fn contains_source(&self, source: &str) -> bool {
        self.prices.contains_key(source)
    }

    /// Number of sources queried
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Number of sources that returned a usable price
    pub fn present_count(&self) -> usize {
        self.usable().count()
    }

    /// Iterate over all (source, outcome) pairs in source-name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<BigDecimal>)> {
        self.prices.iter()
    }

    /// Lowest usable market price, `None` when no source returned one
    pub fn lowest(&self) -> Option<BigDecimal> {
        self.usable().min().cloned()
    }

    /// Mean of the usable market prices rounded half-up to 2 decimals,
    /// `None` when no source returned one
    pub fn average(&self) -> Option<BigDecimal> {
        let mut sum = BigDecimal::zero();
        let mut count: i64 = 0;
        for price in self.usable() {
            sum += price;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        Some((sum / BigDecimal::from(count)).with_scale_round(2, RoundingMode::HalfUp))
    }

    // A scraped "$0.00" is a parsing artifact in this domain, not a real
    // free price, so zero is excluded along with absent values.
    fn usable(&self) -> impl Iterator<Item = &BigDecimal> {
        self.prices
            .values()
            .filter_map(|price| price.as_ref())
            .filter(|price| **price > BigDecimal::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(text: &str) -> BigDecimal {
        text.parse().unwrap()
    }

    fn sample() -> MarketPrices {
        let mut prices = MarketPrices::new();
        prices.insert("amazon", Some(price("14.99")));
        prices.insert("google", Some(price("15.99")));
        prices.insert("apple", Some(price("13.99")));
        prices
    }

    #[test]
    fn lowest_picks_minimum_across_sources() {
        assert_eq!(sample().lowest(), Some(price("13.99")));
    }

    #[test]
    fn average_rounds_half_up() {
        // (14.99 + 15.99 + 13.99) / 3 = 14.990
        assert_eq!(sample().average(), Some(price("14.99")));

        let mut prices = MarketPrices::new();
        prices.insert("amazon", Some(price("10.00")));
        prices.insert("google", Some(price("10.01")));
        // 20.01 / 2 = 10.005 -> 10.01
        assert_eq!(prices.average(), Some(price("10.01")));
    }

    #[test]
    fn reductions_ignore_missing_sources() {
        let mut prices = sample();
        prices.insert("google", None);
        assert_eq!(prices.lowest(), Some(price("13.99")));
        assert_eq!(prices.present_count(), 2);
        assert_eq!(prices.len(), 3);
    }

    #[test]
    fn zero_prices_are_excluded() {
        let mut prices = MarketPrices::new();
        prices.insert("amazon", Some(price("0.00")));
        prices.insert("google", Some(price("12.99")));
        assert_eq!(prices.lowest(), Some(price("12.99")));
        assert_eq!(prices.average(), Some(price("12.99")));
        assert_eq!(prices.present_count(), 1);
    }

    #[test]
    fn empty_map_has_no_reductions() {
        let prices = MarketPrices::new();
        assert_eq!(prices.lowest(), None);
        assert_eq!(prices.average(), None);

        let mut all_failed = MarketPrices::new();
        all_failed.insert("amazon", None);
        all_failed.insert("google", None);
        assert_eq!(all_failed.lowest(), None);
        assert_eq!(all_failed.average(), None);
    }

    #[test]
    fn search_term_prefers_identifier() {
        let query = BookQuery::new("The Martian", "Andy Weir");
        assert_eq!(query.search_term(), "The Martian Andy Weir");

        let query = query.with_identifier("9780804139021");
        assert_eq!(query.search_term(), "9780804139021");
    }
}
