//! Recommendation and validation over aggregated market data.

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use price_scraper::MarketPrices;
use tracing::info;

use crate::config::PricingConfig;
use crate::cost::CostModel;
use crate::error::{PricingError, Result};
use crate::models::{PricingRecommendation, ValidationResult};

/// Produces margin-protected price recommendations and validates candidate
/// prices against the same cost model.
///
/// Purely synchronous and stateless; safe to share across threads.
pub struct PricingEngine {
    cost_model: CostModel,
}

impl PricingEngine {
    /// Create an engine, rejecting configurations that cannot produce a
    /// viable floor
    pub fn new(config: PricingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { cost_model: CostModel::new(config) })
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    /// Recommend a sale price for one catalog item.
    ///
    /// Undercuts the lowest competitor by the configured discount when that
    /// stays at or above the floor; with no market data, keeps a viable
    /// current price or falls back to the floor. Absence of market data is
    /// an expected input state, never an error.
    pub fn recommend_price(
        &self,
        market_prices: &MarketPrices,
        current_price: Option<&BigDecimal>,
        minimum_price_override: Option<&BigDecimal>,
    ) -> Result<PricingRecommendation> {
        let floor = match minimum_price_override {
            Some(floor) => floor.clone(),
            None => self.cost_model.minimum_price(),
        };

        let lowest = market_prices.lowest();

        let (recommended_price, reason) = match &lowest {
            None => match current_price {
                Some(current) if *current >= floor => (
                    current.clone(),
                    format!(
                        "No market data available - keeping current price of {}",
                        money(current)
                    ),
                ),
                _ => (
                    floor.clone(),
                    format!(
                        "No market data available - using minimum viable price of {}",
                        money(&floor)
                    ),
                ),
            },
            Some(lowest) => {
                let discount = self.cost_model.config().competitive_discount();
                let competitive_price =
                    (lowest - &discount).with_scale_round(2, RoundingMode::HalfUp);

                if competitive_price >= floor {
                    let reason = format!(
                        "Undercutting lowest market price {} by {}",
                        money(lowest),
                        money(&discount)
                    );
                    (competitive_price, reason)
                } else {
                    let reason = format!(
                        "Lowest market price {} is below the viable floor - using minimum price of {}",
                        money(lowest),
                        money(&floor)
                    );
                    (floor.clone(), reason)
                }
            }
        };

        let cost_breakdown = self.cost_model.compute_breakdown(&recommended_price)?;

        let should_update = match current_price {
            None => true,
            Some(current) => {
                (&recommended_price - current).abs() >= self.cost_model.config().reprice_threshold()
            }
        };

        let price_delta = current_price.map(|current| &recommended_price - current);

        info!(
            "Recommended {} ({} market prices, floor {}): {}",
            money(&recommended_price),
            market_prices.present_count(),
            money(&floor),
            reason
        );

        Ok(PricingRecommendation {
            recommended_price,
            current_price: current_price.cloned(),
            price_delta,
            minimum_price: floor,
            market_prices: market_prices.clone(),
            lowest_market_price: lowest,
            reason,
            cost_breakdown,
            should_update,
        })
    }

    /// Validate an arbitrary candidate price against the cost model.
    ///
    /// A price is valid when it meets the floor and leaves the platform a
    /// positive net. Fails with `InvalidInput` for non-positive prices.
    pub fn validate_price(&self, price: &BigDecimal) -> Result<ValidationResult> {
        if *price <= BigDecimal::zero() {
            return Err(PricingError::InvalidInput(format!(
                "price must be positive, got {price}"
            )));
        }

        let minimum_price = self.cost_model.minimum_price();
        let cost_breakdown = self.cost_model.compute_breakdown(price)?;

        let mut warnings = Vec::new();
        let mut recommendations = Vec::new();

        if *price < minimum_price {
            warnings.push(format!(
                "Price {} is below the minimum viable price {}",
                money(price),
                money(&minimum_price)
            ));
        }
        if cost_breakdown.platform_net <= BigDecimal::zero() {
            warnings.push(format!(
                "Platform loses money at this price (net {})",
                money(&cost_breakdown.platform_net)
            ));
        }
        if cost_breakdown.profit_margin_percent < BigDecimal::from(5) {
            warnings.push(format!(
                "Low platform margin ({}%)",
                cost_breakdown.profit_margin_percent
            ));
        }

        if *price < minimum_price {
            recommendations.push(format!("Raise the price to at least {}", money(&minimum_price)));
        }
        if cost_breakdown.profit_margin_percent < BigDecimal::from(8) {
            recommendations
                .push("Consider raising the price to improve the platform margin".to_string());
        }

        let is_valid =
            *price >= minimum_price && cost_breakdown.platform_net > BigDecimal::zero();

        Ok(ValidationResult {
            is_valid,
            price: price.clone(),
            minimum_price,
            cost_breakdown,
            warnings,
            recommendations,
        })
    }
}

/// Format a monetary amount for reason strings
fn money(value: &BigDecimal) -> String {
    format!("${}", value.with_scale_round(2, RoundingMode::HalfUp))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(text: &str) -> BigDecimal {
        text.parse().unwrap()
    }

    fn engine() -> PricingEngine {
        PricingEngine::new(PricingConfig::default()).unwrap()
    }

    fn market(pairs: &[(&str, &str)]) -> MarketPrices {
        let mut prices = MarketPrices::new();
        for (source, value) in pairs {
            prices.insert(*source, Some(price(value)));
        }
        prices
    }

    #[test]
    fn no_market_data_and_no_current_price_uses_the_floor() {
        let recommendation =
            engine().recommend_price(&MarketPrices::new(), None, None).unwrap();

        assert_eq!(recommendation.recommended_price, price("1.76"));
        assert_eq!(recommendation.minimum_price, price("1.76"));
        assert_eq!(recommendation.lowest_market_price, None);
        assert_eq!(recommendation.price_delta, None);
        assert!(recommendation.should_update);
        assert!(recommendation.reason.contains("minimum viable price"));
    }

    #[test]
    fn no_market_data_keeps_a_viable_current_price() {
        let current = price("12.99");
        let recommendation =
            engine().recommend_price(&MarketPrices::new(), Some(&current), None).unwrap();

        assert_eq!(recommendation.recommended_price, price("12.99"));
        assert_eq!(recommendation.price_delta, Some(price("0.00")));
        assert!(!recommendation.should_update);
        assert!(recommendation.reason.contains("keeping current price"));
    }

    #[test]
    fn no_market_data_lifts_a_current_price_below_the_floor() {
        let current = price("0.99");
        let recommendation =
            engine().recommend_price(&MarketPrices::new(), Some(&current), None).unwrap();

        assert_eq!(recommendation.recommended_price, price("1.76"));
        assert!(recommendation.reason.contains("minimum viable price"));
    }

    #[test]
    fn undercuts_the_lowest_competitor() {
        let prices = market(&[("amazon", "14.99"), ("google", "15.99"), ("apple", "13.99")]);
        let current = price("12.99");
        let recommendation = engine().recommend_price(&prices, Some(&current), None).unwrap();

        assert_eq!(recommendation.lowest_market_price, Some(price("13.99")));
        assert_eq!(recommendation.recommended_price, price("12.99"));
        assert!(recommendation.reason.contains("$13.99"));
        assert!(recommendation.reason.contains("$1.00"));
        // delta is 0.00, under the 0.50 re-pricing threshold
        assert!(!recommendation.should_update);
    }

    #[test]
    fn undercut_price_above_the_floor_is_kept_even_in_a_cheap_market() {
        let prices = market(&[("amazon", "9.99"), ("google", "10.99")]);
        let recommendation = engine().recommend_price(&prices, None, None).unwrap();

        // 9.99 - 1.00 = 8.99, still at or above the 1.76 floor
        assert_eq!(recommendation.recommended_price, price("8.99"));
        assert!(recommendation.reason.contains("Undercutting"));
    }

    #[test]
    fn falls_to_the_floor_when_the_undercut_price_dips_below_it() {
        let prices = market(&[("amazon", "2.50")]);
        let recommendation = engine().recommend_price(&prices, None, None).unwrap();

        // 2.50 - 1.00 = 1.50 < 1.76
        assert_eq!(recommendation.recommended_price, price("1.76"));
        assert!(recommendation.reason.contains("below the viable floor"));
    }

    #[test]
    fn respects_a_floor_override() {
        let prices = market(&[("amazon", "9.99")]);
        let floor = price("10.00");
        let recommendation = engine().recommend_price(&prices, None, Some(&floor)).unwrap();

        assert_eq!(recommendation.recommended_price, price("10.00"));
        assert_eq!(recommendation.minimum_price, price("10.00"));
    }

    #[test]
    fn should_update_requires_the_threshold_delta() {
        let prices = market(&[("amazon", "13.99")]);
        let engine = engine();

        // recommended 12.99 vs current 12.50: delta 0.49 < 0.50
        let current = price("12.50");
        let recommendation = engine.recommend_price(&prices, Some(&current), None).unwrap();
        assert!(!recommendation.should_update);
        assert_eq!(recommendation.price_delta, Some(price("0.49")));

        // recommended 12.99 vs current 12.49: delta 0.50
        let current = price("12.49");
        let recommendation = engine.recommend_price(&prices, Some(&current), None).unwrap();
        assert!(recommendation.should_update);
    }

    #[test]
    fn recommendation_is_idempotent() {
        let prices = market(&[("amazon", "14.99"), ("apple", "13.99")]);
        let current = price("11.49");
        let engine = engine();

        let first = engine.recommend_price(&prices, Some(&current), None).unwrap();
        let second = engine.recommend_price(&prices, Some(&current), None).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn the_minimum_price_itself_validates() {
        let engine = engine();
        let minimum = engine.cost_model().minimum_price();
        let result = engine.validate_price(&minimum).unwrap();

        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn a_healthy_price_validates_cleanly() {
        let result = engine().validate_price(&price("9.99")).unwrap();

        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn a_price_below_the_floor_collects_warnings_in_order() {
        let result = engine().validate_price(&price("1.00")).unwrap();

        assert!(!result.is_valid);
        // fee = 0.33, gross = 0.30, net = -0.03
        assert_eq!(result.cost_breakdown.platform_net, price("-0.03"));
        assert_eq!(result.warnings.len(), 3);
        assert!(result.warnings[0].contains("below the minimum viable price"));
        assert!(result.warnings[1].contains("loses money"));
        assert!(result.warnings[2].contains("Low platform margin"));
        assert!(result.recommendations[0].contains("at least $1.76"));
    }

    #[test]
    fn a_profitable_price_in_the_advisory_band_gets_a_recommendation_only() {
        // At 1.50: fee = 0.34, gross = 0.45, net = 0.11, margin = 7.33%.
        // Below the floor but profitable and above the 5% warning line.
        let result = engine().validate_price(&price("1.50")).unwrap();

        assert!(!result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("below the minimum viable price"));
        assert_eq!(result.recommendations.len(), 2);
        assert!(result.recommendations[1].contains("Consider raising"));
    }

    #[test]
    fn a_sub_five_percent_margin_is_warned_about() {
        // At 1.20: fee = 0.33, gross = 0.36, net = 0.03, margin = 2.50%.
        let result = engine().validate_price(&price("1.20")).unwrap();

        assert!(!result.is_valid);
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].contains("below the minimum viable price"));
        assert!(result.warnings[1].contains("Low platform margin"));
    }

    #[test]
    fn validation_rejects_non_positive_prices() {
        assert!(matches!(
            engine().validate_price(&price("0.00")),
            Err(PricingError::InvalidInput(_))
        ));
        assert!(matches!(
            engine().validate_price(&price("-1.00")),
            Err(PricingError::InvalidInput(_))
        ));
    }

    #[test]
    fn engine_rejects_unviable_configuration() {
        let mut config = PricingConfig::default();
        config.splits.creator_split_bps = 9500;
        assert!(matches!(
            PricingEngine::new(config),
            Err(PricingError::Configuration(_))
        ));
    }
}
