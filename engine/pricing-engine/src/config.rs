//! Configuration for the pricing engine.
//!
//! All fractions are stored as integer basis points and all fixed amounts as
//! integer cents, so the configured values stay exact; accessors expose them
//! as `BigDecimal` for the cost model's arithmetic.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};

/// Configuration for the pricing engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Revenue split between creator and platform
    pub splits: SplitConfig,

    /// Payment processor fee model
    pub processor: ProcessorFeeConfig,

    /// Recommendation parameters
    pub engine: EngineParameters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Creator's share of the sale price in basis points (7000 = 70%);
    /// the platform keeps the remainder
    pub creator_split_bps: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorFeeConfig {
    /// Percentage fee in basis points (290 = 2.9%)
    pub percentage_fee_bps: i64,

    /// Fixed fee per transaction in cents (30 = $0.30)
    pub fixed_fee_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineParameters {
    /// Minimum platform net as a fraction of the sale price, in basis
    /// points (1000 = 10%); used only to derive the floor price
    pub target_min_net_margin_bps: i64,

    /// Amount subtracted from the lowest competitor price in cents
    /// (100 = $1.00)
    pub competitive_discount_cents: i64,

    /// Minimum price change worth republishing, in cents (50 = $0.50);
    /// avoids thrashing on sub-threshold differences
    pub reprice_threshold_cents: i64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            splits: SplitConfig { creator_split_bps: 7000 },
            processor: ProcessorFeeConfig { percentage_fee_bps: 290, fixed_fee_cents: 30 },
            engine: EngineParameters {
                target_min_net_margin_bps: 1000,
                competitive_discount_cents: 100,
                reprice_threshold_cents: 50,
            },
        }
    }
}

impl PricingConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(split) = std::env::var("CREATOR_SPLIT_BPS") {
            config.splits.creator_split_bps = split.parse().unwrap_or(7000);
        }

        if let Ok(fee) = std::env::var("PROCESSOR_FEE_BPS") {
            config.processor.percentage_fee_bps = fee.parse().unwrap_or(290);
        }

        if let Ok(fee) = std::env::var("PROCESSOR_FIXED_FEE_CENTS") {
            config.processor.fixed_fee_cents = fee.parse().unwrap_or(30);
        }

        if let Ok(margin) = std::env::var("TARGET_MIN_NET_MARGIN_BPS") {
            config.engine.target_min_net_margin_bps = margin.parse().unwrap_or(1000);
        }

        if let Ok(discount) = std::env::var("COMPETITIVE_DISCOUNT_CENTS") {
            config.engine.competitive_discount_cents = discount.parse().unwrap_or(100);
        }

        if let Ok(threshold) = std::env::var("REPRICE_THRESHOLD_CENTS") {
            config.engine.reprice_threshold_cents = threshold.parse().unwrap_or(50);
        }

        Ok(config)
    }

    /// Fraction of the sale price paid to the creator
    pub fn creator_split(&self) -> BigDecimal {
        bps(self.splits.creator_split_bps)
    }

    /// Fraction of the sale price kept by the platform
    pub fn platform_split(&self) -> BigDecimal {
        bps(10_000 - self.splits.creator_split_bps)
    }

    /// Processor's percentage fee as a fraction
    pub fn processor_percentage_fee(&self) -> BigDecimal {
        bps(self.processor.percentage_fee_bps)
    }

    /// Processor's fixed fee in currency units
    pub fn processor_fixed_fee(&self) -> BigDecimal {
        cents(self.processor.fixed_fee_cents)
    }

    /// Target minimum platform net as a fraction of the sale price
    pub fn target_min_net_margin(&self) -> BigDecimal {
        bps(self.engine.target_min_net_margin_bps)
    }

    /// Undercut amount in currency units
    pub fn competitive_discount(&self) -> BigDecimal {
        cents(self.engine.competitive_discount_cents)
    }

    /// Re-pricing sensitivity threshold in currency units
    pub fn reprice_threshold(&self) -> BigDecimal {
        cents(self.engine.reprice_threshold_cents)
    }

    /// Reject configurations that cannot produce a viable floor price
    pub fn validate(&self) -> Result<()> {
        if !(0..=10_000).contains(&self.splits.creator_split_bps) {
            return Err(PricingError::Configuration(format!(
                "creator_split_bps must be within 0..=10000, got {}",
                self.splits.creator_split_bps
            )));
        }

        if self.processor.percentage_fee_bps < 0 || self.processor.fixed_fee_cents < 0 {
            return Err(PricingError::Configuration(
                "processor fees must be non-negative".to_string(),
            ));
        }

        if self.engine.competitive_discount_cents < 0 || self.engine.reprice_threshold_cents < 0 {
            return Err(PricingError::Configuration(
                "engine amounts must be non-negative".to_string(),
            ));
        }

        // The floor solves fixed_fee / headroom; with no headroom left after
        // the split, the percentage fee, and the margin target, no price can
        // meet the margin.
        let headroom_bps = 10_000
            - self.splits.creator_split_bps
            - self.processor.percentage_fee_bps
            - self.engine.target_min_net_margin_bps;
        if headroom_bps <= 0 {
            return Err(PricingError::Configuration(format!(
                "split, percentage fee, and margin target leave no price headroom ({headroom_bps} bps)"
            )));
        }

        Ok(())
    }
}

/// Basis points as an exact decimal fraction
fn bps(value: i64) -> BigDecimal {
    BigDecimal::new(value.into(), 4)
}

/// Cents as an exact decimal amount
fn cents(value: i64) -> BigDecimal {
    BigDecimal::new(value.into(), 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(text: &str) -> BigDecimal {
        text.parse().unwrap()
    }

    #[test]
    fn accessors_are_exact_decimals() {
        let config = PricingConfig::default();
        assert_eq!(config.creator_split(), price("0.70"));
        assert_eq!(config.platform_split(), price("0.30"));
        assert_eq!(config.processor_percentage_fee(), price("0.029"));
        assert_eq!(config.processor_fixed_fee(), price("0.30"));
        assert_eq!(config.target_min_net_margin(), price("0.10"));
        assert_eq!(config.competitive_discount(), price("1.00"));
        assert_eq!(config.reprice_threshold(), price("0.50"));
    }

    #[test]
    fn default_config_is_valid() {
        assert!(PricingConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_config_with_no_headroom() {
        let mut config = PricingConfig::default();
        config.splits.creator_split_bps = 9000;
        // 10000 - 9000 - 290 - 1000 < 0
        assert!(matches!(config.validate(), Err(PricingError::Configuration(_))));
    }

    #[test]
    fn rejects_negative_fees() {
        let mut config = PricingConfig::default();
        config.processor.fixed_fee_cents = -30;
        assert!(config.validate().is_err());
    }
}
