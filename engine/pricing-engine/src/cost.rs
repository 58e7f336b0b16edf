//! Cost model: how a sale price splits between creator, processor, and
//! platform, and the lowest price that still meets the margin target.

use bigdecimal::{BigDecimal, One, RoundingMode, Zero};

use crate::config::PricingConfig;
use crate::error::{PricingError, Result};
use crate::models::CostBreakdown;

/// Pure cost computations over one [`PricingConfig`].
///
/// Stateless and side-effect-free; every call recomputes from the
/// configuration so per-category configs can vary between calls.
pub struct CostModel {
    config: PricingConfig,
}

impl CostModel {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Split one sale price into its cost components.
    ///
    /// Fails with `InvalidInput` for non-positive prices; that is a
    /// programmer error, not a runtime condition.
    pub fn compute_breakdown(&self, sale_price: &BigDecimal) -> Result<CostBreakdown> {
        if *sale_price <= BigDecimal::zero() {
            return Err(PricingError::InvalidInput(format!(
                "sale price must be positive, got {sale_price}"
            )));
        }

        let processor_fee = round_money(
            &(sale_price * self.config.processor_percentage_fee()
                + self.config.processor_fixed_fee()),
        );
        let creator_earnings = round_money(&(sale_price * self.config.creator_split()));
        let platform_gross_revenue = round_money(&(sale_price * self.config.platform_split()));
        let platform_net = &platform_gross_revenue - &processor_fee;
        let profit_margin_percent =
            round_money(&(&platform_net * BigDecimal::from(100) / sale_price));

        Ok(CostBreakdown {
            sale_price: round_money(sale_price),
            creator_earnings,
            processor_fee,
            platform_gross_revenue,
            platform_net,
            profit_margin_percent,
        })
    }

    /// Lowest sale price that still pays the platform its target minimum
    /// net margin.
    ///
    /// Solves `x * (1 - creator_split - percentage_fee) - fixed_fee >=
    /// x * margin` for `x` and rounds the result up, so the floor is never
    /// under-protective by a cent.
    pub fn minimum_price(&self) -> BigDecimal {
        let headroom = BigDecimal::one()
            - self.config.creator_split()
            - self.config.processor_percentage_fee()
            - self.config.target_min_net_margin();

        (self.config.processor_fixed_fee() / headroom).with_scale_round(2, RoundingMode::Ceiling)
    }
}

/// Round a monetary amount half-up to 2 decimals
pub(crate) fn round_money(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}
