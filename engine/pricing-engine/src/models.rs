use bigdecimal::BigDecimal;
use price_scraper::MarketPrices;
use serde::{Deserialize, Serialize};

/// How one sale price splits between the creator, the payment processor,
/// and the platform.
///
/// Derived, read-only, keyed to one input price; recomputed on demand and
/// never cached. All monetary fields are rounded half-up to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub sale_price: BigDecimal,

    /// Creator's share of the sale
    pub creator_earnings: BigDecimal,

    /// Payment-processing fee (percentage + fixed)
    pub processor_fee: BigDecimal,

    /// Platform's share before processing fees
    pub platform_gross_revenue: BigDecimal,

    /// Platform's share after processing fees; the true profit signal
    pub platform_net: BigDecimal,

    /// Platform net as a percentage of the sale price
    pub profit_margin_percent: BigDecimal,
}

/// A priced recommendation for one catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRecommendation {
    pub recommended_price: BigDecimal,

    /// The item's current price, when it has one
    pub current_price: Option<BigDecimal>,

    /// `recommended_price - current_price`, when a current price exists
    pub price_delta: Option<BigDecimal>,

    /// The floor used for this recommendation
    pub minimum_price: BigDecimal,

    /// The market data the recommendation was computed from
    pub market_prices: MarketPrices,

    pub lowest_market_price: Option<BigDecimal>,

    /// Human-readable justification for the recommended price
    pub reason: String,

    /// Cost breakdown at the recommended price
    pub cost_breakdown: CostBreakdown,

    /// Whether the change is large enough to be worth republishing
    pub should_update: bool,
}

/// Outcome of validating an arbitrary candidate price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub price: BigDecimal,
    pub minimum_price: BigDecimal,
    pub cost_breakdown: CostBreakdown,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}
