//! Pricing engine for the ebook marketplace.
//!
//! Turns aggregated competitor prices into a margin-protected sale price
//! recommendation: undercut the lowest competitor when profitable, but never
//! price below the floor that still pays the platform its configured minimum
//! net margin after the creator revenue split and payment-processing fees.

pub mod config;
pub mod cost;
pub mod engine;
pub mod error;
pub mod models;

pub use config::{EngineParameters, PricingConfig, ProcessorFeeConfig, SplitConfig};
pub use cost::CostModel;
pub use engine::PricingEngine;
pub use error::{PricingError, Result};
pub use models::{CostBreakdown, PricingRecommendation, ValidationResult};
