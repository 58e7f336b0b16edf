//! End-to-end price check: aggregate competitor prices for one ebook and
//! print the engine's recommendation.

use clap::Parser;
use price_scraper::{BookQuery, PriceAggregator, ScraperConfig};
use pricing_engine::{PricingConfig, PricingEngine};
use tracing::info;

#[derive(Parser)]
#[command(name = "price-check")]
#[command(about = "Fetch competitor prices for one ebook and print the recommended sale price")]
#[command(version = "0.1.0")]
struct Cli {
    /// Title of the ebook
    title: String,

    /// Author name
    author: String,

    /// ISBN, preferred over free-text search when present
    #[arg(short, long)]
    isbn: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut query = BookQuery::new(cli.title, cli.author);
    if let Some(isbn) = cli.isbn {
        query = query.with_identifier(isbn);
    }

    let scraper_config = ScraperConfig::from_env()?;
    let aggregator = PriceAggregator::new(&scraper_config)?;
    let engine = PricingEngine::new(PricingConfig::from_env()?)?;

    println!("🔍 Looking up market prices for \"{}\" by {}...", query.title, query.author);
    info!("Starting price check for \"{}\"", query.title);

    let market_prices = aggregator.fetch_market_prices(&query).await;

    println!("\nMarket prices:");
    for (source, outcome) in market_prices.iter() {
        match outcome {
            Some(price) => println!("  {source}: ${price}"),
            None => println!("  {source}: no price"),
        }
    }

    let recommendation = engine.recommend_price(&market_prices, None, None)?;

    println!("\n💰 Recommended price: ${}", recommendation.recommended_price);
    println!("   Reason: {}", recommendation.reason);
    println!("   Minimum viable price: ${}", recommendation.minimum_price);

    let breakdown = &recommendation.cost_breakdown;
    println!("\nCost breakdown at ${}:", breakdown.sale_price);
    println!("   Creator earnings:   ${}", breakdown.creator_earnings);
    println!("   Processor fee:      ${}", breakdown.processor_fee);
    println!("   Platform gross:     ${}", breakdown.platform_gross_revenue);
    println!("   Platform net:       ${}", breakdown.platform_net);
    println!("   Platform margin:    {}%", breakdown.profit_margin_percent);

    info!("Price check completed");
    Ok(())
}
