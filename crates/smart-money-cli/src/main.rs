use analysis_core::{MarketCondition, VolatilityLevel};
use analysis_orchestrator::SmartMoneyAnalyzer;
use anyhow::Result;
use clap::Parser;
use data_collector::ProviderConfig;

/// Composite smart-money signal analyzer
#[derive(Parser, Debug)]
#[command(name = "smart-money")]
#[command(version)]
#[command(about = "Scores a ticker across seven smart-money dimensions", long_about = None)]
struct Cli {
    /// Ticker symbol, e.g. AAPL
    symbol: String,

    /// Market condition: bull, bear or normal
    #[arg(long, default_value = "normal")]
    market: MarketCondition,

    /// Volatility level: high, medium or low
    #[arg(long = "vol", default_value = "medium")]
    volatility: VolatilityLevel,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let analyzer = SmartMoneyAnalyzer::new(ProviderConfig::from_env());
    let result = analyzer
        .comprehensive_analysis(&cli.symbol, cli.market, cli.volatility)
        .await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
