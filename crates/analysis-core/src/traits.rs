use async_trait::async_trait;

use crate::{
    AnalysisError, Bar, CashflowRow, Fundamentals, HoldingRecord, InsiderFiling, WhaleTransaction,
};

/// Trait for daily OHLCV + fundamentals providers
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn history(&self, symbol: &str) -> Result<Vec<Bar>, AnalysisError>;
    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals, AnalysisError>;
    async fn cashflow(&self, symbol: &str) -> Result<Vec<CashflowRow>, AnalysisError>;
}

/// Trait for regulatory-filings providers
#[async_trait]
pub trait FilingsProvider: Send + Sync {
    async fn insider_filings(&self, symbol: &str) -> Result<Vec<InsiderFiling>, AnalysisError>;
    async fn institutional_holdings(&self, symbol: &str)
        -> Result<Vec<HoldingRecord>, AnalysisError>;
}

/// Trait for large-transaction feeds
#[async_trait]
pub trait LargeTransactionProvider: Send + Sync {
    async fn large_transactions(&self, min_usd: f64)
        -> Result<Vec<WhaleTransaction>, AnalysisError>;
}
