use analysis_core::{
    FilingsProvider, LargeTransactionProvider, MarketDataProvider, RawMarketData,
};

use crate::config::ProviderConfig;
use crate::sec::SecFilingsClient;
use crate::whale::WhaleAlertClient;
use crate::yahoo::YahooFinanceClient;

/// Transactions below this USD size are not considered whale activity
const MIN_WHALE_USD: f64 = 1_000_000.0;

/// Fans out to every provider and gathers one `RawMarketData` bundle.
///
/// A failed fetch degrades to its empty default; callers cannot tell
/// "provider returned nothing" from "provider was unavailable".
pub struct DataCollector {
    market: Box<dyn MarketDataProvider>,
    filings: Box<dyn FilingsProvider>,
    whales: Box<dyn LargeTransactionProvider>,
}

impl DataCollector {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            market: Box::new(YahooFinanceClient::new(config.clone())),
            filings: Box::new(SecFilingsClient::new(config.clone())),
            whales: Box::new(WhaleAlertClient::new(config)),
        }
    }

    /// Swap in alternative providers, e.g. once a real 13F or whale
    /// feed becomes available
    pub fn with_providers(
        market: Box<dyn MarketDataProvider>,
        filings: Box<dyn FilingsProvider>,
        whales: Box<dyn LargeTransactionProvider>,
    ) -> Self {
        Self {
            market,
            filings,
            whales,
        }
    }

    pub async fn collect_all(&self, symbol: &str) -> RawMarketData {
        let (bars, fundamentals, cashflow, insider_filings, holdings, whale_transactions) = tokio::join!(
            self.market.history(symbol),
            self.market.fundamentals(symbol),
            self.market.cashflow(symbol),
            self.filings.insider_filings(symbol),
            self.filings.institutional_holdings(symbol),
            self.whales.large_transactions(MIN_WHALE_USD),
        );

        RawMarketData {
            bars: bars.unwrap_or_else(|e| {
                tracing::warn!("price history unavailable for {symbol}: {e}");
                Vec::new()
            }),
            insider_filings: insider_filings.unwrap_or_else(|e| {
                tracing::warn!("insider filings unavailable for {symbol}: {e}");
                Vec::new()
            }),
            holdings: holdings.unwrap_or_else(|e| {
                tracing::warn!("institutional holdings unavailable for {symbol}: {e}");
                Vec::new()
            }),
            whale_transactions: whale_transactions.unwrap_or_else(|e| {
                tracing::warn!("whale transactions unavailable: {e}");
                Vec::new()
            }),
            fundamentals: fundamentals.unwrap_or_else(|e| {
                tracing::warn!("fundamentals unavailable for {symbol}: {e}");
                Default::default()
            }),
            cashflow: cashflow.unwrap_or_else(|e| {
                tracing::warn!("cash-flow statements unavailable for {symbol}: {e}");
                Vec::new()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{
        AnalysisError, Bar, CashflowRow, Fundamentals, HoldingRecord, InsiderFiling,
        WhaleTransaction,
    };
    use async_trait::async_trait;
    use chrono::Utc;

    struct StubMarket {
        fail: bool,
    }

    #[async_trait]
    impl MarketDataProvider for StubMarket {
        async fn history(&self, _symbol: &str) -> Result<Vec<Bar>, AnalysisError> {
            if self.fail {
                return Err(AnalysisError::ProviderError("down".to_string()));
            }
            Ok(vec![Bar {
                timestamp: Utc::now(),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.5,
                volume: 1000.0,
            }])
        }

        async fn fundamentals(&self, _symbol: &str) -> Result<Fundamentals, AnalysisError> {
            if self.fail {
                return Err(AnalysisError::ProviderError("down".to_string()));
            }
            Ok(Fundamentals {
                trailing_pe: Some(20.0),
                ..Default::default()
            })
        }

        async fn cashflow(&self, _symbol: &str) -> Result<Vec<CashflowRow>, AnalysisError> {
            if self.fail {
                return Err(AnalysisError::ProviderError("down".to_string()));
            }
            Ok(vec![CashflowRow {
                label: "Free Cash Flow".to_string(),
                values: vec![1.0e9],
            }])
        }
    }

    struct StubFilings;

    #[async_trait]
    impl FilingsProvider for StubFilings {
        async fn insider_filings(
            &self,
            _symbol: &str,
        ) -> Result<Vec<InsiderFiling>, AnalysisError> {
            Ok(vec![InsiderFiling {
                form: "4".to_string(),
                value: 250_000.0,
            }])
        }

        async fn institutional_holdings(
            &self,
            _symbol: &str,
        ) -> Result<Vec<HoldingRecord>, AnalysisError> {
            Ok(Vec::new())
        }
    }

    struct StubWhales;

    #[async_trait]
    impl LargeTransactionProvider for StubWhales {
        async fn large_transactions(
            &self,
            _min_usd: f64,
        ) -> Result<Vec<WhaleTransaction>, AnalysisError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_collect_all_assembles_bundle() {
        let collector = DataCollector::with_providers(
            Box::new(StubMarket { fail: false }),
            Box::new(StubFilings),
            Box::new(StubWhales),
        );
        let data = collector.collect_all("AAPL").await;

        assert_eq!(data.bars.len(), 1);
        assert_eq!(data.insider_filings.len(), 1);
        assert_eq!(data.fundamentals.trailing_pe, Some(20.0));
        assert_eq!(data.cashflow.len(), 1);
        assert!(data.holdings.is_empty());
        assert!(data.whale_transactions.is_empty());
    }

    #[tokio::test]
    async fn test_collect_all_degrades_on_failure() {
        let collector = DataCollector::with_providers(
            Box::new(StubMarket { fail: true }),
            Box::new(StubFilings),
            Box::new(StubWhales),
        );
        let data = collector.collect_all("AAPL").await;

        assert!(data.bars.is_empty());
        assert!(data.cashflow.is_empty());
        assert_eq!(data.fundamentals.trailing_pe, None);
        // healthy providers still contribute
        assert_eq!(data.insider_filings.len(), 1);
    }
}
