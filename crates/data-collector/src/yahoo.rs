use analysis_core::{AnalysisError, Bar, CashflowRow, Fundamentals, MarketDataProvider};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ProviderConfig;

const BASE_URL: &str = "https://query1.finance.yahoo.com";

const QUOTE_SUMMARY_MODULES: &str =
    "summaryDetail,defaultKeyStatistics,financialData,cashflowStatementHistory";

/// Yahoo Finance client: daily history via the chart endpoint,
/// fundamentals and cash-flow statements via quoteSummary.
pub struct YahooFinanceClient {
    client: Client,
    config: ProviderConfig,
}

impl YahooFinanceClient {
    pub fn new(config: ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AnalysisError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| AnalysisError::ProviderError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AnalysisError::ProviderError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AnalysisError::ProviderError(e.to_string()))
    }

    async fn quote_summary(&self, symbol: &str) -> Result<QuoteSummaryNode, AnalysisError> {
        let url = format!("{BASE_URL}/v10/finance/quoteSummary/{symbol}");
        let response: QuoteSummaryResponse = self
            .get_json(&url, &[("modules", QUOTE_SUMMARY_MODULES)])
            .await?;

        response
            .quote_summary
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .ok_or_else(|| {
                AnalysisError::ProviderError(format!("empty quoteSummary result for {symbol}"))
            })
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn history(&self, symbol: &str) -> Result<Vec<Bar>, AnalysisError> {
        let url = format!("{BASE_URL}/v8/finance/chart/{symbol}");
        let response: ChartResponse = self
            .get_json(
                &url,
                &[("range", self.config.history_range.as_str()), ("interval", "1d")],
            )
            .await?;

        let Some(data) = response
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        else {
            return Ok(Vec::new());
        };

        let timestamps = data.timestamp.unwrap_or_default();
        let Some(quote) = data.indicators.quote.into_iter().next() else {
            return Ok(Vec::new());
        };

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let fields = (
                quote.open.get(i).copied().flatten(),
                quote.high.get(i).copied().flatten(),
                quote.low.get(i).copied().flatten(),
                quote.close.get(i).copied().flatten(),
                quote.volume.get(i).copied().flatten(),
            );
            // skip half-populated rows (halted sessions, pre-listing padding)
            if let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = fields {
                if let Some(timestamp) = DateTime::from_timestamp(ts, 0) {
                    bars.push(Bar {
                        timestamp,
                        open,
                        high,
                        low,
                        close,
                        volume,
                    });
                }
            }
        }

        tracing::debug!("fetched {} bars for {symbol}", bars.len());
        Ok(bars)
    }

    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals, AnalysisError> {
        let node = self.quote_summary(symbol).await?;

        let summary = node.summary_detail.unwrap_or_default();
        let stats = node.default_key_statistics.unwrap_or_default();
        let financial = node.financial_data.unwrap_or_default();

        Ok(Fundamentals {
            trailing_pe: summary.trailing_pe.raw(),
            trailing_eps: stats.trailing_eps.raw(),
            price_to_book: stats.price_to_book.raw(),
            return_on_equity: financial.return_on_equity.raw(),
            book_value_per_share: stats.book_value.raw(),
            shares_outstanding: stats.shares_outstanding.raw(),
            target_mean_price: financial.target_mean_price.raw(),
        })
    }

    async fn cashflow(&self, symbol: &str) -> Result<Vec<CashflowRow>, AnalysisError> {
        let node = self.quote_summary(symbol).await?;

        let statements = node
            .cashflow_statement_history
            .unwrap_or_default()
            .cashflow_statements;

        // statements arrive newest-first; rows carry values oldest-first
        let mut operating = Vec::new();
        let mut capex = Vec::new();
        let mut free_cash_flow = Vec::new();
        for statement in statements.iter().rev() {
            let ocf = statement.total_cash_from_operating_activities.raw();
            let spend = statement.capital_expenditures.raw();
            if let Some(ocf) = ocf {
                operating.push(ocf);
            }
            if let Some(spend) = spend {
                capex.push(spend);
            }
            if let (Some(ocf), Some(spend)) = (ocf, spend) {
                free_cash_flow.push(ocf + spend);
            }
        }

        let mut rows = Vec::new();
        if !operating.is_empty() {
            rows.push(CashflowRow {
                label: "Total Cash From Operating Activities".to_string(),
                values: operating,
            });
        }
        if !capex.is_empty() {
            rows.push(CashflowRow {
                label: "Capital Expenditures".to_string(),
                values: capex,
            });
        }
        if !free_cash_flow.is_empty() {
            rows.push(CashflowRow {
                label: "Free Cash Flow".to_string(),
                values: free_cash_flow,
            });
        }
        Ok(rows)
    }
}

// ---- wire types ----

#[derive(Debug, Default, Clone, Copy, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

impl RawValue {
    fn raw(self) -> Option<f64> {
        self.raw
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartNode,
}

#[derive(Debug, Deserialize)]
struct ChartNode {
    result: Option<Vec<ChartData>>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryEnvelope,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    result: Option<Vec<QuoteSummaryNode>>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteSummaryNode {
    #[serde(rename = "summaryDetail")]
    summary_detail: Option<SummaryDetail>,
    #[serde(rename = "defaultKeyStatistics")]
    default_key_statistics: Option<DefaultKeyStatistics>,
    #[serde(rename = "financialData")]
    financial_data: Option<FinancialData>,
    #[serde(rename = "cashflowStatementHistory")]
    cashflow_statement_history: Option<CashflowStatementHistory>,
}

#[derive(Debug, Default, Deserialize)]
struct SummaryDetail {
    #[serde(rename = "trailingPE", default)]
    trailing_pe: RawValue,
}

#[derive(Debug, Default, Deserialize)]
struct DefaultKeyStatistics {
    #[serde(rename = "trailingEps", default)]
    trailing_eps: RawValue,
    #[serde(rename = "priceToBook", default)]
    price_to_book: RawValue,
    #[serde(rename = "bookValue", default)]
    book_value: RawValue,
    #[serde(rename = "sharesOutstanding", default)]
    shares_outstanding: RawValue,
}

#[derive(Debug, Default, Deserialize)]
struct FinancialData {
    #[serde(rename = "returnOnEquity", default)]
    return_on_equity: RawValue,
    #[serde(rename = "targetMeanPrice", default)]
    target_mean_price: RawValue,
}

#[derive(Debug, Default, Deserialize)]
struct CashflowStatementHistory {
    #[serde(rename = "cashflowStatements", default)]
    cashflow_statements: Vec<CashflowStatement>,
}

#[derive(Debug, Default, Deserialize)]
struct CashflowStatement {
    #[serde(rename = "totalCashFromOperatingActivities", default)]
    total_cash_from_operating_activities: RawValue,
    #[serde(rename = "capitalExpenditures", default)]
    capital_expenditures: RawValue,
}
