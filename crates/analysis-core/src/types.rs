use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// OHLCV bar data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Insider ownership filing (SEC forms 3/4/5)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsiderFiling {
    pub form: String,
    pub value: f64,
}

/// Institutional holding entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingRecord {
    pub holder: String,
    pub value: f64,
}

/// Large on-chain transaction above a USD threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhaleTransaction {
    pub symbol: String,
    pub amount_usd: f64,
}

/// Company fundamentals snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fundamentals {
    pub trailing_pe: Option<f64>,
    pub trailing_eps: Option<f64>,
    pub price_to_book: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub book_value_per_share: Option<f64>,
    pub shares_outstanding: Option<f64>,
    pub target_mean_price: Option<f64>,
}

/// One cash-flow statement line item, values ordered oldest to newest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashflowRow {
    pub label: String,
    pub values: Vec<f64>,
}

/// Everything the providers returned for one symbol.
///
/// Every sequence may be empty when a provider was unavailable; the
/// scorers degrade to their documented defaults instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMarketData {
    pub bars: Vec<Bar>,
    pub insider_filings: Vec<InsiderFiling>,
    pub holdings: Vec<HoldingRecord>,
    pub whale_transactions: Vec<WhaleTransaction>,
    pub fundamentals: Fundamentals,
    pub cashflow: Vec<CashflowRow>,
}

/// The seven analytical dimensions, each scored 0-100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    InstitutionalHoldings,
    InsiderActivity,
    VolumeProfile,
    TechnicalIndicators,
    SectorFlow,
    MacroEnvironment,
    CryptoWhales,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::InstitutionalHoldings,
        Dimension::InsiderActivity,
        Dimension::VolumeProfile,
        Dimension::TechnicalIndicators,
        Dimension::SectorFlow,
        Dimension::MacroEnvironment,
        Dimension::CryptoWhales,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Dimension::InstitutionalHoldings => "institutional_holdings",
            Dimension::InsiderActivity => "insider_activity",
            Dimension::VolumeProfile => "volume_profile",
            Dimension::TechnicalIndicators => "technical_indicators",
            Dimension::SectorFlow => "sector_flow",
            Dimension::MacroEnvironment => "macro_environment",
            Dimension::CryptoWhales => "crypto_whales",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Dimension name -> score in [0, 100]. Every key is always present.
pub type ScoreSet = BTreeMap<Dimension, f64>;

/// Dimension name -> weight. Sums to 1.0 after renormalization.
pub type WeightSet = BTreeMap<Dimension, f64>;

/// Final recommendation label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    #[serde(rename = "Standard Buy")]
    StandardBuy,
    #[serde(rename = "Small Buy")]
    SmallBuy,
    #[serde(rename = "Hold/Watch")]
    Hold,
    #[serde(rename = "Standard Sell")]
    StandardSell,
    #[serde(rename = "Strong Sell")]
    StrongSell,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "Strong Buy",
            Recommendation::StandardBuy => "Standard Buy",
            Recommendation::SmallBuy => "Small Buy",
            Recommendation::Hold => "Hold/Watch",
            Recommendation::StandardSell => "Standard Sell",
            Recommendation::StrongSell => "Strong Sell",
        }
    }

    /// Numeric signal strength fed into position sizing
    pub fn signal_strength(&self) -> f64 {
        match self {
            Recommendation::StrongBuy | Recommendation::StrongSell => 80.0,
            Recommendation::StandardBuy | Recommendation::StandardSell => 60.0,
            Recommendation::SmallBuy => 45.0,
            Recommendation::Hold => 0.0,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregated signal: label + centered weighted score + confidence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalResult {
    pub recommendation: Recommendation,
    pub weighted_score: f64,
    pub confidence: f64,
}

/// Per-method valuation estimates; 0.0 marks an unavailable method
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentPrices {
    pub pe: f64,
    pub pb: f64,
    pub dcf: f64,
    pub support: f64,
    pub insider_avg: f64,
    pub analyst_target: f64,
}

/// Blended valuation output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationResult {
    pub current_price: f64,
    pub fair_value_estimate: f64,
    pub optimal_entry_price: f64,
    pub upside_potential_percent: f64,
    pub margin_of_safety_percent: f64,
    pub component_prices: ComponentPrices,
    pub recommendation: String,
}

/// Position-sizing output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSummary {
    pub suggested_position_risk_percent: f64,
}

/// Full output record for one analysis run.
///
/// Created fresh per call and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub symbol: String,
    pub analysis_date: DateTime<Utc>,
    pub scores: ScoreSet,
    pub weights: WeightSet,
    pub weighted_score: f64,
    pub confidence: f64,
    pub recommendation: Recommendation,
    pub valuation: ValuationResult,
    pub risk: RiskSummary,
}

/// Market regime input biasing the dimension weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketCondition {
    Bull,
    Bear,
    #[default]
    Normal,
}

impl FromStr for MarketCondition {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bull" => Ok(MarketCondition::Bull),
            "bear" => Ok(MarketCondition::Bear),
            "normal" => Ok(MarketCondition::Normal),
            other => Err(AnalysisError::InvalidData(format!(
                "unknown market condition: {other}"
            ))),
        }
    }
}

impl fmt::Display for MarketCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MarketCondition::Bull => "bull",
            MarketCondition::Bear => "bear",
            MarketCondition::Normal => "normal",
        };
        f.write_str(s)
    }
}

/// Volatility regime input biasing the dimension weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilityLevel {
    High,
    #[default]
    Medium,
    Low,
}

impl FromStr for VolatilityLevel {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(VolatilityLevel::High),
            "medium" => Ok(VolatilityLevel::Medium),
            "low" => Ok(VolatilityLevel::Low),
            other => Err(AnalysisError::InvalidData(format!(
                "unknown volatility level: {other}"
            ))),
        }
    }
}

impl fmt::Display for VolatilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VolatilityLevel::High => "high",
            VolatilityLevel::Medium => "medium",
            VolatilityLevel::Low => "low",
        };
        f.write_str(s)
    }
}
