use analysis_core::{
    AnalysisResult, MarketCondition, RawMarketData, RiskSummary, VolatilityLevel,
};
use chrono::Utc;
use data_collector::{DataCollector, ProviderConfig};
use dimension_analysis::score_dimensions;
use risk_manager::{trailing_volatility, RiskManager};
use signal_engine::{dynamic_weight_adjustment, final_signal};
use valuation_engine::ValuationEngine;

/// Correlation haircut applied to every position until portfolio-level
/// correlation data is wired in
const CORRELATION_ADJUSTMENT: f64 = 0.1;

/// Sequences data collection, scoring, weighting, aggregation,
/// valuation and risk sizing into one result record.
pub struct SmartMoneyAnalyzer {
    collector: DataCollector,
    valuation_engine: ValuationEngine,
    risk_manager: RiskManager,
}

impl SmartMoneyAnalyzer {
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_collector(DataCollector::new(config))
    }

    pub fn with_collector(collector: DataCollector) -> Self {
        Self {
            collector,
            valuation_engine: ValuationEngine::new(),
            risk_manager: RiskManager::new(),
        }
    }

    /// Run the full pipeline for one symbol
    pub async fn comprehensive_analysis(
        &self,
        symbol: &str,
        market_condition: MarketCondition,
        volatility_level: VolatilityLevel,
    ) -> AnalysisResult {
        tracing::info!(
            "Starting comprehensive analysis for {symbol} ({market_condition} market, {volatility_level} volatility)"
        );

        let raw_data = self.collector.collect_all(symbol).await;
        self.analyze_collected(symbol, &raw_data, market_condition, volatility_level)
    }

    /// The pure pipeline over an already-collected bundle
    pub fn analyze_collected(
        &self,
        symbol: &str,
        raw_data: &RawMarketData,
        market_condition: MarketCondition,
        volatility_level: VolatilityLevel,
    ) -> AnalysisResult {
        let scores = score_dimensions(symbol, raw_data);
        let weights = dynamic_weight_adjustment(market_condition, volatility_level);
        let signal = final_signal(&scores, &weights);

        let valuation = self.valuation_engine.optimal_entry(raw_data);

        let volatility = trailing_volatility(&raw_data.bars);
        let position_risk = self.risk_manager.calculate_position_size(
            signal.recommendation.signal_strength(),
            signal.confidence,
            volatility,
            CORRELATION_ADJUSTMENT,
        );

        tracing::info!(
            "{symbol}: {} (weighted score {:.2}, confidence {:.2}, position risk {:.2}%)",
            signal.recommendation,
            signal.weighted_score,
            signal.confidence,
            position_risk * 100.0
        );

        AnalysisResult {
            symbol: symbol.to_string(),
            analysis_date: Utc::now(),
            scores,
            weights,
            weighted_score: round2(signal.weighted_score),
            confidence: round2(signal.confidence),
            recommendation: signal.recommendation,
            valuation,
            risk: RiskSummary {
                suggested_position_risk_percent: round2(position_risk * 100.0),
            },
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{Dimension, Recommendation};
    use data_collector::DataCollector;

    fn analyzer() -> SmartMoneyAnalyzer {
        SmartMoneyAnalyzer::with_collector(DataCollector::new(ProviderConfig::default()))
    }

    #[test]
    fn test_empty_providers_end_to_end() {
        let result = analyzer().analyze_collected(
            "TEST",
            &RawMarketData::default(),
            MarketCondition::Normal,
            VolatilityLevel::Medium,
        );

        assert_eq!(result.symbol, "TEST");
        assert_eq!(result.scores[&Dimension::InstitutionalHoldings], 0.0);
        assert_eq!(result.scores[&Dimension::InsiderActivity], 0.0);
        assert_eq!(result.scores[&Dimension::VolumeProfile], 50.0);
        assert_eq!(result.scores[&Dimension::TechnicalIndicators], 50.0);
        assert_eq!(result.scores[&Dimension::SectorFlow], 50.0);
        assert_eq!(result.scores[&Dimension::MacroEnvironment], 50.0);
        assert_eq!(result.scores[&Dimension::CryptoWhales], 60.0);

        assert!((result.weighted_score - -44.0).abs() < 1e-9);
        assert!((result.confidence - 17.14).abs() < 1e-9);
        assert_eq!(result.recommendation, Recommendation::Hold);

        assert_eq!(result.valuation.fair_value_estimate, 0.0);
        assert_eq!(result.valuation.optimal_entry_price, 0.0);
        assert_eq!(result.valuation.component_prices.dcf, 0.0);
        assert_eq!(
            result.valuation.recommendation,
            valuation_engine::RECOMMENDATION_OVERVALUED
        );

        // a hold signal carries zero strength, so no position risk
        assert_eq!(result.risk.suggested_position_risk_percent, 0.0);
    }

    #[test]
    fn test_weights_follow_regime_inputs() {
        let result = analyzer().analyze_collected(
            "TEST",
            &RawMarketData::default(),
            MarketCondition::Bear,
            VolatilityLevel::High,
        );

        let total: f64 = result.weights.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(
            result.weights[&Dimension::InstitutionalHoldings]
                > result.weights[&Dimension::VolumeProfile]
        );
    }

    #[test]
    fn test_result_rounding() {
        let result = analyzer().analyze_collected(
            "TEST",
            &RawMarketData::default(),
            MarketCondition::Normal,
            VolatilityLevel::Medium,
        );

        // weighted score and confidence are rounded to two decimals
        assert_eq!(result.confidence, 17.14);
        assert_eq!(result.weighted_score, -44.0);
    }
}
