use analysis_core::{Dimension, MarketCondition, VolatilityLevel, WeightSet};

/// Base weight distribution over the seven dimensions. Sums to 1.0.
pub fn base_weights() -> WeightSet {
    let mut weights = WeightSet::new();
    weights.insert(Dimension::InstitutionalHoldings, 0.25);
    weights.insert(Dimension::InsiderActivity, 0.20);
    weights.insert(Dimension::VolumeProfile, 0.20);
    weights.insert(Dimension::TechnicalIndicators, 0.15);
    weights.insert(Dimension::SectorFlow, 0.10);
    weights.insert(Dimension::MacroEnvironment, 0.05);
    weights.insert(Dimension::CryptoWhales, 0.05);
    weights
}

/// Bias the base weights by market and volatility regime, then
/// renormalize to a unit sum.
///
/// Deltas are additive and deliberately not clamped at zero before
/// renormalization.
pub fn dynamic_weight_adjustment(
    market_condition: MarketCondition,
    volatility_level: VolatilityLevel,
) -> WeightSet {
    let mut weights = base_weights();

    let mut bump = |dim: Dimension, delta: f64| {
        if let Some(w) = weights.get_mut(&dim) {
            *w += delta;
        }
    };

    match market_condition {
        MarketCondition::Bull => {
            bump(Dimension::VolumeProfile, 0.05);
            bump(Dimension::TechnicalIndicators, 0.05);
            bump(Dimension::InstitutionalHoldings, -0.10);
        }
        MarketCondition::Bear => {
            bump(Dimension::InstitutionalHoldings, 0.10);
            bump(Dimension::InsiderActivity, 0.05);
            bump(Dimension::VolumeProfile, -0.10);
            bump(Dimension::TechnicalIndicators, -0.05);
        }
        MarketCondition::Normal => {}
    }

    if volatility_level == VolatilityLevel::High {
        bump(Dimension::TechnicalIndicators, -0.05);
        bump(Dimension::MacroEnvironment, 0.05);
    }

    let total: f64 = weights.values().sum();
    if total != 1.0 {
        for w in weights.values_mut() {
            *w /= total;
        }
    }

    weights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_weights_sum_to_one() {
        let total: f64 = base_weights().values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_regimes_sum_to_one() {
        let markets = [
            MarketCondition::Bull,
            MarketCondition::Bear,
            MarketCondition::Normal,
        ];
        let vols = [
            VolatilityLevel::High,
            VolatilityLevel::Medium,
            VolatilityLevel::Low,
        ];

        for market in markets {
            for vol in vols {
                let weights = dynamic_weight_adjustment(market, vol);
                let total: f64 = weights.values().sum();
                assert!(
                    (total - 1.0).abs() < 1e-9,
                    "weights for ({market}, {vol}) sum to {total}"
                );
                assert_eq!(weights.len(), Dimension::ALL.len());
            }
        }
    }

    #[test]
    fn test_normal_medium_matches_base() {
        let weights =
            dynamic_weight_adjustment(MarketCondition::Normal, VolatilityLevel::Medium);
        for (dim, base) in base_weights() {
            assert!((weights[&dim] - base).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bull_market_tilts_toward_momentum() {
        let weights = dynamic_weight_adjustment(MarketCondition::Bull, VolatilityLevel::Medium);

        assert!((weights[&Dimension::VolumeProfile] - 0.25).abs() < 1e-9);
        assert!((weights[&Dimension::TechnicalIndicators] - 0.20).abs() < 1e-9);
        assert!((weights[&Dimension::InstitutionalHoldings] - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_bear_market_tilts_toward_holdings() {
        let weights = dynamic_weight_adjustment(MarketCondition::Bear, VolatilityLevel::Medium);

        assert!((weights[&Dimension::InstitutionalHoldings] - 0.35).abs() < 1e-9);
        assert!((weights[&Dimension::InsiderActivity] - 0.25).abs() < 1e-9);
        assert!((weights[&Dimension::VolumeProfile] - 0.10).abs() < 1e-9);
        assert!((weights[&Dimension::TechnicalIndicators] - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_high_volatility_shifts_technical_to_macro() {
        let weights = dynamic_weight_adjustment(MarketCondition::Normal, VolatilityLevel::High);

        assert!((weights[&Dimension::TechnicalIndicators] - 0.10).abs() < 1e-9);
        assert!((weights[&Dimension::MacroEnvironment] - 0.10).abs() < 1e-9);
    }
}
