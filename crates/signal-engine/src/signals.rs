use analysis_core::{Recommendation, ScoreSet, SignalResult, WeightSet};

/// Fraction of dimensions agreeing on one direction, scaled to 0-100.
///
/// Scores at or above 55 read positive, at or below 45 negative, the
/// rest neutral. An empty score set is neutral 50.
pub fn signal_consistency(scores: &ScoreSet) -> f64 {
    if scores.is_empty() {
        return 50.0;
    }

    let positives = scores.values().filter(|v| **v >= 55.0).count() as f64;
    let negatives = scores.values().filter(|v| **v <= 45.0).count() as f64;
    let consistency = (positives - negatives).abs() / scores.len() as f64;
    (consistency * 100.0).clamp(0.0, 100.0)
}

/// Ordered recommendation ladder. The first matching rule wins; the
/// ranges deliberately overlap, so the order is load-bearing.
pub fn recommendation_for(weighted_score: f64, confidence: f64) -> Recommendation {
    if weighted_score >= 60.0 && confidence >= 80.0 {
        Recommendation::StrongBuy
    } else if weighted_score >= 40.0 && confidence >= 70.0 {
        Recommendation::StandardBuy
    } else if weighted_score >= 20.0 && confidence >= 60.0 {
        Recommendation::SmallBuy
    } else if weighted_score <= -60.0 && confidence >= 80.0 {
        Recommendation::StrongSell
    } else if weighted_score <= -40.0 && confidence >= 70.0 {
        Recommendation::StandardSell
    } else {
        Recommendation::Hold
    }
}

/// Combine dimension scores and weights into the final signal.
///
/// Each score is centered around zero via `(score - 50) * 2` before
/// weighting, so 0 maps to -100, 50 to 0 and 100 to +100.
pub fn final_signal(scores: &ScoreSet, weights: &WeightSet) -> SignalResult {
    let weighted_score: f64 = scores
        .iter()
        .map(|(dim, score)| (score - 50.0) * 2.0 * weights.get(dim).copied().unwrap_or(0.0))
        .sum();

    let consistency = signal_consistency(scores);
    let confidence = (consistency * 1.2).min(100.0);

    SignalResult {
        recommendation: recommendation_for(weighted_score, confidence),
        weighted_score,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::base_weights;
    use analysis_core::Dimension;

    fn scores_from(values: &[(Dimension, f64)]) -> ScoreSet {
        values.iter().cloned().collect()
    }

    #[test]
    fn test_consistency_empty_is_neutral() {
        assert_eq!(signal_consistency(&ScoreSet::new()), 50.0);
    }

    #[test]
    fn test_consistency_two_positive_one_negative() {
        let scores = scores_from(&[
            (Dimension::InstitutionalHoldings, 60.0),
            (Dimension::InsiderActivity, 60.0),
            (Dimension::VolumeProfile, 40.0),
        ]);
        assert!((signal_consistency(&scores) - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_consistency_all_neutral_is_zero() {
        let scores = scores_from(&[
            (Dimension::SectorFlow, 50.0),
            (Dimension::MacroEnvironment, 50.0),
        ]);
        assert_eq!(signal_consistency(&scores), 0.0);
    }

    #[test]
    fn test_consistency_unanimous_is_full() {
        let scores: ScoreSet = Dimension::ALL.iter().map(|d| (*d, 80.0)).collect();
        assert_eq!(signal_consistency(&scores), 100.0);
    }

    #[test]
    fn test_ladder_rungs() {
        assert_eq!(recommendation_for(65.0, 85.0), Recommendation::StrongBuy);
        assert_eq!(recommendation_for(45.0, 75.0), Recommendation::StandardBuy);
        assert_eq!(recommendation_for(25.0, 65.0), Recommendation::SmallBuy);
        assert_eq!(recommendation_for(0.0, 100.0), Recommendation::Hold);
        assert_eq!(recommendation_for(-70.0, 90.0), Recommendation::StrongSell);
        assert_eq!(recommendation_for(-45.0, 75.0), Recommendation::StandardSell);
    }

    #[test]
    fn test_ladder_order_breaks_ties() {
        // high score but mid confidence falls through to the next rung
        assert_eq!(recommendation_for(65.0, 75.0), Recommendation::StandardBuy);
        assert_eq!(recommendation_for(65.0, 65.0), Recommendation::SmallBuy);
        // a score matching several rungs takes the first
        assert_eq!(recommendation_for(70.0, 100.0), Recommendation::StrongBuy);
        assert_eq!(recommendation_for(-65.0, 75.0), Recommendation::StandardSell);
    }

    #[test]
    fn test_ladder_low_confidence_holds() {
        assert_eq!(recommendation_for(90.0, 50.0), Recommendation::Hold);
        assert_eq!(recommendation_for(-90.0, 50.0), Recommendation::Hold);
    }

    #[test]
    fn test_final_signal_empty_providers_profile() {
        // the score profile produced when every provider returns empty
        let scores = scores_from(&[
            (Dimension::InstitutionalHoldings, 0.0),
            (Dimension::InsiderActivity, 0.0),
            (Dimension::VolumeProfile, 50.0),
            (Dimension::TechnicalIndicators, 50.0),
            (Dimension::SectorFlow, 50.0),
            (Dimension::MacroEnvironment, 50.0),
            (Dimension::CryptoWhales, 60.0),
        ]);
        let result = final_signal(&scores, &base_weights());

        assert!((result.weighted_score - -44.0).abs() < 1e-9);
        assert!((result.confidence - 100.0 / 7.0 * 1.2).abs() < 1e-9);
        assert_eq!(result.recommendation, Recommendation::Hold);
    }

    #[test]
    fn test_final_signal_unanimous_bullish() {
        let scores: ScoreSet = Dimension::ALL.iter().map(|d| (*d, 90.0)).collect();
        let result = final_signal(&scores, &base_weights());

        assert!((result.weighted_score - 80.0).abs() < 1e-9);
        assert_eq!(result.confidence, 100.0);
        assert_eq!(result.recommendation, Recommendation::StrongBuy);
    }

    #[test]
    fn test_final_signal_empty_scores() {
        let result = final_signal(&ScoreSet::new(), &base_weights());

        assert_eq!(result.weighted_score, 0.0);
        assert_eq!(result.confidence, 60.0);
        assert_eq!(result.recommendation, Recommendation::Hold);
    }
}
