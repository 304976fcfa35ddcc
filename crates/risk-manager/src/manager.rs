use analysis_core::Bar;

/// Fallback daily volatility when the price history is too short
const DEFAULT_VOLATILITY: f64 = 0.02;

/// Risk limits and the position-sizing / stop-loss formulas built on them
#[derive(Debug, Clone)]
pub struct RiskManager {
    /// Maximum capital fraction risked on a single position
    pub max_single_position_risk: f64,
    pub max_portfolio_risk: f64,
    pub max_sector_concentration: f64,
    pub max_correlation_exposure: f64,
}

impl Default for RiskManager {
    fn default() -> Self {
        Self {
            max_single_position_risk: 0.02,
            max_portfolio_risk: 0.10,
            max_sector_concentration: 0.25,
            max_correlation_exposure: 0.15,
        }
    }
}

impl RiskManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Risk fraction for one position.
    ///
    /// Scales the base risk by signal strength (capped at 1.2x),
    /// confidence, a volatility haircut floored at 0.5, and a
    /// correlation discount. The result never exceeds 1.5x base risk.
    pub fn calculate_position_size(
        &self,
        signal_strength: f64,
        confidence: f64,
        volatility: f64,
        correlation_adj: f64,
    ) -> f64 {
        let base_risk = self.max_single_position_risk;

        let strength_multiplier = (signal_strength / 80.0).min(1.2);
        let confidence_multiplier = confidence / 100.0;
        let volatility_adjustment = (1.0 - (volatility - 0.2).max(0.0) * 2.0).max(0.5);
        let correlation_multiplier = 1.0 - correlation_adj;

        let adjusted_risk = base_risk
            * strength_multiplier
            * confidence_multiplier
            * volatility_adjustment
            * correlation_multiplier;

        adjusted_risk.min(base_risk * 1.5)
    }

    /// Stop level for an open position: the loosest of a fixed 8%
    /// drawdown, a volatility-scaled drawdown, 98% of technical support,
    /// and a floor that tightens by up to 2% as the holding ages.
    pub fn dynamic_stop_loss(
        &self,
        entry_price: f64,
        volatility: f64,
        support_level: f64,
        time_held_days: u32,
    ) -> f64 {
        let base_stop = entry_price * 0.92;
        let volatility_stop = entry_price * (1.0 - volatility * 2.0);
        let technical_stop = support_level * 0.98;

        let time_decay = (time_held_days as f64 / 30.0 * 0.005).min(0.02);
        let time_adjusted_stop = entry_price * (0.92 + time_decay);

        base_stop
            .max(volatility_stop)
            .max(technical_stop)
            .max(time_adjusted_stop)
    }
}

/// Trailing volatility proxy: sample standard deviation of the last 20
/// daily returns. Too little history yields the 2% default.
pub fn trailing_volatility(bars: &[Bar]) -> f64 {
    let returns: Vec<f64> = bars
        .windows(2)
        .filter(|w| w[0].close != 0.0)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .collect();

    if returns.len() < 20 {
        return DEFAULT_VOLATILITY;
    }

    let tail = &returns[returns.len() - 20..];
    let mean = tail.iter().sum::<f64>() / tail.len() as f64;
    let var = tail.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (tail.len() - 1) as f64;
    let std = var.sqrt();

    if std == 0.0 {
        DEFAULT_VOLATILITY
    } else {
        std
    }
}
