use analysis_core::{Bar, CashflowRow, ComponentPrices, Fundamentals, RawMarketData, ValuationResult};
use dimension_analysis::indicators::{cumulative_vwap, mean, rolling_min};

/// Cash-flow statement labels recognized as a free-cash-flow series
const FCF_LABELS: [&str; 3] = ["Free Cash Flow", "FreeCashFlow", "FreeCashFlowUSD"];

/// Blend weights over the valuation methods. The margin-of-safety share
/// is a discount reserved against fair value, not a priced method.
const PE_WEIGHT: f64 = 0.20;
const PB_WEIGHT: f64 = 0.05;
const DCF_WEIGHT: f64 = 0.30;
const SUPPORT_WEIGHT: f64 = 0.10;
const INSIDER_AVG_WEIGHT: f64 = 0.05;
const ANALYST_TARGET_WEIGHT: f64 = 0.05;
const MARGIN_OF_SAFETY_WEIGHT: f64 = 0.25;

const REVENUE_GROWTH: f64 = 0.08;
const TERMINAL_GROWTH: f64 = 0.025;
const WACC: f64 = 0.09;

pub const RECOMMENDATION_ATTRACTIVE: &str = "Attractive valuation, consider buying";
pub const RECOMMENDATION_FAIR: &str = "Fairly valued to slightly low, wait for a pullback";
pub const RECOMMENDATION_OVERVALUED: &str = "Overvalued, wait patiently";

/// Multi-method fair-value estimator.
///
/// Every method degrades to 0.0 on missing data instead of erroring, so
/// the blend always produces a result.
pub struct ValuationEngine;

impl ValuationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Target price from a fair P/E multiple over trailing earnings.
    ///
    /// Historical and industry P/E medians are both approximated by the
    /// trailing P/E (fallback 20 when non-positive). Falls back to the
    /// last close when trailing EPS is non-positive.
    pub fn pe_valuation(&self, fundamentals: &Fundamentals, last_close: f64) -> f64 {
        let current_pe = fundamentals.trailing_pe.unwrap_or(0.0);
        let eps_ttm = fundamentals.trailing_eps.unwrap_or(0.0);

        let historical_pe_median = if current_pe > 0.0 { current_pe } else { 20.0 };
        let industry_pe_median = historical_pe_median;
        let fair_pe = historical_pe_median * 0.6 + industry_pe_median * 0.4;

        if eps_ttm > 0.0 {
            eps_ttm * fair_pe
        } else {
            last_close
        }
    }

    /// Target price from a fair P/B multiple over book value per share
    pub fn pb_valuation(&self, fundamentals: &Fundamentals) -> f64 {
        let roe = fundamentals.return_on_equity.unwrap_or(0.0);
        let fair_pb = if roe != 0.0 { (roe * 0.05).max(1.0) } else { 1.0 };

        let book_value_per_share = fundamentals.book_value_per_share.unwrap_or(0.0);
        if book_value_per_share > 0.0 {
            book_value_per_share * fair_pb
        } else {
            0.0
        }
    }

    /// Per-share intrinsic value from a five-year discounted-cash-flow
    /// projection with a decaying growth rate and a Gordon terminal value
    pub fn dcf_valuation(&self, cashflow: &[CashflowRow], shares_outstanding: f64) -> f64 {
        let Some(row) = cashflow
            .iter()
            .find(|row| FCF_LABELS.contains(&row.label.as_str()))
        else {
            return 0.0;
        };

        let tail_start = row.values.len().saturating_sub(5);
        let Some(&base_fcf) = row.values[tail_start..].last() else {
            return 0.0;
        };

        let mut projected = Vec::with_capacity(5);
        for year in 1..=5i32 {
            let growth_rate = REVENUE_GROWTH * 0.9f64.powi(year);
            projected.push(base_fcf * (1.0 + growth_rate).powi(year));
        }

        let mut enterprise_value: f64 = projected
            .iter()
            .enumerate()
            .map(|(i, fcf)| fcf / (1.0 + WACC).powi(i as i32 + 1))
            .sum();
        let terminal_value = projected[4] * (1.0 + TERMINAL_GROWTH) / (WACC - TERMINAL_GROWTH);
        enterprise_value += terminal_value / (1.0 + WACC).powi(5);

        if shares_outstanding <= 0.0 {
            return 0.0;
        }
        enterprise_value / shares_outstanding
    }

    /// Nearest meaningful support level below the current price.
    ///
    /// Candidates: 20-bar rolling-minimum lows, the trailing-60 minimum
    /// of the cumulative VWAP, and 95% of the 200-period (or 50-period)
    /// moving average. Picks the highest candidate inside (80%, 100%) of
    /// the current price, else 90% of it.
    pub fn technical_support(&self, bars: &[Bar]) -> f64 {
        if bars.is_empty() {
            return 0.0;
        }

        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let current_price = *closes.last().unwrap();

        let mut support_levels = Vec::new();
        let roll_min = rolling_min(&lows, 20);
        for i in 20..lows.len() {
            if lows[i] == roll_min[i + 1 - 20] {
                support_levels.push(lows[i]);
            }
        }

        let vwap = cumulative_vwap(bars);
        let vwap_support = if vwap.len() >= 60 {
            vwap[vwap.len() - 60..]
                .iter()
                .cloned()
                .fold(f64::INFINITY, f64::min)
        } else {
            *vwap.last().unwrap()
        };
        support_levels.push(vwap_support);

        let ma = if closes.len() >= 200 {
            Some(mean(&closes[closes.len() - 200..]))
        } else if closes.len() >= 50 {
            Some(mean(&closes[closes.len() - 50..]))
        } else {
            None
        };
        if let Some(ma) = ma {
            support_levels.push(ma * 0.95);
        }

        let best = support_levels
            .into_iter()
            .filter(|s| *s < current_price && *s > current_price * 0.8)
            .fold(f64::NEG_INFINITY, f64::max);

        if best.is_finite() {
            best
        } else {
            current_price * 0.9
        }
    }

    /// Average insider purchase price. Needs a premium data source that
    /// is not wired up, so this is always 0.
    pub fn insider_average_purchase_price(&self) -> f64 {
        0.0
    }

    /// Analyst mean target price, 0 when unavailable
    pub fn analyst_target(&self, fundamentals: &Fundamentals) -> f64 {
        fundamentals.target_mean_price.unwrap_or(0.0)
    }

    /// Entry guidance from where the current price sits against the
    /// entry and fair-value levels. A non-positive current price means
    /// no usable quote, which reads as "wait".
    pub fn value_recommendation(
        &self,
        current_price: f64,
        optimal_entry_price: f64,
        fair_value: f64,
    ) -> &'static str {
        if current_price <= 0.0 {
            return RECOMMENDATION_OVERVALUED;
        }
        if current_price <= optimal_entry_price {
            RECOMMENDATION_ATTRACTIVE
        } else if current_price < fair_value {
            RECOMMENDATION_FAIR
        } else {
            RECOMMENDATION_OVERVALUED
        }
    }

    /// Blend the component estimates into a fair value and a
    /// margin-of-safety-discounted optimal entry price.
    pub fn optimal_entry(&self, data: &RawMarketData) -> ValuationResult {
        let last_close = data.bars.last().map(|b| b.close).unwrap_or(0.0);
        let current_price = last_close;

        let shares_outstanding = data.fundamentals.shares_outstanding.unwrap_or(0.0);
        let component_prices = ComponentPrices {
            pe: self.pe_valuation(&data.fundamentals, last_close),
            pb: self.pb_valuation(&data.fundamentals),
            dcf: self.dcf_valuation(&data.cashflow, shares_outstanding),
            support: self.technical_support(&data.bars),
            insider_avg: self.insider_average_purchase_price(),
            analyst_target: self.analyst_target(&data.fundamentals),
        };

        let numerator = component_prices.pe * PE_WEIGHT
            + component_prices.pb * PB_WEIGHT
            + component_prices.dcf * DCF_WEIGHT
            + component_prices.support * SUPPORT_WEIGHT
            + component_prices.insider_avg * INSIDER_AVG_WEIGHT
            + component_prices.analyst_target * ANALYST_TARGET_WEIGHT;
        let denominator = (1.0 - MARGIN_OF_SAFETY_WEIGHT).max(1e-9);

        let fair_value_estimate = numerator / denominator;
        let optimal_entry_price = fair_value_estimate * (1.0 - MARGIN_OF_SAFETY_WEIGHT);

        let upside_potential_percent = if current_price != 0.0 {
            ((fair_value_estimate / current_price.max(1e-9)) - 1.0) * 100.0
        } else {
            0.0
        };
        let margin_of_safety_percent = if fair_value_estimate != 0.0 {
            (1.0 - current_price / fair_value_estimate.max(1e-9)) * 100.0
        } else {
            0.0
        };

        let recommendation = self
            .value_recommendation(current_price, optimal_entry_price, fair_value_estimate)
            .to_string();

        ValuationResult {
            current_price,
            fair_value_estimate,
            optimal_entry_price,
            upside_potential_percent,
            margin_of_safety_percent,
            component_prices,
            recommendation,
        }
    }
}

impl Default for ValuationEngine {
    fn default() -> Self {
        Self::new()
    }
}
