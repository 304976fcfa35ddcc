use analysis_core::{
    Bar, Dimension, HoldingRecord, InsiderFiling, RawMarketData, ScoreSet, WhaleTransaction,
};

use crate::indicators::{ewma, mean, rsi_last, sample_std, sma};

/// Normalize a raw value into a 0-100 score over `[min_val, max_val]`.
///
/// Non-finite values and degenerate ranges score 0.
pub fn safe_score(value: f64, min_val: f64, max_val: f64) -> f64 {
    if !value.is_finite() || max_val == min_val {
        return 0.0;
    }
    let scaled = (value - min_val) / (max_val - min_val);
    (scaled * 100.0).clamp(0.0, 100.0)
}

/// Institutional-holdings score: more reported entries scores higher,
/// saturating at 50 records.
pub fn holdings_score(holdings: &[HoldingRecord]) -> f64 {
    safe_score(holdings.len() as f64, 0.0, 50.0)
}

/// Insider-activity score: total form-4 filing value normalized
/// against a $1M range. Other form types contribute nothing.
pub fn insider_activity_score(filings: &[InsiderFiling]) -> f64 {
    let total_value: f64 = filings
        .iter()
        .filter(|f| f.form == "4")
        .map(|f| f.value)
        .sum();
    safe_score(total_value, 0.0, 1_000_000.0)
}

/// Volume-profile score: blends volume consistency over the trailing 60
/// bars with spike density (volume above 2.5x its 20-bar mean) over the
/// trailing 30. Neutral 50 without bars.
pub fn volume_profile_score(bars: &[Bar]) -> f64 {
    if bars.is_empty() {
        return 50.0;
    }

    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    let ma20 = sma(&volumes, 20);

    let mut spikes = 0usize;
    for i in volumes.len().saturating_sub(30)..volumes.len() {
        if i + 1 >= 20 {
            let ma = ma20[i + 1 - 20];
            if volumes[i] > ma * 2.5 {
                spikes += 1;
            }
        }
    }

    let tail = &volumes[volumes.len().saturating_sub(60)..];
    let vol_mean = mean(tail).max(1.0);
    let vol_std = sample_std(tail);

    let consistency = 1.0 - (vol_std / vol_mean).min(1.0);
    let spike_score = (spikes as f64 / 10.0).min(1.0);
    let composite = (consistency * 0.3 + spike_score * 0.4 + 0.3) * 100.0;
    composite.clamp(0.0, 100.0)
}

/// Technical-indicator score: 0.3 RSI + 0.3 MACD + 0.4 moving-average
/// trend. Neutral 50 without bars.
pub fn technical_indicator_score(bars: &[Bar]) -> f64 {
    if bars.is_empty() {
        return 50.0;
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let last_close = *closes.last().unwrap();

    // RSI band score, favoring 40-70 centered at 55
    let rsi = rsi_last(&closes, 14);
    let rsi_score = (100.0 - (rsi - 55.0).abs() * 2.0).clamp(0.0, 100.0);

    // MACD (12/26) vs its 9-period signal, squashed through tanh
    let ema12 = ewma(&closes, 12);
    let ema26 = ewma(&closes, 26);
    let macd: Vec<f64> = ema12.iter().zip(&ema26).map(|(f, s)| f - s).collect();
    let signal = ewma(&macd, 9);
    let diff = macd.last().unwrap() - signal.last().unwrap();
    let macd_score =
        (50.0 + (diff / (last_close * 0.01).max(1e-9)).tanh() * 50.0).clamp(0.0, 100.0);

    // Trend from the 20/50/200 moving-average ordering
    let trailing_ma = |period: usize| -> Option<f64> {
        if closes.len() >= period {
            Some(mean(&closes[closes.len() - period..]))
        } else {
            None
        }
    };
    let ma_score = match (trailing_ma(20), trailing_ma(50), trailing_ma(200)) {
        (Some(ma20), Some(ma50), Some(ma200)) if ma20 > ma50 && ma50 > ma200 => 80.0,
        (Some(ma20), Some(ma50), Some(ma200)) if ma20 < ma50 && ma50 < ma200 => 20.0,
        _ => 50.0,
    };

    (rsi_score * 0.3 + macd_score * 0.3 + ma_score * 0.4).clamp(0.0, 100.0)
}

/// Sector-flow score: neutral baseline until an ETF-flow feed is wired up
pub fn sector_flow_score(_symbol: &str) -> f64 {
    50.0
}

/// Macro-environment score: neutral baseline until a macro feed is wired up
pub fn macro_environment_score() -> f64 {
    50.0
}

/// Crypto-whale score: neutral 50 nudged by large-transaction count,
/// bounded to +/-10. Extreme activity reads as risk.
pub fn crypto_whale_score(transactions: &[WhaleTransaction]) -> f64 {
    let count = transactions.len() as f64;
    let adj = ((10.0 - count) * 2.0).clamp(-10.0, 10.0);
    (50.0 + adj).clamp(0.0, 100.0)
}

/// Score every dimension from one collected bundle. The returned set
/// always carries all seven keys.
pub fn score_dimensions(symbol: &str, data: &RawMarketData) -> ScoreSet {
    let mut scores = ScoreSet::new();
    scores.insert(
        Dimension::InstitutionalHoldings,
        holdings_score(&data.holdings),
    );
    scores.insert(
        Dimension::InsiderActivity,
        insider_activity_score(&data.insider_filings),
    );
    scores.insert(Dimension::VolumeProfile, volume_profile_score(&data.bars));
    scores.insert(
        Dimension::TechnicalIndicators,
        technical_indicator_score(&data.bars),
    );
    scores.insert(Dimension::SectorFlow, sector_flow_score(symbol));
    scores.insert(Dimension::MacroEnvironment, macro_environment_score());
    scores.insert(
        Dimension::CryptoWhales,
        crypto_whale_score(&data.whale_transactions),
    );
    scores
}
