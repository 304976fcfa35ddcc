use analysis_core::Bar;

/// Simple Moving Average
///
/// Result is aligned so that `result[0]` covers `data[0..period]`.
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let mut result = Vec::with_capacity(data.len() - period + 1);
    for i in period - 1..data.len() {
        let sum: f64 = data[i + 1 - period..=i].iter().sum();
        result.push(sum / period as f64);
    }
    result
}

/// Recursive Exponential Moving Average seeded at the first sample,
/// with smoothing factor `2 / (span + 1)`.
pub fn ewma(data: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || data.is_empty() {
        return vec![];
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(data.len());
    result.push(data[0]);

    for i in 1..data.len() {
        let prev = result[i - 1];
        result.push(prev + alpha * (data[i] - prev));
    }
    result
}

/// Rolling minimum, aligned like `sma`
pub fn rolling_min(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let mut result = Vec::with_capacity(data.len() - period + 1);
    for i in period - 1..data.len() {
        let min = data[i + 1 - period..=i]
            .iter()
            .cloned()
            .fold(f64::INFINITY, f64::min);
        result.push(min);
    }
    result
}

/// Arithmetic mean; 0.0 for an empty slice
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample standard deviation (n - 1 denominator); 0.0 below two samples
pub fn sample_std(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    let var = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
    var.sqrt()
}

/// Last RSI value from rolling simple means of gains and losses.
///
/// With fewer price changes than `period`, the available changes are
/// averaged. Fewer than two closes yields the neutral 50.
pub fn rsi_last(closes: &[f64], period: usize) -> f64 {
    if closes.len() < 2 || period == 0 {
        return 50.0;
    }

    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);
    for w in closes.windows(2) {
        let change = w[1] - w[0];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(change.abs());
        }
    }

    let window = period.min(gains.len());
    let avg_gain = mean(&gains[gains.len() - window..]);
    let avg_loss = mean(&losses[losses.len() - window..]);

    let rs = avg_gain / avg_loss.max(1e-9);
    100.0 - (100.0 / (1.0 + rs))
}

/// Cumulative volume-weighted average price per bar
pub fn cumulative_vwap(bars: &[Bar]) -> Vec<f64> {
    let mut result = Vec::with_capacity(bars.len());
    let mut cum_pv = 0.0;
    let mut cum_vol = 0.0;

    for bar in bars {
        let typical = (bar.high + bar.low + bar.close) / 3.0;
        cum_pv += bar.volume * typical;
        cum_vol += bar.volume;
        result.push(if cum_vol > 0.0 { cum_pv / cum_vol } else { 0.0 });
    }
    result
}
