//! Average True Range with Wilder's smoothing.
//!
//! TR[0] = high - low (no previous close); seed ATR with the simple mean of
//! the first n true ranges, then ATR = (prev * (n-1) + TR) / n.
//! Warmup: first (n-1) values are NaN.

use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_atr(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    let mut values = vec![f64::NAN; bars.len()];
    if period == 0 || bars.len() < period {
        return values;
    }

    let mut tr_values: Vec<f64> = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let tr = if i == 0 {
            bar.high - bar.low
        } else {
            bar.true_range(bars[i - 1].close)
        };
        tr_values.push(tr);
    }

    let mut atr = tr_values[..period].iter().sum::<f64>() / period as f64;
    values[period - 1] = atr;
    for i in period..bars.len() {
        atr = (atr * (period - 1) as f64 + tr_values[i]) / period as f64;
        values[i] = atr;
    }
    values
}
