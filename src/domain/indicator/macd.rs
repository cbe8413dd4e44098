//! Moving Average Convergence Divergence.
//!
//! MACD line = EMA(fast) - EMA(slow); signal = EMA(signal) of the MACD line,
//! seeded once the line has values; histogram = line - signal.
//! Warmup: line NaN for (slow-1) values, signal/histogram for
//! (slow-1 + signal-1).
//!
//! Returns (line, signal, histogram).

use crate::domain::indicator::ema::ema_series;
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_macd(
    bars: &[OhlcvBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let n = bars.len();
    let mut line = vec![f64::NAN; n];
    let mut signal = vec![f64::NAN; n];
    let mut histogram = vec![f64::NAN; n];
    if fast == 0 || slow == 0 || signal_period == 0 || n < slow {
        return (line, signal, histogram);
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema_series(&closes, fast);
    let ema_slow = ema_series(&closes, slow);
    for i in 0..n {
        line[i] = ema_fast[i] - ema_slow[i];
    }

    // The signal line is an EMA over the populated tail of the MACD line.
    let start = slow - 1;
    let tail_signal = ema_series(&line[start..], signal_period);
    for (offset, v) in tail_signal.into_iter().enumerate() {
        signal[start + offset] = v;
        histogram[start + offset] = line[start + offset] - v;
    }
    (line, signal, histogram)
}
