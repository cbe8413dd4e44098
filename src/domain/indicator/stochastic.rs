//! Stochastic Oscillator.
//!
//! %K = 100 * (close - lowest_low(k)) / (highest_high(k) - lowest_low(k));
//! %D = SMA(d) of %K. A window with zero range yields NaN for that bar.
//! Warmup: %K NaN for (k-1) values, %D for (k-1 + d-1).
//!
//! Returns (%K, %D).

use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_stochastic(
    bars: &[OhlcvBar],
    k_period: usize,
    d_period: usize,
) -> (Vec<f64>, Vec<f64>) {
    let n = bars.len();
    let mut k = vec![f64::NAN; n];
    let mut d = vec![f64::NAN; n];
    if k_period == 0 || d_period == 0 || n < k_period {
        return (k, d);
    }

    for i in (k_period - 1)..n {
        let window = &bars[i + 1 - k_period..=i];
        let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        let range = highest - lowest;
        if range > 0.0 {
            k[i] = 100.0 * (bars[i].close - lowest) / range;
        }
    }

    for i in (k_period + d_period - 2)..n {
        let window = &k[i + 1 - d_period..=i];
        if window.iter().all(|v| !v.is_nan()) {
            d[i] = window.iter().sum::<f64>() / d_period as f64;
        }
    }
    (k, d)
}
