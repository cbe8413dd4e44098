//! Commodity Channel Index.
//!
//! CCI = (TP - SMA(TP, n)) / (0.015 * mean_deviation), TP = typical price.
//! A window with zero mean deviation yields NaN (flat prices carry no
//! directional information). Warmup: first (n-1) values are NaN.

use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_cci(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    let mut values = vec![f64::NAN; bars.len()];
    if period == 0 || bars.len() < period {
        return values;
    }

    let tp: Vec<f64> = bars.iter().map(|b| b.typical_price()).collect();

    for i in (period - 1)..bars.len() {
        let window = &tp[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let mean_dev = window.iter().map(|v| (v - mean).abs()).sum::<f64>() / period as f64;
        if mean_dev > 0.0 {
            values[i] = (tp[i] - mean) / (0.015 * mean_dev);
        }
    }
    values
}
