//! Chaikin Money Flow.
//!
//! MFM = ((close - low) - (high - close)) / (high - low), 0 when high == low.
//! CMF = sum(MFM * volume, n) / sum(volume, n); a window with zero total
//! volume yields NaN. Warmup: first (n-1) values are NaN.

use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_cmf(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    let mut values = vec![f64::NAN; bars.len()];
    if period == 0 || bars.len() < period {
        return values;
    }

    let mfv: Vec<f64> = bars
        .iter()
        .map(|b| {
            let range = b.high - b.low;
            if range > 0.0 {
                ((b.close - b.low) - (b.high - b.close)) / range * b.volume
            } else {
                0.0
            }
        })
        .collect();

    for i in (period - 1)..bars.len() {
        let start = i + 1 - period;
        let volume_sum: f64 = bars[start..=i].iter().map(|b| b.volume).sum();
        if volume_sum > 0.0 {
            values[i] = mfv[start..=i].iter().sum::<f64>() / volume_sum;
        }
    }
    values
}
