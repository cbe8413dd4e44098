//! Williams %R.
//!
//! %R = (highest_high - close) / (highest_high - lowest_low) * -100, ranging
//! -100..0. A window with zero range yields NaN. Warmup: first (n-1) values
//! are NaN.

use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_williams_r(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    let mut values = vec![f64::NAN; bars.len()];
    if period == 0 || bars.len() < period {
        return values;
    }

    for i in (period - 1)..bars.len() {
        let window = &bars[i + 1 - period..=i];
        let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        let range = highest - lowest;
        if range > 0.0 {
            values[i] = (highest - bars[i].close) / range * -100.0;
        }
    }
    values
}
