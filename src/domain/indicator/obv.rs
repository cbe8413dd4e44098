//! On-Balance Volume.
//!
//! OBV starts at the first bar's volume, then adds volume on up-closes and
//! subtracts it on down-closes. No warmup.
//!
//! Rows with a missing (NaN) volume are excluded from the computation only:
//! the output carries NaN at those positions and the running total chains
//! across them using the last included bar's close. The exclusion never
//! touches the rest of the table.

use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_obv(bars: &[OhlcvBar]) -> Vec<f64> {
    let mut values = vec![f64::NAN; bars.len()];
    let mut obv = 0.0;
    let mut prev_close: Option<f64> = None;

    for (i, bar) in bars.iter().enumerate() {
        if bar.volume.is_nan() {
            continue;
        }
        match prev_close {
            None => obv = bar.volume,
            Some(prev) => {
                if bar.close > prev {
                    obv += bar.volume;
                } else if bar.close < prev {
                    obv -= bar.volume;
                }
            }
        }
        prev_close = Some(bar.close);
        values[i] = obv;
    }
    values
}
