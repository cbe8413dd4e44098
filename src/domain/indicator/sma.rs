//! Simple Moving Average over close prices.
//!
//! Warmup: first (period-1) values are NaN.

use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    let mut values = vec![f64::NAN; bars.len()];
    if period == 0 || bars.len() < period {
        return values;
    }

    let mut sum: f64 = bars[..period - 1].iter().map(|b| b.close).sum();
    for i in (period - 1)..bars.len() {
        sum += bars[i].close;
        values[i] = sum / period as f64;
        sum -= bars[i + 1 - period].close;
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn sma_warmup() {
        let values = calculate_sma(&make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]), 3);
        assert!(values[0].is_nan());
        assert!(values[1].is_nan());
        assert!(!values[2].is_nan());
    }

    #[test]
    fn sma_rolling_mean() {
        let values = calculate_sma(&make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]), 3);
        assert_relative_eq!(values[2], 20.0);
        assert_relative_eq!(values[3], 30.0);
        assert_relative_eq!(values[4], 40.0);
    }

    #[test]
    fn sma_period_1_is_close() {
        let values = calculate_sma(&make_bars(&[10.0, 20.0, 30.0]), 1);
        assert_relative_eq!(values[0], 10.0);
        assert_relative_eq!(values[2], 30.0);
    }

    #[test]
    fn sma_short_input_all_nan() {
        let values = calculate_sma(&make_bars(&[10.0, 20.0]), 5);
        assert_eq!(values.len(), 2);
        assert!(values.iter().all(|v| v.is_nan()));
    }
}
