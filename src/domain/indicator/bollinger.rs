//! Bollinger Bands.
//!
//! - Middle: SMA over n closes
//! - Upper/Lower: middle ± multiplier × population standard deviation
//!   (divides by N, not N-1)
//!
//! Returns (lower, middle, upper). Warmup: first (n-1) values are NaN.

use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_bollinger(
    bars: &[OhlcvBar],
    period: usize,
    stddev_x100: u32,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let n = bars.len();
    let mut lower = vec![f64::NAN; n];
    let mut middle = vec![f64::NAN; n];
    let mut upper = vec![f64::NAN; n];
    if period == 0 || n < period {
        return (lower, middle, upper);
    }

    let mult = stddev_x100 as f64 / 100.0;
    for i in (period - 1)..n {
        let window = &bars[i + 1 - period..=i];
        let mean: f64 = window.iter().map(|b| b.close).sum::<f64>() / period as f64;
        let variance: f64 = window
            .iter()
            .map(|b| {
                let diff = b.close - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let stddev = variance.sqrt();

        lower[i] = mean - mult * stddev;
        middle[i] = mean;
        upper[i] = mean + mult * stddev;
    }
    (lower, middle, upper)
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
    fn bollinger_warmup() {
        let (lower, middle, upper) =
            calculate_bollinger(&make_bars(&[10.0, 20.0, 30.0, 40.0]), 3, 200);
        assert!(lower[1].is_nan());
        assert!(middle[1].is_nan());
        assert!(upper[1].is_nan());
        assert!(!middle[2].is_nan());
    }

    #[test]
    fn bollinger_constant_prices_collapse() {
        let (lower, middle, upper) = calculate_bollinger(&make_bars(&[100.0; 5]), 3, 200);
        assert_relative_eq!(lower[4], 100.0);
        assert_relative_eq!(middle[4], 100.0);
        assert_relative_eq!(upper[4], 100.0);
    }

    #[test]
    fn bollinger_population_stddev() {
        // Window 10, 20, 30: mean 20, population stddev sqrt(200/3).
        let (lower, middle, upper) = calculate_bollinger(&make_bars(&[10.0, 20.0, 30.0]), 3, 200);
        let stddev = (200.0f64 / 3.0).sqrt();
        assert_relative_eq!(middle[2], 20.0);
        assert_relative_eq!(upper[2], 20.0 + 2.0 * stddev);
        assert_relative_eq!(lower[2], 20.0 - 2.0 * stddev);
    }

    #[test]
    fn bollinger_bands_ordered() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 + (i % 4) as f64 * 3.0).collect();
        let (lower, middle, upper) = calculate_bollinger(&make_bars(&prices), 5, 200);
        for i in 4..10 {
            assert!(lower[i] <= middle[i]);
            assert!(middle[i] <= upper[i]);
        }
    }

    #[test]
    fn bollinger_fractional_multiplier() {
        let (lower, _, upper) = calculate_bollinger(&make_bars(&[10.0, 20.0, 30.0]), 3, 250);
        let stddev = (200.0f64 / 3.0).sqrt();
        assert_relative_eq!(upper[2], 20.0 + 2.5 * stddev);
        assert_relative_eq!(lower[2], 20.0 - 2.5 * stddev);
    }
}
