//! Donchian Channels: lowest low and highest high over a lookback window.
//!
//! Returns (lower, upper). Warmup: first (n-1) values are NaN.

use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_donchian(bars: &[OhlcvBar], period: usize) -> (Vec<f64>, Vec<f64>) {
    let n = bars.len();
    let mut lower = vec![f64::NAN; n];
    let mut upper = vec![f64::NAN; n];
    if period == 0 || n < period {
        return (lower, upper);
    }

    for i in (period - 1)..n {
        let window = &bars[i + 1 - period..=i];
        lower[i] = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        upper[i] = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
    }
    (lower, upper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bar(day: u32, high: f64, low: f64) -> OhlcvBar {
        OhlcvBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: (high + low) / 2.0,
            high,
            low,
            close: (high + low) / 2.0,
            volume: 1000.0,
        }
    }

    #[test]
    fn donchian_warmup() {
        let bars: Vec<OhlcvBar> = (1..=5)
            .map(|i| make_bar(i, 100.0 + i as f64, 90.0 - i as f64))
            .collect();
        let (lower, upper) = calculate_donchian(&bars, 3);
        assert!(lower[1].is_nan());
        assert!(!lower[2].is_nan());
        assert!(upper[1].is_nan());
    }

    #[test]
    fn donchian_tracks_extremes() {
        let bars = vec![
            make_bar(1, 105.0, 95.0),
            make_bar(2, 110.0, 98.0),
            make_bar(3, 102.0, 92.0),
        ];
        let (lower, upper) = calculate_donchian(&bars, 3);
        assert_relative_eq!(upper[2], 110.0);
        assert_relative_eq!(lower[2], 92.0);
    }

    #[test]
    fn donchian_window_slides() {
        let bars = vec![
            make_bar(1, 120.0, 80.0),
            make_bar(2, 105.0, 95.0),
            make_bar(3, 106.0, 96.0),
            make_bar(4, 107.0, 97.0),
        ];
        let (lower, upper) = calculate_donchian(&bars, 2);
        // Bar 1's extremes drop out of the window at index 2.
        assert_relative_eq!(upper[1], 120.0);
        assert_relative_eq!(lower[1], 80.0);
        assert_relative_eq!(upper[2], 106.0);
        assert_relative_eq!(lower[2], 95.0);
    }
}
