//! Parabolic SAR — Wilder's acceleration factor system.
//!
//! Inherently sequential: tracks trend direction, the extreme point (EP) and
//! the acceleration factor (AF). AF starts at `af`, grows by `af` on each new
//! extreme, and caps at `max_af`. The SAR never enters the prior two bars'
//! range; piercing it flips the trend, resets AF, and restarts from the EP.
//!
//! Output is split by trend: `PSARl` holds the stop while the trend is long
//! (NaN otherwise), `PSARs` while it is short. Returns (long, short); the
//! first bar has no value in either series.

use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_psar(bars: &[OhlcvBar], af_x100: u32, max_af_x100: u32) -> (Vec<f64>, Vec<f64>) {
    let n = bars.len();
    let mut long = vec![f64::NAN; n];
    let mut short = vec![f64::NAN; n];
    if n < 2 {
        return (long, short);
    }

    let af_step = af_x100 as f64 / 100.0;
    let max_af = max_af_x100 as f64 / 100.0;

    let mut is_long = bars[1].close >= bars[0].close;
    let mut af = af_step;
    let mut sar;
    let mut ep;
    if is_long {
        sar = bars[0].low;
        ep = bars[1].high;
        long[1] = sar;
    } else {
        sar = bars[0].high;
        ep = bars[1].low;
        short[1] = sar;
    }

    for i in 2..n {
        let mut new_sar = sar + af * (ep - sar);

        if is_long {
            // The stop may not rise above the two previous lows.
            new_sar = new_sar.min(bars[i - 1].low).min(bars[i - 2].low);
            if bars[i].low < new_sar {
                is_long = false;
                new_sar = ep;
                ep = bars[i].low;
                af = af_step;
            } else if bars[i].high > ep {
                ep = bars[i].high;
                af = (af + af_step).min(max_af);
            }
        } else {
            // Mirror image: the stop may not fall below the two previous highs.
            new_sar = new_sar.max(bars[i - 1].high).max(bars[i - 2].high);
            if bars[i].high > new_sar {
                is_long = true;
                new_sar = ep;
                ep = bars[i].high;
                af = af_step;
            } else if bars[i].low < ep {
                ep = bars[i].low;
                af = (af + af_step).min(max_af);
            }
        }

        sar = new_sar;
        if is_long {
            long[i] = sar;
        } else {
            short[i] = sar;
        }
    }
    (long, short)
}
