//! Indicator catalog and typed column registry.
//!
//! `Indicator` is the registry key: identity + parameters, hashable so the
//! pipeline can deduplicate units of work. Every key maps deterministically
//! to its output column name(s); reference strings in conditions (`SMA_50`)
//! resolve through the same mapping, so the formats here are load-bearing.
//!
//! Fractional parameters (Bollinger std-dev multiplier, Parabolic SAR
//! acceleration factors) are stored fixed-point ×100 to keep the key `Eq +
//! Hash`, and formatted back without trailing zeros (`2`, `0.02`).

pub mod sma;
pub mod ema;
pub mod rsi;
pub mod atr;
pub mod cci;
pub mod cmf;
pub mod williams_r;
pub mod bollinger;
pub mod macd;
pub mod stochastic;
pub mod obv;
pub mod donchian;
pub mod psar;

use crate::domain::error::SigtraderError;
use std::fmt;

pub const DEFAULT_PERIOD: usize = 14;
pub const DEFAULT_BOLLINGER_PERIOD: usize = 20;
pub const DEFAULT_BOLLINGER_STDDEV_X100: u32 = 200;
pub const DEFAULT_MACD_FAST: usize = 12;
pub const DEFAULT_MACD_SLOW: usize = 26;
pub const DEFAULT_MACD_SIGNAL: usize = 9;
pub const DEFAULT_STOCH_D: usize = 3;
pub const DEFAULT_DONCHIAN_PERIOD: usize = 20;
pub const DEFAULT_PSAR_AF_X100: u32 = 2;
pub const DEFAULT_PSAR_MAX_AF_X100: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Indicator {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Atr(usize),
    Cci(usize),
    Cmf(usize),
    WilliamsR(usize),
    Bollinger { period: usize, stddev_x100: u32 },
    Macd { fast: usize, slow: usize, signal: usize },
    Stochastic { k_period: usize, d_period: usize },
    Obv,
    Donchian(usize),
    ParabolicSar { af_x100: u32, max_af_x100: u32 },
}

/// Render a ×100 fixed-point parameter the way it appears in column names:
/// whole values lose the decimal point (`200` → `"2"`), fractional values
/// keep significant digits only (`2` → `"0.02"`, `20` → `"0.2"`).
pub(crate) fn fmt_x100(v: u32) -> String {
    if v % 100 == 0 {
        (v / 100).to_string()
    } else {
        let s = format!("{:.2}", v as f64 / 100.0);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

impl Indicator {
    /// Deterministic output column name(s). Multi-column indicators are one
    /// unit of work producing this full set; "already computed" checks must
    /// test set membership, never a single name.
    pub fn output_columns(&self) -> Vec<String> {
        match self {
            Indicator::Sma(p) => vec![format!("SMA_{p}")],
            Indicator::Ema(p) => vec![format!("EMA_{p}")],
            Indicator::Rsi(p) => vec![format!("RSI_{p}")],
            Indicator::Atr(p) => vec![format!("ATR_{p}")],
            Indicator::Cci(p) => vec![format!("CCI_{p}")],
            Indicator::Cmf(p) => vec![format!("CMF_{p}")],
            Indicator::WilliamsR(p) => vec![format!("Williams_%R_{p}")],
            Indicator::Bollinger { period, stddev_x100 } => {
                let s = fmt_x100(*stddev_x100);
                vec![
                    format!("BBL_{period}_{s}"),
                    format!("BBM_{period}_{s}"),
                    format!("BBU_{period}_{s}"),
                ]
            }
            Indicator::Macd { fast, slow, signal } => vec![
                format!("MACD_{fast}_{slow}_{signal}"),
                format!("MACDs_{fast}_{slow}_{signal}"),
                format!("MACDh_{fast}_{slow}_{signal}"),
            ],
            Indicator::Stochastic { k_period, d_period } => vec![
                format!("STOCHk_{k_period}_{d_period}"),
                format!("STOCHd_{k_period}_{d_period}"),
            ],
            Indicator::Obv => vec!["OBV".to_string()],
            Indicator::Donchian(p) => vec![format!("DCL_{p}"), format!("DCU_{p}")],
            Indicator::ParabolicSar { af_x100, max_af_x100 } => {
                let af = fmt_x100(*af_x100);
                let max = fmt_x100(*max_af_x100);
                vec![format!("PSARl_{af}_{max}"), format!("PSARs_{af}_{max}")]
            }
        }
    }

    /// Smallest row count for which this computation yields at least one
    /// non-missing value. A shorter table aborts enrichment with
    /// `InsufficientData`; longer tables just carry warm-up NaN rows.
    pub fn min_bars(&self) -> usize {
        match self {
            Indicator::Sma(p)
            | Indicator::Ema(p)
            | Indicator::Atr(p)
            | Indicator::Cci(p)
            | Indicator::Cmf(p)
            | Indicator::WilliamsR(p)
            | Indicator::Bollinger { period: p, .. }
            | Indicator::Donchian(p) => *p,
            // RSI needs `period` price changes, so period + 1 bars.
            Indicator::Rsi(p) => p + 1,
            Indicator::Macd { slow, signal, .. } => slow + signal - 1,
            Indicator::Stochastic { k_period, d_period } => k_period + d_period - 1,
            Indicator::Obv => 1,
            Indicator::ParabolicSar { .. } => 2,
        }
    }

    /// Catalog lookup from a user-facing indicator name plus positional
    /// parameters, applying the documented defaults for anything omitted.
    pub fn from_spec(name: &str, params: &[f64]) -> Result<Indicator, SigtraderError> {
        let period = |idx: usize, default: usize| -> Result<usize, SigtraderError> {
            match params.get(idx) {
                None => Ok(default),
                Some(&v) if v >= 1.0 && v.fract() == 0.0 => Ok(v as usize),
                Some(&v) => Err(SigtraderError::InvalidParameter {
                    indicator: name.to_string(),
                    reason: format!("expected a positive whole period, got {v}"),
                }),
            }
        };
        let x100 = |idx: usize, default: u32| -> Result<u32, SigtraderError> {
            match params.get(idx) {
                None => Ok(default),
                Some(&v) if v > 0.0 => Ok((v * 100.0).round() as u32),
                Some(&v) => Err(SigtraderError::InvalidParameter {
                    indicator: name.to_string(),
                    reason: format!("expected a positive value, got {v}"),
                }),
            }
        };

        match name {
            "SMA" => Ok(Indicator::Sma(period(0, DEFAULT_PERIOD)?)),
            "EMA" => Ok(Indicator::Ema(period(0, DEFAULT_PERIOD)?)),
            "RSI" => Ok(Indicator::Rsi(period(0, DEFAULT_PERIOD)?)),
            "ATR" => Ok(Indicator::Atr(period(0, DEFAULT_PERIOD)?)),
            "CCI" => Ok(Indicator::Cci(period(0, DEFAULT_PERIOD)?)),
            "CMF" => Ok(Indicator::Cmf(period(0, DEFAULT_PERIOD)?)),
            "Williams %R" => Ok(Indicator::WilliamsR(period(0, DEFAULT_PERIOD)?)),
            "Bollinger Bands" => Ok(Indicator::Bollinger {
                period: period(0, DEFAULT_BOLLINGER_PERIOD)?,
                stddev_x100: x100(1, DEFAULT_BOLLINGER_STDDEV_X100)?,
            }),
            "MACD" => Ok(Indicator::Macd {
                fast: period(0, DEFAULT_MACD_FAST)?,
                slow: period(1, DEFAULT_MACD_SLOW)?,
                signal: period(2, DEFAULT_MACD_SIGNAL)?,
            }),
            "Stochastic Oscillator" => Ok(Indicator::Stochastic {
                k_period: period(0, DEFAULT_PERIOD)?,
                d_period: period(1, DEFAULT_STOCH_D)?,
            }),
            "OBV" => Ok(Indicator::Obv),
            "Donchian Channels" => Ok(Indicator::Donchian(period(0, DEFAULT_DONCHIAN_PERIOD)?)),
            "Parabolic SAR" => Ok(Indicator::ParabolicSar {
                af_x100: x100(0, DEFAULT_PSAR_AF_X100)?,
                max_af_x100: x100(1, DEFAULT_PSAR_MAX_AF_X100)?,
            }),
            _ => Err(SigtraderError::UnsupportedIndicator {
                name: name.to_string(),
            }),
        }
    }

    /// Parse a condition reference string in `NAME_PERIOD` form (`SMA_50`,
    /// `Williams_%R_14`) into the indicator that produces that column. Only
    /// single-column indicators can be referenced this way, plus bare `OBV`.
    /// The period is everything after the last underscore, so names that
    /// contain underscores themselves still resolve.
    ///
    /// References are advisory lookups: callers that must not abort go
    /// through `.ok()` and fail closed.
    pub fn parse_reference(reference: &str) -> Result<Indicator, SigtraderError> {
        if reference == "OBV" {
            return Ok(Indicator::Obv);
        }
        let Some((name, period)) = reference.rsplit_once('_') else {
            return Err(SigtraderError::InvalidReferenceFormat {
                reference: reference.to_string(),
            });
        };
        let period: usize = period.parse().map_err(|_| {
            SigtraderError::InvalidReferenceFormat {
                reference: reference.to_string(),
            }
        })?;
        match name {
            "SMA" => Ok(Indicator::Sma(period)),
            "EMA" => Ok(Indicator::Ema(period)),
            "RSI" => Ok(Indicator::Rsi(period)),
            "ATR" => Ok(Indicator::Atr(period)),
            "CCI" => Ok(Indicator::Cci(period)),
            "CMF" => Ok(Indicator::Cmf(period)),
            "Williams_%R" => Ok(Indicator::WilliamsR(period)),
            other => Err(SigtraderError::UnsupportedIndicator {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Indicator::Sma(p) => write!(f, "SMA({p})"),
            Indicator::Ema(p) => write!(f, "EMA({p})"),
            Indicator::Rsi(p) => write!(f, "RSI({p})"),
            Indicator::Atr(p) => write!(f, "ATR({p})"),
            Indicator::Cci(p) => write!(f, "CCI({p})"),
            Indicator::Cmf(p) => write!(f, "CMF({p})"),
            Indicator::WilliamsR(p) => write!(f, "Williams %R({p})"),
            Indicator::Bollinger { period, stddev_x100 } => {
                write!(f, "Bollinger Bands({period},{})", fmt_x100(*stddev_x100))
            }
            Indicator::Macd { fast, slow, signal } => {
                write!(f, "MACD({fast},{slow},{signal})")
            }
            Indicator::Stochastic { k_period, d_period } => {
                write!(f, "Stochastic Oscillator({k_period},{d_period})")
            }
            Indicator::Obv => write!(f, "OBV"),
            Indicator::Donchian(p) => write!(f, "Donchian Channels({p})"),
            Indicator::ParabolicSar { af_x100, max_af_x100 } => {
                write!(
                    f,
                    "Parabolic SAR({},{})",
                    fmt_x100(*af_x100),
                    fmt_x100(*max_af_x100)
                )
            }
        }
    }
}
