#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use sigtrader::domain::condition::{Comparison, Condition, ConditionSet, Target};
use sigtrader::domain::error::SigtraderError;
use sigtrader::domain::indicator::Indicator;
pub use sigtrader::domain::ohlcv::OhlcvBar;
use sigtrader::domain::series::PriceSeries;
use sigtrader::domain::strategy::StrategySpec;
use sigtrader::ports::data_port::DataPort;

pub struct MockDataPort {
    pub bars: Vec<OhlcvBar>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            bars: Vec::new(),
            error: None,
        }
    }

    pub fn with_bars(mut self, bars: Vec<OhlcvBar>) -> Self {
        self.bars = bars;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, SigtraderError> {
        if let Some(reason) = &self.error {
            return Err(SigtraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .bars
            .iter()
            .filter(|bar| {
                !start_date.is_some_and(|s| bar.date < s) && !end_date.is_some_and(|e| bar.date > e)
            })
            .cloned()
            .collect())
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn make_bar(date_str: &str, close: f64) -> OhlcvBar {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap();
    OhlcvBar {
        date,
        open: close,
        high: close * 1.01,
        low: close * 0.99,
        close,
        volume: 10_000.0,
    }
}

/// Consecutive daily bars from the given closes, starting 2024-01-01.
pub fn generate_bars(closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            date: date(2024, 1, 1) + Days::new(i as u64),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: 10_000.0,
        })
        .collect()
}

pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    PriceSeries::new(generate_bars(closes))
}

pub fn condition(indicator: Indicator, comparison: Comparison, target: Target) -> Condition {
    Condition {
        indicator,
        comparison,
        target,
    }
}

pub fn make_strategy(entry: ConditionSet, exit: ConditionSet) -> StrategySpec {
    StrategySpec {
        name: "test_strategy".to_string(),
        description: String::new(),
        entry,
        exit,
    }
}

/// SMA-versus-close strategy: enter when the short average dips below the
/// close, exit when it rises above.
pub fn sma_close_strategy(period: usize) -> StrategySpec {
    make_strategy(
        ConditionSet::all(vec![condition(
            Indicator::Sma(period),
            Comparison::Lt,
            Target::Reference("Close".to_string()),
        )]),
        ConditionSet::all(vec![condition(
            Indicator::Sma(period),
            Comparison::Gt,
            Target::Reference("Close".to_string()),
        )]),
    )
}
