//! The enriched price table shared by the pipeline and the evaluator.
//!
//! A `PriceSeries` owns the validated OHLCV bars plus the indicator columns
//! the pipeline appends. Rows are never reordered or mutated after
//! construction; enrichment only ever adds columns. Missing values are
//! `f64::NAN` in storage and surface as `None` through [`PriceSeries::value`].

use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

/// The five raw column names every series carries.
pub const RAW_COLUMNS: [&str; 5] = ["Open", "High", "Low", "Close", "Volume"];

pub fn is_raw_column(name: &str) -> bool {
    RAW_COLUMNS.contains(&name)
}

#[derive(Debug, Clone)]
pub struct PriceSeries {
    bars: Vec<OhlcvBar>,
    // Appended indicator columns in insertion order; each aligned 1:1 with bars.
    columns: Vec<(String, Vec<f64>)>,
}

impl PriceSeries {
    pub fn new(bars: Vec<OhlcvBar>) -> Self {
        Self {
            bars,
            columns: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn date(&self, index: usize) -> NaiveDate {
        self.bars[index].date
    }

    pub fn has_column(&self, name: &str) -> bool {
        is_raw_column(name) || self.columns.iter().any(|(n, _)| n == name)
    }

    /// Names of the appended indicator columns, in insertion order.
    pub fn indicator_columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// Append a column. The first write for a name wins, so re-appending the
    /// output of a deduplicated computation is a no-op rather than an error.
    pub fn push_column(&mut self, name: String, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.bars.len());
        if self.has_column(&name) {
            return;
        }
        self.columns.push((name, values));
    }

    /// Look up a cell by column name. Resolves the five raw OHLCV names and
    /// any appended indicator column; `None` for absent columns, indexes out
    /// of range, and NaN cells.
    pub fn value(&self, name: &str, index: usize) -> Option<f64> {
        if index >= self.bars.len() {
            return None;
        }
        let raw = match name {
            "Open" => Some(self.bars[index].open),
            "High" => Some(self.bars[index].high),
            "Low" => Some(self.bars[index].low),
            "Close" => Some(self.bars[index].close),
            "Volume" => Some(self.bars[index].volume),
            _ => None,
        };
        let v = match raw {
            Some(v) => v,
            None => {
                let (_, values) = self.columns.iter().find(|(n, _)| n == name)?;
                values[index]
            }
        };
        if v.is_nan() { None } else { Some(v) }
    }

    /// First index at which the named column holds a non-missing value, or
    /// `None` if the column is absent or never populated.
    pub fn first_value_index(&self, name: &str) -> Option<usize> {
        if !self.has_column(name) {
            return None;
        }
        (0..self.bars.len()).find(|&i| self.value(name, i).is_some())
    }
}
