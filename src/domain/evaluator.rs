//! Bar-by-bar condition evaluation and the entry/exit state machine.
//!
//! Evaluation fails closed: a comparison over any missing or unresolvable
//! value is false for that bar. The engine itself never errors while
//! walking a table; bad data can only suppress signals.

use chrono::NaiveDate;

use crate::domain::condition::{Comparison, Condition, ConditionSet, Mode, Target};
use crate::domain::indicator::Indicator;
use crate::domain::series::PriceSeries;
use crate::domain::strategy::StrategySpec;

/// Tolerance for equality comparisons over floating-point columns.
pub const EPSILON: f64 = 1e-9;

/// The column a condition's indicator contributes to the comparison.
///
/// Multi-column indicators pin a primary line: MACD compares its line,
/// Stochastic its %K, Parabolic SAR its long-trend column. Band indicators
/// pick the band the operator direction points at, so `Bollinger Bands < Close`
/// reads the lower band and `> Close` the upper; equality against a band
/// has no sensible side and yields no column.
pub fn lhs_column(indicator: &Indicator, comparison: Comparison) -> Option<String> {
    let columns = indicator.output_columns();
    match indicator {
        Indicator::Bollinger { .. } | Indicator::Donchian(_) => match comparison {
            Comparison::Lt | Comparison::Le => columns.into_iter().next(),
            Comparison::Gt | Comparison::Ge => columns.into_iter().next_back(),
            Comparison::Eq | Comparison::Ne => None,
        },
        _ => columns.into_iter().next(),
    }
}

/// Resolve a comparison target at one bar. References try the table
/// verbatim first, then as an indicator reference such as `SMA_50`.
fn resolve_target(target: &Target, series: &PriceSeries, index: usize) -> Option<f64> {
    match target {
        Target::Value(v) => Some(*v),
        Target::Reference(name) => {
            if series.has_column(name) {
                return series.value(name, index);
            }
            let indicator = Indicator::parse_reference(name).ok()?;
            let column = indicator.output_columns().into_iter().next()?;
            series.value(&column, index)
        }
    }
}

fn compare(comparison: Comparison, lhs: f64, rhs: f64) -> bool {
    match comparison {
        Comparison::Lt => lhs < rhs,
        Comparison::Gt => lhs > rhs,
        Comparison::Le => lhs <= rhs,
        Comparison::Ge => lhs >= rhs,
        Comparison::Eq => (lhs - rhs).abs() < EPSILON,
        Comparison::Ne => (lhs - rhs).abs() >= EPSILON,
    }
}

/// Evaluate one condition at one bar, false on any missing piece.
pub fn evaluate_condition(condition: &Condition, series: &PriceSeries, index: usize) -> bool {
    let Some(column) = lhs_column(&condition.indicator, condition.comparison) else {
        return false;
    };
    let Some(lhs) = series.value(&column, index) else {
        return false;
    };
    let Some(rhs) = resolve_target(&condition.target, series, index) else {
        return false;
    };
    compare(condition.comparison, lhs, rhs)
}

impl ConditionSet {
    /// Combined verdict at one bar. ALL short-circuits on the first false
    /// condition, ANY on the first true one. An empty ALL set holds, an
    /// empty ANY set never does.
    pub fn holds(&self, series: &PriceSeries, index: usize) -> bool {
        match self.mode {
            Mode::All => self
                .conditions
                .iter()
                .all(|c| evaluate_condition(c, series, index)),
            Mode::Any => self
                .conditions
                .iter()
                .any(|c| evaluate_condition(c, series, index)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Enter,
    Exit,
    Hold,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Enter => write!(f, "ENTER"),
            Decision::Exit => write!(f, "EXIT"),
            Decision::Hold => write!(f, "HOLD"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarDecision {
    pub index: usize,
    pub date: NaiveDate,
    pub decision: Decision,
}

/// Walks an enriched table against a strategy, emitting one decision per bar.
pub struct SignalEngine {
    strategy: StrategySpec,
}

impl SignalEngine {
    pub fn new(strategy: StrategySpec) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &StrategySpec {
        &self.strategy
    }

    /// First bar at which every column the strategy reads has a value.
    /// Columns the table does not carry at all are left out of the gate;
    /// conditions over them fail closed bar by bar instead. A column that
    /// is present but never populated pushes the gate past the table end.
    fn warmup_end(&self, series: &PriceSeries) -> usize {
        let mut end = 0;
        let conditions = self
            .strategy
            .entry
            .conditions
            .iter()
            .chain(self.strategy.exit.conditions.iter());
        for condition in conditions {
            if let Some(column) = lhs_column(&condition.indicator, condition.comparison) {
                if series.has_column(&column) {
                    end = end.max(series.first_value_index(&column).unwrap_or(series.len()));
                }
            }
            if let Target::Reference(name) = &condition.target {
                let column = if series.has_column(name) {
                    Some(name.clone())
                } else {
                    Indicator::parse_reference(name)
                        .ok()
                        .and_then(|i| i.output_columns().into_iter().next())
                };
                if let Some(column) = column {
                    if series.has_column(&column) {
                        end = end.max(series.first_value_index(&column).unwrap_or(series.len()));
                    }
                }
            }
        }
        end
    }

    /// Lazy decision stream over the table. Each call starts a fresh walk
    /// from a flat position at bar zero.
    pub fn decisions<'a>(&'a self, series: &'a PriceSeries) -> Decisions<'a> {
        Decisions {
            engine: self,
            series,
            index: 0,
            warmup_end: self.warmup_end(series),
            state: PositionState::Flat,
        }
    }
}

pub struct Decisions<'a> {
    engine: &'a SignalEngine,
    series: &'a PriceSeries,
    index: usize,
    warmup_end: usize,
    state: PositionState,
}

impl Iterator for Decisions<'_> {
    type Item = BarDecision;

    fn next(&mut self) -> Option<BarDecision> {
        if self.index >= self.series.len() {
            return None;
        }
        let index = self.index;
        self.index += 1;

        // At most one transition per bar: a bar that triggers an entry is
        // not re-examined for an exit, and vice versa.
        let decision = if index < self.warmup_end {
            Decision::Hold
        } else {
            match self.state {
                PositionState::Long => {
                    if self.engine.strategy.exit.holds(self.series, index) {
                        self.state = PositionState::Flat;
                        Decision::Exit
                    } else {
                        Decision::Hold
                    }
                }
                PositionState::Flat => {
                    if self.engine.strategy.entry.holds(self.series, index) {
                        self.state = PositionState::Long;
                        Decision::Enter
                    } else {
                        Decision::Hold
                    }
                }
            }
        };

        Some(BarDecision {
            index,
            date: self.series.date(index),
            decision,
        })
    }
}
