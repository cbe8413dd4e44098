//! Condition data structures.
//!
//! A `Condition` compares one indicator column against a right-hand side that
//! is either a literal value or a reference string (a raw price column such
//! as `Close`, or another indicator in `NAME_PERIOD` form). Conditions are
//! immutable value objects; an ordered list plus a combination mode forms a
//! `ConditionSet`.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::Indicator;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl FromStr for Comparison {
    type Err = SigtraderError;

    /// An unrecognized operator is a configuration defect that aborts the
    /// request, unlike data absence which fails closed per condition.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(Comparison::Lt),
            ">" => Ok(Comparison::Gt),
            "<=" => Ok(Comparison::Le),
            ">=" => Ok(Comparison::Ge),
            "==" => Ok(Comparison::Eq),
            "!=" => Ok(Comparison::Ne),
            other => Err(SigtraderError::InvalidComparisonOperator {
                operator: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Comparison::Lt => "<",
            Comparison::Gt => ">",
            Comparison::Le => "<=",
            Comparison::Ge => ">=",
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
        };
        write!(f, "{s}")
    }
}

/// The right-hand side of a condition. Exactly one variant supplies it; a
/// condition written without any RHS compares against the literal 0.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Value(f64),
    Reference(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub indicator: Indicator,
    pub comparison: Comparison,
    pub target: Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    All,
    Any,
}

impl FromStr for Mode {
    type Err = SigtraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Mode::All),
            "any" => Ok(Mode::Any),
            other => Err(SigtraderError::ConfigInvalid {
                section: "strategy".to_string(),
                key: "mode".to_string(),
                reason: format!("expected 'all' or 'any', got '{other}'"),
            }),
        }
    }
}

/// An ordered condition list combined under one logical mode. Order affects
/// only short-circuit evaluation, never the logical result.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSet {
    pub mode: Mode,
    pub conditions: Vec<Condition>,
}

impl ConditionSet {
    pub fn all(conditions: Vec<Condition>) -> Self {
        Self {
            mode: Mode::All,
            conditions,
        }
    }

    pub fn any(conditions: Vec<Condition>) -> Self {
        Self {
            mode: Mode::Any,
            conditions,
        }
    }
}
