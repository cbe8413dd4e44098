//! Strategy definition assembled from configuration.

use crate::domain::condition::ConditionSet;

/// A fully parsed strategy: named entry and exit condition sets over one
/// instrument's price table.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategySpec {
    pub name: String,
    pub description: String,
    pub entry: ConditionSet,
    pub exit: ConditionSet,
}
