//! Core domain types and logic.

pub mod ohlcv;
pub mod series;
pub mod indicator;
pub mod pipeline;
pub mod condition;
pub mod condition_parser;
pub mod evaluator;
pub mod strategy;
pub mod config_validation;
pub mod error;
