//! sigtrader — declarative indicator-condition signal engine.
//!
//! Strategies are described as named technical-indicator conditions over an
//! OHLCV series and evaluated bar-by-bar into enter/exit/hold decisions.
//! Hexagonal architecture: domain logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
