//! Indicator enrichment pipeline.
//!
//! Resolves the set of indicators a strategy actually needs, deduplicates
//! them, and appends their output columns to the price table. Enrichment is
//! all or nothing: any failure leaves the caller with the error, never a
//! partially extended table.

use std::collections::HashSet;

use crate::domain::condition::{Condition, Target};
use crate::domain::error::SigtraderError;
use crate::domain::indicator::{
    atr::calculate_atr, bollinger::calculate_bollinger, cci::calculate_cci, cmf::calculate_cmf,
    donchian::calculate_donchian, ema::calculate_ema, macd::calculate_macd, obv::calculate_obv,
    psar::calculate_psar, rsi::calculate_rsi, sma::calculate_sma,
    stochastic::calculate_stochastic, williams_r::calculate_williams_r, Indicator,
};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::{is_raw_column, PriceSeries};

/// Collect every indicator the strategy depends on: explicit requests, the
/// left-hand side of each condition, and any right-hand reference that names
/// an indicator column rather than a raw one. Order is first-seen; duplicates
/// (including the same indicator reached by different routes) collapse to one
/// unit of work.
pub fn required_indicators(specs: &[Indicator], conditions: &[Condition]) -> Vec<Indicator> {
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    let mut push = |indicator: Indicator| {
        if seen.insert(indicator.clone()) {
            ordered.push(indicator);
        }
    };

    for spec in specs {
        push(spec.clone());
    }
    for condition in conditions {
        push(condition.indicator.clone());
        if let Target::Reference(name) = &condition.target {
            if !is_raw_column(name) {
                // Unresolvable references are left to fail closed at
                // evaluation time rather than aborting enrichment.
                if let Ok(indicator) = Indicator::parse_reference(name) {
                    push(indicator);
                }
            }
        }
    }
    ordered
}

fn compute(indicator: &Indicator, bars: &[OhlcvBar]) -> Vec<Vec<f64>> {
    match indicator {
        Indicator::Sma(p) => vec![calculate_sma(bars, *p)],
        Indicator::Ema(p) => vec![calculate_ema(bars, *p)],
        Indicator::Rsi(p) => vec![calculate_rsi(bars, *p)],
        Indicator::Atr(p) => vec![calculate_atr(bars, *p)],
        Indicator::Cci(p) => vec![calculate_cci(bars, *p)],
        Indicator::Cmf(p) => vec![calculate_cmf(bars, *p)],
        Indicator::WilliamsR(p) => vec![calculate_williams_r(bars, *p)],
        Indicator::Bollinger { period, stddev_x100 } => {
            let (lower, middle, upper) = calculate_bollinger(bars, *period, *stddev_x100);
            vec![lower, middle, upper]
        }
        Indicator::Macd { fast, slow, signal } => {
            let (line, signal_line, histogram) = calculate_macd(bars, *fast, *slow, *signal);
            vec![line, signal_line, histogram]
        }
        Indicator::Stochastic { k_period, d_period } => {
            let (k, d) = calculate_stochastic(bars, *k_period, *d_period);
            vec![k, d]
        }
        Indicator::Obv => vec![calculate_obv(bars)],
        Indicator::Donchian(p) => {
            let (lower, upper) = calculate_donchian(bars, *p);
            vec![lower, upper]
        }
        Indicator::ParabolicSar { af_x100, max_af_x100 } => {
            let (long, short) = calculate_psar(bars, *af_x100, *max_af_x100);
            vec![long, short]
        }
    }
}

/// Enrich the table with every indicator `specs` and `conditions` require.
///
/// An indicator whose full output-column set already exists is skipped, so
/// enriching twice with the same strategy is a no-op. A table shorter than
/// an indicator's minimum bar count aborts with `InsufficientData`.
pub fn enrich(
    mut series: PriceSeries,
    specs: &[Indicator],
    conditions: &[Condition],
) -> Result<PriceSeries, SigtraderError> {
    for indicator in required_indicators(specs, conditions) {
        let columns = indicator.output_columns();
        if columns.iter().all(|name| series.has_column(name)) {
            continue;
        }
        if series.len() < indicator.min_bars() {
            return Err(SigtraderError::InsufficientData {
                indicator: indicator.to_string(),
                bars: series.len(),
                minimum: indicator.min_bars(),
            });
        }
        let outputs = compute(&indicator, series.bars());
        for (name, values) in columns.into_iter().zip(outputs) {
            series.push_column(name, values);
        }
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::condition::Comparison;
    use chrono::NaiveDate;

    fn make_series(closes: &[f64]) -> PriceSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000.0,
            })
            .collect();
        PriceSeries::new(bars)
    }

    fn condition(indicator: Indicator, target: Target) -> Condition {
        Condition {
            indicator,
            comparison: Comparison::Lt,
            target,
        }
    }

    #[test]
    fn closure_includes_condition_indicators() {
        let conditions = vec![condition(Indicator::Rsi(14), Target::Value(30.0))];
        let required = required_indicators(&[], &conditions);
        assert_eq!(required, vec![Indicator::Rsi(14)]);
    }

    #[test]
    fn closure_resolves_indicator_references() {
        let conditions = vec![condition(
            Indicator::Ema(20),
            Target::Reference("SMA_50".to_string()),
        )];
        let required = required_indicators(&[], &conditions);
        assert_eq!(required, vec![Indicator::Ema(20), Indicator::Sma(50)]);
    }

    #[test]
    fn closure_resolves_underscored_reference() {
        let conditions = vec![condition(
            Indicator::Sma(5),
            Target::Reference("Williams_%R_14".to_string()),
        )];
        let required = required_indicators(&[], &conditions);
        assert_eq!(required, vec![Indicator::Sma(5), Indicator::WilliamsR(14)]);
    }

    #[test]
    fn closure_ignores_raw_and_unresolvable_references() {
        let conditions = vec![
            condition(Indicator::Sma(20), Target::Reference("Close".to_string())),
            condition(Indicator::Sma(20), Target::Reference("XYZ_9".to_string())),
        ];
        let required = required_indicators(&[], &conditions);
        assert_eq!(required, vec![Indicator::Sma(20)]);
    }

    #[test]
    fn duplicates_collapse_preserving_order() {
        let specs = vec![Indicator::Sma(50), Indicator::Rsi(14), Indicator::Sma(50)];
        let conditions = vec![condition(Indicator::Rsi(14), Target::Value(30.0))];
        let required = required_indicators(&specs, &conditions);
        assert_eq!(required, vec![Indicator::Sma(50), Indicator::Rsi(14)]);
    }

    #[test]
    fn enrich_appends_all_output_columns() {
        let series = make_series(&(1..=30).map(f64::from).collect::<Vec<_>>());
        let enriched = enrich(
            series,
            &[Indicator::Bollinger {
                period: 20,
                stddev_x100: 200,
            }],
            &[],
        )
        .unwrap();
        assert!(enriched.has_column("BBL_20_2"));
        assert!(enriched.has_column("BBM_20_2"));
        assert!(enriched.has_column("BBU_20_2"));
        assert_eq!(enriched.value("BBM_20_2", 5), None);
        assert!(enriched.value("BBM_20_2", 25).is_some());
    }

    #[test]
    fn enrich_is_idempotent() {
        let series = make_series(&(1..=30).map(f64::from).collect::<Vec<_>>());
        let specs = vec![Indicator::Sma(10), Indicator::Rsi(14)];
        let once = enrich(series, &specs, &[]).unwrap();
        let first: Vec<String> = once.indicator_columns().map(str::to_string).collect();
        let twice = enrich(once, &specs, &[]).unwrap();
        let second: Vec<String> = twice.indicator_columns().map(str::to_string).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn short_table_aborts_with_insufficient_data() {
        let series = make_series(&[1.0, 2.0, 3.0]);
        let err = enrich(series, &[Indicator::Sma(10)], &[]).unwrap_err();
        match err {
            SigtraderError::InsufficientData { bars, minimum, .. } => {
                assert_eq!(bars, 3);
                assert_eq!(minimum, 10);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn obv_enriches_from_a_single_bar() {
        let series = make_series(&[10.0]);
        let enriched = enrich(series, &[Indicator::Obv], &[]).unwrap();
        assert_eq!(enriched.value("OBV", 0), Some(1000.0));
    }
}
