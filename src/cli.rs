//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::condition::{Condition, ConditionSet, Mode};
use crate::domain::condition_parser::{parse_condition, parse_indicator};
use crate::domain::config_validation::validate_strategy_config;
use crate::domain::error::SigtraderError;
use crate::domain::evaluator::SignalEngine;
use crate::domain::indicator::Indicator;
use crate::domain::pipeline::enrich;
use crate::domain::series::PriceSeries;
use crate::domain::strategy::StrategySpec;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "sigtrader", about = "Condition-driven trading signal engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a strategy over a price file and emit per-bar decisions
    Run {
        #[arg(short, long)]
        strategy: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_parser = parse_date_arg)]
        start_date: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date_arg)]
        end_date: Option<NaiveDate>,
    },
    /// Compute indicators over a price file and emit the enriched table
    Enrich {
        #[arg(short, long)]
        data: PathBuf,
        /// Indicator request such as 'SMA(50)' or 'Bollinger Bands(20, 2)'
        #[arg(short, long = "indicator")]
        indicators: Vec<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_parser = parse_date_arg)]
        start_date: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date_arg)]
        end_date: Option<NaiveDate>,
    },
    /// Validate a strategy configuration
    Validate {
        #[arg(short, long)]
        strategy: PathBuf,
    },
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", value))
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            strategy,
            data,
            output,
            start_date,
            end_date,
        } => run_signals(&strategy, &data, output.as_ref(), start_date, end_date),
        Command::Enrich {
            data,
            indicators,
            output,
            start_date,
            end_date,
        } => run_enrich(&data, &indicators, output.as_ref(), start_date, end_date),
        Command::Validate { strategy } => run_validate(&strategy),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SigtraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Assemble a strategy from a validated `[strategy]` section.
pub fn build_strategy(adapter: &dyn ConfigPort) -> Result<StrategySpec, SigtraderError> {
    let name = adapter
        .get_string("strategy", "name")
        .unwrap_or_else(|| "Unnamed".to_string());
    let description = adapter
        .get_string("strategy", "description")
        .unwrap_or_default();

    let entry = build_condition_set(adapter, "entry_conditions", "entry_mode")?;
    let exit = build_condition_set(adapter, "exit_conditions", "exit_mode")?;

    Ok(StrategySpec {
        name,
        description,
        entry,
        exit,
    })
}

fn build_condition_set(
    adapter: &dyn ConfigPort,
    conditions_key: &str,
    mode_key: &str,
) -> Result<ConditionSet, SigtraderError> {
    let mode: Mode = adapter
        .get_string("strategy", mode_key)
        .unwrap_or_else(|| "all".to_string())
        .parse()?;
    let conditions = adapter
        .get_list("strategy", conditions_key)
        .iter()
        .map(|expr| parse_condition(expr))
        .collect::<Result<Vec<Condition>, _>>()?;
    Ok(ConditionSet { mode, conditions })
}

fn load_series(
    data_path: &PathBuf,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<PriceSeries, SigtraderError> {
    let adapter = CsvAdapter::new(data_path.clone());
    let bars = adapter.fetch_ohlcv(start_date, end_date)?;
    if bars.is_empty() {
        return Err(SigtraderError::Data {
            reason: format!("no bars loaded from {}", data_path.display()),
        });
    }
    Ok(PriceSeries::new(bars))
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>, SigtraderError> {
    match path {
        Some(p) => Ok(Box::new(File::create(p)?)),
        None => Ok(Box::new(std::io::stdout())),
    }
}

fn fmt_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

fn run_signals(
    strategy_path: &PathBuf,
    data_path: &PathBuf,
    output_path: Option<&PathBuf>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> ExitCode {
    eprintln!("Loading strategy from {}", strategy_path.display());
    let adapter = match load_config(strategy_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let strategy = match build_strategy(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Running strategy: {}", strategy.name);

    eprintln!("Loading data from {}", data_path.display());
    let series = match load_series(data_path, start_date, end_date) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Loaded {} bars", series.len());

    let conditions: Vec<Condition> = strategy
        .entry
        .conditions
        .iter()
        .chain(strategy.exit.conditions.iter())
        .cloned()
        .collect();
    let series = match enrich(series, &[], &conditions) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let engine = SignalEngine::new(strategy);
    match write_decisions(&engine, &series, output_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn write_decisions(
    engine: &SignalEngine,
    series: &PriceSeries,
    output_path: Option<&PathBuf>,
) -> Result<(), SigtraderError> {
    let columns: Vec<String> = series.indicator_columns().map(str::to_string).collect();
    let mut writer = csv::Writer::from_writer(open_output(output_path)?);

    let mut header = vec!["date".to_string(), "decision".to_string(), "close".to_string()];
    header.extend(columns.iter().cloned());
    writer.write_record(&header)?;

    for bar in engine.decisions(series) {
        let mut record = vec![
            bar.date.format("%Y-%m-%d").to_string(),
            bar.decision.to_string(),
            fmt_cell(series.value("Close", bar.index)),
        ];
        for column in &columns {
            record.push(fmt_cell(series.value(column, bar.index)));
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn run_enrich(
    data_path: &PathBuf,
    indicator_args: &[String],
    output_path: Option<&PathBuf>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> ExitCode {
    let mut specs: Vec<Indicator> = Vec::new();
    for arg in indicator_args {
        match parse_indicator(arg) {
            Ok(indicator) => specs.push(indicator),
            Err(e) => {
                eprintln!("error: failed to parse indicator '{arg}': {e}");
                return (&e).into();
            }
        }
    }

    eprintln!("Loading data from {}", data_path.display());
    let series = match load_series(data_path, start_date, end_date) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Loaded {} bars, computing {} indicators", series.len(), specs.len());

    let series = match enrich(series, &specs, &[]) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match write_table(&series, output_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn write_table(series: &PriceSeries, output_path: Option<&PathBuf>) -> Result<(), SigtraderError> {
    let columns: Vec<String> = series.indicator_columns().map(str::to_string).collect();
    let mut writer = csv::Writer::from_writer(open_output(output_path)?);

    let mut header = vec![
        "date".to_string(),
        "open".to_string(),
        "high".to_string(),
        "low".to_string(),
        "close".to_string(),
        "volume".to_string(),
    ];
    header.extend(columns.iter().cloned());
    writer.write_record(&header)?;

    for (index, bar) in series.bars().iter().enumerate() {
        let mut record = vec![
            bar.date.format("%Y-%m-%d").to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            fmt_cell(series.value("Volume", index)),
        ];
        for column in &columns {
            record.push(fmt_cell(series.value(column, index)));
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn run_validate(strategy_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(strategy_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    match build_strategy(&adapter) {
        Ok(strategy) => {
            println!(
                "Strategy '{}' is valid ({} entry, {} exit conditions)",
                strategy.name,
                strategy.entry.conditions.len(),
                strategy.exit.conditions.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
