//! Strategy configuration validation.
//!
//! Checks all strategy fields up front so a bad file is rejected before
//! any data is loaded.

use crate::domain::condition::Mode;
use crate::domain::condition_parser::parse_condition;
use crate::domain::error::SigtraderError;
use crate::ports::config_port::ConfigPort;

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_name(config)?;
    validate_mode(config, "entry_mode")?;
    validate_mode(config, "exit_mode")?;
    validate_conditions(config, "entry_conditions")?;
    validate_conditions(config, "exit_conditions")?;
    Ok(())
}

fn validate_name(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    match config.get_string("strategy", "name") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(SigtraderError::ConfigMissing {
            section: "strategy".to_string(),
            key: "name".to_string(),
        }),
    }
}

fn validate_mode(config: &dyn ConfigPort, key: &str) -> Result<(), SigtraderError> {
    let value = config
        .get_string("strategy", key)
        .unwrap_or_else(|| "all".to_string());
    value.parse::<Mode>().map_err(|_| SigtraderError::ConfigInvalid {
        section: "strategy".to_string(),
        key: key.to_string(),
        reason: format!("'{}' is not a valid mode, expected 'all' or 'any'", value),
    })?;
    Ok(())
}

fn validate_conditions(config: &dyn ConfigPort, key: &str) -> Result<(), SigtraderError> {
    for expression in config.get_list("strategy", key) {
        parse_condition(&expression).map_err(|e| SigtraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: key.to_string(),
            reason: format!("'{}': {}", expression, e),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn valid_config_passes() {
        let cfg = config(
            "[strategy]\n\
             name = rsi_reversal\n\
             entry_conditions = RSI(14) < 30; SMA(50) < Close\n\
             exit_conditions = RSI(14) > 70\n\
             entry_mode = all\n\
             exit_mode = any\n",
        );
        assert!(validate_strategy_config(&cfg).is_ok());
    }

    #[test]
    fn missing_name_is_rejected() {
        let cfg = config("[strategy]\nentry_conditions = RSI(14) < 30\n");
        let err = validate_strategy_config(&cfg).unwrap_err();
        assert!(matches!(
            err,
            SigtraderError::ConfigMissing { ref key, .. } if key == "name"
        ));
    }

    #[test]
    fn missing_modes_default_to_all() {
        let cfg = config("[strategy]\nname = s\nentry_conditions = OBV > 0\n");
        assert!(validate_strategy_config(&cfg).is_ok());
    }

    #[test]
    fn bad_mode_is_rejected() {
        let cfg = config("[strategy]\nname = s\nentry_mode = some\n");
        let err = validate_strategy_config(&cfg).unwrap_err();
        assert!(matches!(
            err,
            SigtraderError::ConfigInvalid { ref key, .. } if key == "entry_mode"
        ));
    }

    #[test]
    fn bad_condition_is_rejected_with_context() {
        let cfg = config("[strategy]\nname = s\nentry_conditions = RSI(14) <> 30\n");
        let err = validate_strategy_config(&cfg).unwrap_err();
        match err {
            SigtraderError::ConfigInvalid { key, reason, .. } => {
                assert_eq!(key, "entry_conditions");
                assert!(reason.contains("RSI(14) <> 30"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_condition_lists_are_allowed() {
        let cfg = config("[strategy]\nname = s\n");
        assert!(validate_strategy_config(&cfg).is_ok());
    }
}
