//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    fn new_ini() -> Ini {
        let mut config = Ini::new();
        // Values use ';' as a list separator, so it must not start an inline comment.
        config.set_inline_comment_symbols(Some(&['#']));
        config
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Self::new_ini();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Self::new_ini();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_list(&self, section: &str, key: &str) -> Vec<String> {
        self.config
            .get(section, key)
            .map(|value| {
                value
                    .split(';')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[strategy]
name = RSI Reversal
description = Buy oversold, sell overbought
entry_conditions = RSI(14) < 30
exit_conditions = RSI(14) > 70
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("strategy", "name"),
            Some("RSI Reversal".to_string())
        );
        assert_eq!(
            adapter.get_string("strategy", "entry_conditions"),
            Some("RSI(14) < 30".to_string())
        );
    }

    #[test]
    fn from_file_parses_config() {
        let file = create_temp_config("[strategy]\nname = test\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_string("strategy", "name"), Some("test".to_string()));
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[strategy]\nname = test\n").unwrap();
        assert_eq!(adapter.get_string("strategy", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_list_splits_on_semicolons() {
        let adapter = FileConfigAdapter::from_string(
            "[strategy]\nentry_conditions = RSI(14) < 30; SMA(50) < Close ;\n",
        )
        .unwrap();
        assert_eq!(
            adapter.get_list("strategy", "entry_conditions"),
            vec!["RSI(14) < 30".to_string(), "SMA(50) < Close".to_string()]
        );
        assert!(adapter.get_list("strategy", "missing").is_empty());
    }
}
