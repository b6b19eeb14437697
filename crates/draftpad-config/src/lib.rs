use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Spellcheck trigger timings, in config-file-friendly units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellcheckSettings {
    pub idle_delay_ms: u64,
    pub min_check_interval_ms: u64,
    pub paragraph_char_threshold: usize,
}

impl Default for SpellcheckSettings {
    fn default() -> Self {
        let engine = draftpad_engine::SpellcheckConfig::default();
        Self {
            idle_delay_ms: engine.idle_delay.as_millis() as u64,
            min_check_interval_ms: engine.min_check_interval.as_millis() as u64,
            paragraph_char_threshold: engine.paragraph_char_threshold,
        }
    }
}

impl SpellcheckSettings {
    pub fn to_engine(&self) -> draftpad_engine::SpellcheckConfig {
        draftpad_engine::SpellcheckConfig {
            idle_delay: Duration::from_millis(self.idle_delay_ms),
            min_check_interval: Duration::from_millis(self.min_check_interval_ms),
            paragraph_char_threshold: self.paragraph_char_threshold,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Word list used by the built-in proofreader, one word per line.
    pub dictionary_path: PathBuf,
    pub spellcheck: SpellcheckSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary_path: PathBuf::from("/usr/share/dict/words"),
            spellcheck: SpellcheckSettings::default(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded dictionary path
        config.dictionary_path =
            Self::expand_path(&config.dictionary_path).unwrap_or(config.dictionary_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/draftpad");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/draftpad/config.toml"));
    }

    #[test]
    fn test_defaults_match_engine_defaults() {
        let config = Config::default();
        let engine = config.spellcheck.to_engine();
        assert_eq!(engine, draftpad_engine::SpellcheckConfig::default());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            dictionary_path: PathBuf::from("/tmp/words"),
            spellcheck: SpellcheckSettings {
                idle_delay_ms: 2_000,
                min_check_interval_ms: 8_000,
                paragraph_char_threshold: 10,
            },
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original.dictionary_path, deserialized.dictionary_path);
        assert_eq!(
            original.spellcheck.idle_delay_ms,
            deserialized.spellcheck.idle_delay_ms
        );
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(r#"dictionary_path = "/opt/words""#).unwrap();
        assert_eq!(config.dictionary_path, PathBuf::from("/opt/words"));
        assert_eq!(config.spellcheck.idle_delay_ms, 5_000);
        assert_eq!(config.spellcheck.paragraph_char_threshold, 20);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        let test_config = Config {
            dictionary_path: PathBuf::from("/tmp/words"),
            spellcheck: SpellcheckSettings::default(),
        };

        test_config.save_to_path(&config_file).unwrap();

        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config.dictionary_path, test_config.dictionary_path);
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "not [valid toml").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_config_with_tilde_in_toml() {
        let config_content = r#"
dictionary_path = "~/words/en.txt"
"#;

        let mut config: Config = toml::from_str(config_content).unwrap();
        config.dictionary_path =
            Config::expand_path(&config.dictionary_path).unwrap_or(config.dictionary_path);

        let expanded_path = config.dictionary_path.to_string_lossy();
        assert!(!expanded_path.starts_with('~'));
        assert!(expanded_path.contains("words/en.txt"));
    }
}
