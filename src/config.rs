use crate::domain::SortKey;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_LOOKUP_TABLE: &str = "resources/month_to_score.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub lookup_table_path: PathBuf,
    pub partitions: u16,
    pub output_separator: OutputSeparator,
    pub audit_path: Option<PathBuf>,
    pub sort_key: SortKey,
    pub max_strategy: MaxStrategy,
    pub flush_final_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputSeparator {
    Tab,
    Comma,
}

impl OutputSeparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputSeparator::Tab => "\t",
            OutputSeparator::Comma => ",",
        }
    }
}

/// How the per-super-key maximum is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaxStrategy {
    /// Stateful scan that relies on super-keys arriving contiguously.
    Adjacent,
    /// Group everything by super-key first; no ordering requirement.
    GroupScan,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            lookup_table_path: PathBuf::from(DEFAULT_LOOKUP_TABLE),
            partitions: 4,
            output_separator: OutputSeparator::Tab,
            audit_path: None,
            sort_key: SortKey::Full,
            max_strategy: MaxStrategy::Adjacent,
            flush_final_run: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let lookup_table_path = env_map
            .get("SCORESWING_LOOKUP_TABLE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOOKUP_TABLE));

        let partitions = env_map
            .get("SCORESWING_PARTITIONS")
            .map(|s| s.as_str())
            .unwrap_or("4")
            .parse::<u16>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "SCORESWING_PARTITIONS".to_string(),
                    "must be an integer between 1 and 65535".to_string(),
                )
            })?;

        let output_separator = parse_output_separator(
            env_map
                .get("SCORESWING_OUTPUT_SEPARATOR")
                .map(|s| s.as_str())
                .unwrap_or("tab"),
        )?;

        let audit_path = env_map
            .get("SCORESWING_AUDIT_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let sort_key = parse_sort_key(
            env_map
                .get("SCORESWING_SORT_KEY")
                .map(|s| s.as_str())
                .unwrap_or("full"),
        )?;

        let max_strategy = parse_max_strategy(
            env_map
                .get("SCORESWING_MAX_STRATEGY")
                .map(|s| s.as_str())
                .unwrap_or("adjacent"),
        )?;

        let flush_final_run = match env_map
            .get("SCORESWING_FLUSH_FINAL_RUN")
            .map(|s| s.as_str())
            .unwrap_or("true")
        {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                return Err(ConfigError::InvalidValue(
                    "SCORESWING_FLUSH_FINAL_RUN".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        Ok(Config {
            lookup_table_path,
            partitions,
            output_separator,
            audit_path,
            sort_key,
            max_strategy,
            flush_final_run,
        })
    }
}

pub fn parse_output_separator(value: &str) -> Result<OutputSeparator, ConfigError> {
    match value {
        "tab" => Ok(OutputSeparator::Tab),
        "comma" => Ok(OutputSeparator::Comma),
        other => Err(ConfigError::InvalidValue(
            "SCORESWING_OUTPUT_SEPARATOR".to_string(),
            format!("must be tab or comma, got {}", other),
        )),
    }
}

pub fn parse_sort_key(value: &str) -> Result<SortKey, ConfigError> {
    match value {
        "full" => Ok(SortKey::Full),
        "super" => Ok(SortKey::Super),
        other => Err(ConfigError::InvalidValue(
            "SCORESWING_SORT_KEY".to_string(),
            format!("must be full or super, got {}", other),
        )),
    }
}

pub fn parse_max_strategy(value: &str) -> Result<MaxStrategy, ConfigError> {
    match value {
        "adjacent" => Ok(MaxStrategy::Adjacent),
        "group-scan" => Ok(MaxStrategy::GroupScan),
        other => Err(ConfigError::InvalidValue(
            "SCORESWING_MAX_STRATEGY".to_string(),
            format!("must be adjacent or group-scan, got {}", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_env() {
        let config = Config::from_env_map(HashMap::new()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.lookup_table_path, PathBuf::from(DEFAULT_LOOKUP_TABLE));
        assert_eq!(config.output_separator.as_str(), "\t");
    }

    #[test]
    fn test_all_values_from_env() {
        let mut env_map = HashMap::new();
        env_map.insert("SCORESWING_LOOKUP_TABLE".to_string(), "/etc/t.json".to_string());
        env_map.insert("SCORESWING_PARTITIONS".to_string(), "8".to_string());
        env_map.insert("SCORESWING_OUTPUT_SEPARATOR".to_string(), "comma".to_string());
        env_map.insert("SCORESWING_AUDIT_PATH".to_string(), "/tmp/audit.csv".to_string());
        env_map.insert("SCORESWING_SORT_KEY".to_string(), "super".to_string());
        env_map.insert("SCORESWING_MAX_STRATEGY".to_string(), "group-scan".to_string());
        env_map.insert("SCORESWING_FLUSH_FINAL_RUN".to_string(), "false".to_string());

        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.lookup_table_path, PathBuf::from("/etc/t.json"));
        assert_eq!(config.partitions, 8);
        assert_eq!(config.output_separator, OutputSeparator::Comma);
        assert_eq!(config.audit_path, Some(PathBuf::from("/tmp/audit.csv")));
        assert_eq!(config.sort_key, SortKey::Super);
        assert_eq!(config.max_strategy, MaxStrategy::GroupScan);
        assert!(!config.flush_final_run);
    }

    #[test]
    fn test_zero_partitions_rejected() {
        let mut env_map = HashMap::new();
        env_map.insert("SCORESWING_PARTITIONS".to_string(), "0".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "SCORESWING_PARTITIONS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_partitions() {
        let mut env_map = HashMap::new();
        env_map.insert("SCORESWING_PARTITIONS".to_string(), "lots".to_string());
        assert!(matches!(
            Config::from_env_map(env_map),
            Err(ConfigError::InvalidValue(_, _))
        ));
    }

    #[test]
    fn test_invalid_separator() {
        let mut env_map = HashMap::new();
        env_map.insert("SCORESWING_OUTPUT_SEPARATOR".to_string(), "pipe".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "SCORESWING_OUTPUT_SEPARATOR"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_sort_key() {
        let mut env_map = HashMap::new();
        env_map.insert("SCORESWING_SORT_KEY".to_string(), "period".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "SCORESWING_SORT_KEY"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_flush_flag() {
        let mut env_map = HashMap::new();
        env_map.insert("SCORESWING_FLUSH_FINAL_RUN".to_string(), "maybe".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "SCORESWING_FLUSH_FINAL_RUN"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_blank_audit_path_is_none() {
        let mut env_map = HashMap::new();
        env_map.insert("SCORESWING_AUDIT_PATH".to_string(), " ".to_string());
        assert_eq!(Config::from_env_map(env_map).unwrap().audit_path, None);
    }
}
