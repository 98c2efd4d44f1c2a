//! Command-line arguments. Flags override the `SCORESWING_*` environment.

use crate::config::{parse_max_strategy, parse_output_separator, parse_sort_key, Config, ConfigError};
use crate::orchestration::JobKind;
use clap::Parser;
use std::path::PathBuf;

/// Score-margin swing and hashtag rollup jobs over local files
#[derive(Parser, Debug)]
#[command(name = "scoreswing")]
#[command(version)]
pub struct Cli {
    /// Job to run
    #[arg(value_enum)]
    pub job: JobKind,

    /// Input file (`.lz4` files are decompressed)
    pub input: PathBuf,

    /// Output file; the run report is written next to it
    pub output: PathBuf,

    /// JSON substitution table for score tokens
    #[arg(long, value_name = "PATH")]
    pub lookup_table: Option<PathBuf>,

    /// Number of partition workers
    #[arg(short = 'p', long)]
    pub partitions: Option<u16>,

    /// Output key/value separator: tab or comma
    #[arg(long, value_name = "SEP")]
    pub separator: Option<String>,

    /// Write one CSV audit row per emitted delta
    #[arg(long, value_name = "PATH")]
    pub audit: Option<PathBuf>,

    /// Sort key before the running-max stage: full or super
    #[arg(long, value_name = "KEY")]
    pub sort_key: Option<String>,

    /// Max strategy: adjacent or group-scan
    #[arg(long, value_name = "STRATEGY")]
    pub max_strategy: Option<String>,

    /// Emit the last run at end of input
    #[arg(long, value_name = "BOOL")]
    pub flush_final_run: Option<bool>,
}

impl Cli {
    /// Layer the flags that were given on top of `config`.
    pub fn apply(&self, mut config: Config) -> Result<Config, ConfigError> {
        if let Some(path) = &self.lookup_table {
            config.lookup_table_path = path.clone();
        }
        if let Some(partitions) = self.partitions {
            if partitions == 0 {
                return Err(ConfigError::InvalidValue(
                    "--partitions".to_string(),
                    "must be at least 1".to_string(),
                ));
            }
            config.partitions = partitions;
        }
        if let Some(sep) = &self.separator {
            config.output_separator = parse_output_separator(sep)?;
        }
        if let Some(path) = &self.audit {
            config.audit_path = Some(path.clone());
        }
        if let Some(key) = &self.sort_key {
            config.sort_key = parse_sort_key(key)?;
        }
        if let Some(strategy) = &self.max_strategy {
            config.max_strategy = parse_max_strategy(strategy)?;
        }
        if let Some(flush) = self.flush_final_run {
            config.flush_final_run = flush;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MaxStrategy, OutputSeparator};
    use crate::domain::SortKey;

    #[test]
    fn test_positional_arguments() {
        let cli = Cli::try_parse_from(["scoreswing", "team-swing", "in.csv", "out.txt"]).unwrap();
        assert_eq!(cli.job, JobKind::TeamSwing);
        assert_eq!(cli.input, PathBuf::from("in.csv"));
        assert_eq!(cli.output, PathBuf::from("out.txt"));
        assert_eq!(cli.apply(Config::default()).unwrap(), Config::default());
    }

    #[test]
    fn test_missing_arguments_rejected() {
        assert!(Cli::try_parse_from(["scoreswing", "team-swing", "in.csv"]).is_err());
        assert!(Cli::try_parse_from(["scoreswing", "no-such-job", "a", "b"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "scoreswing",
            "hashtags-monthly",
            "in.csv",
            "out.txt",
            "--partitions",
            "8",
            "--separator",
            "comma",
            "--sort-key",
            "super",
            "--max-strategy",
            "group-scan",
            "--flush-final-run",
            "false",
            "--audit",
            "audit.csv",
        ])
        .unwrap();
        let config = cli.apply(Config::default()).unwrap();
        assert_eq!(config.partitions, 8);
        assert_eq!(config.output_separator, OutputSeparator::Comma);
        assert_eq!(config.sort_key, SortKey::Super);
        assert_eq!(config.max_strategy, MaxStrategy::GroupScan);
        assert!(!config.flush_final_run);
        assert_eq!(config.audit_path, Some(PathBuf::from("audit.csv")));
    }

    #[test]
    fn test_invalid_flag_values() {
        let cli = Cli::try_parse_from(["scoreswing", "team-swing", "a", "b", "--separator", "pipe"])
            .unwrap();
        assert!(cli.apply(Config::default()).is_err());

        let cli = Cli::try_parse_from(["scoreswing", "team-swing", "a", "b", "-p", "0"]).unwrap();
        assert!(cli.apply(Config::default()).is_err());
    }
}
