use crate::audit::SinkError;
use crate::config::ConfigError;
use crate::datasource::SourceError;
use crate::domain::LookupTableError;
use thiserror::Error;

/// Fatal errors that abort a pipeline run.
///
/// Per-record problems never show up here; they are skipped and counted.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Lookup table error: {0}")]
    LookupTable(#[from] LookupTableError),
    #[error("Input error: {0}")]
    Source(#[from] SourceError),
    #[error("Audit error: {0}")]
    Sink(#[from] SinkError),
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),
    #[error("Partition worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
