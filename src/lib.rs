pub mod audit;
pub mod cli;
pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;

pub use audit::{AuditSink, CsvAuditSink, SinkError};
pub use config::{Config, MaxStrategy, OutputSeparator};
pub use datasource::{FileLineSource, LineSource, MockLineSource, SourceError};
pub use domain::{
    DeltaRecord, GroupKey, GroupSum, HashtagRecord, KeyVariant, MatchId, RunMax, SortKey,
    SubstitutionTable, TopScore,
};
pub use error::PipelineError;
pub use orchestration::{JobKind, Pipeline, PipelineReport};
