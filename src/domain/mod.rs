//! Domain types for the score-swing and hashtag pipelines.
//!
//! This module provides:
//! - Domain primitives: MatchId, GroupKey
//! - Raw event rows and their validated fields
//! - Score token normalization and parsing
//! - Records passed between pipeline stages
//! - Sort contracts for the running-max stage

pub mod aggregate;
pub mod event;
pub mod hashtag;
pub mod ordering;
pub mod primitives;
pub mod score;

pub use aggregate::{DeltaRecord, GroupSum, RunMax, TopScore};
pub use event::{EventFields, KeyVariant, RawEventRecord, RecordError};
pub use hashtag::{month_bucket, HashtagRecord, PREPROCESSED_HEADER, UNKNOWN_DATE};
pub use ordering::{is_run_contiguous, sort_group_sums, SortKey};
pub use primitives::{GroupKey, MatchId, KEY_SEPARATOR};
pub use score::{
    normalize_and_parse, parse_score, LookupTableError, ParsedScore, ScoreParseError,
    SubstitutionTable,
};
