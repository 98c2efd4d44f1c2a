//! Run summary written next to the job output.

use crate::engine::ExtractStats;
use crate::orchestration::jobs::JobKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub job: JobKind,
    pub input: String,
    pub partitions: u16,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub stats: ExtractStats,
    /// Distinct keys after the sum stage.
    pub groups: u64,
    pub output_lines: u64,
    /// SHA-256 over the output lines, each terminated by `\n`.
    pub output_digest: String,
}

impl PipelineReport {
    /// Where the report for `output` is written: `<output>.report.json`.
    pub fn path_for(output: &Path) -> PathBuf {
        let mut name = output
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".report.json");
        output.with_file_name(name)
    }
}

/// Hex SHA-256 of the lines as they are written to disk.
pub fn output_digest(lines: &[String]) -> String {
    let mut hasher = Sha256::new();
    for line in lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}
