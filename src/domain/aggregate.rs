//! Records flowing between the extraction and aggregation stages.

use crate::domain::GroupKey;
use serde::{Deserialize, Serialize};

/// Absolute change in margin between two consecutive events of one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaRecord {
    pub group_key: GroupKey,
    pub delta: i64,
}

/// Sum of all deltas sharing a group key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSum {
    pub group_key: GroupKey,
    pub total: i64,
}

impl GroupSum {
    pub fn new(group_key: GroupKey, total: i64) -> Self {
        Self { group_key, total }
    }
}

/// Largest group total within one run of a super-key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMax {
    pub super_key: String,
    /// Sub-key of the first group of the run.
    pub period: String,
    pub max: i64,
}

impl RunMax {
    /// Human-readable line key used by the team-swing job.
    pub fn headline(&self) -> String {
        format!(
            "{} team has got the most in the {} quarter | score is:",
            self.super_key, self.period
        )
    }
}

/// Single global maximum across all group totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopScore {
    pub group_key: GroupKey,
    pub max: i64,
}
