//! Pure transformation engines for the extraction and aggregation stages.

use crate::domain::RecordError;
use serde::{Deserialize, Serialize};

pub mod hashtag;
pub mod margin_delta;
pub mod running_max;
pub mod sum;

pub use hashtag::{HashtagExtractor, MonthlyRollup};
pub use margin_delta::{Advance, MarginDeltaExtractor, MatchCursor, PartitionOutput, Step};
pub use running_max::{group_then_scan, RunMaxState, RunningMaxByAdjacentGroup, TopScorer};
pub use sum::SumAggregator;

/// Per-record counters surfaced after each stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractStats {
    pub lines: u64,
    pub accepted: u64,
    pub malformed: u64,
    pub parse_failures: u64,
    pub emitted: u64,
    pub match_boundaries: u64,
    pub sink_failures: u64,
}

impl ExtractStats {
    pub fn count_skip(&mut self, reason: &RecordError) {
        if reason.is_parse_failure() {
            self.parse_failures += 1;
        } else {
            self.malformed += 1;
        }
    }

    pub fn skipped(&self) -> u64 {
        self.malformed + self.parse_failures
    }

    pub fn merge(&mut self, other: &ExtractStats) {
        self.lines += other.lines;
        self.accepted += other.accepted;
        self.malformed += other.malformed;
        self.parse_failures += other.parse_failures;
        self.emitted += other.emitted;
        self.match_boundaries += other.match_boundaries;
        self.sink_failures += other.sink_failures;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScoreParseError;

    #[test]
    fn test_count_skip_classifies_reasons() {
        let mut stats = ExtractStats::default();
        stats.count_skip(&RecordError::EmptyField("team"));
        stats.count_skip(&RecordError::Score(ScoreParseError::MissingSeparator("x".into())));
        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.parse_failures, 1);
        assert_eq!(stats.skipped(), 2);
    }

    #[test]
    fn test_merge_adds_counters() {
        let mut a = ExtractStats {
            lines: 3,
            emitted: 1,
            ..Default::default()
        };
        let b = ExtractStats {
            lines: 2,
            malformed: 1,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.lines, 5);
        assert_eq!(a.malformed, 1);
        assert_eq!(a.emitted, 1);
    }
}
