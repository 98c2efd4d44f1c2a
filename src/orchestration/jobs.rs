//! The jobs the binary can run, and the pure per-stage functions behind them.

use crate::config::{Config, MaxStrategy, OutputSeparator};
use crate::domain::{GroupSum, KeyVariant, PREPROCESSED_HEADER};
use crate::engine::{
    group_then_scan, ExtractStats, HashtagExtractor, MonthlyRollup, RunningMaxByAdjacentGroup,
    SumAggregator, TopScorer,
};
use crate::orchestration::shuffle::{prepare_for_max, sorted_totals};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum JobKind {
    /// Largest per-period margin swing for each team.
    TeamSwing,
    /// Margin swing totals for every team and period.
    TeamTotals,
    /// The single player with the largest margin swing.
    TopPlayer,
    /// Hashtag counts per day.
    HashtagsDaily,
    /// One CSV row per hashtag occurrence.
    HashtagsPreprocess,
    /// Monthly hashtag totals from the preprocessed CSV.
    HashtagsMonthly,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::TeamSwing => "team-swing",
            JobKind::TeamTotals => "team-totals",
            JobKind::TopPlayer => "top-player",
            JobKind::HashtagsDaily => "hashtags-daily",
            JobKind::HashtagsPreprocess => "hashtags-preprocess",
            JobKind::HashtagsMonthly => "hashtags-monthly",
        }
    }

    /// Key variant for the margin-delta jobs, `None` for hashtag jobs.
    pub fn key_variant(&self) -> Option<KeyVariant> {
        match self {
            JobKind::TeamSwing | JobKind::TeamTotals => Some(KeyVariant::Team),
            JobKind::TopPlayer => Some(KeyVariant::Player),
            JobKind::HashtagsDaily | JobKind::HashtagsPreprocess | JobKind::HashtagsMonthly => {
                None
            }
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-chunk stage of a hashtag job.
pub type ChunkFn = fn(&HashtagExtractor, usize, &[String]) -> ChunkOutput;

/// Output lines of one partition of a stateless job.
#[derive(Debug, Clone, Default)]
pub struct ChunkOutput {
    pub pairs: Vec<(String, i64)>,
    pub rows: Vec<String>,
    pub stats: ExtractStats,
}

fn key_value_line(key: &str, value: i64, separator: OutputSeparator) -> String {
    format!("{}{}{}", key, separator.as_str(), value)
}

/// Final stage of the margin-delta jobs, run over summed groups.
pub fn finish_margin_job(job: JobKind, sums: Vec<GroupSum>, config: &Config) -> Vec<String> {
    let sep = config.output_separator;
    match job {
        JobKind::TeamSwing => {
            let runs = match config.max_strategy {
                MaxStrategy::Adjacent => {
                    let ordered = prepare_for_max(sums, config.sort_key);
                    RunningMaxByAdjacentGroup::run(&ordered, config.flush_final_run)
                }
                MaxStrategy::GroupScan => {
                    let ordered = prepare_for_max(sums, config.sort_key);
                    group_then_scan(&ordered)
                }
            };
            runs.iter()
                .map(|run| key_value_line(&run.headline(), run.max, sep))
                .collect()
        }
        JobKind::TeamTotals => sorted_totals(sums)
            .iter()
            .map(|s| key_value_line(s.group_key.as_str(), s.total, sep))
            .collect(),
        JobKind::TopPlayer => {
            let mut top = TopScorer::new();
            for sum in &sums {
                top.push(sum);
            }
            top.finish()
                .map(|best| key_value_line(best.group_key.as_str(), best.max, sep))
                .into_iter()
                .collect()
        }
        JobKind::HashtagsDaily | JobKind::HashtagsPreprocess | JobKind::HashtagsMonthly => {
            Vec::new()
        }
    }
}

/// Extract `(date\t#tag, 1)` pairs from a chunk of post lines.
pub fn extract_daily(extractor: &HashtagExtractor, partition: usize, lines: &[String]) -> ChunkOutput {
    let mut out = ChunkOutput::default();
    for (line_no, line) in lines.iter().enumerate() {
        out.stats.lines += 1;
        match extractor.extract(line) {
            Ok(records) => {
                out.stats.accepted += 1;
                out.stats.emitted += records.len() as u64;
                out.pairs
                    .extend(records.iter().map(|r| (r.daily_key(), 1)));
            }
            Err(reason) => {
                out.stats.count_skip(&reason);
                tracing::warn!(partition, line = line_no + 1, %reason, "skipping post");
            }
        }
    }
    out
}

/// Turn a chunk of post lines into preprocessed CSV rows, in input order.
pub fn extract_rows(extractor: &HashtagExtractor, partition: usize, lines: &[String]) -> ChunkOutput {
    let mut out = ChunkOutput::default();
    for (line_no, line) in lines.iter().enumerate() {
        out.stats.lines += 1;
        match extractor.extract(line) {
            Ok(records) => {
                out.stats.accepted += 1;
                out.stats.emitted += records.len() as u64;
                out.rows.extend(records.iter().map(|r| {
                    format!("{},{},{},1", r.post_id, r.date, r.display_tag())
                }));
            }
            Err(reason) => {
                out.stats.count_skip(&reason);
                tracing::warn!(partition, line = line_no + 1, %reason, "skipping post");
            }
        }
    }
    out
}

/// Parse a chunk of preprocessed CSV rows into `(yyyy-MM\t#tag, freq)` pairs.
pub fn extract_monthly(partition: usize, lines: &[String]) -> ChunkOutput {
    let mut out = ChunkOutput::default();
    for (line_no, line) in lines.iter().enumerate() {
        out.stats.lines += 1;
        match MonthlyRollup::parse_row(line) {
            Ok(Some(pair)) => {
                out.stats.accepted += 1;
                out.stats.emitted += 1;
                out.pairs.push(pair);
            }
            Ok(None) => {}
            Err(reason) => {
                out.stats.count_skip(&reason);
                tracing::warn!(partition, line = line_no + 1, %reason, "skipping row");
            }
        }
    }
    out
}

fn monthly_chunk(_extractor: &HashtagExtractor, partition: usize, lines: &[String]) -> ChunkOutput {
    extract_monthly(partition, lines)
}

/// Per-chunk function of a hashtag job. `None` for margin-delta jobs.
pub fn chunk_stage(job: JobKind) -> Option<ChunkFn> {
    match job {
        JobKind::HashtagsDaily => Some(extract_daily as ChunkFn),
        JobKind::HashtagsPreprocess => Some(extract_rows as ChunkFn),
        JobKind::HashtagsMonthly => Some(monthly_chunk as ChunkFn),
        JobKind::TeamSwing | JobKind::TeamTotals | JobKind::TopPlayer => None,
    }
}

/// Final stage of the hashtag jobs over the merged chunk outputs.
pub fn finish_hashtag_job(
    job: JobKind,
    chunks: Vec<ChunkOutput>,
    separator: OutputSeparator,
) -> Vec<String> {
    match job {
        JobKind::HashtagsPreprocess => std::iter::once(PREPROCESSED_HEADER.to_string())
            .chain(chunks.into_iter().flat_map(|c| c.rows))
            .collect(),
        JobKind::HashtagsDaily | JobKind::HashtagsMonthly => {
            SumAggregator::aggregate(chunks.into_iter().flat_map(|c| c.pairs))
                .into_iter()
                .map(|(key, total)| key_value_line(&key, total, separator))
                .collect()
        }
        JobKind::TeamSwing | JobKind::TeamTotals | JobKind::TopPlayer => Vec::new(),
    }
}
