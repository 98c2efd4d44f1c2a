//! Drives a job end to end: load, partition, extract, shuffle, aggregate,
//! write.

use crate::audit::{replay, AuditSink, CsvAuditSink, MemorySink, NoopSink};
use crate::config::Config;
use crate::datasource::LineSource;
use crate::domain::{KeyVariant, SubstitutionTable};
use crate::engine::{ExtractStats, HashtagExtractor, MarginDeltaExtractor, MatchCursor};
use crate::error::PipelineError;
use crate::orchestration::jobs::{chunk_stage, finish_hashtag_job, finish_margin_job, JobKind};
use crate::orchestration::partition::Partitioner;
use crate::orchestration::report::{output_digest, PipelineReport};
use crate::orchestration::shuffle::group_deltas;
use chrono::Utc;
use futures::future::try_join_all;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Output lines of a finished run and its report.
#[derive(Debug, Clone)]
pub struct JobRun {
    pub lines: Vec<String>,
    pub report: PipelineReport,
}

struct StageOutput {
    lines: Vec<String>,
    stats: ExtractStats,
    groups: u64,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run `job` over everything `source` yields.
    pub async fn run(&self, job: JobKind, source: &dyn LineSource) -> Result<JobRun, PipelineError> {
        let started_at = Utc::now();
        let run_id = Uuid::new_v4();
        tracing::info!(%run_id, %job, input = %source.describe(), partitions = self.config.partitions, "starting job");

        let stage = match job.key_variant() {
            Some(variant) => self.run_margin_job(job, variant, source).await?,
            None => self.run_hashtag_job(job, source).await?,
        };

        let report = PipelineReport {
            run_id,
            job,
            input: source.describe(),
            partitions: self.config.partitions,
            started_at,
            finished_at: Utc::now(),
            stats: stage.stats,
            groups: stage.groups,
            output_lines: stage.lines.len() as u64,
            output_digest: output_digest(&stage.lines),
        };

        tracing::info!(
            %run_id,
            %job,
            lines = report.stats.lines,
            accepted = report.stats.accepted,
            malformed = report.stats.malformed,
            parse_failures = report.stats.parse_failures,
            emitted = report.stats.emitted,
            output_lines = report.output_lines,
            "job finished"
        );

        Ok(JobRun {
            lines: stage.lines,
            report,
        })
    }

    /// Run `job` and write its output lines to `output`, plus the JSON report
    /// at [`PipelineReport::path_for`].
    pub async fn run_to_file(
        &self,
        job: JobKind,
        source: &dyn LineSource,
        output: &Path,
    ) -> Result<PipelineReport, PipelineError> {
        let run = self.run(job, source).await?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut body = String::new();
        for line in &run.lines {
            body.push_str(line);
            body.push('\n');
        }
        tokio::fs::write(output, body).await?;

        let report_path = PipelineReport::path_for(output);
        tokio::fs::write(&report_path, serde_json::to_vec_pretty(&run.report)?).await?;
        tracing::info!(output = %output.display(), report = %report_path.display(), "output written");

        Ok(run.report)
    }

    async fn run_margin_job(
        &self,
        job: JobKind,
        variant: KeyVariant,
        source: &dyn LineSource,
    ) -> Result<StageOutput, PipelineError> {
        // Fatal problems surface before any record is read.
        let table = Arc::new(SubstitutionTable::load(&self.config.lookup_table_path).await?);
        tracing::info!(entries = table.len(), path = %self.config.lookup_table_path.display(), "lookup table loaded");
        let audit = match self.config.audit_path.clone() {
            Some(path) => Some(
                tokio::task::spawn_blocking(move || CsvAuditSink::create(&path, variant)).await??,
            ),
            None => None,
        };

        let lines = source.read_lines().await?;
        let partitioner = Partitioner::new(self.config.partitions);
        let parts = partitioner.split_events(lines);

        let extractor = MarginDeltaExtractor::new(variant, table);
        let collect_audit = audit.is_some();
        let workers = parts.into_iter().enumerate().map(|(partition, lines)| {
            let extractor = extractor.clone();
            tokio::task::spawn_blocking(move || {
                let mut memory = MemorySink::default();
                let mut noop = NoopSink;
                let sink: &mut dyn AuditSink = if collect_audit {
                    &mut memory
                } else {
                    &mut noop
                };
                let output = extractor.fold_partition(
                    partition,
                    MatchCursor::new(),
                    lines.iter().map(String::as_str),
                    sink,
                );
                (output, memory.rows)
            })
        });
        let results = try_join_all(workers).await?;

        let mut stats = ExtractStats::default();
        let mut deltas = Vec::new();
        let mut audit_rows = Vec::new();
        for (partition, (output, rows)) in results.into_iter().enumerate() {
            tracing::debug!(
                partition,
                lines = output.stats.lines,
                emitted = output.stats.emitted,
                skipped = output.stats.skipped(),
                "partition finished"
            );
            stats.merge(&output.stats);
            deltas.extend(output.deltas);
            audit_rows.extend(rows);
        }
        if let Some(mut sink) = audit {
            stats.sink_failures +=
                tokio::task::spawn_blocking(move || replay(&mut sink, &audit_rows)).await?;
        }
        if stats.skipped() > 0 {
            tracing::warn!(
                malformed = stats.malformed,
                parse_failures = stats.parse_failures,
                "records skipped"
            );
        }

        let sums = group_deltas(deltas);
        let groups = sums.len() as u64;
        let lines = finish_margin_job(job, sums, &self.config);

        Ok(StageOutput {
            lines,
            stats,
            groups,
        })
    }

    async fn run_hashtag_job(
        &self,
        job: JobKind,
        source: &dyn LineSource,
    ) -> Result<StageOutput, PipelineError> {
        let Some(stage) = chunk_stage(job) else {
            return Ok(StageOutput {
                lines: Vec::new(),
                stats: ExtractStats::default(),
                groups: 0,
            });
        };

        let lines = source.read_lines().await?;
        let chunks = Partitioner::new(self.config.partitions).chunk(lines);

        let extractor = HashtagExtractor::new();
        let workers = chunks.into_iter().enumerate().map(|(partition, lines)| {
            let extractor = extractor.clone();
            tokio::task::spawn_blocking(move || stage(&extractor, partition, &lines))
        });
        let outputs = try_join_all(workers).await?;

        let mut stats = ExtractStats::default();
        for output in &outputs {
            stats.merge(&output.stats);
        }

        let lines = finish_hashtag_job(job, outputs, self.config.output_separator);
        let groups = match job {
            JobKind::HashtagsPreprocess => 0,
            _ => lines.len() as u64,
        };

        Ok(StageOutput {
            lines,
            stats,
            groups,
        })
    }
}
