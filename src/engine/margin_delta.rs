use crate::audit::AuditSink;
use crate::domain::{
    normalize_and_parse, DeltaRecord, EventFields, KeyVariant, MatchId, RawEventRecord,
    RecordError, SubstitutionTable,
};
use std::sync::Arc;

use super::ExtractStats;

/// Match-boundary state of one partition.
///
/// Owned by exactly one extractor run. Two partitions that each see part of
/// the same match will each rebuild their own view of "first record" and
/// "boundary", so a match must never be split across partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchCursor {
    pub current_match_id: Option<MatchId>,
    pub previous_margin: u32,
    pub seen_first: bool,
}

impl MatchCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the cursor with one successfully parsed event.
    ///
    /// Returns the new cursor and the delta to emit, if any. The first event
    /// ever seen and the first event of a new match never emit.
    pub fn advance(self, match_id: MatchId, margin: u32) -> (MatchCursor, Advance) {
        if !self.seen_first {
            let next = MatchCursor {
                current_match_id: Some(match_id),
                previous_margin: margin,
                seen_first: true,
            };
            return (next, Advance::First);
        }

        if self.current_match_id != Some(match_id) {
            // The boundary row's own margin is dropped; the next row of the
            // new match diffs against zero.
            let next = MatchCursor {
                current_match_id: Some(match_id),
                previous_margin: 0,
                seen_first: true,
            };
            return (next, Advance::Boundary);
        }

        let delta = i64::from(margin.abs_diff(self.previous_margin));
        let next = MatchCursor {
            previous_margin: margin,
            ..self
        };
        (next, Advance::Delta(delta))
    }
}

/// Result of advancing a [`MatchCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    First,
    Boundary,
    Delta(i64),
}

/// Outcome of feeding one line to the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Delta {
        record: DeltaRecord,
        event: EventFields,
    },
    FirstRecord,
    MatchBoundary,
    Skipped(RecordError),
}

/// Everything a partition run produces.
#[derive(Debug, Clone, Default)]
pub struct PartitionOutput {
    pub cursor: MatchCursor,
    pub deltas: Vec<DeltaRecord>,
    pub stats: ExtractStats,
}

/// Turns an ordered stream of match-event lines into margin deltas.
#[derive(Debug, Clone)]
pub struct MarginDeltaExtractor {
    variant: KeyVariant,
    table: Arc<SubstitutionTable>,
}

impl MarginDeltaExtractor {
    pub fn new(variant: KeyVariant, table: Arc<SubstitutionTable>) -> Self {
        Self { variant, table }
    }

    pub fn variant(&self) -> KeyVariant {
        self.variant
    }

    /// Process one line. Skipped lines return the cursor untouched.
    pub fn step(&self, cursor: MatchCursor, line: &str) -> (MatchCursor, Step) {
        let event = match self.accept(line) {
            Ok(event) => event,
            Err(err) => return (cursor, Step::Skipped(err)),
        };
        let (match_id, margin) = match self.measure(&event) {
            Ok(measured) => measured,
            Err(err) => return (cursor, Step::Skipped(err)),
        };

        match cursor.advance(match_id, margin) {
            (next, Advance::First) => (next, Step::FirstRecord),
            (next, Advance::Boundary) => (next, Step::MatchBoundary),
            (next, Advance::Delta(delta)) => {
                let record = DeltaRecord {
                    group_key: event.group_key(self.variant),
                    delta,
                };
                (next, Step::Delta { record, event })
            }
        }
    }

    fn accept(&self, line: &str) -> Result<EventFields, RecordError> {
        RawEventRecord::parse_line(line).event_fields(self.variant)
    }

    fn measure(&self, event: &EventFields) -> Result<(MatchId, u32), RecordError> {
        let score = normalize_and_parse(&event.score_token, &self.table)?;
        let match_id = event.parse_match_id()?;
        Ok((match_id, score.margin()))
    }

    /// Fold a partition's lines, in arrival order, starting from `cursor`.
    ///
    /// Each emitted delta is also reported to `sink`. Sink failures are
    /// counted and logged but do not affect the returned deltas or cursor.
    pub fn fold_partition<'a, I>(
        &self,
        partition: usize,
        cursor: MatchCursor,
        lines: I,
        sink: &mut dyn AuditSink,
    ) -> PartitionOutput
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut output = PartitionOutput {
            cursor,
            ..PartitionOutput::default()
        };

        for (line_no, line) in lines.into_iter().enumerate() {
            output.stats.lines += 1;
            let (next, step) = self.step(output.cursor, line);
            output.cursor = next;

            match step {
                Step::Delta { record, event } => {
                    output.stats.accepted += 1;
                    output.stats.emitted += 1;
                    if let Err(e) = sink.record(&event, record.delta) {
                        output.stats.sink_failures += 1;
                        tracing::error!(partition, line = line_no + 1, error = %e, "audit sink write failed");
                    }
                    output.deltas.push(record);
                }
                Step::FirstRecord => {
                    output.stats.accepted += 1;
                    tracing::debug!(partition, line = line_no + 1, "first record of partition");
                }
                Step::MatchBoundary => {
                    output.stats.accepted += 1;
                    output.stats.match_boundaries += 1;
                    tracing::debug!(partition, line = line_no + 1, "match boundary");
                }
                Step::Skipped(reason) => {
                    output.stats.count_skip(&reason);
                    tracing::debug!(partition, line = line_no + 1, %reason, "skipping record");
                }
            }
        }

        if let Err(e) = sink.finish() {
            output.stats.sink_failures += 1;
            tracing::error!(partition, error = %e, "audit sink flush failed");
        }

        output
    }
}
