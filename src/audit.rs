//! Observers for accepted delta events.
//!
//! Sinks see every emitted delta together with the fields of the row that
//! produced it. They are observational only: a sink failure is logged by the
//! caller and never changes pipeline output.

use crate::domain::{EventFields, KeyVariant};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("audit io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("audit csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Receives each accepted event and the delta it produced.
pub trait AuditSink: Send {
    fn record(&mut self, event: &EventFields, delta: i64) -> Result<(), SinkError>;

    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl AuditSink for NoopSink {
    fn record(&mut self, _event: &EventFields, _delta: i64) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Keeps audit rows in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub rows: Vec<(EventFields, i64)>,
}

impl AuditSink for MemorySink {
    fn record(&mut self, event: &EventFields, delta: i64) -> Result<(), SinkError> {
        self.rows.push((event.clone(), delta));
        Ok(())
    }
}

/// Feed collected rows to `sink`, then finish it.
///
/// Returns how many writes failed. Failures are logged and otherwise ignored.
pub fn replay(sink: &mut dyn AuditSink, rows: &[(EventFields, i64)]) -> u64 {
    let mut failures = 0;
    for (event, delta) in rows {
        if let Err(e) = sink.record(event, *delta) {
            failures += 1;
            tracing::error!(match_id = %event.match_id, error = %e, "audit sink write failed");
        }
    }
    if let Err(e) = sink.finish() {
        failures += 1;
        tracing::error!(error = %e, "audit sink flush failed");
    }
    failures
}

/// Writes audit rows as CSV, with a header chosen by the key variant.
pub struct CsvAuditSink<W: Write> {
    writer: csv::Writer<W>,
    variant: KeyVariant,
}

impl<W: Write> CsvAuditSink<W> {
    pub fn new(inner: W, variant: KeyVariant) -> Result<Self, SinkError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(Self::header(variant))?;
        Ok(Self { writer, variant })
    }

    pub fn header(variant: KeyVariant) -> &'static [&'static str] {
        match variant {
            KeyVariant::Team => &["game_id", "period_id", "player_id", "team", "score"],
            KeyVariant::Player => &["player_id", "player_name", "quarter", "score"],
        }
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|e| SinkError::Io(e.into_error()))
    }
}

impl CsvAuditSink<File> {
    /// Create (or truncate) an audit file.
    pub fn create(path: &Path, variant: KeyVariant) -> Result<Self, SinkError> {
        Self::new(File::create(path)?, variant)
    }
}

impl<W: Write + Send> AuditSink for CsvAuditSink<W> {
    fn record(&mut self, event: &EventFields, delta: i64) -> Result<(), SinkError> {
        let delta = delta.to_string();
        match self.variant {
            KeyVariant::Team => self.writer.write_record([
                event.match_id.as_str(),
                event.period.as_str(),
                event.player_id.as_str(),
                event.team.as_str(),
                delta.as_str(),
            ])?,
            KeyVariant::Player => self.writer.write_record([
                event.player_id.as_str(),
                event.player_name.as_str(),
                event.period.as_str(),
                delta.as_str(),
            ])?,
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> EventFields {
        EventFields {
            match_id: "21400001".to_string(),
            period: "3".to_string(),
            player_id: "201".to_string(),
            player_name: "Jones".to_string(),
            team: "LAL".to_string(),
            score_token: "50-48".to_string(),
        }
    }

    #[test]
    fn csv_sink_team_rows() {
        let mut sink = CsvAuditSink::new(Vec::new(), KeyVariant::Team).unwrap();
        sink.record(&event(), 4).unwrap();
        let bytes = sink.into_inner().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "game_id,period_id,player_id,team,score\n21400001,3,201,LAL,4\n"
        );
    }

    #[test]
    fn csv_sink_player_rows() {
        let mut sink = CsvAuditSink::new(Vec::new(), KeyVariant::Player).unwrap();
        sink.record(&event(), 2).unwrap();
        let bytes = sink.into_inner().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "player_id,player_name,quarter,score\n201,Jones,3,2\n"
        );
    }

    struct RejectingSink;

    impl AuditSink for RejectingSink {
        fn record(&mut self, _event: &EventFields, _delta: i64) -> Result<(), SinkError> {
            Err(SinkError::Io(std::io::Error::other("read-only")))
        }
    }

    #[test]
    fn replay_writes_rows_in_order() {
        let rows = vec![(event(), 4), (event(), 1)];
        let mut sink = CsvAuditSink::new(Vec::new(), KeyVariant::Player).unwrap();
        assert_eq!(replay(&mut sink, &rows), 0);
        assert_eq!(
            String::from_utf8(sink.into_inner().unwrap()).unwrap(),
            "player_id,player_name,quarter,score\n201,Jones,3,4\n201,Jones,3,1\n"
        );
    }

    #[test]
    fn replay_counts_failed_writes() {
        let rows = vec![(event(), 4), (event(), 1)];
        assert_eq!(replay(&mut RejectingSink, &rows), 2);
    }

    #[test]
    fn memory_sink_collects_rows() {
        let mut sink = MemorySink::default();
        sink.record(&event(), 7).unwrap();
        assert_eq!(sink.rows.len(), 1);
        assert_eq!(sink.rows[0].1, 7);
    }
}
