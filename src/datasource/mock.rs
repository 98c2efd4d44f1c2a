//! In-memory line source for tests.

use super::{LineSource, SourceError};
use async_trait::async_trait;

/// Mock line source that returns predefined lines.
#[derive(Debug, Clone, Default)]
pub struct MockLineSource {
    lines: Vec<String>,
    failure: Option<SourceError>,
}

impl MockLineSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line to the mock source.
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Add multiple lines to the mock source.
    pub fn with_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Make every read fail with `error`.
    pub fn failing(mut self, error: SourceError) -> Self {
        self.failure = Some(error);
        self
    }
}

#[async_trait]
impl LineSource for MockLineSource {
    async fn read_lines(&self) -> Result<Vec<String>, SourceError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.lines.clone()),
        }
    }

    fn describe(&self) -> String {
        format!("mock ({} lines)", self.lines.len())
    }
}
