//! Line sources feeding the pipelines.

use async_trait::async_trait;
use std::fmt;

pub mod file;
pub mod mock;

pub use file::FileLineSource;
pub use mock::MockLineSource;

/// Source of newline-delimited input records.
///
/// Implementations return lines in their original order with line
/// terminators removed. Blank lines are dropped.
#[async_trait]
pub trait LineSource: Send + Sync + fmt::Debug {
    /// Read every line of the input.
    async fn read_lines(&self) -> Result<Vec<String>, SourceError>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

/// Error type for line sources. Always fatal for the stage reading it.
#[derive(Debug, Clone)]
pub enum SourceError {
    /// Underlying I/O failure (missing file, permissions).
    Io(String),
    /// Input bytes could not be decoded (bad LZ4 frame, invalid UTF-8).
    Decode(String),
    /// Other error
    Other(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io(msg) => write!(f, "IO error: {}", msg),
            SourceError::Decode(msg) => write!(f, "Decode error: {}", msg),
            SourceError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for SourceError {}

/// Split decoded text into non-blank lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
