//! Score tokens: substitution-table normalization and `home-visitor` parsing.

use serde_json::Value;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading the substitution table. Always fatal for the enclosing stage.
#[derive(Debug, Error)]
pub enum LookupTableError {
    #[error("failed to read lookup table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("lookup table is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("lookup table must be a JSON object")]
    NotAnObject,
    #[error("lookup table value for {0:?} must be a string or a number")]
    InvalidValue(String),
}

/// Per-record score failure. Callers skip the record and leave the cursor as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreParseError {
    #[error("score token {0:?} has no '-' separator")]
    MissingSeparator(String),
    #[error("score token {0:?} is not a pair of unsigned integers")]
    InvalidNumber(String),
    #[error("score token {0:?} has a side outside the 32-bit unsigned range")]
    OutOfRange(String),
}

/// Token substitutions applied to raw score tokens before parsing
/// (e.g. spreadsheet-mangled `10-Jan` back to `10-1`).
///
/// Entries are kept longest key first, then lexicographically, so that
/// lookups are deterministic and `June` wins over `Jun`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionTable {
    entries: Vec<(String, String)>,
}

impl SubstitutionTable {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut entries: Vec<(String, String)> = entries
            .into_iter()
            .filter(|(key, _)| !key.is_empty())
            .collect();
        entries.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        entries.dedup_by(|a, b| a.0 == b.0);
        Self { entries }
    }

    /// Parse a JSON object of `token -> replacement`. Numeric replacements are
    /// rendered with their JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, LookupTableError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(map) = value else {
            return Err(LookupTableError::NotAnObject);
        };

        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            let replacement = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                _ => return Err(LookupTableError::InvalidValue(key)),
            };
            entries.push((key, replacement));
        }
        Ok(Self::new(entries))
    }

    /// Load the table from a JSON file.
    pub async fn load(path: &Path) -> Result<Self, LookupTableError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LookupTableError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json_str(&content)
    }

    /// Replace every occurrence of the first matching key. Tokens with no
    /// matching key are returned unchanged.
    pub fn normalize<'a>(&self, token: &'a str) -> Cow<'a, str> {
        for (key, replacement) in &self.entries {
            if token.contains(key.as_str()) {
                return Cow::Owned(token.replace(key.as_str(), replacement));
            }
        }
        Cow::Borrowed(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A parsed `home-visitor` score pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedScore {
    pub home: u32,
    pub visitor: u32,
}

impl ParsedScore {
    /// Absolute difference between the two scores.
    pub fn margin(&self) -> u32 {
        self.home.abs_diff(self.visitor)
    }
}

/// Split a normalized token on its first `-` into two unsigned 32-bit scores.
///
/// Each side must be plain ASCII digits after trimming; a sign on either side
/// (`5--3`, `+5-3`) is rejected.
pub fn parse_score(normalized: &str) -> Result<ParsedScore, ScoreParseError> {
    let (home, visitor) = normalized
        .split_once('-')
        .ok_or_else(|| ScoreParseError::MissingSeparator(normalized.to_string()))?;

    let parse = |side: &str| {
        let side = side.trim();
        if side.is_empty() || !side.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ScoreParseError::InvalidNumber(normalized.to_string()));
        }
        side.parse::<u32>().map_err(|_| ScoreParseError::OutOfRange(normalized.to_string()))
    };

    Ok(ParsedScore {
        home: parse(home)?,
        visitor: parse(visitor)?,
    })
}

/// Normalize a raw token through `table` and parse it.
pub fn normalize_and_parse(
    token: &str,
    table: &SubstitutionTable,
) -> Result<ParsedScore, ScoreParseError> {
    parse_score(&table.normalize(token))
}
