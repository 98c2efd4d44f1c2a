//! Raw match-event rows and the fields the delta pipelines read from them.

use crate::domain::{GroupKey, MatchId, ScoreParseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MATCH_ID_INDEX: usize = 2;
pub const PERIOD_INDEX: usize = 5;
pub const PLAYER_ID_INDEX: usize = 6;
pub const PLAYER_NAME_INDEX: usize = 7;
pub const TEAM_INDEX: usize = 11;
pub const SCORE_INDEX: usize = 24;

/// Why a single input record was skipped. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record has {found} fields, needs more than {max_index}")]
    TooFewFields { found: usize, max_index: usize },
    #[error("required field {0} is empty")]
    EmptyField(&'static str),
    #[error(transparent)]
    Score(#[from] ScoreParseError),
    #[error("match id {0:?} is not an integer")]
    InvalidMatchId(String),
    #[error("frequency {0:?} is not an integer")]
    InvalidCount(String),
}

impl RecordError {
    /// True for failures that count as parse failures rather than shape
    /// problems.
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            RecordError::Score(_) | RecordError::InvalidMatchId(_) | RecordError::InvalidCount(_)
        )
    }
}

/// Which identity deltas are attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyVariant {
    /// `team#period`
    Team,
    /// `playerId#playerName`
    Player,
}

impl KeyVariant {
    fn required_fields(&self) -> [(&'static str, usize); 4] {
        match self {
            KeyVariant::Team => [
                ("team", TEAM_INDEX),
                ("period", PERIOD_INDEX),
                ("score", SCORE_INDEX),
                ("match_id", MATCH_ID_INDEX),
            ],
            KeyVariant::Player => [
                ("player_id", PLAYER_ID_INDEX),
                ("player_name", PLAYER_NAME_INDEX),
                ("score", SCORE_INDEX),
                ("match_id", MATCH_ID_INDEX),
            ],
        }
    }
}

/// One comma-split input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEventRecord {
    fields: Vec<String>,
}

impl RawEventRecord {
    /// Split a line on `,`. No quoting rules apply to match-event rows.
    pub fn parse_line(line: &str) -> Self {
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        Self {
            fields: line.split(',').map(str::to_string).collect(),
        }
    }

    pub fn from_fields(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }

    /// Validate shape and pull out the fields the delta pipelines use.
    pub fn event_fields(&self, variant: KeyVariant) -> Result<EventFields, RecordError> {
        if self.fields.len() <= SCORE_INDEX {
            return Err(RecordError::TooFewFields {
                found: self.fields.len(),
                max_index: SCORE_INDEX,
            });
        }

        for (name, index) in variant.required_fields() {
            if self.field(index).is_empty() {
                return Err(RecordError::EmptyField(name));
            }
        }

        Ok(EventFields {
            match_id: self.field(MATCH_ID_INDEX).to_string(),
            period: self.field(PERIOD_INDEX).to_string(),
            player_id: self.field(PLAYER_ID_INDEX).to_string(),
            player_name: self.field(PLAYER_NAME_INDEX).to_string(),
            team: self.field(TEAM_INDEX).to_string(),
            score_token: self.field(SCORE_INDEX).to_string(),
        })
    }

    /// The raw match id field, used for partition routing. Empty when absent.
    pub fn match_id_field(&self) -> &str {
        self.field(MATCH_ID_INDEX)
    }
}

/// Fields of an accepted event row, still in string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFields {
    pub match_id: String,
    pub period: String,
    pub player_id: String,
    pub player_name: String,
    pub team: String,
    pub score_token: String,
}

impl EventFields {
    pub fn parse_match_id(&self) -> Result<MatchId, RecordError> {
        self.match_id
            .trim()
            .parse::<i64>()
            .map(MatchId::new)
            .map_err(|_| RecordError::InvalidMatchId(self.match_id.clone()))
    }

    pub fn group_key(&self, variant: KeyVariant) -> GroupKey {
        match variant {
            KeyVariant::Team => GroupKey::compose(&self.team, &self.period),
            KeyVariant::Player => GroupKey::compose(&self.player_id, &self.player_name),
        }
    }
}
