//! Domain primitives: MatchId, GroupKey.

use serde::{Deserialize, Serialize};

/// Separator between the super-key and the sub-key of a [`GroupKey`].
pub const KEY_SEPARATOR: char = '#';

/// Numeric match identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchId(pub i64);

impl MatchId {
    /// Create a MatchId from its numeric value.
    pub fn new(id: i64) -> Self {
        MatchId(id)
    }

    /// Get the underlying numeric value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Aggregation key of the form `super#sub` (e.g. `team#period`,
/// `playerId#playerName`).
///
/// Stored in its rendered form so that equality, hashing and ordering all
/// agree with the byte-lexicographic order a sort-based shuffle applies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    /// Compose a key from its two components.
    pub fn compose(super_key: &str, sub_key: &str) -> Self {
        GroupKey(format!("{}{}{}", super_key, KEY_SEPARATOR, sub_key))
    }

    /// Wrap an already rendered key.
    pub fn from_rendered(rendered: String) -> Self {
        GroupKey(rendered)
    }

    /// The coarse prefix before the first separator. A key without a
    /// separator is its own super-key.
    pub fn super_key(&self) -> &str {
        match self.0.split_once(KEY_SEPARATOR) {
            Some((head, _)) => head,
            None => &self.0,
        }
    }

    /// Everything after the first separator, or `""` when there is none.
    pub fn sub_key(&self) -> &str {
        match self.0.split_once(KEY_SEPARATOR) {
            Some((_, tail)) => tail,
            None => "",
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
