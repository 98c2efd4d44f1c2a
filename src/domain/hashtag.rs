//! Hashtag occurrences extracted from social posts.

use serde::{Deserialize, Serialize};

/// Date used when a post timestamp cannot be parsed.
pub const UNKNOWN_DATE: &str = "unknown";

/// Header of the preprocessed hashtag CSV.
pub const PREPROCESSED_HEADER: &str = "id,date,hash_tag,freq";

/// One hashtag occurrence. `hashtag` is lowercase and stored without `#`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashtagRecord {
    pub post_id: String,
    /// `yyyy-MM-dd` or [`UNKNOWN_DATE`].
    pub date: String,
    pub hashtag: String,
}

impl HashtagRecord {
    /// Hashtag with its leading `#` restored.
    pub fn display_tag(&self) -> String {
        format!("#{}", self.hashtag)
    }

    /// Aggregation key for daily counts: `date\t#hashtag`.
    pub fn daily_key(&self) -> String {
        format!("{}\t{}", self.date, self.display_tag())
    }
}

/// Reduce a `yyyy-MM-dd` date to its `yyyy-MM` bucket. Anything without a
/// `-` (such as [`UNKNOWN_DATE`]) is returned unchanged.
pub fn month_bucket(date: &str) -> String {
    let mut parts = date.splitn(3, '-');
    match (parts.next(), parts.next()) {
        (Some(year), Some(month)) => format!("{}-{}", year, month),
        (Some(only), None) => only.to_string(),
        _ => date.to_string(),
    }
}
