//! Stateless hashtag extraction from quoted-CSV social posts, and the monthly
//! rollup parser over the preprocessed hashtag CSV.

use crate::domain::{month_bucket, HashtagRecord, RecordError, PREPROCESSED_HEADER, UNKNOWN_DATE};
use chrono::NaiveDateTime;
use regex::Regex;

const FIELD_DELIMITER: &str = "\",\"";
const MIN_POST_FIELDS: usize = 6;
const ID_INDEX: usize = 1;
const TIMESTAMP_INDEX: usize = 2;
const TEXT_INDEX: usize = 5;

/// Post timestamp layout once the zone token is dropped,
/// e.g. `Mon Apr 06 22:19:45 2009`.
const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Y";
const ZONE_TOKEN_INDEX: usize = 4;

#[derive(Debug, Clone)]
pub struct HashtagExtractor {
    url: Regex,
    special: Regex,
    hashtag: Regex,
}

impl HashtagExtractor {
    pub fn new() -> Self {
        Self {
            url: Regex::new(r"https?://\S+").expect("valid url regex"),
            special: Regex::new(r"[^\w\s#]").expect("valid special-char regex"),
            hashtag: Regex::new(r"#(\w+)").expect("valid hashtag regex"),
        }
    }

    /// Extract every hashtag occurrence from one post line.
    ///
    /// A line with fewer than six `","`-delimited fields is malformed. An
    /// unparsable timestamp never fails the line; the date becomes
    /// `"unknown"`.
    pub fn extract(&self, line: &str) -> Result<Vec<HashtagRecord>, RecordError> {
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        if fields.len() < MIN_POST_FIELDS {
            return Err(RecordError::TooFewFields {
                found: fields.len(),
                max_index: TEXT_INDEX,
            });
        }

        let post_id = fields[ID_INDEX].replace('"', "");
        let timestamp = fields[TIMESTAMP_INDEX].replace('"', "");
        let text = self.clean_text(&fields[TEXT_INDEX].replace('"', ""));

        let date = parse_post_date(&timestamp).unwrap_or_else(|| {
            tracing::debug!(%timestamp, "unparsable post timestamp");
            UNKNOWN_DATE.to_string()
        });

        Ok(self
            .hashtag
            .captures_iter(&text)
            .map(|caps| HashtagRecord {
                post_id: post_id.clone(),
                date: date.clone(),
                hashtag: caps[1].to_lowercase(),
            })
            .collect())
    }

    /// Remove URLs, then everything except word characters, whitespace and `#`.
    pub fn clean_text(&self, text: &str) -> String {
        let without_urls = self.url.replace_all(text, "");
        self.special.replace_all(&without_urls, "").into_owned()
    }
}

impl Default for HashtagExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `EEE MMM dd HH:mm:ss zzz yyyy` into `yyyy-MM-dd`, using the
/// wall-clock date as written. The zone abbreviation is ignored.
pub fn parse_post_date(timestamp: &str) -> Option<String> {
    let mut tokens: Vec<&str> = timestamp.split_whitespace().collect();
    if tokens.len() != 6 {
        return None;
    }
    tokens.remove(ZONE_TOKEN_INDEX);
    NaiveDateTime::parse_from_str(&tokens.join(" "), TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
}

/// Parser for rows of the preprocessed hashtag CSV (`id,date,hash_tag,freq`).
pub struct MonthlyRollup;

impl MonthlyRollup {
    /// Map a row to its `yyyy-MM\t#tag` key and frequency. The header row
    /// yields `Ok(None)`.
    pub fn parse_row(line: &str) -> Result<Option<(String, i64)>, RecordError> {
        if line.contains(PREPROCESSED_HEADER) {
            return Ok(None);
        }

        let fields: Vec<&str> = line.trim_end_matches(&['\r', '\n'][..]).split(',').collect();
        if fields.len() < 4 {
            return Err(RecordError::TooFewFields {
                found: fields.len(),
                max_index: 3,
            });
        }

        let year_month = month_bucket(fields[1]);
        let hashtag = fields[2];
        let freq = fields[3]
            .trim()
            .parse::<u32>()
            .map_err(|_| RecordError::InvalidCount(fields[3].to_string()))?;

        Ok(Some((format!("{}\t{}", year_month, hashtag), i64::from(freq))))
    }
}
