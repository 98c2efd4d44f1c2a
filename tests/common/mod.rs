//! Shared fixtures for integration tests.
#![allow(dead_code)]

use scoreswing::Config;
use std::path::PathBuf;

/// Build a 25-field match-event row.
pub fn event(match_id: &str, period: &str, player: (&str, &str), team: &str, score: &str) -> String {
    let mut fields = vec![String::new(); 25];
    fields[0] = "evt".to_string();
    fields[2] = match_id.to_string();
    fields[5] = period.to_string();
    fields[6] = player.0.to_string();
    fields[7] = player.1.to_string();
    fields[11] = team.to_string();
    fields[24] = score.to_string();
    fields.join(",")
}

pub fn shipped_lookup_table() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources/month_to_score.json")
}

pub fn test_config(partitions: u16) -> Config {
    Config {
        lookup_table_path: shipped_lookup_table(),
        partitions,
        ..Config::default()
    }
}

/// Two matches, each opening 0-0, plus one malformed row and one bad score.
pub fn two_match_fixture() -> Vec<String> {
    vec![
        event("100", "1", ("201", "Jones"), "LAL", "0-0"),
        event("100", "1", ("201", "Jones"), "LAL", "2-0"),
        event("100", "1", ("305", "Smith"), "BOS", "2-3"),
        event("100", "1", ("305", "Smith"), "BOS", "x-y"),
        event("100", "2", ("201", "Jones"), "LAL", "7-3"),
        event("100", "2", ("305", "Smith"), "BOS", "7-Oct"),
        "truncated,row,100".to_string(),
        event("200", "1", ("305", "Smith"), "BOS", "0-0"),
        event("200", "1", ("305", "Smith"), "BOS", "0-5"),
        event("200", "2", ("201", "Jones"), "LAL", "4-5"),
    ]
}

pub const POSTS: [&str; 5] = [
    r#""0","1467810369","Mon Apr 06 22:19:45 PDT 2009","NO_QUERY","user","Just another #Example tweet""#,
    r##""0","1467810370","Mon Apr 06 23:00:00 PDT 2009","NO_QUERY","user","#example again http://t.co/#notatag""##,
    r##""4","1467810371","Tue May 05 10:00:00 PDT 2009","NO_QUERY","user","#Rust is #fun!""##,
    r##""4","1467810372","not a date","NO_QUERY","user","#Fun""##,
    "just,a,line",
];
