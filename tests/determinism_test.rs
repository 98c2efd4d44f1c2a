//! Output must not depend on partition count, strategy or repeated runs.

mod common;

use common::{event, test_config};
use scoreswing::{Config, JobKind, MaxStrategy, MockLineSource, Pipeline};

const TEAMS: [&str; 4] = ["LAL", "BOS", "NYK", "CHI"];
const PLAYERS: [(&str, &str); 5] = [
    ("201", "Jones"),
    ("305", "Smith"),
    ("77", "Lee"),
    ("12", "Ortiz"),
    ("48", "Novak"),
];

/// Thirty matches of twelve events each. Every match opens
/// at 0-0, so a match's deltas do not depend on whether it is the first one
/// its partition sees.
fn season() -> Vec<String> {
    let mut lines = Vec::new();
    for m in 0..30u32 {
        let match_id = (21400000 + m).to_string();
        let (mut home, mut visitor) = (0u32, 0u32);
        lines.push(event(&match_id, "1", PLAYERS[0], TEAMS[0], "0-0"));
        for e in 1..12u32 {
            if (m + e) % 3 == 0 {
                visitor += 2 + (m * e) % 2;
            } else {
                home += 1 + (m + 2 * e) % 3;
            }
            let period = (1 + e / 3).to_string();
            let team = TEAMS[((m + e) % 4) as usize];
            let player = PLAYERS[((m * 3 + e) % 5) as usize];
            lines.push(event(&match_id, &period, player, team, &format!("{}-{}", home, visitor)));
            if e == 7 && m % 5 == 0 {
                lines.push("broken,line".to_string());
            }
        }
    }
    lines
}

async fn digest(config: Config, job: JobKind) -> (String, Vec<String>) {
    let source = MockLineSource::new().with_lines(season());
    let run = Pipeline::new(config).run(job, &source).await.unwrap();
    (run.report.output_digest, run.lines)
}

#[tokio::test]
async fn same_output_for_1_2_and_8_partitions() {
    for job in [JobKind::TeamSwing, JobKind::TeamTotals, JobKind::TopPlayer] {
        let (baseline, lines) = digest(test_config(1), job).await;
        assert!(!lines.is_empty(), "{} produced no output", job);
        for partitions in [2, 8] {
            let (other, _) = digest(test_config(partitions), job).await;
            assert_eq!(baseline, other, "{} differs with {} partitions", job, partitions);
        }
    }
}

#[tokio::test]
async fn repeated_runs_are_identical() {
    let (first, _) = digest(test_config(4), JobKind::TeamSwing).await;
    let (second, _) = digest(test_config(4), JobKind::TeamSwing).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn group_scan_agrees_with_adjacent_runs() {
    let group_scan = Config {
        max_strategy: MaxStrategy::GroupScan,
        ..test_config(8)
    };
    let (adjacent, lines) = digest(test_config(8), JobKind::TeamSwing).await;
    let (scanned, _) = digest(group_scan, JobKind::TeamSwing).await;
    assert_eq!(adjacent, scanned);
    assert_eq!(lines.len(), TEAMS.len());
}
