//! In-process stand-in for the sort/group step between stages.

use crate::domain::{is_run_contiguous, sort_group_sums, DeltaRecord, GroupKey, GroupSum, SortKey};
use crate::engine::SumAggregator;
use std::collections::HashMap;

/// Sum deltas per group key.
///
/// Groups come back in the order their key was first emitted, which is what
/// a consumer that only sees super-key order would observe. Totals do not
/// depend on input order.
pub fn group_deltas(deltas: Vec<DeltaRecord>) -> Vec<GroupSum> {
    let mut first_seen: Vec<GroupKey> = Vec::new();
    let mut values: HashMap<GroupKey, Vec<i64>> = HashMap::new();

    for record in deltas {
        values
            .entry(record.group_key.clone())
            .or_insert_with(|| {
                first_seen.push(record.group_key.clone());
                Vec::new()
            })
            .push(record.delta);
    }

    first_seen
        .into_iter()
        .map(|key| {
            let total = SumAggregator::sum(values.remove(&key).unwrap_or_default());
            GroupSum::new(key, total)
        })
        .collect()
}

/// Order group sums for the running-max stage.
///
/// Both sort keys make every super-key contiguous; a violation is logged
/// because the adjacent-run strategy would then split that super-key.
pub fn prepare_for_max(mut sums: Vec<GroupSum>, sort_key: SortKey) -> Vec<GroupSum> {
    sort_group_sums(&mut sums, sort_key);
    if !is_run_contiguous(&sums) {
        tracing::warn!(?sort_key, "super-keys are not contiguous after sort");
    }
    sums
}

/// Group sums in full-key order, as written by the totals job.
pub fn sorted_totals(mut sums: Vec<GroupSum>) -> Vec<GroupSum> {
    sort_group_sums(&mut sums, SortKey::Full);
    sums
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(team: &str, period: &str, delta: i64) -> DeltaRecord {
        DeltaRecord {
            group_key: GroupKey::compose(team, period),
            delta,
        }
    }

    #[test]
    fn test_group_deltas_sums_and_keeps_first_seen_order() {
        let sums = group_deltas(vec![
            delta("B", "2", 3),
            delta("A", "1", 1),
            delta("B", "2", 4),
            delta("B", "1", 2),
        ]);
        let rendered: Vec<_> = sums.iter().map(|s| (s.group_key.as_str(), s.total)).collect();
        assert_eq!(rendered, vec![("B#2", 7), ("A#1", 1), ("B#1", 2)]);
    }

    #[test]
    fn test_prepare_for_max_full_vs_super() {
        let sums = group_deltas(vec![delta("B", "2", 3), delta("A", "1", 1), delta("B", "1", 2)]);

        let full = prepare_for_max(sums.clone(), SortKey::Full);
        let keys: Vec<_> = full.iter().map(|s| s.group_key.as_str()).collect();
        assert_eq!(keys, vec!["A#1", "B#1", "B#2"]);

        let by_super = prepare_for_max(sums, SortKey::Super);
        let keys: Vec<_> = by_super.iter().map(|s| s.group_key.as_str()).collect();
        assert_eq!(keys, vec!["A#1", "B#2", "B#1"]);
    }

    #[test]
    fn test_sorted_totals() {
        let sums = group_deltas(vec![delta("LAL", "2", 3), delta("BOS", "4", 1)]);
        let keys: Vec<_> = sorted_totals(sums)
            .into_iter()
            .map(|s| s.group_key.to_string())
            .collect();
        assert_eq!(keys, vec!["BOS#4", "LAL#2"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_deltas(Vec::new()).is_empty());
    }
}
