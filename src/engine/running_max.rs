//! Max aggregation over group sums: per super-key runs, and a single global
//! top scorer.

use crate::domain::{GroupKey, GroupSum, RunMax, TopScore};
use std::collections::BTreeMap;

/// State of the run currently being accumulated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunMaxState {
    pub current_super_key: Option<String>,
    pub current_period: String,
    pub running_max: i64,
    pub seen_first: bool,
}

/// Emits the largest total of each run of adjacent same-super-key groups.
///
/// Input must be sorted so that every super-key forms one contiguous run.
/// A super-key that shows up again after its run closed starts a second,
/// independent run; nothing detects or repairs that here.
#[derive(Debug, Clone, Default)]
pub struct RunningMaxByAdjacentGroup {
    state: RunMaxState,
}

impl RunningMaxByAdjacentGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RunMaxState {
        &self.state
    }

    /// Feed the next group sum. Returns the closed run when the super-key
    /// changes.
    pub fn push(&mut self, sum: &GroupSum) -> Option<RunMax> {
        let super_key = sum.group_key.super_key();

        if !self.state.seen_first {
            self.start_run(&sum.group_key, sum.total);
            return None;
        }

        if self.state.current_super_key.as_deref() == Some(super_key) {
            self.state.running_max = self.state.running_max.max(sum.total);
            return None;
        }

        let closed = self.current_run();
        self.start_run(&sum.group_key, sum.total);
        closed
    }

    /// Emit the run still open at end of stream and reset.
    pub fn flush(&mut self) -> Option<RunMax> {
        let last = self.current_run();
        self.state = RunMaxState::default();
        last
    }

    /// Run a whole sorted stream. With `flush` false the final run is
    /// dropped, as a driver without an end-of-stream hook would.
    pub fn run<'a, I>(sums: I, flush: bool) -> Vec<RunMax>
    where
        I: IntoIterator<Item = &'a GroupSum>,
    {
        let mut aggregator = Self::new();
        let mut out: Vec<RunMax> = sums.into_iter().filter_map(|s| aggregator.push(s)).collect();
        if flush {
            out.extend(aggregator.flush());
        }
        out
    }

    fn start_run(&mut self, key: &GroupKey, total: i64) {
        self.state = RunMaxState {
            current_super_key: Some(key.super_key().to_string()),
            current_period: key.sub_key().to_string(),
            running_max: total,
            seen_first: true,
        };
    }

    fn current_run(&self) -> Option<RunMax> {
        let super_key = self.state.current_super_key.clone()?;
        Some(RunMax {
            super_key,
            period: self.state.current_period.clone(),
            max: self.state.running_max,
        })
    }
}

/// Order-insensitive alternative: group every sum by super-key, then scan
/// each group. The period reported is the sub-key of the first group seen
/// for that super-key. Results are ordered by super-key.
pub fn group_then_scan<'a, I>(sums: I) -> Vec<RunMax>
where
    I: IntoIterator<Item = &'a GroupSum>,
{
    let mut runs: BTreeMap<&str, RunMax> = BTreeMap::new();
    for sum in sums {
        runs.entry(sum.group_key.super_key())
            .and_modify(|run| run.max = run.max.max(sum.total))
            .or_insert_with(|| RunMax {
                super_key: sum.group_key.super_key().to_string(),
                period: sum.group_key.sub_key().to_string(),
                max: sum.total,
            });
    }
    runs.into_values().collect()
}

/// Tracks every group total and reports the single largest one at the end.
#[derive(Debug, Clone, Default)]
pub struct TopScorer {
    totals: BTreeMap<GroupKey, i64>,
}

impl TopScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sum: &GroupSum) {
        self.totals.insert(sum.group_key.clone(), sum.total);
    }

    /// The largest total, strictly above zero. Ties go to the smallest key.
    pub fn finish(&self) -> Option<TopScore> {
        let mut best: Option<(&GroupKey, i64)> = None;
        for (key, &total) in &self.totals {
            if total > best.map(|(_, max)| max).unwrap_or(0) {
                best = Some((key, total));
            }
        }
        best.map(|(key, max)| TopScore {
            group_key: key.clone(),
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(team: &str, period: &str, total: i64) -> GroupSum {
        GroupSum::new(GroupKey::compose(team, period), total)
    }

    fn abab() -> Vec<GroupSum> {
        vec![
            sum("A", "1", 5),
            sum("A", "2", 9),
            sum("A", "3", 3),
            sum("B", "1", 7),
            sum("B", "2", 12),
        ]
    }

    #[test]
    fn test_runs_emit_on_super_key_change() {
        let mut agg = RunningMaxByAdjacentGroup::new();
        let emitted: Vec<_> = abab().iter().filter_map(|s| agg.push(s)).collect();
        assert_eq!(
            emitted,
            vec![RunMax {
                super_key: "A".to_string(),
                period: "1".to_string(),
                max: 9
            }]
        );

        let last = agg.flush().unwrap();
        assert_eq!(last.super_key, "B");
        assert_eq!(last.max, 12);
        assert!(agg.flush().is_none());
    }

    #[test]
    fn test_run_without_flush_drops_last_run() {
        let runs = RunningMaxByAdjacentGroup::run(&abab(), false);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].super_key, "A");
    }

    #[test]
    fn test_first_record_only_initializes() {
        let mut agg = RunningMaxByAdjacentGroup::new();
        assert!(agg.push(&sum("A", "1", 4)).is_none());
        assert_eq!(agg.state().running_max, 4);
        assert!(agg.state().seen_first);
        assert_eq!(agg.state().current_period, "1");
    }

    #[test]
    fn test_first_value_counts_toward_max() {
        let runs = RunningMaxByAdjacentGroup::run(&[sum("A", "1", 10), sum("A", "2", 3)], true);
        assert_eq!(runs[0].max, 10);
    }

    #[test]
    fn test_empty_stream() {
        assert!(RunningMaxByAdjacentGroup::run(&Vec::<GroupSum>::new(), true).is_empty());
    }

    #[test]
    fn test_non_contiguous_input_splits_runs() {
        let input = vec![sum("A", "1", 5), sum("B", "1", 7), sum("A", "2", 9)];
        let runs = RunningMaxByAdjacentGroup::run(&input, true);
        let keys: Vec<_> = runs.iter().map(|r| (r.super_key.as_str(), r.max)).collect();
        assert_eq!(keys, vec![("A", 5), ("B", 7), ("A", 9)]);

        // Grouping first gives one result per super-key.
        let scanned = group_then_scan(&input);
        let keys: Vec<_> = scanned.iter().map(|r| (r.super_key.as_str(), r.max)).collect();
        assert_eq!(keys, vec![("A", 9), ("B", 7)]);
    }

    #[test]
    fn test_group_then_scan_matches_runs_on_sorted_input() {
        assert_eq!(group_then_scan(&abab()), RunningMaxByAdjacentGroup::run(&abab(), true));
    }

    #[test]
    fn test_top_scorer_picks_global_max() {
        let mut top = TopScorer::new();
        for s in [sum("201", "Jones", 14), sum("305", "Smith", 21), sum("77", "Lee", 3)] {
            top.push(&s);
        }
        let best = top.finish().unwrap();
        assert_eq!(best.group_key.as_str(), "305#Smith");
        assert_eq!(best.max, 21);
    }

    #[test]
    fn test_top_scorer_tie_keeps_smallest_key() {
        let mut top = TopScorer::new();
        top.push(&sum("b", "x", 5));
        top.push(&sum("a", "y", 5));
        assert_eq!(top.finish().unwrap().group_key.as_str(), "a#y");
    }

    #[test]
    fn test_top_scorer_empty_and_zero() {
        assert!(TopScorer::new().finish().is_none());
        let mut top = TopScorer::new();
        top.push(&sum("a", "b", 0));
        assert!(top.finish().is_none());
    }
}
