//! Sort contracts between the sum and running-max stages.

use crate::domain::GroupSum;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which key the shuffle in front of the running-max stage sorts by.
///
/// Both orders keep every super-key contiguous. They differ in which group
/// opens a run: `Full` puts the lexicographically smallest sub-key first,
/// `Super` keeps the arrival order of groups inside a super-key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Sort by the full `super#sub` key.
    #[default]
    Full,
    /// Stable sort by the super-key only.
    Super,
}

impl SortKey {
    /// The part of a group key this order compares.
    pub fn key_of(self, sum: &GroupSum) -> &str {
        match self {
            SortKey::Full => sum.group_key.as_str(),
            SortKey::Super => sum.group_key.super_key(),
        }
    }
}

/// Sort group sums for the running-max stage. The sort is stable, so under
/// [`SortKey::Super`] groups keep their incoming order within a super-key.
pub fn sort_group_sums(sums: &mut [GroupSum], sort_key: SortKey) {
    sums.sort_by(|a, b| sort_key.key_of(a).cmp(sort_key.key_of(b)));
}

/// Returns false if any super-key reappears after its run has ended.
pub fn is_run_contiguous(sums: &[GroupSum]) -> bool {
    let mut closed: HashSet<&str> = HashSet::new();
    let mut current: Option<&str> = None;

    for sum in sums {
        let key = sum.group_key.super_key();
        if current == Some(key) {
            continue;
        }
        if closed.contains(key) {
            return false;
        }
        if let Some(previous) = current {
            closed.insert(previous);
        }
        current = Some(key);
    }
    true
}
