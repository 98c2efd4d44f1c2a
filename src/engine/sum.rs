//! Commutative sum reducer.

use std::collections::BTreeMap;

/// Sums values per key. Order of inputs never affects the result.
///
/// Totals saturate at the `i64` bounds instead of overflowing. Inputs are
/// non-negative in practice, so saturation stays order independent.
pub struct SumAggregator;

impl SumAggregator {
    /// Sum all values that share one key.
    pub fn sum<I>(values: I) -> i64
    where
        I: IntoIterator<Item = i64>,
    {
        values.into_iter().fold(0, i64::saturating_add)
    }

    /// Group `(key, value)` pairs and sum each group. Keys come back in
    /// ascending order.
    pub fn aggregate<K, I>(pairs: I) -> BTreeMap<K, i64>
    where
        K: Ord,
        I: IntoIterator<Item = (K, i64)>,
    {
        let mut totals = BTreeMap::new();
        for (key, value) in pairs {
            let total = totals.entry(key).or_insert(0i64);
            *total = total.saturating_add(value);
        }
        totals
    }

    /// Reduce already-grouped values.
    pub fn reduce_groups<K, V>(groups: BTreeMap<K, V>) -> BTreeMap<K, i64>
    where
        K: Ord,
        V: IntoIterator<Item = i64>,
    {
        groups
            .into_iter()
            .map(|(key, values)| (key, Self::sum(values)))
            .collect()
    }
}
