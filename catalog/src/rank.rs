//! Top-N reduction over frequency tables.

/// Returns at most `n` entries sorted by descending value.
///
/// The sort is stable: entries with equal values keep the order in which
/// `entries` yielded them. That order carries no meaning for callers.
///
/// ```
/// use std::collections::BTreeMap;
/// use phenocat::top_n;
///
/// let counts = BTreeMap::from([("A", 5), ("B", 2), ("C", 9), ("D", 1)]);
/// assert_eq!(top_n(counts, 3), vec![("C", 9), ("A", 5), ("B", 2)]);
/// ```
pub fn top_n<K, V, I>(entries: I, n: usize) -> Vec<(K, V)>
where
    I: IntoIterator<Item = (K, V)>,
    V: Ord,
{
    let mut ranked: Vec<(K, V)> = entries.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}
