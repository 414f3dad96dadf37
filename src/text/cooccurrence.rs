use std::collections::{BTreeMap, HashMap};

use super::frequency::{RankedCounts, TopWordSet, top_n};

/// Directed word -> (following word -> count) mapping restricted to top words.
///
/// Outer keys are only present when at least one neighbour survived pruning.
pub type AdjacencyMap = BTreeMap<String, RankedCounts>;

/// Counts how often each top word is immediately followed by another top word, then keeps
/// the `related_limit` strongest followers per word.
pub fn extract_adjacency(words: &[String], top: &TopWordSet, related_limit: usize) -> AdjacencyMap {
    let mut raw: BTreeMap<&str, HashMap<String, usize>> = BTreeMap::new();

    for pair in words.windows(2) {
        let [first, second] = pair else {
            continue;
        };
        if !top.contains(first) || !top.contains(second) {
            continue;
        }

        *raw.entry(first.as_str())
            .or_default()
            .entry(second.clone())
            .or_insert(0) += 1;
    }

    raw.into_iter()
        .filter_map(|(word, followers)| {
            let pruned = top_n(&followers, related_limit);
            if pruned.is_empty() {
                None
            } else {
                Some((word.to_owned(), pruned))
            }
        })
        .collect()
}
