use std::collections::HashMap;

/// Word -> occurrence count. Every stored count is at least 1.
pub type FrequencyTable = HashMap<String, usize>;

/// The words shown as bubbles.
pub type TopWordSet = RankedCounts;

pub fn count_words(words: &[String]) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for word in words {
        if word.is_empty() {
            continue;
        }
        *table.entry(word.clone()).or_insert(0) += 1;
    }
    table
}

/// A bounded word -> count mapping kept in rank order: count descending, then word ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RankedCounts {
    ranked: Vec<(String, usize)>,
    index_by_word: HashMap<String, usize>,
}

impl RankedCounts {
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index_by_word.contains_key(word)
    }

    pub fn count(&self, word: &str) -> Option<usize> {
        self.index_by_word
            .get(word)
            .map(|&index| self.ranked[index].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.ranked
            .iter()
            .map(|(word, count)| (word.as_str(), *count))
    }
}

/// Keeps the `limit` highest counts of `table`.
///
/// Equal counts are ordered by the word itself so the same input always selects the same
/// members. A `limit` at or above the table size keeps everything; zero keeps nothing.
pub fn top_n(table: &HashMap<String, usize>, limit: usize) -> RankedCounts {
    let mut ranked = table
        .iter()
        .filter(|(word, count)| !word.is_empty() && **count > 0)
        .map(|(word, count)| (word.clone(), *count))
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);

    let index_by_word = ranked
        .iter()
        .enumerate()
        .map(|(index, (word, _))| (word.clone(), index))
        .collect();

    RankedCounts {
        ranked,
        index_by_word,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tokenize::tokenize;

    fn table(entries: &[(&str, usize)]) -> FrequencyTable {
        entries
            .iter()
            .map(|(word, count)| (word.to_string(), *count))
            .collect()
    }

    #[test]
    fn counts_sum_to_token_count() {
        let words = tokenize("the cat and the hat and the bat");
        let table = count_words(&words);

        assert_eq!(table.values().sum::<usize>(), words.len());
        assert_eq!(table.get("the"), Some(&3));
        assert_eq!(table.get("and"), Some(&2));
        assert_eq!(table.get("cat"), Some(&1));
    }

    #[test]
    fn empty_words_are_not_counted() {
        let words = vec![String::new(), "a".to_owned(), String::new()];
        let table = count_words(&words);
        assert_eq!(table.len(), 1);
        assert!(!table.contains_key(""));
    }

    #[test]
    fn top_n_keeps_highest_counts() {
        let table = table(&[("a", 5), ("b", 1), ("c", 3), ("d", 4), ("e", 2)]);

        for limit in 1..=table.len() {
            let top = top_n(&table, limit);
            assert_eq!(top.len(), limit);

            let smallest_kept = top.iter().map(|(_, count)| count).min().expect("non-empty");
            for (word, count) in &table {
                if !top.contains(word) {
                    assert!(*count <= smallest_kept, "{word} should have been kept");
                }
            }
        }
    }

    #[test]
    fn top_n_with_large_limit_returns_everything() {
        let table = table(&[("a", 2), ("b", 1)]);
        let top = top_n(&table, 50);
        assert_eq!(top.len(), 2);
        assert_eq!(top.count("a"), Some(2));
        assert_eq!(top.count("b"), Some(1));
    }

    #[test]
    fn top_n_zero_is_empty() {
        let table = table(&[("a", 2)]);
        assert!(top_n(&table, 0).is_empty());
    }

    #[test]
    fn ties_prefer_lexicographically_smaller_words() {
        let table = table(&[("pear", 2), ("apple", 2), ("fig", 2), ("kiwi", 9)]);
        let top = top_n(&table, 3);
        let words = top.iter().map(|(word, _)| word).collect::<Vec<_>>();
        assert_eq!(words, vec!["kiwi", "apple", "fig"]);
    }

    #[test]
    fn rank_order_is_descending() {
        let table = table(&[("x", 1), ("y", 7), ("z", 3)]);
        let top = top_n(&table, 3);
        let counts = top.iter().map(|(_, count)| count).collect::<Vec<_>>();
        assert_eq!(counts, vec![7, 3, 1]);
    }
}
