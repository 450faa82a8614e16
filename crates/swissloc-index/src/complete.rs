//! # Prefix Completion
//!
//! An immutable index from search keys to items. Each item is stored with
//! a set of keys; a query is a list of tokens, and an item matches when
//! every token is a prefix of at least one of its keys.
//!
//! Keys are held in one sorted vector, so the keys sharing a prefix form a
//! contiguous run found by binary search.

use std::collections::BTreeSet;

/// Prefix-completion index over items of type `T`.
#[derive(Debug, Clone)]
pub struct CompletionIndex<T> {
    items: Vec<T>,
    keys: Vec<(String, usize)>,
}

impl<T> CompletionIndex<T> {
    /// Index `items` under the keys produced by `key_fn`.
    pub fn build<K, F>(items: Vec<T>, mut key_fn: F) -> Self
    where
        F: FnMut(&T) -> K,
        K: IntoIterator<Item = String>,
    {
        let mut keys: Vec<(String, usize)> = items
            .iter()
            .enumerate()
            .flat_map(|(i, item)| key_fn(item).into_iter().map(move |k| (k, i)))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        Self { items, keys }
    }

    /// Positions of matching items, ascending. No tokens match nothing.
    pub fn complete_positions<S: AsRef<str>>(&self, tokens: &[S]) -> BTreeSet<usize> {
        let mut tokens = tokens.iter().map(AsRef::as_ref);
        let Some(first) = tokens.next() else {
            return BTreeSet::new();
        };
        let mut matches = self.prefixed(first);
        for token in tokens {
            if matches.is_empty() {
                break;
            }
            let next = self.prefixed(token);
            matches.retain(|i| next.contains(i));
        }
        matches
    }

    /// Matching items in index order.
    pub fn complete<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<&T> {
        self.complete_positions(tokens)
            .into_iter()
            .map(|i| &self.items[i])
            .collect()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of stored keys.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    fn prefixed(&self, prefix: &str) -> BTreeSet<usize> {
        let start = self.keys.partition_point(|(k, _)| k.as_str() < prefix);
        self.keys[start..]
            .iter()
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|&(_, i)| i)
            .collect()
    }
}
