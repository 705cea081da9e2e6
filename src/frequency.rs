use crate::error::{Error, Result};
use std::collections::HashMap;

/// Occurrence counts for every distinct symbol of a text.
///
/// Symbols are kept in the order they were first seen; that position is the
/// tie-break key used when building the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(char, u64)>,
    index: HashMap<char, usize>,
    total: u64,
}

impl FrequencyTable {
    /// Counts every symbol of `text` in a single pass.
    pub fn analyze(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut entries: Vec<(char, u64)> = Vec::new();
        let mut index = HashMap::new();
        let mut total = 0;

        for c in text.chars() {
            let slot = *index.entry(c).or_insert_with(|| {
                entries.push((c, 0));
                entries.len() - 1
            });
            entries[slot].1 += 1;
            total += 1;
        }

        Ok(Self {
            entries,
            index,
            total,
        })
    }

    /// Occurrences of `symbol`, zero if it never appeared.
    pub fn count(&self, symbol: char) -> u64 {
        self.order_of(symbol).map_or(0, |i| self.entries[i].1)
    }

    /// First-seen position of `symbol`.
    pub fn order_of(&self, symbol: char) -> Option<usize> {
        self.index.get(&symbol).copied()
    }

    /// `(symbol, count)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.entries.iter().map(|&(c, _)| c)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of symbols in the analyzed text.
    pub fn total(&self) -> u64 {
        self.total
    }
}
