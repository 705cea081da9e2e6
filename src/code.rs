use crate::bits::{self, Bits};
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::tree::{NodeKind, Tree};
use bitvec::prelude::*;
use std::collections::BTreeMap;
use std::fmt;

/// A single symbol's code, most significant bit first.
pub type Code = BitBox<u8, Msb0>;

/// Prefix-free mapping from symbol to code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeTable {
    codes: BTreeMap<char, Code>,
}

impl CodeTable {
    /// Derives the code of every leaf by walking the tree: `0` going left,
    /// `1` going right. A tree made of a single leaf gets the code `0`.
    pub fn generate(tree: &Tree) -> Self {
        let mut codes = BTreeMap::new();

        if let NodeKind::Leaf(symbol) = tree.node(tree.root()).kind() {
            codes.insert(symbol, bitbox![u8, Msb0; 0]);
            return Self { codes };
        }

        let mut stack = vec![(tree.root(), Bits::new())];
        while let Some((id, path)) = stack.pop() {
            match tree.node(id).kind() {
                NodeKind::Leaf(symbol) => {
                    codes.insert(symbol, path.into_boxed_bitslice());
                }
                NodeKind::Internal { left, right } => {
                    let mut right_path = path.clone();
                    right_path.push(true);
                    let mut left_path = path;
                    left_path.push(false);

                    stack.push((right, right_path));
                    stack.push((left, left_path));
                }
            }
        }

        Self { codes }
    }

    /// Builds a table from untrusted `(symbol, code)` pairs, checking that
    /// codes are non-empty, symbols are unique and no code prefixes another.
    pub fn from_codes(entries: impl IntoIterator<Item = (char, Code)>) -> Result<Self> {
        let mut codes = BTreeMap::new();
        for (symbol, code) in entries {
            if code.is_empty() {
                return Err(Error::corrupt(format!("empty code for symbol {symbol:?}")));
            }
            if codes.insert(symbol, code).is_some() {
                return Err(Error::corrupt(format!("duplicate code for symbol {symbol:?}")));
            }
        }

        let table = Self { codes };
        if table.is_empty() {
            return Err(Error::corrupt("code table is empty"));
        }
        if !table.is_prefix_free() {
            return Err(Error::corrupt("code table is not prefix-free"));
        }
        Ok(table)
    }

    pub fn get(&self, symbol: char) -> Option<&BitSlice<u8, Msb0>> {
        self.codes.get(&symbol).map(|code| code.as_bitslice())
    }

    /// Entries ordered by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (char, &BitSlice<u8, Msb0>)> + '_ {
        self.codes.iter().map(|(&s, code)| (s, code.as_bitslice()))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Length of the longest code, zero for an empty table.
    pub fn max_len(&self) -> usize {
        self.codes.values().map(|c| c.len()).max().unwrap_or(0)
    }

    /// True when no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        // In lexicographic order a prefix sorts directly before its extensions.
        let mut sorted: Vec<&BitSlice<u8, Msb0>> =
            self.codes.values().map(|c| c.as_bitslice()).collect();
        sorted.sort();
        sorted.windows(2).all(|w| !w[1].starts_with(w[0]))
    }

    /// Σ code length × frequency, the number of payload bits before padding.
    pub fn weighted_length(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .iter()
            .map(|(symbol, count)| self.codes.get(&symbol).map_or(0, |c| c.len() as u64) * count)
            .sum()
    }

    /// Packs the codes of `text` in order into a byte buffer, returning the
    /// buffer and the number of padding bits.
    pub fn encode(&self, text: &str) -> Result<(Vec<u8>, u8)> {
        let codes = text
            .chars()
            .map(|symbol| self.get(symbol).ok_or(Error::UnknownSymbol { symbol }))
            .collect::<Result<Vec<_>>>()?;

        Ok(bits::pack(codes))
    }

    /// Human-readable table of symbol, frequency and code.
    pub fn report<'a>(&'a self, frequencies: &'a FrequencyTable) -> CodeReport<'a> {
        CodeReport {
            table: self,
            frequencies,
        }
    }
}

/// See [`CodeTable::report`]. Rows are sorted by code length, then symbol.
pub struct CodeReport<'a> {
    table: &'a CodeTable,
    frequencies: &'a FrequencyTable,
}

impl fmt::Display for CodeReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rows: Vec<_> = self.table.iter().collect();
        rows.sort_by_key(|&(symbol, code)| (code.len(), symbol));

        writeln!(f, "{:<15} {:<15} {:<20}", "symbol", "frequency", "code")?;
        writeln!(f, "{}", "-".repeat(52))?;
        for (symbol, code) in rows {
            let shown: String = if symbol.is_whitespace() {
                format!("{symbol:?}")
            } else {
                symbol.to_string()
            };
            let bits: String = code.iter().by_vals().map(|b| if b { '1' } else { '0' }).collect();
            writeln!(
                f,
                "{:<15} {:<15} {:<20}",
                shown,
                self.frequencies.count(symbol),
                bits
            )?;
        }
        Ok(())
    }
}
