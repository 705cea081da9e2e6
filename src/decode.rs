//! The two decoding strategies. Both must produce the same text for any
//! payload written by this crate.

use crate::bits::Bits;
use crate::code::CodeTable;
use crate::error::{Error, Result};
use crate::tree::{NodeId, NodeKind, Tree};
use bitvec::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which decoder to run over a container's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Accumulate bits until they match an entry of the inverse code table.
    #[default]
    Table,
    /// Walk the tree from the root, one edge per bit.
    Tree,
}

/// Decodes `bits` by accumulating them until they exactly match a code.
pub fn decode_by_table(table: &CodeTable, bits: &BitSlice<u8, Msb0>) -> Result<String> {
    let decode_table: HashMap<Bits, char> = table
        .iter()
        .map(|(symbol, code)| (code.to_bitvec(), symbol))
        .collect();
    let max_len = table.max_len();

    let mut out = String::new();
    let mut cursor = Bits::with_capacity(max_len);
    for (position, bit) in bits.iter().by_vals().enumerate() {
        cursor.push(bit);
        if let Some(&symbol) = decode_table.get(&cursor) {
            cursor.clear();
            out.push(symbol);
        } else if cursor.len() >= max_len {
            return Err(Error::InvalidCode {
                bit_position: position,
            });
        }
    }

    if !cursor.is_empty() {
        return Err(Error::TruncatedStream {
            bit_position: bits.len(),
        });
    }

    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    AtRoot,
    Descending(NodeId),
}

/// Decodes `bits` by descending from the root, emitting a symbol and
/// returning to the root at every leaf.
///
/// A tree that is a single leaf emits its symbol once per `0` bit.
pub fn decode_by_tree(tree: &Tree, bits: &BitSlice<u8, Msb0>) -> Result<String> {
    let root = tree.root();

    if let Some(symbol) = tree.node(root).symbol() {
        return bits
            .iter()
            .by_vals()
            .enumerate()
            .map(|(position, bit)| match bit {
                false => Ok(symbol),
                true => Err(Error::InvalidCode {
                    bit_position: position,
                }),
            })
            .collect();
    }

    let mut out = String::new();
    let mut state = WalkState::AtRoot;
    for (position, bit) in bits.iter().by_vals().enumerate() {
        let current = match state {
            WalkState::AtRoot => root,
            WalkState::Descending(id) => id,
        };

        let next = tree.child(current, bit).ok_or(Error::InvalidCode {
            bit_position: position,
        })?;

        state = match tree.node(next).kind() {
            NodeKind::Leaf(symbol) => {
                out.push(symbol);
                WalkState::AtRoot
            }
            NodeKind::Internal { .. } => WalkState::Descending(next),
        };
    }

    match state {
        WalkState::AtRoot => Ok(out),
        WalkState::Descending(_) => Err(Error::TruncatedStream {
            bit_position: bits.len(),
        }),
    }
}
