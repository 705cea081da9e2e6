//! Persisted container: a MessagePack header followed by the packed payload.
//!
//! ```text
//! +------+----------------+-------------------+-----------------+
//! | HUF1 | header_len u32 | header (msgpack)  | payload bytes   |
//! +------+----------------+-------------------+-----------------+
//! ```
//!
//! The header always records the padding and symbol count, plus the code
//! table, the preorder tree, or both.

use crate::code::{Code, CodeTable};
use crate::error::{Error, Result};
use crate::tree::{FlatNode, Tree};
use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

const MAGIC: &[u8; 4] = b"HUF1";

/// What the header stores besides padding and symbol count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderKind {
    /// Tree only; the code table is derived from it on parse.
    Tree,
    /// Code table only; tree-walk decoding is unavailable.
    Table,
    #[default]
    Both,
}

impl HeaderKind {
    pub fn has_tree(self) -> bool {
        matches!(self, HeaderKind::Tree | HeaderKind::Both)
    }

    pub fn has_table(self) -> bool {
        matches!(self, HeaderKind::Table | HeaderKind::Both)
    }
}

// serialize a code as its bit length and backing bytes
type SerializableCode = (usize, Box<[u8]>);

#[derive(Serialize, Deserialize)]
struct Header {
    padding: u8,
    symbol_count: u64,
    table: Option<Vec<(char, SerializableCode)>>,
    tree: Option<Vec<FlatNode>>,
}

fn code_to_serializable(code: &BitSlice<u8, Msb0>) -> SerializableCode {
    let len = code.len();
    let bytes = code.to_bitvec().into_vec().into_boxed_slice();
    (len, bytes)
}

fn code_from_serializable(symbol: char, (len, bytes): SerializableCode) -> Result<Code> {
    if bytes.len() != len.div_ceil(8) {
        return Err(Error::corrupt(format!(
            "code for {symbol:?} has {len} bits in {} bytes",
            bytes.len()
        )));
    }

    let mut bv = BitBox::<u8, Msb0>::from_boxed_slice(bytes).into_bitvec();
    bv.truncate(len);
    Ok(bv.into_boxed_bitslice())
}

/// Encoded text together with everything needed to decode it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    header: HeaderKind,
    table: CodeTable,
    tree: Option<Tree>,
    padding: u8,
    symbol_count: u64,
    payload: Vec<u8>,
}

impl Container {
    /// `tree` is kept only when `header` stores one.
    pub(crate) fn new(
        header: HeaderKind,
        table: CodeTable,
        tree: Tree,
        padding: u8,
        symbol_count: u64,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            header,
            table,
            tree: header.has_tree().then_some(tree),
            padding,
            symbol_count,
            payload,
        }
    }

    pub fn header_kind(&self) -> HeaderKind {
        self.header
    }

    /// Code table, read from the header or derived from its tree.
    pub fn code_table(&self) -> &CodeTable {
        &self.table
    }

    /// `None` when the header stores only a code table.
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    pub fn padding(&self) -> u8 {
        self.padding
    }

    pub fn symbol_count(&self) -> u64 {
        self.symbol_count
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let header = Header {
            padding: self.padding,
            symbol_count: self.symbol_count,
            table: self.header.has_table().then(|| {
                self.table
                    .iter()
                    .map(|(symbol, code)| (symbol, code_to_serializable(code)))
                    .collect()
            }),
            tree: self.tree.as_ref().map(Tree::to_preorder),
        };

        let encoded = rmp_serde::to_vec(&header)?;
        let header_len = u32::try_from(encoded.len())
            .map_err(|_| Error::corrupt(format!("header of {} bytes", encoded.len())))?;

        let mut out = Vec::with_capacity(MAGIC.len() + 4 + encoded.len() + self.payload.len());
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&header_len.to_le_bytes());
        out.extend_from_slice(&encoded);
        out.extend_from_slice(&self.payload);

        log::debug!(
            "serialized container: {} header bytes, {} payload bytes",
            encoded.len(),
            self.payload.len()
        );
        Ok(out)
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let rest = bytes
            .strip_prefix(MAGIC.as_slice())
            .ok_or_else(|| Error::corrupt("missing container magic"))?;

        if rest.len() < 4 {
            return Err(Error::corrupt("truncated header length"));
        }
        let (len_bytes, rest) = rest.split_at(4);
        let header_len =
            u32::from_le_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]);
        let header_len = usize::try_from(header_len)
            .map_err(|_| Error::corrupt("header length overflows"))?;

        if rest.len() < header_len {
            return Err(Error::corrupt(format!(
                "header needs {header_len} bytes, {} available",
                rest.len()
            )));
        }
        let (header_bytes, payload) = rest.split_at(header_len);

        let header: Header = rmp_serde::from_slice(header_bytes)
            .map_err(|e| Error::corrupt(format!("undecodable header: {e}")))?;

        if header.padding >= 8 {
            return Err(Error::corrupt(format!("padding of {} bits", header.padding)));
        }
        if payload.is_empty() && header.padding > 0 {
            return Err(Error::corrupt("padding without payload"));
        }

        let tree = header.tree.as_deref().map(Tree::from_preorder).transpose()?;
        let table = header
            .table
            .map(|entries| -> Result<CodeTable> {
                let codes = entries
                    .into_iter()
                    .map(|(symbol, code)| code_from_serializable(symbol, code).map(|c| (symbol, c)))
                    .collect::<Result<Vec<_>>>()?;
                CodeTable::from_codes(codes)
            })
            .transpose()?;

        let (kind, table) = match (table, &tree) {
            (Some(table), Some(tree)) => {
                if table != CodeTable::generate(tree) {
                    return Err(Error::corrupt("code table disagrees with tree"));
                }
                (HeaderKind::Both, table)
            }
            (Some(table), None) => (HeaderKind::Table, table),
            (None, Some(tree)) => (HeaderKind::Tree, CodeTable::generate(tree)),
            (None, None) => return Err(Error::corrupt("header has neither table nor tree")),
        };

        log::debug!(
            "parsed {:?} container: {} symbols, {} payload bytes, {} padding bits",
            kind,
            header.symbol_count,
            payload.len(),
            header.padding
        );

        Ok(Self {
            header: kind,
            table,
            tree,
            padding: header.padding,
            symbol_count: header.symbol_count,
            payload: payload.to_vec(),
        })
    }
}
