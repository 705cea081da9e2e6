//! Static Huffman coding for text.
//!
//! Symbols are Unicode scalar values. Encoding counts every symbol, builds an
//! optimal prefix tree, packs the codes into whole bytes and wraps them in a
//! [`Container`]. Decoding can either match codes against the table or walk
//! the tree; both give the same text.
//!
//! ```
//! use huffman_text::{decode, encode, Container, Strategy};
//!
//! let (container, stats) = encode("aaabbc")?;
//! assert_eq!(stats.average_bits_per_symbol, 1.5);
//!
//! let bytes = container.serialize()?;
//! let parsed = Container::parse(&bytes)?;
//! assert_eq!(decode(&parsed, Strategy::Table)?, "aaabbc");
//! assert_eq!(decode(&parsed, Strategy::Tree)?, "aaabbc");
//! # Ok::<(), huffman_text::Error>(())
//! ```

pub mod bits;
pub mod code;
pub mod codec;
pub mod container;
pub mod decode;
pub mod error;
pub mod file;
pub mod frequency;
pub mod tree;

pub use code::{Code, CodeTable};
pub use codec::{decode, encode, encode_with, Options, Stats};
pub use container::{Container, HeaderKind};
pub use decode::{decode_by_table, decode_by_tree, Strategy};
pub use error::{Error, Result};
pub use file::{decode_file, encode_file};
pub use frequency::FrequencyTable;
pub use tree::{FlatNode, Node, NodeId, NodeKind, Tree};
