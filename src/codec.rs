use crate::bits;
use crate::code::CodeTable;
use crate::container::{Container, HeaderKind};
use crate::decode::{decode_by_table, decode_by_tree, Strategy};
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::tree::Tree;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Encoding options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// What the container header stores.
    pub header: HeaderKind,
}

impl Options {
    pub fn with_header(mut self, header: HeaderKind) -> Self {
        self.header = header;
        self
    }
}

/// Summary of one encode call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    /// Number of symbols (characters) in the input.
    pub symbol_count: u64,
    pub distinct_symbols: usize,
    /// UTF-8 length of the input.
    pub original_bytes: usize,
    /// Length of the packed payload, header excluded.
    pub packed_bytes: usize,
    pub padding: u8,
    /// `packed_bytes / original_bytes`.
    pub compression_factor: f64,
    /// Σ code length × frequency / `symbol_count`.
    pub average_bits_per_symbol: f64,
}

impl Stats {
    fn new(
        text: &str,
        frequencies: &FrequencyTable,
        table: &CodeTable,
        packed_bytes: usize,
        padding: u8,
    ) -> Self {
        let symbol_count = frequencies.total();
        Self {
            symbol_count,
            distinct_symbols: frequencies.len(),
            original_bytes: text.len(),
            packed_bytes,
            padding,
            compression_factor: packed_bytes as f64 / text.len() as f64,
            average_bits_per_symbol: table.weighted_length(frequencies) as f64
                / symbol_count as f64,
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "symbols:              {} ({} distinct)",
            self.symbol_count, self.distinct_symbols
        )?;
        writeln!(f, "original size:        {} bytes", self.original_bytes)?;
        writeln!(f, "packed size:          {} bytes", self.packed_bytes)?;
        writeln!(f, "compression factor:   {:.4}", self.compression_factor)?;
        write!(f, "avg bits per symbol:  {:.4}", self.average_bits_per_symbol)
    }
}

/// Encodes `text` into a container whose header stores both tree and table.
pub fn encode(text: &str) -> Result<(Container, Stats)> {
    encode_with(text, &Options::default())
}

pub fn encode_with(text: &str, options: &Options) -> Result<(Container, Stats)> {
    let frequencies = FrequencyTable::analyze(text)?;
    let tree = Tree::build(&frequencies);
    let table = CodeTable::generate(&tree);
    let (payload, padding) = table.encode(text)?;

    let stats = Stats::new(text, &frequencies, &table, payload.len(), padding);
    log::debug!(
        "encoded {} symbols ({} distinct) into {} bytes, {:.3} bits/symbol",
        stats.symbol_count,
        stats.distinct_symbols,
        stats.packed_bytes,
        stats.average_bits_per_symbol
    );

    let container = Container::new(
        options.header,
        table,
        tree,
        padding,
        frequencies.total(),
        payload,
    );
    Ok((container, stats))
}

/// Decodes a container's payload with the chosen strategy.
///
/// The tree strategy needs a header that stores a tree.
pub fn decode(container: &Container, strategy: Strategy) -> Result<String> {
    let bits = bits::unpack(container.payload(), container.padding())?;

    let text = match strategy {
        Strategy::Table => decode_by_table(container.code_table(), &bits)?,
        Strategy::Tree => {
            let tree = container.tree().ok_or(Error::UnavailableTree)?;
            decode_by_tree(tree, &bits)?
        }
    };

    let decoded = text.chars().count() as u64;
    if decoded != container.symbol_count() {
        return Err(Error::corrupt(format!(
            "decoded {decoded} symbols, header records {}",
            container.symbol_count()
        )));
    }

    Ok(text)
}
