//! Error type shared by every stage of the codec.

use std::io;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Errors raised while encoding, persisting or decoding text.
#[derive(Debug, Error)]
pub enum Error {
    /// Encode was called on zero-length input.
    #[error("cannot encode empty input")]
    EmptyInput,

    /// A symbol has no entry in the code table used to encode it.
    #[error("symbol {symbol:?} has no code in this table")]
    UnknownSymbol {
        /// The symbol that could not be encoded.
        symbol: char,
    },

    /// The persisted container is missing or malformed.
    #[error("corrupt container: {message}")]
    CorruptContainer {
        /// Description of what failed validation.
        message: String,
    },

    /// Tree-walk decoding was requested on a table-only container.
    #[error("container header carries no tree, use table-lookup decoding")]
    UnavailableTree,

    /// The bit sequence ended part-way through a code.
    #[error("bit stream ended mid-code after {bit_position} bits")]
    TruncatedStream {
        /// Number of bits consumed when the stream ran out.
        bit_position: usize,
    },

    /// The bits read so far cannot be the start of any code.
    #[error("no code matches the bits ending at position {bit_position}")]
    InvalidCode {
        /// Index of the bit that made the code unmatchable.
        bit_position: usize,
    },

    /// Input file was not valid UTF-8.
    #[error("input is not valid UTF-8 text: {0}")]
    InvalidText(#[from] FromUtf8Error),

    /// Header could not be written as MessagePack.
    #[error("failed to serialize header: {0}")]
    Serialize(#[from] rmp_serde::encode::Error),

    /// I/O error from reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn corrupt(message: impl Into<String>) -> Self {
        Error::CorruptContainer {
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_carries_message() {
        let err = Error::corrupt("bad magic");
        assert!(matches!(&err, Error::CorruptContainer { message } if message == "bad magic"));
        assert_eq!(err.to_string(), "corrupt container: bad magic");
    }

    #[test]
    fn io_errors_convert() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
