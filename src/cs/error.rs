//! Error types shared by the codec modules.

use std::fmt;

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Class of damage that the SECDED code can detect but not repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UncorrectableKind {
    /// Exactly two bits differ from the closest valid codeword
    DoubleError,
    /// No valid codeword lies within two bit flips
    TripleOrMoreError,
}

impl fmt::Display for UncorrectableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UncorrectableKind::DoubleError => write!(f, "2 bit errors"),
            UncorrectableKind::TripleOrMoreError => write!(f, "3 or more bit errors"),
        }
    }
}

/// Errors raised by encoding, decoding and error injection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Parameters or textual input that cannot be interpreted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Bit string length is not a multiple of the chunk size
    #[error("Malformed input: length {len} is not a multiple of {chunk} bits")]
    MalformedInput { len: usize, chunk: usize },

    /// A codeword could not be corrected, the whole message is rejected
    #[error("Uncorrectable codeword at index {index}: {kind}")]
    Uncorrectable {
        index: usize,
        kind: UncorrectableKind,
    },
}
