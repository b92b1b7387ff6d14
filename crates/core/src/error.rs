//! Error types for the huffpack codec.
//!
//! All operations return structured errors rather than panicking. Callers can
//! tell the three failure domains apart: the byte source or destination
//! failed (`Io`), the container is not one we can parse (`Format`), or the
//! container parsed but its bitstream does not decode (`Corruption`).

use thiserror::Error;

/// Top-level error type for all codec operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Source unreadable or destination unwritable
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Container header or framing is invalid
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Bitstream does not decode to the declared length
    #[error("corruption error: {0}")]
    Corruption(#[from] CorruptionError),

    /// Tree or code table contract violated
    #[error("huffman error: {0}")]
    Huffman(#[from] HuffmanError),
}

impl Error {
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }

    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::Corruption(_))
    }
}

/// Container format errors, detected before any symbol is emitted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// Magic token missing or wrong
    #[error("invalid magic: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Container ended in the middle of a header field
    #[error("truncated {field}: need {needed} bytes, got {available}")]
    Truncated {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    /// More distinct symbols than the byte alphabet holds
    #[error("symbol count {count} exceeds alphabet size 256")]
    TooManySymbols { count: u16 },

    /// Symbol table entries must be strictly ascending by byte value
    #[error("symbol table out of order: {symbol:#04x} follows {previous:#04x}")]
    UnsortedSymbols { previous: u8, symbol: u8 },

    /// A listed symbol must occur at least once
    #[error("symbol {symbol:#04x} listed with zero frequency")]
    ZeroFrequency { symbol: u8 },

    /// Frequencies must add up to the declared original length
    #[error("frequency sum mismatch: header declares {declared} bytes, symbols sum to {actual:?}")]
    FrequencyMismatch { declared: u64, actual: Option<u64> },

    /// Trailing-bit count must be 0-7
    #[error("invalid trailing bit count {0}")]
    InvalidTrailingBits(u8),

    /// Payload carries fewer bits than the symbol table implies
    #[error("truncated payload: need {needed_bits} bits, got {available_bits}")]
    TruncatedPayload {
        needed_bits: u128,
        available_bits: u128,
    },
}

/// Bitstream corruption, detected while walking the tree.
///
/// Any output produced before this error is not valid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CorruptionError {
    /// Ran out of payload bits before all symbols were recovered
    #[error("payload exhausted after {decoded} of {expected} symbols")]
    PayloadExhausted { decoded: u64, expected: u64 },

    /// Walk ended on the synthetic zero-frequency leaf
    #[error("code at bit {position} resolves to the sentinel leaf")]
    SentinelReached { position: usize },

    /// Decoded output differs from the original during verification
    #[error("verification mismatch at byte {offset}")]
    VerificationMismatch { offset: u64 },
}

/// Huffman tree construction errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HuffmanError {
    /// No symbols with non-zero frequency (cannot build a tree)
    #[error("empty frequency table: cannot build tree")]
    EmptyFrequencyTable,

    /// Input byte has no entry in the code table it is packed with
    #[error("symbol {symbol:#04x} has no code")]
    MissingCode { symbol: u8 },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
