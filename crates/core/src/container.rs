//! Container serialization and parsing.
//!
//! A container packages one Huffman-coded payload with everything needed to
//! rebuild its tree. No external code table is ever required.
//!
//! # Container Format
//!
//! ```text
//! +----------------------+
//! | Magic (4 bytes)      |  "HUF1"
//! +----------------------+
//! | original_length (8)  |  u64 little-endian; 0 ends the container
//! +----------------------+
//! | symbol_count (2)     |  u16 distinct symbols, at most 256
//! +----------------------+
//! | symbol table         |  symbol_count x (u8 symbol, u64 frequency),
//! | (variable)           |  strictly ascending by symbol
//! +----------------------+
//! | trailing_bits (1)    |  0 = last payload byte full, 1-7 = meaningful
//! |                      |  high bits of the last payload byte
//! +----------------------+
//! | payload              |  packed bitstream, MSB-first
//! | (variable)           |
//! +----------------------+
//! ```
//!
//! The canonical empty container is the magic followed by
//! `original_length = 0`, `symbol_count = 0` and `trailing_bits = 0`.

use crate::error::{FormatError, Result};
use crate::freq::{FrequencyTable, ALPHABET_SIZE};

/// Magic token identifying format version 1.
pub const MAGIC: [u8; 4] = *b"HUF1";

/// Fixed bytes before the symbol table: magic, length, symbol count.
pub const FIXED_HEADER_SIZE: usize = 4 + 8 + 2;

/// Bytes per symbol table entry.
pub const SYMBOL_ENTRY_SIZE: usize = 1 + 8;

/// Parsed or to-be-written container header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Decoded byte count
    pub original_length: u64,

    /// Frequencies of every present symbol; sums to `original_length`
    pub freqs: FrequencyTable,

    /// Meaningful bits in the last payload byte (0 = full byte)
    pub trailing_bits: u8,
}

impl ContainerHeader {
    /// Header of the canonical empty-input container.
    pub fn empty() -> Self {
        Self {
            original_length: 0,
            freqs: FrequencyTable::new(),
            trailing_bits: 0,
        }
    }

    /// Number of present symbols, as written to the symbol_count field.
    pub fn symbol_count(&self) -> usize {
        self.freqs.distinct()
    }

    /// Serialized size of this header in bytes.
    pub fn encoded_len(&self) -> usize {
        FIXED_HEADER_SIZE + self.symbol_count() * SYMBOL_ENTRY_SIZE + 1
    }

    /// Append the serialized header to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&self.original_length.to_le_bytes());
        // At most 256 symbols, which fits a u16
        out.extend_from_slice(&(self.symbol_count() as u16).to_le_bytes());
        for (symbol, freq) in self.freqs.present() {
            out.push(symbol);
            out.extend_from_slice(&freq.to_le_bytes());
        }
        out.push(self.trailing_bits);
    }
}

/// A parsed container borrowing its payload from the input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container<'a> {
    pub header: ContainerHeader,
    pub payload: &'a [u8],
}

/// Serialize a header followed by its payload.
pub fn serialize_container(header: &ContainerHeader, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(header.encoded_len() + payload.len());
    header.write_to(&mut out);
    out.extend_from_slice(payload);
    out
}

/// Parse a container from bytes.
///
/// An `original_length` of 0 stops parsing: the rest of the buffer is not
/// read and the returned payload is empty.
///
/// # Errors
/// - `FormatError::InvalidMagic` if the magic token doesn't match
/// - `FormatError::Truncated` if any header field is cut short
/// - `FormatError::TooManySymbols` if symbol_count exceeds 256
/// - `FormatError::UnsortedSymbols` / `ZeroFrequency` for a malformed table
/// - `FormatError::FrequencyMismatch` if frequencies don't sum to the length
/// - `FormatError::InvalidTrailingBits` if trailing_bits exceeds 7
pub fn parse_container(bytes: &[u8]) -> Result<Container<'_>> {
    let mut reader = HeaderReader::new(bytes);

    let magic: [u8; 4] = reader.take_array("magic")?;
    if magic != MAGIC {
        return Err(FormatError::InvalidMagic {
            expected: MAGIC,
            actual: magic,
        }
        .into());
    }

    let original_length = u64::from_le_bytes(reader.take_array("original_length")?);
    if original_length == 0 {
        return Ok(Container {
            header: ContainerHeader::empty(),
            payload: &[],
        });
    }

    let symbol_count = u16::from_le_bytes(reader.take_array("symbol_count")?);
    if symbol_count as usize > ALPHABET_SIZE {
        return Err(FormatError::TooManySymbols {
            count: symbol_count,
        }
        .into());
    }

    let mut pairs = Vec::with_capacity(symbol_count as usize);
    let mut previous: Option<u8> = None;
    for _ in 0..symbol_count {
        let [symbol] = reader.take_array::<1>("symbol table")?;
        let freq = u64::from_le_bytes(reader.take_array("symbol table")?);
        if let Some(prev) = previous {
            if symbol <= prev {
                return Err(FormatError::UnsortedSymbols {
                    previous: prev,
                    symbol,
                }
                .into());
            }
        }
        if freq == 0 {
            return Err(FormatError::ZeroFrequency { symbol }.into());
        }
        previous = Some(symbol);
        pairs.push((symbol, freq));
    }

    let freqs = FrequencyTable::from_pairs(pairs);
    let actual = freqs.as_ref().map(FrequencyTable::total);
    let freqs = match freqs {
        Some(table) if table.total() == original_length => table,
        _ => {
            return Err(FormatError::FrequencyMismatch {
                declared: original_length,
                actual,
            }
            .into())
        }
    };

    let [trailing_bits] = reader.take_array::<1>("trailing_bits")?;
    if trailing_bits > 7 {
        return Err(FormatError::InvalidTrailingBits(trailing_bits).into());
    }

    Ok(Container {
        header: ContainerHeader {
            original_length,
            freqs,
            trailing_bits,
        },
        payload: reader.rest(),
    })
}

/// Sequential reader over header bytes that reports which field ran short.
struct HeaderReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> HeaderReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn take_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N]> {
        let available = self.bytes.len() - self.offset;
        if available < N {
            return Err(FormatError::Truncated {
                field,
                needed: N,
                available,
            }
            .into());
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.offset..self.offset + N]);
        self.offset += N;
        Ok(out)
    }

    fn rest(&self) -> &'a [u8] {
        &self.bytes[self.offset..]
    }
}
