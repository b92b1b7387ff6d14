//! Bit-level packing and unpacking.
//!
//! Both directions work MSB-first: the first bit written lands in the high
//! bit of the first byte.
//!
//! # Padding Rules
//! - BitWriter: pads an incomplete final byte with low zero bits and reports
//!   how many of its high bits are meaningful (the trailing-bit count)
//! - BitReader: honours the trailing-bit count, so padding is never read
//!
//! # Example
//! ```
//! use huffpack_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! for bit in [true, false, true, true, true] {
//!     writer.write_bit(bit);
//! }
//! let (bytes, trailing_bits) = writer.finish();
//! assert_eq!(bytes, vec![0b1011_1000]);
//! assert_eq!(trailing_bits, 5);
//!
//! let mut reader = BitReader::new(&bytes, trailing_bits);
//! assert_eq!(reader.bits_remaining(), 5);
//! assert_eq!(reader.read_bit(), Some(true));
//! ```

use crate::codes::Code;

/// Packs bits MSB-first into a byte buffer.
///
/// # Invariants
/// - `filled` is always < 8; a full accumulator is flushed immediately
#[derive(Debug, Clone)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte, right-aligned
    acc: u8,
    /// Number of bits in `acc` (0-7)
    filled: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Writer with room for `bytes` completed bytes.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            acc: 0,
            filled: 0,
        }
    }

    /// Shift one bit into the accumulator, emitting a byte once it is full.
    pub fn write_bit(&mut self, bit: bool) {
        self.acc = (self.acc << 1) | bit as u8;
        self.filled += 1;
        if self.filled == 8 {
            self.bytes.push(self.acc);
            self.acc = 0;
            self.filled = 0;
        }
    }

    /// Write every bit of a code word in order.
    pub fn write_code(&mut self, code: &Code) {
        for &bit in code.bits() {
            self.write_bit(bit);
        }
    }

    /// Finish writing, returning the bytes and the trailing-bit count.
    ///
    /// A partial final byte is left-shifted so its meaningful bits sit at the
    /// top. The count is 0 when the last byte is full (or nothing was written).
    pub fn finish(mut self) -> (Vec<u8>, u8) {
        let trailing_bits = self.filled;
        if self.filled > 0 {
            self.bytes.push(self.acc << (8 - self.filled));
        }
        (self.bytes, trailing_bits)
    }

    /// Total number of bits written so far.
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.filled as usize
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads bits MSB-first from a packed payload.
///
/// The final byte contributes only `trailing_bits` bits when that count is
/// 1-7, and all 8 when it is 0.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Current bit position (0 = MSB of first byte)
    position: usize,
    /// Number of meaningful bits in `data`
    limit: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8], trailing_bits: u8) -> Self {
        Self {
            data,
            position: 0,
            limit: meaningful_bits(data.len(), trailing_bits),
        }
    }

    /// Read the next bit, or `None` once the meaningful bits are used up.
    pub fn read_bit(&mut self) -> Option<bool> {
        if self.position >= self.limit {
            return None;
        }
        let byte = self.data[self.position / 8];
        let bit = (byte >> (7 - self.position % 8)) & 1 == 1;
        self.position += 1;
        Some(bit)
    }

    /// Return the number of meaningful bits not yet read.
    pub fn bits_remaining(&self) -> usize {
        self.limit - self.position
    }

    /// Return the current bit position.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.position >= self.limit
    }
}

/// Meaningful bits in a payload of `len` bytes with the given trailing count.
pub fn meaningful_bits(len: usize, trailing_bits: u8) -> usize {
    match (len, trailing_bits) {
        (0, _) => 0,
        (n, 0) => n * 8,
        (n, t) => (n - 1) * 8 + t as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_all(bits: &[u8]) -> (Vec<u8>, u8) {
        let mut writer = BitWriter::new();
        for &b in bits {
            writer.write_bit(b == 1);
        }
        writer.finish()
    }

    #[test]
    fn test_full_byte_has_zero_trailing() {
        let (bytes, trailing) = write_all(&[1, 0, 1, 1, 0, 0, 1, 1]);
        assert_eq!(bytes, vec![0b10110011]);
        assert_eq!(trailing, 0);
    }

    #[test]
    fn test_padding() {
        let (bytes, trailing) = write_all(&[1]);
        assert_eq!(bytes, vec![0b10000000]);
        assert_eq!(trailing, 1);
    }

    #[test]
    fn test_multi_byte_partial() {
        let (bytes, trailing) = write_all(&[1, 1, 1, 1, 0, 0, 0, 0, 1, 0, 1]);
        assert_eq!(bytes, vec![0b11110000, 0b10100000]);
        assert_eq!(trailing, 3);
    }

    #[test]
    fn test_nothing_written() {
        let writer = BitWriter::new();
        assert_eq!(writer.bit_len(), 0);
        let (bytes, trailing) = writer.finish();
        assert!(bytes.is_empty());
        assert_eq!(trailing, 0);
    }

    #[test]
    fn test_reader_stops_at_trailing_bits() {
        let data = [0xFF, 0b1010_0000];
        let mut reader = BitReader::new(&data, 3);
        assert_eq!(reader.bits_remaining(), 11);
        for _ in 0..8 {
            assert_eq!(reader.read_bit(), Some(true));
        }
        assert_eq!(reader.read_bit(), Some(true));
        assert_eq!(reader.read_bit(), Some(false));
        assert_eq!(reader.read_bit(), Some(true));
        assert_eq!(reader.read_bit(), None);
        assert!(reader.is_empty());
        assert_eq!(reader.position(), 11);
    }

    #[test]
    fn test_reader_zero_trailing_reads_whole_byte() {
        let data = [0b0000_0001];
        let mut reader = BitReader::new(&data, 0);
        let bits: Vec<bool> = std::iter::from_fn(|| reader.read_bit()).collect();
        assert_eq!(bits.len(), 8);
        assert!(bits[7]);
        assert!(!bits[..7].iter().any(|&b| b));
    }

    #[test]
    fn test_meaningful_bits() {
        assert_eq!(meaningful_bits(0, 0), 0);
        assert_eq!(meaningful_bits(0, 5), 0);
        assert_eq!(meaningful_bits(3, 0), 24);
        assert_eq!(meaningful_bits(3, 1), 17);
    }

    #[test]
    fn test_writer_reader_agree() {
        let pattern: Vec<u8> = (0..77).map(|i| ((i * 7) % 3 == 0) as u8).collect();
        let (bytes, trailing) = write_all(&pattern);
        let mut reader = BitReader::new(&bytes, trailing);
        let read: Vec<u8> = std::iter::from_fn(|| reader.read_bit().map(|b| b as u8)).collect();
        assert_eq!(read, pattern);
    }
}
