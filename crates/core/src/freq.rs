//! Byte frequency counting.
//!
//! A single pass over the source fills a 256-entry occurrence table. A total
//! of zero is a valid result and selects the empty-container encoding.

use std::io::{ErrorKind, Read};

use crate::error::Result;

/// Number of distinct byte values.
pub const ALPHABET_SIZE: usize = 256;

const READ_BUF_SIZE: usize = 8192;

/// Occurrence count for every byte value.
///
/// # Invariants
/// - `total` equals the sum of all counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
    total: u64,
}

impl FrequencyTable {
    /// All-zero table.
    pub fn new() -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
            total: 0,
        }
    }

    /// Count every byte of an in-memory buffer.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.update(data);
        table
    }

    /// Count every byte of a reader, reading each byte exactly once.
    ///
    /// # Errors
    /// Propagates any read failure other than `Interrupted`.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut table = Self::new();
        let mut buf = [0u8; READ_BUF_SIZE];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => table.update(&buf[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(table)
    }

    /// Rebuild a table from (symbol, count) pairs, as read from a container.
    ///
    /// Returns `None` if the counts overflow a u64 total. Repeated symbols
    /// accumulate.
    pub fn from_pairs<I>(pairs: I) -> Option<Self>
    where
        I: IntoIterator<Item = (u8, u64)>,
    {
        let mut table = Self::new();
        for (symbol, count) in pairs {
            let slot = &mut table.counts[symbol as usize];
            *slot = slot.checked_add(count)?;
            table.total = table.total.checked_add(count)?;
        }
        Some(table)
    }

    fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[byte as usize] += 1;
        }
        self.total += data.len() as u64;
    }

    /// Occurrences of one byte value.
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Total number of bytes counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of byte values with a non-zero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Present symbols and their counts, ascending by byte value.
    pub fn present(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }

    /// The only present symbol, if exactly one byte value occurs.
    pub fn single_symbol(&self) -> Option<u8> {
        let mut present = self.present();
        match (present.next(), present.next()) {
            (Some((symbol, _)), None) => Some(symbol),
            _ => None,
        }
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan a byte source once, returning the table and the total count.
pub fn count_frequencies<R: Read>(reader: R) -> Result<(FrequencyTable, u64)> {
    let table = FrequencyTable::from_reader(reader)?;
    let total = table.total();
    Ok((table, total))
}
