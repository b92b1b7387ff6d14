//! End-to-end encode and decode.
//!
//! Encode runs Frequency Counter, Tree Builder, Code Generator and Bit Packer
//! in that order and frames the result as a container. Decode parses the
//! container, rebuilds the identical tree from the stored frequencies and
//! walks the payload bit by bit.
//!
//! Two inputs take dedicated paths in both directions:
//! - Empty input: header only, no tree is built
//! - One distinct symbol: encoded with the 1-bit code `0`, decoded by
//!   repeating the symbol without walking the tree

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::bitio::{meaningful_bits, BitReader, BitWriter};
use crate::codes::CodeTable;
use crate::container::{parse_container, serialize_container, Container, ContainerHeader};
use crate::error::{CorruptionError, FormatError, HuffmanError, Result};
use crate::freq::FrequencyTable;
use crate::stats::CompressionStats;
use crate::tree::{HuffmanTree, Node};

/// Compress `data` into a self-describing container.
pub fn encode(data: &[u8]) -> Result<Vec<u8>> {
    encode_with_stats(data).map(|(container, _)| container)
}

/// Compress `data`, also reporting sizes, entropy and code efficiency.
pub fn encode_with_stats(data: &[u8]) -> Result<(Vec<u8>, CompressionStats)> {
    let start = Instant::now();
    let freqs = FrequencyTable::from_bytes(data);

    if freqs.is_empty() {
        debug!("empty input, writing header-only container");
        let container = serialize_container(&ContainerHeader::empty(), &[]);
        let stats = CompressionStats::compute(&freqs, None, container.len() as u64)
            .with_elapsed(start.elapsed());
        return Ok((container, stats));
    }

    let tree = HuffmanTree::build(&freqs)?;
    let codes = CodeTable::from_tree(&tree);
    let (payload, trailing_bits) = pack(data, &codes)?;

    let header = ContainerHeader {
        original_length: freqs.total(),
        freqs,
        trailing_bits,
    };
    let container = serialize_container(&header, &payload);
    debug!(
        original_length = header.original_length,
        symbol_count = header.symbol_count(),
        payload_bytes = payload.len(),
        trailing_bits,
        "encoded container"
    );

    let stats = CompressionStats::compute(&header.freqs, Some(&codes), container.len() as u64)
        .with_elapsed(start.elapsed());
    Ok((container, stats))
}

/// Pack the code of every byte of `data`, returning the payload and its
/// trailing-bit count.
///
/// # Errors
/// Returns `HuffmanError::MissingCode` if a byte has no code in `codes`.
pub fn pack(data: &[u8], codes: &CodeTable) -> Result<(Vec<u8>, u8)> {
    let mut writer = BitWriter::with_capacity(data.len() / 2);
    for &byte in data {
        let code = codes
            .get(byte)
            .ok_or(HuffmanError::MissingCode { symbol: byte })?;
        writer.write_code(code);
    }
    Ok(writer.finish())
}

/// Reconstruct the original bytes from a container.
///
/// # Errors
/// - `Error::Format` if the header is malformed or the payload is too short
/// - `Error::Corruption` if the bitstream does not decode to the declared
///   length
pub fn decode(container: &[u8]) -> Result<Vec<u8>> {
    let result = decode_container(container);
    if let Err(e) = &result {
        warn!(error = %e, "decode aborted");
    }
    result
}

fn decode_container(bytes: &[u8]) -> Result<Vec<u8>> {
    let Container { header, payload } = parse_container(bytes)?;
    let expected = header.original_length;

    if expected == 0 {
        debug!("empty container");
        return Ok(Vec::new());
    }

    if let Some(symbol) = header.freqs.single_symbol() {
        // 1-bit code, one bit per byte
        ensure_payload(payload, header.trailing_bits, expected as u128)?;
        debug!(symbol, original_length = expected, "single-symbol container");
        // The payload holds at least one bit per byte, so this fits in memory
        return Ok(vec![symbol; expected as usize]);
    }

    let tree = HuffmanTree::build(&header.freqs)?;
    let needed_bits = tree
        .depths()
        .into_iter()
        .map(|(symbol, depth)| header.freqs.get(symbol) as u128 * depth as u128)
        .sum::<u128>();
    ensure_payload(payload, header.trailing_bits, needed_bits)?;

    debug!(
        original_length = expected,
        symbol_count = header.symbol_count(),
        needed_bits,
        "decoding payload"
    );
    unpack(&tree, payload, header.trailing_bits, expected)
}

/// Fail with `TruncatedPayload` unless the payload holds `needed_bits`.
fn ensure_payload(payload: &[u8], trailing_bits: u8, needed_bits: u128) -> Result<()> {
    let available_bits = meaningful_bits(payload.len(), trailing_bits) as u128;
    if available_bits < needed_bits {
        return Err(FormatError::TruncatedPayload {
            needed_bits,
            available_bits,
        }
        .into());
    }
    Ok(())
}

/// Walk the tree once per output symbol: bit 0 goes left, bit 1 goes right.
///
/// Stops after `count` symbols even if payload bits remain.
///
/// # Errors
/// - `CorruptionError::PayloadExhausted` if the bits run out first
/// - `CorruptionError::SentinelReached` if a path ends on the sentinel leaf
pub fn unpack(tree: &HuffmanTree, payload: &[u8], trailing_bits: u8, count: u64) -> Result<Vec<u8>> {
    let mut reader = BitReader::new(payload, trailing_bits);
    // Every symbol costs at least one bit
    let capacity = (count as u128).min(reader.bits_remaining() as u128) as usize;
    let mut out = Vec::with_capacity(capacity);

    while (out.len() as u64) < count {
        let mut node = tree.root();
        loop {
            match node {
                Node::Leaf { .. } if node.is_sentinel() => {
                    return Err(CorruptionError::SentinelReached {
                        position: reader.position(),
                    }
                    .into());
                }
                Node::Leaf { symbol, .. } => {
                    out.push(*symbol);
                    break;
                }
                Node::Internal { left, right, .. } => {
                    let bit = reader
                        .read_bit()
                        .ok_or(CorruptionError::PayloadExhausted {
                            decoded: out.len() as u64,
                            expected: count,
                        })?;
                    node = if bit { right.as_ref() } else { left.as_ref() };
                }
            }
        }
    }

    Ok(out)
}

/// Decode `container` and check it reproduces `original` exactly.
///
/// # Errors
/// `CorruptionError::VerificationMismatch` at the first differing byte, or
/// any decode error.
pub fn verify_roundtrip(original: &[u8], container: &[u8]) -> Result<()> {
    let decoded = decode(container)?;
    let mismatch = original
        .iter()
        .zip(&decoded)
        .position(|(a, b)| a != b)
        .or_else(|| (original.len() != decoded.len()).then(|| original.len().min(decoded.len())));
    match mismatch {
        Some(offset) => Err(CorruptionError::VerificationMismatch {
            offset: offset as u64,
        }
        .into()),
        None => Ok(()),
    }
}

/// Compress the file at `src` into a container at `dst`.
///
/// `dst` is replaced only once the container is fully written; on any error
/// no file appears under that name.
pub fn encode_file(src: &Path, dst: &Path) -> Result<CompressionStats> {
    let data = fs::read(src)?;
    let (container, stats) = encode_with_stats(&data)?;
    write_atomically(dst, &container)?;
    debug!(src = %src.display(), dst = %dst.display(), bytes = container.len(), "wrote container");
    Ok(stats)
}

/// Decompress the container at `src` into `dst`, returning bytes written.
///
/// Nothing is written to `dst` unless the whole container decodes.
pub fn decode_file(src: &Path, dst: &Path) -> Result<u64> {
    let container = fs::read(src)?;
    let data = decode(&container)?;
    write_atomically(dst, &data)?;
    debug!(src = %src.display(), dst = %dst.display(), bytes = data.len(), "wrote output");
    Ok(data.len() as u64)
}

fn write_atomically(dst: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(dst).map_err(|e| e.error)?;
    Ok(())
}
