//! huffpack-core: lossless byte compression with a deterministic Huffman code
//!
//! This library turns any byte sequence into a self-describing container and
//! back, byte for byte:
//! - Counts byte frequencies in one pass
//! - Builds a Huffman tree with a fixed (frequency, symbol) tie-break
//! - Derives a prefix-free code per symbol and packs the bitstream
//! - Frames the frequencies, trailing-bit count and payload in a container
//!
//! # Architecture
//!
//! Modules follow the data flow, leaves first:
//! - `freq`: Frequency Counter
//! - `tree`: Huffman Tree Builder
//! - `codes`: Code Table Generator
//! - `bitio`: Bit Packer / Unpacker
//! - `container`: on-disk format
//! - `codec`: encode/decode drivers and file helpers
//! - `stats`: entropy and efficiency reporting
//!
//! # Example
//!
//! ```
//! let container = huffpack_core::encode(b"AAAABBBCCD")?;
//! assert_eq!(huffpack_core::decode(&container)?, b"AAAABBBCCD");
//! # Ok::<(), huffpack_core::Error>(())
//! ```

pub mod bitio;
pub mod codec;
pub mod codes;
pub mod container;
pub mod error;
pub mod freq;
pub mod stats;
pub mod tree;

// Re-export commonly used types
pub use codec::{decode, decode_file, encode, encode_file, encode_with_stats, verify_roundtrip};
pub use error::{CorruptionError, Error, FormatError, HuffmanError, Result};
pub use freq::{count_frequencies, FrequencyTable};
pub use stats::CompressionStats;
