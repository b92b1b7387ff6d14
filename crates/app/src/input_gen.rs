//! Sample input generation.
//!
//! `huffpack sample` writes seeded data whose segments compress very
//! differently, so the statistics report has something to show:
//! - Long runs of one byte (single-symbol segments)
//! - Word-like text over a small alphabet
//! - Skewed bytes where low values dominate
//! - Uniform random bytes (near-incompressible)

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::io::Write;
use std::path::Path;

const SEGMENT_BYTES: usize = 4096;

const WORDS: &[&[u8]] = &[
    b"the", b"tree", b"code", b"leaf", b"bit", b"frequency", b"symbol", b"merge", b"left",
    b"right", b"packed", b"byte",
];

/// Generate `size_bytes` of mixed-compressibility data from `seed`.
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let len = SEGMENT_BYTES.min(size_bytes - data.len());
        match rng.gen_range(0..4u8) {
            0 => {
                let byte: u8 = rng.gen();
                data.resize(data.len() + len, byte);
            }
            1 => push_words(&mut rng, &mut data, len),
            2 => {
                for _ in 0..len {
                    // Each band of 32 values is half as likely as the one below
                    let band = rng.gen::<u32>().leading_zeros().min(7) as u8;
                    data.push(band * 32 + rng.gen_range(0..32u8));
                }
            }
            _ => {
                for _ in 0..len {
                    data.push(rng.gen());
                }
            }
        }
    }

    data.truncate(size_bytes);
    data
}

fn push_words(rng: &mut ChaCha8Rng, data: &mut Vec<u8>, len: usize) {
    let end = data.len() + len;
    while data.len() < end {
        let word = WORDS[rng.gen_range(0..WORDS.len())];
        data.extend_from_slice(word);
        data.push(if rng.gen_ratio(1, 12) { b'\n' } else { b' ' });
    }
    data.truncate(end);
}

/// Write generated data to a file.
pub fn write_sample_file(path: &Path, seed: u64, size_bytes: usize) -> std::io::Result<()> {
    let data = generate_sample_data(seed, size_bytes);
    let mut file = std::fs::File::create(path)?;
    file.write_all(&data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_sizes() {
        for size in [0, 1, 100, SEGMENT_BYTES, SEGMENT_BYTES + 1, 50_000] {
            assert_eq!(generate_sample_data(999, size).len(), size);
        }
    }

    #[test]
    fn test_determinism() {
        assert_eq!(generate_sample_data(12345, 20_000), generate_sample_data(12345, 20_000));
    }

    #[test]
    fn test_different_seeds() {
        assert_ne!(generate_sample_data(1, 20_000), generate_sample_data(2, 20_000));
    }

    #[test]
    fn test_sample_round_trips() {
        let data = generate_sample_data(7, 30_000);
        let container = huffpack_core::encode(&data).unwrap();
        assert_eq!(huffpack_core::decode(&container).unwrap(), data);
    }

    #[test]
    fn test_write_sample_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.bin");
        write_sample_file(&path, 5, 1234).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), generate_sample_data(5, 1234));
    }
}
