//! Integration tests for the full codec pipeline.
//!
//! These tests verify end-to-end behavior: input -> encode -> container ->
//! decode -> output, with verification that output matches input, plus the
//! file helpers and corruption handling.

use huffpack_core::{
    container::parse_container, decode, decode_file, encode, encode_file, verify_roundtrip, Error,
    FormatError,
};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_bytes(seed: u64, len: usize, alphabet: u8) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(0..=alphabet)).collect()
}

/// S = "AAAABBBCCD": four symbols, ten bytes.
#[test]
fn test_aaaabbbccd_scenario() {
    let input = b"AAAABBBCCD";
    let container = encode(input).expect("encode failed");

    let parsed = parse_container(&container).expect("parse failed");
    assert_eq!(parsed.header.original_length, 10);
    assert_eq!(parsed.header.symbol_count(), 4);
    assert_eq!(parsed.header.freqs.get(b'A'), 4);
    assert_eq!(parsed.header.freqs.get(b'D'), 1);

    assert_eq!(decode(&container).expect("decode failed"), input);
}

/// S = "": header only.
#[test]
fn test_empty_scenario() {
    let container = encode(b"").unwrap();
    let parsed = parse_container(&container).unwrap();
    assert_eq!(parsed.header.original_length, 0);
    assert_eq!(parsed.header.symbol_count(), 0);
    assert!(parsed.payload.is_empty());
    assert_eq!(decode(&container).unwrap(), b"");
}

/// S = "ZZZZZ": decoded without walking the tree.
#[test]
fn test_single_symbol_scenario() {
    let mut container = encode(b"ZZZZZ").unwrap();
    assert_eq!(parse_container(&container).unwrap().header.symbol_count(), 1);

    // Every set bit would lead a tree walk to the sentinel leaf
    let last = container.len() - 1;
    container[last] = 0xFF;
    assert_eq!(decode(&container).unwrap(), b"ZZZZZ");
}

#[test]
fn test_determinism() {
    let input = random_bytes(7, 4096, 40);
    assert_eq!(encode(&input).unwrap(), encode(&input).unwrap());
}

#[test]
fn test_header_consistency_random_inputs() {
    for seed in 0..20u64 {
        let len = (seed as usize * 97) % 3000;
        let alphabet = (seed * 13 % 256) as u8;
        let input = random_bytes(seed, len, alphabet);

        let container = encode(&input).unwrap();
        let parsed = parse_container(&container).unwrap();

        let mut distinct = input.clone();
        distinct.sort_unstable();
        distinct.dedup();

        assert_eq!(parsed.header.original_length, input.len() as u64);
        assert_eq!(parsed.header.symbol_count(), distinct.len());
        assert_eq!(decode(&container).unwrap(), input, "seed {}", seed);
    }
}

/// Test with all symbols present (full 256-byte alphabet).
#[test]
fn test_all_symbols() {
    let input: Vec<u8> = (0..=255).collect();
    let container = encode(&input).unwrap();
    assert_eq!(parse_container(&container).unwrap().header.symbol_count(), 256);
    assert_eq!(decode(&container).unwrap(), input);
}

/// Skewed frequencies produce long codes.
#[test]
fn test_fibonacci_frequencies() {
    let mut input = Vec::new();
    let (mut a, mut b) = (1usize, 1usize);
    for symbol in 0..20u8 {
        input.extend(std::iter::repeat(symbol).take(a));
        let next = a + b;
        a = b;
        b = next;
    }
    let container = encode(&input).unwrap();
    assert_eq!(decode(&container).unwrap(), input);
}

#[test]
fn test_large_compressible_data() {
    let input = b"The quick brown fox jumps over the lazy dog. ".repeat(500);
    let container = encode(&input).unwrap();
    assert!(container.len() < input.len());
    assert_eq!(decode(&container).unwrap(), input);
}

#[test]
fn test_payload_bit_flips_never_decode_wrong_length() {
    let input = b"hello world! this is a test of corruption handling: aaaaaaaaaa bbbbbb";
    let container = encode(input).unwrap();
    let header_len = parse_container(&container).unwrap().header.encoded_len();

    for byte in header_len..container.len() {
        for bit in 0..8 {
            let mut corrupted = container.clone();
            corrupted[byte] ^= 1 << bit;
            match decode(&corrupted) {
                Ok(decoded) => assert_eq!(decoded.len(), input.len()),
                Err(e) => assert!(e.is_corruption(), "unexpected error kind: {}", e),
            }
        }
    }
}

#[test]
fn test_verify_roundtrip_random() {
    let input = random_bytes(99, 10_000, 255);
    let container = encode(&input).unwrap();
    verify_roundtrip(&input, &container).unwrap();
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("input.bin");
    let packed = dir.path().join("input.huf");
    let restored = dir.path().join("restored.bin");

    let input = random_bytes(3, 20_000, 60);
    std::fs::write(&src, &input).unwrap();

    let stats = encode_file(&src, &packed).unwrap();
    assert_eq!(stats.original_bytes, input.len() as u64);
    assert_eq!(stats.compressed_bytes, std::fs::metadata(&packed).unwrap().len());

    let written = decode_file(&packed, &restored).unwrap();
    assert_eq!(written, input.len() as u64);
    assert_eq!(std::fs::read(&restored).unwrap(), input);
}

#[test]
fn test_empty_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("empty.txt");
    let packed = dir.path().join("empty.huf");
    let restored = dir.path().join("empty.out");
    std::fs::write(&src, b"").unwrap();

    encode_file(&src, &packed).unwrap();
    assert_eq!(decode_file(&packed, &restored).unwrap(), 0);
    assert!(std::fs::read(&restored).unwrap().is_empty());
}

#[test]
fn test_missing_source_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = encode_file(&dir.path().join("absent"), &dir.path().join("out"));
    assert!(matches!(result, Err(e) if e.is_io()));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_failed_decode_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("bad.huf");
    let dst = dir.path().join("bad.out");
    std::fs::write(&src, b"NOPE this is not a container").unwrap();

    let result = decode_file(&src, &dst);
    assert!(matches!(
        result,
        Err(Error::Format(FormatError::InvalidMagic { .. }))
    ));
    assert!(!dst.exists());
}

proptest! {
    #[test]
    fn prop_round_trip(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let container = encode(&data).unwrap();
        prop_assert_eq!(decode(&container).unwrap(), data);
    }

    #[test]
    fn prop_narrow_alphabet_round_trip(data in proptest::collection::vec(0u8..3, 0..512)) {
        let first = encode(&data).unwrap();
        prop_assert_eq!(&first, &encode(&data).unwrap());
        prop_assert_eq!(decode(&first).unwrap(), data);
    }
}
