//! Compression statistics.
//!
//! Reports how close the generated code comes to the source's entropy:
//! - Sizes and compression ratio
//! - Average code length in bits per symbol
//! - Shannon entropy and coding efficiency
//!
//! Statistics are computed after encoding from the frequency table and code
//! table; they never influence the container.

use std::time::Duration;

use crate::codes::CodeTable;
use crate::freq::FrequencyTable;

/// Summary of one encode operation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionStats {
    /// Input size in bytes
    pub original_bytes: u64,

    /// Container size in bytes, header included
    pub compressed_bytes: u64,

    /// Distinct byte values in the input
    pub distinct_symbols: usize,

    /// Total payload bits (Σ frequency × code length)
    pub payload_bits: u128,

    /// Shannon entropy of the input, bits per symbol
    pub entropy: f64,

    /// Time spent encoding, when measured
    pub elapsed: Option<Duration>,
}

impl CompressionStats {
    /// Compute statistics from the tables an encode produced.
    ///
    /// `codes` is `None` for the empty input, which has no tree.
    pub fn compute(freqs: &FrequencyTable, codes: Option<&CodeTable>, compressed_bytes: u64) -> Self {
        let total = freqs.total();
        let payload_bits = codes.map_or(0, |codes| {
            freqs
                .present()
                .map(|(symbol, count)| {
                    let len = codes.get(symbol).map_or(0, |c| c.len());
                    count as u128 * len as u128
                })
                .sum::<u128>()
        });

        let entropy = if total == 0 {
            0.0
        } else {
            freqs
                .present()
                .map(|(_, count)| {
                    let p = count as f64 / total as f64;
                    -p * p.log2()
                })
                .sum::<f64>()
        };

        Self {
            original_bytes: total,
            compressed_bytes,
            distinct_symbols: freqs.distinct(),
            payload_bits,
            entropy,
            elapsed: None,
        }
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }

    /// Compressed / original size. Returns 0.0 for empty input.
    pub fn compression_ratio(&self) -> f64 {
        if self.original_bytes == 0 {
            0.0
        } else {
            self.compressed_bytes as f64 / self.original_bytes as f64
        }
    }

    /// Average code length in bits per input byte.
    pub fn avg_bits_per_symbol(&self) -> f64 {
        if self.original_bytes == 0 {
            0.0
        } else {
            self.payload_bits as f64 / self.original_bytes as f64
        }
    }

    /// Entropy / average code length, as a percentage.
    ///
    /// A single-symbol input has zero entropy and a 1-bit code, so its
    /// efficiency is 0.
    pub fn efficiency_percent(&self) -> f64 {
        let avg = self.avg_bits_per_symbol();
        if avg == 0.0 {
            0.0
        } else {
            self.entropy / avg * 100.0
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Compression ===");
        println!("Original:   {} bytes", self.original_bytes);
        println!("Compressed: {} bytes", self.compressed_bytes);
        println!("Ratio (compressed/original): {:.3}", self.compression_ratio());
        println!("Distinct symbols: {}", self.distinct_symbols);
        println!("Average bits/symbol: {:.3}", self.avg_bits_per_symbol());
        println!("Entropy: {:.3} bits/symbol", self.entropy);
        println!("Efficiency (entropy/average): {:.1}%", self.efficiency_percent());
        if let Some(elapsed) = self.elapsed {
            println!("Time: {} ms", elapsed.as_millis());
        }
        println!();
    }

    /// Export statistics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "original_bytes={}\n\
             compressed_bytes={}\n\
             compression_ratio={:.4}\n\
             distinct_symbols={}\n\
             payload_bits={}\n\
             avg_bits_per_symbol={:.4}\n\
             entropy={:.4}\n\
             efficiency_percent={:.2}\n",
            self.original_bytes,
            self.compressed_bytes,
            self.compression_ratio(),
            self.distinct_symbols,
            self.payload_bits,
            self.avg_bits_per_symbol(),
            self.entropy,
            self.efficiency_percent(),
        )
    }
}
