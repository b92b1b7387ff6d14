//! huffpack: command-line front end for the huffpack codec.

mod config;
mod input_gen;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::process::ExitCode;

use huffpack_core::codes::CodeTable;
use huffpack_core::container::ContainerHeader;
use huffpack_core::tree::HuffmanTree;
use huffpack_core::{count_frequencies, CompressionStats, FrequencyTable};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use config::{Command, Config};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(Some(config)) => config,
        Ok(None) => {
            config::print_help();
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("error: {}", msg);
            eprintln!("run with --help for usage");
            return ExitCode::from(2);
        }
    };

    init_logging(config.verbose);
    debug!(?config, "starting");

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(config: &Config) -> huffpack_core::Result<()> {
    match &config.command {
        Command::Encode {
            input,
            output,
            verify,
            stats,
        } => {
            let summary = huffpack_core::encode_file(input, output)?;
            println!(
                "encoded {} -> {} ({} -> {} bytes)",
                input.display(),
                output.display(),
                summary.original_bytes,
                summary.compressed_bytes
            );
            if *stats {
                summary.print_summary();
            }
            if *verify {
                let original = std::fs::read(input)?;
                let container = std::fs::read(output)?;
                huffpack_core::verify_roundtrip(&original, &container)?;
                println!("verification: files match");
            }
        }
        Command::Decode { input, output } => {
            let written = huffpack_core::decode_file(input, output)?;
            println!(
                "decoded {} -> {} ({} bytes)",
                input.display(),
                output.display(),
                written
            );
        }
        Command::Stats { input } => {
            let freqs = read_frequencies(input)?;
            report_frequencies(&freqs)?;
        }
        Command::Sample { output, seed, size } => {
            config.print();
            input_gen::write_sample_file(output, *seed, *size)?;
            println!("wrote {} sample bytes to {}", size, output.display());
        }
    }
    Ok(())
}

/// Count frequencies of a file, or of stdin for `-`.
fn read_frequencies(input: &Path) -> huffpack_core::Result<FrequencyTable> {
    let (freqs, total) = if input == Path::new("-") {
        count_frequencies(io::stdin().lock())?
    } else {
        count_frequencies(BufReader::new(File::open(input)?))?
    };
    debug!(total, distinct = freqs.distinct(), "counted frequencies");
    Ok(freqs)
}

/// Print per-symbol codes and the statistics an encode would produce.
fn report_frequencies(freqs: &FrequencyTable) -> huffpack_core::Result<()> {
    if freqs.is_empty() {
        let header = ContainerHeader::empty();
        CompressionStats::compute(freqs, None, header.encoded_len() as u64).print_summary();
        return Ok(());
    }

    let tree = HuffmanTree::build(freqs)?;
    let codes = CodeTable::from_tree(&tree);

    println!("=== Codes ===");
    for (symbol, code) in codes.iter() {
        let shown = if symbol.is_ascii_graphic() {
            format!("'{}'", symbol as char)
        } else {
            format!("{:#04x}", symbol)
        };
        println!("{:>6} {:>12}  {}", shown, freqs.get(symbol), code);
    }

    let header = ContainerHeader {
        original_length: freqs.total(),
        freqs: freqs.clone(),
        trailing_bits: 0,
    };
    let mut stats = CompressionStats::compute(freqs, Some(&codes), 0);
    let payload_bytes = stats.payload_bits.div_ceil(8) as u64;
    stats.compressed_bytes = header.encoded_len() as u64 + payload_bytes;
    stats.print_summary();
    Ok(())
}
