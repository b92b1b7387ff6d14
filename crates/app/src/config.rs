//! Configuration for the huffpack command line.
//!
//! Arguments are parsed by hand: a subcommand, its positional paths, then
//! flags. Anything left unspecified gets a default, and generated defaults
//! (the sample seed) are printed so runs are reproducible.

use std::path::PathBuf;

/// Default size of a generated sample file.
pub const DEFAULT_SAMPLE_BYTES: usize = 65536;

/// What the invocation should do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Compress `input` into the container `output`
    Encode {
        input: PathBuf,
        output: PathBuf,
        /// Decode the written container and compare with the input
        verify: bool,
        /// Print compression statistics
        stats: bool,
    },

    /// Decompress the container `input` into `output`
    Decode { input: PathBuf, output: PathBuf },

    /// Report frequencies and entropy of `input` without writing anything
    Stats { input: PathBuf },

    /// Write generated sample data to `output`
    Sample {
        output: PathBuf,
        seed: u64,
        size: usize,
    },
}

/// Complete configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub command: Command,

    /// Raise the log level to debug
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command-line arguments (program name excluded).
    ///
    /// Returns `Ok(None)` when help was requested.
    pub fn from_args(args: &[String]) -> Result<Option<Self>, String> {
        let mut positional: Vec<&str> = Vec::new();
        let mut verify = false;
        let mut stats = false;
        let mut verbose = false;
        let mut seed: Option<u64> = None;
        let mut size: Option<usize> = None;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--verify" => verify = true,
                "--stats" => stats = true,
                "--verbose" | "-v" => verbose = true,
                "--seed" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--seed requires a number".to_string());
                    }
                    seed = Some(args[i].parse().map_err(|_| "invalid seed")?);
                }
                "--size" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--size requires a number".to_string());
                    }
                    size = Some(args[i].parse().map_err(|_| "invalid size")?);
                }
                "--help" | "-h" => return Ok(None),
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(format!("unknown argument: {}", flag));
                }
                value => positional.push(value),
            }
            i += 1;
        }

        let (name, rest) = match positional.split_first() {
            Some((name, rest)) => (*name, rest),
            None => return Err("missing command".to_string()),
        };

        let command = match (name, rest) {
            ("encode", [input, output]) => Command::Encode {
                input: PathBuf::from(input),
                output: PathBuf::from(output),
                verify,
                stats,
            },
            ("decode", [input, output]) => Command::Decode {
                input: PathBuf::from(input),
                output: PathBuf::from(output),
            },
            ("stats", [input]) => Command::Stats {
                input: PathBuf::from(input),
            },
            ("sample", [output]) => Command::Sample {
                output: PathBuf::from(output),
                seed: seed.unwrap_or_else(clock_seed),
                size: size.unwrap_or(DEFAULT_SAMPLE_BYTES),
            },
            ("encode" | "decode", _) => {
                return Err(format!("{} requires <input> <output>", name));
            }
            ("stats", _) => return Err("stats requires <input>".to_string()),
            ("sample", _) => return Err("sample requires <output>".to_string()),
            (other, _) => return Err(format!("unknown command: {}", other)),
        };

        Ok(Some(Config { command, verbose }))
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.command {
            Command::Encode {
                input,
                output,
                verify,
                stats,
            } => {
                println!("Mode: encode");
                println!("Input:  {}", input.display());
                println!("Output: {}", output.display());
                println!("Verify: {}", verify);
                println!("Stats:  {}", stats);
            }
            Command::Decode { input, output } => {
                println!("Mode: decode");
                println!("Input:  {}", input.display());
                println!("Output: {}", output.display());
            }
            Command::Stats { input } => {
                println!("Mode: stats");
                println!("Input: {}", input.display());
            }
            Command::Sample { output, seed, size } => {
                println!("Mode: sample");
                println!("Output: {}", output.display());
                println!("Seed: {}", seed);
                println!("Size: {} bytes ({} KiB)", size, size / 1024);
            }
        }
        println!();
    }
}

fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub fn print_help() {
    println!("huffpack: lossless Huffman compression");
    println!();
    println!("USAGE:");
    println!("    huffpack <COMMAND> [ARGS] [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    encode <IN> <OUT>       Compress IN into the container OUT");
    println!("    decode <IN> <OUT>       Restore the container IN into OUT");
    println!("    stats <IN>              Show frequency and entropy report for IN");
    println!("    sample <OUT>            Write generated sample data to OUT");
    println!();
    println!("OPTIONS:");
    println!("    --verify                After encode, decode and compare with the input");
    println!("    --stats                 After encode, print compression statistics");
    println!("    --seed <N>              Sample seed (default: from clock)");
    println!("    --size <N>              Sample size in bytes (default: {})", DEFAULT_SAMPLE_BYTES);
    println!("    --verbose, -v           Debug logging (or set RUST_LOG)");
    println!("    --help, -h              Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    huffpack encode input.txt compressed.huf --stats --verify");
    println!("    huffpack decode compressed.huf restored.txt");
    println!("    huffpack sample input.bin --seed 42 --size 100000");
    println!();
}
