//! huffpack: compress or decompress one file with canonical Huffman coding.
//!
//! ## Usage
//!
//! ```bash
//! # The form wrapping services call
//! huffpack compress report.txt report.huf
//! huffpack decompress report.huf report.txt
//!
//! # Check the container before it is written, print statistics
//! huffpack compress --verify --stats report.txt report.huf
//!
//! # Look at a container header
//! huffpack inspect report.huf
//!
//! # Generate 4 MiB of test data
//! huffpack sample sample.bin --seed 42 --size 4194304
//! ```
//!
//! Exit status is 0 on success, 1 for unusable data, 2 for bad usage and
//! 3 for file system errors. Diagnostics go to stderr.

mod config;
mod error;
mod fileio;
mod input_gen;

use std::process::ExitCode;

use huffpack_core::{compress_with_stats, decompress, decompress_with_stats, inspect, ContainerInfo};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use config::{Command, Config, LOG_ENV};
use error::{AppError, Result};

fn main() -> ExitCode {
    let config = Config::from_env();
    init_logging(&config.log_level);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {err}");
    }
}

fn run(config: &Config) -> Result<()> {
    match &config.command {
        Command::Compress {
            input,
            output,
            verify,
        } => {
            let data = fileio::read_input(input)?;
            info!("Compressing '{}' to '{}'", input.display(), output.display());

            let (container, stats) = compress_with_stats(&data)?;
            if *verify {
                if decompress(&container)? != data {
                    return Err(AppError::Verify {
                        path: input.clone(),
                    });
                }
                info!("Verified round trip of {} bytes", data.len());
            }

            fileio::write_atomic(output, &container)?;
            info!(
                "Compressed {} bytes into {} bytes",
                stats.raw_bytes, stats.container_bytes
            );
            if config.print_stats {
                print!("{}", stats.summary());
            }
        }

        Command::Decompress { input, output } => {
            let container = fileio::read_input(input)?;
            info!("Decompressing '{}' to '{}'", input.display(), output.display());

            let (data, stats) = decompress_with_stats(&container)?;
            fileio::write_atomic(output, &data)?;
            info!(
                "Restored {} bytes from {} bytes",
                stats.raw_bytes, stats.container_bytes
            );
            if config.print_stats {
                print!("{}", stats.summary());
            }
        }

        Command::Inspect { input } => {
            let container = fileio::read_input(input)?;
            print!("{}", describe(&inspect(&container)?));
        }

        Command::Sample { output, seed, size } => {
            let seed = seed.unwrap_or_else(clock_seed);
            info!("Generating {size} sample bytes with seed {seed}");
            fileio::write_atomic(output, &input_gen::generate_sample_data(seed, *size))?;
        }
    }

    Ok(())
}

fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Render a container header for humans.
fn describe(info: &ContainerInfo) -> String {
    let mut out = String::new();
    out.push_str(&format!("Version: {}\n", info.version));
    out.push_str(&format!("Original size: {} bytes\n", info.original_len));
    out.push_str(&format!("CRC-32: {:#010x}\n", info.crc32));
    out.push_str(&format!("Header: {} bytes\n", info.header_len));
    out.push_str(&format!("Payload: {} bytes\n", info.payload_len));
    out.push_str(&format!("Symbols: {}\n", info.code_lengths.len()));
    for &(symbol, length) in &info.code_lengths {
        let label = match symbol {
            256 => "EOS".to_string(),
            s if (0x21..0x7f).contains(&s) => format!("'{}'", s as u8 as char),
            s => format!("0x{s:02x}"),
        };
        out.push_str(&format!("  {label:>6}  {length:>2} bits\n"));
    }
    out
}
