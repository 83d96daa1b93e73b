//! Configuration for the huffpack command.
//!
//! Parses command-line arguments into a plain `Config`. The primary
//! form is the three-argument invocation used by wrapping services:
//!
//! ```text
//! huffpack compress   <INPUT> <OUTPUT>
//! huffpack decompress <INPUT> <OUTPUT>
//! ```
//!
//! `inspect` and `sample` are helpers for humans.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default size of generated sample data: 1 MiB
pub const DEFAULT_SAMPLE_BYTES: usize = 1 << 20;

/// Environment variable holding a tracing filter directive. Overrides
/// `--log-level` when set.
pub const LOG_ENV: &str = "HUFFPACK_LOG";

#[derive(Parser, Debug)]
#[command(name = "huffpack")]
#[command(version)]
#[command(about = "Lossless file compression with canonical Huffman coding", long_about = None)]
struct Cli {
    /// Log level for diagnostics on stderr
    #[arg(
        long,
        global = true,
        default_value = "warn",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    log_level: String,

    /// Print size and timing statistics to stdout when done
    #[arg(long, global = true)]
    stats: bool,

    #[command(subcommand)]
    command: Command,
}

/// The operation to run.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Compress INPUT into a .huf container written to OUTPUT
    Compress {
        input: PathBuf,
        output: PathBuf,

        /// Decompress the new container in memory and compare before writing
        #[arg(long)]
        verify: bool,
    },

    /// Restore the original file from the container INPUT
    Decompress { input: PathBuf, output: PathBuf },

    /// Print the header of a container
    Inspect { input: PathBuf },

    /// Write seeded sample data with mixed compressibility
    Sample {
        output: PathBuf,

        /// Random seed (default: derived from the clock and logged)
        #[arg(long)]
        seed: Option<u64>,

        /// Size of the generated file in bytes
        #[arg(long, default_value_t = DEFAULT_SAMPLE_BYTES)]
        size: usize,
    },
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,

    /// One of trace, debug, info, warn, error
    pub log_level: String,

    /// Whether to print statistics after the operation
    pub print_stats: bool,
}

impl Config {
    /// Parse the process arguments, exiting with usage help on error.
    pub fn from_env() -> Self {
        Cli::parse().into()
    }

    /// Parse an explicit argument list (first item is the program name).
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Cli::try_parse_from(args).map(Into::into)
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            command: cli.command,
            log_level: cli.log_level,
            print_stats: cli.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_argument_form() {
        let config = Config::from_args(["huffpack", "compress", "in.txt", "out.huf"]).unwrap();
        assert_eq!(
            config.command,
            Command::Compress {
                input: PathBuf::from("in.txt"),
                output: PathBuf::from("out.huf"),
                verify: false,
            }
        );
        assert_eq!(config.log_level, "warn");
        assert!(!config.print_stats);

        let config = Config::from_args(["huffpack", "decompress", "a.huf", "a"]).unwrap();
        assert_eq!(
            config.command,
            Command::Decompress {
                input: PathBuf::from("a.huf"),
                output: PathBuf::from("a"),
            }
        );
    }

    #[test]
    fn test_global_flags() {
        let config = Config::from_args([
            "huffpack",
            "compress",
            "--verify",
            "in",
            "out",
            "--stats",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert!(config.print_stats);
        assert_eq!(config.log_level, "debug");
        assert!(matches!(config.command, Command::Compress { verify: true, .. }));
    }

    #[test]
    fn test_sample_defaults() {
        let config = Config::from_args(["huffpack", "sample", "sample.bin"]).unwrap();
        assert_eq!(
            config.command,
            Command::Sample {
                output: PathBuf::from("sample.bin"),
                seed: None,
                size: DEFAULT_SAMPLE_BYTES,
            }
        );

        let config =
            Config::from_args(["huffpack", "sample", "s.bin", "--seed", "42", "--size", "10"])
                .unwrap();
        assert!(matches!(
            config.command,
            Command::Sample {
                seed: Some(42),
                size: 10,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_bad_usage() {
        assert!(Config::from_args(["huffpack"]).is_err());
        assert!(Config::from_args(["huffpack", "explode", "a", "b"]).is_err());
        assert!(Config::from_args(["huffpack", "compress", "only-input"]).is_err());
        assert!(Config::from_args(["huffpack", "compress", "a", "b", "extra"]).is_err());
        assert!(
            Config::from_args(["huffpack", "--log-level", "loud", "inspect", "x"]).is_err()
        );
    }
}
