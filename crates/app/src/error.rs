//! Errors surfaced by the command-line front end.
//!
//! Codec failures pass through unchanged; file access failures carry the
//! path involved so the diagnostic names the file.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The codec rejected the input
    #[error(transparent)]
    Codec(#[from] huffpack_core::Error),

    /// Input file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    /// Output file could not be written or moved into place
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    /// `--verify` found a container that does not restore its input
    #[error("verification failed: container for {} does not restore the input", .path.display())]
    Verify { path: PathBuf },
}

impl AppError {
    /// Process exit status for this error.
    ///
    /// 1 = bad or unusable data, 3 = file system trouble. Usage errors
    /// (2) are reported by clap before any of this runs.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Codec(err) if !err.is_format_error() => 3,
            AppError::Codec(_) | AppError::Verify { .. } => 1,
            AppError::Read { .. } | AppError::Write { .. } => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
