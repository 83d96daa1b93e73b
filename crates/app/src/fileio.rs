//! Whole-file reads and atomic writes.
//!
//! Output is written to a hidden temp file next to the destination and
//! renamed into place, so the destination path holds either the complete
//! result or whatever was there before. Never a partial file.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AppError, Result};

/// Read an entire file into memory.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    let data = fs::read(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = data.len(), "read input");
    Ok(data)
}

/// Write `data` to `path` atomically (write to temp + rename).
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(path);
    let write_err = |source| AppError::Write {
        path: path.to_path_buf(),
        source,
    };

    let result = (|| {
        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    })();

    if let Err(source) = result {
        // best effort: the temp file may not exist if create failed
        let _ = fs::remove_file(&temp_path);
        return Err(write_err(source));
    }

    debug!(path = %path.display(), bytes = data.len(), "wrote output");
    Ok(())
}

/// Hidden sibling of `path`, unique per process.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}
