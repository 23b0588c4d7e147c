//! Append-only writes to resolved log files.
//!
//! Several channels can resolve to the same file (they share a file name, or
//! a caller points two registries at one path), so every append goes through
//! one process-wide lock rather than a per-channel one.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use parking_lot::Mutex;

use crate::error::{LogError, LogResult};

static APPEND_LOCK: Mutex<()> = parking_lot::const_mutex(());

/// Append `text` to `path` as UTF-8, creating the file if needed.
///
/// Parent directories are not created; a missing directory is an error.
pub fn append(path: &Path, text: &str) -> LogResult<()> {
    let _guard = APPEND_LOCK.lock();

    let io_err = |source| LogError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    file.write_all(text.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)?;

    Ok(())
}
