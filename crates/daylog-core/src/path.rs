//! Day-stamped log file paths.
//!
//! `<base><yyyy_MM_dd>_<file name>`. The base is a plain prefix, not a
//! directory joined with a separator, so `logs/` and `logs/app-` both work.
//! Paths are recomputed on every write, which is what rotates files at
//! midnight.

use std::path::{PathBuf, MAIN_SEPARATOR};

use chrono::NaiveDate;

/// Date stamp in resolved file names.
pub const DATE_FORMAT: &str = "%Y_%m_%d";

/// File name used when none was configured.
pub const DEFAULT_FILE_NAME: &str = ".txt";

/// Resolve the log file for `date`.
pub fn resolve(base: &str, file_name: Option<&str>, date: NaiveDate) -> PathBuf {
    let file_name = file_name.unwrap_or(DEFAULT_FILE_NAME);
    PathBuf::from(format!("{}{}_{}", base, date.format(DATE_FORMAT), file_name))
}

/// Resolve the log file for the current local date.
pub fn resolve_today(base: &str, file_name: Option<&str>) -> PathBuf {
    resolve(base, file_name, chrono::Local::now().date_naive())
}

/// Directory of the running executable, with a trailing separator.
///
/// Falls back to the working directory when the executable cannot be located.
pub fn default_base_path() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.display().to_string()))
        .map(|dir| format!("{}{}", dir, MAIN_SEPARATOR))
        .unwrap_or_else(|| format!(".{}", MAIN_SEPARATOR))
}
