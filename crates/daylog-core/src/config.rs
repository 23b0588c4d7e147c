//! Shared key/value configuration.
//!
//! A [`LogConfig`] is a cheap handle onto one map. The registry and every
//! channel it creates hold clones of the same handle, so a flag flipped by the
//! owner is seen by all of them on their next call.
//!
//! Reads lock the map per key only. Callers that mutate the configuration
//! while other threads are logging get per-key consistency, nothing more.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{LogError, LogResult};
use crate::path::default_base_path;

/// Base path prefix for log files.
pub const PATH: &str = "path";
/// Gates every file write and every `console_with` call.
pub const ACTIVE: &str = "active";
/// Gates echoing records to stdout.
pub const CONSOLE: &str = "console";

/// Shared, string-keyed logging configuration.
#[derive(Clone, Debug, Default)]
pub struct LogConfig {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl LogConfig {
    /// Create an empty configuration (deactivated, console off, default path).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: Arc::new(RwLock::new(values)),
        }
    }

    /// Parse properties-style text.
    ///
    /// Each non-blank line is `key=value` or `key: value`. Lines starting with
    /// `#` or `!` are comments. Keys and values are trimmed.
    pub fn parse_properties(text: &str) -> LogResult<Self> {
        let mut values = HashMap::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let split = line
                .find(|c: char| c == '=' || c == ':')
                .ok_or_else(|| LogError::Config(format!("line {}: expected key=value", idx + 1)))?;
            let key = line[..split].trim();
            if key.is_empty() {
                return Err(LogError::Config(format!("line {}: empty key", idx + 1)));
            }
            let value = line[split + 1..].trim();
            values.insert(key.to_string(), value.to_string());
        }

        Ok(Self {
            values: Arc::new(RwLock::new(values)),
        })
    }

    /// Read and parse a properties file.
    pub fn load(path: impl AsRef<Path>) -> LogResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| LogError::Config(format!("{}: {}", path.display(), e)))?;
        Self::parse_properties(&text)
    }

    /// Current value for `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    /// Whether `key` is set.
    pub fn contains(&self, key: &str) -> bool {
        self.values.read().contains_key(key)
    }

    /// Set `key`, visible to every holder of this configuration.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(key.into(), value.into());
    }

    /// Remove `key`, returning its previous value.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.values.write().remove(key)
    }

    /// `active` flag. Absent or unparsable reads as `false`.
    pub fn is_active(&self) -> bool {
        self.flag(ACTIVE)
    }

    /// `console` flag. Absent or unparsable reads as `false`.
    pub fn console_enabled(&self) -> bool {
        self.flag(CONSOLE)
    }

    /// Base path prefix, defaulting to the executable's directory.
    pub fn base_path(&self) -> String {
        self.get(PATH).unwrap_or_else(default_base_path)
    }

    fn flag(&self, key: &str) -> bool {
        self.values
            .read()
            .get(key)
            .map(|v| parse_bool(v))
            .unwrap_or(false)
    }
}

/// Only a case-insensitive `"true"` is true.
pub fn parse_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}
