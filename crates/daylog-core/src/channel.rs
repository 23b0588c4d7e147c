//! Typed logging channels.
//!
//! A [`Channel<K>`] is a cheap handle onto a channel core owned by a
//! [`Registry`](crate::Registry). Every handle for the same kind points at
//! the same core, so they share one file name and one write lock. The kind
//! parameter only decides which payloads `log` accepts; whether the handle
//! actually writes is decided by the core it points at, which is the shared
//! no-op core while logging is deactivated.

use std::fmt;
use std::io::Write;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::config::LogConfig;
use crate::convert::{ChannelKind, Convert, Kind};
use crate::format::{format_record, LINE_SEPARATOR};
use crate::path;
use crate::sink;

/// Last canonical text produced by any channel of a registry.
pub(crate) type LastRecord = Arc<RwLock<Option<String>>>;

/// State shared by every handle of one channel.
#[derive(Debug)]
pub(crate) struct ChannelCore {
    kind: ChannelKind,
    config: LogConfig,
    file_name: RwLock<Option<String>>,
    last: LastRecord,
    /// Serializes convert → format → append → update-last.
    log_lock: Mutex<()>,
}

impl ChannelCore {
    pub(crate) fn new(
        kind: ChannelKind,
        config: LogConfig,
        file_name: Option<String>,
        last: LastRecord,
    ) -> Self {
        Self {
            kind,
            config,
            file_name: RwLock::new(file_name),
            last,
            log_lock: Mutex::new(()),
        }
    }

    pub(crate) fn set_file_name(&self, file_name: Option<String>) {
        *self.file_name.write() = file_name;
    }

    fn is_inert(&self) -> bool {
        self.kind == ChannelKind::Empty
    }

    fn resolved_path(&self) -> PathBuf {
        path::resolve_today(&self.config.base_path(), self.file_name.read().as_deref())
    }

    fn write_record(&self, text: &str) {
        let path = self.resolved_path();
        let mut record = format_record(text, &chrono::Local::now().naive_local());
        record.push_str(LINE_SEPARATOR);

        if let Err(e) = sink::append(&path, &record) {
            tracing::error!(channel = %self.kind, error = %e, "Failed to write log record");
        }
    }

    /// Formatted console line for `text`, or `None` while echo is off.
    fn console_line(&self, text: &str) -> Option<String> {
        self.config
            .console_enabled()
            .then(|| format_record(text, &chrono::Local::now().naive_local()))
    }

    fn echo(&self, text: &str) {
        if let Some(line) = self.console_line(text) {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{}", line) {
                tracing::warn!(channel = %self.kind, error = %e, "Failed to echo log record");
            }
        }
    }
}

/// Handle to one typed channel.
pub struct Channel<K> {
    core: Arc<ChannelCore>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: Kind> Channel<K> {
    pub(crate) fn from_core(core: Arc<ChannelCore>) -> Self {
        Self {
            core,
            _kind: PhantomData,
        }
    }

    /// Append `item` to today's file and remember it as the last record.
    ///
    /// Does nothing while deactivated. Write failures are reported through
    /// `tracing` and otherwise ignored.
    pub fn log<T: ?Sized>(&self, item: &T) -> &Self
    where
        K: Convert<T>,
    {
        let core = &self.core;
        if core.is_inert() || !core.config.is_active() {
            return self;
        }

        let _guard = core.log_lock.lock();
        let text = K::canonical(item);
        core.write_record(&text);
        *core.last.write() = Some(text);

        self
    }

    /// Echo the last record to stdout when console output is enabled.
    pub fn console(&self) -> &Self {
        let core = &self.core;
        if core.is_inert() {
            return self;
        }

        let last = core.last.read().clone();
        if let Some(text) = last {
            core.echo(&text);
        }

        self
    }

    /// Remember `item` as the last record and echo it, without touching the file.
    pub fn console_with<T: ?Sized>(&self, item: &T) -> &Self
    where
        K: Convert<T>,
    {
        let core = &self.core;
        if core.is_inert() || !core.config.is_active() {
            return self;
        }

        let text = K::canonical(item);
        *core.last.write() = Some(text.clone());
        core.echo(&text);

        self
    }

    /// Point this channel at another file name.
    pub fn to_file(&self, file_name: impl Into<String>) -> &Self {
        self.core.set_file_name(Some(file_name.into()));
        self
    }

    /// Kind of the underlying channel (`Empty` for the no-op channel).
    pub fn kind(&self) -> ChannelKind {
        self.core.kind
    }

    /// Whether this is the no-op channel.
    pub fn is_empty(&self) -> bool {
        self.core.is_inert()
    }

    pub fn file_name(&self) -> Option<String> {
        self.core.file_name.read().clone()
    }

    /// File the next `log` call would append to.
    pub fn resolved_path(&self) -> PathBuf {
        self.core.resolved_path()
    }

    /// Last canonical text recorded by any channel of the owning registry.
    pub fn last(&self) -> Option<String> {
        self.core.last.read().clone()
    }

    /// Whether both handles point at the same channel.
    pub fn same_as<J: Kind>(&self, other: &Channel<J>) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }

    #[cfg(test)]
    pub(crate) fn console_line(&self, text: &str) -> Option<String> {
        self.core.console_line(text)
    }
}

impl<K> Clone for Channel<K> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            _kind: PhantomData,
        }
    }
}

impl<K> fmt::Debug for Channel<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("kind", &self.core.kind)
            .field("file_name", &*self.core.file_name.read())
            .finish()
    }
}
