//! Lazily populated set of typed channels.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::channel::{Channel, ChannelCore, LastRecord};
use crate::config::LogConfig;
use crate::convert::{ChannelKind, Empty, Json, Kind, Stacktrace, StringMap, Text};

/// Owner of the configuration and of at most one channel per kind.
///
/// Channels are created on first request and live as long as the registry.
/// While the configuration's `active` flag is off every request returns the
/// same inert channel, whatever kind was asked for.
#[derive(Debug)]
pub struct Registry {
    config: LogConfig,
    file_name: RwLock<Option<String>>,
    channels: Mutex<HashMap<ChannelKind, Arc<ChannelCore>>>,
    empty: Arc<ChannelCore>,
    last: LastRecord,
}

impl Registry {
    /// Create a registry writing to the default file name.
    pub fn new(config: LogConfig) -> Self {
        Self::build(config, None)
    }

    /// Create a registry whose channels write to `file_name`.
    pub fn with_file_name(config: LogConfig, file_name: impl Into<String>) -> Self {
        Self::build(config, Some(file_name.into()))
    }

    fn build(config: LogConfig, file_name: Option<String>) -> Self {
        let last = LastRecord::default();
        let empty = Arc::new(ChannelCore::new(
            ChannelKind::Empty,
            config.clone(),
            file_name.clone(),
            Arc::clone(&last),
        ));

        Self {
            config,
            file_name: RwLock::new(file_name),
            channels: Mutex::new(HashMap::new()),
            empty,
            last,
        }
    }

    /// Channel of kind `K`, or the inert channel while deactivated.
    pub fn channel<K: Kind>(&self) -> Channel<K> {
        if K::KIND == ChannelKind::Empty || !self.is_active() {
            return Channel::from_core(Arc::clone(&self.empty));
        }

        let mut channels = self.channels.lock();
        let core = channels.entry(K::KIND).or_insert_with(|| {
            let file_name = self.file_name.read().clone();
            tracing::debug!(channel = %K::KIND, ?file_name, "Creating log channel");
            Arc::new(ChannelCore::new(
                K::KIND,
                self.config.clone(),
                file_name,
                Arc::clone(&self.last),
            ))
        });

        Channel::from_core(Arc::clone(core))
    }

    pub fn string(&self) -> Channel<Text> {
        self.channel()
    }

    pub fn string_map(&self) -> Channel<StringMap> {
        self.channel()
    }

    pub fn json(&self) -> Channel<Json> {
        self.channel()
    }

    pub fn stacktrace(&self) -> Channel<Stacktrace> {
        self.channel()
    }

    /// The inert channel, regardless of activation.
    pub fn empty(&self) -> Channel<Empty> {
        Channel::from_core(Arc::clone(&self.empty))
    }

    /// Set the file name for this registry and every channel it has created.
    pub fn to_file(&self, file_name: impl Into<String>) -> &Self {
        let file_name = file_name.into();

        // Holding the cache lock keeps a concurrent first request from
        // building a channel with the old name.
        let channels = self.channels.lock();
        *self.file_name.write() = Some(file_name.clone());
        for core in channels.values() {
            core.set_file_name(Some(file_name.clone()));
        }
        self.empty.set_file_name(Some(file_name.clone()));

        tracing::debug!(%file_name, channels = channels.len(), "Redirected log channels");
        self
    }

    /// Whether the `active` flag currently reads `true`.
    pub fn is_active(&self) -> bool {
        self.config.is_active()
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn file_name(&self) -> Option<String> {
        self.file_name.read().clone()
    }

    /// Last canonical text recorded by any channel.
    pub fn last(&self) -> Option<String> {
        self.last.read().clone()
    }
}

/// One-shot string channel over a fresh registry.
pub fn string(config: LogConfig) -> Channel<Text> {
    Registry::new(config).string()
}

/// One-shot string-map channel over a fresh registry.
pub fn string_map(config: LogConfig) -> Channel<StringMap> {
    Registry::new(config).string_map()
}

/// One-shot JSON channel over a fresh registry.
pub fn json(config: LogConfig) -> Channel<Json> {
    Registry::new(config).json()
}

/// One-shot stacktrace channel over a fresh registry.
pub fn stacktrace(config: LogConfig) -> Channel<Stacktrace> {
    Registry::new(config).stacktrace()
}
