//! daylog core library
//!
//! Typed logging channels that append timestamped records to day-stamped
//! files and can echo them to stdout.
//!
//! ## Overview
//!
//! A [`Registry`] owns a shared [`LogConfig`] and creates one [`Channel`] per
//! payload kind on first use:
//!
//! - **string**: plain text
//! - **stringMap**: key/value pairs, one `Key: k, Value: v` line each
//! - **json**: anything `Serialize`, without `null` fields
//! - **stacktrace**: errors with their cause chain
//!
//! Records land in `<path><yyyy_MM_dd>_<file name>`. When the `active` flag is
//! off, every channel request returns an inert channel and nothing is written.
//! Logging never fails from the caller's point of view: I/O and serialization
//! problems are reported through `tracing` and swallowed.
//!
//! ## Quick Start
//!
//! ```no_run
//! use daylog_core::{LogConfig, Registry};
//!
//! let config = LogConfig::from_pairs([
//!     ("path", "/var/log/myapp/"),
//!     ("active", "true"),
//!     ("console", "true"),
//! ]);
//! let logger = Registry::with_file_name(config, "app.txt");
//!
//! logger.string().log("service started").console();
//! logger
//!     .string_map()
//!     .log(&[("user", "ada"), ("action", "login")]);
//!
//! if let Err(e) = std::fs::read_to_string("/etc/myapp.conf") {
//!     logger.stacktrace().log(&e);
//! }
//! ```

pub mod channel;
pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod path;
pub mod registry;
pub mod sink;

// Re-exports
pub use channel::Channel;
pub use config::LogConfig;
pub use convert::{ChannelKind, Convert, Empty, Json, KeyValues, Kind, Stacktrace, StringMap, Text};
pub use error::{LogError, LogResult};
pub use format::format_record;
pub use registry::{json, stacktrace, string, string_map, Registry};
