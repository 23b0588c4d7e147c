//! Channel Integration Tests
//!
//! End-to-end checks of the registry and its channels against real files.

use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

use daylog_core::config::{ACTIVE, CONSOLE, PATH};
use daylog_core::format::{CONTINUATION_MARKER, LINE_SEPARATOR};
use daylog_core::{ChannelKind, LogConfig, Registry};
use serde::Serialize;
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

fn config_in(temp: &TempDir) -> LogConfig {
    let base = format!("{}/", temp.path().display());
    LogConfig::from_pairs([(PATH, base.as_str()), (ACTIVE, "true")])
}

fn today_file(temp: &TempDir, file_name: &str) -> std::path::PathBuf {
    let base = format!("{}/", temp.path().display());
    daylog_core::path::resolve_today(&base, Some(file_name))
}

fn payloads(content: &str) -> Vec<&str> {
    content
        .split(LINE_SEPARATOR)
        .filter(|l| !l.is_empty())
        .collect()
}

#[derive(Serialize)]
struct Deployment {
    service: &'static str,
    version: u32,
    rollback_of: Option<u32>,
}

#[derive(Debug, thiserror::Error)]
#[error("connection refused")]
struct Refused;

#[derive(Debug, thiserror::Error)]
#[error("sync failed")]
struct SyncFailed(#[source] Refused);

// ============================================================================
// Registry Tests
// ============================================================================

#[test]
fn test_every_kind_is_identity_stable() {
    let temp = TempDir::new().unwrap();
    let registry = Registry::new(config_in(&temp));

    assert!(registry.string().same_as(&registry.string()));
    assert!(registry.string_map().same_as(&registry.string_map()));
    assert!(registry.json().same_as(&registry.json()));
    assert!(registry.stacktrace().same_as(&registry.stacktrace()));
    assert!(registry.empty().same_as(&registry.empty()));
}

#[test]
fn test_deactivated_registry_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let config = config_in(&temp);
    config.set(ACTIVE, "false");
    config.set(CONSOLE, "true");
    let registry = Registry::with_file_name(config, "app.txt");

    registry.string().log("a").console_with("b").console();
    registry.string_map().log(&[("k", "v")]);
    registry.json().log(&serde_json::json!({"x": 1}));
    registry.stacktrace().log(&Refused);

    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    assert_eq!(registry.last(), None);
    assert_eq!(registry.string().kind(), ChannelKind::Empty);
}

#[test]
fn test_missing_active_flag_means_deactivated() {
    let temp = TempDir::new().unwrap();
    let config = config_in(&temp);
    config.remove(ACTIVE);
    let registry = Registry::new(config);

    assert!(!registry.is_active());
    assert!(registry.json().is_empty());
}

// ============================================================================
// Record Tests
// ============================================================================

#[test]
fn test_string_round_trip() {
    let temp = TempDir::new().unwrap();
    let registry = Registry::with_file_name(config_in(&temp), "app.txt");

    registry.string().log("hello");

    let content = fs::read_to_string(today_file(&temp, "app.txt")).unwrap();
    let lines = payloads(&content);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("   -   hello"));
    assert_eq!(registry.last().as_deref(), Some("hello"));
}

#[test]
fn test_log_then_console_echoes_same_text() {
    let temp = TempDir::new().unwrap();
    let config = config_in(&temp);
    config.set(CONSOLE, "true");
    let registry = Registry::with_file_name(config, "app.txt");

    let channel = registry.string();
    channel.log("persisted").console();

    assert_eq!(channel.last().as_deref(), Some("persisted"));
    let content = fs::read_to_string(today_file(&temp, "app.txt")).unwrap();
    assert_eq!(payloads(&content).len(), 1);
}

#[test]
fn test_string_map_block() {
    let temp = TempDir::new().unwrap();
    let registry = Registry::with_file_name(config_in(&temp), "map.txt");

    registry
        .string_map()
        .log(&vec![("k1".to_string(), "v1".to_string()), ("k2".to_string(), "v2".to_string())]);

    assert_eq!(
        registry.last().unwrap(),
        format!("Key: k1, Value: v1{sep}Key: k2, Value: v2{sep}", sep = LINE_SEPARATOR)
    );

    let content = fs::read_to_string(today_file(&temp, "map.txt")).unwrap();
    let lines = payloads(&content);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("   -   Key: k1, Value: v1"));
    assert_eq!(lines[1], format!("{}Key: k2, Value: v2", CONTINUATION_MARKER));
}

#[test]
fn test_hash_map_payload() {
    let temp = TempDir::new().unwrap();
    let registry = Registry::with_file_name(config_in(&temp), "map.txt");

    let mut map = HashMap::new();
    map.insert("only", 1);
    registry.string_map().log(&map);

    assert_eq!(
        registry.last().unwrap(),
        format!("Key: only, Value: 1{}", LINE_SEPARATOR)
    );
}

#[test]
fn test_json_record() {
    let temp = TempDir::new().unwrap();
    let registry = Registry::with_file_name(config_in(&temp), "events.json.txt");

    registry.json().log(&Deployment {
        service: "api",
        version: 7,
        rollback_of: None,
    });

    let content = fs::read_to_string(today_file(&temp, "events.json.txt")).unwrap();
    assert!(content
        .trim_end()
        .ends_with(r#"   -   {"service":"api","version":7}"#));
}

#[test]
fn test_stacktrace_record() {
    let temp = TempDir::new().unwrap();
    let registry = Registry::with_file_name(config_in(&temp), "errors.txt");

    registry.stacktrace().log(&SyncFailed(Refused));

    let content = fs::read_to_string(today_file(&temp, "errors.txt")).unwrap();
    let lines = payloads(&content);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Localized Message: sync failed. Message: sync failed. Class: "));
    assert!(lines[0].ends_with("SyncFailed"));
    assert_eq!(lines[1], format!("{}Caused by: connection refused", CONTINUATION_MARKER));
}

#[test]
fn test_stacktrace_accepts_trait_objects() {
    let temp = TempDir::new().unwrap();
    let registry = Registry::new(config_in(&temp));

    let err: Box<dyn std::error::Error + Send + Sync> = Box::new(Refused);
    registry.stacktrace().console_with(&*err);

    let last = registry.last().unwrap();
    assert!(last.starts_with("Localized Message: connection refused."));
    assert!(last.contains("Class: Refused"));
    assert!(!last.contains("dyn core::error::Error"));
}

#[test]
fn test_console_with_never_writes() {
    let temp = TempDir::new().unwrap();
    let config = config_in(&temp);
    config.set(CONSOLE, "true");
    let registry = Registry::with_file_name(config, "app.txt");

    registry.string().console_with("screen");
    registry.json().console_with(&[1, 2, 3]);

    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    assert_eq!(registry.last().as_deref(), Some("[1,2,3]"));
}

// ============================================================================
// File Name Tests
// ============================================================================

#[test]
fn test_registry_to_file_redirects_cached_channels() {
    let temp = TempDir::new().unwrap();
    let registry = Registry::with_file_name(config_in(&temp), "old.txt");
    let string = registry.string();
    let map = registry.string_map();

    string.log("before");
    registry.to_file("new.txt");
    registry.to_file("new.txt");
    string.log("after");
    map.log(&[("k", "v")]);

    let old = fs::read_to_string(today_file(&temp, "old.txt")).unwrap();
    let new = fs::read_to_string(today_file(&temp, "new.txt")).unwrap();
    assert_eq!(payloads(&old).len(), 1);
    assert!(old.contains("before"));
    assert!(new.contains("after"));
    assert!(new.contains("Key: k, Value: v"));
}

#[test]
fn test_channels_sharing_a_file_interleave_whole_records() {
    let temp = TempDir::new().unwrap();
    let registry = Arc::new(Registry::with_file_name(config_in(&temp), "shared.txt"));

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                for i in 0..25 {
                    if t % 2 == 0 {
                        registry.string().log(&format!("string {} {}", t, i));
                    } else {
                        registry.json().log(&serde_json::json!({"t": t, "i": i}));
                    }
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let content = fs::read_to_string(today_file(&temp, "shared.txt")).unwrap();
    let lines = payloads(&content);
    assert_eq!(lines.len(), 100);
    assert!(lines.iter().all(|l| l.contains("   -   ")));
}

#[test]
fn test_missing_directory_is_not_fatal() {
    let temp = TempDir::new().unwrap();
    let base = format!("{}/does/not/exist/", temp.path().display());
    let config = LogConfig::from_pairs([(PATH, base.as_str()), (ACTIVE, "true")]);
    let registry = Registry::new(config);

    registry.string().log("lost").log("also lost");

    assert_eq!(registry.last().as_deref(), Some("also lost"));
    assert!(!temp.path().join("does").exists());
}
