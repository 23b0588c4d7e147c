//! Channel kinds and their canonical text.
//!
//! Each kind is a zero-sized marker type. [`Convert<T>`] says which payloads a
//! kind accepts and how they become text:
//!
//! | Kind | Payload | Canonical text |
//! |---|---|---|
//! | [`Text`] | `AsRef<str>` | unchanged |
//! | [`StringMap`] | [`KeyValues`] | `Key: k, Value: v` per pair |
//! | [`Json`] | `Serialize` | compact JSON without `null` fields |
//! | [`Stacktrace`] | `std::error::Error` | header line, then one line per cause |
//! | [`Empty`] | anything | never produced |

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::error::{LogError, LogResult};
use crate::format::LINE_SEPARATOR;

/// Tag identifying one cached channel in a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    String,
    StringMap,
    Json,
    Stacktrace,
    /// The inert channel handed out while logging is deactivated.
    Empty,
}

impl ChannelKind {
    /// Name used in configuration and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ChannelKind::String => "string",
            ChannelKind::StringMap => "stringMap",
            ChannelKind::Json => "json",
            ChannelKind::Stacktrace => "stacktrace",
            ChannelKind::Empty => "empty",
        }
    }
}

impl Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChannelKind {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(ChannelKind::String),
            "stringMap" | "string-map" | "string_map" => Ok(ChannelKind::StringMap),
            "json" => Ok(ChannelKind::Json),
            "stacktrace" => Ok(ChannelKind::Stacktrace),
            "empty" => Ok(ChannelKind::Empty),
            other => Err(LogError::UnknownChannel(other.to_string())),
        }
    }
}

/// Compile-time tag of a channel handle.
pub trait Kind: Send + Sync + 'static {
    const KIND: ChannelKind;
}

/// Conversion of a payload into canonical text for kind `Self`.
pub trait Convert<T: ?Sized>: Kind {
    fn canonical(item: &T) -> String;
}

/// Plain strings.
#[derive(Debug, Clone, Copy)]
pub struct Text;

/// Key/value pairs rendered one per line.
#[derive(Debug, Clone, Copy)]
pub struct StringMap;

/// Serializable values rendered as JSON.
#[derive(Debug, Clone, Copy)]
pub struct Json;

/// Errors rendered with their cause chain.
#[derive(Debug, Clone, Copy)]
pub struct Stacktrace;

/// The no-op kind. Accepts anything and never renders it.
#[derive(Debug, Clone, Copy)]
pub struct Empty;

impl Kind for Text {
    const KIND: ChannelKind = ChannelKind::String;
}

impl Kind for StringMap {
    const KIND: ChannelKind = ChannelKind::StringMap;
}

impl Kind for Json {
    const KIND: ChannelKind = ChannelKind::Json;
}

impl Kind for Stacktrace {
    const KIND: ChannelKind = ChannelKind::Stacktrace;
}

impl Kind for Empty {
    const KIND: ChannelKind = ChannelKind::Empty;
}

impl<T: AsRef<str> + ?Sized> Convert<T> for Text {
    fn canonical(item: &T) -> String {
        item.as_ref().to_owned()
    }
}

impl<T: KeyValues + ?Sized> Convert<T> for StringMap {
    fn canonical(item: &T) -> String {
        let mut out = String::new();
        item.visit_pairs(&mut |key, value| {
            out.push_str(&format!("Key: {}, Value: {}", key, value));
            out.push_str(LINE_SEPARATOR);
        });
        out
    }
}

impl<T: Serialize + ?Sized> Convert<T> for Json {
    fn canonical(item: &T) -> String {
        match to_json(item) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize JSON payload");
                String::new()
            }
        }
    }
}

impl<T: std::error::Error + ?Sized> Convert<T> for Stacktrace {
    fn canonical(item: &T) -> String {
        let msg = item.to_string();
        let mut out = format!(
            "Localized Message: {msg}. Message: {msg}. Class: {}",
            class_name(item)
        );
        out.push_str(LINE_SEPARATOR);

        let mut cause = item.source();
        while let Some(err) = cause {
            out.push_str("Caused by: ");
            out.push_str(&err.to_string());
            out.push_str(LINE_SEPARATOR);
            cause = err.source();
        }

        out
    }
}

/// Type name of the error, or of the value behind a `dyn Error`.
///
/// Trait objects have no runtime type name, so the leading identifier of
/// their `Debug` output stands in for it.
fn class_name<T: std::error::Error + ?Sized>(item: &T) -> String {
    let name = std::any::type_name::<T>();
    if !name.starts_with("dyn ") {
        return name.to_string();
    }

    let debug = format!("{:?}", item);
    let ident: String = debug
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == ':')
        .collect();
    if ident.is_empty() {
        name.to_string()
    } else {
        ident
    }
}

impl<T: ?Sized> Convert<T> for Empty {
    fn canonical(_item: &T) -> String {
        String::new()
    }
}

/// Compact JSON with `null` object fields removed, field order kept.
pub fn to_json<T: Serialize + ?Sized>(item: &T) -> LogResult<String> {
    let value = serde_json::to_value(item)?;
    Ok(serde_json::to_string(&strip_nulls(value))?)
}

fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

/// Anything that can be walked as key/value pairs, in its own iteration order.
pub trait KeyValues {
    fn visit_pairs(&self, visit: &mut dyn FnMut(&dyn Display, &dyn Display));
}

impl<K: Display, V: Display, S> KeyValues for HashMap<K, V, S> {
    fn visit_pairs(&self, visit: &mut dyn FnMut(&dyn Display, &dyn Display)) {
        for (k, v) in self {
            visit(k, v);
        }
    }
}

impl<K: Display, V: Display> KeyValues for BTreeMap<K, V> {
    fn visit_pairs(&self, visit: &mut dyn FnMut(&dyn Display, &dyn Display)) {
        for (k, v) in self {
            visit(k, v);
        }
    }
}

impl<K: Display, V: Display> KeyValues for [(K, V)] {
    fn visit_pairs(&self, visit: &mut dyn FnMut(&dyn Display, &dyn Display)) {
        for (k, v) in self {
            visit(k, v);
        }
    }
}

impl<K: Display, V: Display> KeyValues for Vec<(K, V)> {
    fn visit_pairs(&self, visit: &mut dyn FnMut(&dyn Display, &dyn Display)) {
        self.as_slice().visit_pairs(visit)
    }
}

impl<K: Display, V: Display, const N: usize> KeyValues for [(K, V); N] {
    fn visit_pairs(&self, visit: &mut dyn FnMut(&dyn Display, &dyn Display)) {
        self.as_slice().visit_pairs(visit)
    }
}
