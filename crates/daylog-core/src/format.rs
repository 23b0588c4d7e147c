//! Record formatting.
//!
//! A record is the canonical text of a payload prefixed with a timestamp:
//!
//! ```text
//! 2026-01-21T14:30:45.123456   -   Key: k1, Value: v1
//!                           -   Key: k2, Value: v2
//! ```
//!
//! Continuation lines carry a marker as wide as the timestamp so the payload
//! column lines up.

use chrono::NaiveDateTime;

/// Separator between records and between lines of one record.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
/// Separator between records and between lines of one record.
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Rendering of the record timestamp (always 26 characters).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Between the timestamp and the first payload line.
pub const FIRST_LINE_MARKER: &str = "   -   ";

/// Prefix of every continuation line: 26 spaces, `-`, 3 spaces.
pub const CONTINUATION_MARKER: &str = "                          -   ";

/// Render the timestamp column.
pub fn timestamp(now: &NaiveDateTime) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Format `raw` as one record stamped with `now`.
///
/// Trailing empty lines are dropped, so text that ends with a line separator
/// formats the same as text that does not.
pub fn format_record(raw: &str, now: &NaiveDateTime) -> String {
    let mut out = timestamp(now);
    out.push_str(FIRST_LINE_MARKER);

    if !raw.contains(LINE_SEPARATOR) {
        out.push_str(raw);
        return out;
    }

    let mut lines: Vec<&str> = raw.split(LINE_SEPARATOR).collect();
    while lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    let mut lines = lines.into_iter();
    if let Some(first) = lines.next() {
        out.push_str(first);
    }
    for line in lines {
        out.push_str(LINE_SEPARATOR);
        out.push_str(CONTINUATION_MARKER);
        out.push_str(line);
    }

    out
}
