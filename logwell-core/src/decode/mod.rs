//! Line-oriented record decoding.
//!
//! Producers send UTF-8 text, one record per line. A line is either a JSON
//! object (a structured entry, or a heartbeat when its `tag` is
//! `"heartbeat"`) or anything else, which is kept as opaque text.
//!
//! Decoding is stateless. Splitting a byte stream into lines is the job of
//! [`LineFramer`], which is the only per-connection state here.

mod error;
mod framing;

pub use error::DecodeError;
pub use framing::{Framing, LineFramer};

use serde::Serialize;
use serde_json::{Map, Value};

/// Tag value that marks a liveness ping.
pub const HEARTBEAT_TAG: &str = "heartbeat";

/// A decoded log record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LogEntry {
    Structured(Map<String, Value>),
    Text(String),
}

impl LogEntry {
    pub fn tag(&self) -> Option<&str> {
        match self {
            LogEntry::Structured(fields) => fields.get("tag").and_then(Value::as_str),
            LogEntry::Text(_) => None,
        }
    }
}

/// Result of decoding one non-blank line.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Entry(LogEntry),
    Heartbeat,
}

/// Parse a line as a JSON object.
pub fn parse_structured(line: &str) -> Result<Map<String, Value>, DecodeError> {
    match serde_json::from_str::<Value>(line)? {
        Value::Object(fields) => Ok(fields),
        other => Err(DecodeError::NotAnObject {
            kind: json_kind(&other),
        }),
    }
}

/// Decode one line. Blank lines yield `None`.
///
/// Lines that are not JSON objects fall back to trimmed text.
pub fn decode_line(line: &str) -> Option<Decoded> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let decoded = match parse_structured(line) {
        Ok(fields) if is_heartbeat(&fields) => Decoded::Heartbeat,
        Ok(fields) => Decoded::Entry(LogEntry::Structured(fields)),
        Err(_) => Decoded::Entry(LogEntry::Text(line.to_string())),
    };

    Some(decoded)
}

/// Decode a received chunk as a self-contained batch of lines.
pub fn decode_chunk(chunk: &[u8]) -> Vec<Decoded> {
    decode_text(&lossy_utf8(chunk))
}

pub(crate) fn decode_text(text: &str) -> Vec<Decoded> {
    text.split('\n').filter_map(decode_line).collect()
}

/// UTF-8 decode that drops invalid byte sequences instead of replacing them.
pub(crate) fn lossy_utf8(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

fn is_heartbeat(fields: &Map<String, Value>) -> bool {
    fields.get("tag").and_then(Value::as_str) == Some(HEARTBEAT_TAG)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
