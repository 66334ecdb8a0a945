//! String sanitization for the persisted memory document.
//!
//! Strips characters that survive a lossy decode but corrupt downstream
//! prompts: replacement characters, zero-width marks, byte-order marks and
//! control characters other than newline and tab. Applied recursively to
//! every string (object keys included) without changing the document's
//! shape.

use serde_json::{Map, Value};

fn is_unwanted(c: char) -> bool {
    matches!(c, '\u{FFFD}' | '\u{200B}' | '\u{2060}' | '\u{FEFF}')
        || (c.is_control() && c != '\n' && c != '\t')
}

/// Remove unwanted characters from a string.
#[must_use]
pub fn clean_str(s: &str) -> String {
    s.chars().filter(|&c| !is_unwanted(c)).collect()
}

/// Clean every string in a JSON value, keeping its structure.
#[must_use]
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(clean_str(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(k, v)| (clean_str(&k), sanitize_value(v)))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}
