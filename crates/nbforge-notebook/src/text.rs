//! Multiline text fields.
//!
//! nbformat stores `source`, stream `text` and most MIME payloads either as a
//! single string or as a list of line fragments that must be concatenated.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum MultilineRepr {
    Single(String),
    Lines(Vec<String>),
}

/// Deserialize a string-or-lines field into one string.
pub(crate) fn multiline<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match MultilineRepr::deserialize(deserializer)? {
        MultilineRepr::Single(text) => text,
        MultilineRepr::Lines(lines) => lines.concat(),
    })
}

/// Flatten a MIME payload into text.
///
/// Strings are returned as-is and arrays of strings are concatenated. Other
/// JSON values (e.g. `application/json` objects) have no text form.
pub fn payload_text(payload: &Value) -> Option<String> {
    match payload {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => Some(items.iter().filter_map(Value::as_str).collect()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_text() {
        assert_eq!(payload_text(&json!("abc")), Some("abc".to_string()));
        assert_eq!(
            payload_text(&json!(["line 1\n", "line 2"])),
            Some("line 1\nline 2".to_string())
        );
        assert_eq!(payload_text(&json!({"a": 1})), None);
    }
}
