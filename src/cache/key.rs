//! Entry Key Module
//!
//! Region entries are keyed either by integer or by text.

use std::fmt;

use serde::{Deserialize, Serialize};

// == Key ==
/// Key of a region entry.
///
/// Integer and text keys never compare equal: `Key::Int(1)` and
/// `Key::Text("1")` address different entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Int(i64),
    Text(String),
}

impl Key {
    /// Reads a key from a URL path segment. Segments that parse as `i64` are
    /// integer keys; anything else is text.
    pub fn from_segment(segment: &str) -> Self {
        segment
            .parse::<i64>()
            .map(Key::Int)
            .unwrap_or_else(|_| Key::Text(segment.to_string()))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{}", n),
            Key::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Int(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::Int(n.into())
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Text(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_segment() {
        assert_eq!(Key::from_segment("1"), Key::Int(1));
        assert_eq!(Key::from_segment("-42"), Key::Int(-42));
        assert_eq!(Key::from_segment("user:1"), Key::Text("user:1".to_string()));
    }

    #[test]
    fn test_int_and_text_keys_differ() {
        assert_ne!(Key::from(1), Key::from("1"));
    }

    #[test]
    fn test_key_serialize_untagged() {
        assert_eq!(serde_json::to_string(&Key::from(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&Key::from("a")).unwrap(), "\"a\"");
    }
}
