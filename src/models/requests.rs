//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::{Key, MAX_KEY_LENGTH, MAX_VALUE_SIZE};

/// Request body for `PUT /regions/:region/entries/:key`
#[derive(Debug, Clone, Deserialize)]
pub struct PutRequest {
    /// The value to store
    pub value: String,
}

impl PutRequest {
    /// Validates the request against the entry key it targets.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self, key: &Key) -> Option<String> {
        if let Key::Text(text) = key {
            if text.is_empty() {
                return Some("Key cannot be empty".to_string());
            }
            if text.len() > MAX_KEY_LENGTH {
                return Some(format!(
                    "Key exceeds maximum length of {} bytes",
                    MAX_KEY_LENGTH
                ));
            }
        }
        if self.value.len() > MAX_VALUE_SIZE {
            return Some(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_request_deserialize() {
        let json = r#"{"value": "hello"}"#;
        let req: PutRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.value, "hello");
    }

    #[test]
    fn test_validate_valid_request() {
        let req = PutRequest {
            value: "TEST".to_string(),
        };
        assert!(req.validate(&Key::from(1)).is_none());
        assert!(req.validate(&Key::from("name")).is_none());
    }

    #[test]
    fn test_validate_long_key() {
        let req = PutRequest {
            value: "v".to_string(),
        };
        let key = Key::from("x".repeat(MAX_KEY_LENGTH + 1));
        assert!(req.validate(&key).is_some());
    }

    #[test]
    fn test_validate_large_value() {
        let req = PutRequest {
            value: "x".repeat(MAX_VALUE_SIZE + 1),
        };
        assert!(req.validate(&Key::from(1)).is_some());
    }
}
