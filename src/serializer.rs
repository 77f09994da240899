//! Pluggable serialization of structured values to and from strings.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors produced by an [`ObjectSerializer`].
#[derive(Error, Debug)]
pub enum SerializerError {
    #[error("failed to serialize value: {0}")]
    Serialize(String),

    #[error("failed to deserialize value: {0}")]
    Deserialize(String),
}

/// Converts structured values to their stored string form and back.
///
/// `deserialize` returns `Ok(None)` when the text carries no value, which the
/// store reports as a missing value.
pub trait ObjectSerializer {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, SerializerError>;

    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> Result<Option<T>, SerializerError>;
}

/// JSON serialization through `serde_json`.
///
/// Blank text and the literal `null` deserialize to no value.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl ObjectSerializer for JsonSerializer {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, SerializerError> {
        serde_json::to_string(value).map_err(|e| SerializerError::Serialize(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> Result<Option<T>, SerializerError> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }
        serde_json::from_str(text)
            .map(Some)
            .map_err(|e| SerializerError::Deserialize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct User {
        first_name: String,
        last_name: String,
    }

    #[test]
    fn test_json_roundtrip() {
        let user = User {
            first_name: "Tatang".to_string(),
            last_name: "Sutarna".to_string(),
        };
        let text = JsonSerializer.serialize(&user).unwrap();
        assert_eq!(text, r#"{"first_name":"Tatang","last_name":"Sutarna"}"#);
        let back: Option<User> = JsonSerializer.deserialize(&text).unwrap();
        assert_eq!(back, Some(user));
    }

    #[test]
    fn test_json_null_is_no_value() {
        let back: Option<User> = JsonSerializer.deserialize("null").unwrap();
        assert!(back.is_none());
        let back: Option<User> = JsonSerializer.deserialize("").unwrap();
        assert!(back.is_none());
        let back: Option<User> = JsonSerializer.deserialize("  null\n").unwrap();
        assert!(back.is_none());
    }

    #[test]
    fn test_json_malformed() {
        assert!(JsonSerializer.deserialize::<User>("{").is_err());
        assert!(JsonSerializer.deserialize::<User>("{\"first_name\":1}").is_err());
    }
}
