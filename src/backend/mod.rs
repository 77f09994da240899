//! Storage backends holding native raw values under string keys.
//!
//! A backend only knows the native kinds in [`RawValue`]. Lists, doubles and
//! objects are layered on top by [`TypedStore`](crate::TypedStore).

mod error;
#[cfg(feature = "fjall")]
mod format;
mod memory;
#[cfg(feature = "fjall")]
mod persistent;

use std::collections::BTreeSet;
use std::fmt;

pub use error::BackendError;
pub use memory::MemoryBackend;
#[cfg(feature = "fjall")]
pub use persistent::FjallBackend;

/// Longest key, in bytes, that every backend accepts.
///
/// Bounded by fjall's 64 KiB key limit minus the one-byte key marker the
/// persistent backend adds. The in-memory backend enforces the same limit so
/// the two stay interchangeable.
pub const MAX_KEY_LEN: usize = 65_534;

/// Reject keys no backend can store.
pub(crate) fn validate_key(key: &str) -> Result<(), BackendError> {
    if key.len() > MAX_KEY_LEN {
        return Err(BackendError::KeyTooLong {
            len: key.len(),
            max: MAX_KEY_LEN,
        });
    }
    Ok(())
}

/// A value in one of the backend's native slots.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    String(String),
    StringSet(BTreeSet<String>),
}

impl RawValue {
    /// The slot this value occupies.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Long(_) => ValueKind::Long,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
            Self::StringSet(_) => ValueKind::StringSet,
        }
    }

    pub fn into_bool(self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_int(self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_long(self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_float(self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_string_set(self) -> Option<BTreeSet<String>> {
        match self {
            Self::StringSet(v) => Some(v),
            _ => None,
        }
    }
}

/// Discriminant of [`RawValue`], used in type mismatch errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Long,
    Float,
    String,
    StringSet,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::String => "string",
            Self::StringSet => "string-set",
        };
        f.write_str(name)
    }
}

/// A string-keyed store of [`RawValue`]s scoped to one namespace.
///
/// Every mutating call is committed before it returns. Writers take
/// `&mut self`, so the owner of a backend is its only writer.
pub trait Backend {
    /// Read the value stored at `key`, if any.
    ///
    /// Keys may be any string up to [`MAX_KEY_LEN`] bytes, including `""`.
    fn get(&self, key: &str) -> Result<Option<RawValue>, BackendError>;

    /// Store `value` at `key`, replacing whatever was there.
    fn put(&mut self, key: &str, value: RawValue) -> Result<(), BackendError>;

    /// Delete `key`. Deleting an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), BackendError>;

    /// Delete every key in this backend's namespace.
    fn clear(&mut self) -> Result<(), BackendError>;

    fn contains(&self, key: &str) -> Result<bool, BackendError> {
        Ok(self.get(key)?.is_some())
    }

    /// All keys currently stored, sorted.
    fn keys(&self) -> Result<Vec<String>, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(RawValue::Bool(true).kind(), ValueKind::Bool);
        assert_eq!(RawValue::Long(1).kind(), ValueKind::Long);
        assert_eq!(
            RawValue::StringSet(BTreeSet::new()).kind(),
            ValueKind::StringSet
        );
        assert_eq!(ValueKind::StringSet.to_string(), "string-set");
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("").is_ok());
        assert!(validate_key(&"k".repeat(MAX_KEY_LEN)).is_ok());
        assert!(matches!(
            validate_key(&"k".repeat(MAX_KEY_LEN + 1)),
            Err(BackendError::KeyTooLong { len: 65_535, max: MAX_KEY_LEN })
        ));
    }
}
