//! Unified error type for the typed-store library.
//!
//! Module errors ([`BackendError`], [`CodecError`], [`SerializerError`],
//! [`ConfigError`]) convert into [`Error`] with `?`.

use thiserror::Error;

use crate::backend::{BackendError, ValueKind};
use crate::codec::CodecError;
use crate::config::ConfigError;
use crate::serializer::SerializerError;

/// Unified error type for all typed-store operations.
///
/// A key that is absent is never an error for primitive getters, which
/// return the caller's default. Object getters have no default and report
/// absence as [`Error::MissingValue`].
///
/// ```ignore
/// use typed_store::{Result, TypedStore};
///
/// fn load_user(store: &TypedStore<FjallBackend>) -> Result<User> {
///     store.get_object::<User>("user")
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// An encoded list element or double did not parse.
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Serializer(#[from] SerializerError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No value is stored at the key, or the stored text holds no value.
    #[error("Missing value for key '{0}'")]
    MissingValue(String),

    /// The key holds a value of a different native kind.
    #[error("Type mismatch for key '{key}': expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if this is a missing value failure.
    pub fn is_missing_value(&self) -> bool {
        matches!(self, Self::MissingValue(_))
    }

    /// Returns `true` if this is a decoding failure.
    pub fn is_codec(&self) -> bool {
        matches!(self, Self::Codec(_))
    }

    /// Returns `true` if this is a backend failure.
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_))
    }

    /// Returns `true` if this is a type mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}
