//! Error types for storage backends.

use thiserror::Error;

/// Errors that can occur inside a [`Backend`](super::Backend).
#[derive(Error, Debug)]
pub enum BackendError {
    #[cfg(feature = "fjall")]
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Key of {len} bytes exceeds the {max}-byte limit")]
    KeyTooLong { len: usize, max: usize },

    #[error("Invalid namespace '{name}': {reason}")]
    InvalidNamespace { name: String, reason: &'static str },
}
