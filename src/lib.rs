//! Typed accessors over a string/primitive key-value store.
//!
//! typed-store wraps a backend that only understands a handful of native
//! value kinds (bool, i32, i64, f32, string, set of strings) and lets callers
//! store doubles, ordered lists of primitives and arbitrary serde values
//! under string keys.
//!
//! # Module Organization
//!
//! - [`store`]: The [`TypedStore`] façade
//! - [`codec`]: The `"::"`-delimited list encoding
//! - [`serializer`]: Pluggable object serialization (JSON by default)
//! - [`backend`]: The [`Backend`] trait plus in-memory and fjall backends
//! - [`config`]: TOML configuration
//! - [`error`]: Unified error types
//! - [`prelude`]: Convenient re-exports
//! - `logging`: Conditional logging macros (internal)
//!
//! # Features
//!
//! - `fjall` (default): Persistent backend
//! - `logging`: Enable tracing-based logging
//! - `cli`: The `typed-store` inspection binary
//!
//! # Example
//!
//! ```ignore
//! use typed_store::prelude::*;
//!
//! let mut store = TypedStore::open(&StoreConfig::new(".typed-store", "settings"))?;
//!
//! store.store_bool("onboarded", true)?;
//! store.store_list("recent", &[3i64, 1, 2])?;
//! store.store_object("user", &user)?;
//!
//! let onboarded = store.get_bool("onboarded", false)?;
//! let recent = store.get_list::<i64>("recent")?;
//! let user = store.get_object::<User>("user")?;
//! ```

pub mod backend;
pub mod codec;
pub mod config;
pub mod error;
#[macro_use]
pub(crate) mod logging;
pub mod prelude;
pub mod serializer;
pub mod store;

// Re-export unified error types
pub use error::{Error, Result};

pub use backend::{Backend, BackendError, MAX_KEY_LEN, MemoryBackend, RawValue, ValueKind};
#[cfg(feature = "fjall")]
pub use backend::FjallBackend;
pub use codec::{CodecError, DELIMITER, ListElement};
pub use config::{Config, ConfigError, Durability, LogFormat, LoggingConfig, StoreConfig};
pub use serializer::{JsonSerializer, ObjectSerializer, SerializerError};
pub use store::TypedStore;
