//! Convenient re-exports for common usage patterns.
//!
//! ```ignore
//! use typed_store::prelude::*;
//!
//! let mut store = TypedStore::in_memory();
//! store.store_list("flags", &[true, false])?;
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Store and its collaborators
pub use crate::backend::{Backend, MemoryBackend, RawValue};
pub use crate::codec::ListElement;
pub use crate::config::StoreConfig;
pub use crate::serializer::{JsonSerializer, ObjectSerializer};
pub use crate::store::TypedStore;

// Persistent backend (requires "fjall" feature)
#[cfg(feature = "fjall")]
pub use crate::backend::FjallBackend;
