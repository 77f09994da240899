//! Common test utilities and fixtures.
//!
//! Shared by the integration test binaries; not every binary uses every
//! helper.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use typed_store::{MemoryBackend, TypedStore};

#[cfg(feature = "fjall")]
use tempfile::TempDir;
#[cfg(feature = "fjall")]
use typed_store::{FjallBackend, StoreConfig};

// =============================================================================
// Fixtures
// =============================================================================

/// Structured value used for object accessor tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
}

impl User {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }
}

pub fn tatang() -> User {
    User::new("Tatang", "Sutarna")
}

pub fn bejo() -> User {
    User::new("Bejo", "Surojo")
}

/// A differently shaped value, for deserializing into the wrong type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

// =============================================================================
// Stores
// =============================================================================

pub fn memory_store() -> TypedStore<MemoryBackend> {
    TypedStore::in_memory()
}

/// A fresh persistent store in its own temporary directory.
///
/// The directory must outlive the store.
#[cfg(feature = "fjall")]
pub fn fjall_store(dir: &TempDir, namespace: &str) -> TypedStore<FjallBackend> {
    let config = StoreConfig::new(dir.path(), namespace);
    match TypedStore::open(&config) {
        Ok(store) => store,
        Err(e) => panic!("failed to open fjall store: {e}"),
    }
}

#[cfg(feature = "fjall")]
pub fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(e) => panic!("failed to create temp dir: {e}"),
    }
}
