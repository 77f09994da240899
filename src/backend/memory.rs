//! In-memory backend.

use std::collections::HashMap;

use super::{Backend, BackendError, RawValue, validate_key};

/// Non-persistent backend holding values in a `HashMap`.
///
/// Useful for tests and for stores whose contents need not survive the
/// process.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    entries: HashMap<String, RawValue>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Backend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<RawValue>, BackendError> {
        validate_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: RawValue) -> Result<(), BackendError> {
        validate_key(key)?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), BackendError> {
        validate_key(key)?;
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), BackendError> {
        self.entries.clear();
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, BackendError> {
        validate_key(key)?;
        Ok(self.entries.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
