//! Persistent backend using fjall.

use std::path::Path;

use fjall::{Keyspace, KeyspaceCreateOptions, PersistMode};

use crate::config::{Durability, StoreConfig};
use crate::logging::{debug, error, info, trace};

use super::{Backend, BackendError, RawValue, format, validate_key};

/// Metadata keyspace holding the layout version.
const META_KEYSPACE: &str = "_meta";
const META_CONFIG_KEY: &str = "config";

/// Prefix of the keyspace backing each namespace.
const NAMESPACE_PREFIX: &str = "ns_";

const MAX_NAMESPACE_LEN: usize = 64;

/// Leading byte of every stored key. fjall rejects empty keys, so `""` is
/// stored as the marker alone.
const KEY_MARKER: u8 = b'k';

/// On-disk layout version (1).
/// Increment when changing the value format in `backend::format`.
/// Opening a database written with a different version is rejected.
const STORE_VERSION: u32 = 1;

/// Backend storing values in one namespace of a fjall database.
///
/// Several namespaces may share a database directory; [`clear`](Backend::clear)
/// only touches the namespace this backend was opened with.
///
/// ```ignore
/// use typed_store::FjallBackend;
///
/// let backend = FjallBackend::open(".typed-store", "settings")?;
/// ```
pub struct FjallBackend {
    db: fjall::Database,
    data: Keyspace,
    namespace: String,
    persist_mode: PersistMode,
}

impl FjallBackend {
    /// Open (creating if needed) `namespace` in the database at `path`.
    pub fn open(path: impl AsRef<Path>, namespace: &str) -> Result<Self, BackendError> {
        Self::open_with(path, namespace, Durability::default())
    }

    /// Open using the location and durability from a [`StoreConfig`].
    pub fn from_config(config: &StoreConfig) -> Result<Self, BackendError> {
        Self::open_with(&config.path, &config.namespace, config.durability)
    }

    pub fn open_with(
        path: impl AsRef<Path>,
        namespace: &str,
        durability: Durability,
    ) -> Result<Self, BackendError> {
        let path = path.as_ref();
        debug!(path = %path.display(), namespace = namespace, "opening fjall backend");

        validate_namespace(namespace)?;

        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace(META_KEYSPACE, KeyspaceCreateOptions::default)?;
        let persist_mode = persist_mode(durability);

        // Verify store version, or stamp a fresh database
        if let Some(config) = meta.get(META_CONFIG_KEY)? {
            let version = u32::from_le_bytes(
                config
                    .as_ref()
                    .try_into()
                    .map_err(|_| BackendError::InvalidFormat("Invalid config format".to_string()))?,
            );
            if version != STORE_VERSION {
                error!(
                    stored_version = version,
                    expected_version = STORE_VERSION,
                    "store version mismatch"
                );
                return Err(BackendError::InvalidFormat(format!(
                    "Store version mismatch: expected {}, got {}",
                    STORE_VERSION, version
                )));
            }
            trace!(version = version, "store version verified");
        } else {
            meta.insert(META_CONFIG_KEY, STORE_VERSION.to_le_bytes())?;
            db.persist(PersistMode::SyncAll)?;
            info!(path = %path.display(), version = STORE_VERSION, "store initialized");
        }

        let keyspace_name = format!("{}{}", NAMESPACE_PREFIX, namespace);
        let data = db.keyspace(&keyspace_name, KeyspaceCreateOptions::default)?;

        info!(path = %path.display(), namespace = namespace, "fjall backend opened");
        Ok(Self {
            db,
            data,
            namespace: namespace.to_string(),
            persist_mode,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn persist(&self) -> Result<(), BackendError> {
        self.db.persist(self.persist_mode)?;
        Ok(())
    }
}

impl Backend for FjallBackend {
    fn get(&self, key: &str) -> Result<Option<RawValue>, BackendError> {
        let Some(bytes) = self.data.get(storage_key(key)?)? else {
            return Ok(None);
        };
        match format::decode(bytes.as_ref()) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                error!(namespace = %self.namespace, key = key, error = %e, "corrupt value");
                Err(e)
            }
        }
    }

    fn put(&mut self, key: &str, value: RawValue) -> Result<(), BackendError> {
        let stored_key = storage_key(key)?;
        let bytes = format::encode(&value)?;
        trace!(key = key, size = bytes.len(), kind = %value.kind(), "writing value");
        self.data.insert(stored_key, bytes)?;
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), BackendError> {
        self.data.remove(storage_key(key)?)?;
        self.persist()
    }

    fn clear(&mut self) -> Result<(), BackendError> {
        let mut keys = Vec::new();
        for kv in self.data.iter() {
            keys.push(kv.key()?.to_vec());
        }
        trace!(key_count = keys.len(), "clearing namespace");
        for k in keys {
            self.data.remove(&k)?;
        }
        self.persist()
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        let mut keys = Vec::new();
        for kv in self.data.iter() {
            keys.push(user_key(&kv.key()?)?);
        }
        keys.sort();
        Ok(keys)
    }
}

fn storage_key(key: &str) -> Result<Vec<u8>, BackendError> {
    validate_key(key)?;
    let mut bytes = Vec::with_capacity(key.len() + 1);
    bytes.push(KEY_MARKER);
    bytes.extend_from_slice(key.as_bytes());
    Ok(bytes)
}

fn user_key(stored: &[u8]) -> Result<String, BackendError> {
    let Some((&KEY_MARKER, rest)) = stored.split_first() else {
        return Err(BackendError::InvalidFormat(
            "Stored key is missing its marker byte".to_string(),
        ));
    };
    String::from_utf8(rest.to_vec())
        .map_err(|_| BackendError::InvalidFormat("Stored key is not valid UTF-8".to_string()))
}

fn persist_mode(durability: Durability) -> PersistMode {
    match durability {
        Durability::SyncAll => PersistMode::SyncAll,
        Durability::SyncData => PersistMode::SyncData,
        Durability::Buffer => PersistMode::Buffer,
    }
}

fn validate_namespace(name: &str) -> Result<(), BackendError> {
    let reason = if name.is_empty() {
        Some("must not be empty")
    } else if name.len() > MAX_NAMESPACE_LEN {
        Some("must be at most 64 characters")
    } else if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        Some("may only contain ASCII letters, digits, '_' and '-'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(BackendError::InvalidNamespace {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MAX_KEY_LEN;
    use tempfile::TempDir;

    #[test]
    fn test_validate_namespace() {
        assert!(validate_namespace("settings").is_ok());
        assert!(validate_namespace("user-42_prefs").is_ok());
        assert!(validate_namespace("").is_err());
        assert!(validate_namespace("a/b").is_err());
        assert!(validate_namespace("with space").is_err());
        assert!(validate_namespace(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_put_get_remove() {
        let dir = TempDir::new().unwrap();
        let mut backend = FjallBackend::open(dir.path(), "prefs").unwrap();
        assert_eq!(backend.namespace(), "prefs");

        backend.put("n", RawValue::Int(7)).unwrap();
        assert_eq!(backend.get("n").unwrap(), Some(RawValue::Int(7)));
        assert!(backend.contains("n").unwrap());

        backend.remove("n").unwrap();
        assert_eq!(backend.get("n").unwrap(), None);
        backend.remove("n").unwrap();
    }

    #[test]
    fn test_storage_key_roundtrip() {
        assert_eq!(storage_key("").unwrap(), b"k");
        assert_eq!(user_key(&storage_key("").unwrap()).unwrap(), "");
        assert_eq!(user_key(&storage_key("héllo").unwrap()).unwrap(), "héllo");
        assert!(user_key(b"").is_err());
        assert!(user_key(b"xabc").is_err());
        assert!(storage_key(&"k".repeat(MAX_KEY_LEN + 1)).is_err());
    }

    #[test]
    fn test_empty_key() {
        let dir = TempDir::new().unwrap();
        let mut backend = FjallBackend::open(dir.path(), "prefs").unwrap();
        assert_eq!(backend.get("").unwrap(), None);

        backend.put("", RawValue::Bool(true)).unwrap();
        assert_eq!(backend.get("").unwrap(), Some(RawValue::Bool(true)));
        assert_eq!(backend.keys().unwrap(), vec![""]);

        backend.remove("").unwrap();
        assert!(!backend.contains("").unwrap());
    }

    #[test]
    fn test_invalid_namespace_rejected_on_open() {
        let dir = TempDir::new().unwrap();
        let err = FjallBackend::open(dir.path(), "bad name").err().unwrap();
        assert!(matches!(err, BackendError::InvalidNamespace { .. }));
    }
}
