//! Typed accessors over a [`Backend`].

use std::collections::BTreeSet;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::{Backend, MemoryBackend, RawValue, ValueKind};
use crate::codec::{self, ListElement};
use crate::error::{Error, Result};
use crate::logging::{debug, error, info, trace};
use crate::serializer::{JsonSerializer, ObjectSerializer};

#[cfg(feature = "fjall")]
use crate::backend::FjallBackend;
#[cfg(feature = "fjall")]
use crate::config::StoreConfig;

/// Typed façade over a string/primitive key-value backend.
///
/// `TypedStore` adds three things on top of the backend's native slots:
///
/// - doubles, stored as their decimal string,
/// - ordered lists of primitives, stored as one `"::"`-delimited string
///   (see [`codec`](crate::codec)),
/// - arbitrary serde values, stored as the serializer's text.
///
/// Every `store_*` call writes through to the backend before returning.
///
/// # Example
///
/// ```
/// use typed_store::TypedStore;
///
/// let mut store = TypedStore::in_memory();
/// store.store_i32("launches", 3)?;
/// store.store_list("recent", &["a".to_string(), "b".to_string()])?;
///
/// assert_eq!(store.get_i32("launches", 0)?, 3);
/// assert_eq!(store.get_i32("missing", 7)?, 7);
/// assert_eq!(store.get_list::<String>("recent")?, vec!["a", "b"]);
/// # Ok::<(), typed_store::Error>(())
/// ```
#[derive(Debug)]
pub struct TypedStore<B: Backend, S: ObjectSerializer = JsonSerializer> {
    backend: B,
    serializer: S,
}

impl<B: Backend> TypedStore<B> {
    /// Wrap `backend`, serializing objects as JSON.
    pub fn new(backend: B) -> Self {
        Self::with_serializer(backend, JsonSerializer)
    }
}

impl TypedStore<MemoryBackend> {
    /// A store whose contents live only as long as the value.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }
}

#[cfg(feature = "fjall")]
impl TypedStore<FjallBackend> {
    /// Open a persistent store as described by `config`.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let backend = FjallBackend::from_config(config)?;
        Ok(Self::new(backend))
    }
}

impl<B: Backend, S: ObjectSerializer> TypedStore<B, S> {
    /// Wrap `backend`, serializing objects with `serializer`.
    pub fn with_serializer(backend: B, serializer: S) -> Self {
        Self {
            backend,
            serializer,
        }
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The serializer used by the object accessors.
    pub fn serializer(&self) -> &S {
        &self.serializer
    }

    /// Unwrap the store, returning its backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    // Primitives

    /// Store a bool in the native bool slot.
    pub fn store_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.write(key, RawValue::Bool(value))
    }

    /// Stored bool at `key`, or `default` if absent.
    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        Ok(self
            .read(key, ValueKind::Bool, RawValue::into_bool)?
            .unwrap_or(default))
    }

    /// Store a 32-bit integer in the native int slot.
    pub fn store_i32(&mut self, key: &str, value: i32) -> Result<()> {
        self.write(key, RawValue::Int(value))
    }

    /// Stored int at `key`, or `default` if absent.
    pub fn get_i32(&self, key: &str, default: i32) -> Result<i32> {
        Ok(self
            .read(key, ValueKind::Int, RawValue::into_int)?
            .unwrap_or(default))
    }

    /// Store a 64-bit integer in the native long slot.
    pub fn store_i64(&mut self, key: &str, value: i64) -> Result<()> {
        self.write(key, RawValue::Long(value))
    }

    /// Stored long at `key`, or `default` if absent.
    pub fn get_i64(&self, key: &str, default: i64) -> Result<i64> {
        Ok(self
            .read(key, ValueKind::Long, RawValue::into_long)?
            .unwrap_or(default))
    }

    /// Store a float in the native float slot.
    pub fn store_f32(&mut self, key: &str, value: f32) -> Result<()> {
        self.write(key, RawValue::Float(value))
    }

    /// Stored float at `key`, or `default` if absent.
    pub fn get_f32(&self, key: &str, default: f32) -> Result<f32> {
        Ok(self
            .read(key, ValueKind::Float, RawValue::into_float)?
            .unwrap_or(default))
    }

    /// Store a double. The backend has no 64-bit float slot, so the value is
    /// kept as its decimal string.
    pub fn store_f64(&mut self, key: &str, value: f64) -> Result<()> {
        self.write(key, RawValue::String(value.encode()))
    }

    /// Stored double at `key`, or `default` if absent.
    ///
    /// A present value that does not parse is an [`Error::Codec`].
    pub fn get_f64(&self, key: &str, default: f64) -> Result<f64> {
        match self.read(key, ValueKind::String, RawValue::into_string)? {
            Some(text) => codec::decode_scalar(&text).map_err(|e| {
                error!(key = key, error = %e, "stored double is malformed");
                e.into()
            }),
            None => Ok(default),
        }
    }

    /// Store a string in the native string slot.
    pub fn store_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.write(key, RawValue::String(value.to_string()))
    }

    /// Store `Some(value)`, or remove the key for `None`.
    pub fn store_optional_string(&mut self, key: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => self.store_string(key, value),
            None => self.remove(key),
        }
    }

    /// Stored string at `key`, or `None` if absent.
    pub fn get_string(&self, key: &str) -> Result<Option<String>> {
        self.read(key, ValueKind::String, RawValue::into_string)
    }

    /// Stored string at `key`, or `default` if absent.
    pub fn get_string_or(&self, key: &str, default: &str) -> Result<String> {
        Ok(self
            .get_string(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    // String sets

    /// Store an unordered set in the backend's native set slot.
    pub fn store_string_set(&mut self, key: &str, values: &BTreeSet<String>) -> Result<()> {
        self.write(key, RawValue::StringSet(values.clone()))
    }

    /// Stored set at `key`, or `None` if absent.
    pub fn get_string_set(&self, key: &str) -> Result<Option<BTreeSet<String>>> {
        self.read(key, ValueKind::StringSet, RawValue::into_string_set)
    }

    /// Stored set at `key`, or `default` if absent.
    pub fn get_string_set_or(
        &self,
        key: &str,
        default: BTreeSet<String>,
    ) -> Result<BTreeSet<String>> {
        Ok(self.get_string_set(key)?.unwrap_or(default))
    }

    // Lists

    /// Store `values` as one delimited string.
    ///
    /// Elements whose string form contains `"::"` will not decode back to the
    /// same list.
    pub fn store_list<T: ListElement>(&mut self, key: &str, values: &[T]) -> Result<()> {
        debug!(key = key, kind = T::KIND, elements = values.len(), "storing list");
        self.write(key, RawValue::String(codec::encode_list(values)))
    }

    /// Decode the list stored at `key`.
    ///
    /// An absent key reads as the empty string, which decodes to one element
    /// parsed from `""`: `[""]` for strings, `[false]` for bools, and a
    /// [`Error::Codec`] for numbers.
    pub fn get_list<T: ListElement>(&self, key: &str) -> Result<Vec<T>> {
        let encoded = self.read_encoded_list(key)?;
        codec::decode_list(&encoded).map_err(|e| {
            error!(key = key, error = %e, "failed to decode list");
            e.into()
        })
    }

    /// Store bools as `"true"`/`"false"` elements.
    pub fn store_list_bool(&mut self, key: &str, values: &[bool]) -> Result<()> {
        self.store_list(key, values)
    }

    /// Decode a list of bools. Elements other than the exact text `"true"`
    /// decode as `false`, so an absent key reads as `[false]`.
    pub fn get_list_bool(&self, key: &str) -> Result<Vec<bool>> {
        self.get_list(key)
    }

    /// Store 32-bit integers as a delimited list.
    pub fn store_list_i32(&mut self, key: &str, values: &[i32]) -> Result<()> {
        self.store_list(key, values)
    }

    /// Decode a list of ints. An absent key or an unparseable element is an
    /// [`Error::Codec`].
    pub fn get_list_i32(&self, key: &str) -> Result<Vec<i32>> {
        self.get_list(key)
    }

    /// Store 64-bit integers as a delimited list.
    pub fn store_list_i64(&mut self, key: &str, values: &[i64]) -> Result<()> {
        self.store_list(key, values)
    }

    /// Decode a list of longs. An absent key or an unparseable element is an
    /// [`Error::Codec`].
    pub fn get_list_i64(&self, key: &str) -> Result<Vec<i64>> {
        self.get_list(key)
    }

    /// Store floats as a delimited list.
    pub fn store_list_f32(&mut self, key: &str, values: &[f32]) -> Result<()> {
        self.store_list(key, values)
    }

    /// Decode a list of floats. An absent key or an unparseable element is an
    /// [`Error::Codec`].
    pub fn get_list_f32(&self, key: &str) -> Result<Vec<f32>> {
        self.get_list(key)
    }

    /// Store doubles as a delimited list.
    pub fn store_list_f64(&mut self, key: &str, values: &[f64]) -> Result<()> {
        self.store_list(key, values)
    }

    /// Decode a list of doubles. An absent key or an unparseable element is
    /// an [`Error::Codec`].
    pub fn get_list_f64(&self, key: &str) -> Result<Vec<f64>> {
        self.get_list(key)
    }

    /// Store strings as a delimited list.
    pub fn store_list_string(&mut self, key: &str, values: &[String]) -> Result<()> {
        self.store_list(key, values)
    }

    /// Decode a list of strings. An absent key reads as `[""]`.
    pub fn get_list_string(&self, key: &str) -> Result<Vec<String>> {
        self.get_list(key)
    }

    // Objects

    /// Serialize `value` and store its text.
    pub fn store_object<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let text = self.serializer.serialize(value)?;
        debug!(key = key, len = text.len(), "storing object");
        self.write(key, RawValue::String(text))
    }

    /// Serialize each element on its own, then store them as a delimited list.
    pub fn store_list_object<T: Serialize>(&mut self, key: &str, values: &[T]) -> Result<()> {
        let parts = values
            .iter()
            .map(|value| self.serializer.serialize(value))
            .collect::<std::result::Result<Vec<String>, _>>()?;
        debug!(key = key, elements = parts.len(), "storing object list");
        self.write(key, RawValue::String(codec::join(&parts)))
    }

    /// Deserialize the object stored at `key` as a `T`.
    ///
    /// Unlike the primitive getters there is no default: an absent key, or
    /// text that holds no value, is an [`Error::MissingValue`].
    ///
    /// ```
    /// # use serde::{Deserialize, Serialize};
    /// # use typed_store::TypedStore;
    /// #[derive(Serialize, Deserialize)]
    /// struct User { first_name: String }
    ///
    /// let mut store = TypedStore::in_memory();
    /// store.store_object("user", &User { first_name: "Bejo".into() })?;
    /// let user = store.get_object::<User>("user")?;
    /// assert_eq!(user.first_name, "Bejo");
    /// assert!(store.get_object::<User>("nobody").is_err());
    /// # Ok::<(), typed_store::Error>(())
    /// ```
    pub fn get_object<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let Some(text) = self.read(key, ValueKind::String, RawValue::into_string)? else {
            error!(key = key, "no object stored");
            return Err(Error::MissingValue(key.to_string()));
        };
        self.deserialize_object(key, &text)
    }

    /// Inverse of [`store_list_object`](Self::store_list_object). Any element
    /// that fails to deserialize fails the whole call.
    pub fn get_list_object<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let encoded = self.read_encoded_list(key)?;
        codec::split(&encoded)
            .map(|part| self.deserialize_object(key, part))
            .collect()
    }

    // Key lifecycle

    /// Delete `key`. No-op if absent.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        debug!(key = key, "removing key");
        self.backend.remove(key)?;
        Ok(())
    }

    /// Delete every key in this store.
    pub fn clear(&mut self) -> Result<()> {
        self.backend.clear()?;
        info!("store cleared");
        Ok(())
    }

    /// Whether a value of any kind is stored at `key`.
    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.backend.contains(key)?)
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Result<Vec<String>> {
        Ok(self.backend.keys()?)
    }

    // Helper methods

    fn write(&mut self, key: &str, value: RawValue) -> Result<()> {
        debug!(key = key, kind = %value.kind(), "storing value");
        self.backend.put(key, value)?;
        Ok(())
    }

    fn read<T>(
        &self,
        key: &str,
        expected: ValueKind,
        extract: fn(RawValue) -> Option<T>,
    ) -> Result<Option<T>> {
        let Some(raw) = self.backend.get(key)? else {
            trace!(key = key, "key not found");
            return Ok(None);
        };
        let found = raw.kind();
        match extract(raw) {
            Some(value) => Ok(Some(value)),
            None => {
                error!(key = key, expected = %expected, found = %found, "type mismatch");
                Err(Error::TypeMismatch {
                    key: key.to_string(),
                    expected,
                    found,
                })
            }
        }
    }

    fn read_encoded_list(&self, key: &str) -> Result<String> {
        Ok(self
            .read(key, ValueKind::String, RawValue::into_string)?
            .unwrap_or_default())
    }

    fn deserialize_object<T: DeserializeOwned>(&self, key: &str, text: &str) -> Result<T> {
        match self.serializer.deserialize(text) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => {
                error!(key = key, "stored object holds no value");
                Err(Error::MissingValue(key.to_string()))
            }
            Err(e) => {
                error!(key = key, error = %e, "failed to deserialize object");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_is_stored_as_string() {
        let mut store = TypedStore::in_memory();
        store.store_f64("pi", 3.5).unwrap();
        assert_eq!(
            store.backend().get("pi").unwrap(),
            Some(RawValue::String("3.5".to_string()))
        );
        assert_eq!(store.get_f64("pi", 0.0).unwrap(), 3.5);
        assert_eq!(store.get_f64("missing", 1.25).unwrap(), 1.25);
    }

    #[test]
    fn test_malformed_double_is_an_error() {
        let mut store = TypedStore::in_memory();
        store.store_string("pi", "three").unwrap();
        let err = store.get_f64("pi", 0.0).unwrap_err();
        assert!(err.is_codec());
    }

    #[test]
    fn test_list_is_stored_as_delimited_string() {
        let mut store = TypedStore::in_memory();
        store.store_list_i32("n", &[1, 2, 3]).unwrap();
        assert_eq!(store.get_string("n").unwrap().as_deref(), Some("1::2::3"));
    }

    #[test]
    fn test_type_mismatch() {
        let mut store = TypedStore::in_memory();
        store.store_string("k", "text").unwrap();
        let err = store.get_i32("k", 0).unwrap_err();
        match err {
            Error::TypeMismatch {
                key,
                expected,
                found,
            } => {
                assert_eq!(key, "k");
                assert_eq!(expected, ValueKind::Int);
                assert_eq!(found, ValueKind::String);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_optional_string_none_removes() {
        let mut store = TypedStore::in_memory();
        store.store_optional_string("s", Some("x")).unwrap();
        assert_eq!(store.get_string("s").unwrap().as_deref(), Some("x"));
        store.store_optional_string("s", None).unwrap();
        assert!(!store.contains("s").unwrap());
        assert_eq!(store.get_string_or("s", "fallback").unwrap(), "fallback");
    }

    #[test]
    fn test_object_stored_as_null_is_missing() {
        let mut store = TypedStore::in_memory();
        store.store_object("nothing", &Option::<u32>::None).unwrap();
        let err = store.get_object::<u32>("nothing").unwrap_err();
        assert!(err.is_missing_value());
    }
}
