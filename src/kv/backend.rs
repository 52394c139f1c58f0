//! Backend traits.
//!
//! [`Backend`] is the object-safe seam the [`KvDatabase`](super::KvDatabase)
//! facade dispatches through. Engines that only understand bytes implement
//! the narrower [`ByteStore`] and are wrapped in [`Packed`], which applies
//! the byte-image protocol from [`crate::pack`] in one place.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::logging::trace;
use crate::pack;
use crate::value::{Value, ValueKind};

/// A storage engine seen through the uniform CRUD contract.
///
/// Methods take `&self`; engines provide their own interior mutability and
/// locking. A backend that is also `Sync` can be shared between several
/// facades through `Arc`.
pub trait Backend: Send {
    /// Short engine name, used in logs and errors.
    fn name(&self) -> &'static str;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// [`Value::Null`] removes the key.
    fn put(&self, key: &str, value: &Value) -> Result<()>;

    /// Load the value under `key`.
    ///
    /// `kind` is the type the caller will convert the result to. Backends
    /// that keep a type tag may ignore it; the facade checks the tag.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is absent, [`Error::BadValue`] if
    /// the stored bytes cannot be read as `kind`.
    fn fetch(&self, key: &str, kind: ValueKind) -> Result<Value>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Remove every key, leaving the backend open.
    fn clear(&self) -> Result<()>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn put(&self, key: &str, value: &Value) -> Result<()> {
        (**self).put(key, value)
    }

    fn fetch(&self, key: &str, kind: ValueKind) -> Result<Value> {
        (**self).fetch(key, kind)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

impl<B: Backend + Sync + ?Sized> Backend for Arc<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn put(&self, key: &str, value: &Value) -> Result<()> {
        (**self).put(key, value)
    }

    fn fetch(&self, key: &str, kind: ValueKind) -> Result<Value> {
        (**self).fetch(key, kind)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

/// An engine storing untyped byte strings.
///
/// Each call is self-contained: implementations open whatever transaction
/// the engine needs, perform one operation and commit before returning.
pub trait ByteStore: Send {
    /// Short engine name, used in logs and errors.
    const NAME: &'static str;

    fn put_bytes(&self, key: &str, value: &[u8]) -> Result<()>;

    /// `Ok(None)` when the key is absent.
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn delete(&self, key: &str) -> Result<()>;

    /// Empty the whole keyspace.
    fn truncate(&self) -> Result<()>;
}

/// A [`ByteStore`] exposed as a [`Backend`] through byte-image packing.
#[derive(Debug)]
pub struct Packed<S> {
    store: S,
}

impl<S: ByteStore> Packed<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The wrapped engine.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: ByteStore> Backend for Packed<S> {
    fn name(&self) -> &'static str {
        S::NAME
    }

    fn put(&self, key: &str, value: &Value) -> Result<()> {
        match pack::encode(value) {
            Some(bytes) => {
                trace!(backend = S::NAME, key = key, len = bytes.len(), "put");
                self.store.put_bytes(key, &bytes)
            }
            None => self.remove(key),
        }
    }

    fn fetch(&self, key: &str, kind: ValueKind) -> Result<Value> {
        let bytes = self
            .store
            .get_bytes(key)?
            .ok_or_else(|| Error::KeyNotFound(key.to_owned()))?;
        trace!(backend = S::NAME, key = key, len = bytes.len(), kind = %kind, "get");
        pack::decode(bytes, kind).map_err(|source| Error::bad_value(key, source))
    }

    fn remove(&self, key: &str) -> Result<()> {
        trace!(backend = S::NAME, key = key, "remove");
        self.store.delete(key)
    }

    fn clear(&self) -> Result<()> {
        self.store.truncate()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use parking_lot::Mutex;

    use super::*;
    use crate::cast::CastError;

    #[derive(Default)]
    struct VecStore(Mutex<BTreeMap<String, Vec<u8>>>);

    impl ByteStore for VecStore {
        const NAME: &'static str = "vec";

        fn put_bytes(&self, key: &str, value: &[u8]) -> Result<()> {
            self.0.lock().insert(key.to_owned(), value.to_vec());
            Ok(())
        }

        fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
            Ok(self.0.lock().get(key).cloned())
        }

        fn delete(&self, key: &str) -> Result<()> {
            self.0.lock().remove(key);
            Ok(())
        }

        fn truncate(&self) -> Result<()> {
            self.0.lock().clear();
            Ok(())
        }
    }

    #[test]
    fn test_packed_stores_bare_image() {
        let backend = Packed::new(VecStore::default());
        backend.put("n", &Value::I32(-42)).unwrap();
        assert_eq!(
            backend.store().get_bytes("n").unwrap(),
            Some((-42i32).to_ne_bytes().to_vec())
        );
        assert_eq!(backend.fetch("n", ValueKind::I32).unwrap(), Value::I32(-42));
    }

    #[test]
    fn test_null_put_removes() {
        let backend = Packed::new(VecStore::default());
        backend.put("k", &Value::Text("v".into())).unwrap();
        backend.put("k", &Value::Null).unwrap();
        assert!(matches!(
            backend.fetch("k", ValueKind::Text),
            Err(Error::KeyNotFound(key)) if key == "k"
        ));
    }

    #[test]
    fn test_width_mismatch_is_bad_value() {
        let backend = Packed::new(VecStore::default());
        backend.put("text", &Value::Text("hello".into())).unwrap();
        let err = backend.fetch("text", ValueKind::I32).unwrap_err();
        assert!(matches!(
            err,
            Error::BadValue { source: CastError::Width { expected: 4, found: 5 }, .. }
        ));
    }

    #[test]
    fn test_shared_through_arc() {
        let backend = Arc::new(Packed::new(VecStore::default()));
        let other = Arc::clone(&backend);
        backend.put("k", &Value::U8(1)).unwrap();
        assert_eq!(other.fetch("k", ValueKind::U8).unwrap(), Value::U8(1));
        other.clear().unwrap();
        assert!(backend.fetch("k", ValueKind::U8).unwrap_err().is_key_not_found());
    }
}
