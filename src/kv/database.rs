//! The [`KvDatabase`] facade.

use std::fmt;
#[cfg(any(
    feature = "lmdb",
    feature = "mdbx",
    feature = "rocksdb",
    feature = "fjall",
    feature = "sqlite"
))]
use std::path::Path;

use super::backend::Backend;
#[cfg(any(
    feature = "lmdb",
    feature = "mdbx",
    feature = "rocksdb",
    feature = "fjall",
    feature = "sqlite",
    feature = "postgres"
))]
use super::backend::Packed;
use super::memory::{LocalMap, SharedMap};
#[cfg(any(feature = "lmdb", feature = "mdbx", feature = "rocksdb", feature = "fjall"))]
use super::options::StoreOptions;
use crate::cast::{FromStorage, ToStorage};
use crate::error::{Error, Result};
use crate::logging::debug;
use crate::value::{Value, ValueKind};

/// A typed key-value database over one storage engine.
///
/// The facade owns exactly one backend. A default-constructed facade is
/// closed, as is the source of a [`std::mem::take`]; every operation on a
/// closed facade fails with [`Error::Closed`].
///
/// `B` is the backend type behind the facade. The default, `dyn Backend`,
/// accepts every engine. Engines that can serve several threads at once
/// are opened as a [`SyncKvDatabase`], which is itself `Sync` and converts
/// into a plain `KvDatabase` with [`From`].
///
/// ```
/// use unikv::KvDatabase;
///
/// let db = KvDatabase::memory();
/// db.set("answer", 42i32)?;
/// assert_eq!(db.get::<i32>("answer")?, 42);
/// assert_eq!(db.get_or("missing", 7u8)?, 7);
/// # Ok::<(), unikv::Error>(())
/// ```
pub struct KvDatabase<B: ?Sized = dyn Backend> {
    backend: Option<Box<B>>,
}

/// A facade over a thread-safe engine, shareable through `Arc`.
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use unikv::KvDatabase;
///
/// let db = Arc::new(KvDatabase::shared_memory());
/// let writer = Arc::clone(&db);
/// thread::spawn(move || writer.set("hits", 1u64)).join().unwrap()?;
/// assert_eq!(db.get::<u64>("hits")?, 1);
/// # Ok::<(), unikv::Error>(())
/// ```
pub type SyncKvDatabase = KvDatabase<dyn Backend + Sync>;

impl KvDatabase {
    /// Wrap an arbitrary backend.
    pub fn from_backend<T: Backend + 'static>(backend: T) -> Self {
        debug!(backend = backend.name(), "database opened");
        Self {
            backend: Some(Box::new(backend)),
        }
    }

    /// A single-threaded in-process map.
    pub fn memory() -> Self {
        Self::from_backend(LocalMap::new())
    }

    /// Open a SQLite file at `path`, storing entries in `table`.
    #[cfg(feature = "sqlite")]
    pub fn sqlite(path: impl AsRef<Path>, table: &str, create_if_missing: bool) -> Result<Self> {
        let store = super::sql::sqlite::SqliteStore::open(path.as_ref(), table, create_if_missing)?;
        Ok(Self::from_backend(Packed::new(store)))
    }

    /// Connect to PostgreSQL, storing entries in `table`.
    ///
    /// `conninfo` is a libpq-style connection string or URL.
    #[cfg(feature = "postgres")]
    pub fn postgres(conninfo: &str, table: &str) -> Result<Self> {
        let store = super::sql::postgres::PostgresStore::connect(conninfo, table)?;
        Ok(Self::from_backend(Packed::new(store)))
    }

    /// Open whichever engine `config` selects.
    #[cfg(feature = "config")]
    pub fn open(config: &crate::config::BackendConfig) -> Result<Self> {
        config.open()
    }
}

impl SyncKvDatabase {
    /// Wrap a backend that can be used from several threads at once.
    pub fn from_sync_backend<T: Backend + Sync + 'static>(backend: T) -> Self {
        debug!(backend = backend.name(), "database opened");
        Self {
            backend: Some(Box::new(backend)),
        }
    }

    /// A mutex-guarded in-process map.
    ///
    /// Share the facade itself through an `Arc`, or wrap a [`SharedMap`]
    /// in an `Arc` to hand clones of the map to several facades.
    pub fn shared_memory() -> Self {
        Self::from_sync_backend(SharedMap::new())
    }

    /// Open (or create) an LMDB environment at `path`.
    #[cfg(feature = "lmdb")]
    pub fn lmdb(
        path: impl AsRef<Path>,
        options: &StoreOptions,
        create_if_missing: bool,
    ) -> Result<Self> {
        let store = super::lmdb::LmdbStore::open(path.as_ref(), options, create_if_missing)?;
        Ok(Self::from_sync_backend(Packed::new(store)))
    }

    /// Open (or create) an MDBX environment at `path`.
    #[cfg(feature = "mdbx")]
    pub fn mdbx(
        path: impl AsRef<Path>,
        options: &StoreOptions,
        create_if_missing: bool,
    ) -> Result<Self> {
        let store = super::mdbx::MdbxStore::open(path.as_ref(), options, create_if_missing)?;
        Ok(Self::from_sync_backend(Packed::new(store)))
    }

    /// Open (or create) a RocksDB database at `path`.
    #[cfg(feature = "rocksdb")]
    pub fn rocksdb(
        path: impl AsRef<Path>,
        options: &StoreOptions,
        create_if_missing: bool,
    ) -> Result<Self> {
        let store = super::rocksdb::RocksStore::open(path.as_ref(), options, create_if_missing)?;
        Ok(Self::from_sync_backend(Packed::new(store)))
    }

    /// Open (or create) a fjall database at `path`.
    #[cfg(feature = "fjall")]
    pub fn fjall(
        path: impl AsRef<Path>,
        options: &StoreOptions,
        create_if_missing: bool,
    ) -> Result<Self> {
        let store = super::fjall::FjallStore::open(path.as_ref(), options, create_if_missing)?;
        Ok(Self::from_sync_backend(Packed::new(store)))
    }
}

impl<B: Backend + ?Sized> KvDatabase<B> {
    fn backend(&self) -> Result<&B> {
        self.backend.as_deref().ok_or(Error::Closed)
    }

    /// Store `value` under `key`.
    ///
    /// A null payload (`None`, [`Value::Null`]) removes the key instead.
    pub fn set<T: ToStorage>(&self, key: &str, value: T) -> Result<()> {
        let backend = self.backend()?;
        match value.into_storage() {
            Value::Null => backend.remove(key),
            value => backend.put(key, &value),
        }
    }

    /// Store raw bytes under `key`; `None` removes the key.
    pub fn set_bytes(&self, key: &str, value: Option<&[u8]>) -> Result<()> {
        self.set(key, value)
    }

    /// Load the value under `key` as `T`.
    ///
    /// # Errors
    ///
    /// - [`Error::KeyNotFound`] if the key is absent, also when `T` is an
    ///   `Option`;
    /// - [`Error::BadValue`] if the stored value does not fit `T`;
    /// - a backend-class error if the engine fails or the facade is closed.
    pub fn get<T: FromStorage>(&self, key: &str) -> Result<T> {
        let value = self.backend()?.fetch(key, T::KIND)?;
        T::from_storage(value).map_err(|source| Error::bad_value(key, source))
    }

    /// Load the value under `key`, or `default` if it is absent or does not
    /// fit `T`. Backend failures still propagate.
    pub fn get_or<T: FromStorage>(&self, key: &str, default: T) -> Result<T> {
        match self.get(key) {
            Ok(value) => Ok(value),
            Err(error) if error.is_recoverable() => Ok(default),
            Err(error) => Err(error),
        }
    }

    /// Load the value under `key` as a [`Value`] of the given kind.
    pub fn get_value(&self, key: &str, kind: ValueKind) -> Result<Value> {
        self.backend()?
            .fetch(key, kind)?
            .coerce(kind)
            .map_err(|source| Error::bad_value(key, source))
    }

    /// Remove `key`. Removing an absent key succeeds.
    pub fn remove(&self, key: &str) -> Result<()> {
        self.backend()?.remove(key)
    }

    /// Remove every key. The database stays open.
    pub fn clear(&self) -> Result<()> {
        let backend = self.backend()?;
        debug!(backend = backend.name(), "clearing database");
        backend.clear()
    }

    pub fn is_open(&self) -> bool {
        self.backend.is_some()
    }

    /// Release the engine. Closing a closed facade does nothing.
    pub fn close(&mut self) {
        if let Some(backend) = self.backend.take() {
            debug!(backend = backend.name(), "database closed");
            drop(backend);
        }
    }

    /// Name of the engine underneath, `None` when closed.
    pub fn backend_name(&self) -> Option<&'static str> {
        self.backend.as_deref().map(|backend| backend.name())
    }
}

impl<B: ?Sized> Default for KvDatabase<B> {
    fn default() -> Self {
        Self { backend: None }
    }
}

impl From<SyncKvDatabase> for KvDatabase {
    fn from(db: SyncKvDatabase) -> Self {
        Self {
            backend: db.backend.map(|backend| backend as Box<dyn Backend>),
        }
    }
}

impl<B: Backend + ?Sized> fmt::Debug for KvDatabase<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KvDatabase")
            .field("backend", &self.backend_name())
            .finish()
    }
}
