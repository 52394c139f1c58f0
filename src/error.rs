//! Unified error type for the unikv library.
//!
//! Every failure belongs to one of three classes, see [`ErrorKind`]:
//!
//! - [`ErrorKind::KeyNotFound`]: the key is absent;
//! - [`ErrorKind::BadValue`]: the key is present but its stored
//!   representation does not fit the requested type;
//! - [`ErrorKind::Backend`]: the engine failed for a reason unrelated to the
//!   value's shape (I/O, corruption, lost connection, failed transaction).
//!
//! The first two are expected in hot paths and cheap to handle, for example
//! through [`KvDatabase::get_or`](crate::KvDatabase::get_or).

use thiserror::Error;

use crate::cast::CastError;
#[cfg(feature = "config")]
use crate::config::ConfigError;

/// Unified error type for all unikv operations.
///
/// # Example
///
/// ```ignore
/// use unikv::{KvDatabase, Result};
///
/// fn bump(db: &KvDatabase) -> Result<()> {
///     let hits = db.get_or("hits", 0u64)?;
///     db.set("hits", hits + 1)
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Bad value for key '{key}': {source}")]
    BadValue { key: String, source: CastError },

    #[error("Database is closed")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config")]
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend '{0}' is not compiled in (enable the `{0}` feature)")]
    BackendDisabled(&'static str),

    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),

    #[cfg(feature = "lmdb")]
    #[error("LMDB error: {0}")]
    Lmdb(#[from] heed::Error),

    #[cfg(feature = "mdbx")]
    #[error("MDBX error: {0}")]
    Mdbx(#[from] libmdbx::Error),

    #[cfg(feature = "rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    #[cfg(feature = "fjall")]
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] postgres::Error),

    #[error("{backend} error: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    KeyNotFound,
    BadValue,
    Backend,
}

impl Error {
    /// Create a backend-class error from a message.
    pub fn backend(backend: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            backend,
            message: message.into(),
        }
    }

    pub(crate) fn bad_value(key: &str, source: CastError) -> Self {
        Self::BadValue {
            key: key.to_owned(),
            source,
        }
    }

    /// The class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::KeyNotFound(_) => ErrorKind::KeyNotFound,
            Self::BadValue { .. } => ErrorKind::BadValue,
            _ => ErrorKind::Backend,
        }
    }

    /// Returns `true` if the key was absent.
    pub fn is_key_not_found(&self) -> bool {
        self.kind() == ErrorKind::KeyNotFound
    }

    /// Returns `true` if the stored value did not fit the requested type.
    pub fn is_bad_value(&self) -> bool {
        self.kind() == ErrorKind::BadValue
    }

    /// Returns `true` if the underlying engine failed.
    pub fn is_backend(&self) -> bool {
        self.kind() == ErrorKind::Backend
    }

    /// Returns `true` for the conditions [`get_or`](crate::KvDatabase::get_or)
    /// swallows.
    pub fn is_recoverable(&self) -> bool {
        !self.is_backend()
    }
}

/// Out-parameter error reporting.
///
/// Turns a [`Result`] into a plain value, storing the error in a
/// caller-supplied slot and returning `T::default()` on failure.
///
/// ```
/// use unikv::{KvDatabase, Report};
///
/// let db = KvDatabase::memory();
/// let mut error = None;
/// let n: i32 = db.get("absent").report(&mut error);
/// assert_eq!(n, 0);
/// assert!(error.is_some_and(|e| e.is_key_not_found()));
/// ```
pub trait Report<T> {
    /// Unwrap the value or park the error in `slot`.
    ///
    /// On success the slot is left untouched.
    fn report(self, slot: &mut Option<Error>) -> T;
}

impl<T: Default> Report<T> for Result<T> {
    fn report(self, slot: &mut Option<Error>) -> T {
        match self {
            Ok(value) => value,
            Err(error) => {
                *slot = Some(error);
                T::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    #[test]
    fn test_classification() {
        assert_eq!(Error::KeyNotFound("k".into()).kind(), ErrorKind::KeyNotFound);
        assert_eq!(
            Error::bad_value("k", CastError::InvalidUtf8).kind(),
            ErrorKind::BadValue
        );
        assert_eq!(Error::Closed.kind(), ErrorKind::Backend);
        assert_eq!(Error::backend("lmdb", "map full").kind(), ErrorKind::Backend);
        assert!(Error::KeyNotFound("k".into()).is_recoverable());
        assert!(!Error::Closed.is_recoverable());
    }

    #[test]
    fn test_bad_value_message() {
        let err = Error::bad_value("int", CastError::Width { expected: 4, found: 5 });
        assert_eq!(
            err.to_string(),
            "Bad value for key 'int': Width mismatch: expected 4 bytes, got 5"
        );
        let err = Error::bad_value(
            "x",
            CastError::Mismatch {
                expected: ValueKind::I32,
                found: ValueKind::Text,
            },
        );
        assert!(err.to_string().contains("expected i32, got text"));
    }

    #[test]
    fn test_report_stores_error_once() {
        let mut slot = None;
        let ok: Result<u8> = Ok(3);
        assert_eq!(ok.report(&mut slot), 3);
        assert!(slot.is_none());

        let failed: Result<u8> = Err(Error::Closed);
        assert_eq!(failed.report(&mut slot), 0);
        assert!(matches!(slot, Some(Error::Closed)));
    }
}
