//! Storage backends and the [`KvDatabase`] facade.
//!
//! Every engine implements the same CRUD contract, see [`Backend`].
//! Byte-oriented engines implement [`ByteStore`] and are wrapped in
//! [`Packed`]; the in-process maps implement [`Backend`] directly and keep
//! values tagged.
//!
//! # Module Organization
//!
//! - [`backend`]: the [`Backend`] and [`ByteStore`] traits
//! - `database`: the [`KvDatabase`] facade
//! - [`memory`]: in-process maps (always compiled)
//! - [`lmdb`], [`mdbx`]: transactional memory-mapped engines
//! - [`rocksdb`], [`fjall`]: LSM engines
//! - [`sql`]: SQLite and PostgreSQL tables used as key-value stores
//!
//! Each engine module exposes a `wipe` function that deletes the engine's
//! files (or database) entirely.

use std::path::Path;

pub mod backend;
mod database;
pub mod memory;
mod options;

#[cfg(feature = "fjall")]
pub mod fjall;
#[cfg(feature = "lmdb")]
pub mod lmdb;
#[cfg(feature = "mdbx")]
pub mod mdbx;
#[cfg(feature = "rocksdb")]
pub mod rocksdb;
#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub mod sql;

pub use backend::{Backend, ByteStore, Packed};
pub use database::{KvDatabase, SyncKvDatabase};
pub use memory::{LocalMap, MapBackend, SharedMap};
pub use options::StoreOptions;

/// Name of the dbi, column family or keyspace holding the entries.
#[cfg_attr(
    not(any(feature = "lmdb", feature = "mdbx", feature = "rocksdb", feature = "fjall")),
    allow(dead_code)
)]
pub(crate) const KEYSPACE: &str = "unikv";

/// Make sure the directory of a file-backed engine exists.
///
/// Fails with [`std::io::ErrorKind::NotFound`] when the directory is
/// missing and `create_if_missing` is false.
#[cfg_attr(
    not(any(feature = "lmdb", feature = "mdbx", feature = "rocksdb", feature = "fjall")),
    allow(dead_code)
)]
pub(crate) fn ensure_dir(path: &Path, create_if_missing: bool) -> std::io::Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    if !create_if_missing {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("database directory does not exist: {}", path.display()),
        ));
    }
    std::fs::create_dir_all(path)
}

/// Remove the named files inside `dir`, then `dir` itself if it is left
/// empty. Missing files are ignored.
#[cfg_attr(not(any(feature = "lmdb", feature = "mdbx")), allow(dead_code))]
pub(crate) fn remove_files(dir: &Path, files: &[&str]) -> std::io::Result<()> {
    for name in files {
        match std::fs::remove_file(dir.join(name)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e),
            _ => {}
        }
    }
    let empty = match std::fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if empty {
        std::fs::remove_dir(dir)?;
    }
    Ok(())
}
