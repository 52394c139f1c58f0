//! LMDB adapter (via heed).
//!
//! Entries live in the named database `unikv` of the environment. Every
//! call opens its own transaction: read-only for gets, read-write and
//! committed for writes. A failed write aborts when the transaction drops.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvFlags, EnvOpenOptions};

use super::backend::ByteStore;
use super::options::StoreOptions;
use super::{KEYSPACE, ensure_dir, remove_files};
use crate::error::Result;
use crate::logging::{debug, info};

/// Files LMDB creates inside the environment directory.
const FILES: &[&str] = &["data.mdb", "lock.mdb"];

/// An LMDB environment used as a byte store.
pub struct LmdbStore {
    env: Env,
    db: Database<Bytes, Bytes>,
}

impl LmdbStore {
    pub fn open(path: &Path, options: &StoreOptions, create_if_missing: bool) -> Result<Self> {
        ensure_dir(path, create_if_missing)?;
        debug!(
            path = %path.display(),
            map_size = options.map_size(),
            "opening LMDB environment"
        );

        let mut builder = EnvOpenOptions::new();
        builder.map_size(options.map_size()).max_dbs(1);
        if let Some(readers) = options.max_readers {
            builder.max_readers(readers);
        }
        if !options.sync_writes {
            // SAFETY: NO_SYNC only trades durability of the last commits on
            // a system crash; it cannot corrupt the environment.
            unsafe {
                builder.flags(EnvFlags::NO_SYNC);
            }
        }
        // SAFETY: the environment is opened once per store and the data file
        // is only modified through LMDB, never truncated or rewritten
        // underneath the memory map.
        let env = unsafe { builder.open(path)? };

        let mut wtxn = env.write_txn()?;
        let db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(KEYSPACE))?;
        wtxn.commit()?;

        Ok(Self { env, db })
    }
}

impl ByteStore for LmdbStore {
    const NAME: &'static str = "lmdb";

    fn put_bytes(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut wtxn = self.env.write_txn()?;
        self.db.put(&mut wtxn, key.as_bytes(), value)?;
        wtxn.commit()?;
        Ok(())
    }

    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let rtxn = self.env.read_txn()?;
        let value = self.db.get(&rtxn, key.as_bytes())?.map(<[u8]>::to_vec);
        Ok(value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut wtxn = self.env.write_txn()?;
        self.db.delete(&mut wtxn, key.as_bytes())?;
        wtxn.commit()?;
        Ok(())
    }

    fn truncate(&self) -> Result<()> {
        let mut wtxn = self.env.write_txn()?;
        self.db.clear(&mut wtxn)?;
        wtxn.commit()?;
        debug!("cleared LMDB database");
        Ok(())
    }
}

/// Delete the LMDB environment at `path`.
///
/// Removes `data.mdb` and `lock.mdb`, then the directory if nothing else is
/// left in it. A missing environment is not an error.
pub fn wipe(path: &Path) -> Result<()> {
    info!(path = %path.display(), "wiping LMDB environment");
    remove_files(path, FILES)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn options() -> StoreOptions {
        StoreOptions::default().with_map_size(16 << 20)
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("env");
        {
            let store = LmdbStore::open(&path, &options(), true).unwrap();
            store.put_bytes("k", &7u32.to_ne_bytes()).unwrap();
        }
        let store = LmdbStore::open(&path, &options(), false).unwrap();
        assert_eq!(store.get_bytes("k").unwrap(), Some(7u32.to_ne_bytes().to_vec()));
    }

    #[test]
    fn test_delete_and_truncate() {
        let dir = TempDir::new().unwrap();
        let store = LmdbStore::open(dir.path(), &options(), true).unwrap();
        store.put_bytes("a", b"1").unwrap();
        store.put_bytes("b", b"2").unwrap();
        store.delete("a").unwrap();
        store.delete("a").unwrap();
        assert_eq!(store.get_bytes("a").unwrap(), None);
        store.truncate().unwrap();
        assert_eq!(store.get_bytes("b").unwrap(), None);
    }

    #[test]
    fn test_wipe() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("env");
        drop(LmdbStore::open(&path, &options(), true).unwrap());
        assert!(path.join("data.mdb").exists());
        wipe(&path).unwrap();
        assert!(!path.exists());
    }
}
