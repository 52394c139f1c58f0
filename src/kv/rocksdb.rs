//! RocksDB adapter.
//!
//! Entries live in the `unikv` column family, apart from `default`.
//! Clearing drops and recreates that column family.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, MultiThreaded, Options,
    WriteOptions,
};

use super::backend::ByteStore;
use super::options::StoreOptions;
use super::{KEYSPACE, ensure_dir};
use crate::error::{Error, Result};
use crate::logging::{debug, error, info};

type Db = DBWithThreadMode<MultiThreaded>;

/// A RocksDB column family used as a byte store.
pub struct RocksStore {
    db: Db,
    write_options: WriteOptions,
}

impl RocksStore {
    pub fn open(path: &Path, options: &StoreOptions, create_if_missing: bool) -> Result<Self> {
        ensure_dir(path, create_if_missing)?;
        debug!(path = %path.display(), "opening RocksDB database");

        let mut db_options = Options::default();
        db_options.create_if_missing(create_if_missing);
        db_options.create_missing_column_families(true);

        // A directory without a CURRENT file holds no database yet.
        let mut families = if path.join("CURRENT").is_file() {
            Db::list_cf(&db_options, path)?
        } else {
            Vec::new()
        };
        if !families.iter().any(|name| name == KEYSPACE) {
            families.push(KEYSPACE.to_owned());
        }
        let descriptors = families
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));
        let db = Db::open_cf_descriptors(&db_options, path, descriptors)?;

        let mut write_options = WriteOptions::default();
        write_options.set_sync(options.sync_writes);

        Ok(Self { db, write_options })
    }

    fn family(&self) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(KEYSPACE)
            .ok_or_else(|| Error::backend(Self::NAME, "column family 'unikv' is missing"))
    }
}

impl ByteStore for RocksStore {
    const NAME: &'static str = "rocksdb";

    fn put_bytes(&self, key: &str, value: &[u8]) -> Result<()> {
        let cf = self.family()?;
        self.db.put_cf_opt(&cf, key, value, &self.write_options)?;
        Ok(())
    }

    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let cf = self.family()?;
        Ok(self.db.get_cf(&cf, key)?)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let cf = self.family()?;
        self.db.delete_cf_opt(&cf, key, &self.write_options)?;
        Ok(())
    }

    fn truncate(&self) -> Result<()> {
        self.db.drop_cf(KEYSPACE)?;
        if let Err(e) = self.db.create_cf(KEYSPACE, &Options::default()) {
            error!(error = %e, "column family dropped but not recreated");
            return Err(e.into());
        }
        debug!("recreated RocksDB column family");
        Ok(())
    }
}

/// Destroy the RocksDB database at `path` and remove its directory.
pub fn wipe(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    info!(path = %path.display(), "wiping RocksDB database");
    Db::destroy(&Options::default(), path)?;
    if path.exists() {
        std::fs::remove_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_entries_live_in_own_family() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db");
        {
            let store = RocksStore::open(&path, &StoreOptions::default(), true).unwrap();
            store.put_bytes("k", b"v").unwrap();
            assert!(store.db.get(b"k").unwrap().is_none());
        }
        let families = Db::list_cf(&Options::default(), &path).unwrap();
        assert!(families.iter().any(|name| name == "unikv"));

        let store = RocksStore::open(&path, &StoreOptions::default(), false).unwrap();
        assert_eq!(store.get_bytes("k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_truncate_recreates_family() {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path(), &StoreOptions::default(), true).unwrap();
        store.put_bytes("a", b"1").unwrap();
        store.truncate().unwrap();
        assert_eq!(store.get_bytes("a").unwrap(), None);
        store.put_bytes("a", b"2").unwrap();
        assert_eq!(store.get_bytes("a").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn test_broken_database_is_reported() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("CURRENT"), "MANIFEST-999999\n").unwrap();
        let result = RocksStore::open(dir.path(), &StoreOptions::default(), true);
        assert!(matches!(result, Err(Error::RocksDb(_))));
    }

    #[test]
    fn test_wipe() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db");
        drop(RocksStore::open(&path, &StoreOptions::default(), true).unwrap());
        wipe(&path).unwrap();
        assert!(!path.exists());
    }
}
