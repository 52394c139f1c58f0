//! MDBX adapter.
//!
//! Same shape as the LMDB adapter: one named table, one transaction per
//! call, committed on success and aborted on drop.

use std::path::Path;

use libmdbx::{
    Database, DatabaseOptions, Mode, NoWriteMap, ReadWriteOptions, SyncMode, TableFlags,
    WriteFlags,
};

use super::backend::ByteStore;
use super::options::StoreOptions;
use super::{KEYSPACE, ensure_dir, remove_files};
use crate::error::{Error, Result};
use crate::logging::{debug, info};

/// Files MDBX creates inside the database directory.
const FILES: &[&str] = &["mdbx.dat", "mdbx.lck"];

/// An MDBX environment used as a byte store.
pub struct MdbxStore {
    db: Database<NoWriteMap>,
}

impl MdbxStore {
    pub fn open(path: &Path, options: &StoreOptions, create_if_missing: bool) -> Result<Self> {
        ensure_dir(path, create_if_missing)?;
        debug!(
            path = %path.display(),
            map_size = options.map_size(),
            "opening MDBX environment"
        );

        let sync_mode = if options.sync_writes {
            SyncMode::Durable
        } else {
            SyncMode::SafeNoSync
        };
        let max_size = isize::try_from(options.map_size())
            .map_err(|_| Error::backend(Self::NAME, "map size does not fit the address space"))?;
        let db = Database::<NoWriteMap>::open_with_options(
            path,
            DatabaseOptions {
                max_tables: Some(1),
                max_readers: options.max_readers,
                mode: Mode::ReadWrite(ReadWriteOptions {
                    sync_mode,
                    max_size: Some(max_size),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )?;

        let txn = db.begin_rw_txn()?;
        txn.create_table(Some(KEYSPACE), TableFlags::default())?;
        txn.commit()?;

        Ok(Self { db })
    }
}

impl ByteStore for MdbxStore {
    const NAME: &'static str = "mdbx";

    fn put_bytes(&self, key: &str, value: &[u8]) -> Result<()> {
        let txn = self.db.begin_rw_txn()?;
        {
            let table = txn.open_table(Some(KEYSPACE))?;
            txn.put(&table, key, value, WriteFlags::empty())?;
        }
        txn.commit()?;
        Ok(())
    }

    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let txn = self.db.begin_ro_txn()?;
        let table = txn.open_table(Some(KEYSPACE))?;
        let value = txn.get::<Vec<u8>>(&table, key.as_bytes())?;
        Ok(value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let txn = self.db.begin_rw_txn()?;
        {
            let table = txn.open_table(Some(KEYSPACE))?;
            txn.del(&table, key, None)?;
        }
        txn.commit()?;
        Ok(())
    }

    fn truncate(&self) -> Result<()> {
        let txn = self.db.begin_rw_txn()?;
        {
            let table = txn.open_table(Some(KEYSPACE))?;
            txn.clear_table(&table)?;
        }
        txn.commit()?;
        debug!("cleared MDBX table");
        Ok(())
    }
}

/// Delete the MDBX environment at `path`.
///
/// Removes `mdbx.dat` and `mdbx.lck`, then the directory if nothing else is
/// left in it. A missing environment is not an error.
pub fn wipe(path: &Path) -> Result<()> {
    info!(path = %path.display(), "wiping MDBX environment");
    remove_files(path, FILES)?;
    Ok(())
}
