//! fjall adapter.
//!
//! Entries live in the `unikv` keyspace of a fjall database. Each write is
//! followed by a persist call whose mode follows
//! [`StoreOptions::sync_writes`].
//!
//! fjall keys must be 1 to 65535 bytes long. Other keys are refused with a
//! backend error before they reach the engine.

use std::path::Path;

use fjall::{Keyspace, KeyspaceCreateOptions, PersistMode};

use super::backend::ByteStore;
use super::options::StoreOptions;
use super::{KEYSPACE, ensure_dir};
use crate::error::{Error, Result};
use crate::logging::{debug, info, warn};

/// Longest key fjall accepts, in bytes.
const MAX_KEY_LEN: usize = u16::MAX as usize;

/// A fjall keyspace used as a byte store.
pub struct FjallStore {
    db: fjall::Database,
    keyspace: Keyspace,
    persist: PersistMode,
}

impl FjallStore {
    pub fn open(path: &Path, options: &StoreOptions, create_if_missing: bool) -> Result<Self> {
        ensure_dir(path, create_if_missing)?;
        debug!(path = %path.display(), "opening fjall database");

        let db = fjall::Database::builder(path).open()?;
        let keyspace = db.keyspace(KEYSPACE, KeyspaceCreateOptions::default)?;
        let persist = if options.sync_writes {
            PersistMode::SyncAll
        } else {
            PersistMode::Buffer
        };

        Ok(Self {
            db,
            keyspace,
            persist,
        })
    }
}

fn check_key(key: &str) -> Result<()> {
    if key.is_empty() || key.len() > MAX_KEY_LEN {
        warn!(len = key.len(), "refusing key outside fjall's length limits");
        return Err(Error::backend(
            FjallStore::NAME,
            format!("key length {} is outside 1..={MAX_KEY_LEN} bytes", key.len()),
        ));
    }
    Ok(())
}

impl ByteStore for FjallStore {
    const NAME: &'static str = "fjall";

    fn put_bytes(&self, key: &str, value: &[u8]) -> Result<()> {
        check_key(key)?;
        self.keyspace.insert(key, value)?;
        self.db.persist(self.persist)?;
        Ok(())
    }

    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        check_key(key)?;
        Ok(self.keyspace.get(key)?.map(|value| value.to_vec()))
    }

    fn delete(&self, key: &str) -> Result<()> {
        check_key(key)?;
        self.keyspace.remove(key)?;
        self.db.persist(self.persist)?;
        Ok(())
    }

    fn truncate(&self) -> Result<()> {
        self.keyspace.clear()?;
        self.db.persist(self.persist)?;
        debug!("cleared fjall keyspace");
        Ok(())
    }
}

/// Delete the fjall database at `path`. A missing directory is not an error.
pub fn wipe(path: &Path) -> Result<()> {
    if path.exists() {
        info!(path = %path.display(), "wiping fjall database");
        std::fs::remove_dir_all(path)?;
    }
    Ok(())
}
