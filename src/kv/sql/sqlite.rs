//! SQLite table used as a key-value store.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};

use super::KvStatements;
use crate::cast::Dialect;
use crate::error::Result;
use crate::kv::backend::ByteStore;
use crate::logging::{debug, info};

/// Suffixes of the files SQLite keeps next to the database.
const SIDECARS: &[&str] = &["-wal", "-shm", "-journal"];

/// A SQLite table used as a byte store.
///
/// The connection is not `Sync`; one store serves one caller at a time.
pub struct SqliteStore {
    conn: Connection,
    statements: KvStatements,
}

impl SqliteStore {
    pub fn open(path: &Path, table: &str, create_if_missing: bool) -> Result<Self> {
        let statements = KvStatements::new(Dialect::Sqlite, table)?;
        debug!(path = %path.display(), table = table, "opening SQLite database");

        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if create_if_missing {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }
        let conn = Connection::open_with_flags(path, flags)?;
        conn.execute_batch(&statements.create_table)?;

        // PUT and GET are prepared once and served from the statement cache.
        conn.prepare_cached(&statements.put)?;
        conn.prepare_cached(&statements.get)?;

        Ok(Self { conn, statements })
    }
}

impl ByteStore for SqliteStore {
    const NAME: &'static str = "sqlite";

    fn put_bytes(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(&self.statements.put)?;
        stmt.execute(params![key, value])?;
        Ok(())
    }

    /// Rows written by other programs may hold any storage class. INTEGER
    /// and REAL come back as their 8-byte native image, NULL as no bytes.
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut stmt = self.conn.prepare_cached(&self.statements.get)?;
        let value = stmt
            .query_row(params![key], |row| {
                Ok(match row.get_ref(0)? {
                    ValueRef::Blob(bytes) | ValueRef::Text(bytes) => bytes.to_vec(),
                    ValueRef::Integer(n) => n.to_ne_bytes().to_vec(),
                    ValueRef::Real(x) => x.to_ne_bytes().to_vec(),
                    ValueRef::Null => Vec::new(),
                })
            })
            .optional()?;
        Ok(value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.conn.execute(&self.statements.remove, params![key])?;
        Ok(())
    }

    fn truncate(&self) -> Result<()> {
        self.conn.execute(&self.statements.clear, [])?;
        debug!("cleared SQLite table");
        Ok(())
    }
}

/// Delete the SQLite database at `path` together with its WAL, shared
/// memory and rollback journal files. Missing files are ignored.
pub fn wipe(path: &Path) -> Result<()> {
    info!(path = %path.display(), "wiping SQLite database");
    let mut files = vec![path.to_path_buf()];
    files.extend(SIDECARS.iter().map(|suffix| sidecar(path, suffix)));
    for file in files {
        match std::fs::remove_file(&file) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }
    }
    Ok(())
}

fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}
