//! Relational engines used as key-value stores.
//!
//! Both adapters keep entries in a two-column table:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS "name" (key TEXT NOT NULL PRIMARY KEY, value BLOB)
//! ```
//!
//! with `BYTEA` in place of `BLOB` on PostgreSQL. The statement text for
//! both dialects is built here, by [`KvStatements`].

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use crate::cast::{Affinity, Dialect};
use crate::error::{Error, Result};

/// SQL text of the five statements a KV table needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvStatements {
    pub create_table: String,
    pub put: String,
    pub get: String,
    pub remove: String,
    pub clear: String,
}

impl KvStatements {
    /// Build the statements for `table` in the given dialect.
    pub fn new(dialect: Dialect, table: &str) -> Result<Self> {
        validate_table_name(table)?;
        let table = quote_identifier(table);
        let (p1, p2) = (dialect.placeholder(1), dialect.placeholder(2));
        let key_type = Affinity::Text.column_type(dialect);
        let value_type = Affinity::Blob.column_type(dialect);

        Ok(Self {
            create_table: format!(
                "CREATE TABLE IF NOT EXISTS {table} \
                 (key {key_type} NOT NULL PRIMARY KEY, value {value_type})"
            ),
            put: format!(
                "INSERT INTO {table} (key, value) VALUES ({p1}, {p2}) \
                 ON CONFLICT (key) DO UPDATE SET value = excluded.value"
            ),
            get: format!("SELECT value FROM {table} WHERE key = {p1}"),
            remove: format!("DELETE FROM {table} WHERE key = {p1}"),
            clear: format!("DELETE FROM {table}"),
        })
    }
}

/// Quote an SQL identifier, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn validate_table_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('\0') {
        return Err(Error::InvalidTableName(name.to_owned()));
    }
    Ok(())
}
