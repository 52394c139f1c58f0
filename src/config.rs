//! TOML configuration.
//!
//! ```toml
//! [database]
//! engine = "lmdb"
//! path = "/var/lib/unikv"
//!
//! [database.options]
//! map_size = 1073741824
//! sync_writes = false
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::error::{Error, Result};
use crate::kv::{KvDatabase, StoreOptions};

/// Configuration loaded from a TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Which engine to open and how.
    pub database: BackendConfig,
    /// Log settings for applications embedding the library.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().display().to_string(), e))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> std::result::Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Engine selection, tagged by `engine`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "engine", rename_all = "lowercase")]
pub enum BackendConfig {
    /// In-process map. `shared = true` selects the mutex-guarded flavour.
    Memory {
        #[serde(default)]
        shared: bool,
    },
    Lmdb(FileEngine),
    Mdbx(FileEngine),
    Rocksdb(FileEngine),
    Fjall(FileEngine),
    Sqlite {
        path: PathBuf,
        #[serde(default = "default_table")]
        table: String,
        #[serde(default = "default_true")]
        create_if_missing: bool,
    },
    Postgres {
        /// libpq-style connection string or URL.
        conninfo: String,
        #[serde(default = "default_table")]
        table: String,
    },
}

/// Settings shared by the directory-based engines.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileEngine {
    pub path: PathBuf,
    #[serde(default)]
    pub options: StoreOptions,
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
}

fn default_table() -> String {
    "kv".to_owned()
}

fn default_true() -> bool {
    true
}

impl BackendConfig {
    /// The `engine` tag of this configuration, which is also the name of
    /// the Cargo feature compiling it in.
    pub fn engine(&self) -> &'static str {
        match self {
            Self::Memory { .. } => "memory",
            Self::Lmdb(_) => "lmdb",
            Self::Mdbx(_) => "mdbx",
            Self::Rocksdb(_) => "rocksdb",
            Self::Fjall(_) => "fjall",
            Self::Sqlite { .. } => "sqlite",
            Self::Postgres { .. } => "postgres",
        }
    }

    /// Open the configured engine.
    ///
    /// # Errors
    ///
    /// [`Error::BackendDisabled`] if the engine's feature is off, otherwise
    /// whatever the engine reports while opening.
    pub fn open(&self) -> Result<KvDatabase> {
        match self {
            Self::Memory { shared: false } => Ok(KvDatabase::memory()),
            Self::Memory { shared: true } => Ok(KvDatabase::shared_memory().into()),
            #[cfg(feature = "lmdb")]
            Self::Lmdb(e) => {
                KvDatabase::lmdb(&e.path, &e.options, e.create_if_missing).map(Into::into)
            }
            #[cfg(feature = "mdbx")]
            Self::Mdbx(e) => {
                KvDatabase::mdbx(&e.path, &e.options, e.create_if_missing).map(Into::into)
            }
            #[cfg(feature = "rocksdb")]
            Self::Rocksdb(e) => {
                KvDatabase::rocksdb(&e.path, &e.options, e.create_if_missing).map(Into::into)
            }
            #[cfg(feature = "fjall")]
            Self::Fjall(e) => {
                KvDatabase::fjall(&e.path, &e.options, e.create_if_missing).map(Into::into)
            }
            #[cfg(feature = "sqlite")]
            Self::Sqlite {
                path,
                table,
                create_if_missing,
            } => KvDatabase::sqlite(path, table, *create_if_missing),
            #[cfg(feature = "postgres")]
            Self::Postgres { conninfo, table } => KvDatabase::postgres(conninfo, table),
            #[allow(unreachable_patterns)]
            other => Err(Error::BackendDisabled(other.engine())),
        }
    }

    /// Delete everything the configured engine stores.
    ///
    /// Always succeeds for in-process maps; a missing database is not an
    /// error.
    pub fn wipe(&self) -> Result<()> {
        match self {
            Self::Memory { .. } => Ok(()),
            #[cfg(feature = "lmdb")]
            Self::Lmdb(e) => crate::kv::lmdb::wipe(&e.path),
            #[cfg(feature = "mdbx")]
            Self::Mdbx(e) => crate::kv::mdbx::wipe(&e.path),
            #[cfg(feature = "rocksdb")]
            Self::Rocksdb(e) => crate::kv::rocksdb::wipe(&e.path),
            #[cfg(feature = "fjall")]
            Self::Fjall(e) => crate::kv::fjall::wipe(&e.path),
            #[cfg(feature = "sqlite")]
            Self::Sqlite { path, .. } => crate::kv::sql::sqlite::wipe(path),
            #[cfg(feature = "postgres")]
            Self::Postgres { conninfo, .. } => crate::kv::sql::postgres::wipe(conninfo),
            #[allow(unreachable_patterns)]
            other => Err(Error::BackendDisabled(other.engine())),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    Io(String, #[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_engine() {
        let toml = r#"
[database]
engine = "lmdb"
path = "/var/lib/unikv"

[database.options]
map_size = 1048576
sync_writes = false

[logging]
level = "debug"
format = "json"
"#;
        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.database.engine(), "lmdb");
        if let BackendConfig::Lmdb(engine) = &config.database {
            assert_eq!(engine.path, PathBuf::from("/var/lib/unikv"));
            assert_eq!(engine.options.map_size, Some(1 << 20));
            assert!(!engine.options.sync_writes);
            assert!(engine.create_if_missing);
        }
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_parse_sql_defaults() {
        let config = Config::from_str(
            r#"
[database]
engine = "postgres"
conninfo = "host=localhost dbname=app"
"#,
        )
        .unwrap();
        assert_eq!(
            config.database,
            BackendConfig::Postgres {
                conninfo: "host=localhost dbname=app".into(),
                table: "kv".into(),
            }
        );
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_unknown_engine_is_parse_error() {
        let err = Config::from_str("[database]\nengine = \"redis\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let toml = r#"
[database]
engine = "fjall"
path = "db"

[database.options]
cache_size = 12
"#;
        assert!(Config::from_str(toml).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/unikv.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/unikv.toml"));
    }

    #[test]
    fn test_open_and_wipe_memory() {
        let backend = BackendConfig::Memory { shared: true };
        let db = backend.open().unwrap();
        assert_eq!(db.backend_name(), Some("shared-memory"));
        backend.wipe().unwrap();
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_open_sqlite_from_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("kv.sqlite");
        let backend = BackendConfig::Sqlite {
            path: path.clone(),
            table: "settings".into(),
            create_if_missing: true,
        };
        let db = backend.open().unwrap();
        db.set("k", 5u32).unwrap();
        assert_eq!(db.get::<u32>("k").unwrap(), 5);
        drop(db);
        backend.wipe().unwrap();
        assert!(!path.exists());
    }

    #[cfg(not(feature = "lmdb"))]
    #[test]
    fn test_disabled_engine() {
        let backend = BackendConfig::Lmdb(FileEngine {
            path: "db".into(),
            options: StoreOptions::default(),
            create_if_missing: true,
        });
        assert!(matches!(backend.open(), Err(Error::BackendDisabled("lmdb"))));
        assert!(matches!(backend.wipe(), Err(Error::BackendDisabled("lmdb"))));
    }
}
