//! Typed key-value access over interchangeable storage engines.
//!
//! One CRUD contract, [`KvDatabase`], covers LMDB, MDBX, RocksDB, fjall,
//! SQLite and PostgreSQL tables, and in-process maps. Callers store and
//! load native Rust values by string key without knowing which engine is
//! underneath; type mismatches and corrupted values are reported the same
//! way everywhere.
//!
//! # Quick Start
//!
//! ```
//! use unikv::{KvDatabase, Report};
//!
//! let db = KvDatabase::memory();
//! db.set("visits", 41u64)?;
//! let visits: u64 = db.get("visits")?;
//! db.set("visits", visits + 1)?;
//!
//! // Absent keys and type mismatches fall back to the default.
//! assert_eq!(db.get_or("missing", 0.5f64)?, 0.5);
//!
//! // Or park the error instead of returning it.
//! let mut error = None;
//! let name: String = db.get("name").report(&mut error);
//! assert!(name.is_empty() && error.is_some());
//! # Ok::<(), unikv::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`value`] - The unified [`Value`] and its [`ValueKind`] tag
//! - [`cast`] - Conversion between native types and storage shapes
//! - [`pack`] - Byte images used by byte-oriented engines
//! - [`kv`] - Backends and the [`KvDatabase`] facade
//! - [`config`] - TOML configuration (requires `config` feature)
//!
//! # Feature Flags
//!
//! - `lmdb`, `mdbx`, `rocksdb`, `fjall`, `sqlite`, `postgres` - storage
//!   engines (`fjall` and `sqlite` are enabled by default)
//! - `domain` - UUID, SHA-256 digest and timestamp casts (default)
//! - `config` - TOML configuration
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `cli` - Enable the command-line interface binary
//! - `full` - Enable all features

pub mod cast;
#[cfg(feature = "config")]
pub mod config;
mod error;
pub mod kv;
mod logging;
pub mod pack;
pub mod prelude;
pub mod value;

// Re-export the unified error type
pub use error::{Error, ErrorKind, Report, Result};

// Re-export the value model
pub use value::{Value, ValueKind};

// Re-export cast types
#[cfg(feature = "domain")]
pub use cast::domain::Sha256Digest;
pub use cast::{Affinity, CastError, Dialect, DomainType, FromStorage, ToStorage};

// Re-export KV types at crate root for convenience
pub use kv::{Backend, KvDatabase, LocalMap, SharedMap, StoreOptions, SyncKvDatabase};

#[cfg(feature = "config")]
pub use config::{BackendConfig, Config, ConfigError};
