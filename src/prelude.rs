//! Convenient re-exports for common usage patterns.
//!
//! ```
//! use unikv::prelude::*;
//!
//! let db = KvDatabase::shared_memory();
//! db.set("greeting", "hello")?;
//! assert_eq!(db.get::<String>("greeting")?, "hello");
//! # Ok::<(), unikv::Error>(())
//! ```

// Unified error handling
pub use crate::error::{Error, ErrorKind, Report, Result};

// Values and casts
pub use crate::cast::{DomainType, FromStorage, ToStorage};
pub use crate::value::{Value, ValueKind};

// Facade and backends
pub use crate::kv::{Backend, KvDatabase, StoreOptions, SyncKvDatabase};

// Configuration (requires "config" feature)
#[cfg(feature = "config")]
pub use crate::config::{BackendConfig, Config};
