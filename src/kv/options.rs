//! Tuning knobs shared by the file-backed engines.

/// Options for opening a file-backed engine.
///
/// Every field has a sensible default; engines ignore the knobs they have
/// no equivalent for.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default, deny_unknown_fields))]
pub struct StoreOptions {
    /// Maximum size of the memory map in bytes (LMDB, MDBX upper bound).
    pub map_size: Option<usize>,
    /// Maximum number of concurrent read transactions (LMDB).
    pub max_readers: Option<u32>,
    /// Flush to durable storage after every write.
    pub sync_writes: bool,
}

impl StoreOptions {
    /// Default memory map size: 1 GiB.
    pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

    /// The configured map size, or [`Self::DEFAULT_MAP_SIZE`].
    pub fn map_size(&self) -> usize {
        self.map_size.unwrap_or(Self::DEFAULT_MAP_SIZE)
    }

    pub fn with_map_size(mut self, bytes: usize) -> Self {
        self.map_size = Some(bytes);
        self
    }

    pub fn with_max_readers(mut self, readers: u32) -> Self {
        self.max_readers = Some(readers);
        self
    }

    pub fn with_sync_writes(mut self, sync: bool) -> Self {
        self.sync_writes = sync;
        self
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            map_size: None,
            max_readers: None,
            sync_writes: true,
        }
    }
}
