//! In-process map backend.
//!
//! Values are kept as [`Value`]s, so the write-time tag survives and a read
//! type mismatch is a plain tag comparison done by the cast layer. The only
//! difference between the two flavours is the [`Guard`] around the map.

use std::cell::RefCell;
use std::collections::HashMap;

use parking_lot::Mutex;

use super::backend::Backend;
use crate::error::{Error, Result};
use crate::logging::trace;
use crate::value::{Value, ValueKind};

type Map = HashMap<String, Value>;

/// Access discipline around the map.
pub trait Guard: Default + Send {
    /// Backend name reported by [`Backend::name`].
    const NAME: &'static str;

    /// Run `f` with exclusive access to the map.
    fn with<R>(&self, f: impl FnOnce(&mut Map) -> R) -> R;
}

/// No lock at all. The map is `Send` but not `Sync`, so the compiler keeps
/// it on one thread at a time.
#[derive(Debug, Default)]
pub struct Unguarded(RefCell<Map>);

impl Guard for Unguarded {
    const NAME: &'static str = "memory";

    fn with<R>(&self, f: impl FnOnce(&mut Map) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }
}

/// One mutex around the whole map.
#[derive(Debug, Default)]
pub struct Exclusive(Mutex<Map>);

impl Guard for Exclusive {
    const NAME: &'static str = "shared-memory";

    fn with<R>(&self, f: impl FnOnce(&mut Map) -> R) -> R {
        f(&mut self.0.lock())
    }
}

/// A [`Backend`] over a `HashMap<String, Value>`.
#[derive(Debug, Default)]
pub struct MapBackend<G> {
    map: G,
}

/// Single-threaded map.
pub type LocalMap = MapBackend<Unguarded>;

/// Mutex-guarded map, shareable between threads through `Arc`.
pub type SharedMap = MapBackend<Exclusive>;

impl<G: Guard> MapBackend<G> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.map.with(|map| map.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<G: Guard> Backend for MapBackend<G> {
    fn name(&self) -> &'static str {
        G::NAME
    }

    fn put(&self, key: &str, value: &Value) -> Result<()> {
        trace!(backend = G::NAME, key = key, kind = %value.kind(), "put");
        self.map.with(|map| {
            if value.is_null() {
                map.remove(key);
            } else {
                map.insert(key.to_owned(), value.clone());
            }
        });
        Ok(())
    }

    fn fetch(&self, key: &str, _kind: ValueKind) -> Result<Value> {
        self.map
            .with(|map| map.get(key).cloned())
            .ok_or_else(|| Error::KeyNotFound(key.to_owned()))
    }

    fn remove(&self, key: &str) -> Result<()> {
        trace!(backend = G::NAME, key = key, "remove");
        self.map.with(|map| map.remove(key));
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.map.with(Map::clear);
        Ok(())
    }
}
