//! Common test utilities and fixtures.
//!
//! Every check takes an open [`KvDatabase`] and must hold identically for
//! every backend; `tests/backends.rs` instantiates them per engine.

#![allow(dead_code, clippy::approx_constant)]

use std::fmt::Debug;

use tempfile::TempDir;
use unikv::{FromStorage, KvDatabase, ToStorage};

/// An open database plus whatever keeps its storage alive.
pub struct Fixture {
    pub db: KvDatabase,
    _dir: Option<TempDir>,
}

impl Fixture {
    pub fn new(db: impl Into<KvDatabase>) -> Self {
        Self {
            db: db.into(),
            _dir: None,
        }
    }

    pub fn with_dir(db: impl Into<KvDatabase>, dir: TempDir) -> Self {
        Self {
            db: db.into(),
            _dir: Some(dir),
        }
    }
}

/// Create a temporary directory for an on-disk engine.
pub fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

fn roundtrip<T>(db: &KvDatabase, value: T)
where
    T: ToStorage + FromStorage + PartialEq + Debug + Copy,
{
    let key = format!("{}:{value:?}", std::any::type_name::<T>());
    db.set(&key, value).unwrap();
    assert_eq!(db.get::<T>(&key).unwrap(), value, "roundtrip of {key}");
}

// =============================================================================
// Checks
// =============================================================================

pub fn boundary_values(db: &KvDatabase) {
    for v in [0i8, -1, i8::MIN, i8::MAX] {
        roundtrip(db, v);
    }
    for v in [0i16, -1, i16::MIN, i16::MAX] {
        roundtrip(db, v);
    }
    for v in [0i32, -1, i32::MIN, i32::MAX] {
        roundtrip(db, v);
    }
    for v in [0i64, -1, i64::MIN, i64::MAX] {
        roundtrip(db, v);
    }
    for v in [0u8, u8::MAX] {
        roundtrip(db, v);
    }
    for v in [0u16, u16::MAX] {
        roundtrip(db, v);
    }
    for v in [0u32, u32::MAX] {
        roundtrip(db, v);
    }
    for v in [0u64, u64::MAX] {
        roundtrip(db, v);
    }
    for v in [0.0f32, -1.0, f32::MIN, f32::MAX, f32::MIN_POSITIVE] {
        roundtrip(db, v);
    }
    for v in [0.0f64, -1.0, f64::MIN, f64::MAX, f64::MIN_POSITIVE] {
        roundtrip(db, v);
    }
    roundtrip(db, true);
    roundtrip(db, false);
}

pub fn float_cross_read(db: &KvDatabase) {
    db.set("float", 3.14f32).unwrap();
    let widened = db.get::<f64>("float").unwrap();
    assert!((widened - 3.14).abs() < 1e-4, "got {widened}");

    db.set("double", 3.14f64).unwrap();
    let narrowed = db.get::<f32>("double").unwrap();
    assert!((narrowed - 3.14).abs() < 1e-6, "got {narrowed}");
}

pub fn missing_key(db: &KvDatabase) {
    assert!(db.get::<i32>("absent").unwrap_err().is_key_not_found());
    assert_eq!(db.get_or("absent", -1i32).unwrap(), -1);
    db.remove("absent").unwrap();
}

pub fn length_mismatch(db: &KvDatabase) {
    db.set("text", "hello").unwrap();
    let err = db.get::<i32>("text").unwrap_err();
    assert!(err.is_bad_value(), "expected bad value, got {err:?}");
    assert_eq!(db.get_or("text", -1i32).unwrap(), -1);
}

pub fn text_and_blob(db: &KvDatabase) {
    db.set("text", "Hello").unwrap();
    assert_eq!(db.get::<Vec<u8>>("text").unwrap(), b"Hello");

    db.set("blob", &[0xffu8, 0xfe, 0x00][..]).unwrap();
    assert_eq!(db.get::<Vec<u8>>("blob").unwrap(), vec![0xff, 0xfe, 0x00]);
    assert!(db.get::<String>("blob").unwrap_err().is_bad_value());

    db.set("utf8", b"plain ascii").unwrap();
    assert_eq!(db.get::<String>("utf8").unwrap(), "plain ascii");
}

pub fn overwrite(db: &KvDatabase) {
    db.set("k", 1i32).unwrap();
    db.set("k", 2i32).unwrap();
    assert_eq!(db.get::<i32>("k").unwrap(), 2);
    db.set("k", "now text").unwrap();
    assert_eq!(db.get::<String>("k").unwrap(), "now text");
}

pub fn null_write_removes(db: &KvDatabase) {
    db.set_bytes("bytes", Some(b"payload")).unwrap();
    db.set_bytes("bytes", None).unwrap();
    assert!(db.get::<Vec<u8>>("bytes").unwrap_err().is_key_not_found());

    db.set("opt", Some(5u16)).unwrap();
    assert_eq!(db.get::<u16>("opt").unwrap(), 5);
    db.set("opt", None::<u16>).unwrap();
    assert!(db.get::<u16>("opt").unwrap_err().is_key_not_found());
}

pub fn clear_empties(db: &KvDatabase) {
    let keys = ["a", "b", "c"];
    for (i, key) in keys.iter().enumerate() {
        db.set(key, i as u64).unwrap();
    }
    db.clear().unwrap();
    for key in keys {
        assert!(db.get::<u64>(key).unwrap_err().is_key_not_found());
    }
    db.set("a", 9u64).unwrap();
    assert_eq!(db.get::<u64>("a").unwrap(), 9);
}

pub fn end_to_end(db: &KvDatabase) {
    db.set("int", -42i32).unwrap();
    db.set("text", "Hello").unwrap();
    db.remove("text").unwrap();
    assert_eq!(db.get_or("text", String::new()).unwrap(), "");
    assert_eq!(db.get::<i32>("int").unwrap(), -42);
}

/// Keys an engine cannot hold must be refused with a backend error; every
/// other key must round-trip.
pub fn key_edges(db: &KvDatabase) {
    db.set("ключ/🔑", 1i32).unwrap();
    assert_eq!(db.get::<i32>("ключ/🔑").unwrap(), 1);
    db.set("with space\tand tab", 2i32).unwrap();
    assert_eq!(db.get::<i32>("with space\tand tab").unwrap(), 2);

    let long = "k".repeat(70_000);
    for key in ["", long.as_str()] {
        match db.set(key, 7i32) {
            Ok(()) => {
                assert_eq!(db.get::<i32>(key).unwrap(), 7);
                db.remove(key).unwrap();
                assert!(db.get::<i32>(key).unwrap_err().is_key_not_found());
            }
            Err(err) => assert!(err.is_backend(), "key of {} bytes: {err:?}", key.len()),
        }
    }
}

#[cfg(feature = "domain")]
pub fn domain_types(db: &KvDatabase) {
    use chrono::{DateTime, Utc};
    use unikv::Sha256Digest;
    use uuid::Uuid;

    let id = Uuid::new_v4();
    db.set("id", id).unwrap();
    assert_eq!(db.get::<Uuid>("id").unwrap(), id);

    let digest = Sha256Digest::digest(b"unikv");
    db.set("digest", digest).unwrap();
    assert_eq!(db.get::<Sha256Digest>("digest").unwrap(), digest);

    let ts = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap();
    db.set("ts", ts).unwrap();
    assert_eq!(db.get::<DateTime<Utc>>("ts").unwrap(), ts);

    db.set("id", "not a uuid").unwrap();
    assert!(db.get::<Uuid>("id").unwrap_err().is_bad_value());
}

#[cfg(not(feature = "domain"))]
pub fn domain_types(_db: &KvDatabase) {}
