//! Conversion between native Rust types and storage shapes.
//!
//! A native type `T` reaches a backend as a [`Value`] produced by
//! [`ToStorage::into_storage`], and comes back through
//! [`FromStorage::from_storage`]. [`FromStorage::KIND`] is the only hint a
//! byte-oriented backend gets about how to interpret the stored bytes.
//!
//! # Module Organization
//!
//! - [`affinity`]: storage affinities and SQL column types
//! - [`error`]: the [`CastError`] type
//! - [`domain`]: domain types routed through a placeholder type (requires
//!   `domain` feature for the UUID, digest and timestamp impls)

mod affinity;
pub mod domain;
mod error;

use std::ffi::{CStr, CString};

pub use affinity::{Affinity, Dialect};
pub use domain::DomainType;
pub use error::CastError;

use crate::value::{Value, ValueKind};

/// Conversion of a native value into its storage shape.
///
/// Total over present values: `None` becomes [`Value::Null`], which the
/// facade turns into a removal.
pub trait ToStorage {
    fn into_storage(self) -> Value;
}

/// Conversion of a storage shape back into a native value.
pub trait FromStorage: Sized {
    /// The kind requested from the backend.
    const KIND: ValueKind;

    fn from_storage(value: Value) -> Result<Self, CastError>;

    /// Storage affinity of this type.
    fn affinity() -> Option<Affinity> {
        Self::KIND.affinity()
    }
}

macro_rules! impl_scalar_storage {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ToStorage for $ty {
                fn into_storage(self) -> Value {
                    Value::$variant(self)
                }
            }

            impl FromStorage for $ty {
                const KIND: ValueKind = ValueKind::$variant;

                fn from_storage(value: Value) -> Result<Self, CastError> {
                    match value.coerce(ValueKind::$variant)? {
                        Value::$variant(v) => Ok(v),
                        other => Err(CastError::Mismatch {
                            expected: ValueKind::$variant,
                            found: other.kind(),
                        }),
                    }
                }
            }
        )*
    };
}

impl_scalar_storage! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => Text,
    Vec<u8> => Blob,
}

impl ToStorage for &str {
    fn into_storage(self) -> Value {
        Value::Text(self.to_owned())
    }
}

impl ToStorage for &String {
    fn into_storage(self) -> Value {
        Value::Text(self.clone())
    }
}

impl ToStorage for &[u8] {
    fn into_storage(self) -> Value {
        Value::Blob(self.to_vec())
    }
}

impl<const N: usize> ToStorage for &[u8; N] {
    fn into_storage(self) -> Value {
        Value::Blob(self.to_vec())
    }
}

impl ToStorage for &CStr {
    fn into_storage(self) -> Value {
        match self.to_str() {
            Ok(text) => Value::Text(text.to_owned()),
            Err(_) => Value::Blob(self.to_bytes().to_vec()),
        }
    }
}

impl ToStorage for CString {
    fn into_storage(self) -> Value {
        self.as_c_str().into_storage()
    }
}

impl ToStorage for Value {
    fn into_storage(self) -> Value {
        self
    }
}

impl<T: ToStorage> ToStorage for Option<T> {
    fn into_storage(self) -> Value {
        match self {
            Some(inner) => inner.into_storage(),
            None => Value::Null,
        }
    }
}

impl<T: FromStorage> FromStorage for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn from_storage(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Null => Ok(None),
            present => T::from_storage(present).map(Some),
        }
    }
}
