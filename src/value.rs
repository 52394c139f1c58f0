//! The unified in-memory value.
//!
//! [`Value`] is the closed set of shapes a native type can take on its way
//! to or from a backend. In-process backends store it as-is, so the
//! write-time tag survives; byte-oriented backends flatten it with
//! [`crate::pack`] and lose the tag.

use std::fmt;

use crate::cast::{Affinity, CastError};

/// A tagged value in one of the supported storage shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value. Writing it is the same as removing the key.
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// The tag of a [`Value`], also used as the read-type hint for backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Text,
    Blob,
}

impl ValueKind {
    /// Every kind except `Null`, in declaration order.
    pub const STORABLE: [ValueKind; 13] = [
        ValueKind::Bool,
        ValueKind::I8,
        ValueKind::I16,
        ValueKind::I32,
        ValueKind::I64,
        ValueKind::U8,
        ValueKind::U16,
        ValueKind::U32,
        ValueKind::U64,
        ValueKind::F32,
        ValueKind::F64,
        ValueKind::Text,
        ValueKind::Blob,
    ];

    /// Storage affinity of this kind. `None` for `Null`.
    pub const fn affinity(self) -> Option<Affinity> {
        match self {
            ValueKind::Null => None,
            ValueKind::Bool => Some(Affinity::Boolean),
            ValueKind::I8 | ValueKind::U8 => Some(Affinity::Integer { width: 1 }),
            ValueKind::I16 | ValueKind::U16 => Some(Affinity::Integer { width: 2 }),
            ValueKind::I32 | ValueKind::U32 => Some(Affinity::Integer { width: 4 }),
            ValueKind::I64 | ValueKind::U64 => Some(Affinity::Integer { width: 8 }),
            ValueKind::F32 => Some(Affinity::Float),
            ValueKind::F64 => Some(Affinity::Double),
            ValueKind::Text => Some(Affinity::Text),
            ValueKind::Blob => Some(Affinity::Blob),
        }
    }

    /// Size of the fixed-width byte image, or `None` for variable-length kinds.
    pub const fn width(self) -> Option<usize> {
        match self.affinity() {
            Some(affinity) => affinity.width(),
            None => None,
        }
    }

    /// Whether this kind is a floating-point type.
    pub const fn is_float(self) -> bool {
        matches!(self, ValueKind::F32 | ValueKind::F64)
    }

    /// Lowercase name, as accepted by the CLI `--type` flag.
    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::I8 => "i8",
            ValueKind::I16 => "i16",
            ValueKind::I32 => "i32",
            ValueKind::I64 => "i64",
            ValueKind::U8 => "u8",
            ValueKind::U16 => "u16",
            ValueKind::U32 => "u32",
            ValueKind::U64 => "u64",
            ValueKind::F32 => "f32",
            ValueKind::F64 => "f64",
            ValueKind::Text => "text",
            ValueKind::Blob => "blob",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// The tag of this value.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::I8(_) => ValueKind::I8,
            Value::I16(_) => ValueKind::I16,
            Value::I32(_) => ValueKind::I32,
            Value::I64(_) => ValueKind::I64,
            Value::U8(_) => ValueKind::U8,
            Value::U16(_) => ValueKind::U16,
            Value::U32(_) => ValueKind::U32,
            Value::U64(_) => ValueKind::U64,
            Value::F32(_) => ValueKind::F32,
            Value::F64(_) => ValueKind::F64,
            Value::Text(_) => ValueKind::Text,
            Value::Blob(_) => ValueKind::Blob,
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert this value to the requested kind.
    ///
    /// Only three conversions are allowed besides the identity:
    /// f32 and f64 widen/narrow into each other, text reads as blob, and
    /// blob reads as text when it is valid UTF-8. Anything else is a
    /// [`CastError::Mismatch`].
    pub fn coerce(self, kind: ValueKind) -> Result<Value, CastError> {
        if self.kind() == kind {
            return Ok(self);
        }
        match (self, kind) {
            (Value::F32(v), ValueKind::F64) => Ok(Value::F64(f64::from(v))),
            (Value::F64(v), ValueKind::F32) => Ok(Value::F32(v as f32)),
            (Value::Text(s), ValueKind::Blob) => Ok(Value::Blob(s.into_bytes())),
            (Value::Blob(b), ValueKind::Text) => String::from_utf8(b)
                .map(Value::Text)
                .map_err(|_| CastError::InvalidUtf8),
            (other, expected) => Err(CastError::Mismatch {
                expected,
                found: other.kind(),
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::I8(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::U16(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Blob(bytes) => {
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(Value::I32(-1).kind(), ValueKind::I32);
        assert_eq!(Value::Text("a".into()).kind(), ValueKind::Text);
        assert_eq!(Value::Null.kind(), ValueKind::Null);
    }

    #[test]
    fn test_widths() {
        assert_eq!(ValueKind::Bool.width(), Some(1));
        assert_eq!(ValueKind::U16.width(), Some(2));
        assert_eq!(ValueKind::F32.width(), Some(4));
        assert_eq!(ValueKind::I64.width(), Some(8));
        assert_eq!(ValueKind::Text.width(), None);
        assert_eq!(ValueKind::Null.width(), None);
    }

    #[test]
    fn test_coerce_float_pair() {
        assert_eq!(Value::F32(1.5).coerce(ValueKind::F64).unwrap(), Value::F64(1.5));
        assert_eq!(Value::F64(2.25).coerce(ValueKind::F32).unwrap(), Value::F32(2.25));
    }

    #[test]
    fn test_coerce_text_blob() {
        assert_eq!(
            Value::Text("hi".into()).coerce(ValueKind::Blob).unwrap(),
            Value::Blob(b"hi".to_vec())
        );
        assert!(matches!(
            Value::Blob(vec![0xff, 0xfe]).coerce(ValueKind::Text),
            Err(CastError::InvalidUtf8)
        ));
    }

    #[test]
    fn test_coerce_rejects_same_width_integers() {
        let err = Value::I32(7).coerce(ValueKind::U32).unwrap_err();
        assert!(matches!(
            err,
            CastError::Mismatch { expected: ValueKind::U32, found: ValueKind::I32 }
        ));
    }

    #[test]
    fn test_display_blob_as_hex() {
        assert_eq!(Value::Blob(vec![0x00, 0xab, 0x10]).to_string(), "00ab10");
        assert_eq!(Value::I64(-42).to_string(), "-42");
    }
}
