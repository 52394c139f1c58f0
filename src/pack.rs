//! Byte-image packing shared by every byte-oriented backend.
//!
//! Arithmetic values are stored as exactly `size_of::<T>()` bytes in native
//! byte order. Text and blobs are stored verbatim. Nothing records which
//! type was written, so [`decode`] checks what it can from the requested
//! kind alone:
//!
//! - the byte length must equal the width of the requested type;
//! - a floating-point image must not be NaN, because NaN is reserved as a
//!   marker for foreign or corrupted data;
//! - a bool image must be `0` or `1`.
//!
//! Files written on one byte order are not portable to the other.

use std::borrow::Cow;

use crate::cast::CastError;
use crate::value::{Value, ValueKind};

/// Pack a value into its stored bytes.
///
/// Returns `None` for [`Value::Null`]; callers turn that into a removal.
pub fn encode(value: &Value) -> Option<Cow<'_, [u8]>> {
    let bytes = match value {
        Value::Null => return None,
        Value::Bool(v) => Cow::Owned(vec![u8::from(*v)]),
        Value::I8(v) => Cow::Owned(v.to_ne_bytes().to_vec()),
        Value::I16(v) => Cow::Owned(v.to_ne_bytes().to_vec()),
        Value::I32(v) => Cow::Owned(v.to_ne_bytes().to_vec()),
        Value::I64(v) => Cow::Owned(v.to_ne_bytes().to_vec()),
        Value::U8(v) => Cow::Owned(v.to_ne_bytes().to_vec()),
        Value::U16(v) => Cow::Owned(v.to_ne_bytes().to_vec()),
        Value::U32(v) => Cow::Owned(v.to_ne_bytes().to_vec()),
        Value::U64(v) => Cow::Owned(v.to_ne_bytes().to_vec()),
        Value::F32(v) => Cow::Owned(v.to_ne_bytes().to_vec()),
        Value::F64(v) => Cow::Owned(v.to_ne_bytes().to_vec()),
        Value::Text(v) => Cow::Borrowed(v.as_bytes()),
        Value::Blob(v) => Cow::Borrowed(v.as_slice()),
    };
    Some(bytes)
}

/// Unpack stored bytes as the requested kind.
///
/// A request for `f32` or `f64` accepts either a 4- or an 8-byte image and
/// returns the variant that was actually stored; the cast layer then
/// widens or narrows it.
pub fn decode(bytes: Vec<u8>, kind: ValueKind) -> Result<Value, CastError> {
    match kind {
        ValueKind::Null => Err(CastError::Unsupported(kind)),
        ValueKind::Bool => match image::<1>(&bytes)? {
            [0] => Ok(Value::Bool(false)),
            [1] => Ok(Value::Bool(true)),
            [other] => Err(CastError::InvalidBool(other)),
        },
        ValueKind::I8 => Ok(Value::I8(i8::from_ne_bytes(image(&bytes)?))),
        ValueKind::I16 => Ok(Value::I16(i16::from_ne_bytes(image(&bytes)?))),
        ValueKind::I32 => Ok(Value::I32(i32::from_ne_bytes(image(&bytes)?))),
        ValueKind::I64 => Ok(Value::I64(i64::from_ne_bytes(image(&bytes)?))),
        ValueKind::U8 => Ok(Value::U8(u8::from_ne_bytes(image(&bytes)?))),
        ValueKind::U16 => Ok(Value::U16(u16::from_ne_bytes(image(&bytes)?))),
        ValueKind::U32 => Ok(Value::U32(u32::from_ne_bytes(image(&bytes)?))),
        ValueKind::U64 => Ok(Value::U64(u64::from_ne_bytes(image(&bytes)?))),
        ValueKind::F32 | ValueKind::F64 => decode_float(&bytes, kind),
        ValueKind::Text => String::from_utf8(bytes)
            .map(Value::Text)
            .map_err(|_| CastError::InvalidUtf8),
        ValueKind::Blob => Ok(Value::Blob(bytes)),
    }
}

fn decode_float(bytes: &[u8], kind: ValueKind) -> Result<Value, CastError> {
    let value = match bytes.len() {
        4 => {
            let v = f32::from_ne_bytes(image(bytes)?);
            if v.is_nan() {
                return Err(CastError::NanSentinel(ValueKind::F32));
            }
            Value::F32(v)
        }
        8 => {
            let v = f64::from_ne_bytes(image(bytes)?);
            if v.is_nan() {
                return Err(CastError::NanSentinel(ValueKind::F64));
            }
            Value::F64(v)
        }
        found => {
            return Err(CastError::Width {
                expected: kind.width().unwrap_or_default(),
                found,
            });
        }
    };
    Ok(value)
}

/// View `bytes` as a fixed-size image, failing on any length mismatch.
fn image<const N: usize>(bytes: &[u8]) -> Result<[u8; N], CastError> {
    bytes.try_into().map_err(|_| CastError::Width {
        expected: N,
        found: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: Value) -> Value {
        let kind = value.kind();
        let bytes = encode(&value).unwrap().into_owned();
        decode(bytes, kind).unwrap()
    }

    #[test]
    fn test_width_is_exact() {
        assert_eq!(encode(&Value::U16(1)).unwrap().len(), 2);
        assert_eq!(encode(&Value::I64(1)).unwrap().len(), 8);
        assert_eq!(encode(&Value::Bool(true)).unwrap().len(), 1);
        assert_eq!(encode(&Value::F32(1.0)).unwrap().len(), 4);
    }

    #[test]
    fn test_native_byte_order() {
        let bytes = encode(&Value::U32(0x0102_0304)).unwrap().into_owned();
        assert_eq!(bytes, 0x0102_0304u32.to_ne_bytes().to_vec());
    }

    #[test]
    fn test_boundary_values() {
        for value in [
            Value::I8(i8::MIN),
            Value::I16(-1),
            Value::I32(i32::MAX),
            Value::I64(i64::MIN),
            Value::U8(u8::MAX),
            Value::U64(0),
            Value::F64(f64::MAX),
            Value::F32(f32::MIN_POSITIVE),
        ] {
            assert_eq!(roundtrip(value.clone()), value);
        }
    }

    #[test]
    fn test_null_encodes_to_nothing() {
        assert!(encode(&Value::Null).is_none());
    }

    #[test]
    fn test_length_mismatch() {
        let err = decode(b"hello".to_vec(), ValueKind::I32).unwrap_err();
        assert_eq!(err, CastError::Width { expected: 4, found: 5 });
    }

    #[test]
    fn test_nan_is_rejected() {
        let bytes = f64::NAN.to_ne_bytes().to_vec();
        assert_eq!(
            decode(bytes, ValueKind::F64).unwrap_err(),
            CastError::NanSentinel(ValueKind::F64)
        );
        let bytes = f32::NAN.to_ne_bytes().to_vec();
        assert_eq!(
            decode(bytes, ValueKind::F64).unwrap_err(),
            CastError::NanSentinel(ValueKind::F32)
        );
    }

    #[test]
    fn test_float_hint_accepts_either_width() {
        let narrow = encode(&Value::F32(0.5)).unwrap().into_owned();
        assert_eq!(decode(narrow, ValueKind::F64).unwrap(), Value::F32(0.5));
        let wide = encode(&Value::F64(0.25)).unwrap().into_owned();
        assert_eq!(decode(wide, ValueKind::F32).unwrap(), Value::F64(0.25));
        assert_eq!(
            decode(vec![0; 3], ValueKind::F32).unwrap_err(),
            CastError::Width { expected: 4, found: 3 }
        );
    }

    #[test]
    fn test_invalid_bool() {
        assert_eq!(decode(vec![7], ValueKind::Bool).unwrap_err(), CastError::InvalidBool(7));
    }

    #[test]
    fn test_text_is_verbatim() {
        let value = Value::Text("Hello".into());
        let bytes = encode(&value).unwrap();
        assert!(matches!(bytes, Cow::Borrowed(b"Hello")));
        assert_eq!(decode(b"Hello".to_vec(), ValueKind::Text).unwrap(), Value::Text("Hello".into()));
        assert_eq!(decode(vec![0xff], ValueKind::Text).unwrap_err(), CastError::InvalidUtf8);
    }
}
