//! The scalar type registry: one entry per proto3 scalar kind, each
//! supplying a validator, an encoder, and a packed-eligibility flag. The
//! set of kinds is closed and small, so it's expressed as a unit-only enum
//! with a dispatching `match` rather than a table of boxed closures.

use crate::error::EncodeError;
use crate::value::{Value, WideInt};
use crate::wire;

const I32_MIN: i128 = -(1i128 << 31);
const I32_MAX: i128 = (1i128 << 31) - 1;
const U32_MAX: i128 = (1i128 << 32) - 1;
const I64_MIN: i128 = -(1i128 << 63);
const I64_MAX: i128 = (1i128 << 63) - 1;
const U64_MAX: i128 = (1i128 << 64) - 1;
const SFIXED64_MIN: i128 = -((1i128 << 63) - 1);
const SFIXED64_MAX: i128 = (1i128 << 63) - 2;
const FLOAT_MAX: f64 = 3.4028234e38;
const DOUBLE_MAX: f64 = 1.7976931348623157e308;
const MAX_LEN_BYTES: u64 = 1u64 << 32;

/// One of the fifteen proto3 scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Bool,
    Fixed32,
    Sfixed32,
    Fixed64,
    Sfixed64,
    Float,
    Double,
    String,
    Bytes,
}

const ALL: &[(&str, Scalar)] = &[
    ("int32", Scalar::Int32),
    ("int64", Scalar::Int64),
    ("uint32", Scalar::Uint32),
    ("uint64", Scalar::Uint64),
    ("sint32", Scalar::Sint32),
    ("sint64", Scalar::Sint64),
    ("bool", Scalar::Bool),
    ("fixed32", Scalar::Fixed32),
    ("sfixed32", Scalar::Sfixed32),
    ("fixed64", Scalar::Fixed64),
    ("sfixed64", Scalar::Sfixed64),
    ("float", Scalar::Float),
    ("double", Scalar::Double),
    ("string", Scalar::String),
    ("bytes", Scalar::Bytes),
];

impl Scalar {
    /// Looks up a scalar kind by its proto3 keyword. Returns `None` for
    /// anything else (an enum or message name).
    pub fn from_name(name: &str) -> Option<Scalar> {
        ALL.iter().find(|(n, _)| *n == name).map(|(_, s)| *s)
    }

    pub fn name(self) -> &'static str {
        ALL.iter().find(|(_, s)| *s == self).map(|(n, _)| *n).unwrap()
    }

    pub fn wire_type(self) -> u8 {
        match self {
            Scalar::Int32
            | Scalar::Int64
            | Scalar::Uint32
            | Scalar::Uint64
            | Scalar::Sint32
            | Scalar::Sint64
            | Scalar::Bool => wire::WIRE_VARINT,
            Scalar::Fixed32 | Scalar::Sfixed32 | Scalar::Float => wire::WIRE_I32,
            Scalar::Fixed64 | Scalar::Sfixed64 | Scalar::Double => wire::WIRE_I64,
            Scalar::String | Scalar::Bytes => wire::WIRE_LEN,
        }
    }

    /// Whether a repeated field of this kind is packed into a single LEN
    /// frame. Only `string`/`bytes` are excluded.
    pub fn is_packed(self) -> bool {
        !matches!(self, Scalar::String | Scalar::Bytes)
    }

    /// Encodes `value` for this kind, value bytes only (no tag). This is
    /// what packed-repeated emission concatenates directly, rather than
    /// emitting a full tagged encoding and stripping the leading tag byte.
    pub fn encode_value(self, field: &str, value: &Value) -> Result<Vec<u8>, EncodeError> {
        match self {
            Scalar::Int32 => Ok(wire::varint(require_int(self, field, value, I32_MIN, I32_MAX)? as i64 as u64)),
            Scalar::Int64 => Ok(wire::varint(require_int(self, field, value, I64_MIN, I64_MAX)? as i64 as u64)),
            Scalar::Uint32 => Ok(wire::varint(require_int(self, field, value, 0, U32_MAX)? as u64)),
            Scalar::Uint64 => Ok(wire::varint(require_int(self, field, value, 0, U64_MAX)? as u64)),
            Scalar::Sint32 => {
                let v = require_int(self, field, value, I32_MIN, I32_MAX)? as i32;
                Ok(wire::varint(wire::zigzag32(v) as u64))
            }
            Scalar::Sint64 => {
                let v = require_int(self, field, value, I64_MIN, I64_MAX)? as i64;
                Ok(wire::varint(wire::zigzag64(v)))
            }
            Scalar::Bool => match value {
                Value::Bool(b) => Ok(wire::varint(if *b { 1 } else { 0 })),
                other => Err(type_mismatch(field, "bool", other)),
            },
            Scalar::Fixed32 => {
                let v = require_int(self, field, value, 0, U32_MAX)?;
                Ok((v as u32).to_le_bytes().to_vec())
            }
            Scalar::Sfixed32 => {
                let v = require_int(self, field, value, I32_MIN, I32_MAX)?;
                Ok((v as i32 as u32).to_le_bytes().to_vec())
            }
            Scalar::Fixed64 => {
                let v = require_int(self, field, value, 0, U64_MAX)?;
                Ok((v as u64).to_le_bytes().to_vec())
            }
            Scalar::Sfixed64 => {
                let v = require_int(self, field, value, SFIXED64_MIN, SFIXED64_MAX)?;
                Ok((v as i64 as u64).to_le_bytes().to_vec())
            }
            Scalar::Float => {
                let f = require_float(field, value)?;
                if f.is_infinite() || f.abs() > FLOAT_MAX {
                    return Err(EncodeError::Infinite {
                        field: field.to_string(),
                        kind: "float".to_string(),
                    });
                }
                Ok((f as f32).to_le_bytes().to_vec())
            }
            Scalar::Double => {
                let f = require_float(field, value)?;
                if f.is_infinite() || f.abs() > DOUBLE_MAX {
                    return Err(EncodeError::Infinite {
                        field: field.to_string(),
                        kind: "double".to_string(),
                    });
                }
                Ok(f.to_le_bytes().to_vec())
            }
            Scalar::String => match value {
                Value::Text(s) => encode_len_checked(field, s.as_bytes()),
                other => Err(type_mismatch(field, "string", other)),
            },
            Scalar::Bytes => match value {
                Value::Bytes(b) => encode_len_checked(field, b),
                other => Err(type_mismatch(field, "bytes", other)),
            },
        }
    }

    /// Encodes `value` with its field tag — `encode_value` prefixed with
    /// `tag(field_id, wire_type)`.
    pub fn encode(self, field_id: u32, field: &str, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let payload = self.encode_value(field, value)?;
        let mut out = wire::encode_tag(field_id, self.wire_type());
        out.extend(payload);
        Ok(out)
    }
}

fn type_mismatch(field: &str, kind: &str, value: &Value) -> EncodeError {
    EncodeError::TypeMismatch {
        field: field.to_string(),
        kind: kind.to_string(),
        got: value.type_name().to_string(),
    }
}

/// Extracts an integral value from `value`, validates integrality (for a
/// native number), and range-checks it against `[min, max]`.
fn require_int(kind: Scalar, field: &str, value: &Value, min: i128, max: i128) -> Result<i128, EncodeError> {
    let raw = match value {
        Value::Number(n) => {
            if !n.is_finite() || n.ceil() != *n {
                return Err(EncodeError::NotIntegerNumber {
                    field: field.to_string(),
                    value: *n,
                });
            }
            *n as i128
        }
        Value::Wide(WideInt::Signed(i)) => *i as i128,
        Value::Wide(WideInt::Unsigned(u)) => *u as i128,
        other => return Err(type_mismatch(field, kind.name(), other)),
    };
    if raw < min || raw > max {
        if matches!(kind, Scalar::Uint64) {
            return Err(EncodeError::OutOfRangeUint64 {
                field: field.to_string(),
                value: raw.to_string(),
            });
        }
        return Err(EncodeError::OutOfRange {
            field: field.to_string(),
            value: raw.to_string(),
            kind: kind.name().to_string(),
        });
    }
    Ok(raw)
}

/// Same integrality/range check used for `int32` validation outside the
/// scalar table — the enum field path treats bare numeric values as int32.
pub(crate) fn require_int32(field: &str, value: &Value) -> Result<i32, EncodeError> {
    require_int(Scalar::Int32, field, value, I32_MIN, I32_MAX).map(|v| v as i32)
}

fn require_float(field: &str, value: &Value) -> Result<f64, EncodeError> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(type_mismatch(field, "float", other)),
    }
}

fn encode_len_checked(field: &str, bytes: &[u8]) -> Result<Vec<u8>, EncodeError> {
    if bytes.len() as u64 > MAX_LEN_BYTES {
        return Err(EncodeError::TooLong);
    }
    let _ = field;
    Ok(wire::encode_len(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_round_trips() {
        for (name, kind) in ALL {
            assert_eq!(Scalar::from_name(name), Some(*kind));
            assert_eq!(kind.name(), *name);
        }
        assert_eq!(Scalar::from_name("MyMessage"), None);
    }

    #[test]
    fn int32_zero() {
        assert_eq!(Scalar::Int32.encode(1, "val", &Value::Number(0.0)).unwrap(), vec![0x08, 0x00]);
    }

    #[test]
    fn int32_positive() {
        assert_eq!(
            Scalar::Int32.encode(1, "val", &Value::Number(1540.0)).unwrap(),
            vec![0x08, 0x84, 0x0c]
        );
    }

    #[test]
    fn int32_negative_emits_ten_byte_varint() {
        assert_eq!(
            Scalar::Int32.encode(1, "val", &Value::Number(-2.0)).unwrap(),
            vec![0x08, 0xfe, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01]
        );
    }

    #[test]
    fn int32_rejects_non_integer_number() {
        let err = Scalar::Int32.encode(1, "val", &Value::Number(1.5)).unwrap_err();
        assert_eq!(
            err,
            EncodeError::NotIntegerNumber {
                field: "val".to_string(),
                value: 1.5
            }
        );
    }

    #[test]
    fn int32_rejects_out_of_range() {
        let err = Scalar::Int32
            .encode(1, "val", &Value::Number(2147483648.0))
            .unwrap_err();
        assert_eq!(
            err,
            EncodeError::OutOfRange {
                field: "val".to_string(),
                value: "2147483648".to_string(),
                kind: "int32".to_string(),
            }
        );
    }

    #[test]
    fn sint32_zigzag() {
        assert_eq!(
            Scalar::Sint32.encode(1, "val", &Value::Number(-770.0)).unwrap(),
            vec![0x08, 0x83, 0x0c]
        );
    }

    #[test]
    fn bool_true_and_false() {
        assert_eq!(Scalar::Bool.encode(1, "val", &Value::Bool(true)).unwrap(), vec![0x08, 0x01]);
        assert_eq!(Scalar::Bool.encode(1, "val", &Value::Bool(false)).unwrap(), vec![0x08, 0x00]);
    }

    #[test]
    fn float_half() {
        assert_eq!(
            Scalar::Float.encode(1, "val", &Value::Number(0.5)).unwrap(),
            vec![0x0d, 0x00, 0x00, 0x00, 0x3f]
        );
    }

    #[test]
    fn double_half() {
        assert_eq!(
            Scalar::Double.encode(1, "val", &Value::Number(0.5)).unwrap(),
            vec![0x09, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xe0, 0x3f]
        );
    }

    #[test]
    fn double_rejects_actual_infinity() {
        let err = Scalar::Double.encode(1, "val", &Value::Number(f64::INFINITY)).unwrap_err();
        assert_eq!(
            err,
            EncodeError::Infinite {
                field: "val".to_string(),
                kind: "double".to_string(),
            }
        );
    }

    #[test]
    fn float_rejects_actual_infinity() {
        let err = Scalar::Float.encode(1, "val", &Value::Number(f64::NEG_INFINITY)).unwrap_err();
        assert_eq!(
            err,
            EncodeError::Infinite {
                field: "val".to_string(),
                kind: "float".to_string(),
            }
        );
    }

    #[test]
    fn fixed64_ten() {
        assert_eq!(
            Scalar::Fixed64.encode(1, "val", &Value::Number(10.0)).unwrap(),
            vec![0x09, 0x0a, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn wide_integer_is_accepted_same_as_number() {
        assert_eq!(
            Scalar::Int64.encode(1, "val", &Value::wide_i64(1540)).unwrap(),
            Scalar::Int64.encode(1, "val", &Value::Number(1540.0)).unwrap()
        );
    }

    #[test]
    fn uint64_unsigned_wide_skips_lower_bound_check() {
        assert!(Scalar::Uint64.encode(1, "val", &Value::wide_u64(u64::MAX)).is_ok());
    }

    #[test]
    fn uint64_overflow_reports_uint_64() {
        let err = Scalar::Uint64.encode(1, "val", &Value::Number(-1.0)).unwrap_err();
        assert_eq!(
            err,
            EncodeError::OutOfRangeUint64 {
                field: "val".to_string(),
                value: "-1".to_string(),
            }
        );
    }

    #[test]
    fn float_rejects_wide_integer() {
        let err = Scalar::Float.encode(1, "val", &Value::wide_i64(1)).unwrap_err();
        assert!(matches!(err, EncodeError::TypeMismatch { .. }));
    }

    #[test]
    fn string_and_bytes_are_not_packed() {
        assert!(!Scalar::String.is_packed());
        assert!(!Scalar::Bytes.is_packed());
        assert!(Scalar::Int32.is_packed());
        assert!(Scalar::Bool.is_packed());
    }

    #[test]
    fn string_encodes_as_len() {
        assert_eq!(
            Scalar::String.encode(1, "val", &Value::Text("fuz".to_string())).unwrap(),
            vec![0x0a, 0x03, b'f', b'u', b'z']
        );
    }
}
