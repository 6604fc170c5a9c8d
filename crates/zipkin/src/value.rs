use crossstitch_spanparser::AnnotationType;
use serde::Serialize;

use crate::error::DecodeError;

/// A decoded binary-annotation value.
///
/// Serializes to the plain JSON scalar; `Hex` is a lowercase hex string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    I16(i16),
    I32(i32),
    I64(i64),
    Double(f64),
    String(String),
    Hex(String),
}

/// Decode the raw bytes of a binary annotation according to its type.
///
/// Fixed-width types fail with [`DecodeError::Width`] when fewer bytes
/// than the type's width are present; extra trailing bytes are ignored.
/// `BYTES` and unknown types render as hex and never fail.
///
/// `BOOL` is true for any nonzero first byte.
pub fn decode_value(annotation_type: AnnotationType, bytes: &[u8]) -> Result<Value, DecodeError> {
    let value = match annotation_type {
        AnnotationType::Bool => {
            let [b] = leading::<1>(annotation_type, bytes)?;
            Value::Bool(b != 0)
        }
        AnnotationType::I16 => Value::I16(i16::from_be_bytes(leading(annotation_type, bytes)?)),
        AnnotationType::I32 => Value::I32(i32::from_be_bytes(leading(annotation_type, bytes)?)),
        AnnotationType::I64 => Value::I64(i64::from_be_bytes(leading(annotation_type, bytes)?)),
        AnnotationType::Double => {
            Value::Double(f64::from_be_bytes(leading(annotation_type, bytes)?))
        }
        AnnotationType::String => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        AnnotationType::Bytes | AnnotationType::Unknown(_) => Value::Hex(hex::encode(bytes)),
    };
    Ok(value)
}

fn leading<const N: usize>(
    annotation_type: AnnotationType,
    bytes: &[u8],
) -> Result<[u8; N], DecodeError> {
    bytes
        .get(..N)
        .and_then(|b| b.try_into().ok())
        .ok_or(DecodeError::Width {
            annotation_type,
            expected: N,
            actual: bytes.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    #[test]
    fn test_bool() {
        assert_eq!(
            decode_value(AnnotationType::Bool, &[0]).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            decode_value(AnnotationType::Bool, &[1]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            decode_value(AnnotationType::Bool, &[0x30]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_signed_integers() {
        assert_eq!(
            decode_value(AnnotationType::I16, &[0xFF, 0xFE]).unwrap(),
            Value::I16(-2)
        );
        assert_eq!(
            decode_value(AnnotationType::I16, &[0x7F, 0xFF]).unwrap(),
            Value::I16(i16::MAX)
        );
        assert_eq!(
            decode_value(AnnotationType::I32, &[0xFF; 4]).unwrap(),
            Value::I32(-1)
        );
        assert_eq!(
            decode_value(AnnotationType::I64, &[0xFF; 8]).unwrap(),
            Value::I64(-1)
        );
        assert_eq!(
            decode_value(AnnotationType::I64, &[0, 0, 0, 1, 0, 0, 0, 2]).unwrap(),
            Value::I64((1 << 32) | 2)
        );
    }

    #[test]
    fn test_double() {
        let bytes = 2.5f64.to_be_bytes();
        assert_eq!(
            decode_value(AnnotationType::Double, &bytes).unwrap(),
            Value::Double(2.5)
        );
    }

    #[test]
    fn test_string() {
        assert_eq!(
            decode_value(AnnotationType::String, b"/index").unwrap(),
            Value::String("/index".to_string())
        );
        assert_eq!(
            decode_value(AnnotationType::String, b"").unwrap(),
            Value::String(String::new())
        );
    }

    #[test]
    fn test_hex_fallback() {
        assert_eq!(
            decode_value(AnnotationType::Bytes, &[0xDE, 0xAD]).unwrap(),
            Value::Hex("dead".to_string())
        );
        assert_eq!(
            decode_value(AnnotationType::Unknown(99), &[0xDE, 0xAD]).unwrap(),
            Value::Hex("dead".to_string())
        );
        assert_eq!(
            decode_value(AnnotationType::Unknown(-1), &[]).unwrap(),
            Value::Hex(String::new())
        );
    }

    #[test]
    fn test_short_payloads_fail() {
        assert_matches!(
            decode_value(AnnotationType::Bool, &[]),
            Err(DecodeError::Width {
                expected: 1,
                actual: 0,
                ..
            })
        );
        assert_matches!(
            decode_value(AnnotationType::I16, &[0x01]),
            Err(DecodeError::Width {
                expected: 2,
                actual: 1,
                ..
            })
        );
        assert_matches!(
            decode_value(AnnotationType::I32, &[0xFF; 3]),
            Err(DecodeError::Width {
                annotation_type: AnnotationType::I32,
                expected: 4,
                actual: 3
            })
        );
        assert_matches!(
            decode_value(AnnotationType::I64, &[0xFF; 7]),
            Err(DecodeError::Width { expected: 8, .. })
        );
        assert_matches!(
            decode_value(AnnotationType::Double, &[0; 4]),
            Err(DecodeError::Width { expected: 8, .. })
        );
    }

    #[test]
    fn test_long_payload_reads_leading_bytes() {
        assert_eq!(
            decode_value(AnnotationType::I16, &[0x00, 0x05, 0xAA]).unwrap(),
            Value::I16(5)
        );
    }

    #[test]
    fn test_serialized_form() {
        let values = vec![
            Value::Bool(true),
            Value::I32(-7),
            Value::Double(0.5),
            Value::Hex("beef".to_string()),
        ];
        assert_eq!(
            serde_json::to_value(&values).unwrap(),
            serde_json::json!([true, -7, 0.5, "beef"])
        );
    }

    proptest! {
        #[test]
        fn test_i32_reinterpretation(v in any::<i32>()) {
            prop_assert_eq!(
                decode_value(AnnotationType::I32, &v.to_be_bytes()).unwrap(),
                Value::I32(v)
            );
        }

        #[test]
        fn test_i64_reinterpretation(v in any::<i64>()) {
            prop_assert_eq!(
                decode_value(AnnotationType::I64, &v.to_be_bytes()).unwrap(),
                Value::I64(v)
            );
        }
    }
}
