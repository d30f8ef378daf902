//! Value encoding/decoding for the container wire format.
//!
//! Every value is `[kind:1][name_len:u32][name][payload_len:u32][payload]`,
//! little-endian. Composite payloads are `[count:u32]` followed by `count`
//! complete child encodings.

use crate::codec::primitives::{Reader, Writer};
use crate::error::DecodeError;
use crate::limits::{
    COMPOSITE_COUNT_LEN, MAX_CHILDREN, MAX_NAME_LEN, MAX_NESTING_DEPTH, MAX_PAYLOAD_LEN,
    MIN_VALUE_LEN,
};
use crate::model::{Array, Container, Payload, Value, ValueKind};

// =============================================================================
// OPTIONS
// =============================================================================

/// Limits applied while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum composite nesting depth. A top-level value is at depth 0.
    ///
    /// Decoding recurses once per level, so very large values trade the
    /// `NestingTooDeep` error for stack usage.
    pub max_depth: usize,
    /// Maximum name length in bytes.
    pub max_name_len: usize,
    /// Maximum payload length of any single value.
    pub max_payload_len: usize,
    /// Maximum declared child count of a composite.
    pub max_children: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_NESTING_DEPTH,
            max_name_len: MAX_NAME_LEN,
            max_payload_len: MAX_PAYLOAD_LEN,
            max_children: MAX_CHILDREN,
        }
    }
}

impl DecodeOptions {
    /// Creates options with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_name_len(mut self, max_name_len: usize) -> Self {
        self.max_name_len = max_name_len;
        self
    }

    pub fn with_max_payload_len(mut self, max_payload_len: usize) -> Self {
        self.max_payload_len = max_payload_len;
        self
    }

    pub fn with_max_children(mut self, max_children: usize) -> Self {
        self.max_children = max_children;
        self
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes one value from the front of `bytes` with default limits.
///
/// Returns the value and the number of bytes it occupied. Bytes after the
/// value are left alone, so siblings can be decoded by advancing the slice.
pub fn decode_value(bytes: &[u8]) -> Result<(Value, usize), DecodeError> {
    decode_value_with_options(bytes, &DecodeOptions::default())
}

/// Decodes one value from the front of `bytes` with explicit limits.
pub fn decode_value_with_options(
    bytes: &[u8],
    options: &DecodeOptions,
) -> Result<(Value, usize), DecodeError> {
    let mut reader = Reader::new(bytes);
    match read_value(&mut reader, options) {
        Ok(value) => Ok((value, reader.position())),
        Err(error) => {
            tracing::debug!(%error, input_len = bytes.len(), "rejected value encoding");
            Err(error)
        }
    }
}

/// Decodes a run of sibling values filling all of `bytes`.
pub fn decode_values(bytes: &[u8]) -> Result<Vec<Value>, DecodeError> {
    decode_values_with_options(bytes, &DecodeOptions::default())
}

/// Decodes a run of sibling values filling all of `bytes` with explicit limits.
pub fn decode_values_with_options(
    bytes: &[u8],
    options: &DecodeOptions,
) -> Result<Vec<Value>, DecodeError> {
    let mut values = Vec::with_capacity(bytes.len() / MIN_VALUE_LEN);
    let mut rest = bytes;
    while !rest.is_empty() {
        let (value, consumed) = decode_value_with_options(rest, options)?;
        values.push(value);
        rest = &rest[consumed..];
    }
    Ok(values)
}

/// Reads one top-level value from the reader.
pub fn read_value(reader: &mut Reader<'_>, options: &DecodeOptions) -> Result<Value, DecodeError> {
    read_value_at(reader, options, 0)
}

fn read_value_at(
    reader: &mut Reader<'_>,
    options: &DecodeOptions,
    depth: usize,
) -> Result<Value, DecodeError> {
    if depth > options.max_depth {
        return Err(DecodeError::NestingTooDeep {
            max: options.max_depth,
        });
    }

    let kind = ValueKind::from_wire_code(reader.read_byte("kind")?)?;

    let name_len = reader.read_len(options.max_name_len, "name length")?;
    if name_len > reader.remaining_len() {
        return Err(DecodeError::TruncatedName {
            declared: name_len,
            available: reader.remaining_len(),
        });
    }
    let name = reader.read_str(name_len, "name")?;

    read_body(reader, kind, name, options, depth)
}

/// Reads `[kind:1][payload_len:u32][payload]` and names the value `name`.
///
/// This is the per-entry value form of the keyed store, which keeps the name
/// in the entry key instead.
pub(crate) fn read_unnamed_value(
    reader: &mut Reader<'_>,
    name: impl Into<String>,
    options: &DecodeOptions,
) -> Result<Value, DecodeError> {
    let kind = ValueKind::from_wire_code(reader.read_byte("kind")?)?;
    read_body(reader, kind, name, options, 0)
}

/// Reads the payload length and payload that follow a value's kind and name.
fn read_body(
    reader: &mut Reader<'_>,
    kind: ValueKind,
    name: impl Into<String>,
    options: &DecodeOptions,
    depth: usize,
) -> Result<Value, DecodeError> {
    let payload_len = reader.read_len(options.max_payload_len, "payload length")?;
    if let Some(expected) = kind.fixed_width() {
        if payload_len != expected {
            return Err(DecodeError::PayloadSizeMismatch {
                kind,
                expected,
                actual: payload_len,
            });
        }
    }
    if payload_len > reader.remaining_len() {
        return Err(DecodeError::TruncatedPayload {
            declared: payload_len,
            available: reader.remaining_len(),
        });
    }
    let payload = reader.read_bytes(payload_len, "payload")?;

    let payload = decode_payload(kind, payload, options, depth)?;
    Ok(Value::new(name, payload))
}

/// Decodes a payload whose length has already been validated for `kind`.
fn decode_payload(
    kind: ValueKind,
    payload: &[u8],
    options: &DecodeOptions,
    depth: usize,
) -> Result<Payload, DecodeError> {
    let mut reader = Reader::new(payload);
    let decoded = match kind {
        ValueKind::Null => Payload::Null,
        ValueKind::Bool => {
            let byte = reader.read_byte("bool")?;
            match byte {
                0x00 => Payload::Bool(false),
                0x01 => Payload::Bool(true),
                _ => return Err(DecodeError::InvalidBool { value: byte }),
            }
        }
        ValueKind::Int16 => Payload::Int16(i16::from_le_bytes(reader.read_array("int16")?)),
        ValueKind::UInt16 => Payload::UInt16(reader.read_u16_le("uint16")?),
        ValueKind::Int32 => Payload::Int32(i32::from_le_bytes(reader.read_array("int32")?)),
        ValueKind::UInt32 => Payload::UInt32(reader.read_u32_le("uint32")?),
        ValueKind::Long => Payload::Long(i32::from_le_bytes(reader.read_array("long")?)),
        ValueKind::ULong => Payload::ULong(reader.read_u32_le("ulong")?),
        ValueKind::Int64 => Payload::Int64(i64::from_le_bytes(reader.read_array("int64")?)),
        ValueKind::UInt64 => Payload::UInt64(reader.read_u64_le("uint64")?),
        ValueKind::Float32 => Payload::Float32(f32::from_le_bytes(reader.read_array("float32")?)),
        ValueKind::Float64 => Payload::Float64(f64::from_le_bytes(reader.read_array("float64")?)),
        ValueKind::Bytes => Payload::Bytes(payload.to_vec()),
        ValueKind::String => {
            let s = std::str::from_utf8(payload)
                .map_err(|_| DecodeError::InvalidUtf8 { field: "string" })?;
            Payload::String(s.to_string())
        }
        ValueKind::Container => {
            Payload::Container(Container::from(decode_children(kind, payload, options, depth)?))
        }
        ValueKind::Array => {
            Payload::Array(Array::from(decode_children(kind, payload, options, depth)?))
        }
    };
    Ok(decoded)
}

/// Decodes a composite payload: a count followed by exactly that many children.
///
/// The payload slice is already fully in memory, so running out of bytes
/// here means the composite is corrupt, not that the input was truncated.
fn decode_children(
    kind: ValueKind,
    payload: &[u8],
    options: &DecodeOptions,
    depth: usize,
) -> Result<Vec<Value>, DecodeError> {
    if payload.len() < COMPOSITE_COUNT_LEN {
        return Err(DecodeError::CorruptComposite {
            kind,
            declared: 0,
            decoded: 0,
            trailing: payload.len(),
        });
    }

    let mut reader = Reader::new(payload);
    let count = reader.read_len(options.max_children, "child count")?;

    // Each child needs at least a full header, so the remaining bytes bound
    // how many can really be present.
    let mut children = Vec::with_capacity(count.min(reader.remaining_len() / MIN_VALUE_LEN));
    for decoded in 0..count {
        let corrupt = |trailing| DecodeError::CorruptComposite {
            kind,
            declared: count,
            decoded,
            trailing,
        };
        if reader.is_empty() {
            return Err(corrupt(0));
        }
        let trailing = reader.remaining_len();
        let child = read_value_at(&mut reader, options, depth + 1).map_err(|e| {
            if e.is_truncation() { corrupt(trailing) } else { e }
        })?;
        children.push(child);
    }

    if !reader.is_empty() {
        return Err(DecodeError::CorruptComposite {
            kind,
            declared: count,
            decoded: count,
            trailing: reader.remaining_len(),
        });
    }
    Ok(children)
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a value to a new buffer.
///
/// Encoding cannot fail: every constructible value has exactly one encoding.
/// Names and payloads longer than `u32::MAX` bytes are not representable.
pub fn encode_value(value: &Value) -> Vec<u8> {
    let len = value.encoded_len();
    let mut writer = Writer::with_capacity(len);
    encode_value_into(&mut writer, value);
    tracing::trace!(kind = %value.kind(), len, "encoded value");
    writer.into_bytes()
}

/// Appends the encoding of `value` to the writer.
pub fn encode_value_into(writer: &mut Writer, value: &Value) {
    writer.write_byte(value.kind().code());
    writer.write_string(value.name());
    write_body(writer, value);
}

/// Appends `[kind:1][payload_len:u32][payload]`, leaving the name out.
pub(crate) fn encode_unnamed_value_into(writer: &mut Writer, value: &Value) {
    writer.write_byte(value.kind().code());
    write_body(writer, value);
}

fn write_body(writer: &mut Writer, value: &Value) {
    writer.write_len(value.payload_len());
    match value.payload() {
        Payload::Null => {}
        Payload::Bool(v) => writer.write_byte(u8::from(*v)),
        Payload::Int16(v) => writer.write_bytes(&v.to_le_bytes()),
        Payload::UInt16(v) => writer.write_u16_le(*v),
        Payload::Int32(v) | Payload::Long(v) => writer.write_bytes(&v.to_le_bytes()),
        Payload::UInt32(v) | Payload::ULong(v) => writer.write_u32_le(*v),
        Payload::Int64(v) => writer.write_bytes(&v.to_le_bytes()),
        Payload::UInt64(v) => writer.write_u64_le(*v),
        Payload::Float32(v) => writer.write_bytes(&v.to_le_bytes()),
        Payload::Float64(v) => writer.write_bytes(&v.to_le_bytes()),
        Payload::Bytes(b) => writer.write_bytes(b),
        Payload::String(s) => writer.write_bytes(s.as_bytes()),
        Payload::Container(c) => encode_children(writer, c.children()),
        Payload::Array(a) => encode_children(writer, a.elements()),
    }
}

fn encode_children(writer: &mut Writer, children: &[Value]) {
    writer.write_len(children.len());
    for child in children {
        encode_value_into(writer, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValueError;

    fn roundtrip(value: &Value) -> Value {
        let bytes = encode_value(value);
        let (decoded, consumed) = decode_value(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        decoded
    }

    /// Offset of the composite count inside an encoding whose top-level name is `name`.
    fn count_offset(name: &str) -> usize {
        1 + 4 + name.len() + 4
    }

    #[test]
    fn test_int32_layout() {
        let bytes = encode_value(&Value::int32("age", 30));
        assert_eq!(
            bytes,
            [4, 3, 0, 0, 0, b'a', b'g', b'e', 4, 0, 0, 0, 30, 0, 0, 0]
        );
    }

    #[test]
    fn test_known_peer_bytes() {
        let bytes = [0x01, 0x04, 0, 0, 0, b'b', b'o', b'o', b'l', 0x01, 0, 0, 0, 0x01];
        let (value, consumed) = decode_value(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(value, Value::bool("bool", true));
        assert_eq!(encode_value(&value), bytes);
    }

    #[test]
    fn test_array_layout() {
        let value = Value::array("t", [Value::string("", "x")]);
        let bytes = encode_value(&value);
        #[rustfmt::skip]
        let expected = [
            15, 1, 0, 0, 0, b't', 14, 0, 0, 0,
            1, 0, 0, 0,
            13, 0, 0, 0, 0, 1, 0, 0, 0, b'x',
        ];
        assert_eq!(bytes, expected);
        assert_eq!(bytes.len(), value.encoded_len());
    }

    #[test]
    fn test_scalar_edge_values_roundtrip() {
        let values = [
            Value::null(""),
            Value::bool("b", true),
            Value::bool("b", false),
            Value::int16("i16", i16::MIN),
            Value::int16("i16", i16::MAX),
            Value::uint16("u16", u16::MAX),
            Value::int32("i32", i32::MIN),
            Value::int32("i32", 0),
            Value::uint32("u32", u32::MAX),
            Value::int64("i64", i64::MIN),
            Value::int64("i64", i64::MAX),
            Value::uint64("u64", u64::MAX),
            Value::float32("f32", f32::MIN_POSITIVE),
            Value::float32("f32", f32::NEG_INFINITY),
            Value::float64("f64", f64::MAX),
            Value::float64("f64", f64::NAN),
            Value::bytes("bytes", Vec::new()),
            Value::bytes("bytes", vec![0, 255, 7]),
            Value::string("s", ""),
            Value::string("s", "unicode: \u{1F600}"),
            Value::container("c", []),
            Value::array("a", []),
        ];
        for value in values {
            assert_eq!(roundtrip(&value), value, "failed for {value:?}");
        }
    }

    #[test]
    fn test_long_boundaries_roundtrip_as_four_bytes() {
        let max = Value::long("l", i32::MAX as i64).unwrap();
        let bytes = encode_value(&max);
        assert_eq!(bytes.len(), 9 + 1 + 4);
        assert_eq!(&bytes[10..], &i32::MAX.to_le_bytes());
        assert_eq!(roundtrip(&max).to_i64(), Ok(i32::MAX as i64));

        let umax = Value::ulong("u", u32::MAX as u64).unwrap();
        assert_eq!(encode_value(&umax).len(), 14);
        assert_eq!(roundtrip(&umax).to_u64(), Ok(u32::MAX as u64));

        assert!(matches!(
            Value::long("l", i32::MAX as i64 + 1),
            Err(ValueError::OutOfRange { .. })
        ));
        assert!(matches!(
            Value::ulong("u", u32::MAX as u64 + 1),
            Err(ValueError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_user_scenario() {
        let user = Value::container(
            "user",
            [
                Value::string("name", "Alice"),
                Value::int32("age", 30),
                Value::array("tags", [Value::string("", "x"), Value::string("", "y")]),
            ],
        );

        let bytes = encode_value(&user);
        let (restored, consumed) = decode_value(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());

        assert_eq!(restored.name(), "user");
        assert_eq!(restored.kind(), ValueKind::Container);
        assert_eq!(
            restored.get_child("name", 0).and_then(Value::as_str),
            Some("Alice")
        );
        assert_eq!(
            restored.get_child("age", 0).map(Value::to_i32),
            Some(Ok(30))
        );
        let tags = restored
            .get_child("tags", 0)
            .and_then(Value::as_array)
            .unwrap();
        assert_eq!(tags.count(), 2);
        let tags: Vec<_> = tags.iter().filter_map(Value::as_str).collect();
        assert_eq!(tags, ["x", "y"]);
        assert_eq!(restored, user);
    }

    #[test]
    fn test_idempotent_encode() {
        let value = Value::container("c", [Value::float64("pi", 3.14159), Value::bytes("b", [1u8, 2])]);
        assert_eq!(encode_value(&value), encode_value(&value));
    }

    #[test]
    fn test_unknown_kind() {
        assert_eq!(decode_value(&[16]), Err(DecodeError::UnknownKind { code: 16 }));
        assert_eq!(
            decode_value(&[0xFF, 0, 0, 0, 0, 0, 0, 0, 0]),
            Err(DecodeError::UnknownKind { code: 0xFF })
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            decode_value(&[]),
            Err(DecodeError::UnexpectedEndOfData { context: "kind" })
        );
    }

    #[test]
    fn test_truncated_name() {
        // name_len = 10, only 2 name bytes present
        let bytes = [13, 10, 0, 0, 0, b'a', b'b'];
        assert_eq!(
            decode_value(&bytes),
            Err(DecodeError::TruncatedName {
                declared: 10,
                available: 2
            })
        );
    }

    #[test]
    fn test_huge_name_len_hits_limit() {
        let bytes = [13, 0xFF, 0xFF, 0xFF, 0xFF];
        assert!(matches!(
            decode_value(&bytes),
            Err(DecodeError::LengthExceedsLimit { field: "name length", .. })
        ));

        let options = DecodeOptions::new().with_max_name_len(usize::MAX);
        assert!(matches!(
            decode_value_with_options(&bytes, &options),
            Err(DecodeError::TruncatedName { declared: 0xFFFF_FFFF, available: 0 })
        ));
    }

    #[test]
    fn test_payload_size_mismatch() {
        // Int64 declaring a 4-byte payload
        let bytes = [8, 0, 0, 0, 0, 4, 0, 0, 0, 1, 2, 3, 4];
        assert_eq!(
            decode_value(&bytes),
            Err(DecodeError::PayloadSizeMismatch {
                kind: ValueKind::Int64,
                expected: 8,
                actual: 4
            })
        );

        // Null with a payload
        let bytes = [0, 0, 0, 0, 0, 1, 0, 0, 0, 0];
        assert!(matches!(
            decode_value(&bytes),
            Err(DecodeError::PayloadSizeMismatch { kind: ValueKind::Null, .. })
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let mut bytes = encode_value(&Value::string("s", "hello"));
        bytes.truncate(bytes.len() - 2);
        assert_eq!(
            decode_value(&bytes),
            Err(DecodeError::TruncatedPayload {
                declared: 5,
                available: 3
            })
        );
    }

    #[test]
    fn test_invalid_bool() {
        let bytes = [1, 0, 0, 0, 0, 1, 0, 0, 0, 2];
        assert_eq!(decode_value(&bytes), Err(DecodeError::InvalidBool { value: 2 }));
    }

    #[test]
    fn test_invalid_utf8() {
        let bytes = [13, 0, 0, 0, 0, 2, 0, 0, 0, 0xC3, 0x28];
        assert_eq!(
            decode_value(&bytes),
            Err(DecodeError::InvalidUtf8 { field: "string" })
        );

        let bytes = [0, 1, 0, 0, 0, 0xFF, 0, 0, 0, 0];
        assert_eq!(
            decode_value(&bytes),
            Err(DecodeError::InvalidUtf8 { field: "name" })
        );
    }

    #[test]
    fn test_array_count_exceeds_elements() {
        let value = Value::array("tags", [Value::string("", "x"), Value::string("", "y")]);
        let mut bytes = encode_value(&value);
        let at = count_offset("tags");
        bytes[at..at + 4].copy_from_slice(&3u32.to_le_bytes());

        assert_eq!(
            decode_value(&bytes),
            Err(DecodeError::CorruptComposite {
                kind: ValueKind::Array,
                declared: 3,
                decoded: 2,
                trailing: 0
            })
        );
    }

    #[test]
    fn test_composite_trailing_bytes() {
        let value = Value::container("c", [Value::int32("a", 1), Value::int32("b", 2)]);
        let mut bytes = encode_value(&value);
        let at = count_offset("c");
        bytes[at..at + 4].copy_from_slice(&1u32.to_le_bytes());

        assert_eq!(
            decode_value(&bytes),
            Err(DecodeError::CorruptComposite {
                kind: ValueKind::Container,
                declared: 1,
                decoded: 1,
                trailing: Value::int32("b", 2).encoded_len()
            })
        );
    }

    #[test]
    fn test_composite_partial_child_is_corrupt() {
        // Array payload: count 1, then 3 stray bytes that cannot form a value
        let bytes = [15, 0, 0, 0, 0, 7, 0, 0, 0, 1, 0, 0, 0, 13, 0, 0];
        assert_eq!(
            decode_value(&bytes),
            Err(DecodeError::CorruptComposite {
                kind: ValueKind::Array,
                declared: 1,
                decoded: 0,
                trailing: 3
            })
        );
    }

    #[test]
    fn test_composite_payload_too_short_for_count() {
        let bytes = [14, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0];
        assert!(matches!(
            decode_value(&bytes),
            Err(DecodeError::CorruptComposite { kind: ValueKind::Container, .. })
        ));
    }

    #[test]
    fn test_huge_child_count() {
        let mut bytes = vec![15, 0, 0, 0, 0, 4, 0, 0, 0];
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            decode_value(&bytes),
            Err(DecodeError::LengthExceedsLimit { field: "child count", .. })
        ));

        // Within the limit but with nothing behind it: no large allocation, just corrupt.
        let mut bytes = vec![15, 0, 0, 0, 0, 4, 0, 0, 0];
        bytes.extend_from_slice(&(MAX_CHILDREN as u32).to_le_bytes());
        assert!(matches!(
            decode_value(&bytes),
            Err(DecodeError::CorruptComposite { decoded: 0, .. })
        ));
    }

    #[test]
    fn test_nesting_too_deep() {
        let mut value = Value::null("leaf");
        for _ in 0..70 {
            value = Value::container("n", [value]);
        }
        let bytes = encode_value(&value);
        assert_eq!(
            decode_value(&bytes),
            Err(DecodeError::NestingTooDeep { max: MAX_NESTING_DEPTH })
        );

        let options = DecodeOptions::new().with_max_depth(70);
        assert_eq!(decode_value_with_options(&bytes, &options).map(|(v, _)| v), Ok(value));
    }

    #[test]
    fn test_depth_limit_is_inclusive() {
        // root at depth 0, leaf at depth 2
        let value = Value::array("a", [Value::array("b", [Value::null("c")])]);
        let bytes = encode_value(&value);
        assert!(decode_value_with_options(&bytes, &DecodeOptions::new().with_max_depth(2)).is_ok());
        assert_eq!(
            decode_value_with_options(&bytes, &DecodeOptions::new().with_max_depth(1)),
            Err(DecodeError::NestingTooDeep { max: 1 })
        );
    }

    #[test]
    fn test_payload_limit() {
        let bytes = encode_value(&Value::bytes("b", vec![0u8; 32]));
        let options = DecodeOptions::new().with_max_payload_len(16);
        assert_eq!(
            decode_value_with_options(&bytes, &options),
            Err(DecodeError::LengthExceedsLimit {
                field: "payload length",
                len: 32,
                max: 16
            })
        );
    }

    #[test]
    fn test_decode_siblings() {
        let a = Value::int16("a", -1);
        let b = Value::string("b", "two");
        let mut bytes = encode_value(&a);
        bytes.extend(encode_value(&b));

        let (first, used) = decode_value(&bytes).unwrap();
        assert_eq!(first, a);
        let (second, rest) = decode_value(&bytes[used..]).unwrap();
        assert_eq!(second, b);
        assert_eq!(used + rest, bytes.len());

        assert_eq!(decode_values(&bytes), Ok(vec![a, b]));
        assert_eq!(decode_values(&[]), Ok(vec![]));
    }

    #[test]
    fn test_encode_into_appends() {
        let mut writer = Writer::new();
        writer.write_byte(0xAA);
        encode_value_into(&mut writer, &Value::null("n"));
        assert_eq!(writer.len(), 1 + Value::null("n").encoded_len());
        assert_eq!(writer.as_bytes()[0], 0xAA);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_name() -> impl Strategy<Value = String> {
        "\\PC{0,8}"
    }

    fn arb_integer() -> impl Strategy<Value = Value> {
        prop_oneof![
            (arb_name(), any::<i16>()).prop_map(|(n, v)| Value::int16(n, v)),
            (arb_name(), any::<u16>()).prop_map(|(n, v)| Value::uint16(n, v)),
            (arb_name(), any::<i32>()).prop_map(|(n, v)| Value::int32(n, v)),
            (arb_name(), any::<u32>()).prop_map(|(n, v)| Value::uint32(n, v)),
            (arb_name(), any::<i32>()).prop_map(|(n, v)| Value::new(n, Payload::Long(v))),
            (arb_name(), any::<u32>()).prop_map(|(n, v)| Value::new(n, Payload::ULong(v))),
            (arb_name(), any::<i64>()).prop_map(|(n, v)| Value::int64(n, v)),
            (arb_name(), any::<u64>()).prop_map(|(n, v)| Value::uint64(n, v)),
        ]
    }

    fn arb_scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            arb_integer(),
            arb_name().prop_map(|n| Value::null(n)),
            (arb_name(), any::<bool>()).prop_map(|(n, v)| Value::bool(n, v)),
            (arb_name(), any::<f32>()).prop_map(|(n, v)| Value::float32(n, v)),
            (arb_name(), any::<f64>()).prop_map(|(n, v)| Value::float64(n, v)),
            (arb_name(), prop::collection::vec(any::<u8>(), 0..32))
                .prop_map(|(n, v)| Value::bytes(n, v)),
            (arb_name(), "\\PC{0,16}").prop_map(|(n, v)| Value::string(n, v)),
        ]
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        arb_scalar().prop_recursive(5, 128, 8, |inner| {
            prop_oneof![
                (arb_name(), prop::collection::vec(inner.clone(), 0..8))
                    .prop_map(|(n, c)| Value::container(n, c)),
                (arb_name(), prop::collection::vec(inner, 0..8))
                    .prop_map(|(n, c)| Value::array(n, c)),
            ]
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_roundtrip(value in arb_value()) {
            let bytes = encode_value(&value);
            prop_assert_eq!(bytes.len(), value.encoded_len());
            prop_assert_eq!(decode_value(&bytes), Ok((value, bytes.len())));
        }

        #[test]
        fn prop_prefix_is_truncation(value in arb_value()) {
            let bytes = encode_value(&value);
            for k in 0..bytes.len() {
                let err = decode_value(&bytes[..k]).unwrap_err();
                prop_assert!(err.is_truncation(), "prefix {} gave {:?}", k, err);
            }
        }

        #[test]
        fn prop_encode_is_idempotent(value in arb_value()) {
            prop_assert_eq!(encode_value(&value), encode_value(&value.clone()));
        }

        #[test]
        fn prop_arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
            if let Ok((value, consumed)) = decode_value(&bytes) {
                prop_assert!(consumed <= bytes.len());
                prop_assert_eq!(encode_value(&value), &bytes[..consumed]);
            }
        }
    }
}
