//! Binary forms of the message envelope and the keyed store.
//!
//! A message is a `header` container of six strings followed by the
//! message's values, back to back. A store is a version byte, an entry
//! count, and entries in ascending key order:
//!
//! ```text
//! [version:1][count:u32]{[key_len:u32][key][kind:1][payload_len:u32][payload]}*
//! ```
//!
//! A store entry carries no value name of its own; decoding names each value
//! after its key.

use rustc_hash::FxHashMap;

use crate::codec::primitives::{Reader, Writer};
use crate::codec::value::{
    decode_value_with_options, decode_values_with_options, encode_unnamed_value_into,
    encode_value_into, read_unnamed_value, DecodeOptions,
};
use crate::error::DecodeError;
use crate::limits::{STORE_FORMAT_VERSION, STORE_MIN_ENTRY_LEN};
use crate::model::{Message, MessageHeader, Value, ValueStore};

/// Name of the leading header container.
pub const HEADER_NAME: &str = "header";

const SOURCE_ID: &str = "source_id";
const SOURCE_SUB_ID: &str = "source_sub_id";
const TARGET_ID: &str = "target_id";
const TARGET_SUB_ID: &str = "target_sub_id";
const MESSAGE_TYPE: &str = "message_type";
const VERSION: &str = "version";

// =============================================================================
// MESSAGE
// =============================================================================

fn header_value(header: &MessageHeader) -> Value {
    Value::container(
        HEADER_NAME,
        [
            Value::string(SOURCE_ID, header.source_id.as_str()),
            Value::string(SOURCE_SUB_ID, header.source_sub_id.as_str()),
            Value::string(TARGET_ID, header.target_id.as_str()),
            Value::string(TARGET_SUB_ID, header.target_sub_id.as_str()),
            Value::string(MESSAGE_TYPE, header.message_type.as_str()),
            Value::string(VERSION, header.version.as_str()),
        ],
    )
}

/// Encodes a message: its header container, then each value in order.
pub fn encode_message(message: &Message) -> Vec<u8> {
    let header = header_value(&message.header);
    let len = header.encoded_len() + message.values().iter().map(Value::encoded_len).sum::<usize>();

    let mut writer = Writer::with_capacity(len);
    encode_value_into(&mut writer, &header);
    for value in message.values() {
        encode_value_into(&mut writer, value);
    }
    tracing::trace!(values = message.len(), len, "encoded message");
    writer.into_bytes()
}

/// Decodes a message with default limits.
pub fn decode_message(bytes: &[u8]) -> Result<Message, DecodeError> {
    decode_message_with_options(bytes, &DecodeOptions::default())
}

/// Decodes a message with explicit limits.
pub fn decode_message_with_options(
    bytes: &[u8],
    options: &DecodeOptions,
) -> Result<Message, DecodeError> {
    let (header, consumed) = decode_value_with_options(bytes, options)?;
    let header = header_from_value(&header)?;
    let values = decode_values_with_options(&bytes[consumed..], options)?;
    Ok(Message::from_parts(header, values))
}

fn header_from_value(value: &Value) -> Result<MessageHeader, DecodeError> {
    if value.name() != HEADER_NAME || !value.is_container() {
        return Err(DecodeError::MalformedMessage {
            context: "first value is not a header container",
        });
    }
    let field = |name: &'static str| -> Result<String, DecodeError> {
        value
            .get_child(name, 0)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(DecodeError::MalformedMessage { context: name })
    };
    Ok(MessageHeader {
        source_id: field(SOURCE_ID)?,
        source_sub_id: field(SOURCE_SUB_ID)?,
        target_id: field(TARGET_ID)?,
        target_sub_id: field(TARGET_SUB_ID)?,
        message_type: field(MESSAGE_TYPE)?,
        version: field(VERSION)?,
    })
}

// =============================================================================
// STORE
// =============================================================================

/// Encodes a store with entries in ascending key order.
///
/// Counts as one serialization in the store's statistics.
pub fn encode_store(store: &ValueStore) -> Vec<u8> {
    let entries = store.sorted_entries();
    let len = 1 + 4 + entries
        .iter()
        .map(|(key, value)| 4 + key.len() + 1 + 4 + value.payload_len())
        .sum::<usize>();

    let mut writer = Writer::with_capacity(len);
    writer.write_byte(STORE_FORMAT_VERSION);
    writer.write_len(entries.len());
    for (key, value) in entries {
        writer.write_string(key);
        encode_unnamed_value_into(&mut writer, value);
    }
    store.record_serialization();
    tracing::trace!(entries = store.len(), len, "encoded store");
    writer.into_bytes()
}

/// Decodes a store with default limits.
pub fn decode_store(bytes: &[u8]) -> Result<ValueStore, DecodeError> {
    decode_store_with_options(bytes, &DecodeOptions::default())
}

/// Decodes a store with explicit limits.
///
/// Keys are bounded by `max_name_len` and the entry count by `max_children`.
pub fn decode_store_with_options(
    bytes: &[u8],
    options: &DecodeOptions,
) -> Result<ValueStore, DecodeError> {
    let result = read_store(&mut Reader::new(bytes), options);
    if let Err(error) = &result {
        tracing::debug!(%error, input_len = bytes.len(), "rejected store encoding");
    }
    result
}

fn read_store(reader: &mut Reader<'_>, options: &DecodeOptions) -> Result<ValueStore, DecodeError> {
    let version = reader.read_byte("store version")?;
    if version != STORE_FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion { version });
    }

    let count = reader.read_len(options.max_children, "entry count")?;
    let capacity = count.min(reader.remaining_len() / STORE_MIN_ENTRY_LEN);
    let mut entries = FxHashMap::with_capacity_and_hasher(capacity, Default::default());
    for _ in 0..count {
        let key = reader.read_string(options.max_name_len, "key")?;
        let value = read_unnamed_value(reader, key.as_str(), options)?;
        if entries.contains_key(&key) {
            return Err(DecodeError::DuplicateKey { key });
        }
        entries.insert(key, value);
    }

    if !reader.is_empty() {
        return Err(DecodeError::TrailingBytes {
            len: reader.remaining_len(),
        });
    }
    Ok(ValueStore::from_entries(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::value::encode_value;
    use crate::model::ValueKind;

    fn sample_message() -> Message {
        let mut msg = Message::with_type("user_update");
        msg.set_source("client", "7");
        msg.set_target("server", "");
        msg.add_value(Value::container(
            "user",
            [Value::string("name", "Alice"), Value::int32("age", 30)],
        ));
        msg.add_value(Value::bool("active", true));
        msg.add_value(Value::bool("active", false));
        msg
    }

    #[test]
    fn test_message_roundtrip() {
        let msg = sample_message();
        let bytes = encode_message(&msg);
        let decoded = decode_message(&bytes).unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(decoded.get_value("active", 1).map(Value::to_bool), Some(Ok(false)));
    }

    #[test]
    fn test_message_starts_with_header_container() {
        let bytes = encode_message(&Message::new());
        let (header, consumed) = crate::codec::decode_value(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(header.name(), "header");
        assert_eq!(header.child_count(), 6);
        assert_eq!(
            header.get_child("version", 0).and_then(Value::as_str),
            Some("1.0.0.0")
        );
    }

    #[test]
    fn test_message_without_header() {
        let bytes = encode_value(&Value::int32("x", 1));
        assert!(matches!(
            decode_message(&bytes),
            Err(DecodeError::MalformedMessage { .. })
        ));
    }

    #[test]
    fn test_message_header_missing_field() {
        let header = Value::container("header", [Value::string("source_id", "a")]);
        let bytes = encode_value(&header);
        assert_eq!(
            decode_message(&bytes),
            Err(DecodeError::MalformedMessage {
                context: "source_sub_id"
            })
        );
    }

    #[test]
    fn test_message_truncated() {
        let bytes = encode_message(&sample_message());
        let err = decode_message(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(err.is_truncation());
    }

    fn sample_store() -> ValueStore {
        let mut store = ValueStore::new();
        store.add("zeta", Value::float64("zeta", 0.5));
        store.add("alpha", Value::string("alpha", "first"));
        store.add("list", Value::array("list", [Value::int16("", 1), Value::int16("", 2)]));
        store
    }

    #[test]
    fn test_store_roundtrip() {
        let store = sample_store();
        let bytes = encode_store(&store);
        assert_eq!(bytes[0], STORE_FORMAT_VERSION);
        assert_eq!(decode_store(&bytes), Ok(store.clone()));
        assert_eq!(store.statistics().serializations, 1);
    }

    #[test]
    fn test_store_encoding_is_deterministic() {
        let a = sample_store();
        let mut b = ValueStore::new();
        for key in ["list", "alpha", "zeta"] {
            if let Some(value) = a.get(key) {
                b.add(key, value.clone());
            }
        }
        assert_eq!(encode_store(&a), encode_store(&b));

        // First key after version and count is "alpha", then its kind and
        // payload with no value name in between.
        let bytes = encode_store(&a);
        assert_eq!(&bytes[5..9], &5u32.to_le_bytes());
        assert_eq!(&bytes[9..14], b"alpha");
        assert_eq!(bytes[14], ValueKind::String.code());
        assert_eq!(&bytes[15..19], &5u32.to_le_bytes());
        assert_eq!(&bytes[19..24], b"first");
    }

    #[test]
    fn test_store_entry_layout() {
        let bytes = [1, 1, 0, 0, 0, 1, 0, 0, 0, b'k', 4, 4, 0, 0, 0, 42, 0, 0, 0];
        let store = decode_store(&bytes).unwrap();
        assert_eq!(store.get("k"), Some(&Value::int32("k", 42)));

        let mut again = ValueStore::new();
        again.add("k", Value::int32("k", 42));
        assert_eq!(encode_store(&again), bytes);
    }

    #[test]
    fn test_store_value_named_after_key() {
        let mut store = ValueStore::new();
        store.add("key", Value::uint16("other", 7));
        let restored = decode_store(&encode_store(&store)).unwrap();
        assert_eq!(restored.get("key"), Some(&Value::uint16("key", 7)));
    }

    #[test]
    fn test_store_entry_payload_checked() {
        // Bool entry with a two-byte payload.
        let bytes = [1, 1, 0, 0, 0, 1, 0, 0, 0, b'b', 1, 2, 0, 0, 0, 1, 0];
        assert_eq!(
            decode_store(&bytes),
            Err(DecodeError::PayloadSizeMismatch {
                kind: ValueKind::Bool,
                expected: 1,
                actual: 2
            })
        );
        assert!(decode_store(&bytes[..12]).unwrap_err().is_truncation());
    }

    #[test]
    fn test_store_unsupported_version() {
        let mut bytes = encode_store(&sample_store());
        bytes[0] = 2;
        assert_eq!(
            decode_store(&bytes),
            Err(DecodeError::UnsupportedVersion { version: 2 })
        );
    }

    #[test]
    fn test_store_duplicate_key() {
        let mut writer = Writer::new();
        writer.write_byte(STORE_FORMAT_VERSION);
        writer.write_u32_le(2);
        for n in [1, 2] {
            writer.write_string("k");
            encode_unnamed_value_into(&mut writer, &Value::int32("k", n));
        }
        assert_eq!(
            decode_store(writer.as_bytes()),
            Err(DecodeError::DuplicateKey { key: "k".to_string() })
        );
    }

    #[test]
    fn test_store_trailing_bytes() {
        let mut bytes = encode_store(&sample_store());
        bytes.extend_from_slice(&[0, 0]);
        assert_eq!(decode_store(&bytes), Err(DecodeError::TrailingBytes { len: 2 }));
    }

    #[test]
    fn test_empty_store() {
        let bytes = encode_store(&ValueStore::new());
        assert_eq!(bytes, [1, 0, 0, 0, 0]);
        assert!(decode_store(&bytes).unwrap().is_empty());
        assert!(decode_store(&[]).unwrap_err().is_truncation());
    }
}
