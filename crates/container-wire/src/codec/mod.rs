//! Binary and text encodings.
//!
//! - [`value`]: the per-value TLV wire format
//! - [`message`]: message envelope and keyed store built on top of it
//! - [`text`]: the human-readable debugging view

pub mod message;
pub mod primitives;
pub mod text;
pub mod value;

pub use message::{
    decode_message, decode_message_with_options, decode_store, decode_store_with_options,
    encode_message, encode_store,
};
pub use primitives::{Reader, Writer};
pub use text::{
    message_to_text, parse_message_text, parse_value_text, parse_values_text, value_to_text,
    write_value_text, DATA_CONTAINER_TYPE,
};
pub use value::{
    decode_value, decode_value_with_options, decode_values, decode_values_with_options,
    encode_value, encode_value_into, read_value, DecodeOptions,
};
