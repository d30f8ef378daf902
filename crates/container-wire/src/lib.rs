//! Container wire: a typed, named value tree and its binary TLV encoding.
//!
//! Values carry a name and one of sixteen kinds: null, bool, fixed-width
//! integers and floats, bytes, strings, and two composites (containers and
//! arrays) that own their children.
//!
//! # Quick Start
//!
//! ```rust
//! use container_wire::{decode_value, encode_value, Value};
//!
//! let user = Value::container(
//!     "user",
//!     [
//!         Value::string("name", "Alice"),
//!         Value::int32("age", 30),
//!         Value::array("tags", [Value::string("", "x"), Value::string("", "y")]),
//!     ],
//! );
//!
//! let bytes = encode_value(&user);
//! let (decoded, consumed) = decode_value(&bytes).unwrap();
//!
//! assert_eq!(consumed, bytes.len());
//! assert_eq!(decoded.get_child("age", 0).unwrap().to_i32(), Ok(30));
//! ```
//!
//! # Modules
//!
//! - [`model`]: value kinds, values, composites, messages, and the keyed store
//! - [`codec`]: binary encoding/decoding and the text view
//! - [`sync`]: opt-in shared locking for messages and stores
//! - [`error`]: error types
//! - [`limits`]: wire constants and decoder limits
//!
//! # Wire Format
//!
//! Each value is `[kind:u8][name_len:u32][name][payload_len:u32][payload]`,
//! little-endian. Fixed-width kinds have exactly their native width of
//! payload. Containers and arrays store `[count:u32]` followed by `count`
//! complete child encodings.
//!
//! # Security
//!
//! The decoder is designed to safely handle untrusted input:
//! - Every length is checked against the remaining input before it is used
//! - Allocations are bounded by the input size and configurable limits
//! - Nesting depth is capped (see [`DecodeOptions`])

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod sync;

// Re-export commonly used types at crate root
pub use codec::{
    decode_message, decode_store, decode_value, decode_value_with_options, decode_values,
    encode_message, encode_store, encode_value, DecodeOptions,
};
pub use error::{DecodeError, TextError, ValueError};
pub use model::{
    Array, Container, Message, MessageHeader, Payload, StoreStatistics, Value, ValueKind,
    ValueStore,
};
pub use sync::Shared;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
