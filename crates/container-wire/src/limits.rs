//! Wire constants and default decoder limits.
//!
//! The decoder never trusts a length field further than the bytes it was
//! given, but these limits also cap what a well-formed yet hostile buffer
//! can make it do.

/// Size of the fixed per-value header: kind (1) + name_len (4) + payload_len (4).
pub const VALUE_HEADER_LEN: usize = 9;

/// Smallest possible encoded value (a Null with an empty name).
pub const MIN_VALUE_LEN: usize = VALUE_HEADER_LEN;

/// Size of the child count that prefixes every composite payload.
pub const COMPOSITE_COUNT_LEN: usize = 4;

/// Default maximum number of nested composite levels.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Default maximum name length in bytes (64 KiB).
pub const MAX_NAME_LEN: usize = 64 * 1024;

/// Default maximum payload length of a single value (256 MiB).
pub const MAX_PAYLOAD_LEN: usize = 256 * 1024 * 1024;

/// Default maximum declared child count of one composite.
pub const MAX_CHILDREN: usize = 1 << 20;

/// Smallest possible store entry: key_len (4) + kind (1) + payload_len (4).
pub const STORE_MIN_ENTRY_LEN: usize = 9;

/// Version byte of the keyed store binary form.
pub const STORE_FORMAT_VERSION: u8 = 1;

/// Default message version string.
pub const DEFAULT_MESSAGE_VERSION: &str = "1.0.0.0";
