//! Value kind tags and their wire codes.

use std::fmt;

use crate::error::DecodeError;

/// The closed set of value kinds.
///
/// Discriminants are the wire codes and must never be renumbered. The
/// numeric kinds (`Int16` through `Float64`) are contiguous, which
/// [`ValueKind::is_numeric`] relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ValueKind {
    Null = 0,
    Bool = 1,
    Int16 = 2,
    UInt16 = 3,
    Int32 = 4,
    UInt32 = 5,
    /// 32-bit signed integer kept for compatibility with `long` peers.
    Long = 6,
    /// 32-bit unsigned integer kept for compatibility with `unsigned long` peers.
    ULong = 7,
    Int64 = 8,
    UInt64 = 9,
    Float32 = 10,
    Float64 = 11,
    Bytes = 12,
    String = 13,
    Container = 14,
    Array = 15,
}

impl ValueKind {
    /// All kinds in wire-code order.
    pub const ALL: [ValueKind; 16] = [
        ValueKind::Null,
        ValueKind::Bool,
        ValueKind::Int16,
        ValueKind::UInt16,
        ValueKind::Int32,
        ValueKind::UInt32,
        ValueKind::Long,
        ValueKind::ULong,
        ValueKind::Int64,
        ValueKind::UInt64,
        ValueKind::Float32,
        ValueKind::Float64,
        ValueKind::Bytes,
        ValueKind::String,
        ValueKind::Container,
        ValueKind::Array,
    ];

    /// Creates a ValueKind from its wire representation.
    pub fn from_u8(v: u8) -> Option<ValueKind> {
        match v {
            0 => Some(ValueKind::Null),
            1 => Some(ValueKind::Bool),
            2 => Some(ValueKind::Int16),
            3 => Some(ValueKind::UInt16),
            4 => Some(ValueKind::Int32),
            5 => Some(ValueKind::UInt32),
            6 => Some(ValueKind::Long),
            7 => Some(ValueKind::ULong),
            8 => Some(ValueKind::Int64),
            9 => Some(ValueKind::UInt64),
            10 => Some(ValueKind::Float32),
            11 => Some(ValueKind::Float64),
            12 => Some(ValueKind::Bytes),
            13 => Some(ValueKind::String),
            14 => Some(ValueKind::Container),
            15 => Some(ValueKind::Array),
            _ => None,
        }
    }

    /// Decodes a wire code, failing with [`DecodeError::UnknownKind`].
    pub fn from_wire_code(code: u8) -> Result<ValueKind, DecodeError> {
        ValueKind::from_u8(code).ok_or(DecodeError::UnknownKind { code })
    }

    /// Returns the wire code.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Short human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int16 => "short",
            ValueKind::UInt16 => "ushort",
            ValueKind::Int32 => "int",
            ValueKind::UInt32 => "uint",
            ValueKind::Long => "long",
            ValueKind::ULong => "ulong",
            ValueKind::Int64 => "llong",
            ValueKind::UInt64 => "ullong",
            ValueKind::Float32 => "float",
            ValueKind::Float64 => "double",
            ValueKind::Bytes => "bytes",
            ValueKind::String => "string",
            ValueKind::Container => "container",
            ValueKind::Array => "array",
        }
    }

    /// Type name used by the legacy text protocol (`int_value`, ...).
    pub fn wire_name(self) -> &'static str {
        match self {
            ValueKind::Null => "null_value",
            ValueKind::Bool => "bool_value",
            ValueKind::Int16 => "short_value",
            ValueKind::UInt16 => "ushort_value",
            ValueKind::Int32 => "int_value",
            ValueKind::UInt32 => "uint_value",
            ValueKind::Long => "long_value",
            ValueKind::ULong => "ulong_value",
            ValueKind::Int64 => "llong_value",
            ValueKind::UInt64 => "ullong_value",
            ValueKind::Float32 => "float_value",
            ValueKind::Float64 => "double_value",
            ValueKind::Bytes => "bytes_value",
            ValueKind::String => "string_value",
            ValueKind::Container => "container_value",
            ValueKind::Array => "array_value",
        }
    }

    /// Inverse of [`ValueKind::wire_name`].
    pub fn from_wire_name(name: &str) -> Option<ValueKind> {
        ValueKind::ALL.into_iter().find(|k| k.wire_name() == name)
    }

    /// Returns true for the integer and float kinds.
    #[inline]
    pub fn is_numeric(self) -> bool {
        (ValueKind::Int16.code()..=ValueKind::Float64.code()).contains(&self.code())
    }

    /// Returns true for Container and Array.
    #[inline]
    pub fn is_composite(self) -> bool {
        matches!(self, ValueKind::Container | ValueKind::Array)
    }

    /// Payload width of fixed-size kinds, `None` for variable-size ones.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            ValueKind::Null => Some(0),
            ValueKind::Bool => Some(1),
            ValueKind::Int16 | ValueKind::UInt16 => Some(2),
            ValueKind::Int32
            | ValueKind::UInt32
            | ValueKind::Long
            | ValueKind::ULong
            | ValueKind::Float32 => Some(4),
            ValueKind::Int64 | ValueKind::UInt64 | ValueKind::Float64 => Some(8),
            ValueKind::Bytes | ValueKind::String | ValueKind::Container | ValueKind::Array => None,
        }
    }
}

impl TryFrom<u8> for ValueKind {
    type Error = DecodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        ValueKind::from_wire_code(code)
    }
}

impl From<ValueKind> for u8 {
    fn from(kind: ValueKind) -> u8 {
        kind.code()
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
