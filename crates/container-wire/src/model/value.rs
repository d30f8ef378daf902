//! The polymorphic value type.
//!
//! A [`Value`] is a name plus a [`Payload`]. The kind tag is derived from the
//! payload variant, so a value whose kind and payload disagree cannot exist.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::ValueError;
use crate::limits::VALUE_HEADER_LEN;
use crate::model::{Array, Container, ValueKind};

/// Kind-specific payload of a value.
#[derive(Debug, Clone)]
pub enum Payload {
    Null,
    Bool(bool),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    /// Always within 32-bit range; see [`Value::long`].
    Long(i32),
    /// Always within 32-bit range; see [`Value::ulong`].
    ULong(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Bytes(Vec<u8>),
    String(String),
    Container(Container),
    Array(Array),
}

impl Payload {
    /// Returns the kind tag for this payload.
    pub fn kind(&self) -> ValueKind {
        match self {
            Payload::Null => ValueKind::Null,
            Payload::Bool(_) => ValueKind::Bool,
            Payload::Int16(_) => ValueKind::Int16,
            Payload::UInt16(_) => ValueKind::UInt16,
            Payload::Int32(_) => ValueKind::Int32,
            Payload::UInt32(_) => ValueKind::UInt32,
            Payload::Long(_) => ValueKind::Long,
            Payload::ULong(_) => ValueKind::ULong,
            Payload::Int64(_) => ValueKind::Int64,
            Payload::UInt64(_) => ValueKind::UInt64,
            Payload::Float32(_) => ValueKind::Float32,
            Payload::Float64(_) => ValueKind::Float64,
            Payload::Bytes(_) => ValueKind::Bytes,
            Payload::String(_) => ValueKind::String,
            Payload::Container(_) => ValueKind::Container,
            Payload::Array(_) => ValueKind::Array,
        }
    }
}

// Floats compare by bit pattern so that every decoded value, NaN included,
// equals the value it was encoded from.
impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Payload::Null, Payload::Null) => true,
            (Payload::Bool(a), Payload::Bool(b)) => a == b,
            (Payload::Int16(a), Payload::Int16(b)) => a == b,
            (Payload::UInt16(a), Payload::UInt16(b)) => a == b,
            (Payload::Int32(a), Payload::Int32(b)) => a == b,
            (Payload::UInt32(a), Payload::UInt32(b)) => a == b,
            (Payload::Long(a), Payload::Long(b)) => a == b,
            (Payload::ULong(a), Payload::ULong(b)) => a == b,
            (Payload::Int64(a), Payload::Int64(b)) => a == b,
            (Payload::UInt64(a), Payload::UInt64(b)) => a == b,
            (Payload::Float32(a), Payload::Float32(b)) => a.to_bits() == b.to_bits(),
            (Payload::Float64(a), Payload::Float64(b)) => a.to_bits() == b.to_bits(),
            (Payload::Bytes(a), Payload::Bytes(b)) => a == b,
            (Payload::String(a), Payload::String(b)) => a == b,
            (Payload::Container(a), Payload::Container(b)) => a == b,
            (Payload::Array(a), Payload::Array(b)) => a == b,
            _ => false,
        }
    }
}

/// A named, typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    name: String,
    payload: Payload,
}

impl Value {
    /// Creates a value from a name and an already-built payload.
    pub fn new(name: impl Into<String>, payload: Payload) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a null value.
    pub fn null(name: impl Into<String>) -> Self {
        Self::new(name, Payload::Null)
    }

    /// Creates a boolean value.
    pub fn bool(name: impl Into<String>, value: bool) -> Self {
        Self::new(name, Payload::Bool(value))
    }

    /// Creates a signed 16-bit value.
    pub fn int16(name: impl Into<String>, value: i16) -> Self {
        Self::new(name, Payload::Int16(value))
    }

    /// Creates an unsigned 16-bit value.
    pub fn uint16(name: impl Into<String>, value: u16) -> Self {
        Self::new(name, Payload::UInt16(value))
    }

    /// Creates a signed 32-bit value.
    pub fn int32(name: impl Into<String>, value: i32) -> Self {
        Self::new(name, Payload::Int32(value))
    }

    /// Creates an unsigned 32-bit value.
    pub fn uint32(name: impl Into<String>, value: u32) -> Self {
        Self::new(name, Payload::UInt32(value))
    }

    /// Creates a `Long` value, rejecting inputs outside the signed 32-bit range.
    ///
    /// `Long` is always 4 bytes on the wire regardless of the producing
    /// platform. Use [`Value::int64`] for wider values.
    pub fn long(name: impl Into<String>, value: i64) -> Result<Self, ValueError> {
        let narrow = i32::try_from(value).map_err(|_| ValueError::OutOfRange {
            kind: ValueKind::Long,
            value: value as i128,
            min: i32::MIN as i128,
            max: i32::MAX as i128,
            suggested: ValueKind::Int64,
        })?;
        Ok(Self::new(name, Payload::Long(narrow)))
    }

    /// Creates a `ULong` value, rejecting inputs above `u32::MAX`.
    ///
    /// Use [`Value::uint64`] for wider values.
    pub fn ulong(name: impl Into<String>, value: u64) -> Result<Self, ValueError> {
        let narrow = u32::try_from(value).map_err(|_| ValueError::OutOfRange {
            kind: ValueKind::ULong,
            value: value as i128,
            min: 0,
            max: u32::MAX as i128,
            suggested: ValueKind::UInt64,
        })?;
        Ok(Self::new(name, Payload::ULong(narrow)))
    }

    /// Creates a signed 64-bit value.
    pub fn int64(name: impl Into<String>, value: i64) -> Self {
        Self::new(name, Payload::Int64(value))
    }

    /// Creates an unsigned 64-bit value.
    pub fn uint64(name: impl Into<String>, value: u64) -> Self {
        Self::new(name, Payload::UInt64(value))
    }

    /// Creates a single-precision float value.
    pub fn float32(name: impl Into<String>, value: f32) -> Self {
        Self::new(name, Payload::Float32(value))
    }

    /// Creates a double-precision float value.
    pub fn float64(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, Payload::Float64(value))
    }

    /// Creates a bytes value that owns its data.
    pub fn bytes(name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self::new(name, Payload::Bytes(value.into()))
    }

    /// Creates a UTF-8 string value.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, Payload::String(value.into()))
    }

    /// Creates a container holding `children` in the given order.
    pub fn container(name: impl Into<String>, children: impl IntoIterator<Item = Value>) -> Self {
        Self::new(name, Payload::Container(children.into_iter().collect()))
    }

    /// Creates an array holding `elements` in the given order.
    pub fn array(name: impl Into<String>, elements: impl IntoIterator<Item = Value>) -> Self {
        Self::new(name, Payload::Array(elements.into_iter().collect()))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The value's name. May be empty, as for array elements.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind tag derived from the payload.
    pub fn kind(&self) -> ValueKind {
        self.payload.kind()
    }

    /// Borrows the payload.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Splits the value into its name and payload.
    pub fn into_parts(self) -> (String, Payload) {
        (self.name, self.payload)
    }

    /// True for an explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self.payload, Payload::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self.payload, Payload::Bool(_))
    }

    /// True for any integer or float kind, `Bool` excluded.
    pub fn is_numeric(&self) -> bool {
        self.kind().is_numeric()
    }

    pub fn is_string(&self) -> bool {
        matches!(self.payload, Payload::String(_))
    }

    pub fn is_bytes(&self) -> bool {
        matches!(self.payload, Payload::Bytes(_))
    }

    pub fn is_container(&self) -> bool {
        matches!(self.payload, Payload::Container(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.payload, Payload::Array(_))
    }

    /// True for containers and arrays.
    pub fn is_composite(&self) -> bool {
        self.kind().is_composite()
    }

    /// Borrows the container payload, if any.
    pub fn as_container(&self) -> Option<&Container> {
        match &self.payload {
            Payload::Container(c) => Some(c),
            _ => None,
        }
    }

    /// Mutably borrows the container payload, if any.
    pub fn as_container_mut(&mut self) -> Option<&mut Container> {
        match &mut self.payload {
            Payload::Container(c) => Some(c),
            _ => None,
        }
    }

    /// Borrows the array payload, if any.
    pub fn as_array(&self) -> Option<&Array> {
        match &self.payload {
            Payload::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Mutably borrows the array payload, if any.
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match &mut self.payload {
            Payload::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Borrows the string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match &self.payload {
            Payload::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrows the bytes payload, if any.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.payload {
            Payload::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Child values of a composite; empty for scalars.
    pub fn children(&self) -> &[Value] {
        match &self.payload {
            Payload::Container(c) => c.children(),
            Payload::Array(a) => a.elements(),
            _ => &[],
        }
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Returns the `index`-th child named `name`, or `None` if there is none.
    ///
    /// A present child holding an explicit null is returned as `Some`.
    pub fn get_child(&self, name: &str, index: usize) -> Option<&Value> {
        self.children()
            .iter()
            .filter(|child| child.name() == name)
            .nth(index)
    }

    /// Length of the payload section on the wire.
    pub fn payload_len(&self) -> usize {
        match &self.payload {
            Payload::Bytes(b) => b.len(),
            Payload::String(s) => s.len(),
            Payload::Container(c) => c.payload_len(),
            Payload::Array(a) => a.payload_len(),
            // Fixed-width kinds always have a width.
            other => other.kind().fixed_width().unwrap_or(0),
        }
    }

    /// Total number of bytes [`crate::codec::encode_value`] produces for this value.
    pub fn encoded_len(&self) -> usize {
        VALUE_HEADER_LEN + self.name.len() + self.payload_len()
    }

    // =========================================================================
    // Conversions
    // =========================================================================

    fn conversion_error(&self, to: ValueKind) -> ValueError {
        match self.payload {
            Payload::Null => ValueError::NullConversion { to },
            _ => ValueError::UnsupportedConversion {
                from: self.kind(),
                to,
            },
        }
    }

    /// Returns the boolean payload. No other kind converts.
    pub fn to_bool(&self) -> Result<bool, ValueError> {
        match self.payload {
            Payload::Bool(v) => Ok(v),
            _ => Err(self.conversion_error(ValueKind::Bool)),
        }
    }

    pub fn to_i16(&self) -> Result<i16, ValueError> {
        match self.payload {
            Payload::Int16(v) => Ok(v),
            _ => Err(self.conversion_error(ValueKind::Int16)),
        }
    }

    pub fn to_u16(&self) -> Result<u16, ValueError> {
        match self.payload {
            Payload::UInt16(v) => Ok(v),
            _ => Err(self.conversion_error(ValueKind::UInt16)),
        }
    }

    /// Widening conversion to `i32`; bools map to 0 and 1.
    pub fn to_i32(&self) -> Result<i32, ValueError> {
        match self.payload {
            Payload::Bool(v) => Ok(i32::from(v)),
            Payload::Int16(v) => Ok(i32::from(v)),
            Payload::Int32(v) | Payload::Long(v) => Ok(v),
            _ => Err(self.conversion_error(ValueKind::Int32)),
        }
    }

    /// Widening conversion to `u32` from any unsigned kind up to 32 bits.
    pub fn to_u32(&self) -> Result<u32, ValueError> {
        match self.payload {
            Payload::UInt16(v) => Ok(u32::from(v)),
            Payload::UInt32(v) | Payload::ULong(v) => Ok(v),
            _ => Err(self.conversion_error(ValueKind::UInt32)),
        }
    }

    /// Widening conversion to `i64`; bools map to 0 and 1.
    pub fn to_i64(&self) -> Result<i64, ValueError> {
        match self.payload {
            Payload::Bool(v) => Ok(i64::from(v)),
            Payload::Int16(v) => Ok(i64::from(v)),
            Payload::Int32(v) | Payload::Long(v) => Ok(i64::from(v)),
            Payload::Int64(v) => Ok(v),
            _ => Err(self.conversion_error(ValueKind::Int64)),
        }
    }

    /// Widening conversion to `u64`.
    pub fn to_u64(&self) -> Result<u64, ValueError> {
        match self.payload {
            Payload::UInt16(v) => Ok(u64::from(v)),
            Payload::UInt32(v) | Payload::ULong(v) => Ok(u64::from(v)),
            Payload::UInt64(v) => Ok(v),
            _ => Err(self.conversion_error(ValueKind::UInt64)),
        }
    }

    pub fn to_f32(&self) -> Result<f32, ValueError> {
        match self.payload {
            Payload::Float32(v) => Ok(v),
            _ => Err(self.conversion_error(ValueKind::Float32)),
        }
    }

    /// Widening conversion to `f64`.
    pub fn to_f64(&self) -> Result<f64, ValueError> {
        match self.payload {
            Payload::Float32(v) => Ok(f64::from(v)),
            Payload::Float64(v) => Ok(v),
            _ => Err(self.conversion_error(ValueKind::Float64)),
        }
    }

    /// Converts to an owned string.
    ///
    /// Bools render as `"true"` / `"false"` and bytes as standard padded
    /// base64.
    pub fn to_string_value(&self) -> Result<String, ValueError> {
        match &self.payload {
            Payload::String(s) => Ok(s.clone()),
            Payload::Bool(v) => Ok(v.to_string()),
            Payload::Bytes(b) => Ok(BASE64.encode(b)),
            _ => Err(self.conversion_error(ValueKind::String)),
        }
    }

    /// Copies out raw bytes; strings yield their UTF-8 encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ValueError> {
        match &self.payload {
            Payload::Bytes(b) => Ok(b.clone()),
            Payload::String(s) => Ok(s.as_bytes().to_vec()),
            _ => Err(self.conversion_error(ValueKind::Bytes)),
        }
    }
}
