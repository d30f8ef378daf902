//! Error types for value construction, conversion, and wire decoding.

use thiserror::Error;

use crate::model::ValueKind;

/// Error during binary decoding.
///
/// Every variant is an ordinary outcome of feeding untrusted bytes to the
/// decoder; none of them indicate a bug in the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown value kind: {code}")]
    UnknownKind { code: u8 },

    #[error("unexpected end of data while reading {context}")]
    UnexpectedEndOfData { context: &'static str },

    #[error("name length {declared} exceeds remaining {available} bytes")]
    TruncatedName { declared: usize, available: usize },

    #[error("payload length {declared} exceeds remaining {available} bytes")]
    TruncatedPayload { declared: usize, available: usize },

    #[error("{kind} payload must be {expected} bytes, found {actual}")]
    PayloadSizeMismatch {
        kind: ValueKind,
        expected: usize,
        actual: usize,
    },

    #[error(
        "corrupt {kind}: declared {declared} children, decoded {decoded}, {trailing} trailing bytes"
    )]
    CorruptComposite {
        kind: ValueKind,
        declared: usize,
        decoded: usize,
        trailing: usize,
    },

    #[error("nesting depth exceeds maximum {max}")]
    NestingTooDeep { max: usize },

    #[error("invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    #[error("invalid bool value: {value} (expected 0x00 or 0x01)")]
    InvalidBool { value: u8 },

    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("unsupported store version: {version}")]
    UnsupportedVersion { version: u8 },

    #[error("duplicate store key: {key:?}")]
    DuplicateKey { key: String },

    #[error("malformed message: {context}")]
    MalformedMessage { context: &'static str },

    #[error("{len} unexpected bytes after the last entry")]
    TrailingBytes { len: usize },
}

impl DecodeError {
    /// Returns true if the error was caused by running out of input.
    ///
    /// Every proper prefix of a valid encoding fails with one of these.
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            DecodeError::UnexpectedEndOfData { .. }
                | DecodeError::TruncatedName { .. }
                | DecodeError::TruncatedPayload { .. }
        )
    }
}

/// Error raised by value constructors, conversions, and composite access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("cannot convert {from} to {to}")]
    UnsupportedConversion { from: ValueKind, to: ValueKind },

    #[error("cannot convert null to {to}")]
    NullConversion { to: ValueKind },

    #[error("{kind}: value {value} exceeds 32-bit range [{min}, {max}]; use {suggested} instead")]
    OutOfRange {
        kind: ValueKind,
        value: i128,
        min: i128,
        max: i128,
        suggested: ValueKind,
    },

    #[error("index {index} out of range (size: {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Error while parsing the human-readable text view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("expected {expected} at offset {offset}")]
    Expected { expected: &'static str, offset: usize },

    #[error("unknown type name {name:?}")]
    UnknownTypeName { name: String },

    #[error("invalid {kind} literal {literal:?}")]
    InvalidLiteral { kind: ValueKind, literal: String },

    #[error("composite {name:?} declares {declared} children but only {found} follow")]
    MissingChildren {
        name: String,
        declared: usize,
        found: usize,
    },

    #[error("nesting depth exceeds maximum {max}")]
    NestingTooDeep { max: usize },

    #[error(transparent)]
    Value(#[from] ValueError),
}
