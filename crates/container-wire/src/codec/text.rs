//! Human-readable text view of values and messages.
//!
//! Each value is an item `[name,type_name,data];`. A composite item carries
//! its child count as data and is followed by its children's items:
//!
//! ```text
//! [user,container_value,2];[name,string_value,Alice];[age,int_value,30];
//! ```
//!
//! A message wraps its header fields and its items:
//!
//! ```text
//! @header={{[1,target];[2,];[3,source];[4,s1];[5,type];[6,1.0.0.0];}};@data={{...}};
//! ```
//!
//! Header pairs may come in any order and any of them may be missing; a
//! missing field keeps its default.
//!
//! ```text
//! @header={{[5,data_container];[6,1.0.0.0];}};@data={{[count,int_value,42];}};
//! ```
//!
//! The view is meant for debugging and legacy peers. It has no escaping:
//! names containing `,` and string data containing `];` or `}};` do not
//! survive a round trip. NaN payload bits are not preserved either.

use crate::error::TextError;
use crate::limits::MAX_NESTING_DEPTH;
use crate::model::{Message, MessageHeader, Payload, Value, ValueKind};

const HEADER_OPEN: &str = "@header={{";
const DATA_OPEN: &str = "}};@data={{";
const SECTION_CLOSE: &str = "}};";

/// Message type whose text form never carries routing fields.
pub const DATA_CONTAINER_TYPE: &str = "data_container";

// Header field ids.
const TARGET_ID: u8 = 1;
const TARGET_SUB_ID: u8 = 2;
const SOURCE_ID: u8 = 3;
const SOURCE_SUB_ID: u8 = 4;
const MESSAGE_TYPE: u8 = 5;
const VERSION: u8 = 6;

// =============================================================================
// WRITING
// =============================================================================

/// Renders a value and its descendants.
pub fn value_to_text(value: &Value) -> String {
    let mut out = String::new();
    write_value_text(&mut out, value);
    out
}

/// Appends the text items of a value and its descendants to `out`.
pub fn write_value_text(out: &mut String, value: &Value) {
    out.push('[');
    out.push_str(value.name());
    out.push(',');
    out.push_str(value.kind().wire_name());
    out.push(',');
    match value.payload() {
        Payload::Null => {}
        Payload::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
        Payload::Int16(v) => out.push_str(&v.to_string()),
        Payload::UInt16(v) => out.push_str(&v.to_string()),
        Payload::Int32(v) | Payload::Long(v) => out.push_str(&v.to_string()),
        Payload::UInt32(v) | Payload::ULong(v) => out.push_str(&v.to_string()),
        Payload::Int64(v) => out.push_str(&v.to_string()),
        Payload::UInt64(v) => out.push_str(&v.to_string()),
        Payload::Float32(v) => out.push_str(&v.to_string()),
        Payload::Float64(v) => out.push_str(&v.to_string()),
        Payload::Bytes(b) => push_hex(out, b),
        Payload::String(s) => out.push_str(s),
        Payload::Container(_) | Payload::Array(_) => out.push_str(&value.child_count().to_string()),
    }
    out.push_str("];");
    for child in value.children() {
        write_value_text(out, child);
    }
}

/// Renders a message with its header section and data section.
///
/// Routing pairs are left out when both of their fields are empty, and always
/// for [`DATA_CONTAINER_TYPE`] messages. Type and version are always written.
pub fn message_to_text(message: &Message) -> String {
    let header = &message.header;
    let mut out = String::from(HEADER_OPEN);
    if header.message_type != DATA_CONTAINER_TYPE {
        push_routing_pair(&mut out, TARGET_ID, &header.target_id, &header.target_sub_id);
        push_routing_pair(&mut out, SOURCE_ID, &header.source_id, &header.source_sub_id);
    }
    push_header_field(&mut out, MESSAGE_TYPE, &header.message_type);
    push_header_field(&mut out, VERSION, &header.version);
    out.push_str(DATA_OPEN);
    for value in message.values() {
        write_value_text(&mut out, value);
    }
    out.push_str(SECTION_CLOSE);
    out
}

fn push_routing_pair(out: &mut String, id_field: u8, id: &str, sub_id: &str) {
    if id.is_empty() && sub_id.is_empty() {
        return;
    }
    push_header_field(out, id_field, id);
    push_header_field(out, id_field + 1, sub_id);
}

fn push_header_field(out: &mut String, field: u8, value: &str) {
    out.push('[');
    out.push_str(&field.to_string());
    out.push(',');
    out.push_str(value);
    out.push_str("];");
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

fn push_hex(out: &mut String, bytes: &[u8]) {
    out.reserve(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
        out.push(HEX_DIGITS[(byte & 0x0F) as usize] as char);
    }
}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn parse_hex(s: &str) -> Option<Vec<u8>> {
    let bytes = s.as_bytes();
    if bytes.len() % 2 != 0 {
        return None;
    }
    bytes
        .chunks_exact(2)
        .map(|pair| Some((hex_digit(pair[0])? << 4) | hex_digit(pair[1])?))
        .collect()
}

// =============================================================================
// PARSING
// =============================================================================

/// Parses exactly one value item (with its descendants).
pub fn parse_value_text(text: &str) -> Result<Value, TextError> {
    let mut parser = Parser::new(text);
    let value = parser.parse_item(0)?;
    parser.expect_end()?;
    Ok(value)
}

/// Parses a run of sibling value items.
pub fn parse_values_text(text: &str) -> Result<Vec<Value>, TextError> {
    let mut parser = Parser::new(text);
    let mut values = Vec::new();
    while !parser.is_at_end() {
        values.push(parser.parse_item(0)?);
    }
    Ok(values)
}

/// Parses a message in the text view.
///
/// Header pairs are accepted in any order; a repeated id overwrites the
/// earlier pair and an unknown id is rejected.
pub fn parse_message_text(text: &str) -> Result<Message, TextError> {
    let mut parser = Parser::new(text);
    parser.expect(HEADER_OPEN)?;

    let mut header = MessageHeader::default();
    while !parser.rest().starts_with(DATA_OPEN) {
        if parser.is_at_end() {
            return Err(TextError::Expected {
                expected: DATA_OPEN,
                offset: parser.pos,
            });
        }
        parser.expect("[")?;
        let offset = parser.pos;
        let id = parser.take_until(",")?;
        let value = parser.take_until("];")?.to_string();
        let field = match id.trim().parse::<u8>() {
            Ok(TARGET_ID) => &mut header.target_id,
            Ok(TARGET_SUB_ID) => &mut header.target_sub_id,
            Ok(SOURCE_ID) => &mut header.source_id,
            Ok(SOURCE_SUB_ID) => &mut header.source_sub_id,
            Ok(MESSAGE_TYPE) => &mut header.message_type,
            Ok(VERSION) => &mut header.version,
            _ => {
                return Err(TextError::Expected {
                    expected: "header field index",
                    offset,
                });
            }
        };
        *field = value;
    }
    parser.expect(DATA_OPEN)?;

    let mut values = Vec::new();
    while !parser.rest().starts_with(SECTION_CLOSE) {
        if parser.is_at_end() {
            return Err(TextError::Expected {
                expected: SECTION_CLOSE,
                offset: parser.pos,
            });
        }
        values.push(parser.parse_item(0)?);
    }
    parser.expect(SECTION_CLOSE)?;
    parser.expect_end()?;

    let mut message = Message::new();
    message.header = header;
    for value in values {
        message.add_value(value);
    }
    Ok(message)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn expect(&mut self, token: &'static str) -> Result<(), TextError> {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            Ok(())
        } else {
            Err(TextError::Expected {
                expected: token,
                offset: self.pos,
            })
        }
    }

    fn expect_end(&self) -> Result<(), TextError> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(TextError::Expected {
                expected: "end of input",
                offset: self.pos,
            })
        }
    }

    /// Returns the text up to `delim` and moves past the delimiter.
    fn take_until(&mut self, delim: &'static str) -> Result<&'a str, TextError> {
        let rest = self.rest();
        let end = rest.find(delim).ok_or(TextError::Expected {
            expected: delim,
            offset: self.input.len(),
        })?;
        self.pos += end + delim.len();
        Ok(&rest[..end])
    }

    fn parse_item(&mut self, depth: usize) -> Result<Value, TextError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(TextError::NestingTooDeep {
                max: MAX_NESTING_DEPTH,
            });
        }

        self.expect("[")?;
        let name = self.take_until(",")?;
        let type_name = self.take_until(",")?;
        let kind = ValueKind::from_wire_name(type_name).ok_or_else(|| TextError::UnknownTypeName {
            name: type_name.to_string(),
        })?;
        let data = self.take_until("];")?;

        if !kind.is_composite() {
            return parse_scalar(name, kind, data);
        }

        let declared: usize = data.parse().map_err(|_| invalid_literal(kind, data))?;
        let mut children = Vec::new();
        for found in 0..declared {
            if !self.rest().starts_with('[') {
                return Err(TextError::MissingChildren {
                    name: name.to_string(),
                    declared,
                    found,
                });
            }
            children.push(self.parse_item(depth + 1)?);
        }
        Ok(if kind == ValueKind::Array {
            Value::array(name, children)
        } else {
            Value::container(name, children)
        })
    }
}

fn invalid_literal(kind: ValueKind, literal: &str) -> TextError {
    TextError::InvalidLiteral {
        kind,
        literal: literal.to_string(),
    }
}

fn parse_scalar(name: &str, kind: ValueKind, data: &str) -> Result<Value, TextError> {
    let invalid = || invalid_literal(kind, data);
    let value = match kind {
        ValueKind::Null if data.is_empty() => Value::null(name),
        ValueKind::Bool => match data {
            "true" => Value::bool(name, true),
            "false" => Value::bool(name, false),
            _ => return Err(invalid()),
        },
        ValueKind::Int16 => Value::int16(name, data.parse().map_err(|_| invalid())?),
        ValueKind::UInt16 => Value::uint16(name, data.parse().map_err(|_| invalid())?),
        ValueKind::Int32 => Value::int32(name, data.parse().map_err(|_| invalid())?),
        ValueKind::UInt32 => Value::uint32(name, data.parse().map_err(|_| invalid())?),
        ValueKind::Long => Value::long(name, data.parse().map_err(|_| invalid())?)?,
        ValueKind::ULong => Value::ulong(name, data.parse().map_err(|_| invalid())?)?,
        ValueKind::Int64 => Value::int64(name, data.parse().map_err(|_| invalid())?),
        ValueKind::UInt64 => Value::uint64(name, data.parse().map_err(|_| invalid())?),
        ValueKind::Float32 => Value::float32(name, data.parse().map_err(|_| invalid())?),
        ValueKind::Float64 => Value::float64(name, data.parse().map_err(|_| invalid())?),
        ValueKind::Bytes => Value::bytes(name, parse_hex(data).ok_or_else(invalid)?),
        ValueKind::String => Value::string(name, data),
        ValueKind::Null | ValueKind::Container | ValueKind::Array => return Err(invalid()),
    };
    Ok(value)
}
