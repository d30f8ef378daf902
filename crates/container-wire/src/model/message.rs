//! Message envelope: routing header plus an ordered list of top-level values.

use crate::limits::DEFAULT_MESSAGE_VERSION;
use crate::model::Value;

/// Routing metadata carried in front of a message's values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHeader {
    pub source_id: String,
    pub source_sub_id: String,
    pub target_id: String,
    pub target_sub_id: String,
    pub message_type: String,
    pub version: String,
}

impl Default for MessageHeader {
    fn default() -> Self {
        Self {
            source_id: String::new(),
            source_sub_id: String::new(),
            target_id: String::new(),
            target_sub_id: String::new(),
            message_type: String::new(),
            version: DEFAULT_MESSAGE_VERSION.to_string(),
        }
    }
}

impl MessageHeader {
    /// Exchanges source and target, as when turning a request into a reply.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.source_id, &mut self.target_id);
        std::mem::swap(&mut self.source_sub_id, &mut self.target_sub_id);
    }
}

/// A header and its top-level values.
///
/// Value names need not be unique. For use across threads wrap the message
/// in [`crate::sync::Shared`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    pub header: MessageHeader,
    values: Vec<Value>,
}

impl Message {
    /// Creates an empty message with a default header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty message of the given type.
    pub fn with_type(message_type: impl Into<String>) -> Self {
        Self {
            header: MessageHeader {
                message_type: message_type.into(),
                ..MessageHeader::default()
            },
            values: Vec::new(),
        }
    }

    pub(crate) fn from_parts(header: MessageHeader, values: Vec<Value>) -> Self {
        Self { header, values }
    }

    pub fn set_source(&mut self, id: impl Into<String>, sub_id: impl Into<String>) {
        self.header.source_id = id.into();
        self.header.source_sub_id = sub_id.into();
    }

    pub fn set_target(&mut self, id: impl Into<String>, sub_id: impl Into<String>) {
        self.header.target_id = id.into();
        self.header.target_sub_id = sub_id.into();
    }

    pub fn set_message_type(&mut self, message_type: impl Into<String>) {
        self.header.message_type = message_type.into();
    }

    pub fn swap_header(&mut self) {
        self.header.swap();
    }

    pub fn add_value(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Removes every top-level value named `name`, returning how many were removed.
    pub fn remove_values_named(&mut self, name: &str) -> usize {
        let before = self.values.len();
        self.values.retain(|v| v.name() != name);
        before - self.values.len()
    }

    /// Returns the `index`-th top-level value named `name`.
    pub fn get_value(&self, name: &str, index: usize) -> Option<&Value> {
        self.values.iter().filter(|v| v.name() == name).nth(index)
    }

    pub fn values_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.values.iter().filter(move |v| v.name() == name)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear_values(&mut self) {
        self.values.clear();
    }

    /// Returns a message with this header and no values.
    pub fn copy_header_only(&self) -> Self {
        Self {
            header: self.header.clone(),
            values: Vec::new(),
        }
    }
}
