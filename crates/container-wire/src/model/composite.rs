//! Composite payloads: named-child containers and ordered arrays.

use crate::error::ValueError;
use crate::limits::COMPOSITE_COUNT_LEN;
use crate::model::Value;

/// An ordered collection of named children.
///
/// Names need not be unique; lookups by name count occurrences in insertion
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    children: Vec<Value>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            children: Vec::with_capacity(capacity),
        }
    }

    /// Appends a child at the end.
    pub fn add_child(&mut self, child: Value) {
        self.children.push(child);
    }

    /// Removes every child named `name`, returning how many were removed.
    pub fn remove_children_named(&mut self, name: &str) -> usize {
        let before = self.children.len();
        self.children.retain(|child| child.name() != name);
        before - self.children.len()
    }

    /// Returns the `index`-th child named `name`.
    pub fn get_child(&self, name: &str, index: usize) -> Option<&Value> {
        self.children
            .iter()
            .filter(|child| child.name() == name)
            .nth(index)
    }

    /// Iterates over children named `name` in insertion order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.children.iter().filter(move |child| child.name() == name)
    }

    pub fn children(&self) -> &[Value] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.children.iter()
    }

    pub(crate) fn payload_len(&self) -> usize {
        COMPOSITE_COUNT_LEN + self.children.iter().map(Value::encoded_len).sum::<usize>()
    }
}

impl FromIterator<Value> for Container {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Value>> for Container {
    fn from(children: Vec<Value>) -> Self {
        Self { children }
    }
}

impl<'a> IntoIterator for &'a Container {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

/// An ordered sequence of elements accessed by position.
///
/// Elements keep their own names and kinds; nothing forces them to agree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Array {
    elements: Vec<Value>,
}

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    pub fn append(&mut self, element: Value) {
        self.elements.push(element);
    }

    /// Returns the element at `index`, or [`ValueError::IndexOutOfBounds`].
    pub fn at(&self, index: usize) -> Result<&Value, ValueError> {
        self.elements.get(index).ok_or(ValueError::IndexOutOfBounds {
            index,
            len: self.elements.len(),
        })
    }

    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    pub fn count(&self) -> usize {
        self.elements.len()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.elements.iter()
    }

    pub(crate) fn payload_len(&self) -> usize {
        COMPOSITE_COUNT_LEN + self.elements.iter().map(Value::encoded_len).sum::<usize>()
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Value>> for Array {
    fn from(elements: Vec<Value>) -> Self {
        Self { elements }
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
