//! Core data model.
//!
//! - [`ValueKind`]: the closed set of kind tags and their wire codes
//! - [`Value`] / [`Payload`]: a named, typed value
//! - [`Container`] / [`Array`]: composite child lists
//! - [`Message`]: a routing header plus top-level values
//! - [`ValueStore`]: keyed value storage

mod composite;
mod kind;
mod message;
mod store;
mod value;

pub use composite::{Array, Container};
pub use kind::ValueKind;
pub use message::{Message, MessageHeader};
pub use store::{StoreStatistics, ValueStore};
pub use value::{Payload, Value};
