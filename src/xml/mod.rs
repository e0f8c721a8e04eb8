//! XML codec for the MNS wire format.
//!
//! - [`encode`] / [`XmlFields`] / [`XmlParams`]: request envelopes with the
//!   MNS namespace, omitting absent parameters
//! - [`decode`]: response documents into a [`Node`] tree
//! - [`extract`] / [`entity_fields`]: collapse the decoder's singleton lists
//!
//! # Example
//!
//! ```rust
//! use mns::xml::{decode, encode_fields, entity_fields, Node, XmlFields};
//!
//! let fields = XmlFields::new()
//!     .field("QueueName", Some("Q1"))
//!     .field("DelaySeconds", Some(10u32));
//! let body = encode_fields("Queue", &fields).unwrap();
//!
//! let document = decode(&body).unwrap();
//! let fields = entity_fields(&document, "Queue");
//! assert_eq!(fields["QueueName"], Node::scalar("Q1"));
//! assert_eq!(fields["DelaySeconds"], Node::scalar("10"));
//! ```

mod decode;
mod encode;
mod error;
mod node;

pub use decode::decode;
pub use encode::{encode, encode_fields, XmlFields, XmlParams, XmlValue, MNS_NAMESPACE};
pub use error::XmlError;
pub use node::{entity_fields, extract, Fields, Node, ATTRIBUTES_KEY, TEXT_KEY};
