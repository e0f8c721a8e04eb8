//! Request envelope encoding.
//!
//! Request bodies are small namespaced documents:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Queue xmlns="http://mns.aliyuncs.com/doc/v1/"><DelaySeconds>10</DelaySeconds></Queue>
//! ```
//!
//! Parameters are described with [`XmlFields`], an ordered list of optional
//! values. Absent values are dropped by [`XmlFields::field`], so an empty tag
//! is never written for a missing parameter.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::xml::XmlError;

/// The MNS XML namespace.
pub const MNS_NAMESPACE: &str = "http://mns.aliyuncs.com/doc/v1/";

/// A value that can be written as element content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlValue {
    /// Escaped text content.
    Text(String),
    /// Nested child elements.
    Fields(XmlFields),
}

impl From<&str> for XmlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for XmlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for XmlValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<bool> for XmlValue {
    fn from(value: bool) -> Self {
        Self::Text(value.to_string())
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for XmlValue {
                fn from(value: $ty) -> Self {
                    Self::Text(value.to_string())
                }
            }
        )*
    };
}

impl_from_number!(u8, u16, u32, u64, i32, i64);

impl From<XmlFields> for XmlValue {
    fn from(value: XmlFields) -> Self {
        Self::Fields(value)
    }
}

/// An ordered set of named element values.
///
/// # Example
///
/// ```rust
/// use mns::xml::XmlFields;
///
/// let fields = XmlFields::new()
///     .field("MessageBody", Some("hello"))
///     .field("DelaySeconds", None::<u32>)
///     .field("Priority", Some(8u32));
///
/// assert_eq!(fields.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlFields {
    entries: Vec<(String, XmlValue)>,
}

impl XmlFields {
    /// Creates an empty field set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field if it has a value; `None` is skipped entirely.
    #[must_use]
    pub fn field<V: Into<XmlValue>>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.entries.push((name.into(), value.into()));
        }
        self
    }

    /// Returns the number of present fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &XmlValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

/// Parameters for a request envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlParams {
    /// A flat mapping rendered as child elements of the root.
    Fields(XmlFields),
    /// Items rendered as repeated child elements of one name.
    Sequence(Vec<XmlValue>),
}

impl From<XmlFields> for XmlParams {
    fn from(value: XmlFields) -> Self {
        Self::Fields(value)
    }
}

/// Encodes an envelope with the given root, parameters and child name.
///
/// `child` is required when `params` is a [`XmlParams::Sequence`] and is
/// ignored otherwise.
///
/// # Errors
///
/// Returns [`XmlError::MissingChildName`] for a sequence without `child`,
/// or an I/O error from the writer.
///
/// # Example
///
/// ```rust
/// use mns::xml::{encode, XmlParams, XmlValue};
///
/// let handles = XmlParams::Sequence(vec![XmlValue::from("h1"), XmlValue::from("h2")]);
/// let body = encode("ReceiptHandles", &handles, Some("ReceiptHandle")).unwrap();
/// let text = String::from_utf8(body).unwrap();
/// assert!(text.contains("<ReceiptHandle>h1</ReceiptHandle><ReceiptHandle>h2</ReceiptHandle>"));
/// ```
pub fn encode(root: &str, params: &XmlParams, child: Option<&str>) -> Result<Vec<u8>, XmlError> {
    let mut buf = Vec::with_capacity(256);
    let mut writer = Writer::new(&mut buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new(root).with_attributes([("xmlns", MNS_NAMESPACE)]),
    ))?;

    match params {
        XmlParams::Fields(fields) => write_fields(&mut writer, fields)?,
        XmlParams::Sequence(items) => {
            let child = child.ok_or_else(|| XmlError::MissingChildName {
                root: root.to_string(),
            })?;
            for item in items {
                write_element(&mut writer, child, item)?;
            }
        }
    }

    writer.write_event(Event::End(BytesEnd::new(root)))?;
    Ok(buf)
}

/// Encodes a flat field mapping under `root`.
///
/// # Errors
///
/// Returns an I/O error from the writer.
pub fn encode_fields(root: &str, fields: &XmlFields) -> Result<Vec<u8>, XmlError> {
    encode(root, &XmlParams::Fields(fields.clone()), None)
}

fn write_fields<W: Write>(writer: &mut Writer<W>, fields: &XmlFields) -> Result<(), XmlError> {
    for (name, value) in fields.iter() {
        write_element(writer, name, value)?;
    }
    Ok(())
}

fn write_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &XmlValue,
) -> Result<(), XmlError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    match value {
        XmlValue::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        XmlValue::Fields(fields) => write_fields(writer, fields)?,
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
