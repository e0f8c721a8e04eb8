//! XML codec error types.

use std::io;

use thiserror::Error;

/// Errors that can occur while encoding or decoding MNS XML.
#[derive(Debug, Error)]
pub enum XmlError {
    /// An I/O error during XML writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// An error from quick-xml attribute handling.
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Element names or text were not valid UTF-8.
    #[error("invalid UTF-8 in XML: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The document is structurally malformed.
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// A sequence was encoded without the name of its child element.
    #[error("cannot encode a sequence under <{root}> without a child element name")]
    MissingChildName {
        /// The root element being encoded.
        root: String,
    },
}
