//! HTTP response types for the MNS SDK.

use std::collections::HashMap;

use crate::xml::{Fields, Node};

/// A response as returned by a transport, before any XML handling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: u16,
    /// Response headers keyed by lowercase name (headers may repeat).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Creates a raw response, lowercasing header names.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, Vec<String>>, body: Vec<u8>) -> Self {
        let headers = headers
            .into_iter()
            .fold(HashMap::new(), |mut acc: HashMap<String, Vec<String>>, (name, values)| {
                acc.entry(name.to_ascii_lowercase())
                    .or_default()
                    .extend(values);
                acc
            });
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns the first value of a header, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `content-type` header, or an empty string.
    #[must_use]
    pub fn content_type(&self) -> &str {
        self.header("content-type").unwrap_or_default()
    }

    /// Returns `true` if the content type is an XML media type.
    #[must_use]
    pub fn is_xml(&self) -> bool {
        let content_type = self.content_type();
        content_type.starts_with("text/xml") || content_type.starts_with("application/xml")
    }

    /// Returns the `x-mns-request-id` header, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-mns-request-id")
    }
}

/// The mapped result of an MNS request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MnsResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Only the response headers the caller asked for, keyed as requested.
    pub headers: HashMap<String, String>,
    /// The extracted fields of the expected entity, if the body was XML.
    pub body: Option<Fields>,
}

impl MnsResponse {
    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns an exposed header by the name it was requested under.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Returns a body field, if present.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Node> {
        self.body.as_ref().and_then(|body| body.get(name))
    }
}
