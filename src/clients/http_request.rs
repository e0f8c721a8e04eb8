//! HTTP request types for the MNS SDK.
//!
//! [`RequestOptions`] carries the per-call knobs of
//! [`MnsClient::request`](crate::clients::MnsClient::request);
//! [`TransportRequest`] is the fully signed request handed to a
//! [`Transport`](crate::clients::Transport).

use std::fmt;
use std::time::Duration;

/// HTTP methods used by the MNS API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for reading resources and receiving messages.
    Get,
    /// HTTP POST method for sending and publishing messages.
    Post,
    /// HTTP PUT method for creating and updating resources.
    Put,
    /// HTTP DELETE method for removing resources and messages.
    Delete,
}

impl HttpMethod {
    /// Returns the method verb as it appears on the wire and in signatures.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Returns `true` if requests with this method carry body headers
    /// (`content-length`, `content-type`, `content-md5`).
    #[must_use]
    pub const fn sends_body(&self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call options for [`MnsClient::request`](crate::clients::MnsClient::request).
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use mns::clients::RequestOptions;
///
/// let options = RequestOptions::new()
///     .header("x-mns-prefix", "orders-")
///     .expose_header("Location")
///     .timeout(Duration::from_secs(31))
///     .retries(0);
///
/// assert_eq!(options.custom_headers.len(), 1);
/// assert_eq!(options.retries, Some(0));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Extra headers; `x-mns-*` names take part in the signature.
    pub custom_headers: Vec<(String, String)>,
    /// Response headers to copy into [`MnsResponse::headers`](crate::clients::MnsResponse).
    pub exposed_headers: Vec<String>,
    /// Timeout for this call instead of the client default.
    pub timeout: Option<Duration>,
    /// Retry budget for this call instead of the client default.
    pub retries: Option<u32>,
}

impl RequestOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Adds a custom request header when a value is present.
    #[must_use]
    pub fn optional_header<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.header(name, value.to_string()),
            None => self,
        }
    }

    /// Asks for a response header to be returned.
    #[must_use]
    pub fn expose_header(mut self, name: impl Into<String>) -> Self {
        self.exposed_headers.push(name.into());
        self
    }

    /// Overrides the timeout for this call.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the retry budget for this call.
    #[must_use]
    pub const fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }
}

/// A signed request ready to be sent by a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The absolute URL including the query string.
    pub url: String,
    /// Headers in name order, including `authorization`.
    pub headers: Vec<(String, String)>,
    /// The request body; empty for bodiless requests.
    pub body: Vec<u8>,
    /// Timeout for each attempt.
    pub timeout: Duration,
}

impl TransportRequest {
    /// Returns a header value by name, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_display_is_uppercase() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(HttpMethod::Put.to_string(), "PUT");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_only_get_omits_body_headers() {
        assert!(!HttpMethod::Get.sends_body());
        assert!(HttpMethod::Post.sends_body());
        assert!(HttpMethod::Put.sends_body());
        assert!(HttpMethod::Delete.sends_body());
    }

    #[test]
    fn test_options_default_is_empty() {
        let options = RequestOptions::new();
        assert!(options.custom_headers.is_empty());
        assert!(options.exposed_headers.is_empty());
        assert!(options.timeout.is_none());
        assert!(options.retries.is_none());
    }

    #[test]
    fn test_optional_header_skips_none() {
        let options = RequestOptions::new()
            .optional_header("x-mns-marker", None::<String>)
            .optional_header("x-mns-ret-number", Some(10));
        assert_eq!(
            options.custom_headers,
            vec![("x-mns-ret-number".to_string(), "10".to_string())]
        );
    }

    #[test]
    fn test_transport_request_header_lookup() {
        let request = TransportRequest {
            method: HttpMethod::Get,
            url: "http://localhost/queues".to_string(),
            headers: vec![("content-type".to_string(), "text/xml".to_string())],
            body: Vec::new(),
            timeout: Duration::from_secs(1),
        };
        assert_eq!(request.header("Content-Type"), Some("text/xml"));
        assert!(request.header("content-md5").is_none());
    }
}
