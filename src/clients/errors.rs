//! Request error types for the MNS SDK.
//!
//! # Error Handling
//!
//! Every request resolves to `Result<_, MnsError>`. The variants keep
//! "the service rejected this operation" apart from "the transport or
//! protocol malfunctioned":
//!
//! - [`MnsError::Service`]: the service answered with an `Error` envelope
//! - [`MnsError::Transport`]: no response after the retry budget was spent
//! - [`MnsError::Parse`]: a body labelled as XML could not be parsed
//! - [`MnsError::Encode`]: the request body could not be built
//! - [`MnsError::UnexpectedBody`]: the body did not fit the typed response
//!
//! # Example
//!
//! ```rust,ignore
//! use mns::{MnsError, ServiceErrorKind};
//!
//! match client.get_queue_attributes("orders").await {
//!     Ok(attributes) => println!("{:?}", attributes.active_messages),
//!     Err(MnsError::Service(e)) if e.kind() == ServiceErrorKind::QueueNotExist => {
//!         println!("queue is gone: {}", e.request_id);
//!     }
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::clients::http_response::RawResponse;
use crate::xml::XmlError;

/// Error codes the service is documented to return.
///
/// Codes not listed here are kept verbatim in [`ServiceErrorKind::Other`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// Access denied for the given credentials.
    AccessDenied,
    /// Request parameters were rejected.
    InvalidArgument,
    /// The request body was not well-formed XML.
    MalformedXml,
    /// The service hit an internal error.
    InternalError,
    /// The signature did not match the request.
    SignatureDoesNotMatch,
    /// The request date is too far from the service clock.
    TimeExpired,
    /// The request rate limit was exceeded.
    QpsLimitExceeded,
    /// The queue already exists with different attributes.
    QueueAlreadyExist,
    /// The queue does not exist.
    QueueNotExist,
    /// The queue has no message to receive or peek.
    MessageNotExist,
    /// The receipt handle is invalid or expired.
    ReceiptHandleError,
    /// The topic already exists with different attributes.
    TopicAlreadyExist,
    /// The topic does not exist.
    TopicNotExist,
    /// The subscription already exists with different attributes.
    SubscriptionAlreadyExist,
    /// The subscription does not exist.
    SubscriptionNotExist,
    /// Any other service error code.
    Other(String),
}

impl ServiceErrorKind {
    /// Maps a service error code to its kind.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "AccessDenied" => Self::AccessDenied,
            "InvalidArgument" => Self::InvalidArgument,
            "MalformedXML" => Self::MalformedXml,
            "InternalError" => Self::InternalError,
            "SignatureDoesNotMatch" => Self::SignatureDoesNotMatch,
            "TimeExpired" => Self::TimeExpired,
            "QpsLimitExceeded" => Self::QpsLimitExceeded,
            "QueueAlreadyExist" => Self::QueueAlreadyExist,
            "QueueNotExist" => Self::QueueNotExist,
            "MessageNotExist" => Self::MessageNotExist,
            "ReceiptHandleError" => Self::ReceiptHandleError,
            "TopicAlreadyExist" => Self::TopicAlreadyExist,
            "TopicNotExist" => Self::TopicNotExist,
            "SubscriptionAlreadyExist" => Self::SubscriptionAlreadyExist,
            "SubscriptionNotExist" => Self::SubscriptionNotExist,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Error returned when the service answers with an `Error` envelope.
///
/// `code` is the machine-readable discriminator; the other fields are for
/// diagnostics and support requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{method} {url} failed with {status}. requestid: {request_id}, hostid: {host_id}, message: {message}")]
pub struct ServiceError {
    /// The service error code, e.g. `QueueNotExist`.
    pub code: String,
    /// The human-readable message from the service.
    pub message: String,
    /// The request id assigned by the service.
    pub request_id: String,
    /// The host that served the request.
    pub host_id: String,
    /// The HTTP status code of the response.
    pub status: u16,
    /// The HTTP method of the failed request.
    pub method: String,
    /// The full URL of the failed request.
    pub url: String,
}

impl ServiceError {
    /// Returns the typed kind of this error's code.
    #[must_use]
    pub fn kind(&self) -> ServiceErrorKind {
        ServiceErrorKind::from_code(&self.code)
    }

    /// Returns the conventional error name, `MNS<Code>Err`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("MNS{}Err", self.code)
    }
}

/// What went wrong in the HTTP transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The connection could not be established.
    Connect,
    /// The request or response timed out.
    Timeout,
    /// The response body could not be read.
    Body,
    /// Any other transport failure.
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connection error"),
            Self::Timeout => write!(f, "timeout"),
            Self::Body => write!(f, "body error"),
            Self::Other => write!(f, "transport error"),
        }
    }
}

/// Error returned by a [`Transport`](crate::clients::Transport) attempt.
///
/// A failure may carry the partial response received before it happened.
/// When the retry budget runs out, that response becomes the call's result.
#[derive(Debug, Error)]
#[error("{kind}: {source}")]
pub struct TransportError {
    kind: TransportErrorKind,
    #[source]
    source: Box<dyn StdError + Send + Sync>,
    response: Option<RawResponse>,
}

impl TransportError {
    /// Creates a transport error without an attached response.
    pub fn new(
        kind: TransportErrorKind,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            kind,
            source: source.into(),
            response: None,
        }
    }

    /// Attaches the response received before the failure.
    #[must_use]
    pub fn with_response(mut self, response: RawResponse) -> Self {
        self.response = Some(response);
        self
    }

    /// Returns the failure kind.
    #[must_use]
    pub const fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    /// Returns the attached response, if any.
    #[must_use]
    pub const fn response(&self) -> Option<&RawResponse> {
        self.response.as_ref()
    }

    /// Takes the attached response out of the error.
    #[must_use]
    pub fn into_response(self) -> Option<RawResponse> {
        self.response
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            TransportErrorKind::Timeout
        } else if error.is_connect() {
            TransportErrorKind::Connect
        } else if error.is_body() || error.is_decode() {
            TransportErrorKind::Body
        } else {
            TransportErrorKind::Other
        };
        Self::new(kind, error)
    }
}

/// Unified error type for MNS requests.
#[derive(Debug, Error)]
pub enum MnsError {
    /// The service rejected the operation.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The transport failed and no response was available.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A response labelled as XML could not be parsed.
    #[error("failed to parse XML response: {0}")]
    Parse(#[source] XmlError),

    /// The request body could not be encoded.
    #[error("failed to encode XML request: {0}")]
    Encode(#[source] XmlError),

    /// The response body does not match the expected entity shape.
    #[error("unexpected <{entity}> response body: {reason}")]
    UnexpectedBody {
        /// The entity the operation expected.
        entity: String,
        /// Why the body could not be used.
        reason: String,
    },
}

impl MnsError {
    /// Returns the service error, if the service rejected the request.
    #[must_use]
    pub const fn as_service_error(&self) -> Option<&ServiceError> {
        match self {
            Self::Service(error) => Some(error),
            _ => None,
        }
    }

    /// Returns the service error code, if the service rejected the request.
    #[must_use]
    pub fn service_code(&self) -> Option<&str> {
        self.as_service_error().map(|error| error.code.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_service_error() -> ServiceError {
        ServiceError {
            code: "QueueNotExist".to_string(),
            message: "The queue you want to access does not exist.".to_string(),
            request_id: "r1".to_string(),
            host_id: "h1".to_string(),
            status: 404,
            method: "GET".to_string(),
            url: "http://123.mns.cn-hangzhou.aliyuncs.com/queues/q".to_string(),
        }
    }

    #[test]
    fn test_service_error_message_includes_diagnostics() {
        let message = sample_service_error().to_string();
        assert_eq!(
            message,
            "GET http://123.mns.cn-hangzhou.aliyuncs.com/queues/q failed with 404. \
             requestid: r1, hostid: h1, message: The queue you want to access does not exist."
        );
    }

    #[test]
    fn test_service_error_kind_and_name() {
        let error = sample_service_error();
        assert_eq!(error.kind(), ServiceErrorKind::QueueNotExist);
        assert_eq!(error.name(), "MNSQueueNotExistErr");
    }

    #[test]
    fn test_unknown_code_is_kept() {
        assert_eq!(
            ServiceErrorKind::from_code("SomethingNew"),
            ServiceErrorKind::Other("SomethingNew".to_string())
        );
        assert_eq!(
            ServiceErrorKind::from_code("MalformedXML"),
            ServiceErrorKind::MalformedXml
        );
    }

    #[test]
    fn test_transport_error_carries_response() {
        let response = RawResponse::new(503, Default::default(), Vec::new());
        let error = TransportError::new(TransportErrorKind::Body, "connection reset")
            .with_response(response);
        assert_eq!(error.kind(), TransportErrorKind::Body);
        assert_eq!(error.response().map(|r| r.status), Some(503));
        assert_eq!(error.to_string(), "body error: connection reset");
        assert_eq!(error.into_response().map(|r| r.status), Some(503));
    }

    #[test]
    fn test_mns_error_service_code() {
        let error = MnsError::from(sample_service_error());
        assert_eq!(error.service_code(), Some("QueueNotExist"));

        let error = MnsError::from(TransportError::new(TransportErrorKind::Timeout, "slow"));
        assert!(error.service_code().is_none());
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let _: &dyn std::error::Error = &sample_service_error();
        let _: &dyn std::error::Error =
            &TransportError::new(TransportErrorKind::Other, "boom");
        let _: &dyn std::error::Error = &MnsError::UnexpectedBody {
            entity: "Queue".to_string(),
            reason: "missing field".to_string(),
        };
    }
}
