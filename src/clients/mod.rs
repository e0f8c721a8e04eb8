//! Signed request transport for the MNS API.
//!
//! This module turns a logical operation into an authenticated HTTP call and
//! the XML answer into structured data or a typed error.
//!
//! # Overview
//!
//! - [`MnsClient`]: builds headers, signs, sends and maps every request
//! - [`RequestOptions`]: per-call headers, exposed response headers, timeout
//!   and retry budget
//! - [`Transport`] / [`ReqwestTransport`]: the network seam and its default
//!   implementation
//! - [`send_with_retry`]: the bounded retry loop
//! - [`map_response`]: XML decoding, `Error` documents and header allow-list
//! - [`MnsError`]: the unified error type
//!
//! # Example
//!
//! ```rust,ignore
//! use mns::clients::{HttpMethod, RequestOptions};
//!
//! let response = client
//!     .request(
//!         HttpMethod::Get,
//!         "/queues",
//!         "Queues",
//!         Vec::new(),
//!         RequestOptions::new().header("x-mns-prefix", "orders-"),
//!     )
//!     .await?;
//! println!("{:?}", response.body);
//! ```
//!
//! # Retry Behavior
//!
//! Only transport failures are retried (connect errors, timeouts, broken
//! bodies). Any HTTP status, including 5xx, is a completed attempt. The
//! default budget is 3 extra attempts with no pause in between; both are
//! configurable on [`MnsConfig`](crate::MnsConfig) and the budget can be
//! overridden per call.

mod errors;
mod http_request;
mod http_response;
mod mns_client;
mod response_mapper;
mod transport;

pub use errors::{MnsError, ServiceError, ServiceErrorKind, TransportError, TransportErrorKind};
pub use http_request::{HttpMethod, RequestOptions, TransportRequest};
pub use http_response::{MnsResponse, RawResponse};
pub use mns_client::{MnsClient, API_VERSION, SDK_VERSION, XML_CONTENT_TYPE};
pub use response_mapper::{map_response, RequestContext, ERROR_ENTITY};
pub use transport::{send_with_retry, ReqwestTransport, Transport};
