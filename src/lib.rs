//! # MNS Rust SDK
//!
//! A Rust SDK for the Aliyun Message Service (MNS), covering queues,
//! messages, topics and subscriptions over the MNS HTTP+XML API.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`MnsConfig`] and [`MnsConfigBuilder`]
//! - Endpoint resolution for public, internal and VPC networks
//! - HMAC-SHA1 request signing via [`auth`]
//! - An XML codec for the MNS wire format via [`xml`]
//! - An async client with bounded retries of transport failures
//! - Typed service errors ([`ServiceError`]) kept apart from transport and
//!   protocol failures in [`MnsError`]
//!
//! ## Quick Start
//!
//! ```rust
//! use mns::{AccessKeyId, AccessKeySecret, MnsClient, MnsConfig};
//!
//! let config = MnsConfig::builder()
//!     .account_id("1234567890")
//!     .region("cn-hangzhou")
//!     .access_key_id(AccessKeyId::new("your-key-id").unwrap())
//!     .access_key_secret(AccessKeySecret::new("your-secret").unwrap())
//!     .secure(true)
//!     .build()
//!     .unwrap();
//!
//! let client = MnsClient::new(config);
//! assert_eq!(client.base_url(), "https://1234567890.mns.cn-hangzhou.aliyuncs.com");
//! ```
//!
//! ## Sending and Receiving
//!
//! ```rust,ignore
//! use mns::resources::MessageParams;
//! use mns::{MnsError, ServiceErrorKind};
//!
//! client.create_queue("orders", None).await?;
//! client.send_message("orders", &MessageParams::new("order #1")).await?;
//!
//! match client.receive_message("orders", Some(30)).await {
//!     Ok(message) => {
//!         println!("{}", message.message_body);
//!         client
//!             .delete_message("orders", message.receipt_handle.as_deref().unwrap_or_default())
//!             .await?;
//!     }
//!     Err(MnsError::Service(e)) if e.kind() == ServiceErrorKind::MessageNotExist => {
//!         println!("queue is empty");
//!     }
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: every client owns its configuration and transport
//! - **Fail-fast validation**: credentials are validated on construction
//! - **Async-first**: designed for use with the Tokio runtime
//! - **Pluggable transport**: [`MnsClient::with_transport`] accepts any
//!   [`clients::Transport`] implementation

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod resources;
pub mod xml;

// Re-export public types at crate root for convenience
pub use config::{AccessKeyId, AccessKeySecret, Endpoint, MnsConfig, MnsConfigBuilder, NetworkOptions};
pub use error::ConfigError;

// Re-export client types
pub use clients::{
    HttpMethod, MnsClient, MnsError, MnsResponse, RequestOptions, ServiceError, ServiceErrorKind,
    TransportError, TransportErrorKind,
};

// Re-export XML types used in request parameters
pub use xml::{Node, XmlError, XmlFields};
