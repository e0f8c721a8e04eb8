//! Error types for the MNS SDK.
//!
//! This module contains error types used throughout the SDK for configuration
//! and validation errors. Request-level errors live in
//! [`clients`](crate::clients) as [`MnsError`](crate::clients::MnsError).
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use mns::{AccessKeyId, ConfigError};
//!
//! let result = AccessKeyId::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAccessKeyId)));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
///
/// Account id and region are accepted as-is and never produce an error here;
/// only credentials and explicitly overridden endpoints are validated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Access key id cannot be empty.
    #[error("Access key id cannot be empty. Please provide a valid MNS access key id.")]
    EmptyAccessKeyId,

    /// Access key secret cannot be empty.
    #[error("Access key secret cannot be empty. Please provide a valid MNS access key secret.")]
    EmptyAccessKeySecret,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Endpoint override is invalid.
    #[error("Invalid endpoint '{url}'. Please provide a URL with scheme (e.g., 'http://127.0.0.1:9000').")]
    InvalidEndpoint {
        /// The invalid URL that was provided.
        url: String,
    },
}
