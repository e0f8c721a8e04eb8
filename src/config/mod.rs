//! Configuration types for the MNS SDK.
//!
//! This module provides the client identity used to sign and route every
//! request.
//!
//! # Overview
//!
//! - [`MnsConfig`]: The immutable client identity (account, region, credentials, flags)
//! - [`MnsConfigBuilder`]: A builder for constructing [`MnsConfig`] instances
//! - [`AccessKeyId`] / [`AccessKeySecret`]: Validated credential newtypes
//! - [`Endpoint`] / [`NetworkOptions`]: Endpoint resolution from the identity
//!
//! # Example
//!
//! ```rust
//! use mns::{MnsConfig, AccessKeyId, AccessKeySecret};
//!
//! let config = MnsConfig::builder()
//!     .account_id("1234567890")
//!     .region("cn-hangzhou")
//!     .access_key_id(AccessKeyId::new("my-key-id").unwrap())
//!     .access_key_secret(AccessKeySecret::new("my-secret").unwrap())
//!     .secure(true)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.retries(), 3);
//! ```

mod endpoint;
mod newtypes;

pub use endpoint::{Endpoint, NetworkOptions, INTERNAL_SUFFIX, VPC_SUFFIX};
pub use newtypes::{AccessKeyId, AccessKeySecret};

use std::time::Duration;

use crate::error::ConfigError;

/// Default number of additional attempts after a transport failure.
pub const DEFAULT_RETRIES: u32 = 3;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for an MNS client.
///
/// Holds the account identity, credentials, network-mode flags and
/// transport tuning. Immutable once built.
///
/// # Thread Safety
///
/// `MnsConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct MnsConfig {
    account_id: String,
    region: String,
    access_key_id: AccessKeyId,
    access_key_secret: AccessKeySecret,
    network: NetworkOptions,
    retries: u32,
    retry_delay: Duration,
    timeout: Duration,
    keep_alive: bool,
    endpoint_override: Option<String>,
    user_agent_prefix: Option<String>,
}

impl MnsConfig {
    /// Creates a new builder for constructing an `MnsConfig`.
    #[must_use]
    pub fn builder() -> MnsConfigBuilder {
        MnsConfigBuilder::new()
    }

    /// Returns the account id.
    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Returns the region, e.g. `cn-hangzhou`.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Returns the access key id.
    #[must_use]
    pub const fn access_key_id(&self) -> &AccessKeyId {
        &self.access_key_id
    }

    /// Returns the access key secret.
    #[must_use]
    pub const fn access_key_secret(&self) -> &AccessKeySecret {
        &self.access_key_secret
    }

    /// Returns the network-mode flags.
    #[must_use]
    pub const fn network(&self) -> NetworkOptions {
        self.network
    }

    /// Returns the retry budget for transport failures.
    #[must_use]
    pub const fn retries(&self) -> u32 {
        self.retries
    }

    /// Returns the fixed pause between retry attempts (zero by default).
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Returns the default per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns whether idle connections are kept for reuse.
    #[must_use]
    pub const fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    /// Returns the endpoint override URL, if configured.
    #[must_use]
    pub fn endpoint_override(&self) -> Option<&str> {
        self.endpoint_override.as_deref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Resolves the service endpoint for this identity.
    ///
    /// The endpoint override, if any, is not applied here; it only replaces
    /// the URL requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::resolve(&self.account_id, &self.region, self.network)
    }
}

// Verify MnsConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MnsConfig>();
};

/// Builder for constructing [`MnsConfig`] instances.
///
/// Required fields are `account_id`, `region`, `access_key_id` and
/// `access_key_secret`.
///
/// # Defaults
///
/// - `secure`, `internal`, `vpc`: `false`
/// - `retries`: 3
/// - `retry_delay`: zero (immediate retries)
/// - `timeout`: 30 seconds
/// - `keep_alive`: `true`
/// - `endpoint`: `None` (derived from account and region)
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct MnsConfigBuilder {
    account_id: Option<String>,
    region: Option<String>,
    access_key_id: Option<AccessKeyId>,
    access_key_secret: Option<AccessKeySecret>,
    network: NetworkOptions,
    retries: Option<u32>,
    retry_delay: Option<Duration>,
    timeout: Option<Duration>,
    keep_alive: Option<bool>,
    endpoint_override: Option<String>,
    user_agent_prefix: Option<String>,
}

impl MnsConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the account id (required).
    #[must_use]
    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Sets the region (required).
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets the access key id (required).
    #[must_use]
    pub fn access_key_id(mut self, id: AccessKeyId) -> Self {
        self.access_key_id = Some(id);
        self
    }

    /// Sets the access key secret (required).
    #[must_use]
    pub fn access_key_secret(mut self, secret: AccessKeySecret) -> Self {
        self.access_key_secret = Some(secret);
        self
    }

    /// Selects `https` for the derived endpoint.
    #[must_use]
    pub const fn secure(mut self, secure: bool) -> Self {
        self.network.secure = secure;
        self
    }

    /// Targets the internal network endpoint.
    #[must_use]
    pub const fn internal(mut self, internal: bool) -> Self {
        self.network.internal = internal;
        self
    }

    /// Targets the VPC endpoint.
    #[must_use]
    pub const fn vpc(mut self, vpc: bool) -> Self {
        self.network.vpc = vpc;
        self
    }

    /// Sets the retry budget for transport failures.
    #[must_use]
    pub const fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Sets a fixed pause between retry attempts.
    #[must_use]
    pub const fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Sets the default per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets whether idle connections are kept for reuse.
    #[must_use]
    pub const fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = Some(keep_alive);
        self
    }

    /// Sends requests to this URL instead of the derived endpoint.
    ///
    /// The `host` header and signature still use the derived domain, which
    /// is what proxies and local emulators expect.
    #[must_use]
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint_override = Some(url.into());
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`MnsConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if a required field is
    /// not set, or [`ConfigError::InvalidEndpoint`] if the endpoint override
    /// has no `http://` or `https://` scheme.
    pub fn build(self) -> Result<MnsConfig, ConfigError> {
        let account_id = self.account_id.ok_or(ConfigError::MissingRequiredField {
            field: "account_id",
        })?;
        let region = self
            .region
            .ok_or(ConfigError::MissingRequiredField { field: "region" })?;
        let access_key_id = self
            .access_key_id
            .ok_or(ConfigError::MissingRequiredField {
                field: "access_key_id",
            })?;
        let access_key_secret =
            self.access_key_secret
                .ok_or(ConfigError::MissingRequiredField {
                    field: "access_key_secret",
                })?;

        let endpoint_override = self
            .endpoint_override
            .map(|url| {
                if url.starts_with("http://") || url.starts_with("https://") {
                    Ok(url.trim_end_matches('/').to_string())
                } else {
                    Err(ConfigError::InvalidEndpoint { url })
                }
            })
            .transpose()?;

        Ok(MnsConfig {
            account_id,
            region,
            access_key_id,
            access_key_secret,
            network: self.network,
            retries: self.retries.unwrap_or(DEFAULT_RETRIES),
            retry_delay: self.retry_delay.unwrap_or(Duration::ZERO),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            keep_alive: self.keep_alive.unwrap_or(true),
            endpoint_override,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
