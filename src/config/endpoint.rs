//! Endpoint resolution from account identity and network mode.

/// Suffix appended to the region segment for the classic internal network.
pub const INTERNAL_SUFFIX: &str = "-internal";

/// Suffix appended to the region segment for VPC access.
pub const VPC_SUFFIX: &str = "-vpc";

/// Network-mode flags that shape the endpoint.
///
/// The three flags are independent. `secure` only picks the URL scheme;
/// `internal` and `vpc` change the host name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct NetworkOptions {
    /// Use `https` instead of `http`.
    pub secure: bool,
    /// Address the internal network endpoint.
    pub internal: bool,
    /// Address the VPC endpoint.
    pub vpc: bool,
}

/// The derived service host and base URL.
///
/// # Example
///
/// ```rust
/// use mns::{Endpoint, NetworkOptions};
///
/// let endpoint = Endpoint::resolve(
///     "1234567890",
///     "cn-hangzhou",
///     NetworkOptions { secure: true, internal: true, vpc: false },
/// );
/// assert_eq!(endpoint.domain(), "1234567890.mns.cn-hangzhou-internal.aliyuncs.com");
/// assert_eq!(endpoint.url(), "https://1234567890.mns.cn-hangzhou-internal.aliyuncs.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    url: String,
    domain: String,
}

impl Endpoint {
    /// Derives the endpoint for an account in a region.
    ///
    /// Inputs are not validated. The internal suffix is applied before the
    /// VPC suffix when both flags are set.
    #[must_use]
    pub fn resolve(account_id: &str, region: &str, options: NetworkOptions) -> Self {
        let scheme = if options.secure { "https" } else { "http" };

        let mut region = region.to_string();
        if options.internal {
            region.push_str(INTERNAL_SUFFIX);
        }
        if options.vpc {
            region.push_str(VPC_SUFFIX);
        }

        let domain = format!("{account_id}.mns.{region}.aliyuncs.com");
        Self {
            url: format!("{scheme}://{domain}"),
            domain,
        }
    }

    /// Returns the base URL, without a trailing slash.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the host name sent in the `host` header.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }
}
