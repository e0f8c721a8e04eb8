//! The signed request entry point shared by every MNS operation.

use std::sync::Arc;

use chrono::Utc;

use crate::auth::{authorization_header, content_md5, sign, HeaderSet};
use crate::clients::errors::MnsError;
use crate::clients::http_request::{HttpMethod, RequestOptions, TransportRequest};
use crate::clients::http_response::MnsResponse;
use crate::clients::response_mapper::{map_response, RequestContext};
use crate::clients::transport::{send_with_retry, ReqwestTransport, Transport};
use crate::config::{Endpoint, MnsConfig};

/// MNS API version sent in `x-mns-version`.
pub const API_VERSION: &str = "2015-06-06";

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Content type of every request body.
pub const XML_CONTENT_TYPE: &str = "text/xml";

/// RFC 1123 date layout used by the `date` and `x-mns-date` headers.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Client for the MNS API.
///
/// The client handles:
/// - Endpoint resolution from the account, region and network flags
/// - Per-request `date`, `host`, `x-mns-*` and body headers
/// - HMAC-SHA1 request signing
/// - Bounded retries of transport failures
/// - XML response mapping and service error conversion
///
/// Queue, message, topic and subscription operations are methods on this
/// type; see [`crate::resources`].
///
/// # Thread Safety
///
/// `MnsClient` is `Send + Sync` and cheap to clone. Calls share nothing
/// mutable, so one client can serve many concurrent tasks.
///
/// # Example
///
/// ```rust,ignore
/// use mns::{AccessKeyId, AccessKeySecret, MnsClient, MnsConfig};
///
/// let config = MnsConfig::builder()
///     .account_id("1234567890")
///     .region("cn-hangzhou")
///     .access_key_id(AccessKeyId::new("key-id")?)
///     .access_key_secret(AccessKeySecret::new("secret")?)
///     .build()?;
///
/// let client = MnsClient::new(config);
/// let location = client.create_queue("orders", None).await?;
/// ```
#[derive(Clone, Debug)]
pub struct MnsClient {
    config: MnsConfig,
    endpoint: Endpoint,
    base_url: String,
    transport: Arc<dyn Transport>,
    user_agent: String,
}

// Verify MnsClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MnsClient>();
};

impl MnsClient {
    /// Creates a client that sends requests with `reqwest`.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created.
    #[must_use]
    pub fn new(config: MnsConfig) -> Self {
        let transport = Arc::new(ReqwestTransport::new(&config));
        Self::with_transport(config, transport)
    }

    /// Creates a client that sends requests through the given transport.
    #[must_use]
    pub fn with_transport(config: MnsConfig, transport: Arc<dyn Transport>) -> Self {
        let endpoint = config.endpoint();
        let base_url = config
            .endpoint_override()
            .map_or_else(|| endpoint.url().to_string(), String::from);

        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}mns-sdk-rust/{SDK_VERSION}");

        Self {
            config,
            endpoint,
            base_url,
            transport,
            user_agent,
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &MnsConfig {
        &self.config
    }

    /// Returns the endpoint derived from the configuration.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the `user-agent` header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Sends a signed request and maps the response.
    ///
    /// `resource` is the path plus query string; it is appended to the base
    /// URL and signed exactly as given. `entity` names the response root
    /// element whose fields become [`MnsResponse::body`].
    ///
    /// # Errors
    ///
    /// - [`MnsError::Transport`] if every attempt failed without a response
    /// - [`MnsError::Service`] if the service answered with an `Error` document
    /// - [`MnsError::Parse`] if an XML response body is malformed
    pub async fn request(
        &self,
        method: HttpMethod,
        resource: &str,
        entity: &str,
        body: Vec<u8>,
        options: RequestOptions,
    ) -> Result<MnsResponse, MnsError> {
        let date = Utc::now().format(HTTP_DATE_FORMAT).to_string();
        let headers = self.build_headers(method, resource, &body, &date, &options.custom_headers);

        let request = TransportRequest {
            method,
            url: format!("{}{}", self.base_url, resource),
            headers,
            body,
            timeout: options.timeout.unwrap_or_else(|| self.config.timeout()),
        };
        let retries = options.retries.unwrap_or_else(|| self.config.retries());

        let raw = send_with_retry(
            self.transport.as_ref(),
            &request,
            retries,
            self.config.retry_delay(),
        )
        .await?;

        let context = RequestContext {
            method,
            url: &request.url,
        };
        map_response(raw, &context, entity, &options.exposed_headers)
    }

    /// Builds the full header list, including `authorization`.
    fn build_headers(
        &self,
        method: HttpMethod,
        resource: &str,
        body: &[u8],
        date: &str,
        custom_headers: &[(String, String)],
    ) -> Vec<(String, String)> {
        let mut headers = HeaderSet::new();
        headers.insert("date", date);
        headers.insert("host", self.endpoint.domain());
        headers.insert("x-mns-date", date);
        headers.insert("x-mns-version", API_VERSION);

        if method.sends_body() {
            headers.insert("content-length", body.len().to_string());
            headers.insert("content-type", XML_CONTENT_TYPE);
            headers.insert("content-md5", content_md5(body));
        }

        for (name, value) in custom_headers {
            headers.insert(name, value.as_str());
        }

        let signature = sign(
            method.as_str(),
            &headers,
            resource,
            self.config.access_key_secret().as_ref(),
        );
        headers.insert(
            "authorization",
            authorization_header(self.config.access_key_id().as_ref(), &signature),
        );
        headers.insert("user-agent", self.user_agent.as_str());

        headers
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_signature;
    use crate::config::{AccessKeyId, AccessKeySecret};

    const DATE: &str = "Thu, 17 Mar 2016 12:00:00 GMT";

    fn create_test_config() -> MnsConfig {
        MnsConfig::builder()
            .account_id("123")
            .region("cn-hangzhou")
            .access_key_id(AccessKeyId::new("key-id").unwrap())
            .access_key_secret(AccessKeySecret::new("secret").unwrap())
            .build()
            .unwrap()
    }

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn header_set(headers: &[(String, String)]) -> HeaderSet {
        headers
            .iter()
            .filter(|(name, _)| name != "authorization" && name != "user-agent")
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    #[test]
    fn test_client_uses_derived_endpoint() {
        let client = MnsClient::new(create_test_config());
        assert_eq!(client.base_url(), "http://123.mns.cn-hangzhou.aliyuncs.com");
        assert_eq!(client.endpoint().domain(), "123.mns.cn-hangzhou.aliyuncs.com");
    }

    #[test]
    fn test_endpoint_override_replaces_base_url_only() {
        let config = MnsConfig::builder()
            .account_id("123")
            .region("cn-hangzhou")
            .access_key_id(AccessKeyId::new("key-id").unwrap())
            .access_key_secret(AccessKeySecret::new("secret").unwrap())
            .endpoint("http://127.0.0.1:9000/")
            .build()
            .unwrap();
        let client = MnsClient::new(config);

        assert_eq!(client.base_url(), "http://127.0.0.1:9000");
        let headers = client.build_headers(HttpMethod::Get, "/queues", &[], DATE, &[]);
        assert_eq!(
            header(&headers, "host"),
            Some("123.mns.cn-hangzhou.aliyuncs.com")
        );
    }

    #[test]
    fn test_get_headers_have_no_body_fields() {
        let client = MnsClient::new(create_test_config());
        let headers = client.build_headers(HttpMethod::Get, "/queues", &[], DATE, &[]);

        assert_eq!(header(&headers, "date"), Some(DATE));
        assert_eq!(header(&headers, "x-mns-date"), Some(DATE));
        assert_eq!(header(&headers, "x-mns-version"), Some(API_VERSION));
        assert!(header(&headers, "content-md5").is_none());
        assert!(header(&headers, "content-type").is_none());
        assert!(header(&headers, "content-length").is_none());
    }

    #[test]
    fn test_body_headers_for_put() {
        let client = MnsClient::new(create_test_config());
        let body = b"<Queue/>";
        let headers = client.build_headers(HttpMethod::Put, "/queues/q", body, DATE, &[]);

        assert_eq!(header(&headers, "content-length"), Some("8"));
        assert_eq!(header(&headers, "content-type"), Some(XML_CONTENT_TYPE));
        assert_eq!(
            header(&headers, "content-md5").map(String::from),
            Some(content_md5(body))
        );
    }

    #[test]
    fn test_delete_with_empty_body_still_sends_body_headers() {
        let client = MnsClient::new(create_test_config());
        let headers = client.build_headers(HttpMethod::Delete, "/queues/q", &[], DATE, &[]);
        assert_eq!(header(&headers, "content-length"), Some("0"));
        assert_eq!(
            header(&headers, "content-md5"),
            Some("1B2M2Y8AsgTpgAmY7PhCfg==")
        );
    }

    #[test]
    fn test_authorization_signs_custom_mns_headers() {
        let client = MnsClient::new(create_test_config());
        let custom = vec![("X-MNS-Prefix".to_string(), "orders".to_string())];
        let headers = client.build_headers(HttpMethod::Get, "/queues", &[], DATE, &custom);

        assert_eq!(header(&headers, "x-mns-prefix"), Some("orders"));

        let authorization = header(&headers, "authorization").unwrap();
        let signature = authorization.strip_prefix("MNS key-id:").unwrap();
        assert!(verify_signature(
            "GET",
            &header_set(&headers),
            "/queues",
            "secret",
            signature
        ));
        assert!(!verify_signature(
            "GET",
            &header_set(&headers),
            "/topics",
            "secret",
            signature
        ));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = MnsConfig::builder()
            .account_id("123")
            .region("cn-hangzhou")
            .access_key_id(AccessKeyId::new("key-id").unwrap())
            .access_key_secret(AccessKeySecret::new("secret").unwrap())
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();
        let client = MnsClient::new(config);

        assert!(client.user_agent().starts_with("MyApp/1.0 | "));
        assert!(client.user_agent().ends_with(&format!("mns-sdk-rust/{SDK_VERSION}")));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MnsClient>();
    }
}
