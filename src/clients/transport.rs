//! HTTP transport and the bounded retry loop.
//!
//! [`Transport`] is the seam between request construction and the network.
//! [`ReqwestTransport`] is the production implementation; tests and local
//! emulators can plug in their own through
//! [`MnsClient::with_transport`](crate::clients::MnsClient::with_transport).

use std::collections::HashMap;
use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::clients::errors::TransportError;
use crate::clients::http_request::{HttpMethod, TransportRequest};
use crate::clients::http_response::RawResponse;
use crate::config::MnsConfig;

/// Sends one fully signed request.
///
/// Returning `Ok` means a response arrived, whatever its status code. An
/// `Err` is a transport-level failure (connect, timeout, body read) and may
/// carry the partial response received before the failure.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Performs a single attempt.
    async fn send(&self, request: &TransportRequest) -> Result<RawResponse, TransportError>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

// Verify ReqwestTransport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ReqwestTransport>();
};

impl ReqwestTransport {
    /// Creates a transport for the given configuration.
    ///
    /// With keep-alive disabled, idle connections are never pooled.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(config: &MnsConfig) -> Self {
        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if !config.keep_alive() {
            builder = builder.pool_max_idle_per_host(0);
        }
        let client = builder.build().expect("Failed to create HTTP client");
        Self { client }
    }

    /// Wraps an already configured `reqwest` client.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &TransportRequest) -> Result<RawResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut req_builder = self
            .client
            .request(method, &request.url)
            .timeout(request.timeout);

        // reqwest derives content-length from the body
        for (name, value) in &request.headers {
            if name.eq_ignore_ascii_case("content-length") {
                continue;
            }
            req_builder = req_builder.header(name.as_str(), value.as_str());
        }

        if request.method.sends_body() {
            req_builder = req_builder.body(request.body.clone());
        }

        let res = req_builder.send().await?;

        let status = res.status().as_u16();
        let partial = RawResponse::new(
            status,
            Self::parse_response_headers(res.headers()),
            Vec::new(),
        );

        match res.bytes().await {
            Ok(body) => Ok(RawResponse {
                body: body.to_vec(),
                ..partial
            }),
            Err(error) => Err(TransportError::from(error).with_response(partial)),
        }
    }
}

/// Sends a request, retrying transport failures up to `retries` times.
///
/// Each retry re-sends the full request. An HTTP error status is a
/// successful attempt and is never retried. When the budget is spent, a
/// response attached to the last error is returned as `Ok`; otherwise the
/// last error is returned.
///
/// # Errors
///
/// Returns the last [`TransportError`] if every attempt failed without a
/// response.
pub async fn send_with_retry(
    transport: &dyn Transport,
    request: &TransportRequest,
    retries: u32,
    delay: Duration,
) -> Result<RawResponse, TransportError> {
    let max_attempts = retries.saturating_add(1);
    let mut attempt: u32 = 1;
    loop {
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            attempt,
            "sending MNS request"
        );

        let error = match transport.send(request).await {
            Ok(response) => return Ok(response),
            Err(error) => error,
        };

        if attempt >= max_attempts {
            return match error.response().cloned() {
                Some(response) => {
                    tracing::warn!(
                        "{} {} failed after {} attempts ({}), using response with status {} (request id: {})",
                        request.method,
                        request.url,
                        attempt,
                        error,
                        response.status,
                        response.request_id().unwrap_or("none")
                    );
                    Ok(response)
                }
                None => Err(error),
            };
        }

        tracing::warn!(
            "{} {} attempt {} failed: {}, retrying",
            request.method,
            request.url,
            attempt,
            error
        );
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        attempt += 1;
    }
}
