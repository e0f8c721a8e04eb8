//! Request signing for the MNS API.
//!
//! Every request carries an `Authorization` header of the form:
//!
//! ```text
//! MNS <AccessKeyId>:<Signature>
//! ```
//!
//! Where `Signature = Base64(HMAC-SHA1(AccessKeySecret, StringToSign))` and:
//!
//! ```text
//! StringToSign = VERB + "\n" +
//!                CONTENT-MD5 + "\n" +
//!                CONTENT-TYPE + "\n" +
//!                DATE + "\n" +
//!                CanonicalizedMNSHeaders +
//!                CanonicalizedResource
//! ```
//!
//! # Example
//!
//! ```rust
//! use mns::auth::{canonicalize, sign, HeaderSet};
//!
//! let mut headers = HeaderSet::new();
//! headers.insert("date", "Thu, 17 Mar 2016 12:00:00 GMT");
//! headers.insert("x-mns-version", "2015-06-06");
//! headers.insert("host", "123.mns.cn-hangzhou.aliyuncs.com");
//!
//! assert_eq!(canonicalize(&headers), "x-mns-version:2015-06-06\n");
//!
//! let first = sign("GET", &headers, "/queues", "secret");
//! let second = sign("GET", &headers, "/queues", "secret");
//! assert_eq!(first, second);
//! ```

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha1::Sha1;
use subtle::ConstantTimeEq;

type HmacSha1 = Hmac<Sha1>;

/// Prefix that marks a header as part of the canonicalized header block.
pub const MNS_HEADER_PREFIX: &str = "x-mns-";

/// Scheme tag at the start of the `Authorization` header value.
pub const AUTHORIZATION_SCHEME: &str = "MNS";

/// A per-request header map with case-insensitive names.
///
/// Names are lowercased on insertion and kept in byte-wise sorted order.
/// Inserting an existing name replaces its value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: BTreeMap<String, String>,
}

impl HeaderSet {
    /// Creates an empty header set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, lowercasing its name.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Returns the value for a header name, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no headers are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for HeaderSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// Builds the `CanonicalizedMNSHeaders` block.
///
/// Only `x-mns-*` headers are included, sorted by name and rendered as
/// `name:value\n` each.
#[must_use]
pub fn canonicalize(headers: &HeaderSet) -> String {
    let mut mns_headers: Vec<(&str, &str)> = headers
        .iter()
        .filter(|(name, _)| name.starts_with(MNS_HEADER_PREFIX))
        .collect();
    mns_headers.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let mut result = String::new();
    for (name, value) in mns_headers {
        result.push_str(name);
        result.push(':');
        result.push_str(value);
        result.push('\n');
    }
    result
}

/// Builds the string to sign for a request.
#[must_use]
pub fn string_to_sign(method: &str, headers: &HeaderSet, resource: &str) -> String {
    let content_md5 = headers.get("content-md5").unwrap_or_default();
    let content_type = headers.get("content-type").unwrap_or_default();
    let date = headers.get("date").unwrap_or_default();
    let mns_headers = canonicalize(headers);

    format!("{method}\n{content_md5}\n{content_type}\n{date}\n{mns_headers}{resource}")
}

/// Computes the base64 HMAC-SHA1 signature of a request.
///
/// `resource` is the path including its query string, exactly as sent.
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn sign(method: &str, headers: &HeaderSet, resource: &str, secret: &str) -> String {
    let to_sign = string_to_sign(method, headers, resource);
    tracing::trace!(string_to_sign = ?to_sign, "Built MNS string to sign");

    let mut mac =
        HmacSha1::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(to_sign.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Renders the `Authorization` header value.
#[must_use]
pub fn authorization_header(access_key_id: &str, signature: &str) -> String {
    format!("{AUTHORIZATION_SCHEME} {access_key_id}:{signature}")
}

/// Returns base64(MD5(body)) for the `content-md5` header.
#[must_use]
pub fn content_md5(body: &[u8]) -> String {
    BASE64.encode(Md5::digest(body))
}

/// Checks a presented signature against the expected one.
///
/// The comparison runs in constant time.
#[must_use]
pub fn verify_signature(
    method: &str,
    headers: &HeaderSet,
    resource: &str,
    secret: &str,
    presented: &str,
) -> bool {
    let expected = sign(method, headers, resource, secret);
    expected.as_bytes().ct_eq(presented.as_bytes()).into()
}
