//! Request authentication for the MNS API.
//!
//! MNS authenticates each request with an HMAC-SHA1 signature over a
//! canonical string built from the method, body digest, content type, date,
//! the `x-mns-*` headers and the resource path. See [`signature`] for the
//! exact layout.

pub mod signature;

pub use signature::{
    authorization_header, canonicalize, content_md5, sign, string_to_sign, verify_signature,
    HeaderSet, AUTHORIZATION_SCHEME, MNS_HEADER_PREFIX,
};
