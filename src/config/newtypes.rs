//! Validated newtype wrappers for credential values.
//!
//! Account id and region are passed straight through to the endpoint
//! resolver; only the access key pair is validated here.
//!
//! ```rust
//! use mns::{AccessKeyId, AccessKeySecret};
//!
//! let id = AccessKeyId::new("LTAI-test").unwrap();
//! let secret = AccessKeySecret::new("my-secret").unwrap();
//! assert_eq!(id.as_ref(), "LTAI-test");
//! assert_eq!(format!("{secret:?}"), "AccessKeySecret(*****)");
//! ```

use crate::error::ConfigError;
use std::fmt;

/// Declares a non-empty string credential.
macro_rules! credential {
    ($(#[$meta:meta])* $name:ident, $empty:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new `", stringify!($name), "`.")]
            ///
            /// # Errors
            ///
            #[doc = concat!("Returns [`ConfigError::", stringify!($empty), "`] if the value is empty.")]
            pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
                let value = value.into();
                if value.is_empty() {
                    return Err(ConfigError::$empty);
                }
                Ok(Self(value))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

credential!(
    /// A validated MNS access key id, sent in every `Authorization` header.
    AccessKeyId,
    EmptyAccessKeyId
);

credential!(
    /// A validated MNS access key secret. `Debug` output is masked.
    AccessKeySecret,
    EmptyAccessKeySecret
);

impl fmt::Debug for AccessKeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessKeyId").field(&self.0).finish()
    }
}

impl fmt::Debug for AccessKeySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessKeySecret(*****)")
    }
}
