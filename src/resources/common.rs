//! Helpers shared by the queue, message, topic and subscription operations.

use serde::de::DeserializeOwned;

use crate::clients::{MnsError, MnsResponse, RequestOptions};
use crate::xml::{encode, encode_fields, Fields, XmlFields, XmlParams, XmlValue};

/// Header carrying the list continuation marker.
pub const MARKER_HEADER: &str = "x-mns-marker";

/// Header carrying the maximum number of list entries.
pub const RET_NUMBER_HEADER: &str = "x-mns-ret-number";

/// Header carrying the list name prefix filter.
pub const PREFIX_HEADER: &str = "x-mns-prefix";

/// Response header holding the URL of a created resource.
pub const LOCATION_HEADER: &str = "Location";

/// Paging and filtering for list operations.
///
/// # Example
///
/// ```rust
/// use mns::resources::ListOptions;
///
/// let options = ListOptions::new().prefix("orders-").limit(50);
/// assert_eq!(options.limit, Some(50));
/// assert!(options.start.is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Marker returned as `NextMarker` by the previous page.
    pub start: Option<String>,
    /// Maximum number of entries to return.
    pub limit: Option<u32>,
    /// Only return names starting with this prefix.
    pub prefix: Option<String>,
}

impl ListOptions {
    /// Creates options that list everything from the first page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Continues from a previous page's marker.
    #[must_use]
    pub fn start(mut self, marker: impl Into<String>) -> Self {
        self.start = Some(marker.into());
        self
    }

    /// Limits the page size.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Filters by name prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub(crate) fn into_request_options(self) -> RequestOptions {
        RequestOptions::new()
            .optional_header(MARKER_HEADER, self.start)
            .optional_header(RET_NUMBER_HEADER, self.limit)
            .optional_header(PREFIX_HEADER, self.prefix)
    }
}

/// Result of a create or subscribe call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Created {
    /// URL of the resource, from the `Location` response header.
    pub location: Option<String>,
}

impl Created {
    pub(crate) fn from_response(response: &MnsResponse) -> Self {
        Self {
            location: response.header(LOCATION_HEADER).map(String::from),
        }
    }
}

/// Builds request options that expose the `Location` header.
pub(crate) fn expose_location() -> RequestOptions {
    RequestOptions::new().expose_header(LOCATION_HEADER)
}

/// Encodes a flat request body.
pub(crate) fn fields_body(root: &str, fields: &XmlFields) -> Result<Vec<u8>, MnsError> {
    encode_fields(root, fields).map_err(MnsError::Encode)
}

/// Encodes a request body of repeated child elements.
pub(crate) fn sequence_body(
    root: &str,
    child: &str,
    items: Vec<XmlValue>,
) -> Result<Vec<u8>, MnsError> {
    encode(root, &XmlParams::Sequence(items), Some(child)).map_err(MnsError::Encode)
}

/// Percent-encodes a path segment or query value.
pub(crate) fn encode_component(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Deserializes the mapped body of `entity` into a typed response.
pub(crate) fn parse_body<T: DeserializeOwned>(
    response: MnsResponse,
    entity: &str,
) -> Result<T, MnsError> {
    let body = response.body.ok_or_else(|| MnsError::UnexpectedBody {
        entity: entity.to_string(),
        reason: format!("no XML body in {} response", response.code),
    })?;
    from_fields(body, entity)
}

/// Deserializes extracted fields into a typed response.
pub(crate) fn from_fields<T: DeserializeOwned>(fields: Fields, entity: &str) -> Result<T, MnsError> {
    let value = serde_json::Value::Object(
        fields
            .into_iter()
            .map(|(key, node)| (key, node.into()))
            .collect(),
    );
    serde_json::from_value(value).map_err(|e| MnsError::UnexpectedBody {
        entity: entity.to_string(),
        reason: e.to_string(),
    })
}
