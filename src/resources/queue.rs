//! Queue management operations.
//!
//! # Example
//!
//! ```rust,ignore
//! use mns::resources::{ListOptions, QueueAttributes};
//!
//! let attributes = QueueAttributes {
//!     visibility_timeout: Some(60),
//!     ..QueueAttributes::default()
//! };
//! client.create_queue("orders", Some(&attributes)).await?;
//!
//! let page = client.list_queue(ListOptions::new().prefix("ord")).await?;
//! for queue in &page.queues {
//!     println!("{:?}", queue.queue_name);
//! }
//! ```

use serde::Deserialize;

use crate::clients::{HttpMethod, MnsClient, MnsError, RequestOptions};
use crate::resources::common::{
    encode_component, expose_location, fields_body, parse_body, Created, ListOptions,
};
use crate::xml::XmlFields;

/// Root element of a queue document.
pub const QUEUE_ENTITY: &str = "Queue";

/// Root element of a queue list document.
pub const QUEUES_ENTITY: &str = "Queues";

/// Settable queue attributes. `None` leaves the service default or current
/// value untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueueAttributes {
    /// Seconds before a sent message becomes visible.
    pub delay_seconds: Option<u32>,
    /// Maximum message body size in bytes.
    pub maximum_message_size: Option<u32>,
    /// Seconds a message is kept before it expires.
    pub message_retention_period: Option<u32>,
    /// Seconds a received message stays invisible.
    pub visibility_timeout: Option<u32>,
    /// Default long-poll wait in seconds.
    pub polling_wait_seconds: Option<u32>,
    /// Whether operation logs are pushed to the log service.
    pub logging_enabled: Option<bool>,
}

impl QueueAttributes {
    fn to_xml_fields(&self) -> XmlFields {
        XmlFields::new()
            .field("DelaySeconds", self.delay_seconds)
            .field("MaximumMessageSize", self.maximum_message_size)
            .field("MessageRetentionPeriod", self.message_retention_period)
            .field("VisibilityTimeout", self.visibility_timeout)
            .field("PollingWaitSeconds", self.polling_wait_seconds)
            .field("LoggingEnabled", self.logging_enabled)
    }
}

/// Queue attributes as reported by the service.
///
/// Values are kept as the service renders them (numbers as decimal text,
/// booleans as `True`/`False`).
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct QueueMeta {
    pub queue_name: String,
    pub create_time: Option<String>,
    pub last_modify_time: Option<String>,
    pub delay_seconds: Option<String>,
    pub maximum_message_size: Option<String>,
    pub message_retention_period: Option<String>,
    pub polling_wait_seconds: Option<String>,
    pub visibility_timeout: Option<String>,
    pub active_messages: Option<String>,
    pub inactive_messages: Option<String>,
    pub delay_messages: Option<String>,
    pub logging_enabled: Option<String>,
}

/// One entry of a queue listing.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct QueueEntry {
    #[serde(rename = "QueueURL")]
    pub queue_url: Option<String>,
    pub queue_name: Option<String>,
}

/// A page of queues.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct QueueList {
    #[serde(rename = "Queue", default)]
    pub queues: Vec<QueueEntry>,
    /// Marker for the next page, absent on the last page.
    pub next_marker: Option<String>,
}

pub(crate) fn queue_path(queue_name: &str) -> String {
    format!("/queues/{}", encode_component(queue_name))
}

impl MnsClient {
    /// Creates a queue.
    ///
    /// Creating an existing queue with identical attributes succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError::Service`] with `QueueAlreadyExist` if the queue
    /// exists with different attributes.
    pub async fn create_queue(
        &self,
        queue_name: &str,
        attributes: Option<&QueueAttributes>,
    ) -> Result<Created, MnsError> {
        let fields = attributes.map(QueueAttributes::to_xml_fields).unwrap_or_default();
        let body = fields_body(QUEUE_ENTITY, &fields)?;
        let response = self
            .request(
                HttpMethod::Put,
                &queue_path(queue_name),
                QUEUE_ENTITY,
                body,
                expose_location(),
            )
            .await?;
        Ok(Created::from_response(&response))
    }

    /// Deletes a queue and all its messages.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError`] if the request fails.
    pub async fn delete_queue(&self, queue_name: &str) -> Result<(), MnsError> {
        self.request(
            HttpMethod::Delete,
            &queue_path(queue_name),
            QUEUE_ENTITY,
            Vec::new(),
            RequestOptions::new(),
        )
        .await?;
        Ok(())
    }

    /// Lists queues, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError`] if the request fails or the body is not a queue list.
    pub async fn list_queue(&self, options: ListOptions) -> Result<QueueList, MnsError> {
        let response = self
            .request(
                HttpMethod::Get,
                "/queues",
                QUEUES_ENTITY,
                Vec::new(),
                options.into_request_options(),
            )
            .await?;
        parse_body(response, QUEUES_ENTITY)
    }

    /// Returns the attributes and message counts of a queue.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError::Service`] with `QueueNotExist` for an unknown queue.
    pub async fn get_queue_attributes(&self, queue_name: &str) -> Result<QueueMeta, MnsError> {
        let response = self
            .request(
                HttpMethod::Get,
                &queue_path(queue_name),
                QUEUE_ENTITY,
                Vec::new(),
                RequestOptions::new(),
            )
            .await?;
        parse_body(response, QUEUE_ENTITY)
    }

    /// Updates the given attributes of a queue.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError`] if the request fails.
    pub async fn set_queue_attributes(
        &self,
        queue_name: &str,
        attributes: &QueueAttributes,
    ) -> Result<(), MnsError> {
        let body = fields_body(QUEUE_ENTITY, &attributes.to_xml_fields())?;
        let resource = format!("{}?metaoverride=true", queue_path(queue_name));
        self.request(
            HttpMethod::Put,
            &resource,
            QUEUE_ENTITY,
            body,
            RequestOptions::new(),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_omit_unset_fields() {
        let attributes = QueueAttributes {
            delay_seconds: Some(20),
            logging_enabled: Some(true),
            ..QueueAttributes::default()
        };
        let fields: Vec<_> = attributes
            .to_xml_fields()
            .iter()
            .map(|(name, _)| name.to_string())
            .collect();
        assert_eq!(fields, vec!["DelaySeconds", "LoggingEnabled"]);
    }

    #[test]
    fn test_default_attributes_are_empty() {
        assert!(QueueAttributes::default().to_xml_fields().is_empty());
    }

    #[test]
    fn test_queue_path_encodes_name() {
        assert_eq!(queue_path("orders"), "/queues/orders");
        assert_eq!(queue_path("a b"), "/queues/a%20b");
    }
}
