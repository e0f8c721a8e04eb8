//! Topic management and publishing.

use serde::Deserialize;

use crate::clients::{HttpMethod, MnsClient, MnsError, RequestOptions};
use crate::resources::common::{
    encode_component, expose_location, fields_body, parse_body, Created, ListOptions,
};
use crate::resources::message::MESSAGE_ENTITY;
use crate::xml::XmlFields;

/// Root element of a topic document.
pub const TOPIC_ENTITY: &str = "Topic";

/// Root element of a topic list document.
pub const TOPICS_ENTITY: &str = "Topics";

/// Settable topic attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TopicAttributes {
    /// Maximum message body size in bytes.
    pub maximum_message_size: Option<u32>,
    /// Whether operation logs are pushed to the log service.
    pub logging_enabled: Option<bool>,
}

impl TopicAttributes {
    fn to_xml_fields(&self) -> XmlFields {
        XmlFields::new()
            .field("MaximumMessageSize", self.maximum_message_size)
            .field("LoggingEnabled", self.logging_enabled)
    }
}

/// Topic attributes as reported by the service.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TopicMeta {
    pub topic_name: String,
    pub message_count: Option<String>,
    pub maximum_message_size: Option<String>,
    pub message_retention_period: Option<String>,
    pub create_time: Option<String>,
    pub last_modify_time: Option<String>,
    pub logging_enabled: Option<String>,
}

/// One entry of a topic listing.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TopicEntry {
    #[serde(rename = "TopicURL")]
    pub topic_url: Option<String>,
    pub topic_name: Option<String>,
}

/// A page of topics.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TopicList {
    #[serde(rename = "Topic", default)]
    pub topics: Vec<TopicEntry>,
    pub next_marker: Option<String>,
}

/// A message to publish to a topic.
///
/// # Example
///
/// ```rust
/// use mns::resources::PublishParams;
/// use mns::xml::XmlFields;
///
/// let mail = XmlFields::new()
///     .field("Subject", Some("hi"))
///     .field("AccountName", Some("noreply@example.com"));
/// let params = PublishParams::new("body")
///     .message_tag("important")
///     .message_attributes(XmlFields::new().field("DirectMail", Some(mail)));
/// assert_eq!(params.message_tag.as_deref(), Some("important"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublishParams {
    /// The message body.
    pub message_body: String,
    /// Tag matched against subscription filter tags.
    pub message_tag: Option<String>,
    /// Push-endpoint specific attributes, rendered as nested elements.
    pub message_attributes: Option<XmlFields>,
}

impl PublishParams {
    /// Creates a message with the given body.
    #[must_use]
    pub fn new(message_body: impl Into<String>) -> Self {
        Self {
            message_body: message_body.into(),
            ..Self::default()
        }
    }

    /// Sets the message tag.
    #[must_use]
    pub fn message_tag(mut self, tag: impl Into<String>) -> Self {
        self.message_tag = Some(tag.into());
        self
    }

    /// Sets the message attributes.
    #[must_use]
    pub fn message_attributes(mut self, attributes: XmlFields) -> Self {
        self.message_attributes = Some(attributes);
        self
    }

    fn to_xml_fields(&self) -> XmlFields {
        XmlFields::new()
            .field("MessageBody", Some(&self.message_body))
            .field("MessageTag", self.message_tag.as_deref())
            .field("MessageAttributes", self.message_attributes.clone())
    }
}

/// Result of publishing a message.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PublishedMessage {
    pub message_id: String,
    #[serde(rename = "MessageBodyMD5")]
    pub message_body_md5: Option<String>,
}

pub(crate) fn topic_path(topic_name: &str) -> String {
    format!("/topics/{}", encode_component(topic_name))
}

impl MnsClient {
    /// Creates a topic.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError::Service`] with `TopicAlreadyExist` if the topic
    /// exists with different attributes.
    pub async fn create_topic(
        &self,
        topic_name: &str,
        attributes: Option<&TopicAttributes>,
    ) -> Result<Created, MnsError> {
        let fields = attributes.map(TopicAttributes::to_xml_fields).unwrap_or_default();
        let body = fields_body(TOPIC_ENTITY, &fields)?;
        let response = self
            .request(
                HttpMethod::Put,
                &topic_path(topic_name),
                TOPIC_ENTITY,
                body,
                expose_location(),
            )
            .await?;
        Ok(Created::from_response(&response))
    }

    /// Deletes a topic and its subscriptions.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError`] if the request fails.
    pub async fn delete_topic(&self, topic_name: &str) -> Result<(), MnsError> {
        self.request(
            HttpMethod::Delete,
            &topic_path(topic_name),
            TOPIC_ENTITY,
            Vec::new(),
            RequestOptions::new(),
        )
        .await?;
        Ok(())
    }

    /// Lists topics, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError`] if the request fails or the body is not a topic list.
    pub async fn list_topic(&self, options: ListOptions) -> Result<TopicList, MnsError> {
        let response = self
            .request(
                HttpMethod::Get,
                "/topics",
                TOPICS_ENTITY,
                Vec::new(),
                options.into_request_options(),
            )
            .await?;
        parse_body(response, TOPICS_ENTITY)
    }

    /// Returns the attributes of a topic.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError::Service`] with `TopicNotExist` for an unknown topic.
    pub async fn get_topic_attributes(&self, topic_name: &str) -> Result<TopicMeta, MnsError> {
        let response = self
            .request(
                HttpMethod::Get,
                &topic_path(topic_name),
                TOPIC_ENTITY,
                Vec::new(),
                RequestOptions::new(),
            )
            .await?;
        parse_body(response, TOPIC_ENTITY)
    }

    /// Updates the given attributes of a topic.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError`] if the request fails.
    pub async fn set_topic_attributes(
        &self,
        topic_name: &str,
        attributes: &TopicAttributes,
    ) -> Result<(), MnsError> {
        let body = fields_body(TOPIC_ENTITY, &attributes.to_xml_fields())?;
        let resource = format!("{}?metaoverride=true", topic_path(topic_name));
        self.request(
            HttpMethod::Put,
            &resource,
            TOPIC_ENTITY,
            body,
            RequestOptions::new(),
        )
        .await?;
        Ok(())
    }

    /// Publishes a message to every subscription of a topic.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError`] if the request fails.
    pub async fn publish_message(
        &self,
        topic_name: &str,
        params: &PublishParams,
    ) -> Result<PublishedMessage, MnsError> {
        let body = fields_body(MESSAGE_ENTITY, &params.to_xml_fields())?;
        let resource = format!("{}/messages", topic_path(topic_name));
        let response = self
            .request(
                HttpMethod::Post,
                &resource,
                MESSAGE_ENTITY,
                body,
                RequestOptions::new(),
            )
            .await?;
        parse_body(response, MESSAGE_ENTITY)
    }
}
