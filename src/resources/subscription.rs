//! Topic subscription operations.

use std::fmt;

use serde::Deserialize;

use crate::clients::{HttpMethod, MnsClient, MnsError, RequestOptions};
use crate::resources::common::{
    encode_component, expose_location, fields_body, parse_body, Created, ListOptions,
};
use crate::resources::topic::topic_path;
use crate::xml::XmlFields;

/// Root element of a subscription document.
pub const SUBSCRIPTION_ENTITY: &str = "Subscription";

/// Root element of a subscription list document.
pub const SUBSCRIPTIONS_ENTITY: &str = "Subscriptions";

/// How the service retries a failed push.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotifyStrategy {
    /// Retry at fixed random intervals.
    BackoffRetry,
    /// Retry with exponentially growing intervals.
    ExponentialDecayRetry,
}

impl NotifyStrategy {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BackoffRetry => "BACKOFF_RETRY",
            Self::ExponentialDecayRetry => "EXPONENTIAL_DECAY_RETRY",
        }
    }
}

impl fmt::Display for NotifyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format of pushed notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotifyContentFormat {
    /// Full XML notification.
    Xml,
    /// Full JSON notification.
    Json,
    /// Message body only.
    Simplified,
}

impl NotifyContentFormat {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Xml => "XML",
            Self::Json => "JSON",
            Self::Simplified => "SIMPLIFIED",
        }
    }
}

impl fmt::Display for NotifyContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a new subscription.
///
/// # Example
///
/// ```rust
/// use mns::resources::{NotifyContentFormat, SubscriptionParams};
///
/// let params = SubscriptionParams::new("acs:mns:cn-hangzhou:123:queues/orders")
///     .notify_content_format(NotifyContentFormat::Simplified);
/// assert!(params.filter_tag.is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubscriptionParams {
    /// Push target: an HTTP URL, a queue ARN, a mail or SMS endpoint.
    pub endpoint: String,
    /// Only messages with this tag are pushed.
    pub filter_tag: Option<String>,
    /// Retry strategy for failed pushes.
    pub notify_strategy: Option<NotifyStrategy>,
    /// Format of pushed notifications.
    pub notify_content_format: Option<NotifyContentFormat>,
}

impl SubscriptionParams {
    /// Creates parameters for the given push endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Sets the filter tag.
    #[must_use]
    pub fn filter_tag(mut self, tag: impl Into<String>) -> Self {
        self.filter_tag = Some(tag.into());
        self
    }

    /// Sets the retry strategy.
    #[must_use]
    pub const fn notify_strategy(mut self, strategy: NotifyStrategy) -> Self {
        self.notify_strategy = Some(strategy);
        self
    }

    /// Sets the notification format.
    #[must_use]
    pub const fn notify_content_format(mut self, format: NotifyContentFormat) -> Self {
        self.notify_content_format = Some(format);
        self
    }

    fn to_xml_fields(&self) -> XmlFields {
        XmlFields::new()
            .field("Endpoint", Some(&self.endpoint))
            .field("FilterTag", self.filter_tag.as_deref())
            .field(
                "NotifyStrategy",
                self.notify_strategy.as_ref().map(NotifyStrategy::as_str),
            )
            .field(
                "NotifyContentFormat",
                self.notify_content_format
                    .as_ref()
                    .map(NotifyContentFormat::as_str),
            )
    }
}

/// Settable attributes of an existing subscription.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubscriptionAttributes {
    pub notify_strategy: Option<NotifyStrategy>,
}

impl SubscriptionAttributes {
    fn to_xml_fields(&self) -> XmlFields {
        XmlFields::new().field(
            "NotifyStrategy",
            self.notify_strategy.as_ref().map(NotifyStrategy::as_str),
        )
    }
}

/// Subscription attributes as reported by the service.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct SubscriptionMeta {
    pub subscription_name: String,
    pub subscriber: Option<String>,
    pub topic_name: Option<String>,
    pub topic_owner: Option<String>,
    pub create_time: Option<String>,
    pub last_modify_time: Option<String>,
    pub endpoint: Option<String>,
    pub filter_tag: Option<String>,
    pub notify_strategy: Option<String>,
    pub notify_content_format: Option<String>,
    #[serde(rename = "SubscriptionURL")]
    pub subscription_url: Option<String>,
}

/// One entry of a subscription listing.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct SubscriptionEntry {
    #[serde(rename = "SubscriptionURL")]
    pub subscription_url: Option<String>,
    pub subscription_name: Option<String>,
}

/// A page of subscriptions of one topic.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct SubscriptionList {
    #[serde(rename = "Subscription", default)]
    pub subscriptions: Vec<SubscriptionEntry>,
    pub next_marker: Option<String>,
}

fn subscription_path(topic_name: &str, subscription_name: &str) -> String {
    format!(
        "{}/subscriptions/{}",
        topic_path(topic_name),
        encode_component(subscription_name)
    )
}

impl MnsClient {
    /// Subscribes an endpoint to a topic.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError::Service`] with `SubscriptionAlreadyExist` if the
    /// subscription exists with different attributes.
    pub async fn subscribe(
        &self,
        topic_name: &str,
        subscription_name: &str,
        params: &SubscriptionParams,
    ) -> Result<Created, MnsError> {
        let body = fields_body(SUBSCRIPTION_ENTITY, &params.to_xml_fields())?;
        let response = self
            .request(
                HttpMethod::Put,
                &subscription_path(topic_name, subscription_name),
                SUBSCRIPTION_ENTITY,
                body,
                expose_location(),
            )
            .await?;
        Ok(Created::from_response(&response))
    }

    /// Removes a subscription.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError`] if the request fails.
    pub async fn unsubscribe(
        &self,
        topic_name: &str,
        subscription_name: &str,
    ) -> Result<(), MnsError> {
        self.request(
            HttpMethod::Delete,
            &subscription_path(topic_name, subscription_name),
            SUBSCRIPTION_ENTITY,
            Vec::new(),
            RequestOptions::new(),
        )
        .await?;
        Ok(())
    }

    /// Lists the subscriptions of a topic, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError`] if the request fails or the body is not a
    /// subscription list.
    pub async fn list_subscription_by_topic(
        &self,
        topic_name: &str,
        options: ListOptions,
    ) -> Result<SubscriptionList, MnsError> {
        let resource = format!("{}/subscriptions", topic_path(topic_name));
        let response = self
            .request(
                HttpMethod::Get,
                &resource,
                SUBSCRIPTIONS_ENTITY,
                Vec::new(),
                options.into_request_options(),
            )
            .await?;
        parse_body(response, SUBSCRIPTIONS_ENTITY)
    }

    /// Returns the attributes of a subscription.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError::Service`] with `SubscriptionNotExist` for an
    /// unknown subscription.
    pub async fn get_subscription_attributes(
        &self,
        topic_name: &str,
        subscription_name: &str,
    ) -> Result<SubscriptionMeta, MnsError> {
        let response = self
            .request(
                HttpMethod::Get,
                &subscription_path(topic_name, subscription_name),
                SUBSCRIPTION_ENTITY,
                Vec::new(),
                RequestOptions::new(),
            )
            .await?;
        parse_body(response, SUBSCRIPTION_ENTITY)
    }

    /// Updates the attributes of a subscription.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError`] if the request fails.
    pub async fn set_subscription_attributes(
        &self,
        topic_name: &str,
        subscription_name: &str,
        attributes: &SubscriptionAttributes,
    ) -> Result<(), MnsError> {
        let body = fields_body(SUBSCRIPTION_ENTITY, &attributes.to_xml_fields())?;
        let resource = format!(
            "{}?metaoverride=true",
            subscription_path(topic_name, subscription_name)
        );
        self.request(
            HttpMethod::Put,
            &resource,
            SUBSCRIPTION_ENTITY,
            body,
            RequestOptions::new(),
        )
        .await?;
        Ok(())
    }
}
