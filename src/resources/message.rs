//! Queue message operations: send, receive, peek, delete and visibility.
//!
//! Receive calls long-poll. They use a 31 second timeout (the service waits
//! at most 30 seconds) and are never retried, so a dropped long-poll cannot
//! consume a message twice within one call.
//!
//! # Example
//!
//! ```rust,ignore
//! use mns::resources::MessageParams;
//!
//! client.send_message("orders", &MessageParams::new("hello").priority(1)).await?;
//!
//! let message = client.receive_message("orders", Some(10)).await?;
//! println!("{}", message.message_body);
//! client.delete_message("orders", &message.receipt_handle.unwrap_or_default()).await?;
//! ```

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::clients::{HttpMethod, MnsClient, MnsError, MnsResponse, RequestOptions};
use crate::resources::common::{encode_component, fields_body, parse_body, sequence_body};
use crate::resources::queue::queue_path;
use crate::xml::{XmlFields, XmlValue};

/// Root element of a single message document.
pub const MESSAGE_ENTITY: &str = "Message";

/// Root element of a message batch document.
pub const MESSAGES_ENTITY: &str = "Messages";

/// Root element of a batch delete failure document.
pub const ERRORS_ENTITY: &str = "Errors";

/// Root element of a visibility change document.
pub const CHANGE_VISIBILITY_ENTITY: &str = "ChangeVisibility";

/// Longest long-poll wait the service accepts, in seconds.
pub const MAX_WAIT_SECONDS: u32 = 30;

/// Client timeout for long-poll receives: the longest wait plus one second.
pub const LONG_POLL_TIMEOUT: Duration = Duration::from_secs(31);

/// A message to send to a queue.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageParams {
    /// The message body.
    pub message_body: String,
    /// Seconds before the message becomes visible.
    pub delay_seconds: Option<u32>,
    /// Priority from 1 (highest) to 16 (lowest).
    pub priority: Option<u32>,
}

impl MessageParams {
    /// Creates a message with the given body.
    #[must_use]
    pub fn new(message_body: impl Into<String>) -> Self {
        Self {
            message_body: message_body.into(),
            ..Self::default()
        }
    }

    /// Delays delivery.
    #[must_use]
    pub const fn delay_seconds(mut self, seconds: u32) -> Self {
        self.delay_seconds = Some(seconds);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    fn to_xml_fields(&self) -> XmlFields {
        XmlFields::new()
            .field("MessageBody", Some(&self.message_body))
            .field("DelaySeconds", self.delay_seconds)
            .field("Priority", self.priority)
    }
}

/// Result of sending one message.
///
/// In a batch, entries that failed carry `error_code` and `error_message`
/// instead of an id.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct SentMessage {
    pub message_id: Option<String>,
    #[serde(rename = "MessageBodyMD5")]
    pub message_body_md5: Option<String>,
    /// Present for delayed messages.
    pub receipt_handle: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

/// A received or peeked message.
///
/// Peeked messages have no receipt handle or next visible time.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Message {
    pub message_id: String,
    #[serde(rename = "MessageBodyMD5")]
    pub message_body_md5: Option<String>,
    #[serde(default)]
    pub message_body: String,
    pub receipt_handle: Option<String>,
    pub enqueue_time: Option<String>,
    pub first_dequeue_time: Option<String>,
    pub next_visible_time: Option<String>,
    pub dequeue_count: Option<String>,
    pub priority: Option<String>,
}

/// A receipt handle the service refused to delete.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteMessageError {
    pub error_code: String,
    pub error_message: Option<String>,
    pub receipt_handle: Option<String>,
}

/// The new receipt handle after a visibility change.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct VisibilityChange {
    pub receipt_handle: String,
    pub next_visible_time: Option<String>,
}

#[derive(Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct MessageBatch<T> {
    #[serde(rename = "Message", default)]
    messages: Vec<T>,
}

#[derive(Deserialize)]
struct DeleteErrors {
    #[serde(rename = "Error", default)]
    errors: Vec<DeleteMessageError>,
}

fn messages_path(queue_name: &str) -> String {
    format!("{}/messages", queue_path(queue_name))
}

fn long_poll_options() -> RequestOptions {
    RequestOptions::new().timeout(LONG_POLL_TIMEOUT).retries(0)
}

fn clamp_wait(wait_seconds: u32) -> u32 {
    wait_seconds.min(MAX_WAIT_SECONDS)
}

fn parse_batch<T: DeserializeOwned>(response: MnsResponse) -> Result<Vec<T>, MnsError> {
    let batch: MessageBatch<T> = parse_body(response, MESSAGES_ENTITY)?;
    Ok(batch.messages)
}

impl MnsClient {
    /// Sends a message to a queue.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError`] if the request fails.
    pub async fn send_message(
        &self,
        queue_name: &str,
        params: &MessageParams,
    ) -> Result<SentMessage, MnsError> {
        let body = fields_body(MESSAGE_ENTITY, &params.to_xml_fields())?;
        let response = self
            .request(
                HttpMethod::Post,
                &messages_path(queue_name),
                MESSAGE_ENTITY,
                body,
                RequestOptions::new(),
            )
            .await?;
        parse_body(response, MESSAGE_ENTITY)
    }

    /// Sends up to 16 messages in one request.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError`] if the request fails. Per-message failures are
    /// reported in the returned entries.
    pub async fn batch_send_message(
        &self,
        queue_name: &str,
        messages: &[MessageParams],
    ) -> Result<Vec<SentMessage>, MnsError> {
        let items = messages
            .iter()
            .map(|message| XmlValue::from(message.to_xml_fields()))
            .collect();
        let body = sequence_body(MESSAGES_ENTITY, MESSAGE_ENTITY, items)?;
        let response = self
            .request(
                HttpMethod::Post,
                &messages_path(queue_name),
                MESSAGES_ENTITY,
                body,
                RequestOptions::new(),
            )
            .await?;
        parse_batch(response)
    }

    /// Receives one message, waiting up to `wait_seconds` (at most 30).
    ///
    /// # Errors
    ///
    /// Returns [`MnsError::Service`] with `MessageNotExist` if no message
    /// arrived in time.
    pub async fn receive_message(
        &self,
        queue_name: &str,
        wait_seconds: Option<u32>,
    ) -> Result<Message, MnsError> {
        let path = messages_path(queue_name);
        let resource = match wait_seconds {
            Some(wait) => format!("{path}?waitseconds={}", clamp_wait(wait)),
            None => path,
        };
        let response = self
            .request(
                HttpMethod::Get,
                &resource,
                MESSAGE_ENTITY,
                Vec::new(),
                long_poll_options(),
            )
            .await?;
        parse_body(response, MESSAGE_ENTITY)
    }

    /// Receives up to `num_of_messages` messages, waiting up to
    /// `wait_seconds` (at most 30).
    ///
    /// # Errors
    ///
    /// Returns [`MnsError::Service`] with `MessageNotExist` if no message
    /// arrived in time.
    pub async fn batch_receive_message(
        &self,
        queue_name: &str,
        num_of_messages: u32,
        wait_seconds: Option<u32>,
    ) -> Result<Vec<Message>, MnsError> {
        let path = messages_path(queue_name);
        let resource = match wait_seconds {
            Some(wait) => format!(
                "{path}?numOfMessages={num_of_messages}&waitseconds={}",
                clamp_wait(wait)
            ),
            None => format!("{path}?numOfMessages={num_of_messages}"),
        };
        let response = self
            .request(
                HttpMethod::Get,
                &resource,
                MESSAGES_ENTITY,
                Vec::new(),
                long_poll_options(),
            )
            .await?;
        parse_batch(response)
    }

    /// Returns the next message without changing its visibility.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError::Service`] with `MessageNotExist` for an empty queue.
    pub async fn peek_message(&self, queue_name: &str) -> Result<Message, MnsError> {
        let resource = format!("{}?peekonly=true", messages_path(queue_name));
        let response = self
            .request(
                HttpMethod::Get,
                &resource,
                MESSAGE_ENTITY,
                Vec::new(),
                RequestOptions::new(),
            )
            .await?;
        parse_body(response, MESSAGE_ENTITY)
    }

    /// Returns up to `num_of_messages` messages without changing their
    /// visibility.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError::Service`] with `MessageNotExist` for an empty queue.
    pub async fn batch_peek_message(
        &self,
        queue_name: &str,
        num_of_messages: u32,
    ) -> Result<Vec<Message>, MnsError> {
        let resource = format!(
            "{}?peekonly=true&numOfMessages={num_of_messages}",
            messages_path(queue_name)
        );
        let response = self
            .request(
                HttpMethod::Get,
                &resource,
                MESSAGES_ENTITY,
                Vec::new(),
                RequestOptions::new(),
            )
            .await?;
        parse_batch(response)
    }

    /// Deletes a received message.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError::Service`] with `ReceiptHandleError` if the handle
    /// is invalid or expired.
    pub async fn delete_message(
        &self,
        queue_name: &str,
        receipt_handle: &str,
    ) -> Result<(), MnsError> {
        let resource = format!(
            "{}?ReceiptHandle={}",
            messages_path(queue_name),
            encode_component(receipt_handle)
        );
        self.request(
            HttpMethod::Delete,
            &resource,
            MESSAGE_ENTITY,
            Vec::new(),
            RequestOptions::new(),
        )
        .await?;
        Ok(())
    }

    /// Deletes several received messages.
    ///
    /// Returns the handles that could not be deleted; an empty list means
    /// every message was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError`] if the request as a whole fails.
    pub async fn batch_delete_message(
        &self,
        queue_name: &str,
        receipt_handles: &[String],
    ) -> Result<Vec<DeleteMessageError>, MnsError> {
        let items = receipt_handles
            .iter()
            .map(XmlValue::from)
            .collect();
        let body = sequence_body("ReceiptHandles", "ReceiptHandle", items)?;
        let response = self
            .request(
                HttpMethod::Delete,
                &messages_path(queue_name),
                ERRORS_ENTITY,
                body,
                RequestOptions::new(),
            )
            .await?;

        if response.body.is_none() {
            return Ok(Vec::new());
        }
        let failures: DeleteErrors = parse_body(response, ERRORS_ENTITY)?;
        Ok(failures.errors)
    }

    /// Extends or shortens the invisibility of a received message.
    ///
    /// The returned receipt handle replaces the old one.
    ///
    /// # Errors
    ///
    /// Returns [`MnsError::Service`] with `ReceiptHandleError` if the handle
    /// is invalid or expired.
    pub async fn change_message_visibility(
        &self,
        queue_name: &str,
        receipt_handle: &str,
        visibility_timeout: u32,
    ) -> Result<VisibilityChange, MnsError> {
        let resource = format!(
            "{}?receiptHandle={}&visibilityTimeout={visibility_timeout}",
            messages_path(queue_name),
            encode_component(receipt_handle)
        );
        let response = self
            .request(
                HttpMethod::Put,
                &resource,
                CHANGE_VISIBILITY_ENTITY,
                Vec::new(),
                RequestOptions::new(),
            )
            .await?;
        parse_body(response, CHANGE_VISIBILITY_ENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::common::from_fields;
    use crate::xml::{decode, entity_fields};

    #[test]
    fn test_wait_is_clamped() {
        assert_eq!(clamp_wait(10), 10);
        assert_eq!(clamp_wait(30), 30);
        assert_eq!(clamp_wait(45), 30);
    }

    #[test]
    fn test_long_poll_options() {
        let options = long_poll_options();
        assert_eq!(options.timeout, Some(Duration::from_secs(31)));
        assert_eq!(options.retries, Some(0));
    }

    #[test]
    fn test_message_params_fields() {
        let fields = MessageParams::new("hi").priority(8).to_xml_fields();
        let names: Vec<_> = fields.iter().map(|(name, _)| name.to_string()).collect();
        assert_eq!(names, vec!["MessageBody", "Priority"]);
    }

    #[test]
    fn test_message_from_receive_document() {
        let document = decode(
            b"<Message xmlns=\"http://mns.aliyuncs.com/doc/v1/\">\
              <MessageId>m1</MessageId><ReceiptHandle>h1</ReceiptHandle>\
              <MessageBodyMD5>md5</MessageBodyMD5><MessageBody>hello</MessageBody>\
              <DequeueCount>1</DequeueCount></Message>",
        )
        .unwrap();
        let message: Message =
            from_fields(entity_fields(&document, MESSAGE_ENTITY), MESSAGE_ENTITY).unwrap();
        assert_eq!(message.message_id, "m1");
        assert_eq!(message.receipt_handle.as_deref(), Some("h1"));
        assert_eq!(message.message_body_md5.as_deref(), Some("md5"));
        assert_eq!(message.message_body, "hello");
        assert!(message.next_visible_time.is_none());
    }

    #[test]
    fn test_batch_with_single_message_is_a_list() {
        let document = decode(
            b"<Messages><Message><MessageId>m1</MessageId><MessageBody>a</MessageBody></Message></Messages>",
        )
        .unwrap();
        let batch: MessageBatch<Message> =
            from_fields(entity_fields(&document, MESSAGES_ENTITY), MESSAGES_ENTITY).unwrap();
        assert_eq!(batch.messages.len(), 1);
        assert_eq!(batch.messages[0].message_body, "a");
    }

    #[test]
    fn test_batch_delete_errors_document() {
        let document = decode(
            b"<Errors><Error><ErrorCode>ReceiptHandleError</ErrorCode>\
              <ErrorMessage>bad</ErrorMessage><ReceiptHandle>h1</ReceiptHandle></Error></Errors>",
        )
        .unwrap();
        let failures: DeleteErrors =
            from_fields(entity_fields(&document, ERRORS_ENTITY), ERRORS_ENTITY).unwrap();
        assert_eq!(failures.errors.len(), 1);
        assert_eq!(failures.errors[0].error_code, "ReceiptHandleError");
        assert_eq!(failures.errors[0].receipt_handle.as_deref(), Some("h1"));
    }
}
