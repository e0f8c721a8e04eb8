//! Queue, message, topic and subscription operations.
//!
//! Every operation is a method on [`MnsClient`](crate::MnsClient) that
//! picks a resource path, entity name, headers and body shape, then calls
//! [`MnsClient::request`](crate::MnsClient::request). Optional parameters
//! are `Option` fields; unset ones are left out of the request body.
//!
//! | Area | Operations |
//! |------|------------|
//! | Queue | `create_queue`, `delete_queue`, `list_queue`, `get_queue_attributes`, `set_queue_attributes` |
//! | Message | `send_message`, `batch_send_message`, `receive_message`, `batch_receive_message`, `peek_message`, `batch_peek_message`, `delete_message`, `batch_delete_message`, `change_message_visibility` |
//! | Topic | `create_topic`, `delete_topic`, `list_topic`, `get_topic_attributes`, `set_topic_attributes`, `publish_message` |
//! | Subscription | `subscribe`, `unsubscribe`, `list_subscription_by_topic`, `get_subscription_attributes`, `set_subscription_attributes` |
//!
//! Attribute values come back as the service renders them, so numeric and
//! boolean fields of the `*Meta` types are strings.

mod common;
mod message;
mod queue;
mod subscription;
mod topic;

pub use common::{
    Created, ListOptions, LOCATION_HEADER, MARKER_HEADER, PREFIX_HEADER, RET_NUMBER_HEADER,
};
pub use message::{
    DeleteMessageError, Message, MessageParams, SentMessage, VisibilityChange, LONG_POLL_TIMEOUT,
    MAX_WAIT_SECONDS,
};
pub use queue::{QueueAttributes, QueueEntry, QueueList, QueueMeta};
pub use subscription::{
    NotifyContentFormat, NotifyStrategy, SubscriptionAttributes, SubscriptionEntry,
    SubscriptionList, SubscriptionMeta, SubscriptionParams,
};
pub use topic::{PublishParams, PublishedMessage, TopicAttributes, TopicEntry, TopicList, TopicMeta};
