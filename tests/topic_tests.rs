//! End-to-end topic and subscription tests against a mock MNS server.

use mns::resources::{
    ListOptions, NotifyContentFormat, NotifyStrategy, PublishParams, SubscriptionAttributes,
    SubscriptionParams, TopicAttributes,
};
use mns::{AccessKeyId, AccessKeySecret, MnsClient, MnsConfig, ServiceErrorKind, XmlFields};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const XML: &str = "text/xml";

fn create_client(server: &MockServer) -> MnsClient {
    let config = MnsConfig::builder()
        .account_id("123")
        .region("cn-hangzhou")
        .access_key_id(AccessKeyId::new("key-id").unwrap())
        .access_key_secret(AccessKeySecret::new("secret").unwrap())
        .endpoint(server.uri())
        .build()
        .unwrap();
    MnsClient::new(config)
}

// ============================================================================
// Topics
// ============================================================================

#[tokio::test]
async fn test_create_topic_with_attributes() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/topics/T1"))
        .and(body_string_contains(
            "<Topic xmlns=\"http://mns.aliyuncs.com/doc/v1/\">",
        ))
        .and(body_string_contains("<LoggingEnabled>true</LoggingEnabled>"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Location", "http://123.mns.cn-hangzhou.aliyuncs.com/topics/T1"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let attributes = TopicAttributes {
        logging_enabled: Some(true),
        ..TopicAttributes::default()
    };
    let created = client.create_topic("T1", Some(&attributes)).await.unwrap();
    assert_eq!(
        created.location.as_deref(),
        Some("http://123.mns.cn-hangzhou.aliyuncs.com/topics/T1")
    );
}

#[tokio::test]
async fn test_list_and_describe_topics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/topics"))
        .and(header("x-mns-marker", "m1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<Topics><Topic><TopicURL>http://123.mns.cn-hangzhou.aliyuncs.com/topics/T1</TopicURL></Topic>\
             <Topic><TopicURL>http://123.mns.cn-hangzhou.aliyuncs.com/topics/T2</TopicURL></Topic></Topics>",
            XML,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/topics/T1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<Topic><TopicName>T1</TopicName><MessageCount>7</MessageCount></Topic>",
            XML,
        ))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let page = client
        .list_topic(ListOptions::new().start("m1"))
        .await
        .unwrap();
    assert_eq!(page.topics.len(), 2);
    assert!(page.topics[1]
        .topic_url
        .as_deref()
        .is_some_and(|url| url.ends_with("/topics/T2")));
    assert!(page.next_marker.is_none());

    let meta = client.get_topic_attributes("T1").await.unwrap();
    assert_eq!(meta.topic_name, "T1");
    assert_eq!(meta.message_count.as_deref(), Some("7"));
}

#[tokio::test]
async fn test_missing_topic_is_a_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/topics/T9"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(
            "<Error><Code>TopicNotExist</Code><Message>The topic you provided does not exist.</Message>\
             <RequestId>r9</RequestId><HostId>h9</HostId></Error>",
            XML,
        ))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let error = client.delete_topic("T9").await.unwrap_err();
    let service = error.as_service_error().unwrap();
    assert_eq!(service.kind(), ServiceErrorKind::TopicNotExist);
    assert_eq!(service.host_id, "h9");
}

#[tokio::test]
async fn test_set_topic_attributes_overrides_meta() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/topics/T1"))
        .and(query_param("metaoverride", "true"))
        .and(body_string_contains(
            "<MaximumMessageSize>1024</MaximumMessageSize>",
        ))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let attributes = TopicAttributes {
        maximum_message_size: Some(1024),
        ..TopicAttributes::default()
    };
    client.set_topic_attributes("T1", &attributes).await.unwrap();
}

#[tokio::test]
async fn test_publish_message_with_nested_attributes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/topics/T1/messages"))
        .and(body_string_contains("<MessageTag>orders</MessageTag>"))
        .and(body_string_contains(
            "<MessageAttributes><DirectMail><Subject>hi</Subject></DirectMail></MessageAttributes>",
        ))
        .respond_with(ResponseTemplate::new(201).set_body_raw(
            "<Message><MessageId>p1</MessageId><MessageBodyMD5>ABC</MessageBodyMD5></Message>",
            XML,
        ))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let params = PublishParams::new("hello")
        .message_tag("orders")
        .message_attributes(
            XmlFields::new().field("DirectMail", Some(XmlFields::new().field("Subject", Some("hi")))),
        );
    let published = client.publish_message("T1", &params).await.unwrap();
    assert_eq!(published.message_id, "p1");
    assert_eq!(published.message_body_md5.as_deref(), Some("ABC"));
}

// ============================================================================
// Subscriptions
// ============================================================================

#[tokio::test]
async fn test_subscribe_returns_location() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/topics/T1/subscriptions/S1"))
        .and(body_string_contains("<Endpoint>http://example.com/notify</Endpoint>"))
        .and(body_string_contains("<NotifyStrategy>EXPONENTIAL_DECAY_RETRY</NotifyStrategy>"))
        .and(body_string_contains("<NotifyContentFormat>JSON</NotifyContentFormat>"))
        .respond_with(ResponseTemplate::new(201).insert_header(
            "Location",
            "http://123.mns.cn-hangzhou.aliyuncs.com/topics/T1/subscriptions/S1",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let params = SubscriptionParams::new("http://example.com/notify")
        .notify_strategy(NotifyStrategy::ExponentialDecayRetry)
        .notify_content_format(NotifyContentFormat::Json);
    let created = client.subscribe("T1", "S1", &params).await.unwrap();
    assert!(created
        .location
        .as_deref()
        .is_some_and(|url| url.ends_with("/subscriptions/S1")));
}

#[tokio::test]
async fn test_list_subscriptions_by_topic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/topics/T1/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<Subscriptions><Subscription><SubscriptionURL>http://123.mns.cn-hangzhou.aliyuncs.com/topics/T1/subscriptions/S1</SubscriptionURL></Subscription>\
             <NextMarker>next</NextMarker></Subscriptions>",
            XML,
        ))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let page = client
        .list_subscription_by_topic("T1", ListOptions::new())
        .await
        .unwrap();
    assert_eq!(page.subscriptions.len(), 1);
    assert_eq!(page.next_marker.as_deref(), Some("next"));
}

#[tokio::test]
async fn test_subscription_attributes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/topics/T1/subscriptions/S1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<Subscription><SubscriptionName>S1</SubscriptionName><TopicName>T1</TopicName>\
             <Endpoint>http://example.com/notify</Endpoint><NotifyStrategy>BACKOFF_RETRY</NotifyStrategy>\
             </Subscription>",
            XML,
        ))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/topics/T1/subscriptions/S1"))
        .and(query_param("metaoverride", "true"))
        .and(body_string_contains("<NotifyStrategy>BACKOFF_RETRY</NotifyStrategy>"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let attributes = SubscriptionAttributes {
        notify_strategy: Some(NotifyStrategy::BackoffRetry),
    };
    client
        .set_subscription_attributes("T1", "S1", &attributes)
        .await
        .unwrap();

    let meta = client.get_subscription_attributes("T1", "S1").await.unwrap();
    assert_eq!(meta.subscription_name, "S1");
    assert_eq!(meta.topic_name.as_deref(), Some("T1"));
    assert_eq!(meta.notify_strategy.as_deref(), Some("BACKOFF_RETRY"));
}

#[tokio::test]
async fn test_unsubscribe() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/topics/T1/subscriptions/S1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    client.unsubscribe("T1", "S1").await.unwrap();
}
