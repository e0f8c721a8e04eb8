//! Maps raw transport responses into [`MnsResponse`] or [`MnsError`].

use std::collections::HashMap;

use crate::clients::errors::{MnsError, ServiceError};
use crate::clients::http_request::HttpMethod;
use crate::clients::http_response::{MnsResponse, RawResponse};
use crate::xml::{decode, entity_fields, extract, Node};

/// Root element name of a service error document.
pub const ERROR_ENTITY: &str = "Error";

/// The request a response belongs to, for error messages.
#[derive(Clone, Copy, Debug)]
pub struct RequestContext<'a> {
    /// The request method.
    pub method: HttpMethod,
    /// The full request URL.
    pub url: &'a str,
}

/// Maps a raw response.
///
/// The body is decoded only when the content type is XML and the body is
/// non-empty. An `Error` document becomes [`MnsError::Service`]; any other
/// document yields the fields of the `entity` root. Only headers named in
/// `exposed_headers` are returned, keyed as the caller spelled them.
///
/// # Errors
///
/// - [`MnsError::Parse`] if an XML-labelled body is malformed
/// - [`MnsError::Service`] if the body is an `Error` document
pub fn map_response(
    raw: RawResponse,
    context: &RequestContext<'_>,
    entity: &str,
    exposed_headers: &[String],
) -> Result<MnsResponse, MnsError> {
    let body = if raw.is_xml() && !raw.body.is_empty() {
        let document = decode(&raw.body).map_err(MnsError::Parse)?;
        if let Some(error) = document.get(ERROR_ENTITY) {
            return Err(service_error(error, raw.status, context).into());
        }
        Some(entity_fields(&document, entity))
    } else {
        None
    };

    let headers: HashMap<String, String> = exposed_headers
        .iter()
        .filter_map(|name| {
            raw.header(name)
                .map(|value| (name.clone(), value.to_string()))
        })
        .collect();

    Ok(MnsResponse {
        code: raw.status,
        headers,
        body,
    })
}

fn service_error(error: &Node, status: u16, context: &RequestContext<'_>) -> ServiceError {
    let error = extract(error.clone());
    let field = |name: &str| {
        error
            .get(name)
            .and_then(Node::as_str)
            .unwrap_or_default()
            .to_string()
    };

    ServiceError {
        code: field("Code"),
        message: field("Message"),
        request_id: field("RequestId"),
        host_id: field("HostId"),
        status,
        method: context.method.to_string(),
        url: context.url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::errors::ServiceErrorKind;

    const URL: &str = "http://123.mns.cn-hangzhou.aliyuncs.com/queues/Q1";

    fn context() -> RequestContext<'static> {
        RequestContext {
            method: HttpMethod::Get,
            url: URL,
        }
    }

    fn raw(status: u16, content_type: &str, body: &str) -> RawResponse {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), vec![content_type.to_string()]);
        headers.insert(
            "location".to_string(),
            vec!["http://123.mns/queues/Q1".to_string()],
        );
        RawResponse::new(status, headers, body.as_bytes().to_vec())
    }

    #[test]
    fn test_maps_entity_fields() {
        let response = map_response(
            raw(
                200,
                "text/xml",
                "<Queue xmlns=\"http://mns.aliyuncs.com/doc/v1/\"><QueueName>Q1</QueueName></Queue>",
            ),
            &context(),
            "Queue",
            &[],
        )
        .unwrap();

        let body = response.body.unwrap();
        assert_eq!(body.len(), 1);
        assert_eq!(body["QueueName"], Node::scalar("Q1"));
        assert!(response.headers.is_empty());
    }

    #[test]
    fn test_error_document_becomes_service_error() {
        let error = map_response(
            raw(
                404,
                "text/xml;charset=utf-8",
                "<Error><Code>QueueNotExist</Code><Message>gone</Message>\
                 <RequestId>r1</RequestId><HostId>h1</HostId></Error>",
            ),
            &context(),
            "Queue",
            &[],
        )
        .unwrap_err();

        let error = error.as_service_error().unwrap();
        assert_eq!(error.kind(), ServiceErrorKind::QueueNotExist);
        assert_eq!(error.status, 404);
        assert_eq!(
            error.to_string(),
            format!("GET {URL} failed with 404. requestid: r1, hostid: h1, message: gone")
        );
    }

    #[test]
    fn test_error_document_with_missing_fields() {
        let error = map_response(
            raw(500, "application/xml", "<Error><Code>InternalError</Code></Error>"),
            &context(),
            "Queue",
            &[],
        )
        .unwrap_err();

        let error = error.as_service_error().unwrap();
        assert_eq!(error.code, "InternalError");
        assert_eq!(error.request_id, "");
        assert_eq!(error.message, "");
    }

    #[test]
    fn test_non_xml_body_is_not_decoded() {
        let response =
            map_response(raw(200, "text/plain", "<Queue/>"), &context(), "Queue", &[]).unwrap();
        assert!(response.body.is_none());
    }

    #[test]
    fn test_empty_xml_body_is_not_decoded() {
        let response = map_response(raw(204, "text/xml", ""), &context(), "Queue", &[]).unwrap();
        assert_eq!(response.code, 204);
        assert!(response.body.is_none());
    }

    #[test]
    fn test_malformed_xml_is_a_parse_error() {
        let error =
            map_response(raw(200, "text/xml", "<Queue>"), &context(), "Queue", &[]).unwrap_err();
        assert!(matches!(error, MnsError::Parse(_)));
    }

    #[test]
    fn test_headers_are_an_allow_list_keyed_by_caller_spelling() {
        let response = map_response(
            raw(201, "text/plain", ""),
            &context(),
            "Queue",
            &["Location".to_string(), "x-mns-missing".to_string()],
        )
        .unwrap();

        assert_eq!(response.headers.len(), 1);
        assert_eq!(response.header("Location"), Some("http://123.mns/queues/Q1"));
        assert!(response.header("content-type").is_none());
    }
}
