//! JSON HTTP client wrapper.
//!
//! [`HttpClient`] is the seam between controllers and the network. Every request
//! carries a JSON content type, gets exactly one attempt (no retries, no timeout
//! beyond the transport's own) and resolves to either the decoded JSON body or an
//! [`IntakeError`]:
//!
//! - non-success status: [`IntakeError::Application`] carrying the server `message`
//!   field, or the generic fallback when the body has none
//! - connection or body read failure: [`IntakeError::Transport`]
//!
//! A success response with an empty or non-JSON body decodes as an empty object.

use crate::error::{IntakeError, IntakeResult};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde_json::Value;

/// One outgoing JSON request.
#[derive(Clone, Debug, PartialEq)]
pub struct JsonRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
}

impl JsonRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            body: None,
        }
    }

    pub fn post(url: Url, body: Value) -> Self {
        Self {
            method: Method::POST,
            url,
            body: Some(body),
        }
    }

    pub fn put(url: Url, body: Value) -> Self {
        Self {
            method: Method::PUT,
            url,
            body: Some(body),
        }
    }

    pub fn delete(url: Url) -> Self {
        Self {
            method: Method::DELETE,
            url,
            body: None,
        }
    }
}

/// Issues JSON requests against the registries.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends `request` once and returns the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::Application` for a non-success status and
    /// `IntakeError::Transport` when the request cannot be completed.
    async fn request_json(&self, request: JsonRequest) -> IntakeResult<Value>;
}

/// [`HttpClient`] backed by `reqwest`.
#[derive(Clone, Debug, Default)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn request_json(&self, request: JsonRequest) -> IntakeResult<Value> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body).map_err(IntakeError::Serialization)?);
        }

        let response = builder.send().await.inspect_err(|e| {
            tracing::warn!(method = %request.method, url = %request.url, "transport failure: {}", e);
        })?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let err = IntakeError::from_error_body(status.as_u16(), &body);
            tracing::warn!(
                method = %request.method,
                url = %request.url,
                status = status.as_u16(),
                "request rejected: {}",
                err.user_message()
            );
            return Err(err);
        }

        Ok(decode_success_body(&body))
    }
}

/// Decodes a success body, treating an empty or malformed body as `{}`.
pub(crate) fn decode_success_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_success_body_parses_json() {
        assert_eq!(decode_success_body(br#"{"dni":"123"}"#), json!({"dni": "123"}));
    }

    #[test]
    fn test_decode_success_body_tolerates_empty_and_garbage() {
        assert_eq!(decode_success_body(b""), json!({}));
        assert_eq!(decode_success_body(b"OK"), json!({}));
    }

    #[test]
    fn test_request_constructors_set_method_and_body() {
        let url = Url::parse("http://registry.test/pacientes").expect("valid url");

        let post = JsonRequest::post(url.clone(), json!({"dni": "1"}));
        assert_eq!(post.method, Method::POST);
        assert_eq!(post.body, Some(json!({"dni": "1"})));

        let delete = JsonRequest::delete(url);
        assert_eq!(delete.method, Method::DELETE);
        assert!(delete.body.is_none());
    }
}
