//! # HTTP Boundary
//!
//! Every request a module makes goes through a [`Transport`]. Production code uses
//! [`ReqwestTransport`]; tests swap in [`mock::MockTransport`] so actions can be
//! exercised without a server.
//!
//! [`HttpClient`] binds a transport to a module's base URL, so resources only ever
//! deal in paths like `/posts/abc/comments/7`.

pub mod mock;

use crate::error::ResourceError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub use reqwest::Method;

/// One outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute URL (base URL + path).
    pub url: String,
    /// Path relative to the base URL.
    pub path: String,
    pub body: Option<Value>,
}

/// Sends requests and decodes JSON responses.
///
/// Implementations map non-success statuses to [`ResourceError::Status`] and
/// return [`Value::Null`] for empty bodies.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: ApiRequest) -> Result<Value, ResourceError>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client, e.g. one with a request timeout.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ResourceError> {
        let mut builder = self.client.request(request.method, &request.url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ResourceError::Transport(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ResourceError::Transport(e.to_string()))?;

        if !status.is_success() {
            // keep whatever the server said, JSON or not
            let body = serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
            return Err(ResourceError::Status {
                status: status.as_u16(),
                body,
            });
        }
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ResourceError::Decode(e.to_string()))
    }
}

/// A transport bound to a base URL.
#[derive(Clone)]
pub struct HttpClient {
    base_url: Arc<str>,
    transport: Arc<dyn Transport>,
}

impl HttpClient {
    /// A trailing `/` on `base_url` is dropped; paths always start with one.
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: Arc::from(base_url.trim_end_matches('/')),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<Value, ResourceError> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Map<String, Value>) -> Result<Value, ResourceError> {
        self.send(Method::POST, path, Some(Value::Object(body.clone())))
            .await
    }

    pub async fn put(&self, path: &str, body: &Map<String, Value>) -> Result<Value, ResourceError> {
        self.send(Method::PUT, path, Some(Value::Object(body.clone())))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ResourceError> {
        self.send(Method::DELETE, path, None).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ResourceError> {
        let url = self.url(path);
        debug!(%method, %url, ?body, "Sending request");
        self.transport
            .send(ApiRequest {
                method,
                url,
                path: path.to_string(),
                body,
            })
            .await
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::MockTransport;
    use serde_json::json;

    #[tokio::test]
    async fn client_joins_base_url_and_path() {
        let mock = MockTransport::new();
        mock.expect_get("/posts").return_ok(json!({ "posts": [] }));

        let client = HttpClient::new("http://api.test/", Arc::new(mock.clone()));
        assert_eq!(client.base_url(), "http://api.test");

        let body = client.get("/posts").await.unwrap();
        assert_eq!(body, json!({ "posts": [] }));

        let requests = mock.requests();
        assert_eq!(requests[0].url, "http://api.test/posts");
        assert_eq!(requests[0].method, Method::GET);
        mock.verify();
    }

    #[tokio::test]
    async fn post_sends_attributes_as_body() {
        let mock = MockTransport::new();
        mock.expect_post("/posts/").return_ok(json!({ "id": 9 }));

        let client = HttpClient::new("http://api.test", Arc::new(mock.clone()));
        let mut attributes = Map::new();
        attributes.insert("title".into(), json!("x"));

        client.post("/posts/", &attributes).await.unwrap();
        assert_eq!(mock.requests()[0].body, Some(json!({ "title": "x" })));
    }
}
