//! # Mock Transport
//!
//! An in-memory [`Transport`] with an expectation queue, for testing actions and
//! resources without a server.
//!
//! | | MockTransport | ReqwestTransport |
//! |---|---|---|
//! | **Speed** | Instant (in-memory) | Real sockets |
//! | **Determinism** | 100% deterministic | Depends on the server |
//! | **Error Injection** | Easy (`return_status`, `return_err`) | Needs a misbehaving server |
//!
//! Expectations are consumed in order. A request that does not match the next
//! expectation (method and path) panics, which fails the test.
//!
//! ```rust
//! use resource_store::http::mock::MockTransport;
//! use resource_store::module::ResourceModule;
//! use resource_store::config::ModuleConfig;
//! use resource_store::path::PathSegments;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockTransport::new();
//!     mock.expect_get("/posts/1/comments")
//!         .return_ok(json!({ "comments": [{ "id": 3, "body": "hi" }] }));
//!
//!     let config = ModuleConfig::new("comments", "http://api.test");
//!     let module = ResourceModule::with_transport(config, Arc::new(mock.clone()));
//!     module.fetch_resources(&PathSegments::new().with("post", 1)).await;
//!
//!     assert_eq!(module.all().len(), 1);
//!     mock.verify();
//! }
//! ```

use crate::error::ResourceError;
use crate::http::{ApiRequest, Method, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One expected request and its canned response.
struct Expectation {
    method: Method,
    path: String,
    response: Result<Value, ResourceError>,
}

/// A transport that replays canned responses.
///
/// Cloning shares the expectation queue, so keep one clone for assertions and
/// hand another to the module.
#[derive(Clone, Default)]
pub struct MockTransport {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    received: Arc<Mutex<Vec<ApiRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    /// Creates a new mock transport with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_get(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::GET, path)
    }

    pub fn expect_post(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::POST, path)
    }

    pub fn expect_put(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::PUT, path)
    }

    pub fn expect_delete(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::DELETE, path)
    }

    fn expect(&self, method: Method, path: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            path: path.into(),
            expectations: self.expectations.clone(),
        }
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.received).clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining != 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ResourceError> {
        lock(&self.received).push(request.clone());
        let expectation = lock(&self.expectations).pop_front();

        match expectation {
            Some(expected) if expected.method == request.method && expected.path == request.path => {
                expected.response
            }
            Some(expected) => panic!(
                "Unexpected request {} {}, expected {} {}",
                request.method, request.path, expected.method, expected.path
            ),
            None => panic!("Unexpected request {} {}", request.method, request.path),
        }
    }
}

/// Builder returned by the `expect_*` methods.
pub struct ExpectationBuilder {
    method: Method,
    path: String,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl ExpectationBuilder {
    /// Responds with a successful JSON body.
    pub fn return_ok(self, body: Value) {
        self.push(Ok(body));
    }

    /// Responds with a non-success status and body.
    pub fn return_status(self, status: u16, body: Value) {
        self.push(Err(ResourceError::Status { status, body }));
    }

    /// Fails with an arbitrary error.
    pub fn return_err(self, error: ResourceError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Value, ResourceError>) {
        lock(&self.expectations).push_back(Expectation {
            method: self.method,
            path: self.path,
            response,
        });
    }
}
