//! Integration tests for the Shoe Store.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shoe-store-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - cart, checkout and a file-backed order log, no HTTP
//! - `storefront_routes` - the HTTP router driven in-process
//!
//! Every test gets its own order log under the system temp directory, so
//! tests can run in parallel.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use shoe_store_storefront::{app, config::StorefrontConfig, state::AppState};
use tower::ServiceExt;

/// Response bodies larger than this fail the test.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// A fresh order log path inside its own temp directory.
#[must_use]
pub fn temp_log_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("shoe-store-it-{}", uuid::Uuid::new_v4()))
        .join("shoeOrders.json")
}

/// Response status and decoded body. Non-JSON bodies become a JSON string.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// One visitor talking to an in-process storefront.
///
/// The session cookie from the first response that sets one is replayed on
/// every later request, like a browser would.
#[derive(Clone)]
pub struct TestClient {
    app: Router,
    log_path: PathBuf,
    cookie: Option<String>,
}

impl TestClient {
    /// Start a storefront with an empty order log.
    #[must_use]
    pub fn new() -> Self {
        let log_path = temp_log_path();
        let state = AppState::new(StorefrontConfig::local(&log_path));

        Self {
            app: app(state),
            log_path,
            cookie: None,
        }
    }

    /// Another visitor of the same storefront, with no session yet.
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            app: self.app.clone(),
            log_path: self.log_path.clone(),
            cookie: None,
        }
    }

    /// Order log file used by this storefront.
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Send a GET request.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    /// Send a POST request with a JSON body.
    pub async fn post(&mut self, uri: &str, body: &Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&mut self, uri: &str) -> TestResponse {
        self.send(Method::POST, uri, None).await
    }

    async fn send(&mut self, method: Method, uri: &str, body: Option<&Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .expect("readable body");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse { status, body }
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
