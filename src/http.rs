//! HTTP client abstraction for talking to the marketplace API.
//!
//! This module defines the `HttpClient` trait to abstract HTTP request execution,
//! enabling testability with mock implementations.

use crate::error::Result;
use async_trait::async_trait;

/// HTTP method used against the marketplace API.
///
/// The API surface only ever needs reads and writes, so the method set is
/// closed rather than free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to be executed against the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// The path portion of the URL (e.g., "/print-requests/mine/")
    pub path: String,
    /// Optional JSON request body
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Option<serde_json::Value>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body,
        }
    }
}

/// One file in a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A multipart form body, kept client-agnostic so mocks can record it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    /// Plain text fields, in submission order
    pub texts: Vec<(String, String)>,
    /// File parts as (field name, file)
    pub files: Vec<(String, FilePart)>,
}

impl MultipartForm {
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.texts.push((name.into(), value.into()));
        self
    }

    pub fn file(mut self, name: impl Into<String>, part: FilePart) -> Self {
        self.files.push((name.into(), part));
        self
    }
}

/// Response from an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as a string
    pub body: String,
}

impl HttpResponse {
    /// True for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON into `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Trait for executing HTTP requests.
///
/// This abstraction allows for different implementations (production vs. testing)
/// and makes the lifecycle controller testable without making real HTTP calls.
///
/// # Example
/// ```ignore
/// let client = ReqwestHttpClient::new("https://api.example.com");
/// let response = client.execute(&ApiRequest::get("/products/"), None).await?;
/// println!("Status: {}, Body: {}", response.status, response.body);
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync + Clone {
    /// Execute an HTTP request.
    ///
    /// # Arguments
    /// * `request` - The request data containing method, path, and body
    /// * `token` - Bearer token for the Authorization header, if the caller
    ///   has one. `None` sends no Authorization header.
    ///
    /// # Errors
    /// Returns an error if the request fails due to network issues or the
    /// URL is invalid. Non-2xx responses are NOT errors at this layer; the
    /// caller branches on `HttpResponse::is_success`.
    async fn execute(&self, request: &ApiRequest, token: Option<&str>) -> Result<HttpResponse>;

    /// Execute a multipart POST (file uploads).
    ///
    /// Same error contract as [`execute`](Self::execute).
    async fn execute_multipart(
        &self,
        path: &str,
        form: MultipartForm,
        token: Option<&str>,
    ) -> Result<HttpResponse>;
}

// ============================================================================
// Production Implementation using reqwest
// ============================================================================

/// Production HTTP client using reqwest.
///
/// This implementation makes real HTTP requests against the configured base URL.
/// No timeout is configured beyond the transport default.
#[derive(Clone)]
pub struct ReqwestHttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new reqwest-based HTTP client for the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    #[tracing::instrument(skip(self, request, token), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: &ApiRequest, token: Option<&str>) -> Result<HttpResponse> {
        let url = format!("{}{}", self.base_url, request.path);

        tracing::debug!(url = %url, "Executing HTTP request");

        let mut req = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "HTTP request failed");
            e
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(status = status, response_len = body.len(), "HTTP request completed");

        Ok(HttpResponse { status, body })
    }

    #[tracing::instrument(skip(self, form, token), fields(path = %path))]
    async fn execute_multipart(
        &self,
        path: &str,
        form: MultipartForm,
        token: Option<&str>,
    ) -> Result<HttpResponse> {
        let url = format!("{}{}", self.base_url, path);

        let mut multipart = reqwest::multipart::Form::new();
        for (name, value) in form.texts {
            multipart = multipart.text(name, value);
        }
        for (name, part) in form.files {
            multipart = multipart.part(
                name,
                reqwest::multipart::Part::bytes(part.bytes).file_name(part.file_name),
            );
        }

        let mut req = self.client.post(&url).multipart(multipart);
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let response = req.send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Multipart upload failed");
            e
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(status = status, "Multipart upload completed");

        Ok(HttpResponse { status, body })
    }
}

// ============================================================================
// Test/Mock Implementation
// ============================================================================

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Mock HTTP client for testing.
///
/// Allows configuring predetermined responses for specific requests without
/// making actual HTTP calls.
///
/// # Example
/// ```ignore
/// let mock = MockHttpClient::new();
/// mock.add_response(
///     "GET /print-requests/mine/",
///     Ok(HttpResponse { status: 200, body: "[]".to_string() }),
/// );
/// ```
#[derive(Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, Vec<Result<HttpResponse>>>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

/// Record of a call made to the mock HTTP client.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub form: Option<MultipartForm>,
    pub token: Option<String>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predetermined response for a specific method and path.
    ///
    /// The key is formatted as "{method} {path}". Multiple responses can be
    /// added for the same key - they will be returned in FIFO order.
    pub fn add_response(&self, key: &str, response: Result<HttpResponse>) {
        self.responses
            .lock()
            .entry(key.to_string())
            .or_default()
            .push(response);
    }

    /// Shorthand for a 200 response with the given JSON body.
    pub fn add_ok(&self, key: &str, body: &str) {
        self.add_response(
            key,
            Ok(HttpResponse {
                status: 200,
                body: body.to_string(),
            }),
        );
    }

    /// Get all calls that have been made to this mock client.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    /// Get the number of calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn next_response(&self, key: &str) -> Result<HttpResponse> {
        let response = {
            let mut responses = self.responses.lock();
            match responses.get_mut(key) {
                Some(queue) if !queue.is_empty() => Some(queue.remove(0)),
                _ => None,
            }
        };

        match response {
            Some(response) => response,
            None => Err(crate::error::EncargoError::Other(anyhow::anyhow!(
                "No mock response configured for {}",
                key
            ))),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: &ApiRequest, token: Option<&str>) -> Result<HttpResponse> {
        self.calls.lock().push(MockCall {
            method: request.method,
            path: request.path.clone(),
            body: request.body.clone(),
            form: None,
            token: token.map(|t| t.to_string()),
        });

        self.next_response(&format!("{} {}", request.method, request.path))
    }

    async fn execute_multipart(
        &self,
        path: &str,
        form: MultipartForm,
        token: Option<&str>,
    ) -> Result<HttpResponse> {
        self.calls.lock().push(MockCall {
            method: Method::Post,
            path: path.to_string(),
            body: None,
            form: Some(form),
            token: token.map(|t| t.to_string()),
        });

        self.next_response(&format!("POST {}", path))
    }
}
