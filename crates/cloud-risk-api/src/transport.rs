//! Transport seam and the blocking HTTP implementation.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::ApiError;

/// HTTP method used by backend calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

/// One outgoing backend request.
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    /// Request method.
    pub method: Method,
    /// Path relative to the base URL, starting with `/`.
    pub path: &'static str,
    /// Bearer token attached as `Authorization` header.
    pub bearer: Option<String>,
    /// JSON body.
    pub body: Option<serde_json::Value>,
}

impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Bodies carry passwords and AWS secrets.
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("has_bearer", &self.bearer.is_some())
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Raw backend response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

impl ApiResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstract transport used by [`crate::BackendClient`].
pub trait ApiTransport: Send + Sync {
    /// Sends one request to `url` and returns the raw response.
    ///
    /// Implementations return `Ok` for every HTTP status and reserve `Err`
    /// for failures to obtain a response at all.
    fn send(&self, url: &str, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Blocking `reqwest` transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a transport with a per-request timeout.
    ///
    /// # Errors
    /// Returns [`ApiError::Transport`] when the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| ApiError::Transport(format!("http client setup failed: {error}")))?;
        Ok(Self { client })
    }
}

impl ApiTransport for HttpTransport {
    fn send(&self, url: &str, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(map_reqwest_error)?;
        Ok(ApiResponse { status, body })
    }
}

fn map_reqwest_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout
    } else {
        // Messages never carry the request URL.
        ApiError::Transport(error.without_url().to_string())
    }
}
