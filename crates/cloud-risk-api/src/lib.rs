#![warn(missing_docs)]
//! # cloud-risk-api
//!
//! ## Purpose
//! Typed client for the CloudTrail risk-analysis backend.
//!
//! ## Responsibilities
//! - Validate the backend base URL against the transport security policy.
//! - Encode each endpoint's request schema and decode its response shape.
//! - Map non-2xx responses and transport failures into [`ApiError`].
//! - Provide the single user-facing error text contract,
//!   [`ApiError::user_message`].
//!
//! ## Data flow
//! View builds a typed request -> [`BackendClient`] encodes it as
//! [`ApiRequest`] -> [`ApiTransport`] performs the round trip -> typed
//! response or [`ApiError`] returns to the view.
//!
//! ## Ownership and lifetimes
//! Responses are owned values. The transport is shared behind `Arc` so one
//! client can be cloned into every view.
//!
//! ## Error model
//! Exactly one request per call; nothing is retried. Callers decide what text
//! to show via [`ApiError::user_message`].
//!
//! ## Security and privacy notes
//! AWS secrets travel in request bodies, so plain `http` is only accepted for
//! loopback backends. Request bodies and tokens are never logged.

mod transport;
mod wire;

use std::sync::Arc;

use cloud_risk_core::{AwsConnection, CustomRule};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};
use url::{Host, Url};

pub use transport::{ApiRequest, ApiResponse, ApiTransport, HttpTransport, Method};
pub use wire::{
    LogFetchOutcome, LogSource, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    RulesPayload, RulesResponse,
};

use wire::LogFetchBody;

/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Login path.
pub const LOGIN_PATH: &str = "/login";
/// Registration path.
pub const REGISTER_PATH: &str = "/register";
/// Rule set read path.
pub const RULES_PATH: &str = "/api/rules";
/// Rule set replace path.
pub const CUSTOM_RULES_PATH: &str = "/api/rules/custom";

/// Backend client bound to one validated base URL.
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    transport: Arc<dyn ApiTransport>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Creates a client after validating the base URL.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidEndpoint`] when the URL violates
    /// [`validate_base_url`].
    pub fn new(base_url: &str, transport: Arc<dyn ApiTransport>) -> Result<Self, ApiError> {
        let parsed = validate_base_url(base_url)?;
        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            transport,
        })
    }

    /// Configured base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchanges credentials for a token.
    ///
    /// # Errors
    /// Returns [`ApiError`] on transport failure or non-2xx status.
    pub fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.call(Method::Post, LOGIN_PATH, None, Some(encode(request)?))
    }

    /// Creates an account.
    ///
    /// # Errors
    /// Returns [`ApiError`] on transport failure or non-2xx status.
    pub fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, ApiError> {
        self.call(Method::Post, REGISTER_PATH, None, Some(encode(request)?))
    }

    /// Asks the backend to fetch and classify logs from S3.
    ///
    /// # Errors
    /// Returns [`ApiError`] on transport failure, non-2xx status, or a body
    /// matching none of the known shapes.
    pub fn fetch_logs(
        &self,
        source: LogSource,
        connection: &AwsConnection,
        bearer: Option<&str>,
    ) -> Result<LogFetchOutcome, ApiError> {
        let body = source
            .request_body(connection)
            .map_err(|error| ApiError::Encode(error.to_string()))?;
        let raw: LogFetchBody = self.call(Method::Post, source.path(), bearer, Some(body))?;
        let outcome = LogFetchOutcome::from(raw);
        info!(
            source = source.name(),
            entries = outcome.entries.len(),
            "log fetch completed"
        );
        Ok(outcome)
    }

    /// Reads the complete custom rule set.
    ///
    /// # Errors
    /// Returns [`ApiError`] on transport failure or non-2xx status.
    pub fn get_rules(&self, bearer: Option<&str>) -> Result<Vec<CustomRule>, ApiError> {
        let response: RulesResponse = self.call(Method::Get, RULES_PATH, bearer, None)?;
        Ok(response.custom_rules)
    }

    /// Replaces the complete custom rule set.
    ///
    /// # Errors
    /// Returns [`ApiError`] on transport failure or non-2xx status.
    pub fn set_rules(
        &self,
        rules: &[CustomRule],
        bearer: Option<&str>,
    ) -> Result<MessageResponse, ApiError> {
        let body = encode(&RulesPayload {
            custom_rules: rules,
        })?;
        self.call(Method::Post, CUSTOM_RULES_PATH, bearer, Some(body))
    }

    fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &'static str,
        bearer: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let request = ApiRequest {
            method,
            path,
            bearer: bearer.map(str::to_string),
            body,
        };
        let url = format!("{}{}", self.base_url, path);

        let response = self.transport.send(&url, &request).inspect_err(|error| {
            warn!(path, %error, "backend unreachable");
        })?;

        if !response.is_success() {
            let message = backend_message(&response.body);
            warn!(path, status = response.status, "backend rejected request");
            return Err(ApiError::Status {
                status: response.status,
                message,
            });
        }

        let body = if response.body.trim().is_empty() {
            "{}"
        } else {
            response.body.as_str()
        };
        serde_json::from_str(body).map_err(|error| ApiError::Decode(error.to_string()))
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|error| ApiError::Encode(error.to_string()))
}

fn backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

/// Validates the backend base URL.
///
/// `https` is accepted for any host. Plain `http` is accepted only for
/// loopback hosts, since request bodies carry AWS secret material.
///
/// # Errors
/// Returns [`ApiError::InvalidEndpoint`] for unparsable URLs, other schemes,
/// or non-loopback `http` hosts.
pub fn validate_base_url(base_url: &str) -> Result<Url, ApiError> {
    let parsed = Url::parse(base_url)
        .map_err(|error| ApiError::InvalidEndpoint(format!("invalid base url: {error}")))?;

    let loopback = match parsed.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(address)) => address.is_loopback(),
        Some(Host::Ipv6(address)) => address.is_loopback(),
        None => {
            return Err(ApiError::InvalidEndpoint(
                "base url must include a host".to_string(),
            ));
        }
    };

    match parsed.scheme() {
        "https" => Ok(parsed),
        "http" if loopback => Ok(parsed),
        "http" => Err(ApiError::InvalidEndpoint(
            "plain http is only allowed for loopback backends".to_string(),
        )),
        other => Err(ApiError::InvalidEndpoint(format!(
            "unsupported scheme '{other}'"
        ))),
    }
}

/// Coarse failure category used for logging and UI decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// No response was obtained.
    Transport,
    /// Backend answered with a non-success status.
    Rejected,
    /// Request or response violated the wire contract.
    Contract,
}

/// Backend client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Base URL violates the transport policy.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Connection-level failure.
    #[error("transport failure: {0}")]
    Transport(String),
    /// Request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,
    /// Backend answered with a non-2xx status.
    #[error("backend returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// `message` field of the error body, when present.
        message: Option<String>,
    },
    /// Request body could not be encoded.
    #[error("request encode failure: {0}")]
    Encode(String),
    /// Success body did not match the expected shape.
    #[error("response decode failure: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text shown to the user for this failure.
    ///
    /// Prefers the backend-provided message; otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Failure category.
    pub fn class(&self) -> FailureClass {
        match self {
            ApiError::Transport(_) | ApiError::Timeout => FailureClass::Transport,
            ApiError::Status { .. } => FailureClass::Rejected,
            ApiError::InvalidEndpoint(_) | ApiError::Encode(_) | ApiError::Decode(_) => {
                FailureClass::Contract
            }
        }
    }
}
