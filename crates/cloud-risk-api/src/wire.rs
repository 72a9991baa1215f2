//! Request and response payloads exchanged with the backend.

use std::fmt;

use cloud_risk_core::{AwsConnection, CustomRule, LogEntry};
use serde::{Deserialize, Serialize};

/// Body of `POST /login`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /register`; same shape as login.
pub type RegisterRequest = LoginRequest;

/// Body of a successful `POST /login`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    /// Bearer token; absent when the backend declined without an error status.
    #[serde(default)]
    pub token: Option<String>,
    /// Optional status text.
    #[serde(default)]
    pub message: Option<String>,
}

/// Generic `{message}` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    /// Status text.
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `GET /api/rules`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RulesResponse {
    /// Complete custom rule set.
    #[serde(rename = "customRules", default)]
    pub custom_rules: Vec<CustomRule>,
}

/// Body of `POST /api/rules/custom`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RulesPayload<'a> {
    /// Complete rule set replacing the stored one.
    #[serde(rename = "customRules")]
    pub custom_rules: &'a [CustomRule],
}

/// Backend endpoint that turns AWS parameters into classified log entries.
///
/// Each endpoint keeps its own body schema; callers only deal with
/// [`AwsConnection`] and [`LogFetchOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogSource {
    /// `POST /api/connect-aws`, log path addressed inside the account.
    ConnectAws,
    /// `POST /fetch-logs`, S3 URI addressed.
    FetchLogs,
    /// `POST /api/analyze`, S3 URI addressed, region inferred by the backend.
    Analyze,
}

impl LogSource {
    /// Every source, in menu order.
    pub const ALL: [LogSource; 3] = [LogSource::ConnectAws, LogSource::FetchLogs, LogSource::Analyze];

    /// Request path.
    pub fn path(&self) -> &'static str {
        match self {
            LogSource::ConnectAws => "/api/connect-aws",
            LogSource::FetchLogs => "/fetch-logs",
            LogSource::Analyze => "/api/analyze",
        }
    }

    /// Short name used on the command line and in logs.
    pub fn name(&self) -> &'static str {
        match self {
            LogSource::ConnectAws => "connect-aws",
            LogSource::FetchLogs => "fetch-logs",
            LogSource::Analyze => "analyze",
        }
    }

    /// Serializes connection parameters into this endpoint's body schema.
    pub fn request_body(&self, connection: &AwsConnection) -> serde_json::Result<serde_json::Value> {
        let credentials = &connection.credentials;
        match self {
            LogSource::ConnectAws => serde_json::to_value(ConnectAwsBody {
                access_key: &credentials.access_key,
                secret_key: &credentials.secret_key,
                region: connection.region.as_str(),
                log_path: &connection.location,
            }),
            LogSource::FetchLogs => serde_json::to_value(FetchLogsBody {
                access_key: &credentials.access_key,
                secret_key: &credentials.secret_key,
                region: connection.region.as_str(),
                s3_path: &connection.location,
            }),
            LogSource::Analyze => serde_json::to_value(AnalyzeBody {
                key: &credentials.access_key,
                secret: &credentials.secret_key,
                s3_path: &connection.location,
            }),
        }
    }
}

impl std::str::FromStr for LogSource {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        LogSource::ALL
            .into_iter()
            .find(|source| source.name() == value)
            .ok_or_else(|| format!("unknown log source '{value}'"))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectAwsBody<'a> {
    access_key: &'a str,
    secret_key: &'a str,
    region: &'a str,
    log_path: &'a str,
}

#[derive(Serialize)]
struct FetchLogsBody<'a> {
    access_key: &'a str,
    secret_key: &'a str,
    region: &'a str,
    s3_path: &'a str,
}

#[derive(Serialize)]
struct AnalyzeBody<'a> {
    key: &'a str,
    secret: &'a str,
    s3_path: &'a str,
}

/// Raw log fetch response in any of the shapes the backend emits.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LogFetchBody {
    Entries(Vec<LogEntry>),
    Envelope {
        #[serde(default)]
        logs: Option<Vec<LogEntry>>,
        #[serde(default)]
        results: Option<Vec<LogEntry>>,
        #[serde(default)]
        message: Option<String>,
    },
}

/// Normalized result of any [`LogSource`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFetchOutcome {
    /// Classified entries; empty when the endpoint only reports a message.
    pub entries: Vec<LogEntry>,
    /// Status text reported by the backend.
    pub message: Option<String>,
}

impl From<LogFetchBody> for LogFetchOutcome {
    fn from(body: LogFetchBody) -> Self {
        match body {
            LogFetchBody::Entries(entries) => Self {
                entries,
                message: None,
            },
            LogFetchBody::Envelope {
                logs,
                results,
                message,
            } => Self {
                entries: logs.or(results).unwrap_or_default(),
                message,
            },
        }
    }
}
