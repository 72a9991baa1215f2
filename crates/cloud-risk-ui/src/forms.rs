//! Login, register and AWS log fetch forms.
//!
//! Each form owns its field values and its inline message. `submit` performs
//! at most one backend request and returns where the shell should navigate
//! next, if anywhere.

use std::time::Duration;

use cloud_risk_api::{BackendClient, LogSource, LoginRequest, LoginResponse, RegisterRequest};
use cloud_risk_core::{AwsConnection, AwsRegion, DEFAULT_REGION, LogEntry};
use cloud_risk_session::{Route, SessionContext};
use tracing::{info, warn};

use crate::{Navigation, Notice, UiError};

/// Delay before a successful registration navigates to the login view.
pub const REGISTER_REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Backend message that marks a successful registration.
pub const REGISTERED_MESSAGE: &str = "User registered";

/// Email and password login form.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    error: Option<String>,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl LoginForm {
    /// Creates a form with prefilled fields.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            error: None,
        }
    }

    /// Inline error from the last submission.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submits the credentials.
    ///
    /// On a token response the session is updated and the shell is sent to the
    /// dashboard; the route guard handles a token that turns out expired.
    ///
    /// # Errors
    /// Returns [`UiError::Session`] when the token slot cannot be written.
    pub fn submit(
        &mut self,
        client: &BackendClient,
        session: &mut SessionContext,
        now_ms: u64,
    ) -> Result<Option<Navigation>, UiError> {
        self.error = None;
        if self.email.trim().is_empty() || self.password.is_empty() {
            self.error = Some("Email and password are required.".to_string());
            return Ok(None);
        }

        let request = LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };
        info!("login attempt");

        match client.login(&request) {
            Ok(LoginResponse {
                token: Some(token), ..
            }) if !token.trim().is_empty() => {
                session.set_token(Some(token), now_ms)?;
                info!(authenticated = session.is_authenticated(), "login succeeded");
                Ok(Some(Navigation::to(Route::Dashboard)))
            }
            Ok(_) => {
                warn!("login response carried no token");
                self.error = Some("Login failed".to_string());
                Ok(None)
            }
            Err(error) => {
                warn!(class = ?error.class(), "login failed");
                self.error = Some(error.user_message("Invalid credentials"));
                Ok(None)
            }
        }
    }
}

/// Account registration form.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    /// Account email.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Repeated password.
    pub confirm_password: String,
    notice: Option<Notice>,
}

impl std::fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterForm")
            .field("email", &self.email)
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

impl RegisterForm {
    /// Creates a form with prefilled fields.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
            notice: None,
        }
    }

    /// Success or error text from the last submission.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Submits the registration.
    ///
    /// Success schedules an unconditional delayed navigation to `/login`.
    pub fn submit(&mut self, client: &BackendClient) -> Option<Navigation> {
        self.notice = None;
        if self.email.trim().is_empty() || self.password.is_empty() {
            self.notice = Some(Notice::error("Email and password are required."));
            return None;
        }
        if self.password != self.confirm_password {
            self.notice = Some(Notice::error("Passwords don't match"));
            return None;
        }

        let request = RegisterRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };

        match client.register(&request) {
            Ok(response) if response.message.as_deref() == Some(REGISTERED_MESSAGE) => {
                info!("registration succeeded");
                self.notice = Some(Notice::success(
                    "Registration successful! Redirecting to login...",
                ));
                Some(Navigation::after(Route::Login, REGISTER_REDIRECT_DELAY))
            }
            Ok(response) => {
                self.notice = Some(Notice::error(
                    response
                        .message
                        .filter(|message| !message.trim().is_empty())
                        .unwrap_or_else(|| "Registration failed".to_string()),
                ));
                None
            }
            Err(error) => {
                warn!(class = ?error.class(), "registration failed");
                self.notice = Some(Notice::error(error.user_message("Registration failed")));
                None
            }
        }
    }
}

/// Success text shown after a completed fetch from `source`.
pub fn fetch_success_text(source: LogSource, backend_message: Option<&str>) -> String {
    match source {
        LogSource::ConnectAws => "Connected & Logs Fetched!".to_string(),
        LogSource::FetchLogs => backend_message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or("Logs fetched and analyzed successfully!")
            .to_string(),
        LogSource::Analyze => "Analysis complete".to_string(),
    }
}

/// Fallback error text for a failed fetch from `source`.
pub fn fetch_failure_fallback(source: LogSource) -> &'static str {
    match source {
        LogSource::ConnectAws => "Error connecting to AWS",
        LogSource::FetchLogs => "Error fetching or analyzing logs.",
        LogSource::Analyze => "Error analyzing logs.",
    }
}

/// Clears the in-flight flag when dropped, whatever the request outcome.
struct InFlight<'a> {
    flag: &'a mut bool,
}

impl<'a> InFlight<'a> {
    fn begin(flag: &'a mut bool) -> Self {
        *flag = true;
        Self { flag }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

/// AWS credentials and log location form feeding one [`LogSource`].
#[derive(Clone, PartialEq, Eq)]
pub struct LogFetchForm {
    source: LogSource,
    /// AWS access key id.
    pub access_key: String,
    /// AWS secret access key; cleared once a request completes.
    pub secret_key: String,
    /// Region code as typed or selected.
    pub region: String,
    /// Log path or S3 URI, depending on the source.
    pub location: String,
    submitting: bool,
    notice: Option<Notice>,
    entries: Vec<LogEntry>,
}

impl std::fmt::Debug for LogFetchForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogFetchForm")
            .field("source", &self.source)
            .field("region", &self.region)
            .field("location", &self.location)
            .field("has_secret", &!self.secret_key.is_empty())
            .field("submitting", &self.submitting)
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl LogFetchForm {
    /// Creates an empty form bound to `source` with the default region.
    pub fn new(source: LogSource) -> Self {
        Self {
            source,
            access_key: String::new(),
            secret_key: String::new(),
            region: DEFAULT_REGION.to_string(),
            location: String::new(),
            submitting: false,
            notice: None,
            entries: Vec::new(),
        }
    }

    /// Endpoint this form submits to.
    pub fn source(&self) -> LogSource {
        self.source
    }

    /// Returns `true` while a request is outstanding.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Success or error text from the last submission.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Entries returned by the last successful submission.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Validates the fields and submits them once.
    ///
    /// Validation failures show "Please fill all fields." (or an unknown
    /// region message) and send nothing. The exclusive borrow keeps a second
    /// submission out while a request is outstanding; the in-flight flag is
    /// cleared on every exit path.
    pub fn submit(&mut self, client: &BackendClient, bearer: Option<&str>) {
        self.notice = None;

        let region = match AwsRegion::parse(&self.region) {
            Ok(region) => region,
            Err(error) => {
                self.notice = Some(Notice::error(error.to_string()));
                return;
            }
        };
        let connection =
            match AwsConnection::new(&self.access_key, &self.secret_key, region, &self.location) {
                Ok(connection) => connection,
                Err(_) => {
                    self.notice = Some(Notice::error("Please fill all fields."));
                    return;
                }
            };

        self.entries.clear();
        let _in_flight = InFlight::begin(&mut self.submitting);
        let result = client.fetch_logs(self.source, &connection, bearer);
        self.secret_key.clear();

        match result {
            Ok(outcome) => {
                self.notice = Some(Notice::success(fetch_success_text(
                    self.source,
                    outcome.message.as_deref(),
                )));
                self.entries = outcome.entries;
            }
            Err(error) => {
                warn!(source = self.source.name(), class = ?error.class(), "log fetch failed");
                self.notice = Some(Notice::error(
                    error.user_message(fetch_failure_fallback(self.source)),
                ));
            }
        }
    }
}
