#![warn(missing_docs)]
//! # cloud-risk-app
//!
//! ## Purpose
//! Orchestrates session, backend client, views and configuration for the
//! `cloud-risk` terminal client.
//!
//! ## Responsibilities
//! - Load layered configuration and install the tracing subscriber.
//! - Build the HTTP transport and the file-backed session at startup.
//! - Route every navigation through the session guard.
//! - Provide log redaction helpers for detail strings.
//!
//! ## Data flow
//! CLI arguments -> [`ClientConfig`] -> [`App`] (session + client) -> views in
//! `cloud-risk-ui` -> terminal output.
//!
//! ## Ownership and lifetimes
//! [`App`] owns the session and a cloneable client for the lifetime of one
//! command. Views are created per command and borrow both.
//!
//! ## Error model
//! Subsystem failures are wrapped in [`AppError`]. The binary adds context
//! with `anyhow` and exits non-zero.
//!
//! ## Security and privacy notes
//! - Plain `http` backends are refused unless they are loopback hosts.
//! - Passwords and secret keys are prompted for, never taken from arguments.
//! - [`redact_sensitive`] strips credential markers from detail strings.

pub mod settings;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use cloud_risk_analysis::AnalysisError;
use cloud_risk_api::{ApiError, ApiTransport, BackendClient, HttpTransport};
use cloud_risk_session::{
    FileTokenStore, Route, RouteDecision, SessionContext, SessionError, guard,
};
use cloud_risk_ui::{DashboardView, LoginForm, Navigation, RegisterForm, UiError};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use settings::{ApiConfig, ClientConfig, LogFormat, LoggingConfig, SessionConfig};

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("CLOUD_RISK_VERSION");

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Current wall clock in Unix epoch milliseconds.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Errors
/// Returns [`AppError::Logging`] when a subscriber is already installed.
pub fn init_tracing(logging: &LoggingConfig) -> Result<(), AppError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    installed.map_err(|error| AppError::Logging(error.to_string()))
}

/// Markers whose trailing text is removed by [`redact_sensitive`].
pub const SENSITIVE_MARKERS: [&str; 5] = ["password", "token", "authorization", "bearer", "secret"];

/// Redacts everything from the first sensitive marker onward.
pub fn redact_sensitive(input: &str) -> String {
    let lower = input.to_ascii_lowercase();
    let first = SENSITIVE_MARKERS
        .iter()
        .filter_map(|marker| lower.find(marker).map(|position| (position, *marker)))
        .min_by_key(|(position, _)| *position);

    match first {
        Some((position, marker)) => format!("{}{marker}=<redacted>", &input[..position]),
        None => input.to_string(),
    }
}

/// One running client: session, backend client and current route.
#[derive(Debug)]
pub struct App {
    session: SessionContext,
    client: BackendClient,
    route: Route,
}

impl App {
    /// Wires an app from parts and lands on the guarded root route.
    pub fn new(session: SessionContext, client: BackendClient) -> Self {
        let route = guard(Route::Dashboard, session.is_authenticated())
            .target()
            .clone();
        Self {
            session,
            client,
            route,
        }
    }

    /// Builds the HTTP transport and restores the persisted session.
    ///
    /// # Errors
    /// Returns [`AppError::Api`] for an invalid base URL or client setup
    /// failure and [`AppError::Session`] when the token file is unreadable.
    pub fn from_config(config: &ClientConfig, now_ms: u64) -> Result<Self, AppError> {
        let transport: Arc<dyn ApiTransport> = Arc::new(HttpTransport::new(config.api.timeout())?);
        let client = BackendClient::new(&config.api.base_url, transport)?;
        let store = Arc::new(FileTokenStore::new(config.session.token_path.clone()));
        let session = SessionContext::restore(store, now_ms)?;
        info!(
            base_url = client.base_url(),
            authenticated = session.is_authenticated(),
            "client started"
        );
        Ok(Self::new(session, client))
    }

    /// Route currently on screen.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Session context.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Backend client.
    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    /// Bearer token for authenticated calls, read at call time.
    ///
    /// # Errors
    /// Returns [`AppError::Session`] when the token slot is unreadable.
    pub fn bearer(&self) -> Result<Option<String>, AppError> {
        Ok(self.session.bearer()?)
    }

    /// Navigates to `path` through the guard.
    pub fn navigate(&mut self, path: &str) -> RouteDecision {
        let decision = guard(Route::parse(path), self.session.is_authenticated());
        self.route = decision.target().clone();
        decision
    }

    /// Performs a navigation requested by a view. Delays are the caller's
    /// concern.
    pub fn follow(&mut self, navigation: &Navigation) -> RouteDecision {
        self.navigate(navigation.route.path())
    }

    /// Requires that `route` renders for the current session.
    ///
    /// # Errors
    /// Returns [`AppError::Unauthenticated`] when the guard redirects.
    pub fn require(&mut self, route: Route) -> Result<(), AppError> {
        match self.navigate(route.path()) {
            RouteDecision::Render(_) => Ok(()),
            RouteDecision::Redirect(target) => Err(AppError::Unauthenticated(target)),
        }
    }

    /// Submits the login form and follows its navigation.
    ///
    /// # Errors
    /// Returns [`AppError::Ui`] when the token slot cannot be written.
    pub fn submit_login(&mut self, form: &mut LoginForm, now_ms: u64) -> Result<&Route, AppError> {
        if let Some(navigation) = form.submit(&self.client, &mut self.session, now_ms)? {
            self.follow(&navigation);
        }
        Ok(&self.route)
    }

    /// Submits the register form; the returned navigation is delayed.
    pub fn submit_register(&self, form: &mut RegisterForm) -> Option<Navigation> {
        form.submit(&self.client)
    }

    /// Ends the session and returns to the login view.
    ///
    /// # Errors
    /// Returns [`AppError::Session`] when the token slot cannot be cleared.
    pub fn logout(&mut self) -> Result<(), AppError> {
        self.session.logout()?;
        self.navigate(Route::Login.path());
        Ok(())
    }

    /// Dashboard for the signed-in user.
    pub fn dashboard(&self) -> Option<DashboardView> {
        self.session.email().map(DashboardView::new)
    }
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    /// Backend client error.
    #[error("backend error: {0}")]
    Api(#[from] ApiError),
    /// Session storage error.
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    /// View layer error.
    #[error("view error: {0}")]
    Ui(#[from] UiError),
    /// Saved log export error.
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),
    /// Tracing subscriber could not be installed.
    #[error("logging setup error: {0}")]
    Logging(String),
    /// Protected view requested without a session.
    #[error("not logged in (redirected to {0})")]
    Unauthenticated(Route),
}

#[cfg(test)]
mod tests {
    //! Unit tests for redaction.

    use super::*;

    #[test]
    fn redacts_from_earliest_marker() {
        assert_eq!(
            redact_sensitive("user=a secret=abc token=def"),
            "user=a secret=<redacted>"
        );
        assert_eq!(redact_sensitive("plain detail"), "plain detail");
    }
}
