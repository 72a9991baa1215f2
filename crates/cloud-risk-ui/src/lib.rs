#![warn(missing_docs)]
//! # cloud-risk-ui
//!
//! ## Purpose
//! Defines the view state model for `cloud-risk`: forms, the rules editor,
//! the dashboard and the text chart renderer.
//!
//! ## Responsibilities
//! - Validate form input before any backend request is made.
//! - Turn backend replies into inline success or error notices.
//! - Keep the displayed rule set in step with the backend-confirmed set.
//! - Project log entries into table rows and chart output.
//!
//! ## Data flow
//! Shell events call view methods (`submit`, `mount`, `add`, `select_*`) ->
//! views call [`cloud_risk_api::BackendClient`] -> replies update view state
//! and return a [`Navigation`] for the shell to perform.
//!
//! ## Ownership and lifetimes
//! Views own all their field values and results. The client and session are
//! borrowed per call, so one shell can drive every view.
//!
//! ## Error model
//! Backend and validation failures become [`Notice`] values, never errors.
//! Only token slot I/O surfaces as [`UiError`].
//!
//! ## Security and privacy notes
//! Debug output of forms omits passwords and secret keys. The fetch form
//! clears its secret key once a request completes.

pub mod forms;
pub mod render;
pub mod rules_editor;

use std::time::Duration;

use cloud_risk_analysis::{ChartMode, ChartSpec, RiskBreakdown, build_chart};
use cloud_risk_api::LogSource;
use cloud_risk_core::LogEntry;
use cloud_risk_session::{Route, SessionError};
use thiserror::Error;

pub use forms::{LogFetchForm, LoginForm, RegisterForm};
pub use render::render_chart;
pub use rules_editor::{PendingRules, RuleDraft, RulesEditor, RulesOutcome};

/// Shown by log tables with no entries.
pub const EMPTY_LOGS_TEXT: &str = "No logs available";

/// Kind of inline message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Action succeeded.
    Success,
    /// Action failed or was rejected.
    Error,
}

/// Inline message shown under a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Message kind.
    pub kind: NoticeKind,
    /// Display text.
    pub text: String,
}

impl Notice {
    /// Success text.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    /// Error text.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    /// Returns `true` for error notices.
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// Navigation requested by a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Destination.
    pub route: Route,
    /// Wait before navigating; zero means immediately.
    pub delay: Duration,
}

impl Navigation {
    /// Immediate navigation.
    pub fn to(route: Route) -> Self {
        Self {
            route,
            delay: Duration::ZERO,
        }
    }

    /// Navigation after `delay`.
    pub fn after(route: Route, delay: Duration) -> Self {
        Self { route, delay }
    }
}

/// One row of a log table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    /// Event name, `N/A` when missing.
    pub event_name: String,
    /// Risk label.
    pub risk: String,
    /// Classification reason.
    pub reason: String,
}

impl From<&LogEntry> for LogRow {
    fn from(entry: &LogEntry) -> Self {
        let risk = match entry.risk_level() {
            Some(level) => level.as_str().to_string(),
            None => entry.risk.clone(),
        };
        Self {
            event_name: entry.display_event_name().to_string(),
            risk,
            reason: entry.reason.clone(),
        }
    }
}

/// Projects entries into table rows, preserving order.
pub fn log_rows(entries: &[LogEntry]) -> Vec<LogRow> {
    entries.iter().map(LogRow::from).collect()
}

/// Dashboard side menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Menu {
    /// AWS connection and log fetch.
    #[default]
    Fetch,
    /// Rules editor.
    CustomRules,
    /// Chart view.
    Visualization,
    /// Settings placeholder.
    Settings,
    /// Ends the session.
    Logout,
}

impl Menu {
    /// Every entry, in menu order.
    pub const ALL: [Menu; 5] = [
        Menu::Fetch,
        Menu::CustomRules,
        Menu::Visualization,
        Menu::Settings,
        Menu::Logout,
    ];

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            Menu::Fetch => "Fetch / Analysis",
            Menu::CustomRules => "Custom Rules",
            Menu::Visualization => "Visualization",
            Menu::Settings => "Settings",
            Menu::Logout => "Logout",
        }
    }
}

/// Authenticated dashboard.
#[derive(Debug, Clone)]
pub struct DashboardView {
    email: String,
    menu: Menu,
    chart_mode: ChartMode,
    /// AWS connection form.
    pub fetch: LogFetchForm,
    /// Rules editor.
    pub rules: RulesEditor,
}

impl DashboardView {
    /// Creates the dashboard for the signed-in `email`.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            menu: Menu::default(),
            chart_mode: ChartMode::default(),
            fetch: LogFetchForm::new(LogSource::ConnectAws),
            rules: RulesEditor::new(),
        }
    }

    /// Header lines.
    pub fn header(&self) -> [String; 2] {
        [
            "Welcome to Cloud Risk Dashboard".to_string(),
            format!("Logged in as: {}", self.email),
        ]
    }

    /// Active menu entry.
    pub fn menu(&self) -> Menu {
        self.menu
    }

    /// Switches the active menu entry.
    ///
    /// Selecting [`Menu::Logout`] is reported back so the shell can end the
    /// session; the active entry is left unchanged.
    pub fn select_menu(&mut self, menu: Menu) -> Option<Navigation> {
        if menu == Menu::Logout {
            return Some(Navigation::to(Route::Login));
        }
        self.menu = menu;
        None
    }

    /// Active chart mode.
    pub fn chart_mode(&self) -> ChartMode {
        self.chart_mode
    }

    /// Switches the chart mode.
    pub fn select_chart(&mut self, mode: ChartMode) {
        self.chart_mode = mode;
    }

    /// Entries from the last fetch.
    pub fn logs(&self) -> &[LogEntry] {
        self.fetch.entries()
    }

    /// Aggregates of the current entries.
    pub fn breakdown(&self) -> RiskBreakdown {
        RiskBreakdown::from_entries(self.logs())
    }

    /// Chart for the current entries and mode.
    pub fn chart(&self) -> ChartSpec {
        build_chart(self.chart_mode, &self.breakdown())
    }
}

/// Static `/risk` table seeded with sample entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskDashboardView {
    entries: Vec<LogEntry>,
}

impl Default for RiskDashboardView {
    fn default() -> Self {
        Self::sample()
    }
}

impl RiskDashboardView {
    /// View over the three sample entries.
    pub fn sample() -> Self {
        Self::with_entries(vec![
            LogEntry::new("ConsoleLogin", "High", "Root login"),
            LogEntry::new("DescribeInstances", "Low", "Standard activity"),
            LogEntry::new("DeleteBucket", "Medium", "Suspicious deletion"),
        ])
    }

    /// View over arbitrary entries.
    pub fn with_entries(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    /// Entries shown.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Table rows, or the empty text when there are none.
    pub fn rows(&self) -> Result<Vec<LogRow>, &'static str> {
        if self.entries.is_empty() {
            Err(EMPTY_LOGS_TEXT)
        } else {
            Ok(log_rows(&self.entries))
        }
    }
}

/// View layer errors.
#[derive(Debug, Error)]
pub enum UiError {
    /// Token slot failure while updating the session.
    #[error(transparent)]
    Session(#[from] SessionError),
}
