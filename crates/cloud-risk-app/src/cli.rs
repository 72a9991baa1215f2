//! CLI command definitions and dispatch.

use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use cloud_risk_analysis::{ChartMode, RiskBreakdown, build_chart, parse_log_entries};
use cloud_risk_api::LogSource;
use cloud_risk_app::{App, ClientConfig, now_ms};
use cloud_risk_core::{DEFAULT_REGION, RiskLevel};
use cloud_risk_session::{Route, RouteDecision, SessionState};
use cloud_risk_ui::rules_editor::EMPTY_RULES_TEXT;
use cloud_risk_ui::{
    EMPTY_LOGS_TEXT, LogFetchForm, LoginForm, Menu, RegisterForm, RiskDashboardView, RuleDraft,
    RulesEditor, render_chart,
};

use crate::output::{self, OutputFormat};

/// Terminal client for the CloudTrail risk-analysis backend.
#[derive(Debug, Parser)]
#[command(name = "cloud-risk", version = cloud_risk_app::APP_VERSION, about, long_about = None)]
pub struct Cli {
    /// Extra configuration file layered over `config/default.toml`
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session token
    Login {
        /// Account email; prompted when omitted
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account
    Register {
        /// Account email; prompted when omitted
        #[arg(long)]
        email: Option<String>,
    },
    /// Clear the stored session
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// Fetch and classify CloudTrail logs through the backend
    Fetch(FetchArgs),
    /// Manage custom risk rules
    Rules(RulesArgs),
    /// Chart a saved log export
    Chart {
        /// Chart mode
        #[arg(long, default_value = "pie")]
        mode: ChartMode,
        /// JSON file holding a log list or a `{logs}`/`{results}` object
        #[arg(long)]
        input: PathBuf,
    },
    /// Show the sample risk table
    Risk,
    /// Show what the route guard does with a path
    Route {
        /// Path such as `/fetch`
        path: String,
    },
}

/// Arguments for the fetch command
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Backend endpoint: connect-aws, fetch-logs or analyze
    #[arg(long, default_value = "connect-aws")]
    pub source: LogSource,
    /// AWS region code
    #[arg(long, default_value = DEFAULT_REGION)]
    pub region: String,
    /// Log path (connect-aws) or S3 URI (fetch-logs, analyze)
    #[arg(long)]
    pub location: String,
    /// AWS access key id; prompted when omitted
    #[arg(long)]
    pub access_key: Option<String>,
    /// Also draw a chart of the returned entries
    #[arg(long)]
    pub chart: Option<ChartMode>,
}

/// Arguments for rules commands
#[derive(Debug, Args)]
pub struct RulesArgs {
    /// Rules subcommand
    #[command(subcommand)]
    pub command: RulesCommand,
}

/// Rules subcommands
#[derive(Debug, Subcommand)]
pub enum RulesCommand {
    /// List the stored rule set
    List,
    /// Add a rule
    Add {
        /// Event name to match
        event_name: String,
        /// Risk assigned on match
        #[arg(long)]
        risk: RiskLevel,
        /// Explanation attached to matches
        #[arg(long)]
        reason: String,
    },
    /// Delete the rule for an event name
    Delete {
        /// Event name of the rule
        event_name: String,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(&self, config: &ClientConfig) -> Result<()> {
        let mut app = App::from_config(config, now_ms()).context("failed to start client")?;
        match &self.command {
            Command::Login { email } => login(&mut app, email.as_deref()),
            Command::Register { email } => register(&mut app, email.as_deref()),
            Command::Logout => {
                app.logout().context("failed to clear session")?;
                output::print_success("Logged out");
                Ok(())
            }
            Command::Whoami => {
                whoami(&app);
                Ok(())
            }
            Command::Fetch(args) => fetch(&mut app, args, self.format),
            Command::Rules(args) => rules(&mut app, &args.command, self.format),
            Command::Risk => {
                app.require(Route::Risk)?;
                let view = RiskDashboardView::sample();
                output::print_logs(view.entries(), self.format, EMPTY_LOGS_TEXT);
                Ok(())
            }
            Command::Route { path } => {
                match app.navigate(path) {
                    RouteDecision::Render(route) => println!("render {route}"),
                    RouteDecision::Redirect(route) => println!("redirect {route}"),
                }
                Ok(())
            }
            Command::Chart { mode, input } => chart(*mode, input, self.format),
        }
    }
}

fn whoami(app: &App) {
    match app.session().state() {
        SessionState::Authenticated(identity) => {
            println!("Logged in");
            output::print_kv("Email", &identity.email);
            output::print_kv("Expires (ms)", &identity.expires_at_ms.to_string());
            output::print_kv("Backend", app.client().base_url());
        }
        SessionState::Anonymous => println!("Not logged in"),
    }
}

fn prompt_email(email: Option<&str>) -> Result<String> {
    match email {
        Some(email) => Ok(email.to_string()),
        None => dialoguer::Input::new()
            .with_prompt("Email")
            .interact_text()
            .context("failed to read email"),
    }
}

fn login(app: &mut App, email: Option<&str>) -> Result<()> {
    let email = prompt_email(email)?;
    let password = dialoguer::Password::new()
        .with_prompt("Password")
        .interact()
        .context("failed to read password")?;

    let mut form = LoginForm::new(email, password);
    app.submit_login(&mut form, now_ms())?;
    if let Some(error) = form.error() {
        bail!("{error}");
    }

    let Some(dashboard) = app.dashboard() else {
        bail!("Login failed");
    };
    for line in dashboard.header() {
        println!("{line}");
    }
    let menu: Vec<&str> = Menu::ALL.iter().map(Menu::label).collect();
    println!("{}", menu.join(" | "));
    Ok(())
}

fn register(app: &mut App, email: Option<&str>) -> Result<()> {
    let email = prompt_email(email)?;
    let password = dialoguer::Password::new()
        .with_prompt("Password")
        .interact()
        .context("failed to read password")?;
    let confirm = dialoguer::Password::new()
        .with_prompt("Confirm password")
        .interact()
        .context("failed to read password")?;

    let mut form = RegisterForm::new(email, password, confirm);
    let Some(navigation) = app.submit_register(&mut form) else {
        let text = form.notice().map_or("Registration failed", |notice| notice.text.as_str());
        bail!("{text}");
    };
    if let Some(notice) = form.notice() {
        output::print_notice(notice);
    }

    thread::sleep(navigation.delay);
    let decision = app.follow(&navigation);
    println!("-> {}", decision.target());
    Ok(())
}

fn fetch(app: &mut App, args: &FetchArgs, format: OutputFormat) -> Result<()> {
    app.require(Route::Fetch)?;

    let access_key = match &args.access_key {
        Some(key) => key.clone(),
        None => dialoguer::Input::new()
            .with_prompt("AWS access key")
            .interact_text()
            .context("failed to read access key")?,
    };
    let secret_key = dialoguer::Password::new()
        .with_prompt("AWS secret key")
        .interact()
        .context("failed to read secret key")?;

    let mut form = LogFetchForm::new(args.source);
    form.access_key = access_key;
    form.secret_key = secret_key;
    form.region = args.region.clone();
    form.location = args.location.clone();

    let bearer = app.bearer()?;
    form.submit(app.client(), bearer.as_deref());

    let Some(notice) = form.notice() else {
        return Ok(());
    };
    if notice.is_error() {
        bail!("{}", notice.text);
    }
    output::print_notice(notice);
    output::print_logs(form.entries(), format, EMPTY_LOGS_TEXT);

    if let Some(mode) = args.chart {
        let spec = build_chart(mode, &RiskBreakdown::from_entries(form.entries()));
        match format {
            OutputFormat::Table => print!("{}", render_chart(&spec)),
            OutputFormat::Json => output::print_value(&spec),
        }
    }
    Ok(())
}

fn rules(app: &mut App, command: &RulesCommand, format: OutputFormat) -> Result<()> {
    app.require(Route::Dashboard)?;
    let bearer = app.bearer()?;
    let bearer = bearer.as_deref();

    let mut editor = RulesEditor::new();
    editor.mount(app.client(), bearer);
    if let Some(notice) = editor.notice() {
        bail!("{}", notice.text);
    }

    match command {
        RulesCommand::List => {}
        RulesCommand::Add {
            event_name,
            risk,
            reason,
        } => {
            editor.draft = RuleDraft::new(event_name.as_str(), *risk, reason.as_str());
            editor.add(app.client(), bearer);
        }
        RulesCommand::Delete { event_name } => {
            editor.delete(event_name, app.client(), bearer);
        }
    }

    if let Some(notice) = editor.notice() {
        if notice.is_error() {
            bail!("{}", notice.text);
        }
        output::print_notice(notice);
    }
    output::print_rules(editor.rules(), format, EMPTY_RULES_TEXT);
    Ok(())
}

fn chart(mode: ChartMode, input: &Path, format: OutputFormat) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let entries = parse_log_entries(&raw)
        .with_context(|| format!("failed to parse {}", input.display()))?;
    let spec = build_chart(mode, &RiskBreakdown::from_entries(&entries));

    match format {
        OutputFormat::Table => print!("{}", render_chart(&spec)),
        OutputFormat::Json => output::print_value(&spec),
    }
    Ok(())
}
