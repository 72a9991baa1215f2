//! Table and JSON output formatting for CLI commands.

use cloud_risk_core::{CustomRule, LogEntry};
use cloud_risk_ui::{LogRow, Notice, NoticeKind};
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table.
    #[default]
    Table,
    /// JSON output.
    Json,
}

#[derive(Tabled)]
struct LogTableRow {
    #[tabled(rename = "Event Name")]
    event_name: String,
    #[tabled(rename = "Risk Level")]
    risk: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

impl From<LogRow> for LogTableRow {
    fn from(row: LogRow) -> Self {
        Self {
            event_name: row.event_name,
            risk: row.risk,
            reason: row.reason,
        }
    }
}

#[derive(Tabled)]
struct RuleTableRow {
    #[tabled(rename = "Event Name")]
    event_name: String,
    #[tabled(rename = "Risk")]
    risk: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
    println!("{json}");
}

/// Prints a log table, or `empty_text` when there are no entries.
pub fn print_logs(entries: &[LogEntry], format: OutputFormat, empty_text: &str) {
    match format {
        OutputFormat::Json => print_json(entries),
        OutputFormat::Table if entries.is_empty() => println!("{empty_text}"),
        OutputFormat::Table => {
            let rows: Vec<LogTableRow> = cloud_risk_ui::log_rows(entries)
                .into_iter()
                .map(LogTableRow::from)
                .collect();
            println!("{}", Table::new(rows));
        }
    }
}

/// Prints the rule set.
pub fn print_rules(rules: &[CustomRule], format: OutputFormat, empty_text: &str) {
    match format {
        OutputFormat::Json => print_json(rules),
        OutputFormat::Table if rules.is_empty() => println!("{empty_text}"),
        OutputFormat::Table => {
            let rows = rules.iter().map(|rule| RuleTableRow {
                event_name: rule.event_name.clone(),
                risk: rule.custom_risk.to_string(),
                reason: rule.reason.clone(),
            });
            println!("{}", Table::new(rows));
        }
    }
}

/// Prints any serializable value as JSON.
pub fn print_value<T: Serialize>(value: &T) {
    print_json(value);
}

/// Prints a view notice to stdout or stderr by kind.
pub fn print_notice(notice: &Notice) {
    match notice.kind {
        NoticeKind::Success => print_success(&notice.text),
        NoticeKind::Error => print_error(&notice.text),
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

fn kv_line(key: &str, value: &str) -> String {
    format!("  {:<16} {}", format!("{key}:"), value)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("{}", kv_line(key, value));
}

#[cfg(test)]
mod tests {
    //! Unit tests for line formatting.

    use super::*;

    #[test]
    fn kv_line_pads_key_column() {
        assert_eq!(kv_line("Email", "a@b.com"), "  Email:           a@b.com");
        assert_eq!(
            kv_line("Expires (ms)", "1800000000000"),
            "  Expires (ms):    1800000000000"
        );
    }
}
