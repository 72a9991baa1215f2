//! Integration tests for the AWS log fetch form.

mod common;

use std::sync::Arc;

use cloud_risk_analysis::RiskBreakdown;
use cloud_risk_api::{ApiError, LogSource};
use cloud_risk_core::RiskLevel;
use cloud_risk_ui::{LogFetchForm, NoticeKind, log_rows};
use common::ScriptedTransport;
use serde_json::json;

fn filled(source: LogSource) -> LogFetchForm {
    let mut form = LogFetchForm::new(source);
    form.access_key = "AKIAEXAMPLE".to_string();
    form.secret_key = "wJalrXUtnFEMI".to_string();
    form.location = "s3://trail-bucket/AWSLogs/".to_string();
    form
}

#[test]
fn log_fetch_form_tests_connect_aws_loads_entries_and_clears_secret() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.respond(
        200,
        r#"{"logs":[{"eventName":"ConsoleLogin","risk":"High","reason":"Root login"}]}"#,
    );
    let mut form = filled(LogSource::ConnectAws);
    form.region = "eu-west-1".to_string();

    form.submit(&common::client(&transport), Some("tok"));

    assert_eq!(form.entries().len(), 1);
    assert!(form.secret_key.is_empty());
    assert!(!form.is_submitting());
    let notice = form.notice().expect("notice should be set");
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.text, "Connected & Logs Fetched!");

    let (url, request) = transport.requests().remove(0);
    assert_eq!(url, "http://localhost:5000/api/connect-aws");
    assert_eq!(request.bearer.as_deref(), Some("tok"));
    assert_eq!(
        request.body,
        Some(json!({
            "accessKey": "AKIAEXAMPLE",
            "secretKey": "wJalrXUtnFEMI",
            "region": "eu-west-1",
            "logPath": "s3://trail-bucket/AWSLogs/",
        }))
    );
}

#[test]
fn log_fetch_form_tests_missing_fields_send_nothing() {
    let transport = Arc::new(ScriptedTransport::default());
    let mut form = filled(LogSource::Analyze);
    form.location = "   ".to_string();

    form.submit(&common::client(&transport), None);

    let notice = form.notice().expect("notice should be set");
    assert_eq!(notice.text, "Please fill all fields.");
    assert_eq!(form.secret_key, "wJalrXUtnFEMI");
    assert!(transport.requests().is_empty());
}

#[test]
fn log_fetch_form_tests_unknown_region_sends_nothing() {
    let transport = Arc::new(ScriptedTransport::default());
    let mut form = filled(LogSource::FetchLogs);
    form.region = "mars-north-1".to_string();

    form.submit(&common::client(&transport), None);

    assert!(form.notice().expect("notice should be set").is_error());
    assert!(transport.requests().is_empty());
}

#[test]
fn log_fetch_form_tests_failures_use_per_source_fallbacks() {
    let cases = [
        (LogSource::ConnectAws, "Error connecting to AWS"),
        (LogSource::FetchLogs, "Error fetching or analyzing logs."),
        (LogSource::Analyze, "Error analyzing logs."),
    ];
    for (source, fallback) in cases {
        let transport = Arc::new(ScriptedTransport::default());
        transport.fail(ApiError::Timeout);
        let mut form = filled(source);

        form.submit(&common::client(&transport), Some("tok"));

        assert_eq!(form.notice().expect("notice should be set").text, fallback);
        assert!(form.secret_key.is_empty());
        assert!(!form.is_submitting());
        assert!(form.entries().is_empty());
    }
}

#[test]
fn log_fetch_form_tests_backend_message_wins_over_fallback() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.respond(403, r#"{"message":"Access Denied"}"#);
    let mut form = filled(LogSource::Analyze);

    form.submit(&common::client(&transport), Some("tok"));

    assert_eq!(form.notice().expect("notice should be set").text, "Access Denied");
}

#[test]
fn log_fetch_form_tests_fetch_logs_reports_backend_message() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.respond(200, r#"{"message":"Fetched 12 events"}"#);
    let mut form = filled(LogSource::FetchLogs);

    form.submit(&common::client(&transport), Some("tok"));

    assert_eq!(
        form.notice().expect("notice should be set").text,
        "Fetched 12 events"
    );
    assert!(form.entries().is_empty());
}

#[test]
fn log_fetch_form_tests_resubmission_replaces_entries() {
    let transport = Arc::new(ScriptedTransport::default());
    transport
        .respond(200, r#"{"results":[{"eventName":"A","risk":"Low","reason":"r"}]}"#)
        .fail(ApiError::Transport("connection refused".to_string()));
    let client = common::client(&transport);
    let mut form = filled(LogSource::Analyze);

    form.submit(&client, Some("tok"));
    assert_eq!(form.entries().len(), 1);

    form.secret_key = "again".to_string();
    form.submit(&client, Some("tok"));
    assert!(form.entries().is_empty());
    assert_eq!(transport.requests().len(), 2);
}

#[test]
fn log_fetch_form_tests_null_entry_fields_still_render_and_count() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.respond(
        200,
        r#"{"logs":[
            {"eventName":null,"riskLevel":"High","reason":"x","eventTime":null,"sourceIP":null},
            {"eventName":"PutObject","risk":null,"reason":null}
        ]}"#,
    );
    let mut form = filled(LogSource::ConnectAws);

    form.submit(&common::client(&transport), Some("tok"));

    let notice = form.notice().expect("notice should be set");
    assert_eq!(notice.kind, NoticeKind::Success);
    let rows = log_rows(form.entries());
    assert_eq!(rows[0].event_name, "N/A");
    assert_eq!(rows[0].risk, "High");
    assert_eq!(rows[1].risk, "Low");
    assert_eq!(rows[1].reason, "");

    let breakdown = RiskBreakdown::from_entries(form.entries());
    assert_eq!(breakdown.rule_entries, 2);
    assert_eq!(breakdown.rule.get(RiskLevel::High), 1);
    assert_eq!(breakdown.rule.get(RiskLevel::Low), 1);
}
