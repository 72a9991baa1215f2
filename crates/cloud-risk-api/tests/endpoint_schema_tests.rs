//! Integration tests for per-endpoint request schemas.

mod common;

use std::sync::Arc;

use cloud_risk_api::{LogSource, LoginRequest, Method};
use cloud_risk_core::{AwsConnection, AwsRegion};
use common::ScriptedTransport;
use serde_json::json;

fn connection() -> AwsConnection {
    AwsConnection::new(
        "AKIAEXAMPLE",
        "wJalrSECRET",
        AwsRegion::parse("eu-west-1").expect("region"),
        "s3://trail-bucket/AWSLogs/",
    )
    .expect("connection should build")
}

#[test]
fn endpoint_schema_tests_connect_aws_uses_camel_case_body() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.respond(200, r#"{"logs":[]}"#);

    common::client(&transport)
        .fetch_logs(LogSource::ConnectAws, &connection(), Some("tok"))
        .expect("fetch should succeed");

    let (url, request) = transport.requests().remove(0);
    assert_eq!(url, "http://localhost:5000/api/connect-aws");
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.bearer.as_deref(), Some("tok"));
    assert_eq!(
        request.body,
        Some(json!({
            "accessKey": "AKIAEXAMPLE",
            "secretKey": "wJalrSECRET",
            "region": "eu-west-1",
            "logPath": "s3://trail-bucket/AWSLogs/",
        }))
    );
}

#[test]
fn endpoint_schema_tests_fetch_logs_and_analyze_use_snake_case_bodies() {
    let transport = Arc::new(ScriptedTransport::default());
    transport
        .respond(200, r#"{"message":"ok"}"#)
        .respond(200, r#"{"results":[]}"#);
    let client = common::client(&transport);

    client
        .fetch_logs(LogSource::FetchLogs, &connection(), Some("tok"))
        .expect("fetch-logs should succeed");
    client
        .fetch_logs(LogSource::Analyze, &connection(), Some("tok"))
        .expect("analyze should succeed");

    let requests = transport.requests();
    assert_eq!(requests[0].0, "http://localhost:5000/fetch-logs");
    assert_eq!(
        requests[0].1.body,
        Some(json!({
            "access_key": "AKIAEXAMPLE",
            "secret_key": "wJalrSECRET",
            "region": "eu-west-1",
            "s3_path": "s3://trail-bucket/AWSLogs/",
        }))
    );
    assert_eq!(requests[1].0, "http://localhost:5000/api/analyze");
    assert_eq!(
        requests[1].1.body,
        Some(json!({
            "key": "AKIAEXAMPLE",
            "secret": "wJalrSECRET",
            "s3_path": "s3://trail-bucket/AWSLogs/",
        }))
    );
}

#[test]
fn endpoint_schema_tests_login_is_unauthenticated() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.respond(200, r#"{"token":"abc"}"#);

    let response = common::client(&transport)
        .login(&LoginRequest {
            email: "a@b.com".to_string(),
            password: "x".to_string(),
        })
        .expect("login should succeed");

    assert_eq!(response.token.as_deref(), Some("abc"));
    let (url, request) = transport.requests().remove(0);
    assert_eq!(url, "http://localhost:5000/login");
    assert_eq!(request.bearer, None);
    assert_eq!(request.body, Some(json!({"email": "a@b.com", "password": "x"})));
}
