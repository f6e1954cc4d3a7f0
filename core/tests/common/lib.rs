#![allow(clippy::expect_used)]

//! Shared fixtures for `srenity-core` integration tests.

use std::time::Duration;

use srenity_core::SessionState;
use srenity_core::StreamController;
use srenity_core::config::BackendConfig;
use srenity_protocol::AnalysisUpdate;
use srenity_protocol::DONE_SENTINEL;
use srenity_protocol::RcaResult;
use srenity_protocol::RunbookAction;
use srenity_protocol::TierAnalysis;
use srenity_protocol::encode_record;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

/// Backend settings pointing at a mock server.
pub fn backend_config_for(server: &MockServer) -> BackendConfig {
    BackendConfig {
        base_url: server.uri(),
        ..Default::default()
    }
}

/// Encodes `updates` as wire records, optionally closed by the sentinel.
pub fn event_body(updates: &[AnalysisUpdate], done: bool) -> String {
    let mut body: String = updates
        .iter()
        .map(|update| update.to_record().expect("update serializes"))
        .collect();
    if done {
        body.push_str(&encode_record(DONE_SENTINEL));
    }
    body
}

/// A 200 response carrying `body` as an event stream.
pub fn event_stream_response(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/event-stream")
}

/// Result shaped like a multi-tier agent response.
pub fn sample_rca() -> RcaResult {
    RcaResult {
        summary: Some("Checkout errors caused by database pool exhaustion.".to_string()),
        evidence: vec!["234 connection timeouts in 5 minutes".to_string()],
        recommendations: vec!["Raise max_connections to 200".to_string()],
        tier_analysis: Some(vec![TierAnalysis {
            title: "Database".to_string(),
            status: Some("degraded".to_string()),
            severity: Some("high".to_string()),
            summary: Some("connection pool exhausted".to_string()),
            details: vec![],
        }]),
        ..RcaResult::new("Database connection pool exhausted")
    }
}

pub fn sample_runbooks() -> Vec<RunbookAction> {
    vec![RunbookAction {
        action_title: "Increase database pool size".to_string(),
        steps: vec![
            "Edit the pool settings".to_string(),
            "Restart the api deployment".to_string(),
        ],
        source_document: "Database Runbook".to_string(),
        source_url: "https://runbooks.example.com/db".to_string(),
        relevance_score: Some(0.87),
    }]
}

/// Waits (bounded) until the controller's state satisfies `predicate`.
pub async fn wait_for_state<F>(controller: &StreamController, predicate: F) -> SessionState
where
    F: FnMut(&SessionState) -> bool,
{
    let mut rx = controller.subscribe();
    let state = tokio::time::timeout(Duration::from_secs(10), rx.wait_for(predicate))
        .await
        .expect("timed out waiting for session state")
        .expect("controller dropped");
    state.clone()
}
