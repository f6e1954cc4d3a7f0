use std::sync::Arc;
use std::sync::Mutex;

use core_test_support::backend_config_for;
use core_test_support::event_body;
use core_test_support::event_stream_response;
use core_test_support::sample_rca;
use core_test_support::sample_runbooks;
use core_test_support::wait_for_state;
use pretty_assertions::assert_eq;
use srenity_core::AnalysisError;
use srenity_core::CompletionReason;
use srenity_core::HttpTransport;
use srenity_core::SessionHooks;
use srenity_core::SessionOutcome;
use srenity_core::StreamController;
use srenity_core::normalize::canonical_sections;
use srenity_core::progress::timeline;
use srenity_protocol::AnalysisUpdate;
use srenity_protocol::AnalyzeRequest;
use srenity_protocol::STREAM_PATH;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_json;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;

#[derive(Default)]
struct Journal {
    entries: Mutex<Vec<String>>,
}

impl Journal {
    fn entries(&self) -> Vec<String> {
        self.entries.lock().expect("journal lock").clone()
    }
}

impl SessionHooks for Journal {
    fn on_complete(&self) {
        self.entries
            .lock()
            .expect("journal lock")
            .push("complete".to_string());
    }

    fn on_error(&self, error: &AnalysisError) {
        self.entries
            .lock()
            .expect("journal lock")
            .push(format!("error: {error}"));
    }
}

fn controller_for(server: &MockServer) -> (StreamController, Arc<Journal>) {
    let transport =
        HttpTransport::new(&backend_config_for(server)).expect("transport for mock server");
    let journal = Arc::new(Journal::default());
    let controller = StreamController::new(Arc::new(transport)).with_hooks(journal.clone());
    (controller, journal)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn full_session_populates_state_in_order() {
    let server = MockServer::start().await;
    let body = event_body(
        &[
            AnalysisUpdate::status("Retrieving logs and metrics"),
            AnalysisUpdate::status("Analyzing error patterns"),
            AnalysisUpdate::RcaComplete { rca: sample_rca() },
            AnalysisUpdate::status("Searching runbooks"),
            AnalysisUpdate::RunbookComplete {
                runbooks: sample_runbooks(),
            },
        ],
        true,
    );

    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .and(header("accept", "text/event-stream"))
        .and(body_json(serde_json::json!({
            "alert_id": "ALT-7",
            "service_id": "checkout",
            "query": "why are checkouts failing?"
        })))
        .respond_with(event_stream_response(body))
        .expect(1)
        .mount(&server)
        .await;

    let (mut controller, journal) = controller_for(&server);
    let handle = controller.start(
        AnalyzeRequest::new("why are checkouts failing?")
            .with_alert_id(Some("ALT-7".to_string()))
            .with_service_id(Some("checkout".to_string())),
    );

    let outcome = handle.wait().await;
    assert!(matches!(
        outcome,
        SessionOutcome::Completed(CompletionReason::Done)
    ));

    let state = controller.snapshot();
    assert_eq!(
        state.status_texts().collect::<Vec<_>>(),
        vec![
            "Retrieving logs and metrics",
            "Analyzing error patterns",
            "Searching runbooks"
        ]
    );
    assert_eq!(state.rca, Some(sample_rca()));
    assert_eq!(state.runbooks, sample_runbooks());
    assert!(!state.is_streaming);
    assert_eq!(state.error, None);
    assert_eq!(journal.entries(), vec!["complete".to_string()]);
    assert!(timeline(&state).is_complete());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn http_error_status_is_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (mut controller, journal) = controller_for(&server);
    let outcome = controller
        .start(AnalyzeRequest::new("q"))
        .wait()
        .await;

    assert!(matches!(
        outcome,
        SessionOutcome::Failed(AnalysisError::Http { status: 500 })
    ));
    let state = controller.snapshot();
    assert_eq!(state.error.as_deref(), Some("HTTP error! status: 500"));
    assert!(!state.is_streaming);
    assert_eq!(
        journal.entries(),
        vec!["error: HTTP error! status: 500".to_string()]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn backend_error_event_stops_the_session() {
    let server = MockServer::start().await;
    let body = format!(
        "{}data: {{\"type\":\"error\",\"message\":\"Vector store unavailable\"}}\n{}",
        event_body(&[AnalysisUpdate::status("Retrieving logs")], false),
        event_body(&[AnalysisUpdate::status("never applied")], true),
    );
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(event_stream_response(body))
        .mount(&server)
        .await;

    let (mut controller, journal) = controller_for(&server);
    let outcome = controller.start(AnalyzeRequest::new("q")).wait().await;

    assert!(matches!(outcome, SessionOutcome::Failed(AnalysisError::Backend(_))));
    let state = controller.snapshot();
    assert_eq!(state.status_texts().collect::<Vec<_>>(), vec!["Retrieving logs"]);
    assert_eq!(state.error.as_deref(), Some("Vector store unavailable"));
    assert_eq!(
        journal.entries(),
        vec!["error: Vector store unavailable".to_string()]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stream_closed_without_sentinel_completes_and_drops_partial_record() {
    let server = MockServer::start().await;
    let body = format!(
        "{}\ndata: {{\"type\":\"status\",\"message\":\"cut",
        event_body(&[AnalysisUpdate::status("Retrieving logs")], false)
    );
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(event_stream_response(body))
        .mount(&server)
        .await;

    let (mut controller, journal) = controller_for(&server);
    let outcome = controller.start(AnalyzeRequest::new("q")).wait().await;

    assert!(matches!(
        outcome,
        SessionOutcome::Completed(CompletionReason::TransportClosed)
    ));
    let state = controller.snapshot();
    assert_eq!(state.status_texts().collect::<Vec<_>>(), vec!["Retrieving logs"]);
    assert_eq!(state.error, None);
    assert_eq!(journal.entries(), vec!["complete".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn malformed_records_are_visible_and_rca_normalizes() {
    let server = MockServer::start().await;
    let rca = srenity_protocol::RcaResult {
        summary_sections: Some(vec![srenity_protocol::SummarySection::new(
            "Root Cause Analysis",
            "- cause A\n- cause B",
        )]),
        ..sample_rca()
    };
    let body = format!(
        "data: not-json\n\n{}",
        event_body(&[AnalysisUpdate::RcaComplete { rca }], true)
    );
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(event_stream_response(body))
        .mount(&server)
        .await;

    let (mut controller, _journal) = controller_for(&server);
    controller.start(AnalyzeRequest::new("q"));
    let state = wait_for_state(&controller, |s| !s.is_streaming).await;

    assert_eq!(state.status_texts().collect::<Vec<_>>(), vec!["not-json"]);
    let rca = state.rca.expect("rca delivered");
    let sections = canonical_sections(&rca);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].bullets, vec!["cause A", "cause B"]);
}
