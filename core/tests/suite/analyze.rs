use core_test_support::backend_config_for;
use pretty_assertions::assert_eq;
use srenity_core::AnalysisError;
use srenity_core::AnalysisTransport;
use srenity_core::HttpTransport;
use srenity_protocol::ANALYZE_PATH;
use srenity_protocol::AnalyzeRequest;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_json;
use wiremock::matchers::method;
use wiremock::matchers::path;

#[tokio::test]
async fn one_shot_analysis_returns_backend_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ANALYZE_PATH))
        .and(body_json(serde_json::json!({ "query": "is redis healthy?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "response": "Redis hit rate is 98%."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&backend_config_for(&server)).expect("transport");
    let response = transport
        .analyze(&AnalyzeRequest::new("is redis healthy?"))
        .await
        .expect("analysis succeeds");

    assert_eq!(response.status, "success");
    assert_eq!(response.response.as_deref(), Some("Redis hit rate is 98%."));
    assert_eq!(response.message, None);
}

#[tokio::test]
async fn one_shot_non_success_status_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ANALYZE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&backend_config_for(&server)).expect("transport");
    let err = transport
        .analyze(&AnalyzeRequest::new("q"))
        .await
        .expect_err("503 is an error");

    assert!(matches!(err, AnalysisError::Http { status: 503 }));
    assert_eq!(err.to_string(), "HTTP error! status: 503");
}

#[tokio::test]
async fn one_shot_garbage_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ANALYZE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&backend_config_for(&server)).expect("transport");
    let err = transport
        .analyze(&AnalyzeRequest::new("q"))
        .await
        .expect_err("html is not a response");

    assert!(matches!(err, AnalysisError::InvalidResponse(_)));
}
