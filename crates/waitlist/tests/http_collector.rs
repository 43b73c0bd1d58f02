//! HTTP collector behaviour against a local mock endpoint.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use waitlist::{
    Collector, FallbackLog, Field, HttpCollector, KeyValueStore, MemoryStore, SubmissionDraft,
    SubmissionViewState, Submitter, TransportError, WaitlistForm, FALLBACK_KEY, GENERIC_FAILURE,
};

fn draft() -> SubmissionDraft {
    SubmissionDraft::new("Alex Rivera", "alex@agency.co", "too many emails")
}

fn collector(server: &MockServer) -> HttpCollector {
    HttpCollector::new(
        &format!("{}/f/test", server.uri()),
        Some(Duration::from_secs(5)),
    )
    .unwrap()
}

#[tokio::test]
async fn posts_multipart_fields_with_json_accept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/f/test"))
        .and(header("accept", "application/json"))
        .and(body_string_contains("name=\"name\""))
        .and(body_string_contains("Alex Rivera"))
        .and(body_string_contains("name=\"email\""))
        .and(body_string_contains("alex@agency.co"))
        .and(body_string_contains("name=\"pain\""))
        .and(body_string_contains("too many emails"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
        .expect(1)
        .mount(&server)
        .await;

    let response = collector(&server).send(&draft()).await.unwrap();

    assert_eq!(response.status, 200);
    assert!(response.is_success());
}

#[tokio::test]
async fn non_success_status_is_reported_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422))
        .mount(&server)
        .await;

    let response = collector(&server).send(&draft()).await.unwrap();

    assert_eq!(response.status, 422);
    assert!(!response.is_success());
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let collector = HttpCollector::new(
        &format!("{}/f/test", server.uri()),
        Some(Duration::from_millis(100)),
    )
    .unwrap();

    let err = collector.send(&draft()).await.unwrap_err();
    assert!(matches!(err, TransportError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn form_accepts_and_logs_locally_when_collector_rejects() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let submitter = Submitter::new(
        Arc::new(collector(&server)),
        FallbackLog::new(store.clone()),
    );
    let form = WaitlistForm::new(submitter);
    for field in Field::ALL {
        form.set_field(field, draft().get(field));
    }

    form.submit().await;

    assert_eq!(form.state(), SubmissionViewState::Submitted);
    let records = FallbackLog::new(store).read().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].email, "alex@agency.co");
    assert!(records[0].fallback);
}

#[tokio::test]
async fn form_accepts_without_local_copy_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let submitter = Submitter::new(
        Arc::new(collector(&server)),
        FallbackLog::new(store.clone()),
    );
    let form = WaitlistForm::with_draft(submitter, draft());

    form.submit().await;

    assert_eq!(form.state(), SubmissionViewState::Submitted);
    assert!(form.draft().is_empty());
    assert_eq!(store.get(FALLBACK_KEY).unwrap(), None);
}

#[tokio::test]
async fn form_reports_generic_failure_when_endpoint_is_gone() {
    // Non-pooled server: a pooled one keeps listening after drop.
    let server = MockServer::builder().start().await;
    let endpoint = format!("{}/f/test", server.uri());
    drop(server);

    let store = Arc::new(MemoryStore::new());
    let submitter = Submitter::new(
        Arc::new(HttpCollector::new(&endpoint, Some(Duration::from_secs(2))).unwrap()),
        FallbackLog::new(store.clone()),
    );
    let form = WaitlistForm::with_draft(submitter, draft());

    form.submit().await;

    assert_eq!(
        form.state(),
        SubmissionViewState::Failed(GENERIC_FAILURE.to_string())
    );
    assert_eq!(form.draft(), draft());
    assert_eq!(store.get(FALLBACK_KEY).unwrap(), None);
}
