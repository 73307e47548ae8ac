//! End-to-end tests of the question flow against a local HTTP server.
//!
//! Most tests run against a `mockito` server that checks the request shape.
//! Responses mockito cannot produce (a body cut short) come from a raw socket.

use mockito::{Matcher, Server};
use qanda::api::FALLBACK_ERROR_MESSAGE;
use qanda::{AskClient, AskClientBuilder, Outcome, QueryController, SkipReason};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn client_for(base_url: &str) -> AskClient {
    AskClientBuilder::new()
        .base_url(base_url)
        .build()
        .expect("Failed to create client")
}

/// Answers one connection with `response` verbatim, then closes it.
///
/// The request is read until it ends with `request_end` so the socket is
/// drained before the reply goes out.
async fn respond_raw(response: &'static [u8], request_end: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request.ends_with(request_end.as_bytes()) {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
        }
        socket.write_all(response).await.unwrap();
        let _ = socket.shutdown().await;
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn success_response_stores_answer() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/ask")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(
            json!({ "question": "What is the capital of France?" }),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"answer": "Paris"}"#)
        .create_async()
        .await;
    let client = client_for(&server.url());
    let mut controller = QueryController::new();
    controller.set_question("What is the capital of France?");

    let outcome = controller.submit(&client).await;

    assert_eq!(outcome, Outcome::Answered);
    assert!(!controller.state().is_pending());
    assert_eq!(controller.state().answer(), Some("Paris"));
    assert_eq!(controller.state().error(), None);
    mock.assert_async().await;
}

#[tokio::test]
async fn context_is_sent_when_given() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/ask")
        .match_body(Matcher::Json(
            json!({ "question": "What happened?", "context": "Finnish tech news" }),
        ))
        .with_status(200)
        .with_body(r#"{"answer": "ok"}"#)
        .create_async()
        .await;
    let client = client_for(&server.url());
    let mut controller = QueryController::with_context("Finnish tech news");
    controller.set_question("What happened?");

    let outcome = controller.submit(&client).await;

    assert_eq!(outcome, Outcome::Answered);
    mock.assert_async().await;
}

#[tokio::test]
async fn bad_request_detail_becomes_error_message() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/ask")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "bad question"}"#)
        .create_async()
        .await;
    let client = client_for(&server.url());
    let mut controller = QueryController::new();
    controller.set_question("???");

    let outcome = controller.submit(&client).await;

    assert_eq!(outcome, Outcome::Failed);
    assert_eq!(controller.state().error(), Some("bad question"));
    assert_eq!(controller.state().answer(), None);
    mock.assert_async().await;
}

#[tokio::test]
async fn server_error_with_plain_body_reports_status_and_reason() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/ask")
        .with_status(500)
        .with_header("content-type", "text/plain")
        .with_body("something broke")
        .create_async()
        .await;
    let client = client_for(&server.url());
    let mut controller = QueryController::new();
    controller.set_question("Will this work?");

    controller.submit(&client).await;

    assert_eq!(
        controller.state().error(),
        Some("Error: 500 Internal Server Error")
    );
    assert!(!controller.state().is_pending());
    mock.assert_async().await;
}

#[tokio::test]
async fn error_status_with_truncated_body_still_reports_status() {
    let url = respond_raw(
        b"HTTP/1.1 500 Internal Server Error\r\nContent-Type: application/json\r\nContent-Length: 200\r\nConnection: close\r\n\r\n{\"det",
        "}",
    )
    .await;
    let client = client_for(&url);
    let mut controller = QueryController::new();
    controller.set_question("Still there?");

    let outcome = controller.submit(&client).await;

    assert_eq!(outcome, Outcome::Failed);
    assert_eq!(
        controller.state().error(),
        Some("Error: 500 Internal Server Error")
    );
    assert!(!controller.state().is_pending());
}

#[tokio::test]
async fn health_error_with_truncated_body_still_reports_status() {
    let url = respond_raw(
        b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 64\r\nConnection: close\r\n\r\ndown",
        "\r\n\r\n",
    )
    .await;
    let client = client_for(&url);

    let error = client.health().await.unwrap_err();

    assert_eq!(error.status(), Some(503));
    assert_eq!(error.user_message(), "Error: 503 Service Unavailable");
}

#[tokio::test]
async fn malformed_success_body_reports_fallback() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/ask")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>not json</html>")
        .create_async()
        .await;
    let client = client_for(&server.url());
    let mut controller = QueryController::new();
    controller.set_question("Hello?");

    let outcome = controller.submit(&client).await;

    assert_eq!(outcome, Outcome::Failed);
    assert_eq!(controller.state().error(), Some(FALLBACK_ERROR_MESSAGE));
    mock.assert_async().await;
}

#[tokio::test]
async fn success_without_answer_reports_fallback() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/ask")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"result": "Paris"}"#)
        .create_async()
        .await;
    let client = client_for(&server.url());
    let mut controller = QueryController::new();
    controller.set_question("Capital?");

    let outcome = controller.submit(&client).await;

    assert_eq!(outcome, Outcome::Failed);
    assert_eq!(controller.state().error(), Some(FALLBACK_ERROR_MESSAGE));
    assert_eq!(controller.state().answer(), None);
    mock.assert_async().await;
}

#[tokio::test]
async fn unreachable_service_reports_fallback() {
    // Grab a free port, then close it so the connection is refused
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{addr}"));
    let mut controller = QueryController::new();
    controller.set_question("Anyone home?");

    let outcome = controller.submit(&client).await;

    assert_eq!(outcome, Outcome::Failed);
    assert!(!controller.state().is_pending());
    assert_eq!(controller.state().error(), Some(FALLBACK_ERROR_MESSAGE));
    assert_eq!(controller.state().answer(), None);
}

#[tokio::test]
async fn blank_question_never_reaches_the_server() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/ask")
        .expect(0)
        .create_async()
        .await;
    let client = client_for(&server.url());
    let mut controller = QueryController::new();
    controller.set_question("   ");

    let outcome = controller.submit(&client).await;

    assert_eq!(outcome, Outcome::Skipped(SkipReason::EmptyQuestion));
    mock.assert_async().await;
}

#[tokio::test]
async fn consecutive_questions_replace_previous_answer() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("POST", "/api/ask")
        .match_body(Matcher::Json(json!({ "question": "Capital of France?" })))
        .with_status(200)
        .with_body(r#"{"answer": "Paris"}"#)
        .create_async()
        .await;
    let second = server
        .mock("POST", "/api/ask")
        .match_body(Matcher::Json(json!({ "question": "Capital of Finland?" })))
        .with_status(200)
        .with_body(r#"{"answer": "Helsinki"}"#)
        .create_async()
        .await;
    let client = client_for(&server.url());
    let mut controller = QueryController::new();

    controller.set_question("Capital of France?");
    controller.submit(&client).await;
    assert_eq!(controller.state().answer(), Some("Paris"));

    controller.set_question("Capital of Finland?");
    controller.submit(&client).await;

    assert_eq!(controller.state().answer(), Some("Helsinki"));
    assert_eq!(controller.state().error(), None);
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/qa/api/ask")
        .with_status(200)
        .with_body(r#"{"answer": "ok"}"#)
        .create_async()
        .await;
    let client = client_for(&format!("{}/qa", server.url()));
    let mut controller = QueryController::new();
    controller.set_question("prefix?");

    let outcome = controller.submit(&client).await;

    assert_eq!(outcome, Outcome::Answered);
    mock.assert_async().await;
}

#[tokio::test]
async fn health_reports_service_status() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"status": "healthy", "timestamp": "2024-05-01T12:00:00", "service": "Helsinki Tech Analyst API"}"#,
        )
        .create_async()
        .await;
    let client = client_for(&server.url());

    let health = client.health().await.unwrap();

    assert!(health.is_healthy());
    assert_eq!(health.service.as_deref(), Some("Helsinki Tech Analyst API"));
    mock.assert_async().await;
}

#[tokio::test]
async fn health_failure_is_a_server_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/health")
        .with_status(503)
        .with_body("down")
        .create_async()
        .await;
    let client = client_for(&server.url());

    let error = client.health().await.unwrap_err();

    assert_eq!(error.status(), Some(503));
    assert_eq!(error.user_message(), "Error: 503 Service Unavailable");
    mock.assert_async().await;
}
