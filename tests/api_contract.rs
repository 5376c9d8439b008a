//! Tasks service client contract tests.
//!
//! Verify the exact HTTP surface the client speaks against a mock server:
//! request paths, the bearer auth header, the server-side visibility
//! filters, and response parsing including the absent-`items` case.

use taskwatch::api::TasksClient;
use taskwatch::config::ApiConfig;
use taskwatch::credentials::CredentialRef;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TasksClient {
    let api = ApiConfig {
        base_url: server.uri(),
        token: CredentialRef::Literal {
            value: "test-token".to_owned(),
        },
    };
    TasksClient::new(&api)
}

#[tokio::test]
async fn list_task_lists_sends_bearer_and_parses_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks/v1/users/@me/lists"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                {"id": "MTIz", "title": "Groceries"},
                {"id": "NDU2", "title": "Work"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let lists = client_for(&server)
        .list_task_lists()
        .await
        .expect("request succeeds")
        .expect("signed in");

    assert_eq!(lists.len(), 2);
    assert_eq!(lists[0].id, "MTIz");
    assert_eq!(lists[0].title, "Groceries");
}

#[tokio::test]
async fn list_tasks_sends_visibility_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks/v1/lists/MTIz/tasks"))
        .and(header("authorization", "Bearer test-token"))
        .and(query_param("showCompleted", "false"))
        .and(query_param("showDeleted", "false"))
        .and(query_param("showHidden", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{
                "id": "A",
                "title": "Buy milk",
                "notes": "semi-skimmed",
                "due": "2026-09-05T00:00:00.000Z",
                "position": "00000000000000000001"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = client_for(&server)
        .list_tasks("MTIz")
        .await
        .expect("request succeeds");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "A");
    assert_eq!(records[0].notes.as_deref(), Some("semi-skimmed"));
    assert!(records[0].due.is_some());
    assert_eq!(records[0].parent, None);
}

#[tokio::test]
async fn absent_items_field_is_an_empty_batch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks/v1/lists/MTIz/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "kind": "tasks#tasks"
        })))
        .mount(&server)
        .await;

    let records = client_for(&server)
        .list_tasks("MTIz")
        .await
        .expect("request succeeds");
    assert!(records.is_empty());
}

#[tokio::test]
async fn error_status_is_a_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks/v1/lists/MTIz/tasks"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"error": {"code": 401}}"#),
        )
        .mount(&server)
        .await;

    let result = client_for(&server).list_tasks("MTIz").await;
    let err = result.expect_err("401 must error");
    assert!(err.to_string().contains("401"), "error was: {err}");
}

#[tokio::test]
async fn subtask_records_carry_parent_ids() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks/v1/lists/MTIz/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                {"id": "A", "title": "Buy milk", "position": "00001"},
                {"id": "B", "title": "2%", "parent": "A", "position": "00001"}
            ]
        })))
        .mount(&server)
        .await;

    let records = client_for(&server)
        .list_tasks("MTIz")
        .await
        .expect("request succeeds");
    assert_eq!(records[1].parent.as_deref(), Some("A"));
}
