//! Integration tests for the DevPaste HTTP API.

mod support;

use axum::http::StatusCode;
use serde_json::{json, Value};
use support::{
    setup_test_server, test_config_for_db_path, test_server_for_config, TEST_MAX_PASTE_SIZE,
};
use tempfile::TempDir;

async fn create(server: &axum_test::TestServer, body: Value) -> Value {
    let response = server.post("/api/pastes").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_paste_lifecycle() {
    let (server, _temp) = setup_test_server();

    let created = create(
        &server,
        json!({
            "content": "print(1)",
            "title": "t",
            "language": "python",
            "expiresIn": "never"
        }),
    )
    .await;
    let id = created["id"].as_str().expect("id");
    assert_eq!(id.len(), 8);
    assert_eq!(created["views"], 0);
    assert_eq!(created["hasPassword"], false);
    assert!(created.get("credentialHash").is_none());

    let read = server.get(&format!("/api/pastes/{}", id)).await;
    assert_eq!(read.status_code(), StatusCode::OK);
    let read: Value = read.json();
    assert_eq!(read["title"], "t");
    assert_eq!(read["language"], "python");
    assert_eq!(read["content"], "print(1)");
    assert_eq!(read["hasPassword"], false);
    assert_eq!(read["views"], 1);
    assert!(read["expiresAt"].is_null());

    let again: Value = server.get(&format!("/api/pastes/{}", id)).await.json();
    assert_eq!(again["views"], 2);

    let deleted = server.delete(&format!("/api/pastes/{}", id)).await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
    let deleted: Value = deleted.json();
    assert_eq!(deleted["id"], id);

    let missing = server.get(&format!("/api/pastes/{}", id)).await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    let body: Value = missing.json();
    assert_eq!(body["error"], "Paste not found");

    let missing_delete = server.delete(&format!("/api/pastes/{}", id)).await;
    assert_eq!(missing_delete.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_protected_burn_after_read_flow() {
    let (server, _temp) = setup_test_server();
    let created = create(
        &server,
        json!({
            "content": "launch codes",
            "password": "secret123",
            "burnAfterRead": true
        }),
    )
    .await;
    let id = created["id"].as_str().expect("id").to_string();
    assert_eq!(created["hasPassword"], true);
    assert_eq!(created["burnAfterRead"], true);
    let path = format!("/api/pastes/{}", id);

    let redacted: Value = server.get(&path).await.json();
    assert!(redacted["content"].is_null());
    assert_eq!(redacted["hasPassword"], true);
    assert_eq!(redacted["views"], 0);

    let wrong = server
        .post(&path)
        .json(&json!({ "password": "wrong" }))
        .await;
    assert_eq!(wrong.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = wrong.json();
    assert_eq!(body["error"], "Incorrect password");

    let unlocked = server
        .post(&path)
        .json(&json!({ "password": "secret123" }))
        .await;
    assert_eq!(unlocked.status_code(), StatusCode::OK);
    let unlocked: Value = unlocked.json();
    assert_eq!(unlocked["content"], "launch codes");
    assert_eq!(unlocked["views"], 1);

    let gone = server
        .post(&path)
        .json(&json!({ "password": "secret123" }))
        .await;
    assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_password_header_unlocks_get() {
    let (server, _temp) = setup_test_server();
    let created = create(
        &server,
        json!({ "content": "guarded", "password": "hunter2" }),
    )
    .await;
    let path = format!("/api/pastes/{}", created["id"].as_str().expect("id"));

    let wrong = server
        .get(&path)
        .add_header("x-paste-password", "nope")
        .await;
    assert_eq!(wrong.status_code(), StatusCode::UNAUTHORIZED);

    let unlocked = server
        .get(&path)
        .add_header("x-paste-password", "hunter2")
        .await;
    assert_eq!(unlocked.status_code(), StatusCode::OK);
    let body: Value = unlocked.json();
    assert_eq!(body["content"], "guarded");
    assert_eq!(body["views"], 1);

    let empty = server.get(&path).add_header("x-paste-password", "").await;
    let body: Value = empty.json();
    assert!(body["content"].is_null());
    assert_eq!(body["views"], 1);
}

#[tokio::test]
async fn test_list_hides_private_and_orders_newest_first() {
    let (server, _temp) = setup_test_server();
    let first = create(&server, json!({ "content": "first", "language": "rust" })).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    create(&server, json!({ "content": "secret", "isPrivate": true })).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = create(&server, json!({ "content": "second", "expiresIn": "1hour" })).await;

    let response = server.get("/api/pastes").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let items: Vec<Value> = response.json();
    let ids: Vec<&str> = items
        .iter()
        .map(|item| item["id"].as_str().expect("id"))
        .collect();
    assert_eq!(
        ids,
        vec![
            second["id"].as_str().expect("id"),
            first["id"].as_str().expect("id")
        ]
    );

    let item = items[1].as_object().expect("object");
    let mut keys: Vec<&str> = item.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        ["createdAt", "expiresAt", "id", "language", "title", "views"]
    );
    assert_eq!(item["language"], "rust");

    let limited: Vec<Value> = server
        .get("/api/pastes")
        .add_query_param("limit", 1)
        .await
        .json();
    assert_eq!(limited.len(), 1);

    let clamped: Vec<Value> = server
        .get("/api/pastes")
        .add_query_param("limit", 0)
        .await
        .json();
    assert_eq!(clamped.len(), 1);
}

#[tokio::test]
async fn test_private_paste_is_readable_by_direct_link() {
    let (server, _temp) = setup_test_server();
    let created = create(&server, json!({ "content": "unlisted", "isPrivate": true })).await;
    let read: Value = server
        .get(&format!("/api/pastes/{}", created["id"].as_str().expect("id")))
        .await
        .json();
    assert_eq!(read["content"], "unlisted");
    assert_eq!(read["isPrivate"], true);
}

#[tokio::test]
async fn test_create_validation_errors() {
    let (server, _temp) = setup_test_server();
    let cases = [
        json!({ "content": "   " }),
        json!({ "content": "x", "language": "cobol" }),
        json!({ "content": "x", "expiresIn": "2days" }),
        json!({ "content": "x".repeat(TEST_MAX_PASTE_SIZE + 1) }),
    ];
    for body in cases {
        let response = server.post("/api/pastes").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{}", body);
        let error: Value = response.json();
        assert!(error["error"].is_string());
    }
}

#[tokio::test]
async fn test_max_size_paste_survives_json_escaping() {
    let (server, _temp) = setup_test_server();
    let content = "\"".repeat(TEST_MAX_PASTE_SIZE);
    let created = create(&server, json!({ "content": content })).await;
    assert_eq!(
        created["content"].as_str().map(str::len),
        Some(TEST_MAX_PASTE_SIZE)
    );

    let newlines = format!("x{}", "\n".repeat(TEST_MAX_PASTE_SIZE - 1));
    create(&server, json!({ "content": newlines })).await;
}

#[tokio::test]
async fn test_blank_title_is_dropped_and_language_defaults() {
    let (server, _temp) = setup_test_server();
    let created = create(&server, json!({ "content": "plain", "title": "  " })).await;
    assert!(created["title"].is_null());
    assert_eq!(created["language"], "plaintext");
    assert!(created["content"].is_string());
}

#[tokio::test]
async fn test_expiry_label_sets_deadline() {
    let (server, _temp) = setup_test_server();
    let created = create(&server, json!({ "content": "soon", "expiresIn": "1day" })).await;
    let created_at = created["createdAt"].as_str().expect("createdAt");
    let expires_at = created["expiresAt"].as_str().expect("expiresAt");
    let created_at = chrono::DateTime::parse_from_rfc3339(created_at).expect("rfc3339");
    let expires_at = chrono::DateTime::parse_from_rfc3339(expires_at).expect("rfc3339");
    let delta = expires_at - created_at;
    assert!((delta - chrono::Duration::hours(24)).num_seconds().abs() <= 1);
}

#[tokio::test]
async fn test_security_headers_present() {
    let (server, _temp) = setup_test_server();
    let response = server.get("/api/pastes").await;
    response.assert_header("x-content-type-options", "nosniff");
    response.assert_header("x-frame-options", "DENY");
    response.assert_contains_header("content-security-policy");
}

#[tokio::test]
async fn test_strict_cors_allows_loopback_origin_on_configured_port() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config_for_db_path(&temp_dir.path().join("db"));
    config.port = 4055;
    let server = test_server_for_config(config);

    let loopback = server
        .get("/api/pastes")
        .add_header("origin", "http://127.0.0.1:4055")
        .await;
    assert_eq!(loopback.status_code(), StatusCode::OK);
    loopback.assert_header("access-control-allow-origin", "http://127.0.0.1:4055");

    let mismatched_port = server
        .get("/api/pastes")
        .add_header("origin", "http://127.0.0.1:9123")
        .await;
    assert_eq!(mismatched_port.status_code(), StatusCode::OK);
    assert!(!mismatched_port.contains_header("access-control-allow-origin"));

    let foreign = server
        .get("/api/pastes")
        .add_header("origin", "http://example.com:4055")
        .await;
    assert!(!foreign.contains_header("access-control-allow-origin"));
}
