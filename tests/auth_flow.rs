//! Endpoint tests for the signup / login / logout / session-check flow.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use tempfile::TempDir;

use auth_api::{app, db, state::AppState};

/// Spin up the app against a fresh database in a temp directory.
/// The TempDir is returned so the database file outlives the server.
fn test_server() -> (TestServer, TempDir) {
    let temp = TempDir::new().expect("temp dir");
    let pool = db::init_db(&temp.path().join("auth.db")).expect("init db");
    let server = TestServer::builder()
        .save_cookies()
        .build(app::build_router(AppState::new(pool)))
        .expect("test server");
    (server, temp)
}

async fn signup_alice(server: &TestServer) {
    let response = server
        .post("/signup")
        .json(&json!({"username": "alice", "password": "secret123"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn signup_returns_public_view() {
    let (server, _temp) = test_server();

    let response = server
        .post("/signup")
        .json(&json!({"username": "alice", "password": "secret123"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body, json!({"id": 1, "username": "alice"}));
}

#[tokio::test]
async fn signup_does_not_log_in() {
    let (server, _temp) = test_server();
    signup_alice(&server).await;

    let response = server.get("/check_session").await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(response.text(), "");
}

#[tokio::test]
async fn signup_rejects_missing_fields() {
    let (server, _temp) = test_server();

    for body in [
        json!({}),
        json!({"username": "alice"}),
        json!({"password": "secret123"}),
        json!({"username": "", "password": "secret123"}),
        json!({"username": "alice", "password": ""}),
    ] {
        let response = server.post("/signup").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn signup_duplicate_username_conflicts() {
    let (server, _temp) = test_server();
    signup_alice(&server).await;

    let response = server
        .post("/signup")
        .json(&json!({"username": "alice", "password": "another"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn stored_hash_is_not_the_plaintext() {
    let (server, temp) = test_server();
    signup_alice(&server).await;

    let conn = rusqlite::Connection::open(temp.path().join("auth.db")).unwrap();
    let stored: String = conn
        .query_row(
            "SELECT password_hash FROM users WHERE username = 'alice'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(!stored.is_empty());
    assert_ne!(stored, "secret123");
}

#[tokio::test]
async fn login_failure_is_uniform() {
    let (server, _temp) = test_server();
    signup_alice(&server).await;

    let wrong_password = server
        .post("/login")
        .json(&json!({"username": "alice", "password": "wrong"}))
        .await;
    let unknown_user = server
        .post("/login")
        .json(&json!({"username": "mallory", "password": "secret123"}))
        .await;

    // Same status and byte-identical body for both failure modes
    assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        wrong_password.json::<Value>(),
        json!({"error": "Invalid username or password"})
    );
    assert_eq!(wrong_password.text(), unknown_user.text());
}

#[tokio::test]
async fn login_establishes_a_session() {
    let (server, _temp) = test_server();
    signup_alice(&server).await;

    let response = server
        .post("/login")
        .json(&json!({"username": "alice", "password": "secret123"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({"id": 1, "username": "alice"})
    );

    let check = server.get("/check_session").await;
    assert_eq!(check.status_code(), StatusCode::OK);
    assert_eq!(check.json::<Value>(), json!({"id": 1, "username": "alice"}));
}

#[tokio::test]
async fn check_session_without_login_is_no_content() {
    let (server, _temp) = test_server();

    let response = server.get("/check_session").await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(response.text(), "");
}

#[tokio::test]
async fn logout_clears_the_session() {
    let (server, _temp) = test_server();
    signup_alice(&server).await;

    server
        .post("/login")
        .json(&json!({"username": "alice", "password": "secret123"}))
        .await;
    assert_eq!(
        server.get("/check_session").await.status_code(),
        StatusCode::OK
    );

    let logout = server.delete("/logout").await;
    assert_eq!(logout.status_code(), StatusCode::NO_CONTENT);

    let check = server.get("/check_session").await;
    assert_eq!(check.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(check.text(), "");
}

#[tokio::test]
async fn logout_is_idempotent() {
    let (server, _temp) = test_server();

    // No session at all - still succeeds
    let response = server.delete("/logout").await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    // Twice after a real login - still succeeds
    signup_alice(&server).await;
    server
        .post("/login")
        .json(&json!({"username": "alice", "password": "secret123"}))
        .await;
    server.delete("/logout").await;
    let again = server.delete("/logout").await;
    assert_eq!(again.status_code(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn responses_never_contain_the_hash() {
    let (server, _temp) = test_server();

    let signup = server
        .post("/signup")
        .json(&json!({"username": "alice", "password": "secret123"}))
        .await;
    let login = server
        .post("/login")
        .json(&json!({"username": "alice", "password": "secret123"}))
        .await;
    let check = server.get("/check_session").await;

    for body in [
        signup.json::<Value>(),
        login.json::<Value>(),
        check.json::<Value>(),
    ] {
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object.contains_key("id"));
        assert!(object.contains_key("username"));
    }
}

#[tokio::test]
async fn health_endpoint_responds() {
    let (server, _temp) = test_server();
    assert_eq!(server.get("/health").await.status_code(), StatusCode::OK);
}
