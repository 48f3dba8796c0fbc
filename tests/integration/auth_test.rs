//! Integration tests for registration, login, and token handling.

use http::StatusCode;

use super::helpers::TestApp;

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new().await;

    app.register("alice", "password123").await;
    let token = app.login("alice", "password123").await;
    assert!(!token.is_empty());

    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data_str("username"), "alice");
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::new().await;
    app.register("alice", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "username": "alice",
                "password": "otherpassword",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_short_password() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "username": "bob",
                "password": "short",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_invalid_password() {
    let app = TestApp::new().await;
    app.register("alice", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": "alice",
                "password": "wrongpassword",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_nonexistent_user_same_error() {
    let app = TestApp::new().await;
    app.register("alice", "password123").await;

    let wrong_pass = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({ "username": "alice", "password": "nope nope" })),
            None,
        )
        .await;
    let no_user = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({ "username": "nobody", "password": "nope nope" })),
            None,
        )
        .await;

    // Identical status and message so the response never reveals whether
    // the username exists.
    assert_eq!(wrong_pass.status, StatusCode::UNAUTHORIZED);
    assert_eq!(no_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        wrong_pass.body.get("message"),
        no_user.body.get("message")
    );
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/data", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", "/api/auth/me", None, Some("garbage-token"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_requires_no_auth() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data_str("status"), "ok");
}
