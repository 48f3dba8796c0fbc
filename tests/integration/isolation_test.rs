//! Integration tests for per-owner isolation: one user's resources are
//! invisible to every other user, indistinguishably from not existing.

use http::StatusCode;
use serde_json::json;

use super::helpers::TestApp;

#[tokio::test]
async fn test_foreign_resources_look_absent() {
    let app = TestApp::new().await;
    let alice = app.register("alice", "password123").await;
    let mallory = app.register("mallory", "password123").await;

    let folder = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "Private" })),
            Some(&alice),
        )
        .await
        .id();
    let file = app
        .upload(&alice, "secret.txt", "text/plain", b"top secret", Some(&folder))
        .await
        .id();

    // Every read and write against alice's exact IDs comes back 404.
    let reads = [
        ("GET", format!("/api/folders/{folder}/children")),
        ("GET", format!("/api/folders/{folder}/path")),
        ("GET", format!("/api/files/{file}")),
        ("GET", format!("/api/files/{file}/download")),
        ("DELETE", format!("/api/folders/{folder}")),
        ("DELETE", format!("/api/files/{file}")),
    ];
    for (method, path) in reads {
        let response = app.request(method, &path, None, Some(&mallory)).await;
        assert_eq!(
            response.status,
            StatusCode::NOT_FOUND,
            "{method} {path} must 404 for a foreign owner"
        );
        assert_eq!(response.error_code(), "NOT_FOUND");
    }

    let rename = app
        .request(
            "PUT",
            &format!("/api/folders/{folder}"),
            Some(json!({ "name": "mine now" })),
            Some(&mallory),
        )
        .await;
    assert_eq!(rename.status, StatusCode::NOT_FOUND);

    // Nothing was touched: alice still sees her data.
    let tree = app.request("GET", "/api/data", None, Some(&alice)).await;
    assert_eq!(tree.body["data"]["folders"].as_array().expect("folders").len(), 1);
    assert_eq!(tree.body["data"]["files"].as_array().expect("files").len(), 1);
}

#[tokio::test]
async fn test_same_names_in_different_accounts() {
    let app = TestApp::new().await;
    let alice = app.register("alice", "password123").await;
    let bob = app.register("bob", "password123").await;

    for token in [&alice, &bob] {
        let response = app
            .request(
                "POST",
                "/api/folders",
                Some(json!({ "name": "Documents" })),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_trees_are_disjoint() {
    let app = TestApp::new().await;
    let alice = app.register("alice", "password123").await;
    let bob = app.register("bob", "password123").await;

    app.upload(&alice, "a.txt", "text/plain", b"alice data", None)
        .await;

    let bob_tree = app.request("GET", "/api/data", None, Some(&bob)).await;
    assert_eq!(bob_tree.status, StatusCode::OK);
    assert!(bob_tree.body["data"]["files"].as_array().expect("files").is_empty());
    assert!(bob_tree.body["data"]["folders"].as_array().expect("folders").is_empty());
}

#[tokio::test]
async fn test_cannot_attach_under_foreign_parent() {
    let app = TestApp::new().await;
    let alice = app.register("alice", "password123").await;
    let mallory = app.register("mallory", "password123").await;

    let folder = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "Private" })),
            Some(&alice),
        )
        .await
        .id();

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "intruder", "parent_id": folder })),
            Some(&mallory),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .upload(&mallory, "intruder.txt", "text/plain", b"x", Some(&folder))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
