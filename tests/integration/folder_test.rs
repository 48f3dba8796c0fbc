//! Integration tests for folder operations: CRUD, move, children, breadcrumb.

use http::StatusCode;
use serde_json::json;

use super::helpers::TestApp;

async fn create_folder(
    app: &TestApp,
    token: &str,
    name: &str,
    parent_id: Option<&str>,
) -> super::helpers::TestResponse {
    let body = match parent_id {
        Some(pid) => json!({ "name": name, "parent_id": pid }),
        None => json!({ "name": name }),
    };
    app.request("POST", "/api/folders", Some(body), Some(token))
        .await
}

#[tokio::test]
async fn test_create_and_rename_folder() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let created = create_folder(&app, &token, "Reports", None).await;
    assert_eq!(created.status, StatusCode::OK);
    let id = created.id();

    let renamed = app
        .request(
            "PUT",
            &format!("/api/folders/{id}"),
            Some(json!({ "name": "Reports-2024" })),
            Some(&token),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.data_str("name"), "Reports-2024");
}

#[tokio::test]
async fn test_sibling_name_conflict() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let first = create_folder(&app, &token, "Docs", None).await;
    assert_eq!(first.status, StatusCode::OK);

    let duplicate = create_folder(&app, &token, "Docs", None).await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.error_code(), "NAME_CONFLICT");

    // Same name under a different parent is fine.
    let parent = create_folder(&app, &token, "Archive", None).await;
    let nested = create_folder(&app, &token, "Docs", Some(&parent.id())).await;
    assert_eq!(nested.status, StatusCode::OK);
}

#[tokio::test]
async fn test_blank_name_rejected() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let response = create_folder(&app, &token, "   ", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_move_folder_cycle_rejected() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let a = create_folder(&app, &token, "a", None).await.id();
    let b = create_folder(&app, &token, "b", Some(&a)).await.id();
    let c = create_folder(&app, &token, "c", Some(&b)).await.id();

    // Moving a under its own grandchild would create a cycle.
    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{a}/move"),
            Some(json!({ "new_parent_id": c })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "CYCLE_DETECTED");

    // Moving a folder into itself is the trivial cycle.
    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{a}/move"),
            Some(json!({ "new_parent_id": a })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_move_folder_to_root() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let parent = create_folder(&app, &token, "parent", None).await.id();
    let child = create_folder(&app, &token, "child", Some(&parent)).await.id();

    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{child}/move"),
            Some(json!({})),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(
        response
            .body
            .get("data")
            .and_then(|d| d.get("parent_id"))
            .map(|v| v.is_null())
            .unwrap_or(false)
    );
}

#[tokio::test]
async fn test_breadcrumb_path() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let a = create_folder(&app, &token, "a", None).await.id();
    let b = create_folder(&app, &token, "b", Some(&a)).await.id();
    let c = create_folder(&app, &token, "c", Some(&b)).await.id();

    let response = app
        .request("GET", &format!("/api/folders/{c}/path"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let names: Vec<&str> = response.body["data"]
        .as_array()
        .expect("array body")
        .iter()
        .map(|f| f["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[tokio::test]
async fn test_list_children() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let parent = create_folder(&app, &token, "parent", None).await.id();
    create_folder(&app, &token, "sub1", Some(&parent)).await;
    create_folder(&app, &token, "sub2", Some(&parent)).await;
    app.upload(&token, "notes.txt", "text/plain", b"hi", Some(&parent))
        .await;

    let response = app
        .request(
            "GET",
            &format!("/api/folders/{parent}/children"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let data = &response.body["data"];
    assert_eq!(data["folders"].as_array().expect("folders").len(), 2);
    assert_eq!(data["files"].as_array().expect("files").len(), 1);
}

#[tokio::test]
async fn test_cascade_delete() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let parent = create_folder(&app, &token, "parent", None).await.id();
    let child = create_folder(&app, &token, "child", Some(&parent)).await.id();
    let file = app
        .upload(&token, "deep.txt", "text/plain", b"bytes", Some(&child))
        .await
        .id();

    let response = app
        .request(
            "DELETE",
            &format!("/api/folders/{parent}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // The whole subtree is gone.
    for path in [
        format!("/api/folders/{child}/children"),
        format!("/api/files/{file}"),
    ] {
        let response = app.request("GET", &path, None, Some(&token)).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    let tree = app.request("GET", "/api/data", None, Some(&token)).await;
    assert!(tree.body["data"]["folders"].as_array().expect("folders").is_empty());
    assert!(tree.body["data"]["files"].as_array().expect("files").is_empty());
}

#[tokio::test]
async fn test_missing_parent_rejected() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let response = create_folder(
        &app,
        &token,
        "orphan",
        Some("00000000-0000-0000-0000-000000000001"),
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
