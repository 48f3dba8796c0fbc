//! End-to-end walkthrough of a typical session: register, build a small
//! tree, work with a file, then tear everything down.

use http::StatusCode;
use serde_json::json;

use super::helpers::TestApp;

#[tokio::test]
async fn test_full_session_workflow() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    // Create a folder and upload a report into it.
    let folder = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "Reports" })),
            Some(&token),
        )
        .await;
    assert_eq!(folder.status, StatusCode::OK);
    let folder_id = folder.id();

    let data = vec![0x25u8; 2048];
    let file = app
        .upload(&token, "q1.pdf", "application/pdf", &data, Some(&folder_id))
        .await;
    assert_eq!(file.status, StatusCode::OK);
    assert_eq!(file.body["data"]["size"], json!(2048));
    assert_eq!(file.data_str("mime_type"), "application/pdf");
    let file_id = file.id();

    // Star it.
    let starred = app
        .request(
            "PUT",
            &format!("/api/files/{file_id}/star"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(starred.body["data"]["starred"], json!(true));

    // Rename the folder; the file stays inside it.
    let renamed = app
        .request(
            "PUT",
            &format!("/api/folders/{folder_id}"),
            Some(json!({ "name": "Reports-2024" })),
            Some(&token),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);

    let tree = app.request("GET", "/api/data", None, Some(&token)).await;
    assert_eq!(tree.body["data"]["folders"][0]["name"], json!("Reports-2024"));
    assert_eq!(tree.body["data"]["files"][0]["folder_id"], tree.body["data"]["folders"][0]["id"]);
    assert_eq!(tree.body["data"]["files"][0]["starred"], json!(true));

    // Download the full content back.
    let (status, _, bytes) = app
        .download(&token, &format!("/api/files/{file_id}/download"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, data);

    // Cascade delete the folder; the account ends empty.
    let deleted = app
        .request(
            "DELETE",
            &format!("/api/folders/{folder_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let tree = app.request("GET", "/api/data", None, Some(&token)).await;
    assert!(tree.body["data"]["folders"].as_array().expect("folders").is_empty());
    assert!(tree.body["data"]["files"].as_array().expect("files").is_empty());

    let (status, _, _) = app
        .download(&token, &format!("/api/files/{file_id}/download"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
