//! Integration tests for file upload, download, preview, and metadata.

use http::StatusCode;
use serde_json::json;

use super::helpers::TestApp;

#[tokio::test]
async fn test_upload_download_roundtrip() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let uploaded = app
        .upload(&token, "q1.pdf", "application/pdf", b"pdf bytes here", None)
        .await;
    assert_eq!(uploaded.status, StatusCode::OK);
    assert_eq!(uploaded.data_str("mime_type"), "application/pdf");
    assert_eq!(uploaded.body["data"]["size"], json!(14));
    let id = uploaded.id();

    let (status, headers, bytes) = app
        .download(&token, &format!("/api/files/{id}/download"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"pdf bytes here");
    assert_eq!(
        headers.get("content-type").expect("content-type"),
        "application/pdf"
    );
    assert_eq!(
        headers
            .get("content-disposition")
            .expect("disposition")
            .to_str()
            .expect("ascii"),
        "attachment; filename=\"q1.pdf\""
    );
    assert_eq!(headers.get("accept-ranges").expect("accept-ranges"), "bytes");
}

#[tokio::test]
async fn test_preview_inline_disposition() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let id = app
        .upload(&token, "photo.png", "image/png", b"png-ish", None)
        .await
        .id();

    let (status, headers, bytes) = app
        .download(&token, &format!("/api/files/{id}/preview"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"png-ish");
    assert_eq!(
        headers
            .get("content-disposition")
            .expect("disposition")
            .to_str()
            .expect("ascii"),
        "inline"
    );
}

#[tokio::test]
async fn test_ranged_download() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let id = app
        .upload(&token, "media.bin", "application/octet-stream", b"0123456789", None)
        .await
        .id();

    let (status, headers, bytes) = app
        .download(
            &token,
            &format!("/api/files/{id}/download"),
            Some("bytes=2-5"),
        )
        .await;
    assert_eq!(status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(bytes, b"2345");
    assert_eq!(
        headers.get("content-range").expect("content-range"),
        "bytes 2-5/10"
    );

    // Suffix form.
    let (status, _, bytes) = app
        .download(
            &token,
            &format!("/api/files/{id}/download"),
            Some("bytes=-3"),
        )
        .await;
    assert_eq!(status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(bytes, b"789");

    // Malformed range is ignored and the full content served.
    let (status, _, bytes) = app
        .download(
            &token,
            &format!("/api/files/{id}/download"),
            Some("bytes=oops"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"0123456789");
}

#[tokio::test]
async fn test_mime_sniffed_when_not_declared() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let uploaded = app
        .upload(
            &token,
            "notes.txt",
            "application/octet-stream",
            b"plain text",
            None,
        )
        .await;
    assert_eq!(uploaded.data_str("mime_type"), "text/plain");
}

#[tokio::test]
async fn test_rename_and_star() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let id = app
        .upload(&token, "draft.txt", "text/plain", b"text", None)
        .await
        .id();

    let renamed = app
        .request(
            "PUT",
            &format!("/api/files/{id}"),
            Some(json!({ "name": "final.txt" })),
            Some(&token),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.data_str("name"), "final.txt");

    let starred = app
        .request("PUT", &format!("/api/files/{id}/star"), None, Some(&token))
        .await;
    assert_eq!(starred.body["data"]["starred"], json!(true));

    let unstarred = app
        .request("PUT", &format!("/api/files/{id}/star"), None, Some(&token))
        .await;
    assert_eq!(unstarred.body["data"]["starred"], json!(false));
}

#[tokio::test]
async fn test_replace_content() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let id = app
        .upload(&token, "doc.txt", "text/plain", b"version one", None)
        .await
        .id();

    let replaced = app
        .put_content(&token, &id, "text/plain", b"second version, longer")
        .await;
    assert_eq!(replaced.status, StatusCode::OK);
    assert_eq!(replaced.body["data"]["size"], json!(22));

    let (_, _, bytes) = app
        .download(&token, &format!("/api/files/{id}/download"), None)
        .await;
    assert_eq!(bytes, b"second version, longer");
}

#[tokio::test]
async fn test_duplicate_file_names_allowed() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let first = app
        .upload(&token, "scan.pdf", "application/pdf", b"one", None)
        .await;
    let second = app
        .upload(&token, "scan.pdf", "application/pdf", b"two", None)
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::OK);
    assert_ne!(first.id(), second.id());
}

#[tokio::test]
async fn test_delete_file() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let id = app
        .upload(&token, "tmp.dat", "application/octet-stream", b"bytes", None)
        .await
        .id();

    let response = app
        .request("DELETE", &format!("/api/files/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", &format!("/api/files/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let (status, _, _) = app
        .download(&token, &format!("/api/files/{id}/download"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_into_missing_folder() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let response = app
        .upload(
            &token,
            "lost.txt",
            "text/plain",
            b"x",
            Some("00000000-0000-0000-0000-000000000001"),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_folder_id_after_file_part_is_rejected() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let folder = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({"name": "inbox"})),
            Some(&token),
        )
        .await;
    let folder_id = folder.id();

    // The file part is consumed as a stream, so a folder_id arriving
    // after it can no longer apply. The upload must refuse, not misfile.
    let boundary = "vault-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"late.txt\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: text/plain\r\n\r\n");
    body.extend_from_slice(b"some bytes");
    body.extend_from_slice(format!("\r\n--{boundary}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"folder_id\"\r\n\r\n");
    body.extend_from_slice(folder_id.as_bytes());
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let response = app.post_multipart(&token, boundary, body).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");

    // The refused upload left no file record anywhere.
    let tree = app.request("GET", "/api/data", None, Some(&token)).await;
    assert_eq!(tree.body["data"]["files"], json!([]));
}

#[tokio::test]
async fn test_malformed_id_in_path_uses_error_envelope() {
    let app = TestApp::new().await;
    let token = app.register("alice", "password123").await;

    let response = app
        .request("GET", "/api/files/not-a-uuid", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");

    let response = app
        .request("DELETE", "/api/folders/not-a-uuid", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}
