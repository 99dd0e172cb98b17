//! End-to-end tests: the full router driven over HTTP against a mocked
//! remote API.

pub mod utils;

use axum_test::multipart::{MultipartForm, Part};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use utils::{TEST_FOLDER_ID, create_test_app, write_key_file};

#[test_log::test(tokio::test)]
async fn test_root_and_healthz() {
    let mock_server = MockServer::start().await;
    let key_file = write_key_file(&mock_server.uri());
    let server = create_test_app(&mock_server, &key_file).await;

    let response = server.get("/").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert!(
        body["message"].as_str().is_some_and(|m| !m.is_empty()),
        "Root should report a message, got: {body}"
    );

    let health = server.get("/healthz").await;
    assert_eq!(health.status_code(), 200);
    assert_eq!(health.text(), "OK");
}

/// `GET /files?extension=pdf` against a folder containing `a.pdf` and
/// `b.txt`: the extension clause is pushed into the remote query, so only
/// `a.pdf` comes back, and the response reshapes to `{count, files}`.
#[test_log::test(tokio::test)]
async fn test_list_files_with_extension_filter() {
    let mock_server = MockServer::start().await;
    let key_file = write_key_file(&mock_server.uri());

    let expected_q = format!("'{TEST_FOLDER_ID}' in parents and trashed = false and name contains '.pdf'");
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("q", expected_q))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [
                {"id": "f-pdf", "name": "a.pdf", "mimeType": "application/pdf", "modifiedTime": "2024-03-01T10:00:00Z"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let server = create_test_app(&mock_server, &key_file).await;

    let response = server.get("/files").add_query_param("extension", "pdf").await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["files"][0]["name"], "a.pdf");
    assert_eq!(body["files"][0]["mimeType"], "application/pdf");
}

#[test_log::test(tokio::test)]
async fn test_list_files_without_filter() {
    let mock_server = MockServer::start().await;
    let key_file = write_key_file(&mock_server.uri());

    let expected_q = format!("'{TEST_FOLDER_ID}' in parents and trashed = false");
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("q", expected_q))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [
                {"id": "f-pdf", "name": "a.pdf", "mimeType": "application/pdf", "modifiedTime": "2024-03-01T10:00:00Z"},
                {"id": "f-txt", "name": "b.txt", "mimeType": "text/plain", "modifiedTime": "2024-03-02T11:30:00Z"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let server = create_test_app(&mock_server, &key_file).await;

    let response = server.get("/files").await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 2);
    assert_eq!(body["files"].as_array().map(Vec::len), Some(2));
}

#[test_log::test(tokio::test)]
async fn test_download_streams_attachment_with_remote_name() {
    let mock_server = MockServer::start().await;
    let key_file = write_key_file(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/f-1"))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"file body bytes".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/f-1"))
        .and(query_param("fields", "name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "report.pdf"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let server = create_test_app(&mock_server, &key_file).await;

    let response = server.get("/download/f-1").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-type"), "application/octet-stream");
    assert_eq!(response.header("content-disposition"), "attachment; filename=report.pdf");
    assert_eq!(response.as_bytes().as_ref(), b"file body bytes");
}

#[test_log::test(tokio::test)]
async fn test_download_failure_surfaces_remote_message() {
    let mock_server = MockServer::start().await;
    let key_file = write_key_file(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"code": 404, "message": "File not found: missing."}
        })))
        .mount(&mock_server)
        .await;

    let server = create_test_app(&mock_server, &key_file).await;

    let response = server.get("/download/missing").await;
    assert_eq!(response.status_code(), 500);

    let body: serde_json::Value = response.json();
    let detail = body["detail"].as_str().expect("Expected a detail field");
    assert!(detail.contains("File not found: missing."), "Got: {detail}");
}

/// `POST /upload` with field `file` = (`note.txt`, `text/plain`, `"hi"`)
/// returns the identifier/name pair assigned by the remote service.
#[test_log::test(tokio::test)]
async fn test_upload_multipart_file() {
    let mock_server = MockServer::start().await;
    let key_file = write_key_file(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .and(query_param("uploadType", "multipart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "up-1", "name": "note.txt"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let server = create_test_app(&mock_server, &key_file).await;

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"hi".to_vec()).file_name("note.txt").mime_type("text/plain"),
    );
    let response = server.post("/upload").multipart(form).await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(body["name"], "note.txt");

    // The outgoing upload body pins the payload and the folder scope.
    let requests = mock_server.received_requests().await.expect("Request recording enabled");
    let upload = requests
        .iter()
        .find(|r| r.url.path() == "/upload/drive/v3/files")
        .expect("Upload request recorded");
    let upload_body = String::from_utf8_lossy(&upload.body);
    assert!(upload_body.contains("note.txt"));
    assert!(upload_body.contains(TEST_FOLDER_ID));
    assert!(upload_body.contains("hi"));
}

#[test_log::test(tokio::test)]
async fn test_upload_without_file_field_is_rejected() {
    let mock_server = MockServer::start().await;
    let key_file = write_key_file(&mock_server.uri());
    let server = create_test_app(&mock_server, &key_file).await;

    let form = MultipartForm::new().add_text("purpose", "nothing useful");
    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert!(
        body["detail"].as_str().is_some_and(|d| d.contains("'file'")),
        "Got: {body}"
    );
}

#[test_log::test(tokio::test)]
async fn test_delete_confirms_and_forwards_failures() {
    let mock_server = MockServer::start().await;
    let key_file = write_key_file(&mock_server.uri());

    Mock::given(method("DELETE"))
        .and(path("/drive/v3/files/f-9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/drive/v3/files/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"code": 404, "message": "File not found: gone."}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let server = create_test_app(&mock_server, &key_file).await;

    let ok = server.delete("/delete/f-9").await;
    assert_eq!(ok.status_code(), 200);
    let body: serde_json::Value = ok.json();
    assert_eq!(body["message"], "File f-9 deleted successfully");

    // Deleting an id the remote no longer knows is a failure, never a
    // silent success.
    let failed = server.delete("/delete/gone").await;
    assert_eq!(failed.status_code(), 500);
    let body: serde_json::Value = failed.json();
    assert!(body["detail"].as_str().is_some_and(|d| d.contains("File not found: gone.")));
}

#[test_log::test(tokio::test)]
async fn test_rename_is_idempotent_under_reapplication() {
    let mock_server = MockServer::start().await;
    let key_file = write_key_file(&mock_server.uri());

    Mock::given(method("PATCH"))
        .and(path("/drive/v3/files/f-1"))
        .and(body_json(serde_json::json!({"name": "final.txt"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "f-1", "name": "final.txt"})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let server = create_test_app(&mock_server, &key_file).await;

    for _ in 0..2 {
        let response = server.patch("/rename/f-1").add_query_param("new_name", "final.txt").await;
        assert_eq!(response.status_code(), 200);
        let body: serde_json::Value = response.json();
        assert_eq!(body["id"], "f-1");
        assert_eq!(body["new_name"], "final.txt");
    }
}

#[test_log::test(tokio::test)]
async fn test_rename_requires_new_name() {
    let mock_server = MockServer::start().await;
    let key_file = write_key_file(&mock_server.uri());
    let server = create_test_app(&mock_server, &key_file).await;

    let response = server.patch("/rename/f-1").await;
    assert_eq!(response.status_code(), 400);
}
