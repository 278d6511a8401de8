//! Storage endpoints.

use crate::common::{body_json, session_cookies, TestHarness};
use axum::body::Body;
use gatehouse_core::UserRole;
use http::{header, Method, Request, StatusCode};
use serde_json::json;
use wiremock::matchers::{header as header_is, method, path};
use wiremock::{Mock, ResponseTemplate};

const BOUNDARY: &str = "gatehouse-test-boundary";

fn multipart(field: &str, file_name: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: text/plain\r\n\r\n{content}\r\n--{BOUNDARY}--\r\n"
    );
    Request::builder()
        .method(Method::POST)
        .uri("/api/storage/files")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::COOKIE, session_cookies(UserRole::Client))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_upload_forwards_file_with_session() {
    let h = TestHarness::new().await;
    Mock::given(method("POST"))
        .and(path("/v1/storage/buckets/bucket/files"))
        .and(header_is("X-Appwrite-Session", "secret-1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "$id": "f1", "bucketId": "bucket", "name": "notes.txt",
            "mimeType": "text/plain", "sizeOriginal": 5
        })))
        .expect(1)
        .mount(&h.platform)
        .await;

    let resp = h.send(multipart("file", "notes.txt", "hello")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["file"]["$id"], "f1");
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let h = TestHarness::new().await;
    Mock::given(method("POST"))
        .and(path("/v1/storage/buckets/bucket/files"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&h.platform)
        .await;

    let resp = h.send(multipart("other", "notes.txt", "hello")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No file uploaded");
    assert!(body.get("file").is_none());
}

#[tokio::test]
async fn test_view_returns_base64() {
    let h = TestHarness::new().await;
    Mock::given(method("GET"))
        .and(path("/v1/storage/buckets/bucket/files/f1/view"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"hello".to_vec(), "text/plain"))
        .mount(&h.platform)
        .await;

    let resp = h
        .get(
            "/api/storage/files/f1/view",
            Some(&session_cookies(UserRole::Client)),
        )
        .await;
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["base64"], "aGVsbG8=");
    assert_eq!(body["mimeType"], "text/plain");
}

#[tokio::test]
async fn test_delete_without_session_reports_failure() {
    let h = TestHarness::new().await;
    let resp = h
        .json(Method::DELETE, "/api/storage/files/f1", None, json!({}))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "This action requires you to be logged in");
}
