//! Admin user listing.

use crate::common::{body_json, session_cookies, TestHarness};
use gatehouse_core::UserRole;
use http::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_client_is_forbidden() {
    let h = TestHarness::new().await;
    h.mount_account("u1").await;
    h.mount_role("u1", UserRole::Client).await;

    let resp = h
        .get("/api/users", Some(&session_cookies(UserRole::Client)))
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["category"], "authorization");
    assert_eq!(
        body["error"]["message"],
        "Admin access required: Role verification failed"
    );
}

#[tokio::test]
async fn test_anonymous_is_forbidden() {
    let h = TestHarness::new().await;
    let resp = h.get("/api/users", None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_lists_users() {
    let h = TestHarness::new().await;
    h.mount_account("u1").await;
    h.mount_role("u1", UserRole::Admin).await;
    Mock::given(method("GET"))
        .and(path("/v1/tablesdb/db/tables/users/rows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "rows": [
                {"$id": "r1", "userId": "u1", "name": "Alice", "email": "alice@example.com", "role": "admin"},
                {"$id": "r2", "userId": "u2", "name": "Bob", "email": "bob@example.com", "role": "client"}
            ]
        })))
        .mount(&h.platform)
        .await;

    let resp = h
        .get(
            "/api/users?limit=500",
            Some(&session_cookies(UserRole::Admin)),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["total"], 2);
}
