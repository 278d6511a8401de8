//! The `/oauth` callback end to end.

use crate::common::{location, set_cookies, TestHarness, SECRET};
use gatehouse_core::UserRole;
use http::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_callback_sets_cookies_and_redirects_to_success() {
    let h = TestHarness::new().await;
    h.mount_account("u1").await;
    h.mount_role("u1", UserRole::Client).await;

    let resp = h
        .get(&format!("/oauth?userId=u1&secret={SECRET}"), None)
        .await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/success");
    let cookies = set_cookies(&resp);
    assert!(cookies.iter().any(|c| c.starts_with("user_session=secret-1")));
    assert!(cookies.iter().any(|c| c.starts_with("user_role=client")));
}

#[tokio::test]
async fn test_callback_creates_record_for_new_user() {
    let h = TestHarness::new().await;
    h.mount_account("u2").await;
    Mock::given(method("GET"))
        .and(path("/v1/tablesdb/db/tables/users/rows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 0, "rows": []})))
        .mount(&h.platform)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/tablesdb/db/tables/users/rows"))
        .and(body_partial_json(json!({"data": {"userId": "u2", "role": "client"}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "$id": "r2", "userId": "u2", "role": "client"
        })))
        .expect(1)
        .mount(&h.platform)
        .await;

    let resp = h
        .get(&format!("/oauth?userId=u2&secret={SECRET}"), None)
        .await;
    assert_eq!(location(&resp), "/success");
}

#[tokio::test]
async fn test_callback_missing_secret() {
    let h = TestHarness::new().await;
    let resp = h.get("/oauth?userId=u1", None).await;
    assert_eq!(location(&resp), "/fail?error=oauth_missing_params");
    assert!(set_cookies(&resp).is_empty());
}

#[tokio::test]
async fn test_callback_user_mismatch() {
    let h = TestHarness::new().await;
    h.mount_account("someone-else").await;
    let resp = h
        .get(&format!("/oauth?userId=u1&secret={SECRET}"), None)
        .await;
    assert_eq!(location(&resp), "/fail?error=oauth_user_mismatch");
}
