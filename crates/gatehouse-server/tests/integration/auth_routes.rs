//! Login, logout, OAuth start and session endpoints.

use crate::common::{body_json, set_cookies, session_cookies, TestHarness, SECRET};
use gatehouse_core::UserRole;
use http::{Method, StatusCode};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_login_sets_session_and_role_cookies() {
    let h = TestHarness::new().await;
    Mock::given(method("POST"))
        .and(path("/v1/account/sessions/email"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "$id": "s1", "userId": "u1", "expire": "2099-01-01T00:00:00.000+00:00",
            "secret": SECRET, "provider": "email", "current": true
        })))
        .expect(1)
        .mount(&h.platform)
        .await;
    h.mount_role("u1", UserRole::Admin).await;

    let resp = h
        .json(
            Method::POST,
            "/api/auth/login",
            None,
            json!({"email": "alice@example.com", "password": "correct horse"}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookies = set_cookies(&resp);
    assert!(cookies.iter().any(|c| c.starts_with("user_session=secret-1")));
    assert!(cookies.iter().any(|c| c.starts_with("user_role=admin")));
    assert!(cookies.iter().all(|c| c.contains("HttpOnly")));

    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["data"]["userId"], "u1");
    assert_eq!(body["data"]["role"], "admin");
}

#[tokio::test]
async fn test_login_rejects_invalid_email_before_platform() {
    let h = TestHarness::new().await;
    let resp = h
        .json(
            Method::POST,
            "/api/auth/login",
            None,
            json!({"email": "not-an-email", "password": "x"}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["category"], "validation");
    assert_eq!(body["error"]["field"], "email");
    assert!(h.platform.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_bad_credentials_is_unauthorized() {
    let h = TestHarness::new().await;
    Mock::given(method("POST"))
        .and(path("/v1/account/sessions/email"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid credentials. Please check the email and password.",
            "code": 401, "type": "user_invalid_credentials"
        })))
        .mount(&h.platform)
        .await;

    let resp = h
        .json(
            Method::POST,
            "/api/auth/login",
            None,
            json!({"email": "alice@example.com", "password": "wrong"}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["category"], "authentication");
}

#[tokio::test]
async fn test_logged_in_user_can_still_call_login_api() {
    let h = TestHarness::new().await;
    let resp = h
        .json(
            Method::POST,
            "/api/auth/login",
            Some(&session_cookies(UserRole::Client)),
            json!({"email": "", "password": ""}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_clears_cookies() {
    let h = TestHarness::new().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/account/sessions/current"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.platform)
        .await;

    let resp = h
        .json(
            Method::POST,
            "/api/auth/logout",
            Some(&session_cookies(UserRole::Client)),
            json!({}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookies = set_cookies(&resp);
    assert!(cookies.iter().any(|c| c.starts_with("user_session=;")));
    assert!(cookies.iter().any(|c| c.starts_with("user_role=;")));
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Logged out successfully");
}

#[tokio::test]
async fn test_oauth_start_uses_request_origin() {
    let h = TestHarness::new().await;
    let req = http::Request::builder()
        .method(Method::POST)
        .uri("/api/auth/oauth")
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::ORIGIN, "https://preview.example.com")
        .body(axum::body::Body::from(json!({"provider": "github"}).to_string()))
        .unwrap();
    let resp = h.send(req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    let url = body["data"]["redirectUrl"].as_str().unwrap();
    assert!(url.contains("/v1/account/sessions/oauth2/github?project=test-project"));
    assert!(url.contains("success=https%3A%2F%2Fpreview.example.com%2Foauth"));
    assert!(url.contains("failure=https%3A%2F%2Fpreview.example.com%2Ffail%3Ferror%3Doauth_failed"));
}

#[tokio::test]
async fn test_session_status_without_cookie() {
    let h = TestHarness::new().await;
    let resp = h.get("/api/auth/session", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["active"], false);
    assert_eq!(body["message"], "No active session");
}

#[tokio::test]
async fn test_session_check_clears_expired_session() {
    let h = TestHarness::new().await;
    h.mount_account("u1").await;
    Mock::given(method("GET"))
        .and(path("/v1/account/sessions/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "$id": "s1", "userId": "u1", "expire": "2000-01-01T00:00:00.000+00:00",
            "provider": "email", "current": true
        })))
        .mount(&h.platform)
        .await;

    let resp = h
        .json(
            Method::POST,
            "/api/auth/session/check",
            Some(&session_cookies(UserRole::Client)),
            json!({}),
        )
        .await;
    let cookies = set_cookies(&resp);
    assert!(cookies.iter().any(|c| c.starts_with("user_session=;")));
    let body = body_json(resp).await;
    assert_eq!(body["valid"], false);
    assert_eq!(body["expired"], true);
    assert_eq!(body["message"], "Session has expired");
}

#[tokio::test]
async fn test_me_returns_user() {
    let h = TestHarness::new().await;
    h.mount_account("u1").await;
    let resp = h
        .get("/api/auth/me", Some(&session_cookies(UserRole::Client)))
        .await;
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["$id"], "u1");
}
