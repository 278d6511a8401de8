//! Page routes behind the route guard.

use crate::common::{body_json, body_text, location, session_cookies, TestHarness};
use gatehouse_core::UserRole;
use http::StatusCode;

#[tokio::test]
async fn test_dashboard_requires_session() {
    let h = TestHarness::new().await;
    let resp = h.get("/dashboard", None).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&resp),
        "https://app.example.com/login?redirect=%2Fdashboard&error=authentication_required"
    );
    assert!(h.platform.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_client_cookie_turned_away_from_admin() {
    let h = TestHarness::new().await;
    let resp = h
        .get("/admin/users", Some(&session_cookies(UserRole::Client)))
        .await;
    assert_eq!(
        location(&resp),
        "https://app.example.com/dashboard?error=admin_access_denied"
    );
}

#[tokio::test]
async fn test_forged_admin_cookie_fails_database_check() {
    let h = TestHarness::new().await;
    h.mount_account("u1").await;
    h.mount_role("u1", UserRole::Client).await;

    let resp = h
        .get("/admin", Some(&session_cookies(UserRole::Admin)))
        .await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/dashboard?error=admin_access_denied");
}

#[tokio::test]
async fn test_verified_admin_sees_admin_section() {
    let h = TestHarness::new().await;
    h.mount_account("u1").await;
    h.mount_role("u1", UserRole::Admin).await;

    let resp = h
        .get("/admin/users", Some(&session_cookies(UserRole::Admin)))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-frame-options"], "DENY");
    let body = body_json(resp).await;
    assert_eq!(body["page"], "admin/users");
    assert_eq!(body["title"], "Admin Dashboard");
    assert_eq!(body["user"]["$id"], "u1");
}

#[tokio::test]
async fn test_unknown_dashboard_section_is_not_found() {
    let h = TestHarness::new().await;
    let resp = h
        .get("/dashboard/nowhere", Some(&session_cookies(UserRole::Client)))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_shows_admin_denied_message() {
    let h = TestHarness::new().await;
    h.mount_account("u1").await;
    let resp = h
        .get(
            "/dashboard?error=admin_access_denied",
            Some(&session_cookies(UserRole::Client)),
        )
        .await;
    let body = body_json(resp).await;
    assert_eq!(body["page"], "dashboard");
    assert_eq!(
        body["message"],
        "You do not have permission to access the admin area."
    );
    assert_eq!(body["user"]["email"], "alice@example.com");
}

#[tokio::test]
async fn test_logged_in_user_bounced_from_signup() {
    let h = TestHarness::new().await;
    let resp = h
        .get("/signup", Some(&session_cookies(UserRole::Admin)))
        .await;
    assert_eq!(location(&resp), "https://app.example.com/admin");
}

#[tokio::test]
async fn test_fail_page_message() {
    let h = TestHarness::new().await;
    let resp = h.get("/fail?error=oauth_missing_params", None).await;
    let body = body_json(resp).await;
    assert_eq!(body["title"], "Authentication Failed");
    assert_eq!(body["message"], "Missing authentication parameters.");
    assert_eq!(body["next"], "/login");
}

#[tokio::test]
async fn test_verify_without_params_goes_to_fail() {
    let h = TestHarness::new().await;
    let resp = h.get("/verify", None).await;
    assert_eq!(location(&resp), "/fail?error=oauth_missing_params");
}

#[tokio::test]
async fn test_login_page_keeps_local_redirect_only() {
    let h = TestHarness::new().await;
    let resp = h
        .get(
            "/login?redirect=%2Fdashboard%2Fsettings&error=authentication_required",
            None,
        )
        .await;
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Please log in to continue.");
    assert_eq!(body["next"], "/dashboard/settings");

    let resp = h
        .get("/login?redirect=https%3A%2F%2Fevil.example.com", None)
        .await;
    let body = body_json(resp).await;
    assert!(body.get("next").is_none());

    let resp = h.get("/login?redirect=%2F%2Fevil.example.com", None).await;
    let body = body_json(resp).await;
    assert!(body.get("next").is_none());

    let resp = h.get("/login?redirect=%2F", None).await;
    let body = body_json(resp).await;
    assert_eq!(body["next"], "/");
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn test_robots_txt() {
    let h = TestHarness::new().await;
    let resp = h.get("/robots.txt", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("x-frame-options").is_none());
    let text = body_text(resp).await;
    assert!(text.contains("Disallow: /admin/**"));
    assert!(text.contains("Sitemap: https://app.example.com/sitemap.xml"));
}

#[tokio::test]
async fn test_sitemap_lists_landing_page_with_lastmod() {
    let h = TestHarness::new().await;
    let resp = h.get("/sitemap.xml", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "application/xml");
    let text = body_text(resp).await;
    assert!(text.contains("<loc>https://app.example.com/</loc>"));
    let lastmod = text
        .split("<lastmod>")
        .nth(1)
        .and_then(|rest| rest.split("</lastmod>").next())
        .unwrap();
    assert!(chrono::NaiveDate::parse_from_str(lastmod, "%Y-%m-%d").is_ok());
}

#[tokio::test]
async fn test_web_app_manifest() {
    let h = TestHarness::new().await;
    let resp = h.get("/manifest.webmanifest", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()["content-type"],
        "application/manifest+json"
    );
    let body = body_json(resp).await;
    assert_eq!(body["start_url"], "/");
    assert_eq!(body["display"], "standalone");
    assert_eq!(body["theme_color"], "#3b82f6");
    assert_eq!(body["icons"][0]["src"], "/favicon.ico");
    assert_eq!(body["icons"][0]["type"], "image/x-icon");
    assert!(h.platform.received_requests().await.unwrap().is_empty());
}
