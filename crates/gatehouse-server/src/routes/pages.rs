//! Page routes.
//!
//! Each page answers with a JSON descriptor naming the page, its title and
//! whatever the page needs to render: the current user, a status message,
//! or the next location for pages that forward on their own.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::cookie::CookieJar;
use gatehouse_appwrite::User;
use gatehouse_auth::{actions, role};
use gatehouse_core::UserRole;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::AppState;

const DASHBOARD_SECTIONS: &[&str] = &["account-security", "link-account", "settings"];
const ADMIN_SECTIONS: &[&str] = &["analytics", "database", "logs", "settings", "users"];

/// Page descriptor.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    /// Page identifier, e.g. `dashboard/settings`.
    pub page: String,
    /// Human-readable title.
    pub title: &'static str,
    /// Status or error text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Where the page sends the browser next.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// The logged-in user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl PageView {
    fn new(page: impl Into<String>, title: &'static str) -> Self {
        Self {
            page: page.into(),
            title,
            ..Self::default()
        }
    }

    fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }
}

/// Query parameters pages read.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    /// Error code set by a redirect.
    pub error: Option<String>,
    /// Page to return to after login.
    pub redirect: Option<String>,
    /// User id from an emailed link.
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    /// Secret from an emailed link.
    pub secret: Option<String>,
}

impl PageParams {
    fn has_link_params(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.user_id) && present(&self.secret)
    }
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/login", get(login))
        .route("/signup", get(signup))
        .route("/success", get(success))
        .route("/fail", get(fail))
        .route("/verify", get(verify))
        .route("/terms", get(terms))
        .route("/reset-password", get(reset_password))
        .route("/dashboard", get(dashboard_home))
        .route("/dashboard/{*section}", get(dashboard_section))
        .route("/admin", get(admin_home))
        .route("/admin/{*section}", get(admin_section))
}

async fn home() -> Json<PageView> {
    Json(PageView::new("home", "Gatehouse"))
}

fn login_message(code: &str) -> &'static str {
    match code {
        "authentication_required" => "Please log in to continue.",
        _ => "Something went wrong. Please log in again.",
    }
}

async fn login(Query(params): Query<PageParams>) -> Json<PageView> {
    let mut view = PageView::new("login", "Log in");
    if let Some(code) = params.error.as_deref() {
        view = view.message(login_message(code));
    }
    let local_redirect = params
        .redirect
        .filter(|r| r.starts_with('/') && !r.starts_with("//"));
    if let Some(redirect) = local_redirect {
        view = view.next(redirect);
    }
    Json(view)
}

async fn signup() -> Json<PageView> {
    Json(PageView::new("signup", "Create an account"))
}

async fn success() -> Json<PageView> {
    Json(
        PageView::new("success", "Authentication Successful!")
            .message("Your account has been authenticated successfully.")
            .next("/dashboard"),
    )
}

async fn fail(Query(params): Query<PageParams>) -> Json<PageView> {
    Json(
        PageView::new("fail", "Authentication Failed")
            .message(actions::fail_message(params.error.as_deref()))
            .next("/login"),
    )
}

async fn verify(Query(params): Query<PageParams>) -> Response {
    if !params.has_link_params() {
        return Redirect::temporary(&actions::fail_path("oauth_missing_params")).into_response();
    }
    Json(PageView::new("verify", "Verifying Your Session").next("/dashboard")).into_response()
}

async fn terms() -> Json<PageView> {
    Json(PageView::new("terms", "Terms of Service"))
}

async fn reset_password(Query(params): Query<PageParams>) -> Json<PageView> {
    if !params.has_link_params() {
        return Json(
            PageView::new("reset-password", "Invalid Link")
                .message("This password reset link is invalid or has expired."),
        );
    }
    Json(PageView::new("reset-password", "Set New Password"))
}

fn not_found(page: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(PageView::new(page, "Not Found").message("This page does not exist.")),
    )
        .into_response()
}

async fn client_page(state: &AppState, jar: &CookieJar, page: String, title: &'static str) -> Response {
    let current = actions::get_current_user(&state.backend, jar).await;
    let mut view = PageView::new(page, title);
    view.user = current.user;
    Json(view).into_response()
}

async fn dashboard_home(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<PageParams>,
) -> Response {
    let current = actions::get_current_user(&state.backend, &jar).await;
    let mut view = PageView::new("dashboard", "Dashboard");
    view.user = current.user;
    if params.error.as_deref() == Some("admin_access_denied") {
        view = view.message("You do not have permission to access the admin area.");
    }
    Json(view).into_response()
}

async fn dashboard_section(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(section): Path<String>,
) -> Response {
    let page = format!("dashboard/{section}");
    if !DASHBOARD_SECTIONS.contains(&section.as_str()) {
        return not_found(&page);
    }
    client_page(&state, &jar, page, "Dashboard").await
}

async fn admin_page(state: &AppState, jar: &CookieJar, page: String) -> Response {
    let check = role::verify_user_role(&state.backend, jar, UserRole::Admin).await;
    if !check.valid {
        tracing::error!(
            page = %page,
            reason = check.message.as_deref().unwrap_or_default(),
            "security: unauthorized admin access attempt"
        );
        return Redirect::temporary("/dashboard?error=admin_access_denied").into_response();
    }
    client_page(state, jar, page, "Admin Dashboard").await
}

async fn admin_home(State(state): State<AppState>, jar: CookieJar) -> Response {
    admin_page(&state, &jar, "admin".to_string()).await
}

async fn admin_section(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(section): Path<String>,
) -> Response {
    let page = format!("admin/{section}");
    if !ADMIN_SECTIONS.contains(&section.as_str()) {
        return not_found(&page);
    }
    admin_page(&state, &jar, page).await
}
