//! Registration, login, logout, OAuth start and password recovery.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use axum_extra::extract::cookie::CookieJar;
use gatehouse_auth::actions::{self, LoginData, OAuthRedirect};
use gatehouse_auth::forms::{
    ForgotPasswordForm, LoginForm, OAuthForm, RegisterForm, ResetPasswordForm,
};
use gatehouse_auth::ActionResponse;
use http::{header, HeaderMap};

use crate::{ApiResult, AppState};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/oauth", post(oauth))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}

async fn register(
    State(state): State<AppState>,
    Json(form): Json<RegisterForm>,
) -> ApiResult<Json<ActionResponse>> {
    Ok(Json(actions::register(&state.backend, &form).await?))
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(form): Json<LoginForm>,
) -> ApiResult<(CookieJar, Json<ActionResponse<LoginData>>)> {
    let (jar, response) = actions::login(&state.backend, jar, &form).await?;
    Ok((jar, Json(response)))
}

async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<ActionResponse>) {
    let (jar, response) = actions::logout(&state.backend, jar).await;
    (jar, Json(response))
}

/// The OAuth flow returns to the origin the request came from, or the
/// configured app URL when the browser sent none.
async fn oauth(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(form): Json<OAuthForm>,
) -> ApiResult<Json<ActionResponse<OAuthRedirect>>> {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && *v != "null")
        .map(str::to_string)
        .unwrap_or_else(|| state.backend.config().app.url.clone());
    Ok(Json(actions::oauth_redirect(
        &state.backend,
        form.provider,
        &origin,
    )?))
}

async fn forgot_password(
    State(state): State<AppState>,
    Json(form): Json<ForgotPasswordForm>,
) -> ApiResult<Json<ActionResponse>> {
    Ok(Json(actions::forgot_password(&state.backend, &form).await?))
}

async fn reset_password(
    State(state): State<AppState>,
    Json(form): Json<ResetPasswordForm>,
) -> ApiResult<Json<ActionResponse>> {
    Ok(Json(actions::reset_password(&state.backend, &form).await?))
}
