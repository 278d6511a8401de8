//! Current user, session lifecycle, and management of sessions and identities.

use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::CookieJar;
use gatehouse_auth::actions::{self, CurrentUser, IdentityListing, SessionListing};
use gatehouse_auth::session::{self, Extended, SessionCheck, SessionStatus};
use gatehouse_auth::ActionResponse;

use crate::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/session", get(status))
        .route("/session/refresh", post(refresh))
        .route("/session/check", post(check))
        .route("/sessions", get(list_sessions))
        .route("/sessions/{id}", delete(delete_session))
        .route("/identities", get(list_identities))
        .route("/identities/{id}", delete(unlink_identity))
}

async fn me(State(state): State<AppState>, jar: CookieJar) -> Json<CurrentUser> {
    Json(actions::get_current_user(&state.backend, &jar).await)
}

async fn status(State(state): State<AppState>, jar: CookieJar) -> Json<SessionStatus> {
    Json(session::get_session_status(&state.backend, &jar).await)
}

async fn refresh(State(state): State<AppState>, jar: CookieJar) -> Json<ActionResponse<Extended>> {
    Json(session::refresh_current_session(&state.backend, &jar).await)
}

async fn check(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<SessionCheck>) {
    let (jar, check) = session::check_and_manage_session(&state.backend, jar).await;
    (jar, Json(check))
}

async fn list_sessions(State(state): State<AppState>, jar: CookieJar) -> Json<SessionListing> {
    Json(actions::list_active_sessions(&state.backend, &jar).await)
}

async fn delete_session(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> (CookieJar, Json<ActionResponse>) {
    let (jar, response) = actions::delete_session_by_id(&state.backend, jar, &id).await;
    (jar, Json(response))
}

async fn list_identities(State(state): State<AppState>, jar: CookieJar) -> Json<IdentityListing> {
    Json(actions::get_linked_identities(&state.backend, &jar).await)
}

async fn unlink_identity(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Json<ActionResponse> {
    Json(actions::unlink_identity(&state.backend, &jar, &id).await)
}
