//! OAuth callback.

use axum::extract::{Query, State};
use axum::response::Redirect;
use axum_extra::extract::cookie::CookieJar;
use gatehouse_auth::actions;
use serde::Deserialize;

use crate::AppState;

/// Query parameters the platform appends on success.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    /// Authenticated user.
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    /// Session secret.
    pub secret: Option<String>,
}

/// `GET /oauth`: verify the session, sync the user record, set cookies, and
/// redirect to `/success` or `/fail?error=<code>`.
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> (CookieJar, Redirect) {
    let (jar, location) = actions::handle_oauth_callback(
        &state.backend,
        jar,
        params.user_id.as_deref(),
        params.secret.as_deref(),
    )
    .await;
    (jar, Redirect::temporary(&location))
}
