//! Admin user listing.

use axum::extract::{Query, State};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use gatehouse_auth::role::require_admin;
use gatehouse_auth::users::{self, UserListing, DEFAULT_PAGE_SIZE};
use serde::Deserialize;

use crate::{ApiResult, AppState};

const MAX_PAGE_SIZE: u64 = 100;

/// Paging parameters.
#[derive(Debug, Default, Deserialize)]
pub struct Page {
    /// Page size, capped at 100.
    pub limit: Option<u64>,
    /// Rows to skip.
    pub offset: Option<u64>,
}

/// `GET /api/users`; verified admins only.
pub async fn list(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(page): Query<Page>,
) -> ApiResult<Json<UserListing>> {
    require_admin(&state.backend, &jar).await?;
    let limit = page.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = page.offset.unwrap_or(0);
    Ok(Json(
        users::list_all_users(&state.backend, &jar, limit, offset).await,
    ))
}
