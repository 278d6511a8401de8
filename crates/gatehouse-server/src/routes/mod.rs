//! Route table.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::AppState;

pub mod auth;
pub mod oauth;
pub mod pages;
pub mod seo;
pub mod sessions;
pub mod storage;
pub mod users;

/// All routes, without state or guard.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth::router().merge(sessions::router()))
        .route("/api/users", get(users::list))
        .route("/api/storage/files", post(storage::upload))
        .route("/api/storage/files/{id}", delete(storage::remove))
        .route("/api/storage/files/{id}/view", get(storage::view))
        .route("/api/storage/files/{id}/download", get(storage::download))
        .route("/oauth", get(oauth::callback))
        .route("/robots.txt", get(seo::robots))
        .route("/sitemap.xml", get(seo::sitemap))
        .route("/manifest.webmanifest", get(seo::manifest))
        .merge(pages::router())
}
