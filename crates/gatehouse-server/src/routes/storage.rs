//! File upload, deletion, view and download.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use gatehouse_auth::storage::{self, FileResult};

use crate::{ApiResult, AppState};

/// `POST /api/storage/files`; multipart with a `file` field.
///
/// A body without that field uploads nothing and answers `{success: false}`.
pub async fn upload(
    State(state): State<AppState>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> ApiResult<Json<FileResult>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field.bytes().await?;
        return Ok(Json(
            storage::upload_file(&state.backend, &jar, &file_name, &bytes).await,
        ));
    }
    Ok(Json(
        storage::upload_file(&state.backend, &jar, "upload", &[]).await,
    ))
}

/// `DELETE /api/storage/files/{id}`.
pub async fn remove(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Json<FileResult> {
    Json(storage::delete_file(&state.backend, &jar, &id).await)
}

/// `GET /api/storage/files/{id}/view`.
pub async fn view(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Json<FileResult> {
    Json(storage::get_file_view(&state.backend, &jar, &id).await)
}

/// `GET /api/storage/files/{id}/download`.
pub async fn download(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Json<FileResult> {
    Json(storage::get_file_download(&state.backend, &jar, &id).await)
}
