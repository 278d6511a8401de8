//! File operations on the upload bucket, performed with the caller's session
//! so bucket permissions apply to the user rather than the server.

use axum_extra::extract::cookie::CookieJar;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use gatehouse_appwrite::{unique_id, FileObject};
use gatehouse_core::Result;
use serde::Serialize;

use crate::Backend;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Outcome of a storage action.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
    /// Whether the action succeeded.
    pub success: bool,
    /// Uploaded file metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileObject>,
    /// File bytes, base64 encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
    /// Content type of `base64`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileResult {
    fn from_result(result: Result<Self>, operation: &str) -> Self {
        result.unwrap_or_else(|e| {
            tracing::error!(operation, error = %e, "storage action failed");
            Self {
                error: Some(e.to_string()),
                ..Self::default()
            }
        })
    }
}

/// Upload `content` under a fresh file id.
///
/// Empty content is reported as `No file uploaded` without calling the platform.
pub async fn upload_file(
    backend: &Backend,
    jar: &CookieJar,
    file_name: &str,
    content: &[u8],
) -> FileResult {
    FileResult::from_result(try_upload(backend, jar, file_name, content).await, "upload")
}

async fn try_upload(
    backend: &Backend,
    jar: &CookieJar,
    file_name: &str,
    content: &[u8],
) -> Result<FileResult> {
    if content.is_empty() {
        tracing::warn!(file_name, "upload without file content");
        return Ok(FileResult {
            error: Some("No file uploaded".to_string()),
            ..FileResult::default()
        });
    }
    let file = backend
        .client_session(jar)?
        .storage()
        .create_file(backend.bucket_id(), &unique_id(), file_name, content)
        .await?;
    tracing::info!(file_id = %file.id, size = file.size_original, "file uploaded");
    Ok(FileResult {
        success: true,
        file: Some(file),
        ..FileResult::default()
    })
}

/// Delete a file.
pub async fn delete_file(backend: &Backend, jar: &CookieJar, file_id: &str) -> FileResult {
    FileResult::from_result(try_delete(backend, jar, file_id).await, "delete")
}

async fn try_delete(backend: &Backend, jar: &CookieJar, file_id: &str) -> Result<FileResult> {
    backend
        .client_session(jar)?
        .storage()
        .delete_file(backend.bucket_id(), file_id)
        .await?;
    Ok(FileResult {
        success: true,
        ..FileResult::default()
    })
}

/// File bytes for inline display, with their content type.
pub async fn get_file_view(backend: &Backend, jar: &CookieJar, file_id: &str) -> FileResult {
    FileResult::from_result(try_view(backend, jar, file_id).await, "view")
}

async fn try_view(backend: &Backend, jar: &CookieJar, file_id: &str) -> Result<FileResult> {
    let content = backend
        .client_session(jar)?
        .storage()
        .get_file_view(backend.bucket_id(), file_id)
        .await?;
    Ok(FileResult {
        success: true,
        base64: Some(STANDARD.encode(&content.bytes)),
        mime_type: Some(
            content
                .mime_type
                .unwrap_or_else(|| FALLBACK_MIME.to_string()),
        ),
        ..FileResult::default()
    })
}

/// File bytes for download.
pub async fn get_file_download(backend: &Backend, jar: &CookieJar, file_id: &str) -> FileResult {
    FileResult::from_result(try_download(backend, jar, file_id).await, "download")
}

async fn try_download(backend: &Backend, jar: &CookieJar, file_id: &str) -> Result<FileResult> {
    let content = backend
        .client_session(jar)?
        .storage()
        .get_file_download(backend.bucket_id(), file_id)
        .await?;
    Ok(FileResult {
        success: true,
        base64: Some(STANDARD.encode(&content.bytes)),
        ..FileResult::default()
    })
}
