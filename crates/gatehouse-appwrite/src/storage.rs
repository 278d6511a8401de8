//! Storage service: bucket files.

use gatehouse_core::Result;
use reqwest::multipart::{Form, Part};

use crate::{AppwriteClient, FileObject};

/// Raw file bytes plus the content type the platform reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileContent {
    /// File bytes.
    pub bytes: Vec<u8>,
    /// `Content-Type` of the reply, if any.
    pub mime_type: Option<String>,
}

/// File endpoints of a storage bucket.
#[derive(Clone, Copy, Debug)]
pub struct Storage<'a> {
    client: &'a AppwriteClient,
}

impl<'a> Storage<'a> {
    pub(crate) fn new(client: &'a AppwriteClient) -> Self {
        Self { client }
    }

    /// Upload `content` as `file_name` under id `file_id`.
    pub async fn create_file(
        &self,
        bucket_id: &str,
        file_id: &str,
        file_name: &str,
        content: &[u8],
    ) -> Result<FileObject> {
        let url = self.client.url(&["storage", "buckets", bucket_id, "files"])?;
        self.client
            .send_json("storage.createFile", |http| {
                let part = Part::bytes(content.to_vec()).file_name(file_name.to_string());
                let form = Form::new().text("fileId", file_id.to_string()).part("file", part);
                http.post(url.clone()).multipart(form)
            })
            .await
    }

    /// Delete a file.
    pub async fn delete_file(&self, bucket_id: &str, file_id: &str) -> Result<()> {
        let url = self
            .client
            .url(&["storage", "buckets", bucket_id, "files", file_id])?;
        self.client
            .send("storage.deleteFile", |http| http.delete(url.clone()))
            .await?;
        Ok(())
    }

    /// File bytes for inline display.
    pub async fn get_file_view(&self, bucket_id: &str, file_id: &str) -> Result<FileContent> {
        self.fetch("storage.getFileView", bucket_id, file_id, "view")
            .await
    }

    /// File bytes for download.
    pub async fn get_file_download(&self, bucket_id: &str, file_id: &str) -> Result<FileContent> {
        self.fetch("storage.getFileDownload", bucket_id, file_id, "download")
            .await
    }

    async fn fetch(
        &self,
        operation: &str,
        bucket_id: &str,
        file_id: &str,
        kind: &str,
    ) -> Result<FileContent> {
        let url = self
            .client
            .url(&["storage", "buckets", bucket_id, "files", file_id, kind])?;
        let response = self
            .client
            .send(operation, |http| http.get(url.clone()))
            .await?;
        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();
        Ok(FileContent { bytes, mime_type })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::client::tests::client;
    use crate::Credentials;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_file_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/storage/buckets/bucket/files"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "$id": "f1", "bucketId": "bucket", "name": "a.txt",
                "mimeType": "text/plain", "sizeOriginal": 5
            })))
            .expect(1)
            .mount(&server)
            .await;

        let c = client(&server, Credentials::Session("s".into()));
        let file = c
            .storage()
            .create_file("bucket", "f1", "a.txt", b"hello")
            .await
            .unwrap();
        assert_eq!(file.id, "f1");
        assert_eq!(file.size_original, 5);

        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0]
            .headers
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("multipart/form-data"));
    }

    #[tokio::test]
    async fn test_get_file_view_returns_bytes_and_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/storage/buckets/bucket/files/f1/view"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(b"view".to_vec(), "image/png"),
            )
            .mount(&server)
            .await;

        let c = client(&server, Credentials::Session("s".into()));
        let content = c.storage().get_file_view("bucket", "f1").await.unwrap();
        assert_eq!(content.bytes, b"view");
        assert_eq!(content.mime_type.as_deref(), Some("image/png"));
    }
}
