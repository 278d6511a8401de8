//! Project-scoped HTTP client.

use std::fmt;

use gatehouse_core::{with_retry_and_timeout, AppwriteSettings, Error, Result, RetryPolicy};
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{Account, Storage, Tables};

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";
const SESSION_HEADER: &str = "X-Appwrite-Session";

/// How a client authenticates against the platform.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Server API key. Administrative access.
    Admin(String),
    /// Session secret of a logged-in user. User-scoped access.
    Session(String),
    /// Project only, as an anonymous browser would call.
    Public,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin(_) => f.write_str("Admin(<redacted>)"),
            Self::Session(_) => f.write_str("Session(<redacted>)"),
            Self::Public => f.write_str("Public"),
        }
    }
}

/// Error body returned by the platform on non-2xx replies.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(rename = "type", default)]
    kind: String,
}

/// Client for one platform project with one set of credentials.
///
/// Cheap to clone; the underlying `reqwest::Client` pools connections.
#[derive(Clone, Debug)]
pub struct AppwriteClient {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    credentials: Credentials,
    retry: RetryPolicy,
}

impl AppwriteClient {
    /// Create a client for the project described by `settings`.
    pub fn new(
        http: reqwest::Client,
        settings: &AppwriteSettings,
        credentials: Credentials,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            http,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            project_id: settings.project_id.clone(),
            credentials,
            retry,
        }
    }

    /// API endpoint, without trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Project identifier.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Credentials this client sends.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Account service.
    pub fn account(&self) -> Account<'_> {
        Account::new(self)
    }

    /// Tables service.
    pub fn tables(&self) -> Tables<'_> {
        Tables::new(self)
    }

    /// Storage service.
    pub fn storage(&self) -> Storage<'_> {
        Storage::new(self)
    }

    /// Build an endpoint URL from path segments. Segments are percent-encoded.
    pub fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| Error::config(format!("invalid endpoint '{}': {e}", self.endpoint)))?;
        url.path_segments_mut()
            .map_err(|_| Error::config(format!("endpoint '{}' cannot be a base", self.endpoint)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(PROJECT_HEADER, &self.project_id);
        match &self.credentials {
            Credentials::Admin(key) => builder.header(KEY_HEADER, key),
            Credentials::Session(secret) => builder.header(SESSION_HEADER, secret),
            Credentials::Public => builder,
        }
    }

    /// Send a request built by `build`, retrying transient failures.
    ///
    /// `build` runs once per attempt so multipart bodies can be rebuilt.
    pub(crate) async fn send<B>(&self, operation: &str, build: B) -> Result<Response>
    where
        B: Fn(&reqwest::Client) -> RequestBuilder,
    {
        with_retry_and_timeout(&self.retry, operation, || {
            let request = self.authorize(build(&self.http));
            async move {
                let response = request.send().await?;
                ensure_success(response).await
            }
        })
        .await
    }

    /// Send and decode a JSON reply.
    pub(crate) async fn send_json<T, B>(&self, operation: &str, build: B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Fn(&reqwest::Client) -> RequestBuilder,
    {
        let response = self.send(operation, build).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let err = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => Error::api(status.as_u16(), parsed.kind, parsed.message),
        Err(_) if body.is_empty() => Error::api(status.as_u16(), "unknown", status.to_string()),
        Err(_) => Error::api(status.as_u16(), "unknown", body),
    };
    tracing::debug!(status = status.as_u16(), error = %err, "platform rejected request");
    Err(err)
}

/// Generate a unique identifier acceptable as a platform document id.
pub fn unique_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
