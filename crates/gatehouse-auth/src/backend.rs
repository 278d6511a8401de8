//! Configuration plus platform client factory.

use std::sync::Arc;

use axum_extra::extract::cookie::CookieJar;
use gatehouse_appwrite::{AppwriteClient, Credentials};
use gatehouse_core::{Config, Error, Result};

use crate::CookiePolicy;

/// Shared handle to configuration and the pooled HTTP client.
///
/// Cheap to clone (Arc internals).
#[derive(Clone, Debug)]
pub struct Backend {
    inner: Arc<BackendInner>,
}

#[derive(Debug)]
struct BackendInner {
    config: Config,
    http: reqwest::Client,
    cookies: CookiePolicy,
}

impl Backend {
    /// Create a backend with a fresh HTTP client.
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gatehouse/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http(config, http))
    }

    /// Create a backend around an existing HTTP client.
    pub fn with_http(config: Config, http: reqwest::Client) -> Self {
        let cookies = CookiePolicy::from_config(&config);
        Self {
            inner: Arc::new(BackendInner {
                config,
                http,
                cookies,
            }),
        }
    }

    /// The loaded configuration.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Cookie names and attributes.
    pub fn cookies(&self) -> &CookiePolicy {
        &self.inner.cookies
    }

    fn client(&self, credentials: Credentials) -> AppwriteClient {
        AppwriteClient::new(
            self.inner.http.clone(),
            &self.inner.config.appwrite,
            credentials,
            self.inner.config.network.retry_policy(),
        )
    }

    /// Client authenticated with the server API key.
    pub fn admin(&self) -> AppwriteClient {
        self.client(Credentials::Admin(self.inner.config.appwrite.api_key.clone()))
    }

    /// Client without credentials beyond the project id.
    pub fn public(&self) -> AppwriteClient {
        self.client(Credentials::Public)
    }

    /// Client acting as the owner of `secret`.
    pub fn session(&self, secret: impl Into<String>) -> AppwriteClient {
        self.client(Credentials::Session(secret.into()))
    }

    /// Client acting as the user whose session cookie is in `jar`.
    pub fn client_session(&self, jar: &CookieJar) -> Result<AppwriteClient> {
        self.cookies()
            .session(jar)
            .map(|secret| self.session(secret))
            .ok_or_else(Error::not_logged_in)
    }

    /// Database holding the users table.
    pub fn database_id(&self) -> &str {
        &self.inner.config.appwrite.database_id
    }

    /// Users table.
    pub fn users_table_id(&self) -> &str {
        &self.inner.config.appwrite.users_table_id
    }

    /// Upload bucket.
    pub fn bucket_id(&self) -> &str {
        &self.inner.config.appwrite.bucket_id
    }
}
