//! Application configuration.
//!
//! Settings come from three layers, later layers winning:
//!
//! 1. built-in defaults,
//! 2. an optional TOML file,
//! 3. environment variables (`APPWRITE_ENDPOINT`, `APP_URL`, ...).
//!
//! [`Config::load`] applies all three and validates the result.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;
use crate::{Error, Result};

/// Runtime environment. Controls the `Secure` cookie flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development over plain HTTP.
    Development,
    /// Test runs.
    Test,
    /// Production.
    #[default]
    Production,
}

impl Environment {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "test" => Some(Self::Test),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Public application settings.
    pub app: AppSettings,
    /// Platform project settings.
    pub appwrite: AppwriteSettings,
    /// Cookie and session lifecycle settings.
    pub session: SessionSettings,
    /// Retry and timeout settings for platform calls.
    pub network: NetworkSettings,
}

/// Public application settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Public base URL of the application, without trailing slash.
    pub url: String,
    /// Runtime environment.
    pub environment: Environment,
    /// Socket address the server binds to.
    pub bind_addr: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000".to_string(),
            environment: Environment::default(),
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl AppSettings {
    /// Landing page of the password recovery email.
    pub fn reset_password_url(&self) -> String {
        format!("{}/reset-password", self.url)
    }
}

/// Platform project settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppwriteSettings {
    /// API endpoint, e.g. `https://cloud.appwrite.io/v1`.
    pub endpoint: String,
    /// Project identifier.
    pub project_id: String,
    /// Server API key used for administrative calls.
    pub api_key: String,
    /// Database holding the users table.
    pub database_id: String,
    /// Users table identifier.
    pub users_table_id: String,
    /// Storage bucket for uploads.
    pub bucket_id: String,
}

/// Cookie and session lifecycle settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Name of the cookie holding the session secret.
    pub session_cookie: String,
    /// Name of the cookie caching the user role.
    pub role_cookie: String,
    /// Cookie lifetime in seconds.
    pub max_age_secs: i64,
    /// Sessions expiring sooner than this are extended.
    pub refresh_threshold_secs: i64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            session_cookie: "user_session".to_string(),
            role_cookie: "user_role".to_string(),
            max_age_secs: 60 * 60 * 24 * 30,
            refresh_threshold_secs: 60 * 60 * 24,
        }
    }
}

/// Retry and timeout settings for platform calls.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Retries after the first attempt.
    pub max_retries: usize,
    /// Delay before the first retry; doubles on each retry.
    pub retry_delay_ms: u64,
    /// Per-attempt timeout.
    pub request_timeout_ms: u64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 2000,
            request_timeout_ms: 30_000,
        }
    }
}

impl NetworkSettings {
    /// The retry policy described by these settings.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_delay: Duration::from_millis(self.retry_delay_ms),
            timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}

impl Config {
    /// Load defaults, then the optional TOML file, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Override settings from environment-style key lookups.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |target: &mut String, key: &str| {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *target = value;
            }
        };

        set(&mut self.app.url, "APP_URL");
        set(&mut self.app.bind_addr, "BIND_ADDR");
        set(&mut self.appwrite.endpoint, "APPWRITE_ENDPOINT");
        set(&mut self.appwrite.project_id, "APPWRITE_PROJECT_ID");
        set(&mut self.appwrite.api_key, "APPWRITE_API_KEY");
        set(&mut self.appwrite.database_id, "APPWRITE_DATABASE_ID");
        set(&mut self.appwrite.users_table_id, "APPWRITE_USERS_TABLE_ID");
        set(&mut self.appwrite.bucket_id, "APPWRITE_BUCKET_ID");

        if let Some(env) = lookup("APP_ENV").and_then(|v| Environment::parse(&v)) {
            self.app.environment = env;
        }

        self.app.url = self.app.url.trim_end_matches('/').to_string();
        self.appwrite.endpoint = self.appwrite.endpoint.trim_end_matches('/').to_string();
    }

    /// Check that everything needed to reach the platform is present.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("appwrite.endpoint", &self.appwrite.endpoint),
            ("appwrite.project_id", &self.appwrite.project_id),
            ("appwrite.api_key", &self.appwrite.api_key),
            ("appwrite.database_id", &self.appwrite.database_id),
            ("appwrite.users_table_id", &self.appwrite.users_table_id),
        ];
        for (key, value) in required {
            if value.is_empty() {
                return Err(Error::config(format!("{key} must be set")));
            }
        }
        if self.session.refresh_threshold_secs < 0 || self.session.max_age_secs <= 0 {
            return Err(Error::config("session durations must be positive"));
        }
        Ok(())
    }

    /// Whether cookies should carry the `Secure` flag.
    pub fn secure_cookies(&self) -> bool {
        self.app.environment != Environment::Development
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}
