//! Error types for Gatehouse.

/// Substrings that mark an error message as a transient network failure.
const RETRYABLE_MESSAGES: &[&str] = &["fetch failed", "network error", "socket hang up", "timeout"];

/// Errors that can occur while talking to the platform or serving a request.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The platform answered with a non-success status.
    #[error("Platform error ({code}): {message}")]
    Api {
        /// HTTP status code returned by the platform
        code: u16,
        /// Platform error type, e.g. `user_unauthorized`
        kind: String,
        /// Human-readable message from the platform
        message: String,
    },

    /// The request never produced a response (DNS, connect, TLS, body).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// An operation exceeded its per-attempt timeout.
    #[error("{operation} timed out after {millis}ms")]
    Timeout {
        /// Name of the operation that timed out
        operation: String,
        /// Timeout in milliseconds
        millis: u64,
    },

    /// Input failed validation.
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// The caller has no usable session.
    #[error("{0}")]
    Unauthenticated(String),

    /// The caller is authenticated but lacks the required role.
    #[error("{0}")]
    Forbidden(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error (config files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type alias for Gatehouse operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether this error is a transient network failure worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(e) => {
                e.is_connect() || e.is_timeout() || is_network_message(&e.to_string())
            }
            Error::Timeout { .. } => true,
            Error::Api { message, .. } => is_network_message(message),
            Error::Validation { .. }
            | Error::Config { .. }
            | Error::Unauthenticated(_)
            | Error::Forbidden(_)
            | Error::Serialization(_)
            | Error::Io(_) => false,
        }
    }

    /// HTTP status code reported by the platform, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Platform error type, e.g. `user_unauthorized`, if any.
    pub fn kind(&self) -> Option<&str> {
        match self {
            Error::Api { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Creates a new platform error.
    pub fn api<K, M>(code: u16, kind: K, message: M) -> Self
    where
        K: Into<String>,
        M: Into<String>,
    {
        Error::Api {
            code,
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates the error returned when a user-scoped call has no session.
    pub fn not_logged_in() -> Self {
        Error::Unauthenticated("This action requires you to be logged in".to_string())
    }
}

fn is_network_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    RETRYABLE_MESSAGES.iter().any(|m| lower.contains(m))
}
