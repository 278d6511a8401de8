//! Session expiry checks and automatic extension.
//!
//! A session that is about to expire (less than the configured refresh
//! threshold left) is extended on the platform; an expired one has its
//! cookies cleared.

use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use gatehouse_appwrite::{Session, CURRENT_SESSION};
use gatehouse_core::{Error, Result};
use serde::Serialize;

use crate::{ActionResponse, Backend};

/// Expiry of the calling session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExpiry {
    /// Expiry timestamp as reported by the platform.
    pub expire: String,
    /// Whether the expiry is in the past.
    pub is_expired: bool,
    /// Milliseconds until expiry; negative once expired.
    pub time_remaining: i64,
}

impl SessionExpiry {
    /// Compute the expiry of `expire` relative to `now`.
    pub fn at(expire: &str, now: DateTime<Utc>) -> Result<Self> {
        let expires_at = DateTime::parse_from_rfc3339(expire)
            .map_err(|e| Error::validation_field("expire", format!("invalid timestamp: {e}")))?
            .with_timezone(&Utc);
        let time_remaining = (expires_at - now).num_milliseconds();
        Ok(Self {
            expire: expire.to_string(),
            is_expired: time_remaining <= 0,
            time_remaining,
        })
    }
}

/// Result of [`check_and_manage_session`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCheck {
    /// Whether the session can still be used.
    pub valid: bool,
    /// Whether the session is gone.
    pub expired: bool,
    /// Whether the session was extended by this check.
    pub refreshed: bool,
    /// Outcome description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Non-fatal problem, e.g. a failed extension.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Expiry timestamp after the check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
    /// Milliseconds until expiry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_remaining: Option<i64>,
}

impl SessionCheck {
    fn gone(message: &str) -> Self {
        Self {
            expired: true,
            message: Some(message.to_string()),
            ..Self::default()
        }
    }
}

/// Remaining lifetime split into units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExpiresIn {
    /// Whole hours.
    pub hours: i64,
    /// Minutes past the hours.
    pub minutes: i64,
    /// Seconds past the minutes.
    pub seconds: i64,
}

impl ExpiresIn {
    /// Split a duration in milliseconds.
    pub fn from_millis(millis: i64) -> Self {
        let secs = millis.max(0) / 1000;
        Self {
            hours: secs / 3600,
            minutes: (secs % 3600) / 60,
            seconds: secs % 60,
        }
    }
}

/// Session state for client-side countdowns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    /// Whether the session is usable.
    pub active: bool,
    /// Reason when inactive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Expiry timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
    /// Milliseconds until expiry, never negative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_remaining: Option<i64>,
    /// Remaining lifetime in hours, minutes and seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<ExpiresIn>,
    /// Whether the session is within the refresh threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_refresh: Option<bool>,
}

/// Payload of a successful extension.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Extended {
    /// New expiry timestamp.
    pub expire: String,
}

fn threshold_millis(backend: &Backend) -> i64 {
    backend.config().session.refresh_threshold_secs.saturating_mul(1000)
}

/// Whether the session cookie belongs to a live session.
pub async fn validate_session(backend: &Backend, jar: &CookieJar) -> bool {
    let Ok(client) = backend.client_session(jar) else {
        return false;
    };
    match client.account().get().await {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!(error = %e, "session validation failed");
            false
        }
    }
}

/// Expiry of the calling session.
pub async fn get_session_expiry(backend: &Backend, jar: &CookieJar) -> Result<SessionExpiry> {
    let session = backend
        .client_session(jar)?
        .account()
        .get_session(CURRENT_SESSION)
        .await?;
    SessionExpiry::at(&session.expire, Utc::now())
}

/// Push the calling session's expiry forward.
pub async fn extend_session(backend: &Backend, jar: &CookieJar) -> Result<Session> {
    let session = backend
        .client_session(jar)?
        .account()
        .update_session(CURRENT_SESSION)
        .await?;
    tracing::info!(user_id = %session.user_id, expire = %session.expire, "session extended");
    Ok(session)
}

/// Validate the session, clear cookies when it expired, extend it when it is close to expiry.
pub async fn check_and_manage_session(
    backend: &Backend,
    jar: CookieJar,
) -> (CookieJar, SessionCheck) {
    if !validate_session(backend, &jar).await {
        return (jar, SessionCheck::gone("Session is invalid or expired"));
    }

    let expiry = match get_session_expiry(backend, &jar).await {
        Ok(expiry) => expiry,
        Err(e) => {
            tracing::warn!(error = %e, "could not read session expiry");
            return (jar, SessionCheck::gone("Could not retrieve session expiry"));
        }
    };

    if expiry.is_expired {
        let jar = backend.cookies().clear(jar);
        return (jar, SessionCheck::gone("Session has expired"));
    }

    if expiry.time_remaining < threshold_millis(backend) {
        let check = match extend_session(backend, &jar).await {
            Ok(session) => SessionCheck {
                valid: true,
                refreshed: true,
                message: Some("Session refreshed successfully".to_string()),
                expiry: Some(session.expire),
                ..SessionCheck::default()
            },
            Err(e) => {
                tracing::warn!(error = %e, "session refresh failed");
                SessionCheck {
                    valid: true,
                    warning: Some("Session refresh failed".to_string()),
                    expiry: Some(expiry.expire),
                    time_remaining: Some(expiry.time_remaining),
                    ..SessionCheck::default()
                }
            }
        };
        return (jar, check);
    }

    let check = SessionCheck {
        valid: true,
        expiry: Some(expiry.expire),
        time_remaining: Some(expiry.time_remaining),
        ..SessionCheck::default()
    };
    (jar, check)
}

/// Countdown information for the calling session.
pub async fn get_session_status(backend: &Backend, jar: &CookieJar) -> SessionStatus {
    match get_session_expiry(backend, jar).await {
        Ok(expiry) => status_from(&expiry, threshold_millis(backend)),
        Err(_) => SessionStatus {
            message: Some("No active session".to_string()),
            ..SessionStatus::default()
        },
    }
}

fn status_from(expiry: &SessionExpiry, threshold_millis: i64) -> SessionStatus {
    let remaining = expiry.time_remaining.max(0);
    SessionStatus {
        active: !expiry.is_expired,
        message: None,
        expiry: Some(expiry.expire.clone()),
        time_remaining: Some(remaining),
        expires_in: Some(ExpiresIn::from_millis(remaining)),
        needs_refresh: Some(expiry.time_remaining < threshold_millis),
    }
}

/// Extend the calling session on demand.
pub async fn refresh_current_session(backend: &Backend, jar: &CookieJar) -> ActionResponse<Extended> {
    match extend_session(backend, jar).await {
        Ok(session) => ActionResponse::ok(
            "Session extended successfully",
            Extended {
                expire: session.expire,
            },
        ),
        Err(e) => ActionResponse::failed(e.to_string()),
    }
}
