//! Session and role primitives for Gatehouse.
//!
//! Provides:
//! - [`Backend`]: configuration plus platform client factory (admin / session / public)
//! - [`CookiePolicy`]: session and role cookies
//! - [`actions`]: register, login, OAuth, logout, recovery, session and identity management
//! - [`role`]: cookie-vs-database role verification
//! - [`session`]: expiry checks and automatic extension
//! - [`users`]: user records and roles in the users table
//! - [`storage`]: session-scoped file operations
//! - [`RouteGuardLayer`] / [`RouteGuard`]: Tower middleware gating protected routes

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod actions;
mod backend;
mod cookies;
pub mod forms;
mod guard;
pub mod role;
pub mod session;
pub mod storage;
pub mod users;

pub use backend::Backend;
pub use cookies::CookiePolicy;
pub use guard::{GuardConfig, RouteGuard, RouteGuardLayer, Verdict};

/// Generic outcome returned by actions to the UI layer.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ActionResponse<T = ()> {
    /// Whether the action succeeded.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Action-specific payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ActionResponse<T> {
    /// A successful outcome with a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// A failed outcome.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

impl ActionResponse<()> {
    /// A successful outcome without payload.
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}
