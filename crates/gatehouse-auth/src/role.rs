//! Role verification.
//!
//! The role cookie is only a cache and can be edited by the browser. A
//! verified role requires that the cookie role and the database role of
//! the session's owner both equal the required role.

use axum_extra::extract::cookie::CookieJar;
use gatehouse_core::{Error, Result, UserRole};
use serde::Serialize;

use crate::{users, Backend};

/// Outcome of a role check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoleCheck {
    /// Whether the caller holds the role.
    pub valid: bool,
    /// Why the check failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RoleCheck {
    fn pass() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    fn deny(message: &str) -> Self {
        Self {
            valid: false,
            message: Some(message.to_string()),
        }
    }

    fn reason(&self) -> &str {
        self.message.as_deref().unwrap_or("unknown reason")
    }
}

/// Check that the caller holds `required` according to both cookie and database.
pub async fn verify_user_role(backend: &Backend, jar: &CookieJar, required: UserRole) -> RoleCheck {
    let cookies = backend.cookies();

    let Some(cookie_role) = cookies.role(jar) else {
        return RoleCheck::deny("No role cookie found");
    };

    let Some(secret) = cookies.session(jar) else {
        return RoleCheck::deny("No active session");
    };

    let user = match backend.session(secret).account().get().await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!(error = %e, "session validation error");
            return RoleCheck::deny("Session validation failed");
        }
    };
    if user.id.is_empty() {
        return RoleCheck::deny("Invalid session");
    }

    let db_role = users::get_stored_role(backend, &user.id).await;

    if cookie_role != required.as_str() || db_role != required.as_str() {
        tracing::error!(
            user_id = %user.id,
            cookie_role = %cookie_role,
            db_role = %db_role,
            required_role = %required,
            "security alert: role mismatch detected"
        );
        return RoleCheck::deny("Role verification failed");
    }

    RoleCheck::pass()
}

/// Fail with [`Error::Forbidden`] unless the caller is a verified admin.
pub async fn require_admin(backend: &Backend, jar: &CookieJar) -> Result<()> {
    let check = verify_user_role(backend, jar, UserRole::Admin).await;
    if !check.valid {
        return Err(Error::Forbidden(format!(
            "Admin access required: {}",
            check.reason()
        )));
    }
    Ok(())
}

/// Fail with [`Error::Forbidden`] unless the caller is a verified client or admin.
pub async fn require_client(backend: &Backend, jar: &CookieJar) -> Result<()> {
    if verify_user_role(backend, jar, UserRole::Admin).await.valid {
        return Ok(());
    }
    let check = verify_user_role(backend, jar, UserRole::Client).await;
    if !check.valid {
        return Err(Error::Forbidden(format!(
            "Client access required: {}",
            check.reason()
        )));
    }
    Ok(())
}
