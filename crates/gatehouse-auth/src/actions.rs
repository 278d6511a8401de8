//! Auth actions: registration, login, OAuth, logout, password recovery,
//! and management of the caller's sessions and identities.
//!
//! Actions that the UI treats as forms (register, login, recovery) return
//! `Result` so validation and platform errors surface with their status.
//! The management actions report failures inside their payload instead.

use axum_extra::extract::cookie::CookieJar;
use gatehouse_appwrite::{unique_id, Identity, Session, User, CURRENT_SESSION};
use gatehouse_core::{Error, Result, UserRole};
use serde::Serialize;

use crate::forms::{
    ForgotPasswordForm, LoginForm, OAuthProvider, RegisterForm, ResetPasswordForm, Validate,
};
use crate::{users, ActionResponse, Backend};

/// Where a successful OAuth callback lands.
pub const OAUTH_SUCCESS_PATH: &str = "/success";

/// Payload of a successful login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    /// Logged-in user.
    pub user_id: String,
    /// Session expiry timestamp.
    pub expire: String,
    /// Role read from the users table.
    pub role: UserRole,
}

/// Provider URL the browser should be sent to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthRedirect {
    /// Absolute platform URL starting the OAuth flow.
    pub redirect_url: String,
}

/// Result of [`get_current_user`].
#[derive(Clone, Debug, Serialize)]
pub struct CurrentUser {
    /// Whether a user was found.
    pub success: bool,
    /// Outcome description.
    pub message: String,
    /// The user, when found.
    pub user: Option<User>,
}

/// Result of [`list_active_sessions`].
#[derive(Clone, Debug, Default, Serialize)]
pub struct SessionListing {
    /// Whether the listing succeeded.
    pub success: bool,
    /// Failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The caller's sessions.
    pub sessions: Vec<Session>,
    /// Number of sessions.
    pub total: u64,
}

/// Result of [`get_linked_identities`].
#[derive(Clone, Debug, Default, Serialize)]
pub struct IdentityListing {
    /// Whether the listing succeeded.
    pub success: bool,
    /// Failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Linked identities.
    pub identities: Vec<Identity>,
    /// Number of identities.
    pub total: u64,
}

/// Create an auth user and its user record.
pub async fn register(backend: &Backend, form: &RegisterForm) -> Result<ActionResponse> {
    form.validate()?;

    let email = form.email.trim();
    let user = backend
        .admin()
        .account()
        .create(&unique_id(), email, &form.password, form.name.trim())
        .await
        .inspect_err(|e| tracing::error!(email, error = %e, "registration failed"))?;
    users::create_user_record(backend, &user.id, email, form.name.trim()).await?;

    tracing::info!(user_id = %user.id, "account created");
    Ok(ActionResponse::done("Account created successfully"))
}

/// Log in with email and password and set the session and role cookies.
pub async fn login(
    backend: &Backend,
    jar: CookieJar,
    form: &LoginForm,
) -> Result<(CookieJar, ActionResponse<LoginData>)> {
    form.validate()?;

    let email = form.email.trim();
    let session = backend
        .admin()
        .account()
        .create_email_password_session(email, &form.password)
        .await
        .inspect_err(|e| tracing::warn!(email, error = %e, "login failed"))?;
    if session.secret.is_empty() {
        return Err(Error::config(
            "platform returned no session secret; the API key needs the sessions.write scope",
        ));
    }

    let cookies = backend.cookies();
    let jar = cookies.set_session(jar, &session.secret);
    let role = users::get_user_role(backend, &session.user_id).await;
    let jar = cookies.set_role(jar, role);

    tracing::info!(user_id = %session.user_id, %role, "logged in");
    let data = LoginData {
        user_id: session.user_id,
        expire: session.expire,
        role,
    };
    Ok((jar, ActionResponse::ok("Login successful", data)))
}

/// Platform URL that starts the OAuth flow for `provider`.
///
/// The platform sends the browser back to `<origin>/oauth` on success and
/// to `<origin>/fail?error=oauth_failed` otherwise.
pub fn oauth_redirect(
    backend: &Backend,
    provider: OAuthProvider,
    origin: &str,
) -> Result<ActionResponse<OAuthRedirect>> {
    let client = backend.public();
    let origin = origin.trim_end_matches('/');
    let mut target = client.url(&["account", "sessions", "oauth2", provider.as_str()])?;
    target
        .query_pairs_mut()
        .append_pair("project", client.project_id())
        .append_pair("success", &format!("{origin}/oauth"))
        .append_pair("failure", &format!("{origin}/fail?error=oauth_failed"));

    Ok(ActionResponse::ok(
        "OAuth flow initialised",
        OAuthRedirect {
            redirect_url: target.to_string(),
        },
    ))
}

/// Path of the failure page for `code`.
pub fn fail_path(code: &str) -> String {
    format!("/fail?error={code}")
}

/// Message shown on the failure page for an error code.
pub fn fail_message(code: Option<&str>) -> &'static str {
    match code.unwrap_or("unknown_error") {
        "oauth_failed" => "OAuth authentication failed. Please try again.",
        "oauth_missing_params" => "Missing authentication parameters.",
        "oauth_callback_failed" => "Failed to complete authentication.",
        "access_denied" => "You denied access to your account.",
        _ => "An unknown error occurred during authentication.",
    }
}

/// Complete an OAuth login from the platform's `userId` and `secret` query parameters.
///
/// Returns the cookie jar and the path to redirect to.
pub async fn handle_oauth_callback(
    backend: &Backend,
    jar: CookieJar,
    user_id: Option<&str>,
    secret: Option<&str>,
) -> (CookieJar, String) {
    let (Some(user_id), Some(secret)) = (present(user_id), present(secret)) else {
        tracing::error!(
            has_user_id = user_id.is_some(),
            has_secret = secret.is_some(),
            "oauth callback missing parameters"
        );
        return (jar, fail_path("oauth_missing_params"));
    };

    match complete_oauth(backend, user_id, secret).await {
        Ok(role) => {
            let cookies = backend.cookies();
            let jar = cookies.set_role(cookies.set_session(jar, secret), role);
            tracing::info!(user_id, %role, "oauth login completed");
            (jar, OAUTH_SUCCESS_PATH.to_string())
        }
        Err(code) => (jar, fail_path(code)),
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

async fn complete_oauth(
    backend: &Backend,
    user_id: &str,
    secret: &str,
) -> std::result::Result<UserRole, &'static str> {
    let user = match backend.session(secret).account().get().await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!(user_id, error = %e, "oauth session could not be verified");
            return Err("oauth_invalid_session");
        }
    };

    if user.id != user_id {
        tracing::error!(expected = user_id, received = %user.id, "oauth user id mismatch");
        return Err("oauth_user_mismatch");
    }

    let role = match users::find_user_record(backend, user_id).await {
        Ok(Some(record)) => record.role(),
        Ok(None) => {
            let name = if user.name.is_empty() {
                "User"
            } else {
                user.name.as_str()
            };
            if let Err(e) = users::create_user_record(backend, user_id, &user.email, name).await {
                tracing::error!(user_id, error = %e, "oauth user record creation failed");
            }
            UserRole::default()
        }
        Err(e) => {
            tracing::error!(user_id, error = %e, "oauth user record lookup failed");
            UserRole::default()
        }
    };
    Ok(role)
}

/// Delete the current session and clear both cookies.
///
/// The cookies are cleared even when the platform call fails.
pub async fn logout(backend: &Backend, jar: CookieJar) -> (CookieJar, ActionResponse) {
    let result = match backend.client_session(&jar) {
        Ok(client) => client.account().delete_session(CURRENT_SESSION).await,
        Err(e) => Err(e),
    };
    let jar = backend.cookies().clear(jar);
    match result {
        Ok(()) => (jar, ActionResponse::done("Logged out successfully")),
        Err(e) => {
            tracing::warn!(error = %e, "logout failed, cookies cleared");
            (jar, ActionResponse::failed(e.to_string()))
        }
    }
}

/// Whether the session cookie belongs to a user.
pub async fn is_logged_in(backend: &Backend, jar: &CookieJar) -> bool {
    let Ok(client) = backend.client_session(jar) else {
        return false;
    };
    client
        .account()
        .get()
        .await
        .map(|user| !user.id.is_empty())
        .unwrap_or(false)
}

/// The user owning the session cookie.
pub async fn get_current_user(backend: &Backend, jar: &CookieJar) -> CurrentUser {
    let result = match backend.client_session(jar) {
        Ok(client) => client.account().get().await,
        Err(e) => Err(e),
    };
    match result {
        Ok(user) => CurrentUser {
            success: true,
            message: "User retrieved successfully".to_string(),
            user: Some(user),
        },
        Err(e) => CurrentUser {
            success: false,
            message: e.to_string(),
            user: None,
        },
    }
}

/// All sessions of the caller.
pub async fn list_active_sessions(backend: &Backend, jar: &CookieJar) -> SessionListing {
    let result = match backend.client_session(jar) {
        Ok(client) => client.account().list_sessions().await,
        Err(e) => Err(e),
    };
    match result {
        Ok(list) => SessionListing {
            success: true,
            message: None,
            sessions: list.sessions,
            total: list.total,
        },
        Err(e) => {
            tracing::error!(error = %e, "failed to list sessions");
            SessionListing {
                message: Some(e.to_string()),
                ..SessionListing::default()
            }
        }
    }
}

/// Log out one of the caller's sessions; `current` also clears the cookies.
pub async fn delete_session_by_id(
    backend: &Backend,
    jar: CookieJar,
    session_id: &str,
) -> (CookieJar, ActionResponse) {
    let result = match backend.client_session(&jar) {
        Ok(client) => client.account().delete_session(session_id).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => {
            let jar = if session_id == CURRENT_SESSION {
                backend.cookies().clear(jar)
            } else {
                jar
            };
            (jar, ActionResponse::done("Session deleted successfully"))
        }
        Err(e) => {
            tracing::error!(session_id, error = %e, "failed to delete session");
            (jar, ActionResponse::failed(e.to_string()))
        }
    }
}

/// OAuth identities linked to the caller.
pub async fn get_linked_identities(backend: &Backend, jar: &CookieJar) -> IdentityListing {
    let result = match backend.client_session(jar) {
        Ok(client) => client.account().list_identities().await,
        Err(e) => Err(e),
    };
    match result {
        Ok(list) => IdentityListing {
            success: true,
            message: None,
            identities: list.identities,
            total: list.total,
        },
        Err(e) => {
            tracing::error!(error = %e, "failed to list identities");
            IdentityListing {
                message: Some(e.to_string()),
                ..IdentityListing::default()
            }
        }
    }
}

/// Unlink an OAuth identity from the caller.
pub async fn unlink_identity(backend: &Backend, jar: &CookieJar, identity_id: &str) -> ActionResponse {
    let result = match backend.client_session(jar) {
        Ok(client) => client.account().delete_identity(identity_id).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => ActionResponse::done("Identity unlinked successfully"),
        Err(e) => {
            tracing::error!(identity_id, error = %e, "failed to unlink identity");
            ActionResponse::failed(e.to_string())
        }
    }
}

/// Email a password recovery link pointing at the reset-password page.
pub async fn forgot_password(backend: &Backend, form: &ForgotPasswordForm) -> Result<ActionResponse> {
    form.validate()?;
    let redirect = backend.config().app.reset_password_url();
    backend
        .public()
        .account()
        .create_recovery(form.email.trim(), &redirect)
        .await?;
    Ok(ActionResponse::done("Password recovery email sent"))
}

/// Set a new password with the secret from a recovery link.
pub async fn reset_password(backend: &Backend, form: &ResetPasswordForm) -> Result<ActionResponse> {
    form.validate()?;
    backend
        .public()
        .account()
        .update_recovery(&form.user_id, &form.secret, &form.password)
        .await?;
    tracing::info!(user_id = %form.user_id, "password reset");
    Ok(ActionResponse::done("Password reset successfully"))
}
