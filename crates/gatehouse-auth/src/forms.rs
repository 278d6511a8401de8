//! Form payloads accepted by the auth actions, with their validation rules.

use std::fmt;
use std::sync::LazyLock;

use gatehouse_core::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Minimum password length enforced before calling the platform.
pub const MIN_PASSWORD_LEN: usize = 8;

#[allow(clippy::unwrap_used)]
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Input that can check itself before an action runs.
pub trait Validate {
    /// Returns the first rule violation, if any.
    fn validate(&self) -> Result<()>;
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation_field(field, "This field is required"));
    }
    Ok(())
}

fn require_email(value: &str) -> Result<()> {
    if !EMAIL_RE.is_match(value.trim()) {
        return Err(Error::validation_field("email", "Please enter a valid email"));
    }
    Ok(())
}

fn require_new_password(password: &str, confirm: &str) -> Result<()> {
    require("password", password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::validation_field(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    require("confirm-password", confirm)?;
    if password != confirm {
        return Err(Error::validation_field(
            "confirm-password",
            "Passwords do not match",
        ));
    }
    Ok(())
}

/// Sign-up form.
#[derive(Clone, Deserialize)]
pub struct RegisterForm {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Password confirmation.
    #[serde(rename = "confirm-password")]
    pub confirm_password: String,
    /// Terms of service accepted.
    #[serde(default)]
    pub agree: bool,
}

impl Validate for RegisterForm {
    fn validate(&self) -> Result<()> {
        require("name", &self.name)?;
        require_email(&self.email)?;
        require_new_password(&self.password, &self.confirm_password)?;
        if !self.agree {
            return Err(Error::validation_field("agree", "This field is required"));
        }
        Ok(())
    }
}

/// Email and password login form.
#[derive(Clone, Deserialize)]
pub struct LoginForm {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<()> {
        require_email(&self.email)?;
        require("password", &self.password)
    }
}

/// Request for a password recovery email.
#[derive(Clone, Debug, Deserialize)]
pub struct ForgotPasswordForm {
    /// Email address of the account.
    pub email: String,
}

impl Validate for ForgotPasswordForm {
    fn validate(&self) -> Result<()> {
        require_email(&self.email)
    }
}

/// Completion of password recovery.
#[derive(Clone, Deserialize)]
pub struct ResetPasswordForm {
    /// New password.
    pub password: String,
    /// Confirmation of the new password.
    #[serde(rename = "confirm-password")]
    pub confirm_password: String,
    /// User id from the recovery link.
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Secret from the recovery link.
    pub secret: String,
}

impl Validate for ResetPasswordForm {
    fn validate(&self) -> Result<()> {
        require_new_password(&self.password, &self.confirm_password)?;
        require("userId", &self.user_id)?;
        require("secret", &self.secret)
    }
}

// Password-bearing forms never print their secrets.
impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("agree", &self.agree)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for ResetPasswordForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetPasswordForm")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

/// OAuth providers enabled for social login.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    /// Google
    Google,
    /// GitHub
    Github,
    /// Apple
    Apple,
    /// Microsoft
    Microsoft,
    /// Facebook
    Facebook,
}

impl OAuthProvider {
    /// Provider name as used in platform URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
            Self::Apple => "apple",
            Self::Microsoft => "microsoft",
            Self::Facebook => "facebook",
        }
    }
}

/// Social login request.
#[derive(Clone, Debug, Deserialize)]
pub struct OAuthForm {
    /// Provider to log in with.
    pub provider: OAuthProvider,
}
