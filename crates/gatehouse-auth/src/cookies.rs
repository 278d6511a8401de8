//! Session and role cookies.
//!
//! Both cookies are `HttpOnly`, `SameSite=Strict`, scoped to `/`, and
//! `Secure` outside development.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use gatehouse_core::{Config, UserRole};

/// Names and attributes of the cookies Gatehouse issues.
#[derive(Clone, Debug)]
pub struct CookiePolicy {
    session_name: String,
    role_name: String,
    max_age: time::Duration,
    secure: bool,
}

impl CookiePolicy {
    /// Build the policy from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            session_name: config.session.session_cookie.clone(),
            role_name: config.session.role_cookie.clone(),
            max_age: time::Duration::seconds(config.session.max_age_secs),
            secure: config.secure_cookies(),
        }
    }

    /// Name of the session cookie.
    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    /// Name of the role cookie.
    pub fn role_name(&self) -> &str {
        &self.role_name
    }

    fn build(&self, name: &str, value: &str) -> Cookie<'static> {
        Cookie::build((name.to_string(), value.to_string()))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .max_age(self.max_age)
            .build()
    }

    /// Set a cookie with the policy's attributes.
    pub fn set_cookie(&self, jar: CookieJar, name: &str, value: &str) -> CookieJar {
        jar.add(self.build(name, value))
    }

    /// Read a cookie. Empty values count as absent.
    pub fn get_cookie(jar: &CookieJar, name: &str) -> Option<String> {
        jar.get(name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Whether a cookie is present.
    pub fn has_cookie(jar: &CookieJar, name: &str) -> bool {
        jar.get(name).is_some()
    }

    /// Expire a cookie in the browser.
    pub fn delete_cookie(&self, jar: CookieJar, name: &str) -> CookieJar {
        jar.remove(Cookie::build(name.to_string()).path("/"))
    }

    /// Store the session secret.
    pub fn set_session(&self, jar: CookieJar, secret: &str) -> CookieJar {
        self.set_cookie(jar, &self.session_name, secret)
    }

    /// The session secret, if present.
    pub fn session(&self, jar: &CookieJar) -> Option<String> {
        Self::get_cookie(jar, &self.session_name)
    }

    /// Drop the session cookie.
    pub fn delete_session(&self, jar: CookieJar) -> CookieJar {
        self.delete_cookie(jar, &self.session_name)
    }

    /// Cache the user's role.
    pub fn set_role(&self, jar: CookieJar, role: UserRole) -> CookieJar {
        self.set_cookie(jar, &self.role_name, role.as_str())
    }

    /// The cached role string, if present. Not validated.
    pub fn role(&self, jar: &CookieJar) -> Option<String> {
        Self::get_cookie(jar, &self.role_name)
    }

    /// Drop the role cookie.
    pub fn delete_role(&self, jar: CookieJar) -> CookieJar {
        self.delete_cookie(jar, &self.role_name)
    }

    /// Drop both cookies.
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        self.delete_role(self.delete_session(jar))
    }
}
