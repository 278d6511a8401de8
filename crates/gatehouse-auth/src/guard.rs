//! Route guard Tower middleware.
//!
//! `RouteGuardLayer` and `RouteGuard` sit in front of every page route and
//! decide from the session and role cookies alone whether a request may
//! proceed. The role cookie check here is a first gate only; admin pages
//! repeat the check against the database with [`crate::role::verify_user_role`].

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use gatehouse_core::{Config, Error, Result, UserRole};
use http::{HeaderName, HeaderValue, Request};
use reqwest::Url;
use tower::{Layer, Service};

use crate::CookiePolicy;

const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("x-xss-protection", "1; mode=block"),
    ("permissions-policy", "geolocation=(), microphone=(), camera=()"),
];

/// Route rules for [`RouteGuardLayer`].
#[derive(Clone, Debug)]
pub struct GuardConfig {
    base: Url,
    session_cookie: String,
    role_cookie: String,
    /// Prefixes that need a session.
    pub protected_prefixes: Vec<String>,
    /// Prefixes that also need the admin role cookie.
    pub admin_prefixes: Vec<String>,
    /// Pages a logged-in user is bounced away from.
    pub auth_pages: Vec<String>,
}

impl GuardConfig {
    /// Rules for the application described by `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(&config.app.url)
            .map_err(|e| Error::config(format!("invalid app url '{}': {e}", config.app.url)))?;
        Ok(Self {
            base,
            session_cookie: config.session.session_cookie.clone(),
            role_cookie: config.session.role_cookie.clone(),
            protected_prefixes: vec!["/dashboard".to_string(), "/admin".to_string()],
            admin_prefixes: vec!["/admin".to_string()],
            auth_pages: vec!["/login".to_string(), "/signup".to_string()],
        })
    }

    fn absolute(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut url = self.base.join(path).unwrap_or_else(|_| self.base.clone());
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        url.to_string()
    }

    /// Decide what happens to a request for `path`.
    pub fn evaluate(&self, path: &str, has_session: bool, role: Option<&str>) -> Verdict {
        if path.starts_with("/api") || path.contains('.') {
            return Verdict::Bypass;
        }

        let is_admin_route = has_prefix(path, &self.admin_prefixes);
        let is_protected = is_admin_route || has_prefix(path, &self.protected_prefixes);

        if !has_session && is_protected {
            return Verdict::Redirect(self.absolute(
                "/login",
                &[("redirect", path), ("error", "authentication_required")],
            ));
        }

        if has_session && has_prefix(path, &self.auth_pages) {
            let home = if role == Some(UserRole::Admin.as_str()) {
                "/admin"
            } else {
                "/dashboard"
            };
            return Verdict::Redirect(self.absolute(home, &[]));
        }

        if is_admin_route && role != Some(UserRole::Admin.as_str()) {
            tracing::warn!(path, role = ?role, "security: non-admin attempted to access admin route");
            return Verdict::Redirect(
                self.absolute("/dashboard", &[("error", "admin_access_denied")]),
            );
        }

        Verdict::Forward
    }
}

fn has_prefix(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| path.starts_with(p.as_str()))
}

/// Outcome of [`GuardConfig::evaluate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Not guarded (API and static files); forwarded untouched.
    Bypass,
    /// Forwarded with security headers added.
    Forward,
    /// Sent elsewhere with a temporary redirect.
    Redirect(String),
}

/// Tower `Layer` that wraps services with the route guard.
#[derive(Clone)]
pub struct RouteGuardLayer {
    config: Arc<GuardConfig>,
}

impl RouteGuardLayer {
    /// Create a guard layer with the given rules.
    pub fn new(config: GuardConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl<S> Layer<S> for RouteGuardLayer {
    type Service = RouteGuard<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RouteGuard {
            inner,
            config: self.config.clone(),
        }
    }
}

/// Tower `Service` that redirects or forwards requests by cookie state.
#[derive(Clone)]
pub struct RouteGuard<S> {
    inner: S,
    config: Arc<GuardConfig>,
}

impl<S> Service<Request<Body>> for RouteGuard<S>
where
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let jar = CookieJar::from_headers(req.headers());
        let has_session = CookiePolicy::get_cookie(&jar, &self.config.session_cookie).is_some();
        let role = CookiePolicy::get_cookie(&jar, &self.config.role_cookie);
        let verdict = self
            .config
            .evaluate(req.uri().path(), has_session, role.as_deref());

        Box::pin(async move {
            match verdict {
                Verdict::Redirect(location) => Ok(Redirect::temporary(&location).into_response()),
                Verdict::Bypass => {
                    let resp = inner
                        .call(req)
                        .await
                        .unwrap_or_else(|infallible| match infallible {});
                    Ok(resp.into_response())
                }
                Verdict::Forward => {
                    let resp = inner
                        .call(req)
                        .await
                        .unwrap_or_else(|infallible| match infallible {});
                    let mut resp = resp.into_response();
                    let headers = resp.headers_mut();
                    for &(name, value) in SECURITY_HEADERS {
                        headers.insert(
                            HeaderName::from_static(name),
                            HeaderValue::from_static(value),
                        );
                    }
                    Ok(resp)
                }
            }
        })
    }
}
