//! # gatehouse-server
//!
//! HTTP surface of Gatehouse:
//! - JSON auth, session, identity, user and storage endpoints under `/api`
//! - the `/oauth` callback
//! - page routes that return JSON page descriptors
//! - `robots.txt`, `sitemap.xml` and the web app manifest
//!
//! Every route sits behind [`gatehouse_auth::RouteGuardLayer`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod routes;
mod state;

use axum::Router;
use gatehouse_auth::{GuardConfig, RouteGuardLayer};
use gatehouse_core::Result;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// The full application: all routes wrapped in the route guard.
pub fn app(state: AppState) -> Result<Router> {
    let guard = GuardConfig::new(state.backend.config())?;
    Ok(routes::router()
        .layer(RouteGuardLayer::new(guard))
        .with_state(state))
}
