//! Shared application state.

use gatehouse_auth::Backend;
use gatehouse_core::{Config, Result};

/// State handed to every handler. Cheap to clone.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Platform client factory and cookie policy.
    pub backend: Backend,
}

impl AppState {
    /// Build state from validated configuration.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            backend: Backend::new(config)?,
        })
    }
}

impl From<Backend> for AppState {
    fn from(backend: Backend) -> Self {
        Self { backend }
    }
}
