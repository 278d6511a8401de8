#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Gatehouse Core: shared types for every Gatehouse crate.
//!
//! This crate has no internal Gatehouse dependencies.
//!
//! # Modules
//!
//! - [`config`]: Application, platform, session, and network settings
//! - [`error`]: Error taxonomy and Result alias
//! - [`retry`]: Exponential-backoff retry and timeout wrappers
//! - [`role`]: The [`UserRole`] carried in cookies and user records

pub mod config;
pub mod error;
pub mod retry;
pub mod role;

pub use config::{
    AppSettings, AppwriteSettings, Config, Environment, NetworkSettings, SessionSettings,
};
pub use error::{Error, Result};
pub use retry::{with_retry, with_retry_and_timeout, with_timeout, RetryPolicy};
pub use role::UserRole;
