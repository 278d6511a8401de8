//! Appwrite REST client for Gatehouse.
//!
//! Provides:
//! - [`AppwriteClient`]: project-scoped client with [`Credentials`]
//! - [`Account`]: current user, sessions, identities, password recovery
//! - [`Tables`]: row listing and creation with [`Query`] filters
//! - [`Storage`]: file upload, deletion, view and download
//!
//! Every call is wrapped in the configured retry and timeout policy.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod account;
mod client;
mod models;
mod query;
mod storage;
mod tables;

pub use account::Account;
pub use client::{unique_id, AppwriteClient, Credentials};
pub use models::{
    FileObject, Identity, IdentityList, RowList, Session, SessionList, Token, User,
};
pub use query::Query;
pub use storage::{FileContent, Storage};
pub use tables::Tables;

/// Session id that refers to the session making the request.
pub const CURRENT_SESSION: &str = "current";
