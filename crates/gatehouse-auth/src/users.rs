//! User records in the users table.
//!
//! The users table is the authoritative source of a user's role. Each row
//! links an auth user id to a display name, an email and a role.

use axum_extra::extract::cookie::CookieJar;
use gatehouse_appwrite::{unique_id, Query, RowList};
use gatehouse_core::{Result, UserRole};
use serde::{Deserialize, Serialize};

use crate::Backend;

/// Default page size for [`list_all_users`].
pub const DEFAULT_PAGE_SIZE: u64 = 25;

/// A row of the users table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Row id.
    #[serde(rename = "$id", default, skip_serializing_if = "String::is_empty")]
    pub row_id: String,
    /// Auth user id.
    pub user_id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Role string as stored.
    #[serde(default)]
    pub role: String,
}

impl UserRecord {
    /// The stored role; anything unrecognised reads as [`UserRole::Client`].
    pub fn role(&self) -> UserRole {
        self.role.parse().unwrap_or_default()
    }
}

/// One page of user records.
#[derive(Clone, Debug, Default, Serialize)]
pub struct UserListing {
    /// Whether the listing succeeded.
    pub success: bool,
    /// Records on this page.
    pub users: Vec<UserRecord>,
    /// Total number of records.
    pub total: u64,
}

/// Create the record for a newly registered user with the default role.
pub async fn create_user_record(
    backend: &Backend,
    user_id: &str,
    email: &str,
    name: &str,
) -> Result<UserRecord> {
    let record = UserRecord {
        row_id: String::new(),
        user_id: user_id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role: UserRole::default().as_str().to_string(),
    };
    let created = backend
        .admin()
        .tables()
        .create_row(
            backend.database_id(),
            backend.users_table_id(),
            &unique_id(),
            &record,
        )
        .await
        .inspect_err(|e| tracing::error!(user_id, error = %e, "failed to create user record"))?;
    tracing::info!(user_id, "created user record");
    Ok(created)
}

/// Look up the record of `user_id`, if there is one.
pub async fn find_user_record(backend: &Backend, user_id: &str) -> Result<Option<UserRecord>> {
    let rows: RowList<UserRecord> = backend
        .admin()
        .tables()
        .list_rows(
            backend.database_id(),
            backend.users_table_id(),
            &[Query::equal("userId", user_id)],
        )
        .await?;
    Ok(rows.rows.into_iter().next())
}

/// The role string stored for `user_id`, exactly as the table holds it.
///
/// Reads `client` when there is no record, the stored role is empty or the
/// lookup fails. Unrecognised values are returned untouched so callers can
/// refuse them.
pub async fn get_stored_role(backend: &Backend, user_id: &str) -> String {
    match find_user_record(backend, user_id).await {
        Ok(Some(record)) if !record.role.is_empty() => record.role,
        Ok(_) => UserRole::default().as_str().to_string(),
        Err(e) => {
            tracing::error!(user_id, error = %e, "failed to fetch user role");
            UserRole::default().as_str().to_string()
        }
    }
}

/// The database role of `user_id`.
///
/// Falls back to [`UserRole::Client`] when there is no record or the lookup fails.
pub async fn get_user_role(backend: &Backend, user_id: &str) -> UserRole {
    get_stored_role(backend, user_id)
        .await
        .parse()
        .unwrap_or_default()
}

/// List user records with the caller's own session.
pub async fn list_all_users(
    backend: &Backend,
    jar: &CookieJar,
    limit: u64,
    offset: u64,
) -> UserListing {
    let listing = async {
        let client = backend.client_session(jar)?;
        client
            .tables()
            .list_rows::<UserRecord>(
                backend.database_id(),
                backend.users_table_id(),
                &[Query::limit(limit), Query::offset(offset)],
            )
            .await
    };
    match listing.await {
        Ok(rows) => UserListing {
            success: true,
            users: rows.rows,
            total: rows.total,
        },
        Err(e) => {
            tracing::warn!(error = %e, "failed to list users");
            UserListing::default()
        }
    }
}
