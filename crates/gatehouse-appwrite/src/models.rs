//! Platform response shapes, reduced to the fields Gatehouse reads.

use serde::{Deserialize, Serialize};

/// An account on the platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user id.
    #[serde(rename = "$id")]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Whether the email address was verified.
    #[serde(default)]
    pub email_verification: bool,
    /// Registration timestamp (RFC 3339).
    #[serde(default)]
    pub registration: String,
    /// Whether the account is enabled.
    #[serde(default = "enabled")]
    pub status: bool,
}

fn enabled() -> bool {
    true
}

/// A login session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Session id.
    #[serde(rename = "$id")]
    pub id: String,
    /// Owner of the session.
    pub user_id: String,
    /// Expiry timestamp (RFC 3339).
    pub expire: String,
    /// Session secret. Only returned when the session is created with an API key.
    #[serde(default, skip_serializing)]
    pub secret: String,
    /// Auth provider, e.g. `email` or `google`.
    #[serde(default)]
    pub provider: String,
    /// Whether this is the session making the request.
    #[serde(default)]
    pub current: bool,
}

/// Sessions of the current user.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionList {
    /// Total number of sessions.
    pub total: u64,
    /// The sessions.
    #[serde(default)]
    pub sessions: Vec<Session>,
}

/// An OAuth identity linked to an account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Identity id.
    #[serde(rename = "$id")]
    pub id: String,
    /// Owner of the identity.
    pub user_id: String,
    /// OAuth provider name.
    pub provider: String,
    /// Email reported by the provider.
    #[serde(default)]
    pub provider_email: String,
}

/// Identities of the current user.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IdentityList {
    /// Total number of identities.
    pub total: u64,
    /// The identities.
    #[serde(default)]
    pub identities: Vec<Identity>,
}

/// A page of table rows.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RowList<T> {
    /// Total number of rows matching the query (not only this page).
    pub total: u64,
    /// The rows.
    #[serde(default = "Vec::new")]
    pub rows: Vec<T>,
}

/// A short-lived token, e.g. for password recovery.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Token id.
    #[serde(rename = "$id")]
    pub id: String,
    /// Owner of the token.
    #[serde(default)]
    pub user_id: String,
    /// Expiry timestamp (RFC 3339).
    #[serde(default)]
    pub expire: String,
}

/// A stored file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileObject {
    /// File id.
    #[serde(rename = "$id")]
    pub id: String,
    /// Bucket holding the file.
    #[serde(default)]
    pub bucket_id: String,
    /// Original file name.
    #[serde(default)]
    pub name: String,
    /// MIME type detected by the platform.
    #[serde(default)]
    pub mime_type: String,
    /// Size in bytes.
    #[serde(default)]
    pub size_original: u64,
}
