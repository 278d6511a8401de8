//! User roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Role of an application user.
///
/// Stored both in the users table (authoritative) and in the role cookie
/// (a cache that is re-checked on protected requests).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full access, including the admin area.
    Admin,
    /// Regular user. New accounts start here.
    #[default]
    Client,
}

impl UserRole {
    /// The wire form of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Client => "client",
        }
    }

    /// Returns `true` for [`UserRole::Admin`].
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "client" => Ok(Self::Client),
            other => Err(Error::validation_field(
                "role",
                format!("unknown role '{other}'"),
            )),
        }
    }
}
