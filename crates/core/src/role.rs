//! Access roles.
//!
//! Kept separate from the policy functions: the policy layer needs `User`,
//! and `User` needs `Role`.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Closed set of account roles.
///
/// There is no total ordering here: `Admin` has superset privileges, but
/// `Celebrity` is not "above" `Normal` outside the one claim transition.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Normal,
    Admin,
    Celebrity,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Normal => "normal",
            Role::Admin => "admin",
            Role::Celebrity => "celebrity",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Role::Normal),
            "admin" => Ok(Role::Admin),
            "celebrity" => Ok(Role::Celebrity),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
