//! Stored records: user accounts and their login history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{LoginId, Role, UserId};

/// A user account.
///
/// # Invariants
/// - `id` and `email` are immutable after creation.
/// - `username` and `email` are each globally unique (enforced by the
///   orchestration layer via existence checks, with the store as backstop).
/// - `password_hash` never leaves the process; it is skipped on serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub role: Role,
    pub username: String,
    pub email: String,
    pub name: String,
    pub surname: String,
    #[serde(skip_serializing)]
    #[serde(default)]
    pub password_hash: String,
    pub ctime: DateTime<Utc>,
}

impl User {
    /// Create a fresh account with the default role.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        surname: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::new(),
            role: Role::Normal,
            username: username.into(),
            email: email.into(),
            name: name.into(),
            surname: surname.into(),
            password_hash: password_hash.into(),
            ctime: Utc::now(),
        }
    }

    /// The full display name used by the celebrity claim check.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// One recorded login. Immutable once created.
///
/// Owned by the referenced user: deleting the user deletes its records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRecord {
    pub id: LoginId,
    pub user_id: UserId,
    pub ctime: DateTime<Utc>,
}

impl LoginRecord {
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: LoginId::new(),
            user_id,
            ctime: Utc::now(),
        }
    }
}
