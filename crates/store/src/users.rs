//! User record storage contract.

use std::sync::Arc;

use userauth_core::{Role, User, UserId};

use crate::StoreError;

/// Explicit, type-checked selector for single-user lookups.
///
/// Exactly one field is named per lookup; there is no positional form that
/// could silently resolve by the wrong column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserLookup<'a> {
    Username(&'a str),
    Email(&'a str),
    Id(UserId),
}

/// Mutable-field set for `UserStore::update`.
///
/// Only `username` and `role` are mutable; everything else on a user record
/// is fixed at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<String>,
    pub role: Option<Role>,
}

impl UserChanges {
    pub fn username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }

    pub fn role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.role.is_none()
    }
}

pub trait UserStore: Send + Sync {
    fn find(&self, by: UserLookup<'_>) -> Result<Option<User>, StoreError>;

    /// Insert a new record. Fails with `Conflict` on duplicate username or
    /// email (backstop for the orchestration-layer existence checks).
    fn insert(&self, user: User) -> Result<User, StoreError>;

    /// Apply `changes` to the record and return the updated state.
    fn update(&self, id: UserId, changes: UserChanges) -> Result<User, StoreError>;

    fn delete(&self, id: UserId) -> Result<(), StoreError>;

    fn list_all(&self) -> Result<Vec<User>, StoreError>;
}

impl<S> UserStore for Arc<S>
where
    S: UserStore + ?Sized,
{
    fn find(&self, by: UserLookup<'_>) -> Result<Option<User>, StoreError> {
        (**self).find(by)
    }

    fn insert(&self, user: User) -> Result<User, StoreError> {
        (**self).insert(user)
    }

    fn update(&self, id: UserId, changes: UserChanges) -> Result<User, StoreError> {
        (**self).update(id, changes)
    }

    fn delete(&self, id: UserId) -> Result<(), StoreError> {
        (**self).delete(id)
    }

    fn list_all(&self) -> Result<Vec<User>, StoreError> {
        (**self).list_all()
    }
}
