//! In-memory store implementations.
//!
//! Intended for tests/dev. Each trait method takes the lock once, so every
//! logical operation (including the duplicate checks inside `insert` and
//! `update`) is serialized against concurrent writers.

use std::collections::HashMap;
use std::sync::RwLock;

use userauth_core::{LoginId, LoginRecord, User, UserId};

use crate::{LoginStore, StoreError, UserChanges, UserLookup, UserStore};

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E>(_: E) -> StoreError {
    StoreError::unavailable("lock poisoned")
}

impl UserStore for InMemoryUserStore {
    fn find(&self, by: UserLookup<'_>) -> Result<Option<User>, StoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        let found = match by {
            UserLookup::Id(id) => map.get(&id).cloned(),
            UserLookup::Username(username) => {
                map.values().find(|u| u.username == username).cloned()
            }
            UserLookup::Email(email) => map.values().find(|u| u.email == email).cloned(),
        };
        Ok(found)
    }

    fn insert(&self, user: User) -> Result<User, StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;

        if map.values().any(|u| u.username == user.username) {
            return Err(StoreError::conflict("username already exists"));
        }
        if map.values().any(|u| u.email == user.email) {
            return Err(StoreError::conflict("email already exists"));
        }

        map.insert(user.id, user.clone());
        Ok(user)
    }

    fn update(&self, id: UserId, changes: UserChanges) -> Result<User, StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;

        if let Some(username) = &changes.username {
            if map.values().any(|u| u.id != id && &u.username == username) {
                return Err(StoreError::conflict("username already exists"));
            }
        }

        let user = map.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        Ok(user.clone())
    }

    fn delete(&self, id: UserId) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        let mut users: Vec<User> = map.values().cloned().collect();
        users.sort_by_key(|u| *u.id.as_uuid());
        Ok(users)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryLoginStore {
    inner: RwLock<HashMap<LoginId, LoginRecord>>,
}

impl InMemoryLoginStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoginStore for InMemoryLoginStore {
    fn insert(&self, record: LoginRecord) -> Result<LoginRecord, StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.insert(record.id, record.clone());
        Ok(record)
    }

    fn find(&self, id: LoginId) -> Result<Option<LoginRecord>, StoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(&id).cloned())
    }

    fn list(&self, owner: Option<UserId>) -> Result<Vec<LoginRecord>, StoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        let mut records: Vec<LoginRecord> = map
            .values()
            .filter(|r| owner.map(|o| r.user_id == o).unwrap_or(true))
            .cloned()
            .collect();
        records.sort_by_key(|r| *r.id.as_uuid());
        Ok(records)
    }

    fn delete_all_for(&self, owner: UserId) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.retain(|_, r| r.user_id != owner);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userauth_core::Role;

    fn user(username: &str, email: &str) -> User {
        User::new(username, email, "Jane", "Doe", "$argon2id$stub")
    }

    #[test]
    fn insert_then_find_by_each_selector() {
        let store = InMemoryUserStore::new();
        let alice = store.insert(user("alice", "alice@example.com")).unwrap();

        for lookup in [
            UserLookup::Id(alice.id),
            UserLookup::Username("alice"),
            UserLookup::Email("alice@example.com"),
        ] {
            assert_eq!(store.find(lookup).unwrap().unwrap().id, alice.id);
        }
        assert!(store.find(UserLookup::Username("bob")).unwrap().is_none());
    }

    #[test]
    fn duplicate_username_and_email_are_conflicts() {
        let store = InMemoryUserStore::new();
        store.insert(user("alice", "alice@example.com")).unwrap();

        let err = store.insert(user("alice", "other@example.com")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let err = store.insert(user("other", "alice@example.com")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn update_changes_only_requested_fields() {
        let store = InMemoryUserStore::new();
        let alice = store.insert(user("alice", "alice@example.com")).unwrap();

        let updated = store.update(alice.id, UserChanges::role(Role::Admin)).unwrap();
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.username, "alice");

        let updated = store.update(alice.id, UserChanges::username("alice2")).unwrap();
        assert_eq!(updated.username, "alice2");
        assert_eq!(updated.role, Role::Admin);
    }

    #[test]
    fn update_to_taken_username_is_a_conflict() {
        let store = InMemoryUserStore::new();
        let alice = store.insert(user("alice", "alice@example.com")).unwrap();
        store.insert(user("bob", "bob@example.com")).unwrap();

        let err = store.update(alice.id, UserChanges::username("bob")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Re-asserting one's own username is not a conflict.
        let ok = store.update(alice.id, UserChanges::username("alice")).unwrap();
        assert_eq!(ok.username, "alice");
    }

    #[test]
    fn delete_missing_user_reports_not_found() {
        let store = InMemoryUserStore::new();
        assert_eq!(store.delete(UserId::new()).unwrap_err(), StoreError::NotFound);
    }

    #[test]
    fn login_list_filters_by_owner_and_cascade_removes() {
        let users = InMemoryUserStore::new();
        let logins = InMemoryLoginStore::new();
        let alice = users.insert(user("alice", "alice@example.com")).unwrap();
        let bob = users.insert(user("bob", "bob@example.com")).unwrap();

        logins.insert(LoginRecord::new(alice.id)).unwrap();
        logins.insert(LoginRecord::new(alice.id)).unwrap();
        logins.insert(LoginRecord::new(bob.id)).unwrap();

        assert_eq!(logins.list(None).unwrap().len(), 3);
        assert_eq!(logins.list(Some(alice.id)).unwrap().len(), 2);

        logins.delete_all_for(alice.id).unwrap();
        assert_eq!(logins.list(Some(alice.id)).unwrap().len(), 0);
        assert_eq!(logins.list(Some(bob.id)).unwrap().len(), 1);
    }
}
