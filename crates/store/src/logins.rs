//! Login-record storage contract.

use std::sync::Arc;

use userauth_core::{LoginId, LoginRecord, UserId};

use crate::StoreError;

pub trait LoginStore: Send + Sync {
    fn insert(&self, record: LoginRecord) -> Result<LoginRecord, StoreError>;

    fn find(&self, id: LoginId) -> Result<Option<LoginRecord>, StoreError>;

    /// List records, optionally restricted to one owner.
    fn list(&self, owner: Option<UserId>) -> Result<Vec<LoginRecord>, StoreError>;

    /// Remove every record owned by `owner` (cascade-delete support).
    fn delete_all_for(&self, owner: UserId) -> Result<(), StoreError>;
}

impl<S> LoginStore for Arc<S>
where
    S: LoginStore + ?Sized,
{
    fn insert(&self, record: LoginRecord) -> Result<LoginRecord, StoreError> {
        (**self).insert(record)
    }

    fn find(&self, id: LoginId) -> Result<Option<LoginRecord>, StoreError> {
        (**self).find(id)
    }

    fn list(&self, owner: Option<UserId>) -> Result<Vec<LoginRecord>, StoreError> {
        (**self).list(owner)
    }

    fn delete_all_for(&self, owner: UserId) -> Result<(), StoreError> {
        (**self).delete_all_for(owner)
    }
}
