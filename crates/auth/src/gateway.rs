//! Per-operation authorization over user and login resources.
//!
//! Every operation takes the already-resolved actor explicitly (no ambient
//! request state) and consults the policy functions before touching the
//! stores. An absent target and a policy denial surface identically as
//! `NotVisible`, so a non-admin cannot probe which ids exist.

use serde::{Deserialize, Serialize};

use userauth_core::{LoginId, LoginRecord, Role, User, UserId};
use userauth_picmodel::CelebrityClassifier;
use userauth_store::{LoginStore, UserChanges, UserLookup, UserStore};

use crate::{AuthError, policy, policy::Target};

/// Full-representation update body for a user record.
///
/// The caller submits the whole record; the gateway diffs it against the
/// stored state and only `username` and `role` may differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    pub id: UserId,
    pub role: Role,
    pub username: String,
    pub email: String,
    pub name: String,
    pub surname: String,
}

/// Authorization layer in front of the stores.
#[derive(Debug, Clone)]
pub struct ResourceGateway<U, L, C> {
    users: U,
    logins: L,
    classifier: C,
}

impl<U, L, C> ResourceGateway<U, L, C>
where
    U: UserStore,
    L: LoginStore,
    C: CelebrityClassifier,
{
    pub fn new(users: U, logins: L, classifier: C) -> Self {
        Self {
            users,
            logins,
            classifier,
        }
    }

    /// Fetch a user the actor is allowed to see, or `NotVisible`.
    fn visible_user(&self, actor: &User, id: UserId) -> Result<User, AuthError> {
        let user = self
            .users
            .find(UserLookup::Id(id))?
            .ok_or(AuthError::NotVisible)?;

        if !policy::can_see_object(actor, Target::User(&user)) {
            return Err(AuthError::NotVisible);
        }

        Ok(user)
    }

    pub fn list_users(&self, actor: &User) -> Result<Vec<User>, AuthError> {
        if !policy::can_see_all(actor) {
            return Err(AuthError::NotVisible);
        }

        Ok(self.users.list_all()?)
    }

    pub fn get_user(&self, actor: &User, id: UserId) -> Result<User, AuthError> {
        self.visible_user(actor, id)
    }

    pub fn list_logins(&self, actor: &User) -> Result<Vec<LoginRecord>, AuthError> {
        if !policy::can_see_all(actor) {
            return Err(AuthError::NotVisible);
        }

        Ok(self.logins.list(None)?)
    }

    pub fn get_login(&self, actor: &User, id: LoginId) -> Result<LoginRecord, AuthError> {
        let record = self.logins.find(id)?.ok_or(AuthError::NotVisible)?;

        if !policy::can_see_object(actor, Target::Login(&record)) {
            return Err(AuthError::NotVisible);
        }

        Ok(record)
    }

    /// All login records owned by `user_id`, gated on seeing that user.
    pub fn list_user_logins(
        &self,
        actor: &User,
        user_id: UserId,
    ) -> Result<Vec<LoginRecord>, AuthError> {
        let user = self.visible_user(actor, user_id)?;
        Ok(self.logins.list(Some(user.id))?)
    }

    /// One login record reached through its owner, gated on both.
    pub fn get_user_login(
        &self,
        actor: &User,
        user_id: UserId,
        login_id: LoginId,
    ) -> Result<LoginRecord, AuthError> {
        self.visible_user(actor, user_id)?;
        self.get_login(actor, login_id)
    }

    /// Apply a full-representation update to a user record.
    ///
    /// Only `username` and `role` are mutable through this path; a changed
    /// id, name, surname or email is rejected for everyone, admins included.
    pub fn update_user(
        &self,
        actor: &User,
        id: UserId,
        submitted: &UserPatch,
    ) -> Result<User, AuthError> {
        let current = self.visible_user(actor, id)?;

        let mut changes = UserChanges::default();

        if submitted.username != current.username {
            if !policy::can_update_username(actor, &current) {
                return Err(AuthError::NotPermitted);
            }
            if self
                .users
                .find(UserLookup::Username(&submitted.username))?
                .is_some()
            {
                return Err(AuthError::UsernameTaken);
            }
            changes.username = Some(submitted.username.clone());
        }

        if submitted.role != current.role {
            if !policy::can_update_role(actor, &current) {
                return Err(AuthError::NotPermitted);
            }
            changes.role = Some(submitted.role);
        }

        let immutable_changed = submitted.id != current.id
            || submitted.name != current.name
            || submitted.surname != current.surname
            || submitted.email != current.email;
        if immutable_changed {
            return Err(AuthError::ImmutableFieldChanged);
        }

        if changes.is_empty() {
            return Ok(current);
        }

        Ok(self.users.update(id, changes)?)
    }

    /// Delete an account and all of its login records.
    ///
    /// Self-service only. Records go first so a failure between the two
    /// store calls cannot leave orphaned logins behind.
    pub fn delete_user(&self, actor: &User, id: UserId) -> Result<(), AuthError> {
        let user = self
            .users
            .find(UserLookup::Id(id))?
            .ok_or(AuthError::NotVisible)?;

        if !policy::can_delete(actor, &user) {
            return Err(AuthError::NotVisible);
        }

        self.logins.delete_all_for(user.id)?;
        self.users.delete(user.id)?;

        tracing::info!(user_id = %user.id, "user deleted with login history");
        Ok(())
    }

    /// Run the recognition model over `image` and, when the claim holds,
    /// upgrade the actor's own role to celebrity.
    ///
    /// This is the single self-role-escalation path in the system; it
    /// intentionally bypasses the role-update policy.
    pub fn claim_celebrity(&self, actor: &User, image: &[u8]) -> Result<User, AuthError> {
        let prediction = self.classifier.predict(image)?;

        if !policy::can_claim_celebrity(actor, &prediction.name, prediction.confidence) {
            return Err(AuthError::UnrecognizedCelebrity);
        }

        let updated = self
            .users
            .update(actor.id, UserChanges::role(Role::Celebrity))?;

        tracing::info!(user_id = %updated.id, "celebrity role claimed");
        Ok(updated)
    }
}
