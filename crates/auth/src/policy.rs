//! Access policy decisions.
//!
//! Pure total functions of `(actor, target)`: no I/O, no mutation, always a
//! boolean. Callers decide how a denial surfaces.

use userauth_core::{LoginRecord, Role, User};

/// What a visibility check is aimed at.
///
/// Explicit tagged dispatch; the two record kinds have different ownership
/// rules and nothing else in common.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    User(&'a User),
    Login(&'a LoginRecord),
}

/// Whether the actor may see every record in the system.
pub fn can_see_all(actor: &User) -> bool {
    actor.role == Role::Admin
}

/// Whether the actor may see one specific record.
///
/// Admins see everything; everyone else sees their own user record and
/// their own login records.
pub fn can_see_object(actor: &User, target: Target<'_>) -> bool {
    if actor.role == Role::Admin {
        return true;
    }

    match target {
        Target::User(user) => actor.id == user.id,
        Target::Login(login) => actor.id == login.user_id,
    }
}

/// Whether the actor may change the target's username.
pub fn can_update_username(actor: &User, target: &User) -> bool {
    actor.role == Role::Admin || actor.id == target.id
}

/// Whether the actor may change the target's role.
///
/// Admin only. Self-service role changes are denied even on one's own
/// record; the celebrity claim is the single exception, and it does not go
/// through this check.
pub fn can_update_role(actor: &User, _target: &User) -> bool {
    actor.role == Role::Admin
}

/// Whether the actor may delete the target account.
///
/// Self only. Admins may not delete other accounts; deletion is strictly
/// self-service.
pub fn can_delete(actor: &User, target: &User) -> bool {
    actor.id == target.id
}

/// Whether a recognition claim upgrades the actor to celebrity.
///
/// The claimed name must equal `"{name} {surname}"` exactly (case-sensitive,
/// single-space-joined) and the confidence must be strictly above 0.95.
pub fn can_claim_celebrity(actor: &User, claimed_name: &str, confidence: f64) -> bool {
    if actor.full_name() != claimed_name {
        return false;
    }

    confidence > 0.95
}
