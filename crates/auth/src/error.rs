//! Auth error taxonomy.
//!
//! Every variant is terminal for the current request; there are no internal
//! retries. Store and classifier failures pass through opaquely.

use thiserror::Error;

use userauth_picmodel::ClassifierError;
use userauth_store::StoreError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad username or password at login. Never reveals which.
    #[error("incorrect username or password")]
    InvalidCredentials,

    /// Malformed, tampered or expired token, or a subject that no longer
    /// maps to any user. All collapse to one kind on purpose.
    #[error("could not validate credentials")]
    InvalidToken,

    /// Registration conflict on the username. Reported before `EmailTaken`
    /// when both collide.
    #[error("username already exists")]
    UsernameTaken,

    /// Registration conflict on the email.
    #[error("email already exists")]
    EmailTaken,

    /// Policy denies visibility, or the target does not exist. One signal
    /// for both, so absence cannot be probed.
    #[error("resource does not exist or you are not authorized to access it")]
    NotVisible,

    /// Policy denies a specific mutation on a visible target.
    #[error("not permitted to modify this attribute")]
    NotPermitted,

    /// The update path only allows username and role changes.
    #[error("only username or role attributes may be modified")]
    ImmutableFieldChanged,

    /// The recognition claim did not match the user, or was not confident
    /// enough.
    #[error("recognition of the photo provided does not match the user name")]
    UnrecognizedCelebrity,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    /// Unexpected internal failure (hashing or token encoding).
    #[error("internal auth failure: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
