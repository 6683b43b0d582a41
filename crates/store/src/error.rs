//! Store failure model.
//!
//! These are infrastructure errors: the auth core propagates them opaquely
//! and never retries.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A unique constraint would be violated by the operation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The record targeted by an update/delete does not exist.
    #[error("record not found")]
    NotFound,

    /// The backing store is unusable (poisoned lock, lost connection).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}
