//! `userauth-store` — persistence collaborator contracts.
//!
//! The auth core never owns record storage; it talks to these traits.
//! Each trait method is one serialized logical operation: implementations
//! are responsible for its atomicity (check-then-insert, check-then-update).
//! In-memory implementations back dev and tests.

pub mod error;
pub mod logins;
pub mod memory;
pub mod users;

pub use error::StoreError;
pub use logins::LoginStore;
pub use memory::{InMemoryLoginStore, InMemoryUserStore};
pub use users::{UserChanges, UserLookup, UserStore};
