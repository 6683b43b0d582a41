//! `userauth-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod id;
pub mod record;
pub mod role;

pub use id::{LoginId, UserId};
pub use record::{LoginRecord, User};
pub use role::Role;
