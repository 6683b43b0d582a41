//! `userauth-auth` — credential lifecycle and access policy.
//!
//! This crate is intentionally decoupled from HTTP and storage engines: it
//! talks to the `userauth-store` traits and is driven by whatever transport
//! layer is in use.

pub mod error;
pub mod gateway;
pub mod hasher;
pub mod policy;
pub mod service;
pub mod token;

pub use error::AuthError;
pub use gateway::{ResourceGateway, UserPatch};
pub use hasher::{hash_password, verify_password};
pub use policy::Target;
pub use service::{AuthService, NewUser};
pub use token::TokenCodec;
