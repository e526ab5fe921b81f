//! `csadmin-core` — shared building blocks for the central server admin client.
//!
//! This crate contains no IO and no session logic; it only defines the error
//! model and identifiers that the other crates build on.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::NotificationId;
