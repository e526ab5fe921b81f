//! `csadmin-client`
//!
//! **Responsibility:** drive the session lifecycle of the admin UI.
//!
//! This crate provides:
//! - The authentication collaborator contract (`AuthProvider`)
//! - Login, logout and user-data refresh flows that apply provider results to
//!   the session only after the remote call resolves
//! - A cancellable background poller that demotes the session on expiry
//!
//! Transport is not part of this crate; an `AuthProvider` implementation owns it.

pub mod config;
pub mod poller;
pub mod provider;
pub mod session;

pub use config::{ClientConfig, ConfigError};
pub use poller::{PollerHandle, SessionPoller};
pub use provider::{AuthError, AuthProvider, Credentials, RemoteSessionStatus, UserData};
pub use session::AdminSession;
