//! `csadmin-auth` — session state and permission-gated navigation.
//!
//! Pure state and evaluation; no transport, no timers. The client crate
//! drives the lifecycle, this crate defines what each state allows.

pub mod access;
pub mod navigation;
pub mod permissions;
pub mod roles;
pub mod session;

pub use access::{authorize, Access, AuthorizationExplanation, AuthzError, DenialKind};
pub use navigation::{NavigationEntry, NavigationTable, RouteName};
pub use permissions::{Permission, PermissionSet, UnknownPermission};
pub use roles::Role;
pub use session::{Session, SessionState, SessionStatus, UserProfile};
