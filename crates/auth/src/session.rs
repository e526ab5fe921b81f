//! Client-side session record and its lifecycle.
//!
//! `Session` is the only way to change a `SessionState`. Each mutator builds
//! the next state in full and assigns it in one step, so a reader holding the
//! session never sees a username from one login paired with permissions from
//! another.
//!
//! ```text
//! Unauthenticated --authenticate--> Alive --mark_expired--> Expired
//!        ^                            |                        |
//!        +-----------clear------------+----------clear---------+
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::access::Access;
use crate::{NavigationTable, PermissionSet, Role};

/// Authentication status of the session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Unauthenticated,
    Alive,
    Expired,
}

impl core::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SessionStatus::Unauthenticated => write!(f, "unauthenticated"),
            SessionStatus::Alive => write!(f, "alive"),
            SessionStatus::Expired => write!(f, "expired"),
        }
    }
}

/// Identity and grants of a user as reported by the server at login.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    pub username: String,
    pub roles: Vec<Role>,
    pub permissions: PermissionSet,
}

/// Snapshot of the session.
///
/// # Invariants
/// - `permissions` and `roles` are non-empty only while `Alive`.
/// - `Unauthenticated` carries no username.
/// - `Expired` keeps the username for display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SessionState {
    status: SessionStatus,
    username: Option<String>,
    roles: Vec<Role>,
    permissions: PermissionSet,
    authenticated_at: Option<DateTime<Utc>>,
}

impl SessionState {
    fn alive(profile: UserProfile, at: DateTime<Utc>) -> Self {
        Self {
            status: SessionStatus::Alive,
            username: Some(profile.username),
            roles: profile.roles,
            permissions: profile.permissions,
            authenticated_at: Some(at),
        }
    }

    fn expired(username: Option<String>, authenticated_at: Option<DateTime<Utc>>) -> Self {
        Self {
            status: SessionStatus::Expired,
            username,
            authenticated_at,
            ..Self::default()
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_alive(&self) -> bool {
        self.status == SessionStatus::Alive
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Granted permissions. Empty unless the session is alive.
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub fn authenticated_at(&self) -> Option<DateTime<Utc>> {
        self.authenticated_at
    }
}

/// Session state manager.
///
/// Create one per user session and hand it (or a shared handle to it) to
/// whatever needs to read it; there is no process-wide instance.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    /// A fresh, unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful login. Replaces any previous state.
    pub fn authenticate(&mut self, username: impl Into<String>, granted: PermissionSet) {
        self.authenticate_profile(UserProfile {
            username: username.into(),
            roles: Vec::new(),
            permissions: granted,
        });
    }

    /// Record a successful login including the user's roles.
    pub fn authenticate_profile(&mut self, profile: UserProfile) {
        tracing::info!(
            username = %profile.username,
            permissions = profile.permissions.len(),
            roles = profile.roles.len(),
            "session authenticated"
        );
        self.state = SessionState::alive(profile, Utc::now());
    }

    /// Demote an alive session to expired. Idempotent.
    ///
    /// An unauthenticated session has nothing to expire and is left as is.
    pub fn mark_expired(&mut self) {
        match self.state.status {
            SessionStatus::Alive => {
                tracing::warn!(username = ?self.state.username, "session expired");
                let next =
                    SessionState::expired(self.state.username.clone(), self.state.authenticated_at);
                self.state = next;
            }
            SessionStatus::Expired => {}
            SessionStatus::Unauthenticated => {
                tracing::debug!("ignoring expiry of unauthenticated session");
            }
        }
    }

    /// Drop all authentication data. Idempotent, valid from any state.
    pub fn clear(&mut self) {
        if self.state.status != SessionStatus::Unauthenticated {
            tracing::info!(username = ?self.state.username, "session cleared");
        }
        self.state = SessionState::default();
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.status == SessionStatus::Alive
    }

    /// Whether the session is considered alive by the liveness poller.
    ///
    /// Currently identical to [`Session::is_authenticated`].
    pub fn is_session_alive(&self) -> bool {
        self.state.status == SessionStatus::Alive
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status
    }

    pub fn username(&self) -> Option<&str> {
        self.state.username()
    }

    pub fn roles(&self) -> &[Role] {
        self.state.roles()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Evaluate access against `table` for the current state.
    pub fn access<'a>(&'a self, table: &'a NavigationTable) -> Access<'a> {
        Access::new(&self.state, table)
    }
}
