//! Access evaluation over a session and a navigation table.
//!
//! Everything here is a pure function of the current `SessionState` and the
//! table. Results are recomputed on every call; callers re-query after they
//! mutate the session.

use serde::Serialize;
use thiserror::Error;

use crate::session::{SessionState, SessionStatus};
use crate::{NavigationEntry, NavigationTable, Permission, RouteName};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("session expired")]
    SessionExpired,

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(Permission),
}

/// Check a single permission against a session.
///
/// - No IO
/// - No panics
/// - Only an alive session can hold permissions
pub fn authorize(session: &SessionState, required: Permission) -> Result<(), AuthzError> {
    match session.status() {
        SessionStatus::Unauthenticated => Err(AuthzError::NotAuthenticated),
        SessionStatus::Expired => Err(AuthzError::SessionExpired),
        SessionStatus::Alive if session.permissions().contains(required) => Ok(()),
        SessionStatus::Alive => Err(AuthzError::Forbidden(required)),
    }
}

/// Read-only access view of a session.
#[derive(Debug, Clone, Copy)]
pub struct Access<'a> {
    session: &'a SessionState,
    table: &'a NavigationTable,
}

impl<'a> Access<'a> {
    pub fn new(session: &'a SessionState, table: &'a NavigationTable) -> Self {
        Self { session, table }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        authorize(self.session, permission).is_ok()
    }

    /// True iff at least one of `permissions` is held. An empty list is never satisfied.
    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.has_permission(*p))
    }

    /// Entries the session may open, in table order.
    pub fn reachable_entries(&self) -> Vec<NavigationEntry> {
        self.table
            .iter()
            .filter(|e| self.has_any_permission(e.required_permissions))
            .copied()
            .collect()
    }

    /// The first reachable entry in table order, used as the post-login target.
    pub fn first_reachable_entry(&self) -> Option<NavigationEntry> {
        self.table
            .iter()
            .find(|e| self.has_any_permission(e.required_permissions))
            .copied()
    }

    /// Where the router should send the user right now.
    ///
    /// `Login` when the session is not alive, `Forbidden` when it is alive but
    /// nothing in the table is reachable.
    pub fn landing_route(&self) -> RouteName {
        if !self.session.is_alive() {
            return RouteName::Login;
        }
        self.first_reachable_entry()
            .map(|e| e.destination)
            .unwrap_or(RouteName::Forbidden)
    }

    pub fn require(&self, permission: Permission) -> Result<(), AuthzError> {
        authorize(self.session, permission)
    }

    /// Explain why `required` is or is not granted.
    pub fn explain(&self, required: Permission) -> AuthorizationExplanation {
        explain_authorization(self.session, self.table, required)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision, for diagnostics views.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub required_permission: Permission,
    pub granted: bool,
    pub reason: String,
    pub session: SessionSummary,
    pub denial_reason: Option<DenialReason>,
}

/// What the session looked like when the decision was made.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub status: SessionStatus,
    pub username: Option<String>,
    pub roles: Vec<String>,
    pub effective_permissions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    NotAuthenticated,
    SessionExpired,
    MissingPermission,
}

fn explain_authorization(
    session: &SessionState,
    table: &NavigationTable,
    required: Permission,
) -> AuthorizationExplanation {
    let summary = SessionSummary {
        status: session.status(),
        username: session.username().map(str::to_string),
        roles: session.roles().iter().map(|r| r.as_str().to_string()).collect(),
        effective_permissions: session.permissions().names(),
    };

    let (reason, denial_reason) = match authorize(session, required) {
        Ok(()) => (format!("Session holds permission '{required}'"), None),
        Err(AuthzError::NotAuthenticated) => (
            "No user is logged in".to_string(),
            Some(DenialReason {
                kind: DenialKind::NotAuthenticated,
                message: "Permissions are only evaluated for an authenticated session".to_string(),
                suggestions: vec!["Log in".to_string()],
            }),
        ),
        Err(AuthzError::SessionExpired) => (
            format!(
                "Session of '{}' has expired",
                session.username().unwrap_or("unknown user")
            ),
            Some(DenialReason {
                kind: DenialKind::SessionExpired,
                message: "An expired session holds no permissions".to_string(),
                suggestions: vec!["Log in again to restore the granted permissions".to_string()],
            }),
        ),
        Err(AuthzError::Forbidden(missing)) => {
            let unlocks: Vec<&str> = table
                .iter()
                .filter(|e| e.required_permissions.contains(&missing))
                .map(|e| e.key)
                .collect();

            let mut suggestions = vec![format!(
                "Ask a system administrator for a role that grants '{missing}'"
            )];
            if !unlocks.is_empty() {
                suggestions.push(format!(
                    "Granting '{missing}' would also unlock: {}",
                    unlocks.join(", ")
                ));
            }

            (
                format!(
                    "Session does not hold permission '{missing}'. Current permissions: {:?}",
                    summary.effective_permissions
                ),
                Some(DenialReason {
                    kind: DenialKind::MissingPermission,
                    message: format!("Missing required permission: '{missing}'"),
                    suggestions,
                }),
            )
        }
    };

    AuthorizationExplanation {
        required_permission: required,
        granted: denial_reason.is_none(),
        reason,
        session: summary,
        denial_reason,
    }
}
