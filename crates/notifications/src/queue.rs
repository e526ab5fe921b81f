use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use csadmin_core::NotificationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Error attached to a notification for diagnostic display.
///
/// Opaque to the queue: it is stored and handed back, never inspected.
#[derive(Debug, Clone)]
pub struct RelatedError(Arc<anyhow::Error>);

impl RelatedError {
    pub fn new(error: anyhow::Error) -> Self {
        Self(Arc::new(error))
    }

    pub fn error(&self) -> &anyhow::Error {
        &self.0
    }
}

impl From<anyhow::Error> for RelatedError {
    fn from(value: anyhow::Error) -> Self {
        Self::new(value)
    }
}

impl core::fmt::Display for RelatedError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#}", self.0)
    }
}

impl Serialize for RelatedError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub related_error: Option<RelatedError>,
    pub created_at: DateTime<Utc>,
}

/// Success and error notifications in insertion order.
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    successes: Vec<Notification>,
    errors: Vec<Notification>,
    continue_init: bool,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_success(&mut self, message: impl Into<String>) -> NotificationId {
        let notification = Self::build(NotificationKind::Success, message.into(), None);
        let id = notification.id;
        self.successes.push(notification);
        id
    }

    pub fn push_error(
        &mut self,
        message: impl Into<String>,
        related_error: Option<anyhow::Error>,
    ) -> NotificationId {
        let notification = Self::build(
            NotificationKind::Error,
            message.into(),
            related_error.map(RelatedError::new),
        );
        let id = notification.id;
        tracing::debug!(%id, message = %notification.message, "error notification");
        self.errors.push(notification);
        id
    }

    /// Push an error whose message is the error's own context chain.
    pub fn push_error_object(&mut self, error: anyhow::Error) -> NotificationId {
        let message = format!("{error:#}");
        self.push_error(message, Some(error))
    }

    /// Remove a notification of either kind. Unknown ids are ignored.
    pub fn dismiss(&mut self, id: NotificationId) {
        self.successes.retain(|n| n.id != id);
        self.errors.retain(|n| n.id != id);
    }

    /// Clear everything, e.g. when navigating away from an error-bearing view.
    pub fn reset_all(&mut self) {
        self.successes.clear();
        self.errors.clear();
        self.continue_init = false;
    }

    pub fn successes(&self) -> &[Notification] {
        &self.successes
    }

    pub fn errors(&self) -> &[Notification] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.successes.is_empty() && self.errors.is_empty()
    }

    /// Set by the initialization wizard once the user may proceed past a warning.
    pub fn set_continue_init(&mut self, value: bool) {
        self.continue_init = value;
    }

    pub fn continue_init(&self) -> bool {
        self.continue_init
    }

    fn build(
        kind: NotificationKind,
        message: String,
        related_error: Option<RelatedError>,
    ) -> Notification {
        Notification {
            id: NotificationId::new(),
            kind,
            message,
            related_error,
            created_at: Utc::now(),
        }
    }
}
