//! Shared session handle that applies provider results to the session state.

use std::future::Future;
use std::sync::{Arc, Weak};

use tokio::sync::Mutex;

use csadmin_auth::{
    NavigationEntry, NavigationTable, Permission, RouteName, Session, SessionState,
    SessionStatus,
};
use csadmin_notifications::NotificationQueue;

use crate::config::ClientConfig;
use crate::poller::{PollerHandle, SessionPoller};
use crate::provider::{AuthError, AuthProvider, Credentials, RemoteSessionStatus};

/// Session of one admin UI user.
///
/// Cheap to clone; clones share the same state. The session is only mutated
/// after a provider call has resolved, and each mutation is one assignment
/// under the session lock. Dropping the last clone stops the poller.
pub struct AdminSession<P> {
    inner: Arc<Inner<P>>,
}

pub(crate) struct Inner<P> {
    provider: P,
    session: Mutex<Session>,
    notifications: Arc<Mutex<NotificationQueue>>,
    table: NavigationTable,
    config: ClientConfig,
    poller: Mutex<Option<PollerHandle>>,
}

impl<P> Clone for AdminSession<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P: AuthProvider + 'static> AdminSession<P> {
    /// Create a session using the main menu as navigation table.
    pub fn new(provider: P, config: ClientConfig) -> Self {
        Self::with_table(provider, config, NavigationTable::main_tabs())
    }

    pub fn with_table(provider: P, config: ClientConfig, table: NavigationTable) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider,
                session: Mutex::new(Session::new()),
                notifications: Arc::new(Mutex::new(NotificationQueue::new())),
                table,
                config,
                poller: Mutex::new(None),
            }),
        }
    }

    /// Shared state without keeping it alive; used by the poller task.
    pub(crate) fn downgrade(&self) -> Weak<Inner<P>> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(inner: &Weak<Inner<P>>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn table(&self) -> &NavigationTable {
        &self.inner.table
    }

    /// Notifications shown alongside this session.
    pub fn notifications(&self) -> &Arc<Mutex<NotificationQueue>> {
        &self.inner.notifications
    }

    /// Log in and start liveness polling.
    ///
    /// On failure (including timeout) the session is left exactly as it was.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let user = match self.bounded(self.inner.provider.login(credentials)).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(username = %credentials.username, error = %e, "login failed");
                return Err(e);
            }
        };

        self.inner.session.lock().await.authenticate_profile(user.into_profile());
        self.start_polling().await;
        Ok(())
    }

    /// Stop polling, tell the provider, and clear the session. Idempotent.
    pub async fn logout(&self) {
        self.stop_polling().await;

        if let Err(e) = self.bounded(self.inner.provider.logout()).await {
            tracing::warn!(error = %e, "logout request failed; clearing local session anyway");
        }

        self.inner.session.lock().await.clear();
    }

    /// Re-derive the session from the server, e.g. after a reload.
    ///
    /// On failure the session is left untouched.
    pub async fn refresh_user_data(&self) -> Result<(), AuthError> {
        let user = self.bounded(self.inner.provider.fetch_user_data()).await?;
        self.inner.session.lock().await.authenticate_profile(user.into_profile());
        self.start_polling().await;
        Ok(())
    }

    /// Run one liveness check and return the resulting status.
    ///
    /// A failed check counts as expiry. The session is only demoted if it is
    /// still the same alive session that was checked.
    pub async fn check_session(&self) -> SessionStatus {
        let checked_login = {
            let session = self.inner.session.lock().await;
            if !session.is_session_alive() {
                return session.status();
            }
            session.state().authenticated_at()
        };

        let remote = self.bounded(self.inner.provider.fetch_session_status()).await;

        let mut session = self.inner.session.lock().await;
        let same_session =
            session.is_session_alive() && session.state().authenticated_at() == checked_login;

        match remote {
            Ok(RemoteSessionStatus::Alive) => {
                tracing::debug!("session still alive");
            }
            Ok(RemoteSessionStatus::Expired) if same_session => {
                session.mark_expired();
            }
            Err(e) if same_session => {
                tracing::warn!(error = %e, "session status check failed; treating as expired");
                session.mark_expired();
            }
            _ => {
                tracing::debug!("session changed during status check; ignoring result");
            }
        }

        session.status()
    }

    pub async fn snapshot(&self) -> SessionState {
        self.inner.session.lock().await.state().clone()
    }

    pub async fn status(&self) -> SessionStatus {
        self.inner.session.lock().await.status()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.session.lock().await.is_authenticated()
    }

    pub async fn is_session_alive(&self) -> bool {
        self.inner.session.lock().await.is_session_alive()
    }

    pub async fn has_permission(&self, permission: Permission) -> bool {
        self.inner.session.lock().await.access(&self.inner.table).has_permission(permission)
    }

    pub async fn reachable_entries(&self) -> Vec<NavigationEntry> {
        self.inner.session.lock().await.access(&self.inner.table).reachable_entries()
    }

    pub async fn first_reachable_entry(&self) -> Option<NavigationEntry> {
        self.inner.session.lock().await.access(&self.inner.table).first_reachable_entry()
    }

    pub async fn landing_route(&self) -> RouteName {
        self.inner.session.lock().await.access(&self.inner.table).landing_route()
    }

    /// Whether a liveness poller is currently running.
    pub async fn is_polling(&self) -> bool {
        self.inner.poller
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    async fn start_polling(&self) {
        let mut guard = self.inner.poller.lock().await;
        if let Some(previous) = guard.take() {
            previous.stop().await;
        }
        *guard = Some(SessionPoller::new(self).start());
    }

    async fn stop_polling(&self) {
        let handle = self.inner.poller.lock().await.take();
        if let Some(handle) = handle {
            handle.stop().await;
        }
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, AuthError>
    where
        F: Future<Output = Result<T, AuthError>>,
    {
        tokio::time::timeout(self.inner.config.request_timeout(), call)
            .await
            .map_err(|_| AuthError::Timeout)?
    }
}
