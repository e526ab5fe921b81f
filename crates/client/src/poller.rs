//! Background session liveness polling.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use csadmin_auth::SessionStatus;

use crate::provider::AuthProvider;
use crate::session::{AdminSession, Inner};

/// Periodically checks whether the server still considers the session alive.
///
/// The task only holds a weak reference to the session; once every
/// `AdminSession` clone is gone it stops on its own.
pub struct SessionPoller<P> {
    session: Weak<Inner<P>>,
    period: Duration,
}

/// Handle to a running poller.
///
/// Dropping the handle signals shutdown without waiting for the task.
pub struct PollerHandle {
    shutdown: Arc<Notify>,
    join: JoinHandle<()>,
}

impl<P: AuthProvider + 'static> SessionPoller<P> {
    pub fn new(session: &AdminSession<P>) -> Self {
        Self {
            session: session.downgrade(),
            period: session.config().poll_interval(),
        }
    }

    /// Start polling.
    ///
    /// The first check happens one full interval after start. The task ends
    /// on shutdown or as soon as the session is no longer alive.
    pub fn start(self) -> PollerHandle {
        let shutdown = Arc::new(Notify::new());
        let signal = shutdown.clone();
        let Self { session, period } = self;

        let join = tokio::spawn(async move {
            tracing::info!(?period, "session poller started");

            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = signal.notified() => {
                        tracing::info!("session poller received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        let Some(live) = AdminSession::upgrade(&session) else {
                            tracing::info!("session dropped; stopping poller");
                            break;
                        };
                        let status = live.check_session().await;
                        if status != SessionStatus::Alive {
                            tracing::info!(%status, "session no longer alive; stopping poller");
                            break;
                        }
                    }
                }
            }

            tracing::info!("session poller stopped");
        });

        PollerHandle { shutdown, join }
    }
}

impl PollerHandle {
    /// Signal shutdown and wait for the task to finish.
    ///
    /// A check already in flight completes first, so the session is never
    /// touched by this poller once `stop` returns.
    pub async fn stop(mut self) {
        self.shutdown.notify_one();
        if let Err(e) = (&mut self.join).await {
            tracing::warn!(error = %e, "session poller task failed");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.shutdown.notify_one();
    }
}
