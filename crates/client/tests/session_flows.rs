use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use csadmin_auth::{Permission, RouteName, Session, SessionStatus};
use csadmin_client::{
    AdminSession, AuthError, AuthProvider, ClientConfig, ConfigError, Credentials,
    RemoteSessionStatus, UserData,
};

struct FakeState {
    login: Mutex<Result<UserData, AuthError>>,
    user_data: Mutex<Result<UserData, AuthError>>,
    status: Mutex<Result<RemoteSessionStatus, AuthError>>,
    logout: Mutex<Result<(), AuthError>>,
    login_delay: Mutex<Duration>,
    status_gate: Mutex<Option<Arc<Notify>>>,
    status_checks: AtomicUsize,
    logouts: AtomicUsize,
}

/// In-memory provider; clones share state so tests can steer it after handing it over.
#[derive(Clone)]
struct FakeProvider {
    inner: Arc<FakeState>,
}

impl FakeProvider {
    fn new(user: UserData) -> Self {
        Self {
            inner: Arc::new(FakeState {
                login: Mutex::new(Ok(user.clone())),
                user_data: Mutex::new(Ok(user)),
                status: Mutex::new(Ok(RemoteSessionStatus::Alive)),
                logout: Mutex::new(Ok(())),
                login_delay: Mutex::new(Duration::ZERO),
                status_gate: Mutex::new(None),
                status_checks: AtomicUsize::new(0),
                logouts: AtomicUsize::new(0),
            }),
        }
    }

    fn set_login(&self, result: Result<UserData, AuthError>) {
        *self.inner.login.lock().unwrap() = result;
    }

    fn set_user_data(&self, result: Result<UserData, AuthError>) {
        *self.inner.user_data.lock().unwrap() = result;
    }

    fn set_status(&self, result: Result<RemoteSessionStatus, AuthError>) {
        *self.inner.status.lock().unwrap() = result;
    }

    fn set_logout(&self, result: Result<(), AuthError>) {
        *self.inner.logout.lock().unwrap() = result;
    }

    fn set_login_delay(&self, delay: Duration) {
        *self.inner.login_delay.lock().unwrap() = delay;
    }

    /// Hold every status call until the returned gate is notified.
    fn hold_status(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.inner.status_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    fn status_checks(&self) -> usize {
        self.inner.status_checks.load(Ordering::SeqCst)
    }

    fn logouts(&self) -> usize {
        self.inner.logouts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthProvider for FakeProvider {
    async fn login(&self, _credentials: &Credentials) -> Result<UserData, AuthError> {
        let delay = *self.inner.login_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.inner.login.lock().unwrap().clone()
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.inner.logouts.fetch_add(1, Ordering::SeqCst);
        self.inner.logout.lock().unwrap().clone()
    }

    async fn fetch_session_status(&self) -> Result<RemoteSessionStatus, AuthError> {
        self.inner.status_checks.fetch_add(1, Ordering::SeqCst);
        let gate = self.inner.status_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.inner.status.lock().unwrap().clone()
    }

    async fn fetch_user_data(&self) -> Result<UserData, AuthError> {
        self.inner.user_data.lock().unwrap().clone()
    }
}

fn officer() -> UserData {
    UserData {
        username: "officer".to_string(),
        roles: vec!["XROAD_SECURITY_OFFICER".to_string()],
        permissions: vec![
            "VIEW_APPROVED_CAS".to_string(),
            "VIEW_SYSTEM_SETTINGS".to_string(),
        ],
    }
}

fn credentials() -> Credentials {
    Credentials::new("officer", "secret")
}

fn fast_config() -> ClientConfig {
    ClientConfig::default()
        .with_poll_interval(Duration::from_millis(10))
        .and_then(|config| config.with_request_timeout(Duration::from_millis(200)))
        .unwrap()
}

fn setup(config: ClientConfig) -> (FakeProvider, AdminSession<FakeProvider>) {
    let provider = FakeProvider::new(officer());
    let admin = AdminSession::new(provider.clone(), config);
    (provider, admin)
}

async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

fn keys(entries: &[csadmin_auth::NavigationEntry]) -> Vec<&'static str> {
    entries.iter().map(|e| e.key).collect()
}

#[tokio::test]
async fn login_authenticates_and_picks_landing_tab() {
    let (_provider, admin) = setup(ClientConfig::default());

    admin.login(&credentials()).await.unwrap();

    assert!(admin.is_authenticated().await);
    assert!(admin.is_session_alive().await);
    assert_eq!(keys(&admin.reachable_entries().await), vec!["trustServices", "settings"]);
    assert_eq!(
        admin.first_reachable_entry().await.map(|e| e.destination),
        Some(RouteName::TrustServices)
    );
    assert_eq!(admin.landing_route().await, RouteName::TrustServices);
    assert!(admin.has_permission(Permission::ViewApprovedCas).await);
    assert!(!admin.has_permission(Permission::ViewMembers).await);
    assert_eq!(admin.snapshot().await.roles().len(), 1);
    assert!(admin.is_polling().await);

    admin.logout().await;
}

#[tokio::test]
async fn failed_login_leaves_session_untouched() {
    let (provider, admin) = setup(ClientConfig::default());
    provider.set_login(Err(AuthError::InvalidCredentials));

    let err = admin.login(&credentials()).await.unwrap_err();

    assert_eq!(err, AuthError::InvalidCredentials);
    assert_eq!(&admin.snapshot().await, Session::new().state());
    assert_eq!(admin.landing_route().await, RouteName::Login);
    assert!(!admin.is_polling().await);
}

#[tokio::test]
async fn failed_relogin_keeps_previous_session() {
    let (provider, admin) = setup(ClientConfig::default());
    admin.login(&credentials()).await.unwrap();
    let before = admin.snapshot().await;

    provider.set_login(Err(AuthError::Network("connection reset".to_string())));
    assert!(admin.login(&credentials()).await.is_err());

    assert_eq!(admin.snapshot().await, before);
    admin.logout().await;
}

#[tokio::test]
async fn slow_login_times_out_without_side_effects() {
    let config = ClientConfig::default()
        .with_request_timeout(Duration::from_millis(20))
        .unwrap();
    let (provider, admin) = setup(config);
    provider.set_login_delay(Duration::from_millis(500));

    let err = admin.login(&credentials()).await.unwrap_err();

    assert_eq!(err, AuthError::Timeout);
    assert_eq!(admin.status().await, SessionStatus::Unauthenticated);
}

#[tokio::test]
async fn remote_expiry_demotes_session() {
    let (provider, admin) = setup(ClientConfig::default());
    admin.login(&credentials()).await.unwrap();

    provider.set_status(Ok(RemoteSessionStatus::Expired));
    assert_eq!(admin.check_session().await, SessionStatus::Expired);

    let state = admin.snapshot().await;
    assert_eq!(state.username(), Some("officer"));
    assert!(state.permissions().is_empty());
    assert!(!admin.is_authenticated().await);
    assert!(admin.reachable_entries().await.is_empty());
    assert_eq!(admin.first_reachable_entry().await, None);
    assert_eq!(admin.landing_route().await, RouteName::Login);

    admin.logout().await;
}

#[tokio::test]
async fn failed_status_check_counts_as_expiry() {
    let (provider, admin) = setup(ClientConfig::default());
    admin.login(&credentials()).await.unwrap();

    provider.set_status(Err(AuthError::Api(500, "internal error".to_string())));

    assert_eq!(admin.check_session().await, SessionStatus::Expired);
    admin.logout().await;
}

#[tokio::test]
async fn alive_status_check_keeps_session() {
    let (provider, admin) = setup(ClientConfig::default());
    admin.login(&credentials()).await.unwrap();

    assert_eq!(admin.check_session().await, SessionStatus::Alive);
    assert_eq!(provider.status_checks(), 1);
    admin.logout().await;
}

#[tokio::test]
async fn logout_during_status_check_keeps_session_cleared() {
    let (provider, admin) = setup(ClientConfig::default());
    admin.login(&credentials()).await.unwrap();
    provider.set_status(Ok(RemoteSessionStatus::Expired));
    let gate = provider.hold_status();

    let check = tokio::spawn({
        let admin = admin.clone();
        async move { admin.check_session().await }
    });
    let p = &provider;
    assert!(eventually(|| async move { p.status_checks() == 1 }).await);

    admin.logout().await;
    gate.notify_one();

    assert_eq!(check.await.unwrap(), SessionStatus::Unauthenticated);
    assert_eq!(&admin.snapshot().await, Session::new().state());
}

#[tokio::test]
async fn relogin_during_status_check_keeps_new_login() {
    let (provider, admin) = setup(ClientConfig::default());
    admin.login(&credentials()).await.unwrap();
    provider.set_status(Err(AuthError::Network("connection reset".to_string())));
    let gate = provider.hold_status();

    let check = tokio::spawn({
        let admin = admin.clone();
        async move { admin.check_session().await }
    });
    let p = &provider;
    assert!(eventually(|| async move { p.status_checks() == 1 }).await);

    provider.set_login(Ok(UserData {
        username: "admin".to_string(),
        roles: vec!["XROAD_SYSTEM_ADMINISTRATOR".to_string()],
        permissions: vec!["VIEW_MEMBERS".to_string()],
    }));
    admin.login(&Credentials::new("admin", "secret")).await.unwrap();
    gate.notify_one();

    assert_eq!(check.await.unwrap(), SessionStatus::Alive);
    assert_eq!(admin.snapshot().await.username(), Some("admin"));
    assert_eq!(admin.landing_route().await, RouteName::Members);
    admin.logout().await;
}

#[tokio::test]
async fn status_check_skips_provider_without_session() {
    let (provider, admin) = setup(ClientConfig::default());

    assert_eq!(admin.check_session().await, SessionStatus::Unauthenticated);
    assert_eq!(provider.status_checks(), 0);
}

#[tokio::test]
async fn poller_expires_session_in_background() {
    let (provider, admin) = setup(fast_config());
    admin.login(&credentials()).await.unwrap();

    provider.set_status(Ok(RemoteSessionStatus::Expired));

    let a = &admin;
    assert!(eventually(|| async move { a.status().await == SessionStatus::Expired }).await);
    assert!(eventually(|| async move { !a.is_polling().await }).await);
    assert_eq!(admin.snapshot().await.username(), Some("officer"));
}

#[tokio::test]
async fn poller_keeps_checking_alive_session() {
    let (provider, admin) = setup(fast_config());
    admin.login(&credentials()).await.unwrap();

    let p = &provider;
    assert!(eventually(|| async move { p.status_checks() >= 3 }).await);
    assert!(admin.is_session_alive().await);

    admin.logout().await;
}

#[tokio::test]
async fn dropping_every_handle_stops_polling() {
    let (provider, admin) = setup(fast_config());
    admin.login(&credentials()).await.unwrap();
    let p = &provider;
    assert!(eventually(|| async move { p.status_checks() >= 1 }).await);

    drop(admin);
    tokio::time::sleep(Duration::from_millis(20)).await;
    let checks = provider.status_checks();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(provider.status_checks(), checks);
}

#[test]
fn zero_poll_interval_is_rejected() {
    let err = ClientConfig::default()
        .with_poll_interval(Duration::ZERO)
        .unwrap_err();

    assert_eq!(
        err,
        ConfigError::ZeroDuration {
            field: "poll_interval"
        }
    );
}

#[tokio::test]
async fn logout_stops_polling_and_clears_session() {
    let (provider, admin) = setup(fast_config());
    admin.login(&credentials()).await.unwrap();

    admin.logout().await;
    let checks = provider.status_checks();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(provider.status_checks(), checks);
    assert!(!admin.is_polling().await);
    assert_eq!(&admin.snapshot().await, Session::new().state());
    assert_eq!(provider.logouts(), 1);

    admin.logout().await;
    assert_eq!(admin.status().await, SessionStatus::Unauthenticated);
}

#[tokio::test]
async fn logout_clears_even_when_provider_fails() {
    let (provider, admin) = setup(ClientConfig::default());
    admin.login(&credentials()).await.unwrap();
    provider.set_logout(Err(AuthError::Network("unreachable".to_string())));

    admin.logout().await;

    assert_eq!(admin.status().await, SessionStatus::Unauthenticated);
    assert_eq!(admin.snapshot().await.username(), None);
}

#[tokio::test]
async fn refresh_user_data_restores_expired_session() {
    let (provider, admin) = setup(ClientConfig::default());
    admin.login(&credentials()).await.unwrap();
    provider.set_status(Ok(RemoteSessionStatus::Expired));
    admin.check_session().await;

    provider.set_user_data(Err(AuthError::Network("offline".to_string())));
    assert!(admin.refresh_user_data().await.is_err());
    assert_eq!(admin.status().await, SessionStatus::Expired);

    provider.set_user_data(Ok(UserData {
        username: "officer".to_string(),
        roles: Vec::new(),
        permissions: vec!["VIEW_MEMBERS".to_string()],
    }));
    admin.refresh_user_data().await.unwrap();

    assert!(admin.is_authenticated().await);
    assert_eq!(admin.landing_route().await, RouteName::Members);
    admin.logout().await;
}

#[tokio::test]
async fn notifications_are_shared_between_clones() {
    let (_provider, admin) = setup(ClientConfig::default());
    let other = admin.clone();

    let id = admin.notifications().lock().await.push_success("Member added");
    assert_eq!(other.notifications().lock().await.successes()[0].id, id);

    other.notifications().lock().await.dismiss(id);
    assert!(admin.notifications().lock().await.is_empty());
}
