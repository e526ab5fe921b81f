//! Contract with the authentication backend.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use csadmin_auth::{PermissionSet, Role, UserProfile};

/// Login credentials. The password is never logged or printed.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }
}

/// User data as returned by the server after login or on reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl UserData {
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            permissions: PermissionSet::from_names(&self.permissions),
            roles: self.roles.into_iter().map(Role::new).collect(),
            username: self.username,
        }
    }
}

/// Session validity as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteSessionStatus {
    Alive,
    Expired,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("request timed out")]
    Timeout,
}

/// Authentication collaborator.
///
/// Implementations own the transport (HTTP client, cookies, CSRF tokens).
/// Results are applied to the session by `AdminSession`, never by the provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<UserData, AuthError>;

    async fn logout(&self) -> Result<(), AuthError>;

    async fn fetch_session_status(&self) -> Result<RemoteSessionStatus, AuthError>;

    /// Re-read the current user's data, e.g. after a page reload.
    async fn fetch_user_data(&self) -> Result<UserData, AuthError>;
}
