use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role name granted to a user by the central server.
///
/// Roles are informational on the client: navigation and guards are decided
/// by permissions alone. Names outside the known set are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const REGISTRATION_OFFICER: Role = Role(Cow::Borrowed("XROAD_REGISTRATION_OFFICER"));
    pub const SECURITY_OFFICER: Role = Role(Cow::Borrowed("XROAD_SECURITY_OFFICER"));
    pub const SYSTEM_ADMINISTRATOR: Role = Role(Cow::Borrowed("XROAD_SYSTEM_ADMINISTRATOR"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The roles the central server defines.
    pub fn known() -> [Role; 3] {
        [
            Self::REGISTRATION_OFFICER,
            Self::SECURITY_OFFICER,
            Self::SYSTEM_ADMINISTRATOR,
        ]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        Self::known().iter().any(|r| r == self)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
