//! Navigation table: the sections of the admin UI and what unlocks them.
//!
//! The table is static data. Entry order matters: the first entry a user can
//! reach is where they land after login.

use std::borrow::Cow;
use std::collections::HashSet;

use serde::{Serialize, Serializer};

use csadmin_core::{DomainError, DomainResult};

use crate::Permission;

/// Route destinations of the admin UI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RouteName {
    BaseRoute,
    Members,
    MemberDetails,
    MemberManagementRequests,
    MemberSubsystems,
    SecurityServers,
    ManagementRequests,
    TrustServices,
    Settings,
    GlobalResources,
    GlobalGroup,
    SystemSettings,
    BackupAndRestore,
    ApiKeys,
    CreateApiKey,
    InternalConfiguration,
    ExternalConfiguration,
    TrustedAnchors,
    Login,
    Initialisation,
    SecurityServerDetails,
    SecurityServerManagementRequests,
    SecurityServerAuthenticationCertificates,
    SecurityServerClients,
    Forbidden,
}

impl RouteName {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RouteName::BaseRoute => "base",
            RouteName::Members => "members",
            RouteName::MemberDetails => "member-details",
            RouteName::MemberManagementRequests => "member-management-requests",
            RouteName::MemberSubsystems => "member-subsystems",
            RouteName::SecurityServers => "security-servers",
            RouteName::ManagementRequests => "management-requests",
            RouteName::TrustServices => "trust-services",
            RouteName::Settings => "settings",
            RouteName::GlobalResources => "global-resources",
            RouteName::GlobalGroup => "global-group",
            RouteName::SystemSettings => "system-settings",
            RouteName::BackupAndRestore => "backup-and-restore",
            RouteName::ApiKeys => "api-keys",
            RouteName::CreateApiKey => "create-api-key",
            RouteName::InternalConfiguration => "internal-configuration",
            RouteName::ExternalConfiguration => "external-configuration",
            RouteName::TrustedAnchors => "trusted-anchors",
            RouteName::Login => "login",
            RouteName::Initialisation => "init",
            RouteName::SecurityServerDetails => "security-server-details",
            RouteName::SecurityServerManagementRequests => "security-server-management-requests",
            RouteName::SecurityServerAuthenticationCertificates => {
                "security-server-authentication-certificates"
            }
            RouteName::SecurityServerClients => "security-server-clients",
            RouteName::Forbidden => "forbidden",
        }
    }
}

impl core::fmt::Display for RouteName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RouteName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A navigation destination gated by permissions.
///
/// The entry is reachable when **any** of `required_permissions` is held.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationEntry {
    pub destination: RouteName,
    /// Stable identifier of the entry (unique within a table).
    pub key: &'static str,
    /// Localization key of the label.
    pub name: &'static str,
    pub required_permissions: &'static [Permission],
}

impl NavigationEntry {
    pub const fn new(
        destination: RouteName,
        key: &'static str,
        name: &'static str,
        required_permissions: &'static [Permission],
    ) -> Self {
        Self {
            destination,
            key,
            name,
            required_permissions,
        }
    }
}

const MAIN_TABS: [NavigationEntry; 6] = [
    NavigationEntry::new(
        RouteName::Members,
        "members",
        "tab.main.members",
        &[
            Permission::ViewMembers,
            Permission::ViewMemberDetails,
            Permission::SearchMembers,
        ],
    ),
    NavigationEntry::new(
        RouteName::SecurityServers,
        "keys",
        "tab.main.securityServers",
        &[
            Permission::ViewSecurityServers,
            Permission::ViewSecurityServerDetails,
        ],
    ),
    NavigationEntry::new(
        RouteName::ManagementRequests,
        "managementRequests",
        "tab.main.managementRequests",
        &[
            Permission::ViewManagementRequests,
            Permission::ViewManagementRequestDetails,
        ],
    ),
    NavigationEntry::new(
        RouteName::TrustServices,
        "trustServices",
        "tab.main.trustServices",
        &[Permission::ViewApprovedCas, Permission::ViewApprovedTsas],
    ),
    NavigationEntry::new(
        RouteName::InternalConfiguration,
        "globalConfiguration",
        "tab.main.globalConfiguration",
        &[
            Permission::ViewConfigurationManagement,
            Permission::ViewExternalConfigurationSource,
            Permission::ViewInternalConfigurationSource,
        ],
    ),
    // Settings opens on its first child view.
    NavigationEntry::new(
        RouteName::GlobalResources,
        "settings",
        "tab.main.settings",
        &[Permission::ViewSystemSettings],
    ),
];

/// Ordered, validated list of navigation entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTable {
    entries: Cow<'static, [NavigationEntry]>,
}

impl NavigationTable {
    /// Build a table, rejecting entries without requirements and duplicate keys.
    pub fn new(entries: Vec<NavigationEntry>) -> DomainResult<Self> {
        validate(&entries)?;
        Ok(Self {
            entries: Cow::Owned(entries),
        })
    }

    /// The main menu of the central server admin UI.
    pub fn main_tabs() -> Self {
        Self {
            entries: Cow::Borrowed(&MAIN_TABS),
        }
    }

    pub fn entries(&self) -> &[NavigationEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &NavigationEntry> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&NavigationEntry> {
        self.entries.iter().find(|e| e.key == key)
    }
}

impl Default for NavigationTable {
    fn default() -> Self {
        Self::main_tabs()
    }
}

fn validate(entries: &[NavigationEntry]) -> DomainResult<()> {
    let mut keys = HashSet::new();
    for entry in entries {
        if entry.required_permissions.is_empty() {
            return Err(DomainError::invariant(format!(
                "navigation entry '{}' has no required permissions",
                entry.key
            )));
        }
        if !keys.insert(entry.key) {
            return Err(DomainError::invariant(format!(
                "duplicate navigation key '{}'",
                entry.key
            )));
        }
    }
    Ok(())
}
