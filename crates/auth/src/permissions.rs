//! Permission catalog and granted permission sets.
//!
//! The catalog is closed: every capability the central server can grant is a
//! `Permission` variant with exactly one wire identifier. The server may still
//! send identifiers this build does not know; `PermissionSet` keeps those as
//! opaque members so that they round-trip, but they never unlock anything.

use core::str::FromStr;
use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A permission identifier that is not part of the catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown permission '{0}'")]
pub struct UnknownPermission(pub String);

macro_rules! permission_catalog {
    ($( $variant:ident => $name:literal ),+ $(,)?) => {
        /// Capability identifier shared with the central server.
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Permission {
            $( $variant ),+
        }

        impl Permission {
            /// Every catalog entry, in declaration order.
            pub const ALL: &'static [Permission] = &[ $( Permission::$variant ),+ ];

            /// Wire identifier, as sent by the server.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( Permission::$variant => $name ),+
                }
            }
        }

        impl FromStr for Permission {
            type Err = UnknownPermission;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $name => Ok(Permission::$variant), )+
                    other => Err(UnknownPermission(other.to_string())),
                }
            }
        }
    };
}

permission_catalog! {
    InitConfig => "INIT_CONFIG",
    SearchMembers => "SEARCH_MEMBERS",
    ViewMembers => "VIEW_MEMBERS",
    AddNewMember => "ADD_NEW_MEMBER",
    ViewMemberDetails => "VIEW_MEMBER_DETAILS",
    EditMemberNameAndAdminContact => "EDIT_MEMBER_NAME_AND_ADMIN_CONTACT",
    AddSecurityServerRegRequest => "ADD_SECURITY_SERVER_REG_REQUEST",
    MemberToGlobalGroupAddRemove => "MEMBER_TO_GLOBAL_GROUP_ADD_REMOVE",
    AddMemberSubsystem => "ADD_MEMBER_SUBSYSTEM",
    RemoveMemberSubsystem => "REMOVE_MEMBER_SUBSYSTEM",
    AddSecurityServerClientRegRequest => "ADD_SECURITY_SERVER_CLIENT_REG_REQUEST",
    StopOrContinueSecurityServerClientDataExchange => "STOP_OR_CONTINUE_SECURITY_SERVER_CLIENT_DATA_EXCHANGE",
    RemoveMemberFromSecurityServerClients => "REMOVE_MEMBER_FROM_SECURITY_SERVER_CLIENTS",
    DeleteMember => "DELETE_MEMBER",
    ViewSecurityServers => "VIEW_SECURITY_SERVERS",
    ViewSecurityServerDetails => "VIEW_SECURITY_SERVER_DETAILS",
    EditSecurityServerAddress => "EDIT_SECURITY_SERVER_ADDRESS",
    EditSecurityServerSecurityCategory => "EDIT_SECURITY_SERVER_SECURITY_CATEGORY",
    AddSecurityServerAuthCertRegRequest => "ADD_SECURITY_SERVER_AUTH_CERT_REG_REQUEST",
    DeleteSecurityServerAuthCert => "DELETE_SECURITY_SERVER_AUTH_CERT",
    DeleteSecurityServer => "DELETE_SECURITY_SERVER",
    ViewGlobalGroups => "VIEW_GLOBAL_GROUPS",
    AddGlobalGroup => "ADD_GLOBAL_GROUP",
    ViewGroupDetails => "VIEW_GROUP_DETAILS",
    EditGroupDescription => "EDIT_GROUP_DESCRIPTION",
    AddAndRemoveGroupMembers => "ADD_AND_REMOVE_GROUP_MEMBERS",
    DeleteGroup => "DELETE_GROUP",
    ViewCentralServices => "VIEW_CENTRAL_SERVICES",
    ViewCentralServiceDetails => "VIEW_CENTRAL_SERVICE_DETAILS",
    AddCentralService => "ADD_CENTRAL_SERVICE",
    EditImplementingService => "EDIT_IMPLEMENTING_SERVICE",
    RemoveCentralService => "REMOVE_CENTRAL_SERVICE",
    ViewApprovedCas => "VIEW_APPROVED_CAS",
    ViewApprovedCaDetails => "VIEW_APPROVED_CA_DETAILS",
    AddApprovedCa => "ADD_APPROVED_CA",
    EditApprovedCa => "EDIT_APPROVED_CA",
    DeleteApprovedCa => "DELETE_APPROVED_CA",
    ViewApprovedTsas => "VIEW_APPROVED_TSAS",
    ViewApprovedTsaDetails => "VIEW_APPROVED_TSA_DETAILS",
    AddApprovedTsa => "ADD_APPROVED_TSA",
    EditApprovedTsa => "EDIT_APPROVED_TSA",
    DeleteApprovedTsa => "DELETE_APPROVED_TSA",
    ViewManagementRequests => "VIEW_MANAGEMENT_REQUESTS",
    ViewManagementRequestDetails => "VIEW_MANAGEMENT_REQUEST_DETAILS",
    ConfirmAuthCertRegRequest => "CONFIRM_AUTH_CERT_REG_REQUEST",
    DeclineAuthCertRegRequest => "DECLINE_AUTH_CERT_REG_REQUEST",
    ConfirmSecurityServerClientRegRequest => "CONFIRM_SECURITY_SERVER_CLIENT_REG_REQUEST",
    DeclineSecurityServerClientRegRequest => "DECLINE_SECURITY_SERVER_CLIENT_REG_REQUEST",
    ViewMemberClasses => "VIEW_MEMBER_CLASSES",
    AddMemberClass => "ADD_MEMBER_CLASS",
    EditMemberClass => "EDIT_MEMBER_CLASS",
    DeleteMemberClass => "DELETE_MEMBER_CLASS",
    ViewSecurityCategories => "VIEW_SECURITY_CATEGORIES",
    AddSecurityCategory => "ADD_SECURITY_CATEGORY",
    EditSecurityCategory => "EDIT_SECURITY_CATEGORY",
    DeleteSecurityCategory => "DELETE_SECURITY_CATEGORY",
    ViewConfiguration => "VIEW_CONFIGURATION",
    EditManagementServicesAddress => "EDIT_MANAGEMENT_SERVICES_ADDRESS",
    EditSigningKeyAndCert => "EDIT_SIGNING_KEY_AND_CERT",
    ViewConfigurationManagement => "VIEW_CONFIGURATION_MANAGEMENT",
    ViewTrustedAnchors => "VIEW_TRUSTED_ANCHORS",
    UploadTrustedAnchor => "UPLOAD_TRUSTED_ANCHOR",
    DeleteTrustedAnchor => "DELETE_TRUSTED_ANCHOR",
    DownloadTrustedAnchor => "DOWNLOAD_TRUSTED_ANCHOR",
    ViewInternalConfigurationSource => "VIEW_INTERNAL_CONFIGURATION_SOURCE",
    ViewExternalConfigurationSource => "VIEW_EXTERNAL_CONFIGURATION_SOURCE",
    GenerateSourceAnchor => "GENERATE_SOURCE_ANCHOR",
    DownloadSourceAnchor => "DOWNLOAD_SOURCE_ANCHOR",
    UploadConfigurationPart => "UPLOAD_CONFIGURATION_PART",
    DownloadConfigurationPart => "DOWNLOAD_CONFIGURATION_PART",
    ActivateToken => "ACTIVATE_TOKEN",
    DeactivateToken => "DEACTIVATE_TOKEN",
    GenerateSigningKey => "GENERATE_SIGNING_KEY",
    ActivateSigningKey => "ACTIVATE_SIGNING_KEY",
    DeleteSigningKey => "DELETE_SIGNING_KEY",
    ViewSystemSettings => "VIEW_SYSTEM_SETTINGS",
    RegisterServiceProvider => "REGISTER_SERVICE_PROVIDER",
    BackupConfiguration => "BACKUP_CONFIGURATION",
    RestoreConfiguration => "RESTORE_CONFIGURATION",
    ViewVersion => "VIEW_VERSION",
    CreateApiKey => "CREATE_API_KEY",
    UpdateApiKey => "UPDATE_API_KEY",
    RevokeApiKey => "REVOKE_API_KEY",
    ViewApiKeys => "VIEW_API_KEYS",
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The set of permissions granted to a user by the server.
///
/// Identifiers outside the catalog are kept in `unrecognized` and are members
/// of the set for display purposes only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    known: BTreeSet<Permission>,
    unrecognized: BTreeSet<String>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from server-provided identifiers.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for name in names {
            set.insert_name(name.as_ref());
        }
        set
    }

    pub fn insert(&mut self, permission: Permission) -> bool {
        self.known.insert(permission)
    }

    /// Insert a raw identifier; returns `false` if it was already present.
    pub fn insert_name(&mut self, name: &str) -> bool {
        match name.parse::<Permission>() {
            Ok(p) => self.known.insert(p),
            Err(UnknownPermission(raw)) => {
                tracing::debug!(permission = %raw, "keeping unrecognized permission");
                self.unrecognized.insert(raw)
            }
        }
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.known.contains(&permission)
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty() && self.unrecognized.is_empty()
    }

    pub fn len(&self) -> usize {
        self.known.len() + self.unrecognized.len()
    }

    /// Catalog permissions in the set, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.known.iter().copied()
    }

    pub fn unrecognized(&self) -> impl Iterator<Item = &str> + '_ {
        self.unrecognized.iter().map(String::as_str)
    }

    /// All identifiers in the set, catalog entries first.
    pub fn names(&self) -> Vec<String> {
        self.known
            .iter()
            .map(|p| p.as_str().to_string())
            .chain(self.unrecognized.iter().cloned())
            .collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self {
            known: iter.into_iter().collect(),
            unrecognized: BTreeSet::new(),
        }
    }
}

impl<const N: usize> From<[Permission; N]> for PermissionSet {
    fn from(value: [Permission; N]) -> Self {
        value.into_iter().collect()
    }
}
