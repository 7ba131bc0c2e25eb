//! Permission identifiers and the static permission catalog.
//!
//! All permission literals used anywhere in the client live here. No other
//! component may hardcode a permission string.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are modeled as opaque strings (e.g. `"MANAGE_TEAM_MEMBERS"`)
/// matching what the backend grants on the principal. Membership checks are
/// flat-set lookups; the identifier carries no structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

/// Canonical permission identifiers granted by the CRM backend.
pub mod perms {
    pub const VIEW_OWN_LEADS: &str = "VIEW_OWN_LEADS";
    pub const VIEW_ALL_LEADS: &str = "VIEW_ALL_LEADS";
    pub const MANAGE_LEADS: &str = "MANAGE_LEADS";
    pub const VIEW_PROPERTIES: &str = "VIEW_PROPERTIES";
    pub const MANAGE_PROPERTIES: &str = "MANAGE_PROPERTIES";
    pub const VIEW_AGENTS: &str = "VIEW_AGENTS";
    pub const MANAGE_AGENTS: &str = "MANAGE_AGENTS";
    pub const MANAGE_TEAM_MEMBERS: &str = "MANAGE_TEAM_MEMBERS";
    pub const VIEW_DEPARTMENTS: &str = "VIEW_DEPARTMENTS";
    pub const MANAGE_DEPARTMENTS: &str = "MANAGE_DEPARTMENTS";
    pub const MANAGE_ROLES: &str = "MANAGE_ROLES";
    pub const VIEW_REPORTS: &str = "VIEW_REPORTS";
    pub const MANAGE_SUBSCRIPTIONS: &str = "MANAGE_SUBSCRIPTIONS";
}

/// One row of the permission catalog.
///
/// `described_roles` is documentation of which roles the backend typically
/// grants the permission to; it is **never** consulted by membership checks
/// (non-superuser access is decided purely against the principal's granted
/// set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub identifier: &'static str,
    pub described_roles: &'static [&'static str],
    /// Human-readable label for admin/role-management screens.
    pub label: &'static str,
    /// Grouping key for admin/role-management screens.
    pub group: &'static str,
}

use crate::roles::role_names as r;

/// Static catalog, built once, never mutated at runtime.
pub const PERMISSION_CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        identifier: perms::VIEW_OWN_LEADS,
        described_roles: &[r::AGENT, r::TEAM_LEADER, r::BRANCH_MANAGER, r::REGIONAL_MANAGER],
        label: "View own leads",
        group: "Leads",
    },
    CatalogEntry {
        identifier: perms::VIEW_ALL_LEADS,
        described_roles: &[r::BRANCH_MANAGER, r::REGIONAL_MANAGER],
        label: "View all leads",
        group: "Leads",
    },
    CatalogEntry {
        identifier: perms::MANAGE_LEADS,
        described_roles: &[r::TEAM_LEADER, r::BRANCH_MANAGER, r::REGIONAL_MANAGER],
        label: "Manage leads",
        group: "Leads",
    },
    CatalogEntry {
        identifier: perms::VIEW_PROPERTIES,
        described_roles: &[r::AGENT, r::TEAM_LEADER, r::BRANCH_MANAGER, r::REGIONAL_MANAGER],
        label: "View properties",
        group: "Properties",
    },
    CatalogEntry {
        identifier: perms::MANAGE_PROPERTIES,
        described_roles: &[r::BRANCH_MANAGER, r::REGIONAL_MANAGER],
        label: "Manage properties",
        group: "Properties",
    },
    CatalogEntry {
        identifier: perms::VIEW_AGENTS,
        described_roles: &[r::TEAM_LEADER, r::BRANCH_MANAGER, r::REGIONAL_MANAGER],
        label: "View agents",
        group: "People",
    },
    CatalogEntry {
        identifier: perms::MANAGE_AGENTS,
        described_roles: &[r::BRANCH_MANAGER, r::REGIONAL_MANAGER],
        label: "Manage agents",
        group: "People",
    },
    CatalogEntry {
        identifier: perms::MANAGE_TEAM_MEMBERS,
        described_roles: &[r::TEAM_LEADER, r::BRANCH_MANAGER, r::REGIONAL_MANAGER],
        label: "Manage team members",
        group: "People",
    },
    CatalogEntry {
        identifier: perms::VIEW_DEPARTMENTS,
        described_roles: &[r::BRANCH_MANAGER, r::REGIONAL_MANAGER],
        label: "View departments",
        group: "Organization",
    },
    CatalogEntry {
        identifier: perms::MANAGE_DEPARTMENTS,
        described_roles: &[r::REGIONAL_MANAGER],
        label: "Manage departments",
        group: "Organization",
    },
    CatalogEntry {
        identifier: perms::MANAGE_ROLES,
        described_roles: &[r::REGIONAL_MANAGER],
        label: "Manage roles",
        group: "Organization",
    },
    CatalogEntry {
        identifier: perms::VIEW_REPORTS,
        described_roles: &[r::TEAM_LEADER, r::BRANCH_MANAGER, r::REGIONAL_MANAGER],
        label: "View reports",
        group: "Reporting",
    },
    CatalogEntry {
        identifier: perms::MANAGE_SUBSCRIPTIONS,
        described_roles: &[],
        label: "Manage subscriptions",
        group: "Billing",
    },
];

/// Look up a catalog entry by identifier.
pub fn catalog_entry(identifier: &str) -> Option<&'static CatalogEntry> {
    PERMISSION_CATALOG.iter().find(|e| e.identifier == identifier)
}
