//! Role identifiers, the organizational hierarchy, and role display rules.
//!
//! All role literals used anywhere in the client live here, together with
//! the role → level and role → default landing area tables.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier.
///
/// Roles are opaque strings at this layer. The fixed set the backend issues
/// is enumerated in [`role_names`]; an unknown role still produces a usable
/// [`role_label`] and a zero [`role_level`] rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Superuser roles bypass every role and permission check.
    ///
    /// This is the single definition of the override; evaluator, gate, and
    /// guard all route through it.
    pub fn is_superuser(&self) -> bool {
        matches!(self.as_str(), role_names::ADMIN | role_names::FOUNDING_MEMBER)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Role {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

/// Canonical role identifiers issued by the CRM backend.
pub mod role_names {
    pub const ADMIN: &str = "admin";
    pub const FOUNDING_MEMBER: &str = "founding_member";
    pub const REGIONAL_MANAGER: &str = "regional_manager";
    pub const BRANCH_MANAGER: &str = "branch_manager";
    pub const TEAM_LEADER: &str = "team_leader";
    pub const AGENT: &str = "agent";
}

/// One row of the role table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RoleDef {
    name: &'static str,
    /// Rank in the organizational hierarchy; higher is more senior.
    level: i32,
    label: &'static str,
    /// Default landing area after sign-in or an authorization redirect.
    landing_area: &'static str,
}

/// Landing area for roles with no entry in the role table.
pub const DEFAULT_LANDING_AREA: &str = "/dashboard";

const ROLE_TABLE: &[RoleDef] = &[
    RoleDef {
        name: role_names::ADMIN,
        level: 10,
        label: "Administrator",
        landing_area: "/admin",
    },
    RoleDef {
        name: role_names::FOUNDING_MEMBER,
        level: 9,
        label: "Founding Member",
        landing_area: "/admin",
    },
    RoleDef {
        name: role_names::REGIONAL_MANAGER,
        level: 7,
        label: "Regional Manager",
        landing_area: "/manager",
    },
    RoleDef {
        name: role_names::BRANCH_MANAGER,
        level: 5,
        label: "Branch Manager",
        landing_area: "/manager",
    },
    RoleDef {
        name: role_names::TEAM_LEADER,
        level: 3,
        label: "Team Leader",
        landing_area: "/agent",
    },
    RoleDef {
        name: role_names::AGENT,
        level: 1,
        label: "Agent",
        landing_area: "/agent",
    },
];

fn role_def(role: &Role) -> Option<&'static RoleDef> {
    ROLE_TABLE.iter().find(|d| d.name == role.as_str())
}

/// Numeric rank of a role in the hierarchy; `0` for unknown roles.
pub fn role_level(role: &Role) -> i32 {
    role_def(role).map_or(0, |d| d.level)
}

/// Human-readable label for a role.
///
/// Total over arbitrary role strings: an identifier unknown to the table is
/// title-cased (`"unknown_role_x"` → `"Unknown Role X"`) rather than
/// failing.
pub fn role_label(role: &Role) -> String {
    match role_def(role) {
        Some(def) => def.label.to_string(),
        None => title_case(role.as_str()),
    }
}

/// Default landing area for a role, with an explicit default for roles not
/// in the table.
pub fn default_landing_area(role: &Role) -> &'static str {
    role_def(role).map_or(DEFAULT_LANDING_AREA, |d| d.landing_area)
}

fn title_case(identifier: &str) -> String {
    identifier
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
