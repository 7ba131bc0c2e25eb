//! RBAC evaluator: pure membership and derivation queries over a principal.
//!
//! Every function here is a pure policy check:
//! - No IO
//! - No panics
//! - No business logic beyond the stated rule
//!
//! The superuser override (`admin`, `founding_member` bypass everything) is
//! applied here once, via [`Role::is_superuser`], so the gate and guard
//! layers inherit it consistently.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use havencrm_core::PrincipalId;

use crate::policy::RolePolicy;
use crate::principal::Principal;
use crate::roles::Role;

/// How a set of required permissions combines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionMode {
    /// At least one required permission must be held. Empty set ⇒ denied.
    #[default]
    Any,
    /// Every required permission must be held. Empty set ⇒ granted.
    All,
}

pub fn is_authenticated(principal: Option<&Principal>) -> bool {
    principal.is_some()
}

pub fn is_administrator(principal: Option<&Principal>) -> bool {
    principal.is_some_and(|p| p.role.is_superuser())
}

pub fn is_agent(principal: Option<&Principal>) -> bool {
    principal.is_some_and(|p| p.role.as_str() == crate::roles::role_names::AGENT)
}

pub fn is_manager(principal: Option<&Principal>, policy: &RolePolicy) -> bool {
    is_administrator(principal)
        || principal.is_some_and(|p| p.role_level >= policy.manager_level)
}

pub fn is_executive(principal: Option<&Principal>, policy: &RolePolicy) -> bool {
    is_administrator(principal)
        || principal.is_some_and(|p| p.role_level >= policy.executive_level)
}

/// Single-permission check.
///
/// Absent principal ⇒ false. Superuser ⇒ true regardless of the granted
/// set. Otherwise a flat-set membership test against the principal's
/// granted permissions; the role never implicitly grants capabilities.
pub fn has_permission(principal: Option<&Principal>, permission: &str) -> bool {
    let Some(principal) = principal else {
        return false;
    };
    if principal.role.is_superuser() {
        return true;
    }
    principal.holds(permission)
}

/// Disjunction over `permissions`. Empty input ⇒ false.
pub fn has_any_permission(principal: Option<&Principal>, permissions: &[&str]) -> bool {
    if is_administrator(principal) {
        return true;
    }
    permissions.iter().any(|p| has_permission(principal, p))
}

/// Conjunction over `permissions`. Empty input ⇒ true for an authenticated
/// principal (vacuous), false for an absent one.
pub fn has_all_permissions(principal: Option<&Principal>, permissions: &[&str]) -> bool {
    if !is_authenticated(principal) {
        return false;
    }
    if is_administrator(principal) {
        return true;
    }
    permissions.iter().all(|p| has_permission(principal, p))
}

/// Evaluate a required set under a [`PermissionMode`].
pub fn check_permissions(
    principal: Option<&Principal>,
    permissions: &[&str],
    mode: PermissionMode,
) -> bool {
    match mode {
        PermissionMode::Any => has_any_permission(principal, permissions),
        PermissionMode::All => has_all_permissions(principal, permissions),
    }
}

/// Roles the principal may assign to subordinates.
///
/// Administrators may assign any candidate. Everyone else is filtered by
/// the configured [`AssignmentBoundary`](crate::AssignmentBoundary) against
/// the caller's own level; an absent principal can assign nothing.
pub fn assignable_roles(
    principal: Option<&Principal>,
    candidates: &[Role],
    policy: &RolePolicy,
) -> Vec<Role> {
    let Some(principal) = principal else {
        return Vec::new();
    };
    if principal.role.is_superuser() {
        return candidates.to_vec();
    }
    candidates
        .iter()
        .filter(|role| {
            policy
                .assignment_boundary
                .permits(principal.role_level, crate::roles::role_level(role))
        })
        .cloned()
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Access Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of a permission-check decision.
///
/// Answers "why was this allowed/denied?" for support tooling and debug
/// overlays without re-deriving the rules by hand.
#[derive(Debug, Clone, Serialize)]
pub struct AccessExplanation {
    pub required_permission: String,
    pub granted: bool,
    pub reason: String,
    pub principal: Option<PrincipalState>,
    pub denial_reason: Option<DenialReason>,
}

/// Snapshot of the principal's state at decision time.
#[derive(Debug, Clone, Serialize)]
pub struct PrincipalState {
    pub principal_id: PrincipalId,
    pub role: String,
    pub role_level: i32,
    pub granted_permissions: Vec<String>,
    pub is_superuser: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    MissingPermission,
}

/// Explain a [`has_permission`] decision.
pub fn explain_access(principal: Option<&Principal>, permission: &str) -> AccessExplanation {
    let Some(principal) = principal else {
        return AccessExplanation {
            required_permission: permission.to_string(),
            granted: false,
            reason: "no authenticated principal".to_string(),
            principal: None,
            denial_reason: Some(DenialReason {
                kind: DenialKind::Unauthenticated,
                message: "sign in before requesting this capability".to_string(),
            }),
        };
    };

    let granted_permissions: Vec<String> = {
        // Deduplicate and sort for readability.
        let set: HashSet<&str> = principal.permissions.iter().map(|p| p.as_str()).collect();
        let mut list: Vec<String> = set.into_iter().map(str::to_string).collect();
        list.sort();
        list
    };

    let state = PrincipalState {
        principal_id: principal.id.clone(),
        role: principal.role.as_str().to_string(),
        role_level: principal.role_level,
        granted_permissions,
        is_superuser: principal.role.is_superuser(),
    };

    if principal.role.is_superuser() {
        return AccessExplanation {
            required_permission: permission.to_string(),
            granted: true,
            reason: format!("role '{}' bypasses permission checks", principal.role),
            principal: Some(state),
            denial_reason: None,
        };
    }

    if principal.holds(permission) {
        AccessExplanation {
            required_permission: permission.to_string(),
            granted: true,
            reason: format!("principal holds '{permission}'"),
            principal: Some(state),
            denial_reason: None,
        }
    } else {
        AccessExplanation {
            required_permission: permission.to_string(),
            granted: false,
            reason: format!("principal does not hold '{permission}'"),
            principal: Some(state),
            denial_reason: Some(DenialReason {
                kind: DenialKind::MissingPermission,
                message: format!(
                    "grant '{permission}' to role '{}' or to this principal directly",
                    principal.role
                ),
            }),
        }
    }
}
