//! Access Gate: declarative show/hide decisions for protected content.

use serde::{Deserialize, Serialize};

use havencrm_auth::{Permission, PermissionMode, Role, check_permissions};
use havencrm_session::SessionSnapshot;

/// What a gate requires before revealing its content.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GateConfig {
    /// Required permissions; empty means "authenticated only".
    #[serde(default)]
    pub permissions: Vec<Permission>,

    /// Required roles; empty means any role. A non-empty set requires the
    /// principal's role to be a member.
    #[serde(default)]
    pub roles: Vec<Role>,

    #[serde(default)]
    pub permission_mode: PermissionMode,

    /// Whether the view layer should render fallback content on denial
    /// (false ⇒ render nothing).
    #[serde(default)]
    pub show_fallback: bool,
}

impl GateConfig {
    /// Gate requiring authentication only.
    pub fn authenticated_only() -> Self {
        Self::default()
    }

    pub fn with_permissions(permissions: Vec<Permission>, mode: PermissionMode) -> Self {
        Self {
            permissions,
            permission_mode: mode,
            ..Self::default()
        }
    }
}

/// Outcome of a gate evaluation. The view layer renders each variant; this
/// decision never carries content itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    /// Session still resolving: render a neutral loading indicator, never
    /// the protected content and never the denied fallback.
    Loading,
    Allowed,
    Denied { show_fallback: bool },
}

/// Decide whether gated content may be shown.
pub fn evaluate_gate(snapshot: &SessionSnapshot, config: &GateConfig) -> GateDecision {
    if snapshot.loading() {
        return GateDecision::Loading;
    }

    let denied = GateDecision::Denied {
        show_fallback: config.show_fallback,
    };

    let Some(principal) = snapshot.principal.as_ref() else {
        return denied;
    };

    // Superusers skip role and permission checks entirely.
    if principal.role.is_superuser() {
        return GateDecision::Allowed;
    }

    if !config.roles.is_empty() && !config.roles.contains(&principal.role) {
        return denied;
    }

    if !config.permissions.is_empty() {
        let required: Vec<&str> = config.permissions.iter().map(Permission::as_str).collect();
        if !check_permissions(Some(principal), &required, config.permission_mode) {
            return denied;
        }
    }

    GateDecision::Allowed
}
