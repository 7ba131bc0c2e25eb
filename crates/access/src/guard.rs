//! Route Guard: imperative allow/redirect decisions per navigation attempt.

use serde::{Deserialize, Serialize};

use havencrm_auth::{Permission, PermissionMode, Role, check_permissions, default_landing_area};
use havencrm_session::SessionSnapshot;

/// Destination for unauthenticated principals.
pub const SIGN_IN_PATH: &str = "/signin";

/// How a permission failure is handled: redirect away, or stay in place
/// with an "access restricted" notice and a manual back action. An
/// explicit caller choice, never implicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeniedBehavior {
    #[default]
    Redirect,
    Notice,
}

/// Requirements for a guarded route.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GuardConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_role: Option<Role>,

    /// Role allow-list; empty means no role restriction.
    #[serde(default)]
    pub required_roles: Vec<Role>,

    #[serde(default)]
    pub required_permissions: Vec<Permission>,

    #[serde(default)]
    pub permission_mode: PermissionMode,

    /// Where a role mismatch redirects; falls back to the principal's own
    /// landing area when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_path: Option<String>,

    #[serde(default)]
    pub denied_behavior: DeniedBehavior,
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteDecision {
    /// Session still resolving: no navigation decision yet.
    Loading,
    /// Unauthenticated: go to [`SIGN_IN_PATH`]. The desired destination is
    /// discarded, not replayed after sign-in.
    RedirectToSignIn,
    Redirect(String),
    /// Stay in place and show an access-restricted notice with a manual
    /// back action.
    RestrictedNotice,
    Allow,
}

impl RouteDecision {
    /// Destination the view layer should navigate to, if the decision is a
    /// redirect.
    pub fn target_path(&self) -> Option<&str> {
        match self {
            RouteDecision::RedirectToSignIn => Some(SIGN_IN_PATH),
            RouteDecision::Redirect(path) => Some(path),
            RouteDecision::Loading | RouteDecision::RestrictedNotice | RouteDecision::Allow => None,
        }
    }
}

/// Decide a navigation attempt.
pub fn evaluate_route(snapshot: &SessionSnapshot, config: &GuardConfig) -> RouteDecision {
    if snapshot.loading() {
        return RouteDecision::Loading;
    }

    let Some(principal) = snapshot.principal.as_ref() else {
        return RouteDecision::RedirectToSignIn;
    };

    if principal.role.is_superuser() {
        return RouteDecision::Allow;
    }

    let role_redirect = || {
        let path = config
            .fallback_path
            .clone()
            .unwrap_or_else(|| default_landing_area(&principal.role).to_string());
        RouteDecision::Redirect(path)
    };

    if let Some(required) = &config.required_role {
        if &principal.role != required {
            return role_redirect();
        }
    }

    if !config.required_roles.is_empty() && !config.required_roles.contains(&principal.role) {
        return role_redirect();
    }

    if !config.required_permissions.is_empty() {
        let required: Vec<&str> = config
            .required_permissions
            .iter()
            .map(Permission::as_str)
            .collect();
        if !check_permissions(Some(principal), &required, config.permission_mode) {
            return match config.denied_behavior {
                DeniedBehavior::Redirect => role_redirect(),
                DeniedBehavior::Notice => RouteDecision::RestrictedNotice,
            };
        }
    }

    RouteDecision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;
    use havencrm_auth::{DEFAULT_LANDING_AREA, Principal, perms, role_names};
    use havencrm_core::PrincipalId;
    use havencrm_session::SessionState;

    fn principal(role: &'static str, level: i32, permissions: &[&'static str]) -> Principal {
        Principal {
            id: PrincipalId::new("p-guard"),
            role: Role::new(role),
            permissions: permissions.iter().map(|p| Permission::new(*p)).collect(),
            role_level: level,
            name: "Guard Tester".to_string(),
            email: "guard@haven.example".to_string(),
            image: None,
        }
    }

    fn snapshot(state: SessionState, principal: Option<Principal>) -> SessionSnapshot {
        SessionSnapshot { state, principal }
    }

    #[test]
    fn loading_emits_no_navigation_decision() {
        let s = snapshot(SessionState::Authenticating, None);
        let config = GuardConfig {
            required_role: Some(Role::new(role_names::ADMIN)),
            ..GuardConfig::default()
        };
        assert_eq!(evaluate_route(&s, &config), RouteDecision::Loading);
    }

    #[test]
    fn unauthenticated_goes_to_sign_in_never_to_role_fallback() {
        let s = snapshot(SessionState::Unauthenticated, None);
        let config = GuardConfig {
            required_role: Some(Role::new(role_names::BRANCH_MANAGER)),
            fallback_path: Some("/somewhere".to_string()),
            ..GuardConfig::default()
        };
        assert_eq!(evaluate_route(&s, &config), RouteDecision::RedirectToSignIn);
    }

    #[test]
    fn redirect_decisions_expose_their_target_path() {
        let s = snapshot(SessionState::Unauthenticated, None);
        let decision = evaluate_route(&s, &GuardConfig::default());
        assert_eq!(decision.target_path(), Some(SIGN_IN_PATH));

        assert_eq!(
            RouteDecision::Redirect("/agent/leads".to_string()).target_path(),
            Some("/agent/leads")
        );
        assert_eq!(RouteDecision::Allow.target_path(), None);
        assert_eq!(RouteDecision::RestrictedNotice.target_path(), None);
    }

    #[test]
    fn superuser_navigates_unconditionally() {
        let admin = principal(role_names::ADMIN, 10, &[]);
        let s = snapshot(SessionState::Authenticated, Some(admin));
        let config = GuardConfig {
            required_role: Some(Role::new(role_names::AGENT)),
            required_permissions: vec![Permission::new(perms::MANAGE_ROLES)],
            permission_mode: PermissionMode::All,
            ..GuardConfig::default()
        };
        assert_eq!(evaluate_route(&s, &config), RouteDecision::Allow);
    }

    #[test]
    fn role_mismatch_redirects_to_explicit_fallback() {
        let agent = principal(role_names::AGENT, 1, &[]);
        let s = snapshot(SessionState::Authenticated, Some(agent));
        let config = GuardConfig {
            required_role: Some(Role::new(role_names::BRANCH_MANAGER)),
            fallback_path: Some("/agent/leads".to_string()),
            ..GuardConfig::default()
        };
        assert_eq!(
            evaluate_route(&s, &config),
            RouteDecision::Redirect("/agent/leads".to_string())
        );
    }

    #[test]
    fn role_mismatch_without_fallback_uses_landing_area() {
        let agent = principal(role_names::AGENT, 1, &[]);
        let s = snapshot(SessionState::Authenticated, Some(agent));
        let config = GuardConfig {
            required_roles: vec![Role::new(role_names::BRANCH_MANAGER), Role::new(role_names::TEAM_LEADER)],
            ..GuardConfig::default()
        };
        assert_eq!(
            evaluate_route(&s, &config),
            RouteDecision::Redirect("/agent".to_string())
        );
    }

    #[test]
    fn unknown_role_lands_on_the_explicit_default_area() {
        let stranger = principal("contractor", 0, &[]);
        let s = snapshot(SessionState::Authenticated, Some(stranger));
        let config = GuardConfig {
            required_role: Some(Role::new(role_names::AGENT)),
            ..GuardConfig::default()
        };
        assert_eq!(
            evaluate_route(&s, &config),
            RouteDecision::Redirect(DEFAULT_LANDING_AREA.to_string())
        );
    }

    #[test]
    fn branch_manager_with_team_permission_is_allowed() {
        let manager = principal(role_names::BRANCH_MANAGER, 5, &[perms::MANAGE_TEAM_MEMBERS]);
        let s = snapshot(SessionState::Authenticated, Some(manager));
        let config = GuardConfig {
            required_permissions: vec![Permission::new(perms::MANAGE_TEAM_MEMBERS)],
            ..GuardConfig::default()
        };
        assert_eq!(evaluate_route(&s, &config), RouteDecision::Allow);
    }

    #[test]
    fn permission_failure_honors_the_caller_chosen_denied_behavior() {
        let agent = principal(role_names::AGENT, 1, &[perms::VIEW_OWN_LEADS]);
        let s = snapshot(SessionState::Authenticated, Some(agent));

        let redirecting = GuardConfig {
            required_permissions: vec![Permission::new(perms::MANAGE_TEAM_MEMBERS)],
            denied_behavior: DeniedBehavior::Redirect,
            ..GuardConfig::default()
        };
        assert_eq!(
            evaluate_route(&s, &redirecting),
            RouteDecision::Redirect("/agent".to_string())
        );

        let notice = GuardConfig {
            denied_behavior: DeniedBehavior::Notice,
            ..redirecting
        };
        assert_eq!(evaluate_route(&s, &notice), RouteDecision::RestrictedNotice);
    }

    #[test]
    fn unrestricted_route_allows_any_authenticated_principal() {
        let agent = principal(role_names::AGENT, 1, &[]);
        let s = snapshot(SessionState::Authenticated, Some(agent));
        assert_eq!(
            evaluate_route(&s, &GuardConfig::default()),
            RouteDecision::Allow
        );
    }
}
