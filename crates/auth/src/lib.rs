//! `havencrm-auth` — pure authorization boundary for the HavenCRM client.
//!
//! Permission catalog, role hierarchy, and the RBAC evaluator. This crate
//! is intentionally decoupled from the session lifecycle and from any view
//! or routing concerns: everything here is a pure function over a
//! [`Principal`].

pub mod evaluator;
pub mod permissions;
pub mod policy;
pub mod principal;
pub mod roles;

pub use evaluator::{
    AccessExplanation, DenialKind, DenialReason, PermissionMode, PrincipalState, assignable_roles,
    check_permissions, explain_access, has_all_permissions, has_any_permission, has_permission,
    is_administrator, is_agent, is_authenticated, is_executive, is_manager,
};
pub use permissions::{CatalogEntry, PERMISSION_CATALOG, Permission, catalog_entry, perms};
pub use policy::{AssignmentBoundary, RolePolicy};
pub use principal::Principal;
pub use roles::{
    DEFAULT_LANDING_AREA, Role, default_landing_area, role_label, role_level, role_names,
};
