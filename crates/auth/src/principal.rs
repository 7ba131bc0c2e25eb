//! The authenticated principal evaluated for access decisions.

use serde::{Deserialize, Serialize};

use havencrm_core::PrincipalId;

use crate::{Permission, Role};

/// A fully resolved principal for authorization decisions.
///
/// Sourced from the backend session exchange; the client never derives
/// `permissions` from `role` for non-superusers.
///
/// # Invariants
/// - `role` is never empty for an authenticated principal.
/// - `permissions` may be empty (superusers bypass checks entirely).
/// - `role_level` is the backend's rank for `role`; higher is more senior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub role: Role,
    pub permissions: Vec<Permission>,
    pub role_level: i32,

    // Presentational profile fields; no invariant attaches to these.
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Principal {
    /// Flat-set membership test against the granted permissions.
    ///
    /// This is the raw set probe; the superuser override lives in the
    /// evaluator, not here.
    pub fn holds(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p.as_str() == permission)
    }
}
