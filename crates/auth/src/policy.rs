//! Role-hierarchy policy knobs.
//!
//! Business policy that must be changeable without touching the evaluator:
//! seniority thresholds and the assignable-roles boundary.

use serde::{Deserialize, Serialize};

/// Boundary rule for [`crate::assignable_roles`].
///
/// Decides whether a manager may assign a role at their **own** level
/// (i.e. whether peers can grant each other's rank). This is an explicit
/// policy choice, not something the evaluator infers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentBoundary {
    /// Only roles strictly below the caller's level are assignable.
    #[default]
    BelowOwnLevel,
    /// Roles at or below the caller's level are assignable.
    UpToOwnLevel,
}

impl AssignmentBoundary {
    /// Whether a caller at `own_level` may assign a role at `candidate_level`.
    pub fn permits(self, own_level: i32, candidate_level: i32) -> bool {
        match self {
            AssignmentBoundary::BelowOwnLevel => candidate_level < own_level,
            AssignmentBoundary::UpToOwnLevel => candidate_level <= own_level,
        }
    }
}

/// Seniority thresholds over the role-level scale in `roles.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePolicy {
    /// Minimum level counted as a manager (team leaders and up).
    pub manager_level: i32,
    /// Minimum level counted as an executive (regional managers and up).
    pub executive_level: i32,
    pub assignment_boundary: AssignmentBoundary,
}

impl Default for RolePolicy {
    fn default() -> Self {
        Self {
            manager_level: 3,
            executive_level: 7,
            assignment_boundary: AssignmentBoundary::default(),
        }
    }
}
