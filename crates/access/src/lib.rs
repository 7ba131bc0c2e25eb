//! `havencrm-access` — declarative and imperative authorization wrappers.
//!
//! The Access Gate decides show/hide for protected content; the Route
//! Guard decides allow/redirect for navigation. Both are pure projections
//! of a [`SessionSnapshot`](havencrm_session::SessionSnapshot) plus a
//! caller-supplied config; the surrounding view layer renders the outcome
//! and this crate never mutates session state.

pub mod gate;
pub mod guard;

pub use gate::{GateConfig, GateDecision, evaluate_gate};
pub use guard::{DeniedBehavior, GuardConfig, RouteDecision, SIGN_IN_PATH, evaluate_route};
