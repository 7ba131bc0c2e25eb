//! `havencrm-core` — foundation primitives for the HavenCRM access core.
//!
//! This crate contains **pure types only** (identifiers, the error
//! taxonomy). No IO, no async, no policy.

pub mod error;
pub mod id;

pub use error::{AuthError, AuthResult};
pub use id::{AttemptId, PrincipalId};
