//! `havencrm-session` — the authentication session lifecycle.
//!
//! One process-wide [`SessionStore`] owns the current principal and the
//! loading flag, mutated only through its transition entry points and read
//! everywhere else through immutable [`SessionSnapshot`]s. External
//! collaborators (identity provider, backend session exchange, durable
//! vault) sit behind trait seams so the state machine itself stays
//! deterministic and testable.

pub mod exchange;
pub mod store;
pub mod traits;
pub mod types;
pub mod vault;

pub use exchange::{ExchangeError, HttpSessionExchange};
pub use store::SessionStore;
pub use traits::{IdentityProvider, SessionExchange, SessionVault};
pub use types::{
    Credential, CredentialEvent, ExchangeRequest, ExchangeResponse, PersistedSession,
    SessionConfig, SessionSnapshot, SessionState,
};
pub use vault::{FileVault, InMemoryVault, VaultError};
