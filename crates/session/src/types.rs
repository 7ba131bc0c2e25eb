//! Shared session types.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use havencrm_auth::{Principal, evaluator};

/// Lifecycle state of the process-wide session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Process start: hydrating from the vault while the identity provider
    /// reports the real state.
    Initializing,
    /// A credential arrived; the backend exchange is in flight.
    Authenticating,
    Authenticated,
    Unauthenticated,
}

impl SessionState {
    /// `loading` is true exactly while a decision is pending.
    pub fn is_loading(self) -> bool {
        matches!(self, SessionState::Initializing | SessionState::Authenticating)
    }
}

/// Credential handle from the external identity provider.
///
/// Kept only to drive the session exchange and sign-out; never consulted
/// for permission decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Stable identity-provider id; the dedup key for repeated
    /// notifications carrying the same logical sign-in.
    pub provider_id: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// One identity-provider notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialEvent {
    SignedIn(Credential),
    /// Explicit sign-out or the provider reporting "no credential".
    SignedOut,
}

/// Immutable read view of the session, published on every committed
/// transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub principal: Option<Principal>,
}

impl SessionSnapshot {
    pub fn loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn is_authenticated(&self) -> bool {
        evaluator::is_authenticated(self.principal.as_ref())
    }

    pub fn is_administrator(&self) -> bool {
        evaluator::is_administrator(self.principal.as_ref())
    }

    pub fn is_agent(&self) -> bool {
        evaluator::is_agent(self.principal.as_ref())
    }
}

/// Durable vault record: the transport token and the principal snapshot,
/// written together and cleared together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub token: String,
    pub principal: Principal,
    pub saved_at: DateTime<Utc>,
}

/// Request body of the backend session exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRequest {
    pub identity_email: String,
    pub identity_provider_id: String,
}

/// Response body of the backend session exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeResponse {
    pub token: String,
    pub principal: Principal,
}

/// Endpoints and paths for the provided backend/vault implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Base URL of the CRM API, e.g. `https://api.haven.example`.
    pub api_url: String,
    /// Location of the durable session snapshot.
    pub vault_path: PathBuf,
}

impl SessionConfig {
    /// Config with the platform-default vault location.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            vault_path: crate::vault::default_vault_path(),
        }
    }
}
