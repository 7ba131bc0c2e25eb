//! Trait seams for the session store's external collaborators.
//!
//! The store only ever talks to these traits; concrete implementations
//! ([`crate::HttpSessionExchange`], [`crate::FileVault`]) and test doubles
//! plug in without touching the state machine.

use async_trait::async_trait;

use havencrm_core::AuthResult;

use crate::exchange::ExchangeError;
use crate::types::{Credential, ExchangeRequest, ExchangeResponse, PersistedSession};
use crate::vault::VaultError;

/// External identity provider (OAuth popup/redirect flow).
///
/// Credential-change notifications are delivered by the surrounding glue
/// pushing [`crate::CredentialEvent`]s into
/// [`crate::SessionStore::credential_changed`]; this trait covers the
/// imperative operations only.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Start an interactive sign-in. Resolution arrives later as a
    /// credential event.
    async fn begin_sign_in(&self) -> AuthResult<()>;

    /// Retrieve a short-lived transport token for a credential.
    async fn fetch_token(&self, credential: &Credential) -> AuthResult<String>;

    /// Invalidate the provider-side session.
    async fn sign_out(&self) -> AuthResult<()>;
}

/// Backend session exchange: transport token in, canonical principal out.
#[async_trait]
pub trait SessionExchange: Send + Sync {
    async fn exchange(
        &self,
        transport_token: &str,
        request: &ExchangeRequest,
    ) -> Result<ExchangeResponse, ExchangeError>;
}

/// Durable local storage for the `{token, principal}` snapshot.
///
/// Written only by the session store; read only at hydration.
pub trait SessionVault: Send + Sync {
    /// Load the persisted snapshot. A malformed snapshot reads as `None`
    /// (implementations clear it defensively).
    fn load(&self) -> Result<Option<PersistedSession>, VaultError>;

    /// Persist token and principal together.
    fn store(&self, session: &PersistedSession) -> Result<(), VaultError>;

    /// Remove any persisted snapshot. Idempotent.
    fn clear(&self) -> Result<(), VaultError>;
}
