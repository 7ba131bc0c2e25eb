//! The process-wide session store and its lifecycle state machine.
//!
//! States: `Initializing → Unauthenticated | Authenticating → Authenticated`,
//! with `Authenticated → Unauthenticated` on sign-out and
//! `Authenticating → Unauthenticated` on exchange failure.
//!
//! Ordering contract: credential events commit in arrival order. Every
//! accepted event bumps an epoch; an exchange result is committed only if
//! its epoch is still current, so an abandoned exchange resolving after a
//! later sign-out can never resurrect a principal. Duplicate notifications
//! for the credential already pending or established are skipped without a
//! second backend exchange.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, watch};

use havencrm_auth::Principal;
use havencrm_core::{AttemptId, AuthResult};

use crate::traits::{IdentityProvider, SessionExchange, SessionVault};
use crate::types::{
    Credential, CredentialEvent, ExchangeRequest, ExchangeResponse, PersistedSession,
    SessionConfig, SessionSnapshot, SessionState,
};
use crate::{FileVault, HttpSessionExchange};

struct Inner {
    state: SessionState,
    principal: Option<Principal>,
    /// Bumped on every accepted credential event; stale exchange results
    /// carry an older epoch and are discarded at commit time.
    epoch: u64,
    /// Provider id of the credential last accepted for exchange; the dedup
    /// key while that exchange is pending or already established.
    last_credential: Option<String>,
}

/// Process-wide authentication session.
///
/// All mutation goes through [`credential_changed`](Self::credential_changed)
/// (plus the [`sign_in`](Self::sign_in)/[`sign_out`](Self::sign_out)
/// initiators); everything else reads immutable snapshots.
pub struct SessionStore {
    inner: Mutex<Inner>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    provider: Arc<dyn IdentityProvider>,
    exchange: Arc<dyn SessionExchange>,
    vault: Arc<dyn SessionVault>,
}

impl SessionStore {
    /// Create the store and hydrate optimistically from the vault.
    ///
    /// The hydrated principal is an advisory placeholder: `loading` stays
    /// true until the identity provider's first notification commits the
    /// real outcome.
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        exchange: Arc<dyn SessionExchange>,
        vault: Arc<dyn SessionVault>,
    ) -> Self {
        let placeholder = match vault.load() {
            Ok(Some(persisted)) => {
                tracing::debug!("hydrated session placeholder from vault");
                Some(persisted.principal)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "session vault unreadable at startup");
                None
            }
        };

        let inner = Inner {
            state: SessionState::Initializing,
            principal: placeholder.clone(),
            epoch: 0,
            last_credential: None,
        };
        let (snapshot_tx, _) = watch::channel(SessionSnapshot {
            state: SessionState::Initializing,
            principal: placeholder,
        });

        Self {
            inner: Mutex::new(inner),
            snapshot_tx,
            provider,
            exchange,
            vault,
        }
    }

    /// Store wired to the provided HTTP exchange and file vault.
    pub fn with_http_backend(config: &SessionConfig, provider: Arc<dyn IdentityProvider>) -> Self {
        Self::new(
            provider,
            Arc::new(HttpSessionExchange::new(config.api_url.clone())),
            Arc::new(FileVault::new(config.vault_path.clone())),
        )
    }

    /// Current snapshot.
    pub fn read(&self) -> SessionSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Begin an interactive sign-in at the identity provider.
    ///
    /// Resolution arrives later as a [`CredentialEvent`]; a provider
    /// failure here leaves the session unauthenticated.
    pub async fn sign_in(&self) -> AuthResult<()> {
        self.provider.begin_sign_in().await
    }

    /// Sign out at the provider and clear the local session.
    ///
    /// The local session is cleared even if the provider call fails; the
    /// error is surfaced so the caller can show it.
    pub async fn sign_out(&self) -> AuthResult<()> {
        let result = self.provider.sign_out().await;
        self.credential_changed(CredentialEvent::SignedOut).await;
        result
    }

    /// Single entry point for identity-provider notifications.
    pub async fn credential_changed(&self, event: CredentialEvent) {
        match event {
            CredentialEvent::SignedOut => self.commit_signed_out().await,
            CredentialEvent::SignedIn(credential) => self.process_sign_in(credential).await,
        }
    }

    async fn process_sign_in(&self, credential: Credential) {
        let attempt = AttemptId::new();

        let epoch = {
            let mut inner = self.inner.lock().await;
            if inner.last_credential.as_deref() == Some(credential.provider_id.as_str()) {
                tracing::debug!(
                    %attempt,
                    provider_id = %credential.provider_id,
                    "duplicate credential notification skipped; exchange pending or already established"
                );
                return;
            }
            inner.epoch += 1;
            inner.last_credential = Some(credential.provider_id.clone());
            inner.state = SessionState::Authenticating;
            self.publish(&inner);
            inner.epoch
        };

        tracing::info!(%attempt, email = %credential.email, "credential received; exchanging for a session");

        let token = match self.provider.fetch_token(&credential).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(%attempt, error = %e, "transport token fetch failed");
                self.abort_attempt(epoch, attempt).await;
                return;
            }
        };

        let request = ExchangeRequest {
            identity_email: credential.email.clone(),
            identity_provider_id: credential.provider_id.clone(),
        };

        match self.exchange.exchange(&token, &request).await {
            Ok(response) => self.commit_authenticated(epoch, attempt, response).await,
            Err(e) => {
                tracing::warn!(%attempt, error = %e, "session exchange failed");
                self.abort_attempt(epoch, attempt).await;
            }
        }
    }

    async fn commit_authenticated(&self, epoch: u64, attempt: AttemptId, response: ExchangeResponse) {
        let mut inner = self.inner.lock().await;
        if inner.epoch != epoch {
            tracing::debug!(%attempt, "discarding stale exchange result; a newer event superseded it");
            return;
        }

        let persisted = PersistedSession {
            token: response.token,
            principal: response.principal.clone(),
            saved_at: Utc::now(),
        };
        if let Err(e) = self.vault.store(&persisted) {
            // Persistence failure degrades restarts only; the live session
            // is still valid.
            tracing::warn!(%attempt, error = %e, "failed to persist session snapshot");
        }

        inner.principal = Some(response.principal);
        inner.state = SessionState::Authenticated;
        self.publish(&inner);
        tracing::info!(%attempt, "session established");
    }

    async fn abort_attempt(&self, epoch: u64, attempt: AttemptId) {
        let mut inner = self.inner.lock().await;
        if inner.epoch != epoch {
            tracing::debug!(%attempt, "stale attempt failure ignored");
            return;
        }

        if let Err(e) = self.vault.clear() {
            tracing::warn!(%attempt, error = %e, "failed to clear session vault");
        }

        inner.principal = None;
        inner.last_credential = None;
        inner.state = SessionState::Unauthenticated;
        self.publish(&inner);
    }

    async fn commit_signed_out(&self) {
        let mut inner = self.inner.lock().await;
        inner.epoch += 1;
        inner.last_credential = None;

        if let Err(e) = self.vault.clear() {
            tracing::warn!(error = %e, "failed to clear session vault on sign-out");
        }

        inner.principal = None;
        inner.state = SessionState::Unauthenticated;
        self.publish(&inner);
        tracing::info!("signed out");
    }

    fn publish(&self, inner: &Inner) {
        self.snapshot_tx.send_replace(SessionSnapshot {
            state: inner.state,
            principal: inner.principal.clone(),
        });
    }
}
