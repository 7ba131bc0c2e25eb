//! Black-box tests of the session lifecycle state machine against mock
//! identity-provider and exchange collaborators.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;

use havencrm_auth::{Permission, Principal, Role, perms, role_names};
use havencrm_core::{AuthError, AuthResult, PrincipalId};
use havencrm_session::{
    Credential, CredentialEvent, ExchangeError, ExchangeRequest, ExchangeResponse,
    IdentityProvider, InMemoryVault, PersistedSession, SessionExchange, SessionState,
    SessionStore, SessionVault,
};

/// Surface the store's transition logs (established / skipped / discarded)
/// when a test fails. Idempotent across tests in the same process.
fn init_logging() {
    havencrm_observability::init_with_default_filter("debug");
}

fn agent_principal(email: &str) -> Principal {
    Principal {
        id: PrincipalId::new(format!("principal-{email}")),
        role: Role::new(role_names::AGENT),
        permissions: vec![Permission::new(perms::VIEW_OWN_LEADS)],
        role_level: 1,
        name: "Lifecycle Tester".to_string(),
        email: email.to_string(),
        image: None,
    }
}

fn credential(provider_id: &str, email: &str) -> Credential {
    Credential {
        provider_id: provider_id.to_string(),
        email: email.to_string(),
        display_name: None,
    }
}

struct MockProvider {
    sign_outs: AtomicUsize,
}

impl MockProvider {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            sign_outs: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    async fn begin_sign_in(&self) -> AuthResult<()> {
        Ok(())
    }

    async fn fetch_token(&self, credential: &Credential) -> AuthResult<String> {
        Ok(format!("transport-token-{}", credential.provider_id))
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FailingProvider;

#[async_trait]
impl IdentityProvider for FailingProvider {
    async fn begin_sign_in(&self) -> AuthResult<()> {
        Err(AuthError::identity_provider("popup dismissed"))
    }

    async fn fetch_token(&self, _credential: &Credential) -> AuthResult<String> {
        Err(AuthError::identity_provider("token refresh failed"))
    }

    async fn sign_out(&self) -> AuthResult<()> {
        Ok(())
    }
}

struct MockExchange {
    calls: AtomicUsize,
    /// When set, the exchange parks until notified, simulating a slow
    /// backend whose result arrives after later events.
    gate: Option<Arc<Notify>>,
    fail: bool,
}

impl MockExchange {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            gate: None,
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            gate: None,
            fail: true,
        })
    }

    fn gated(gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            gate: Some(gate),
            fail: false,
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionExchange for MockExchange {
    async fn exchange(
        &self,
        _transport_token: &str,
        request: &ExchangeRequest,
    ) -> Result<ExchangeResponse, ExchangeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        if self.fail {
            return Err(ExchangeError::Rejected {
                status: 403,
                message: "unknown identity".to_string(),
            });
        }

        Ok(ExchangeResponse {
            token: "session-token".to_string(),
            principal: agent_principal(&request.identity_email),
        })
    }
}

#[tokio::test]
async fn sign_in_establishes_session_and_persists_snapshot() {
    init_logging();
    let vault = Arc::new(InMemoryVault::new());
    let store = SessionStore::new(MockProvider::new(), MockExchange::ok(), vault.clone());

    let snapshot = store.read();
    assert_eq!(snapshot.state, SessionState::Initializing);
    assert!(snapshot.loading());

    store
        .credential_changed(CredentialEvent::SignedIn(credential("idp-1", "a@haven.example")))
        .await;

    let snapshot = store.read();
    assert_eq!(snapshot.state, SessionState::Authenticated);
    assert!(!snapshot.loading());
    assert!(snapshot.is_authenticated());
    assert!(snapshot.is_agent());
    assert!(!snapshot.is_administrator());

    let persisted = vault.load().unwrap().expect("snapshot persisted");
    assert_eq!(persisted.token, "session-token");
    assert_eq!(persisted.principal.email, "a@haven.example");
}

#[tokio::test]
async fn duplicate_credential_notification_triggers_one_exchange() {
    init_logging();
    let exchange = MockExchange::ok();
    let store = SessionStore::new(
        MockProvider::new(),
        exchange.clone(),
        Arc::new(InMemoryVault::new()),
    );

    let event = CredentialEvent::SignedIn(credential("idp-dup", "dup@haven.example"));
    store.credential_changed(event.clone()).await;
    store.credential_changed(event).await;

    assert_eq!(exchange.call_count(), 1);
    assert_eq!(store.read().state, SessionState::Authenticated);
}

#[tokio::test]
async fn stale_exchange_result_does_not_resurrect_a_signed_out_session() {
    init_logging();
    let gate = Arc::new(Notify::new());
    let exchange = MockExchange::gated(gate.clone());
    let vault = Arc::new(InMemoryVault::new());
    let store = Arc::new(SessionStore::new(
        MockProvider::new(),
        exchange.clone(),
        vault.clone(),
    ));

    let mut rx = store.subscribe();

    let task = {
        let store = store.clone();
        tokio::spawn(async move {
            store
                .credential_changed(CredentialEvent::SignedIn(credential(
                    "idp-slow",
                    "slow@haven.example",
                )))
                .await;
        })
    };

    // The exchange is now parked mid-flight.
    rx.wait_for(|s| s.state == SessionState::Authenticating)
        .await
        .unwrap();

    // A sign-out arrives before the exchange resolves.
    store.credential_changed(CredentialEvent::SignedOut).await;
    assert_eq!(store.read().state, SessionState::Unauthenticated);

    // Let the abandoned exchange complete; its result must be discarded.
    gate.notify_one();
    task.await.unwrap();

    let snapshot = store.read();
    assert_eq!(snapshot.state, SessionState::Unauthenticated);
    assert!(snapshot.principal.is_none());
    assert!(vault.load().unwrap().is_none());
    assert_eq!(exchange.call_count(), 1);
}

#[tokio::test]
async fn exchange_failure_resets_to_unauthenticated_and_allows_retry() {
    init_logging();
    let exchange = MockExchange::failing();
    let vault = Arc::new(InMemoryVault::with_session(PersistedSession {
        token: "old-token".to_string(),
        principal: agent_principal("old@haven.example"),
        saved_at: Utc::now(),
    }));
    let store = SessionStore::new(MockProvider::new(), exchange.clone(), vault.clone());

    let event = CredentialEvent::SignedIn(credential("idp-reject", "r@haven.example"));
    store.credential_changed(event.clone()).await;

    let snapshot = store.read();
    assert_eq!(snapshot.state, SessionState::Unauthenticated);
    assert!(snapshot.principal.is_none());
    // The optimistic placeholder and its durable snapshot are gone.
    assert!(vault.load().unwrap().is_none());

    // Failure clears the dedup latch, so the same credential may retry.
    store.credential_changed(event).await;
    assert_eq!(exchange.call_count(), 2);
}

#[tokio::test]
async fn token_fetch_failure_is_nonfatal() {
    init_logging();
    let exchange = MockExchange::ok();
    let store = SessionStore::new(
        Arc::new(FailingProvider),
        exchange.clone(),
        Arc::new(InMemoryVault::new()),
    );

    store
        .credential_changed(CredentialEvent::SignedIn(credential("idp-x", "x@haven.example")))
        .await;

    assert_eq!(store.read().state, SessionState::Unauthenticated);
    // The backend exchange was never reached.
    assert_eq!(exchange.call_count(), 0);
}

#[tokio::test]
async fn vault_hydration_is_advisory_until_the_provider_reports() {
    init_logging();
    let vault = Arc::new(InMemoryVault::with_session(PersistedSession {
        token: "stale-token".to_string(),
        principal: agent_principal("hydrated@haven.example"),
        saved_at: Utc::now(),
    }));
    let store = SessionStore::new(MockProvider::new(), MockExchange::ok(), vault.clone());

    // Placeholder visible, but still loading: not yet a decision.
    let snapshot = store.read();
    assert_eq!(snapshot.state, SessionState::Initializing);
    assert!(snapshot.loading());
    assert_eq!(
        snapshot.principal.as_ref().map(|p| p.email.as_str()),
        Some("hydrated@haven.example")
    );

    // Provider reports no credential: the placeholder is discarded.
    store.credential_changed(CredentialEvent::SignedOut).await;

    let snapshot = store.read();
    assert_eq!(snapshot.state, SessionState::Unauthenticated);
    assert!(snapshot.principal.is_none());
    assert!(vault.load().unwrap().is_none());
}

#[tokio::test]
async fn sign_out_clears_locally_and_calls_the_provider() {
    init_logging();
    let provider = MockProvider::new();
    let store = SessionStore::new(
        provider.clone(),
        MockExchange::ok(),
        Arc::new(InMemoryVault::new()),
    );

    store
        .credential_changed(CredentialEvent::SignedIn(credential("idp-2", "b@haven.example")))
        .await;
    assert_eq!(store.read().state, SessionState::Authenticated);

    store.sign_out().await.unwrap();
    assert_eq!(store.read().state, SessionState::Unauthenticated);
    assert_eq!(provider.sign_outs.load(Ordering::SeqCst), 1);
}
