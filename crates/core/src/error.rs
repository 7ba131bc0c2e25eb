//! Error taxonomy for the access core.

use thiserror::Error;

/// Result type used across the access core.
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication-boundary error.
///
/// Authorization *denial* is deliberately absent from this enum: a denied
/// gate or route is a normal decision outcome, never an error value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The identity provider failed (popup dismissed, redirect error, ...).
    /// Surfaced to the immediate caller; the session stays unauthenticated.
    #[error("identity provider error: {0}")]
    IdentityProvider(String),

    /// The backend rejected or failed the session exchange.
    /// Recovered locally by resetting to unauthenticated; never retried
    /// automatically.
    #[error("session exchange failed: {0}")]
    SessionExchange(String),

    /// The persisted session snapshot could not be decoded.
    /// Treated as an absent session; storage is cleared defensively.
    #[error("malformed session snapshot: {0}")]
    MalformedSnapshot(String),

    /// Durable local storage could not be read or written.
    #[error("session storage error: {0}")]
    Storage(String),
}

impl AuthError {
    pub fn identity_provider(msg: impl Into<String>) -> Self {
        Self::IdentityProvider(msg.into())
    }

    pub fn session_exchange(msg: impl Into<String>) -> Self {
        Self::SessionExchange(msg.into())
    }

    pub fn malformed_snapshot(msg: impl Into<String>) -> Self {
        Self::MalformedSnapshot(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
