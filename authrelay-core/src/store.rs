//! Credential storage.
//!
//! This module provides:
//! - [`Secret`] - A wrapper for sensitive values that prevents accidental logging
//! - [`CredentialPair`] - The access/refresh credential pair for a session
//! - [`CredentialStore`] - Shared in-memory authority for the current pair
//!
//! The store holds at most one [`CredentialPair`] and always replaces it
//! wholesale. A reader either sees a complete pair or nothing; it can never
//! observe an access credential from one renewal alongside a refresh
//! credential from another.
//!
//! # Write Discipline
//!
//! Only two things write the store: the refresh coordinator (after a
//! renewal settles) and explicit sign-in/sign-out flows. Everything else
//! just reads.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// A secret value that prevents accidental exposure in logs.
///
/// The inner value is only accessible via [`expose()`](Secret::expose).
/// Debug and Display implementations show `[REDACTED]` instead of the
/// value, and the backing memory is zeroed when the secret is dropped.
#[derive(Clone, Serialize, Deserialize)]
pub struct Secret(String);

impl Secret {
    /// Create a new secret from a string value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the secret value.
    ///
    /// Use sparingly and never log the result.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Consume the secret and return the inner value.
    pub fn into_inner(mut self) -> String {
        std::mem::take(&mut self.0)
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret([REDACTED])")
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Secret {}

/// The access/refresh credential pair for an authenticated session.
///
/// Created on successful sign-in or renewal and destroyed on sign-out or
/// unrecoverable renewal failure. Always handled as a unit; the store never
/// updates one half in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialPair {
    /// Short-lived credential attached to every outgoing call.
    pub access: Secret,

    /// Longer-lived credential used solely to obtain a new pair.
    pub refresh: Secret,

    /// When this pair was issued.
    pub issued_at: DateTime<Utc>,
}

impl CredentialPair {
    /// Create a pair stamped with the current time.
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: Secret::new(access),
            refresh: Secret::new(refresh),
            issued_at: Utc::now(),
        }
    }
}

/// Shared in-memory authority for the current credential pair.
///
/// The pair behind the lock is swapped as a single value; there is no way
/// to mutate it field by field through this type.
///
/// # Thread Safety
///
/// Interior mutability via `parking_lot::RwLock`; safe to share across
/// tasks and threads behind an `Arc`.
#[derive(Default)]
pub struct CredentialStore {
    pair: RwLock<Option<CredentialPair>>,
}

impl CredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current pair, if any.
    pub fn get(&self) -> Option<CredentialPair> {
        self.pair.read().clone()
    }

    /// Replace the pair wholesale.
    pub fn set(&self, pair: CredentialPair) {
        *self.pair.write() = Some(pair);
    }

    /// Remove the pair.
    pub fn clear(&self) {
        *self.pair.write() = None;
    }

    /// Whether a pair is currently present.
    pub fn is_authenticated(&self) -> bool {
        self.pair.read().is_some()
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_debug_redacted() {
        let secret = Secret::new("super-secret");
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_secret_display_redacted() {
        let secret = Secret::new("super-secret");
        let display = format!("{}", secret);
        assert!(!display.contains("super-secret"));
        assert!(display.contains("REDACTED"));
    }

    #[test]
    fn test_secret_into_inner() {
        let secret = Secret::new("value");
        assert_eq!(secret.into_inner(), "value");
    }

    #[test]
    fn test_store_starts_empty() {
        let store = CredentialStore::new();
        assert!(store.get().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_store_replaces_pair_wholesale() {
        let store = CredentialStore::new();
        store.set(CredentialPair::new("a1", "r1"));
        store.set(CredentialPair::new("a2", "r2"));

        let pair = store.get().unwrap();
        assert_eq!(pair.access.expose(), "a2");
        assert_eq!(pair.refresh.expose(), "r2");
    }

    #[test]
    fn test_store_clear() {
        let store = CredentialStore::new();
        store.set(CredentialPair::new("a1", "r1"));
        assert!(store.is_authenticated());

        store.clear();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_store_debug_hides_credentials() {
        let store = CredentialStore::new();
        store.set(CredentialPair::new("a1", "r1"));
        let debug = format!("{:?}", store);
        assert!(!debug.contains("a1"));
        assert!(debug.contains("authenticated"));
    }
}
