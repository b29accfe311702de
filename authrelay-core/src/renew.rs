//! Credential renewal seam.

use async_trait::async_trait;

use crate::store::{CredentialPair, Secret};

/// Obtains a fresh credential pair from the current refresh credential.
///
/// Implementations perform exactly one renewal attempt per invocation and
/// report any failure as an error; the coordinator guarantees at most one
/// invocation is outstanding at a time and decides what a failure means
/// for the session.
#[async_trait]
pub trait CredentialRenewer: Send + Sync + 'static {
    async fn renew(&self, refresh: &Secret) -> anyhow::Result<CredentialPair>;
}
