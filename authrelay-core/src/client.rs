//! Public entry point for coordinated authenticated calls.

use std::sync::Arc;

use crate::coordinator::RefreshCoordinator;
use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::error::CallResult;
use crate::model::{ApiCall, CallId};
use crate::renew::CredentialRenewer;
use crate::session::{NullObserver, SessionObserver};
use crate::store::{CredentialPair, CredentialStore};
use crate::transport::Transport;

/// Coordinated client for authenticated calls.
///
/// Wraps a [`Transport`] and a [`CredentialRenewer`] so that application
/// code sees a single operation: [`call`](ApiClient::call). When the
/// remote rejects the access credential, the affected calls are parked,
/// one renewal runs no matter how many calls are affected, and each call
/// is replayed with the fresh credential in the order it arrived.
///
/// Cloning the client produces another handle onto the same store and
/// coordinator.
///
/// # Example
///
/// ```rust,ignore
/// use authrelay_core::{ApiCall, ApiClient, CredentialPair};
///
/// let client = ApiClient::builder(transport, renewer).build();
/// client.sign_in(CredentialPair::new("access", "refresh"));
///
/// let profile = client.call(ApiCall::get("/profile")).await?;
/// ```
pub struct ApiClient<T, R> {
    store: Arc<CredentialStore>,
    dispatcher: Arc<Dispatcher<T>>,
    coordinator: Arc<RefreshCoordinator<T, R>>,
}

impl<T, R> Clone for ApiClient<T, R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            dispatcher: Arc::clone(&self.dispatcher),
            coordinator: Arc::clone(&self.coordinator),
        }
    }
}

impl<T, R> ApiClient<T, R>
where
    T: Transport,
    R: CredentialRenewer,
{
    /// Start building a client around the given collaborators.
    pub fn builder(transport: T, renewer: R) -> ApiClientBuilder<T, R> {
        ApiClientBuilder::new(transport, renewer)
    }

    /// Perform an authenticated call, transparently renewing credentials.
    ///
    /// The call suspends while a renewal it depends on is in flight; how
    /// long is bounded only by the renewal operation itself.
    pub async fn call(&self, call: ApiCall) -> CallResult {
        match self.dispatcher.dispatch(&call).await {
            DispatchOutcome::Done(result) => result,
            DispatchOutcome::SessionInvalid => {
                Arc::clone(&self.coordinator).recover(call).await
            }
        }
    }

    /// Cancel a call parked behind an in-flight renewal.
    ///
    /// Best effort: returns `false` when the call is not queued, either
    /// because it already settled or because its replay has begun. In the
    /// latter case the replay proceeds and its result is discarded.
    pub async fn cancel(&self, id: CallId) -> bool {
        self.coordinator.cancel(id).await
    }

    /// Install a credential pair, e.g. after a login flow.
    pub fn sign_in(&self, pair: CredentialPair) {
        self.store.set(pair);
    }

    /// Drop the current credential pair.
    pub fn sign_out(&self) {
        self.store.clear();
    }

    /// The credential store backing this client.
    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.store
    }
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder<T, R> {
    transport: T,
    renewer: R,
    store: Option<Arc<CredentialStore>>,
    observer: Option<Arc<dyn SessionObserver>>,
}

impl<T, R> ApiClientBuilder<T, R>
where
    T: Transport,
    R: CredentialRenewer,
{
    fn new(transport: T, renewer: R) -> Self {
        Self {
            transport,
            renewer,
            store: None,
            observer: None,
        }
    }

    /// Share an existing credential store, e.g. with login/logout flows
    /// living outside the client.
    pub fn store(mut self, store: Arc<CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Notify `observer` when a failed renewal tears the session down.
    pub fn observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn build(self) -> ApiClient<T, R> {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(CredentialStore::new()));
        let observer = self
            .observer
            .unwrap_or_else(|| Arc::new(NullObserver));

        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&store),
            Arc::new(self.transport),
        ));
        let coordinator = Arc::new(RefreshCoordinator::new(
            Arc::clone(&store),
            Arc::clone(&dispatcher),
            Arc::new(self.renewer),
            observer,
        ));

        ApiClient {
            store,
            dispatcher,
            coordinator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::store::Secret;
    use crate::transport::TransportResult;
    use async_trait::async_trait;
    use serde_json::json;

    struct OkTransport;

    #[async_trait]
    impl Transport for OkTransport {
        async fn send(&self, call: &ApiCall, _access: &Secret) -> TransportResult {
            TransportResult::Success(json!({ "path": call.path }))
        }
    }

    struct UnusedRenewer;

    #[async_trait]
    impl CredentialRenewer for UnusedRenewer {
        async fn renew(&self, _refresh: &Secret) -> anyhow::Result<CredentialPair> {
            Err(anyhow::anyhow!("renewal not expected in this test"))
        }
    }

    #[tokio::test]
    async fn test_call_requires_sign_in() {
        let client = ApiClient::builder(OkTransport, UnusedRenewer).build();

        let result = client.call(ApiCall::get("/accounts")).await;
        assert!(matches!(result, Err(ApiError::Unauthenticated)));

        client.sign_in(CredentialPair::new("access", "refresh"));
        let payload = client.call(ApiCall::get("/accounts")).await.unwrap();
        assert_eq!(payload, json!({ "path": "/accounts" }));
    }

    #[tokio::test]
    async fn test_sign_out_drops_credentials() {
        let client = ApiClient::builder(OkTransport, UnusedRenewer).build();
        client.sign_in(CredentialPair::new("access", "refresh"));
        assert!(client.credentials().is_authenticated());

        client.sign_out();
        assert!(!client.credentials().is_authenticated());
        let result = client.call(ApiCall::get("/accounts")).await;
        assert!(matches!(result, Err(ApiError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_builder_shares_store() {
        let store = Arc::new(CredentialStore::new());
        let client = ApiClient::builder(OkTransport, UnusedRenewer)
            .store(Arc::clone(&store))
            .build();

        // A login flow writing the shared store is visible to the client.
        store.set(CredentialPair::new("access", "refresh"));
        assert!(client.call(ApiCall::get("/accounts")).await.is_ok());
    }

    #[tokio::test]
    async fn test_cancel_unknown_call_is_noop() {
        let client = ApiClient::builder(OkTransport, UnusedRenewer).build();
        let stray = ApiCall::get("/accounts");
        assert!(!client.cancel(stray.id()).await);
    }
}
