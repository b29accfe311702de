//! Request dispatch: credential attachment and result classification.

use std::sync::Arc;

use crate::error::{ApiError, CallResult};
use crate::model::ApiCall;
use crate::store::CredentialStore;
use crate::transport::{Transport, TransportResult};

/// Outcome of a single dispatch attempt.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The call settled, one way or the other.
    Done(CallResult),

    /// The access credential was rejected. Recovery is the refresh
    /// coordinator's job; the call has not been completed.
    SessionInvalid,
}

/// Wraps every outbound call: reads the current access credential, hands
/// the call to the transport, and classifies the result.
pub struct Dispatcher<T> {
    store: Arc<CredentialStore>,
    transport: Arc<T>,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(store: Arc<CredentialStore>, transport: Arc<T>) -> Self {
        Self { store, transport }
    }

    /// Perform one transport attempt for `call`.
    ///
    /// Fails with [`ApiError::Unauthenticated`] before touching the network
    /// when no credential pair is present. An invalid-session response is
    /// reported as [`DispatchOutcome::SessionInvalid`] rather than an
    /// error, leaving the caller's operation open.
    pub async fn dispatch(&self, call: &ApiCall) -> DispatchOutcome {
        let Some(pair) = self.store.get() else {
            return DispatchOutcome::Done(Err(ApiError::Unauthenticated));
        };

        tracing::debug!("dispatching {} {} ({})", call.method, call.path, call.id());

        match self.transport.send(call, &pair.access).await {
            TransportResult::Success(payload) => DispatchOutcome::Done(Ok(payload)),
            TransportResult::SessionInvalid => {
                tracing::debug!("access credential rejected for {}", call.id());
                DispatchOutcome::SessionInvalid
            }
            TransportResult::Failure(err) => DispatchOutcome::Done(Err(ApiError::Transport(err))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CredentialPair, Secret};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Echoes the path and the access credential it was handed.
    struct EchoTransport {
        hits: AtomicUsize,
    }

    #[async_trait]
    impl Transport for EchoTransport {
        async fn send(&self, call: &ApiCall, access: &Secret) -> TransportResult {
            self.hits.fetch_add(1, Ordering::SeqCst);
            TransportResult::Success(json!({ "path": call.path, "access": access.expose() }))
        }
    }

    struct RejectingTransport;

    #[async_trait]
    impl Transport for RejectingTransport {
        async fn send(&self, _call: &ApiCall, _access: &Secret) -> TransportResult {
            TransportResult::SessionInvalid
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        async fn send(&self, _call: &ApiCall, _access: &Secret) -> TransportResult {
            TransportResult::Failure(anyhow::anyhow!("connection reset"))
        }
    }

    #[tokio::test]
    async fn test_unauthenticated_without_touching_transport() {
        let transport = Arc::new(EchoTransport {
            hits: AtomicUsize::new(0),
        });
        let dispatcher = Dispatcher::new(Arc::new(CredentialStore::new()), Arc::clone(&transport));

        match dispatcher.dispatch(&ApiCall::get("/profile")).await {
            DispatchOutcome::Done(Err(ApiError::Unauthenticated)) => {}
            other => panic!("expected unauthenticated failure, got {:?}", other),
        }
        assert_eq!(transport.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_attaches_current_access_credential() {
        let store = Arc::new(CredentialStore::new());
        store.set(CredentialPair::new("access-1", "refresh-1"));
        let dispatcher = Dispatcher::new(
            store,
            Arc::new(EchoTransport {
                hits: AtomicUsize::new(0),
            }),
        );

        match dispatcher.dispatch(&ApiCall::get("/profile")).await {
            DispatchOutcome::Done(Ok(payload)) => {
                assert_eq!(payload, json!({ "path": "/profile", "access": "access-1" }));
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_session_is_not_an_error() {
        let store = Arc::new(CredentialStore::new());
        store.set(CredentialPair::new("stale", "refresh"));
        let dispatcher = Dispatcher::new(store, Arc::new(RejectingTransport));

        match dispatcher.dispatch(&ApiCall::get("/profile")).await {
            DispatchOutcome::SessionInvalid => {}
            other => panic!("expected invalid session, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_other_failures_pass_through() {
        let store = Arc::new(CredentialStore::new());
        store.set(CredentialPair::new("access", "refresh"));
        let dispatcher = Dispatcher::new(store, Arc::new(FailingTransport));

        match dispatcher.dispatch(&ApiCall::get("/profile")).await {
            DispatchOutcome::Done(Err(ApiError::Transport(err))) => {
                assert!(err.to_string().contains("connection reset"));
            }
            other => panic!("expected transport failure, got {:?}", other),
        }
    }
}
