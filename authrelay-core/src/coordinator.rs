//! Single-flight credential renewal.
//!
//! [`RefreshCoordinator`] owns the refresh state machine and the waiter
//! queue. When a call discovers that its access credential was rejected,
//! it is parked here. The first such call starts exactly one renewal
//! operation; every later one attaches to the cycle already in flight. On
//! completion the queue is drained strictly in arrival order, replaying
//! each call with the fresh credential, or failing every one of them with
//! the renewal error after the session has been torn down.
//!
//! All phase transitions, enqueues, cancellations, and the entire
//! drain-and-return-to-idle sequence run under one async mutex. A call can
//! therefore never slip into the queue between the start of a drain and
//! the phase flipping back to idle: it either joins the drain or finds the
//! coordinator idle and starts a fresh cycle.

use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, error, info, warn};

use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::error::{ApiError, CallResult};
use crate::model::{ApiCall, CallId};
use crate::renew::CredentialRenewer;
use crate::session::SessionObserver;
use crate::store::{CredentialPair, CredentialStore, Secret};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshPhase {
    Idle,
    InFlight,
}

/// A parked call waiting for the in-flight renewal to settle.
///
/// `done` is a one-shot handle; exactly one of replay, failure fan-out, or
/// cancellation consumes it.
struct Waiter {
    call: ApiCall,
    done: oneshot::Sender<CallResult>,
}

struct RefreshState {
    phase: RefreshPhase,
    waiters: VecDeque<Waiter>,
}

/// Single-flight engine for credential renewal.
pub struct RefreshCoordinator<T, R> {
    store: Arc<CredentialStore>,
    dispatcher: Arc<Dispatcher<T>>,
    renewer: Arc<R>,
    observer: Arc<dyn SessionObserver>,
    state: Mutex<RefreshState>,
}

impl<T, R> RefreshCoordinator<T, R>
where
    T: crate::transport::Transport,
    R: CredentialRenewer,
{
    pub fn new(
        store: Arc<CredentialStore>,
        dispatcher: Arc<Dispatcher<T>>,
        renewer: Arc<R>,
        observer: Arc<dyn SessionObserver>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            renewer,
            observer,
            state: Mutex::new(RefreshState {
                phase: RefreshPhase::Idle,
                waiters: VecDeque::new(),
            }),
        }
    }

    /// Park `call` until a renewal settles, starting one if none is
    /// running.
    ///
    /// The triggering call is queued like every later arrival, so replay
    /// order and retry policy live in the drain alone. Returns the call's
    /// eventual outcome: its replay result after a successful renewal, the
    /// renewal error, or a cancellation.
    pub async fn recover(self: Arc<Self>, call: ApiCall) -> CallResult {
        let (tx, rx) = oneshot::channel();

        let start = {
            let mut state = self.state.lock().await;
            state.waiters.push_back(Waiter { call, done: tx });

            match state.phase {
                RefreshPhase::InFlight => {
                    debug!(
                        "renewal already in flight, {} call(s) now waiting",
                        state.waiters.len()
                    );
                    None
                }
                RefreshPhase::Idle => {
                    state.phase = RefreshPhase::InFlight;
                    // The refresh credential is captured in the same
                    // critical section that flips the phase, so the
                    // renewal uses the pair current at cycle start.
                    Some(self.store.get().map(|pair| pair.refresh))
                }
            }
        };

        if let Some(refresh) = start {
            // Detached task: a caller that drops its future mid-renewal
            // must not strand the other waiters.
            let coordinator = Arc::clone(&self);
            tokio::spawn(async move { coordinator.run_renewal(refresh).await });
        }

        match rx.await {
            Ok(result) => result,
            Err(_) => Err(ApiError::RenewalFailed {
                message: "renewal task aborted".to_string(),
            }),
        }
    }

    /// Cancel a parked call.
    ///
    /// Removes the call from the waiter queue and completes it with
    /// [`ApiError::Cancelled`]. Returns `false` when the call is not
    /// queued, either because it already settled or because its replay has
    /// begun.
    pub async fn cancel(&self, id: CallId) -> bool {
        let mut state = self.state.lock().await;
        let index = match state.waiters.iter().position(|w| w.call.id() == id) {
            Some(index) => index,
            None => return false,
        };
        if let Some(waiter) = state.waiters.remove(index) {
            let _ = waiter.done.send(Err(ApiError::Cancelled));
            debug!("cancelled parked call {id}");
            return true;
        }
        false
    }

    async fn run_renewal(self: Arc<Self>, refresh: Option<Secret>) {
        info!("starting credential renewal");

        let outcome = match refresh {
            Some(token) => self.renewer.renew(&token).await,
            None => Err(anyhow!("no refresh credential available")),
        };

        match outcome {
            Ok(pair) => self.finish_success(pair).await,
            Err(err) => self.finish_failure(err).await,
        }
    }

    /// Install the fresh pair and replay every parked call in arrival
    /// order, then return to idle.
    async fn finish_success(&self, pair: CredentialPair) {
        let mut state = self.state.lock().await;

        // The store must hold the new pair before the first replay reads it.
        self.store.set(pair);
        info!(
            "credential renewal succeeded, replaying {} call(s)",
            state.waiters.len()
        );

        while let Some(waiter) = state.waiters.pop_front() {
            let result = match self.dispatcher.dispatch(&waiter.call).await {
                DispatchOutcome::Done(result) => result,
                // The freshly issued credential was rejected straight away.
                // Surface a terminal failure instead of renewing again, so
                // a misbehaving backend cannot trap calls in a retry loop.
                DispatchOutcome::SessionInvalid => {
                    warn!(
                        "replay of {} rejected with fresh credentials",
                        waiter.call.id()
                    );
                    Err(ApiError::Transport(anyhow!(
                        "access credential rejected immediately after renewal"
                    )))
                }
            };
            // The caller may have gone away; a dropped receiver is fine.
            let _ = waiter.done.send(result);
        }

        state.phase = RefreshPhase::Idle;
    }

    /// Tear the session down once, then fail every parked call with the
    /// renewal error in arrival order and return to idle.
    ///
    /// The store is cleared and the observer notified before any waiter
    /// can observe its failure.
    async fn finish_failure(&self, err: anyhow::Error) {
        error!("credential renewal failed: {err:#}");

        self.store.clear();
        self.observer.on_session_invalidated(&err).await;

        let message = err.to_string();
        let mut state = self.state.lock().await;
        while let Some(waiter) = state.waiters.pop_front() {
            let _ = waiter.done.send(Err(ApiError::RenewalFailed {
                message: message.clone(),
            }));
        }
        state.phase = RefreshPhase::Idle;
    }
}
