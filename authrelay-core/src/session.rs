//! Session teardown notification.

use async_trait::async_trait;

/// Notified when the session can no longer be recovered.
///
/// Fired at most once per failed renewal and never on success, after the
/// credential store has been cleared and before any waiting call observes
/// its failure. Implementations typically clear externally persisted
/// credential copies and route the application to a signed-out state.
///
/// Implementations must not issue authenticated calls from the callback.
#[async_trait]
pub trait SessionObserver: Send + Sync + 'static {
    async fn on_session_invalidated(&self, error: &anyhow::Error);
}

/// Observer that ignores teardown notifications.
///
/// The default when no observer is configured.
pub struct NullObserver;

#[async_trait]
impl SessionObserver for NullObserver {
    async fn on_session_invalidated(&self, _error: &anyhow::Error) {}
}
