//! Transport seam between the coordination layer and the network.
//!
//! The coordination layer never talks to the network itself; it hands a
//! call and the current access credential to a [`Transport`] and branches
//! on the already-classified [`TransportResult`]. How the credential is
//! attached, what the wire format looks like, and which responses count as
//! an invalid session are all the transport's business.

use async_trait::async_trait;

use crate::model::ApiCall;
use crate::store::Secret;

/// Response payload produced by the transport.
///
/// Opaque to the coordination layer; it is routed back to the caller
/// without ever being inspected.
pub type Payload = serde_json::Value;

/// Result of one transport attempt, classified by the transport itself.
#[derive(Debug)]
pub enum TransportResult {
    /// The call completed; the payload goes back to the caller untouched.
    Success(Payload),

    /// The remote rejected the access credential. The call will be parked
    /// and replayed once a credential renewal settles.
    SessionInvalid,

    /// Any other failure, passed through to the caller unchanged.
    Failure(anyhow::Error),
}

/// Performs an outbound call with an access credential attached.
///
/// Exactly one attempt per invocation; retry decisions belong to the
/// coordination layer.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, call: &ApiCall, access: &Secret) -> TransportResult;
}
