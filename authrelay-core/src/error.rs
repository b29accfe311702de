//! Error types surfaced to callers.

use thiserror::Error;

use crate::transport::Payload;

/// Errors surfaced by [`ApiClient::call`](crate::ApiClient::call).
///
/// An invalid-session response from the transport is never surfaced
/// directly. It is always converted into one of the outcomes below: a
/// successful replay, a [`RenewalFailed`](ApiError::RenewalFailed), a
/// [`Cancelled`](ApiError::Cancelled), or a terminal pass-through failure
/// when the freshly renewed credential is rejected as well.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No credential pair is present; the call was never sent.
    #[error("not authenticated: no credentials available")]
    Unauthenticated,

    /// The credential renewal itself failed. Every call waiting on that
    /// renewal receives this same error, and the session is torn down.
    #[error("credential renewal failed: {message}")]
    RenewalFailed { message: String },

    /// The call was cancelled while parked in the waiter queue.
    #[error("call cancelled while awaiting credential renewal")]
    Cancelled,

    /// Any transport failure other than an invalid session, passed through
    /// unchanged. A replay rejected immediately after a successful renewal
    /// also lands here; a second renewal is never started for it.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// Result of a single coordinated call.
pub type CallResult = Result<Payload, ApiError>;
