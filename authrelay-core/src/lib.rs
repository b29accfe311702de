//! # Authrelay Core
//!
//! Coordination layer for authenticated calls against a remote HTTP-style
//! API.
//!
//! This crate provides:
//! - A [`CredentialStore`] holding the current access/refresh pair,
//!   replaced only as a unit
//! - A [`Dispatcher`] that attaches the credential to every outgoing call
//!   and classifies the transport's answer
//! - A [`RefreshCoordinator`] guaranteeing that when many concurrent calls
//!   find their credential stale at once, exactly one renewal runs while
//!   every affected call is parked, re-credentialed, and replayed in
//!   arrival order
//! - The [`ApiClient`] facade exposing the single `call` operation
//!
//! The network itself stays outside: callers inject a [`Transport`], a
//! [`CredentialRenewer`], and optionally a [`SessionObserver`] notified
//! exactly once when a failed renewal tears the session down. The
//! `authrelay-http` crate supplies reqwest-backed implementations.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use authrelay_core::{ApiCall, ApiClient, CredentialPair};
//!
//! let client = ApiClient::builder(transport, renewer).build();
//! client.sign_in(CredentialPair::new("access", "refresh"));
//!
//! // If the access credential has gone stale, this call is parked while
//! // one renewal runs, then replayed - the caller never sees the stale
//! // credential error.
//! let bills = client.call(ApiCall::get("/bills")).await?;
//! ```
//!
//! ## What is deliberately not handled
//!
//! Only credential invalidation is recovered from. Every other transport
//! failure passes through unchanged, and a call whose replay is rejected
//! immediately after a successful renewal fails terminally rather than
//! starting a second renewal.

pub mod client;
pub mod coordinator;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod renew;
pub mod session;
pub mod store;
pub mod transport;

// Re-export commonly used types at crate root
pub use client::{ApiClient, ApiClientBuilder};
pub use coordinator::RefreshCoordinator;
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use error::{ApiError, CallResult};
pub use model::{ApiCall, CallId, Method};
pub use renew::CredentialRenewer;
pub use session::{NullObserver, SessionObserver};
pub use store::{CredentialPair, CredentialStore, Secret};
pub use transport::{Payload, Transport, TransportResult};
