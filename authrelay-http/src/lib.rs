//! # Authrelay HTTP
//!
//! reqwest-backed implementations of the `authrelay-core` seams:
//!
//! - [`HttpTransport`] - sends calls as JSON requests with a bearer
//!   access credential attached, and classifies HTTP 401 as an invalid
//!   session
//! - [`HttpRenewer`] - exchanges the refresh credential for a fresh pair
//!   at a fixed endpoint
//!
//! ## Example
//!
//! ```rust,ignore
//! use authrelay_core::{ApiCall, ApiClient, CredentialPair};
//! use authrelay_http::{HttpRenewer, HttpTransport};
//! use url::Url;
//!
//! let base = Url::parse("https://api.example.com")?;
//! let transport = HttpTransport::new(base.clone());
//! let renewer = HttpRenewer::new(base.join("/session/renew")?);
//!
//! let client = ApiClient::builder(transport, renewer).build();
//! client.sign_in(CredentialPair::new(access, refresh));
//! let accounts = client.call(ApiCall::get("/accounts")).await?;
//! ```

mod renew;
mod transport;

pub use renew::HttpRenewer;
pub use transport::HttpTransport;
