//! Refresh-credential exchange over HTTP.

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use authrelay_core::{CredentialPair, CredentialRenewer, Secret};

/// Exchanges the refresh credential for a fresh pair at a fixed endpoint.
///
/// POSTs `{"refresh_token": ...}` and expects a JSON body carrying both
/// halves of the new pair. Any non-success status is a renewal failure;
/// the coordinator decides what that means for the session.
pub struct HttpRenewer {
    client: reqwest::Client,
    renew_url: Url,
}

#[derive(Deserialize)]
struct RenewResponse {
    access_token: String,
    refresh_token: String,
}

impl HttpRenewer {
    /// Create a renewer with a default reqwest client.
    pub fn new(renew_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            renew_url,
        }
    }

    /// Use a preconfigured reqwest client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl CredentialRenewer for HttpRenewer {
    async fn renew(&self, refresh: &Secret) -> anyhow::Result<CredentialPair> {
        tracing::debug!("renewing credentials against {}", self.renew_url);

        let response = self
            .client
            .post(self.renew_url.clone())
            .json(&serde_json::json!({ "refresh_token": refresh.expose() }))
            .send()
            .await
            .context("renewal request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("renewal rejected ({status}): {body}");
        }

        let issued: RenewResponse = response
            .json()
            .await
            .context("invalid renewal response")?;

        Ok(CredentialPair::new(issued.access_token, issued.refresh_token))
    }
}
