//! JSON-over-HTTP transport.

use anyhow::anyhow;
use async_trait::async_trait;
use url::Url;

use authrelay_core::{ApiCall, Method, Payload, Secret, Transport, TransportResult};

/// Sends calls as JSON requests against a base URL.
///
/// The access credential travels as a bearer `Authorization` header. An
/// HTTP 401 is classified as an invalid session; every other non-success
/// status is an ordinary failure carrying the status and response body.
pub struct HttpTransport {
    client: reqwest::Client,
    base: Url,
}

impl HttpTransport {
    /// Create a transport with a default reqwest client.
    pub fn new(base: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base,
        }
    }

    /// Use a preconfigured reqwest client (timeouts, proxies, ...).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, call: &ApiCall, access: &Secret) -> TransportResult {
        let url = match self.base.join(&call.path) {
            Ok(url) => url,
            Err(err) => {
                return TransportResult::Failure(anyhow!(
                    "invalid call path {:?}: {err}",
                    call.path
                ));
            }
        };

        let mut request = self
            .client
            .request(Self::method(call.method), url)
            .bearer_auth(access.expose());
        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => return TransportResult::Failure(err.into()),
        };

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return TransportResult::SessionInvalid;
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return TransportResult::Failure(anyhow!("request failed ({status}): {body}"));
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => return TransportResult::Failure(err.into()),
        };
        if text.is_empty() {
            return TransportResult::Success(Payload::Null);
        }
        match serde_json::from_str(&text) {
            Ok(payload) => TransportResult::Success(payload),
            Err(err) => TransportResult::Failure(anyhow!("invalid response body: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_mapping() {
        assert_eq!(HttpTransport::method(Method::Get), reqwest::Method::GET);
        assert_eq!(HttpTransport::method(Method::Patch), reqwest::Method::PATCH);
    }

    #[test]
    fn test_path_joining() {
        let transport = HttpTransport::new(Url::parse("http://localhost:3000").unwrap());
        let joined = transport.base.join("/bills/42").unwrap();
        assert_eq!(joined.as_str(), "http://localhost:3000/bills/42");
    }
}
