//! Shared HTTP client, request headers and the transport seam.

use std::sync::OnceLock;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use tracing::{debug, warn};

use super::{AuthScheme, ProviderId};
use crate::error::{ParleyError, Result};

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}

/// Headers for one request: JSON content type, plus a bearer token unless
/// the provider carries its key in the URL.
pub fn request_headers(auth: AuthScheme, api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if auth == AuthScheme::Bearer {
        if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
            headers.insert(AUTHORIZATION, val);
        }
    }
    headers
}

/// Sends one JSON request and returns the parsed JSON response.
///
/// Implementations must map non-2xx statuses to [`ParleyError::Provider`]
/// carrying the raw body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(
        &self,
        provider: ProviderId,
        url: Url,
        headers: HeaderMap,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(shared_client().clone())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        provider: ProviderId,
        url: Url,
        headers: HeaderMap,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        debug!(provider = provider.as_str(), host = url.host_str(), "POST provider request");

        let resp = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            warn!(provider = provider.as_str(), status = status.as_u16(), "provider returned error status");
            return Err(ParleyError::provider(provider.as_str(), status.as_u16(), text));
        }

        serde_json::from_str(&text).map_err(|e| ParleyError::malformed(provider.as_str(), e.to_string()))
    }
}
