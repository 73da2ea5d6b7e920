// # OVH DNS Provider
//
// This crate provides the authenticated transport for the OVH API v1 used
// by the reconciler in `ddns-core`.
//
// ## Scope
//
// - Resolves endpoint aliases (`ovh-eu`, `ovh-ca`, ...) to API base URLs
// - Signs every request with the application secret and consumer key
// - Learns the clock offset to the API once per client (`GET /auth/time`)
// - Maps non-2xx responses to provider errors, carrying OVH's `message`
//
// The crate does not know about zones or records: the reconciler owns the
// resource paths and payloads. It makes one HTTP request per call with no
// retry and no caching beyond the clock offset.
//
// ## Security Requirements
//
// - Application secret and consumer key NEVER appear in logs
// - Credentials can be supplied via `OVH_*` environment variables
//
// ## API Reference
//
// - OVH API v1 authentication: https://help.ovhcloud.com/csm/en-api-getting-started-ovhcloud-api
// - Server time: GET `/auth/time`

use async_trait::async_trait;
use ddns_core::config::{OvhConfig, ProviderConfig};
use ddns_core::traits::{DnsApi, DnsApiFactory};
use ddns_core::{Error, Result};
use reqwest::Method;
use serde_json::Value;
use sha1::{Digest, Sha1};
use std::time::Duration;
use tokio::sync::OnceCell;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Known endpoint aliases and their API base URLs
const ENDPOINTS: &[(&str, &str)] = &[
    ("ovh-eu", "https://eu.api.ovh.com/1.0"),
    ("ovh-ca", "https://ca.api.ovh.com/1.0"),
    ("ovh-us", "https://api.us.ovhcloud.com/1.0"),
    ("kimsufi-eu", "https://eu.api.kimsufi.com/1.0"),
    ("kimsufi-ca", "https://ca.api.kimsufi.com/1.0"),
    ("soyoustart-eu", "https://eu.api.soyoustart.com/1.0"),
    ("soyoustart-ca", "https://ca.api.soyoustart.com/1.0"),
];

/// Resolve an endpoint alias or URL to an API base URL
///
/// A value starting with `http://` or `https://` is used as-is, minus any
/// trailing slash.
pub fn resolve_endpoint(endpoint: &str) -> Result<String> {
    let endpoint = endpoint.trim();
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return Ok(endpoint.trim_end_matches('/').to_string());
    }

    ENDPOINTS
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(endpoint))
        .map(|(_, url)| url.to_string())
        .ok_or_else(|| {
            Error::config(format!(
                "Unknown OVH endpoint '{}' (expected one of: {})",
                endpoint,
                ENDPOINTS
                    .iter()
                    .map(|(alias, _)| *alias)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
}

/// Compute the `X-Ovh-Signature` header value
///
/// ```text
/// "$1$" + hex(sha1(secret + "+" + consumer + "+" + METHOD + "+" + url + "+" + body + "+" + timestamp))
/// ```
///
/// `url` is the full request URL including the query string; `body` is the
/// exact request body, empty for GET.
pub fn sign(
    application_secret: &str,
    consumer_key: &str,
    method: &str,
    url: &str,
    body: &str,
    timestamp: i64,
) -> String {
    let mut hasher = Sha1::new();
    hasher.update(
        format!(
            "{}+{}+{}+{}+{}+{}",
            application_secret, consumer_key, method, url, body, timestamp
        )
        .as_bytes(),
    );
    format!("$1${}", hex::encode(hasher.finalize()))
}

/// Pull OVH's `message` out of an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// OVH API v1 client
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the application
/// secret or the consumer key.
pub struct OvhClient {
    /// API base URL, e.g. `https://eu.api.ovh.com/1.0`
    base_url: String,

    /// Application key (public)
    application_key: String,

    /// Application secret
    /// ⚠️ NEVER log this value
    application_secret: String,

    /// Consumer key
    /// ⚠️ NEVER log this value
    consumer_key: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Seconds to add to the local clock to match the API clock
    time_delta: OnceCell<i64>,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for OvhClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OvhClient")
            .field("base_url", &self.base_url)
            .field("application_key", &self.application_key)
            .field("application_secret", &"<REDACTED>")
            .field("consumer_key", &"<REDACTED>")
            .finish()
    }
}

impl OvhClient {
    /// Create a new OVH client
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a credential is empty or the endpoint is
    /// neither a known alias nor a URL.
    pub fn new(config: &OvhConfig) -> Result<Self> {
        config.validate()?;
        let base_url = resolve_endpoint(&config.endpoint)?;

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            application_key: config.application_key.clone(),
            application_secret: config.application_secret.clone(),
            consumer_key: config.consumer_key.clone(),
            client,
            time_delta: OnceCell::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Offset between the API clock and the local clock, fetched once
    async fn time_delta(&self) -> Result<i64> {
        self.time_delta
            .get_or_try_init(|| async {
                let url = format!("{}/auth/time", self.base_url);
                let response = self
                    .client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| Error::transport(format!("GET {} failed: {}", url, e)))?;

                let status = response.status();
                let text = response
                    .text()
                    .await
                    .map_err(|e| Error::read(format!("Failed to read server time: {}", e)))?;

                if !status.is_success() {
                    return Err(Error::provider(
                        "ovh",
                        format!("GET /auth/time returned HTTP {}: {}", status, error_message(&text)),
                    ));
                }

                let server_time: i64 = text
                    .trim()
                    .parse()
                    .map_err(|_| Error::read(format!("Invalid server time: {}", text.trim())))?;

                let delta = server_time - chrono::Utc::now().timestamp();
                tracing::debug!("OVH clock offset: {}s", delta);
                Ok(delta)
            })
            .await
            .copied()
    }

    /// Send one signed request and decode the JSON response
    async fn call(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let body_text = match body {
            Some(body) => serde_json::to_string(body)?,
            None => String::new(),
        };

        let timestamp = chrono::Utc::now().timestamp() + self.time_delta().await?;
        let signature = sign(
            &self.application_secret,
            &self.consumer_key,
            method.as_str(),
            &url,
            &body_text,
            timestamp,
        );

        tracing::debug!("OVH request: {} {}", method, path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("X-Ovh-Application", self.application_key.as_str())
            .header("X-Ovh-Consumer", self.consumer_key.as_str())
            .header("X-Ovh-Timestamp", timestamp.to_string())
            .header("X-Ovh-Signature", signature)
            .header("Content-Type", "application/json");
        if body.is_some() {
            request = request.body(body_text);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(format!("{} {} failed: {}", method, path, e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::read(format!("Failed to read response to {} {}: {}", method, path, e)))?;

        if !status.is_success() {
            return Err(Error::provider(
                "ovh",
                format!("{} {} returned HTTP {}: {}", method, path, status, error_message(&text)),
            ));
        }

        // Mutations answer with an empty body
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text)
            .map_err(|e| Error::read(format!("Failed to parse response to {} {}: {}", method, path, e)))
    }
}

#[async_trait]
impl DnsApi for OvhClient {
    async fn get(&self, path: &str) -> Result<Value> {
        self.call(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.call(Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.call(Method::PUT, path, Some(body)).await
    }

    fn provider_name(&self) -> &'static str {
        "ovh"
    }
}

/// Factory for creating OVH clients
pub struct OvhFactory;

impl DnsApiFactory for OvhFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsApi>> {
        match config {
            ProviderConfig::Ovh(ovh) => {
                let client = OvhClient::new(ovh)?;
                tracing::debug!("Created OVH client for {}", client.base_url());
                Ok(Box::new(client))
            }
        }
    }
}

/// Register the OVH provider with a registry
///
/// # Example
///
/// ```rust
/// use ddns_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// ddns_provider_ovh::register(&registry).unwrap();
/// assert!(registry.has_provider("ovh"));
/// ```
pub fn register(registry: &ddns_core::ProviderRegistry) -> Result<()> {
    registry.register_provider("ovh", Box::new(OvhFactory))
}
