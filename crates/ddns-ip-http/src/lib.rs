// # HTTP IP Source
//
// Resolves the caller's public IP by asking a plain-text echo service
// (by default `http://ipinfo.io/ip`) and reading the response body.
//
// ## Behavior
//
// - One GET per call: no caching, no retries, no polling
// - The body is trimmed and returned verbatim; it is not parsed as an
//   address, so the published record is compared against exactly what the
//   echo service reported

use ddns_core::ProviderRegistry;
use ddns_core::config::IpSourceConfig;
use ddns_core::traits::{IpSource, IpSourceFactory};
use ddns_core::{Error, Result};

use std::time::Duration;

use tracing::debug;

/// Request timeout for the echo service
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// HTTP echo service IP source
pub struct HttpIpSource {
    /// URL returning the caller's IP as plain text
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: Echo service URL (e.g., "http://ipinfo.io/ip")
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<String> {
        debug!("Fetching public IP from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::provider(
                "http",
                format!("{} returned HTTP {}", self.url, status),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::read(format!("failed to read response from {}: {}", self.url, e)))?;

        let ip = body.trim();
        if ip.is_empty() {
            return Err(Error::read(format!("{} returned an empty body", self.url)));
        }

        Ok(ip.to_string())
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

/// Factory for creating HTTP IP sources
pub struct HttpFactory;

impl IpSourceFactory for HttpFactory {
    fn create(&self, config: &IpSourceConfig) -> Result<Box<dyn IpSource>> {
        config.validate()?;
        match config {
            IpSourceConfig::Http { url } => Ok(Box::new(HttpIpSource::new(url.clone())?)),
        }
    }
}

/// Register the HTTP IP source with a registry
pub fn register(registry: &ProviderRegistry) -> Result<()> {
    registry.register_ip_source("http", Box::new(HttpFactory))
}
