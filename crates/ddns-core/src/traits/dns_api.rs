// # DNS API Trait
//
// Defines the authenticated transport used to read and write zone records.
//
// The reconciler owns the resource paths and the meaning of the payloads;
// an implementation only knows how to send an authenticated request for a
// path and hand back the decoded JSON body.
//
// ## Implementations
//
// - OVH: `ddns-provider-ovh` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsApi;
//
// let ids = api.get("/domain/zone/example.com/record?fieldType=A&subDomain=home").await?;
// ```

use async_trait::async_trait;
use serde_json::Value;

/// Trait for DNS provider transports
///
/// # Rules
///
/// - Exactly one HTTP request per call; no retries, no background tasks
/// - `path` is relative to the provider's API base and may carry a query string
/// - Connectivity failures and non-2xx statuses map to `Error::Transport`
///   (or `Error::Provider`)
/// - Undecodable bodies map to `Error::Read`; an empty 2xx body is `Value::Null`
/// - Implementations hold no state about records between calls
#[async_trait]
pub trait DnsApi: Send + Sync {
    /// Read a resource
    async fn get(&self, path: &str) -> Result<Value, crate::Error>;

    /// Create a resource (HTTP POST)
    async fn post(&self, path: &str, body: &Value) -> Result<Value, crate::Error>;

    /// Replace fields of an existing resource (HTTP PUT)
    async fn put(&self, path: &str, body: &Value) -> Result<Value, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS API clients from configuration
pub trait DnsApiFactory: Send + Sync {
    /// Create a DnsApi instance from configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn DnsApi>, crate::Error>;
}
