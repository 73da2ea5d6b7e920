// # IP Source Trait
//
// Defines the interface for resolving the caller's current public IP.
//
// ## Implementations
//
// - HTTP echo service: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//     let ip = source.current().await?;
//     println!("public IP: {}", ip);
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for IP source implementations
///
/// The value is returned as text, exactly as the source reported it minus
/// surrounding whitespace. It is compared byte-for-byte against the
/// published record target, so implementations must not reformat it.
///
/// # Rules
///
/// - One attempt per call: no retries, no backoff
/// - No caching: every call re-resolves
/// - Transport failures (connectivity, non-2xx) map to `Error::Transport`
/// - Body read failures or an empty body map to `Error::Read`
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Resolve the current public IP
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: Non-empty, whitespace-trimmed IP text
    /// - `Err(Error)`: If the IP could not be determined
    async fn current(&self) -> Result<String, crate::Error>;

    /// Short name of the source (for logging)
    fn source_name(&self) -> &'static str;
}

/// Helper trait for constructing IP sources from configuration
pub trait IpSourceFactory: Send + Sync {
    /// Create an IpSource instance from configuration
    fn create(
        &self,
        config: &crate::config::IpSourceConfig,
    ) -> Result<Box<dyn IpSource>, crate::Error>;
}
