//! Configuration types for the DDNS reconciler
//!
//! The configuration file is JSON:
//!
//! ```json
//! {
//!   "ovh": {
//!     "endpoint": "ovh-eu",
//!     "application_key": "...",
//!     "application_secret": "...",
//!     "consumer_key": "..."
//!   },
//!   "record": { "zone": "example.com", "subDomain": "home", "recordType": "A" },
//!   "ip_source": { "type": "http", "url": "http://ipinfo.io/ip" }
//! }
//! ```
//!
//! `ip_source` and `dry_run` are optional. OVH credentials can be supplied
//! or overridden through `OVH_*` environment variables so they can stay out
//! of the file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default IP echo service
pub const DEFAULT_IP_ECHO_URL: &str = "http://ipinfo.io/ip";

/// Main DDNS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// OVH API credentials
    pub ovh: OvhConfig,

    /// The single record to reconcile
    pub record: RecordConfig,

    /// Where the public IP comes from
    #[serde(default)]
    pub ip_source: IpSourceConfig,

    /// Log the decision without performing the mutating call
    #[serde(default)]
    pub dry_run: bool,
}

impl DdnsConfig {
    /// Parse a configuration from a JSON string (not validated)
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::config(format!("invalid config: {}", e)))
    }

    /// Read and parse a configuration file (not validated)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read config file {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// Recognised keys: `OVH_ENDPOINT`, `OVH_APPLICATION_KEY`,
    /// `OVH_APPLICATION_SECRET`, `OVH_CONSUMER_KEY` and `DDNS_MODE`
    /// (`dry-run`, or `live`/`normal`). Empty values are ignored; any other
    /// `DDNS_MODE` value is a configuration error.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get("OVH_ENDPOINT") {
            self.ovh.endpoint = v;
        }
        if let Some(v) = get("OVH_APPLICATION_KEY") {
            self.ovh.application_key = v;
        }
        if let Some(v) = get("OVH_APPLICATION_SECRET") {
            self.ovh.application_secret = v;
        }
        if let Some(v) = get("OVH_CONSUMER_KEY") {
            self.ovh.consumer_key = v;
        }
        if let Some(mode) = get("DDNS_MODE") {
            self.dry_run = match mode.to_lowercase().as_str() {
                "dry-run" => true,
                "live" | "normal" => false,
                _ => {
                    return Err(Error::config(format!(
                        "DDNS_MODE '{}' is not valid. Valid modes: dry-run, live, normal",
                        mode
                    )));
                }
            };
        }
        Ok(())
    }

    /// Validate the configuration
    ///
    /// Every required field must be non-empty.
    pub fn validate(&self) -> Result<()> {
        self.ovh.validate()?;
        self.record.validate()?;
        self.ip_source.validate()?;
        Ok(())
    }

    /// Provider configuration for the component registry
    pub fn provider(&self) -> ProviderConfig {
        ProviderConfig::Ovh(self.ovh.clone())
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::config(format!("missing required field `{}`", field)));
    }
    Ok(())
}

/// OVH API credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct OvhConfig {
    /// Endpoint alias (`ovh-eu`, `ovh-ca`, ...) or a base URL
    pub endpoint: String,
    pub application_key: String,
    pub application_secret: String,
    pub consumer_key: String,
}

impl OvhConfig {
    pub fn validate(&self) -> Result<()> {
        require("ovh.endpoint", &self.endpoint)?;
        require("ovh.application_key", &self.application_key)?;
        require("ovh.application_secret", &self.application_secret)?;
        require("ovh.consumer_key", &self.consumer_key)?;
        Ok(())
    }
}

// Secrets never reach logs
impl std::fmt::Debug for OvhConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OvhConfig")
            .field("endpoint", &self.endpoint)
            .field("application_key", &self.application_key)
            .field("application_secret", &"<REDACTED>")
            .field("consumer_key", &"<REDACTED>")
            .finish()
    }
}

/// The DNS record to keep in sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordConfig {
    /// DNS zone managed at OVH (e.g. "example.com")
    pub zone: String,

    /// Host label inside the zone (e.g. "home")
    #[serde(rename = "subDomain")]
    pub sub_domain: String,

    /// Record type (e.g. "A", "AAAA")
    #[serde(rename = "recordType")]
    pub record_type: String,
}

impl RecordConfig {
    pub fn validate(&self) -> Result<()> {
        require("record.zone", &self.zone)?;
        require("record.subDomain", &self.sub_domain)?;
        require("record.recordType", &self.record_type)?;
        Ok(())
    }
}

/// IP source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpSourceConfig {
    /// Plain-text IP echo service
    Http {
        /// URL returning the caller's IP as the response body
        #[serde(default = "default_ip_echo_url")]
        url: String,
    },
}

impl IpSourceConfig {
    /// Validate the IP source configuration
    pub fn validate(&self) -> Result<()> {
        match self {
            IpSourceConfig::Http { url } => {
                require("ip_source.url", url)?;
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(Error::config(format!(
                        "ip_source.url must use http or https: {}",
                        url
                    )));
                }
                Ok(())
            }
        }
    }

    /// Get the IP source type name
    pub fn type_name(&self) -> &str {
        match self {
            IpSourceConfig::Http { .. } => "http",
        }
    }
}

impl Default for IpSourceConfig {
    fn default() -> Self {
        IpSourceConfig::Http {
            url: default_ip_echo_url(),
        }
    }
}

fn default_ip_echo_url() -> String {
    DEFAULT_IP_ECHO_URL.to_string()
}

/// DNS provider configuration
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    /// OVH zone API
    Ovh(OvhConfig),
}

impl ProviderConfig {
    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Ovh(_) => "ovh",
        }
    }
}
