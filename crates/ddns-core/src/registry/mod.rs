//! Plugin-based component registry
//!
//! The registry lets DNS API clients and IP sources be registered by name
//! at startup, so the binary never branches on provider types.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ddns_core::registry::ProviderRegistry;
//!
//! let registry = ProviderRegistry::new();
//! ddns_provider_ovh::register(&registry);
//! ddns_ip_http::register(&registry);
//!
//! let api = registry.create_provider(&config.provider())?;
//! let ip_source = registry.create_ip_source(&config.ip_source)?;
//! ```
//!
//! ## Registration
//!
//! Implementation crates expose a `register` function:
//!
//! ```rust,ignore
//! // In ddns-provider-ovh crate
//! pub fn register(registry: &ProviderRegistry) {
//!     registry.register_provider("ovh", Box::new(OvhFactory));
//! }
//! ```

use crate::config::{IpSourceConfig, ProviderConfig};
use crate::error::{Error, Result};
use crate::traits::{DnsApi, DnsApiFactory, IpSource, IpSourceFactory};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type Factories<F> = RwLock<HashMap<String, Box<F>>>;

/// Registry for plugin-based component creation
///
/// Maps type names (as reported by `ProviderConfig::type_name` and
/// `IpSourceConfig::type_name`) to factory objects.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Registered DNS API factories
    providers: Factories<dyn DnsApiFactory>,

    /// Registered IP source factories
    ip_sources: Factories<dyn IpSourceFactory>,
}

fn read<F: ?Sized>(map: &Factories<F>) -> Result<RwLockReadGuard<'_, HashMap<String, Box<F>>>> {
    map.read()
        .map_err(|_| Error::Other("registry lock poisoned".to_string()))
}

fn write<F: ?Sized>(map: &Factories<F>) -> Result<RwLockWriteGuard<'_, HashMap<String, Box<F>>>> {
    map.write()
        .map_err(|_| Error::Other("registry lock poisoned".to_string()))
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a DNS API factory
    ///
    /// # Parameters
    ///
    /// - `name`: Provider type name (e.g., "ovh")
    /// - `factory`: Factory object for creating API clients
    pub fn register_provider(
        &self,
        name: impl Into<String>,
        factory: Box<dyn DnsApiFactory>,
    ) -> Result<()> {
        write(&self.providers)?.insert(name.into(), factory);
        Ok(())
    }

    /// Register an IP source factory
    ///
    /// # Parameters
    ///
    /// - `name`: IP source type name (e.g., "http")
    /// - `factory`: Factory object for creating IP source instances
    pub fn register_ip_source(
        &self,
        name: impl Into<String>,
        factory: Box<dyn IpSourceFactory>,
    ) -> Result<()> {
        write(&self.ip_sources)?.insert(name.into(), factory);
        Ok(())
    }

    /// Create a DNS API client from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn DnsApi>)`: Created client
    /// - `Err(Error)`: If the provider type is not registered or creation fails
    pub fn create_provider(&self, config: &ProviderConfig) -> Result<Box<dyn DnsApi>> {
        let provider_type = config.type_name();
        let providers = read(&self.providers)?;

        let factory = providers
            .get(provider_type)
            .ok_or_else(|| Error::config(format!("Unknown provider type: {}", provider_type)))?;

        factory.create(config)
    }

    /// Create an IP source from configuration
    pub fn create_ip_source(&self, config: &IpSourceConfig) -> Result<Box<dyn IpSource>> {
        let source_type = config.type_name();
        let sources = read(&self.ip_sources)?;

        let factory = sources
            .get(source_type)
            .ok_or_else(|| Error::config(format!("Unknown IP source type: {}", source_type)))?;

        factory.create(config)
    }

    /// List all registered provider types
    pub fn list_providers(&self) -> Vec<String> {
        read(&self.providers)
            .map(|p| p.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// List all registered IP source types
    pub fn list_ip_sources(&self) -> Vec<String> {
        read(&self.ip_sources)
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Check if a provider type is registered
    pub fn has_provider(&self, name: &str) -> bool {
        read(&self.providers)
            .map(|p| p.contains_key(name))
            .unwrap_or(false)
    }

    /// Check if an IP source type is registered
    pub fn has_ip_source(&self, name: &str) -> bool {
        read(&self.ip_sources)
            .map(|s| s.contains_key(name))
            .unwrap_or(false)
    }
}
