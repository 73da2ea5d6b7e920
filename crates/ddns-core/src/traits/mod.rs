//! Core traits for the DDNS reconciler
//!
//! This module defines the seams between the reconciliation core and its
//! I/O collaborators.
//!
//! - [`IpSource`]: Resolve the caller's public IP
//! - [`DnsApi`]: Generic read/create/update primitives over the provider's REST resources

pub mod ip_source;
pub mod dns_api;

pub use ip_source::{IpSource, IpSourceFactory};
pub use dns_api::{DnsApi, DnsApiFactory};
