// # ddns-core
//
// Core library for the OVH dynamic DNS reconciler.
//
// ## Architecture Overview
//
// One invocation brings one DNS record in line with the caller's public IP:
// - **IpSource**: Trait for resolving the current public IP
// - **DnsApi**: Trait for the authenticated zone API transport
// - **Reconciler**: Resolve → lookup → fetch detail → decide → one mutation
// - **ProviderRegistry**: Plugin-based registry for API clients and IP sources
//
// ## Design Principles
//
// 1. **Separation of Concerns**: The decision is a pure function over the
//    observed state; network access lives behind the two traits
// 2. **Single Pass**: No loops, no retries, no background tasks
// 3. **Plugin-Based**: Implementations register by name, no hard-coded if-else
// 4. **Library-First**: The binary is a thin wrapper over this crate
// 5. **Idempotency**: Repeating a pass with an unchanged IP issues no mutation

pub mod config;
pub mod error;
pub mod reconciler;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use config::{DdnsConfig, IpSourceConfig, OvhConfig, ProviderConfig, RecordConfig};
pub use error::{Error, ErrorKind, Result, Step};
pub use reconciler::{Decision, ReconcileOutcome, Reconciler, RecordIdentity, RecordState, decide};
pub use registry::ProviderRegistry;
pub use traits::{DnsApi, IpSource};
