//! Record identity, observed state and the pure reconciliation decision

use std::fmt;

use crate::config::RecordConfig;
use crate::error::{Error, Result};

/// Logical identity of the managed record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIdentity {
    pub zone: String,
    pub sub_domain: String,
    /// DNS record type, e.g. "A"
    pub field_type: String,
}

impl RecordIdentity {
    pub fn new(
        zone: impl Into<String>,
        sub_domain: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Self {
        Self {
            zone: zone.into(),
            sub_domain: sub_domain.into(),
            field_type: field_type.into(),
        }
    }
}

impl From<&RecordConfig> for RecordIdentity {
    fn from(cfg: &RecordConfig) -> Self {
        Self::new(&cfg.zone, &cfg.sub_domain, &cfg.record_type)
    }
}

impl fmt::Display for RecordIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} ({})", self.sub_domain, self.zone, self.field_type)
    }
}

/// A record found at the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingRecord {
    /// Provider-assigned record id
    pub id: u64,
    /// Value currently published by the record
    pub target: String,
}

/// Working model of one record for a single reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordState {
    existing: Option<ExistingRecord>,
    actual_ip: String,
}

impl RecordState {
    /// Build the state from the remote observation and the resolved IP
    ///
    /// The IP is trimmed; an empty IP is rejected since nothing could be
    /// compared against it.
    pub fn new(existing: Option<ExistingRecord>, actual_ip: &str) -> Result<Self> {
        Ok(Self {
            existing,
            actual_ip: normalize_ip(actual_ip)?,
        })
    }

    pub fn exists(&self) -> bool {
        self.existing.is_some()
    }

    pub fn existing(&self) -> Option<&ExistingRecord> {
        self.existing.as_ref()
    }

    pub fn actual_ip(&self) -> &str {
        &self.actual_ip
    }
}

/// Trim a resolved IP, rejecting a blank one
pub fn normalize_ip(raw: &str) -> Result<String> {
    let ip = raw.trim();
    if ip.is_empty() {
        return Err(Error::read("resolved IP is empty"));
    }
    Ok(ip.to_string())
}

/// What a reconciliation pass has to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No record matches the identity
    Create,
    /// The record publishes a different value
    Update { record_id: u64 },
    /// The record already publishes the actual IP
    NoOp { record_id: u64 },
}

impl Decision {
    /// Whether this decision issues a mutating call
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Decision::NoOp { .. })
    }
}

/// Decide the single action for a record state.
///
/// Existence is checked first: a missing record is always created and never
/// compared. Comparison is exact string equality, no address normalisation.
pub fn decide(state: &RecordState) -> Decision {
    match state.existing() {
        None => Decision::Create,
        Some(record) if record.target == state.actual_ip() => Decision::NoOp {
            record_id: record.id,
        },
        Some(record) => Decision::Update {
            record_id: record.id,
        },
    }
}
