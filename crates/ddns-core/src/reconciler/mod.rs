//! Record reconciler
//!
//! One pass brings a single DNS record in line with the caller's public IP:
//!
//! 1. Resolve the public IP via [`IpSource`]
//! 2. Look up the record id for the identity (first match wins)
//! 3. If found, fetch the record detail to learn its current target
//! 4. [`decide`] between create, update and no-op
//! 5. Issue at most one mutating call via [`DnsApi`]
//!
//! ## Flow
//!
//! ```text
//! [Start] --resolve ip--> lookup --> exists?
//!    no  --> [Create] --> [Done]
//!    yes --> fetch detail --> compare(actual, target)
//!               equal  --> [No-op]  --> [Done]
//!               differ --> [Update] --> [Done]
//! ```
//!
//! Every step runs sequentially and any failure ends the pass: later steps
//! depend on the earlier ones, so nothing downstream is attempted. Errors
//! carry the [`Step`] that failed.

mod decision;
pub mod zone;

pub use decision::{Decision, ExistingRecord, RecordIdentity, RecordState, decide, normalize_ip};
pub use zone::RecordDetail;

use std::fmt;

use tracing::{debug, info};

use crate::error::{Result, Step};
use crate::traits::{DnsApi, IpSource};

/// Result of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The record did not exist and was created
    Created {
        target: String,
    },
    /// The record existed with another target and was updated
    Updated {
        record_id: u64,
        previous: String,
        target: String,
    },
    /// The record already pointed at the actual IP
    Unchanged {
        record_id: u64,
        target: String,
    },
    /// Dry-run: the record is missing and would have been created
    WouldCreate {
        target: String,
    },
    /// Dry-run: the record is stale and would have been updated
    WouldUpdate {
        record_id: u64,
        previous: String,
        target: String,
    },
}

impl ReconcileOutcome {
    /// Whether the zone was changed by the pass
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Created { .. } | Self::Updated { .. })
    }
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { target } => write!(f, "created with target {}", target),
            Self::Updated {
                record_id,
                previous,
                target,
            } => write!(f, "record {} updated {} => {}", record_id, previous, target),
            Self::Unchanged { record_id, target } => {
                write!(f, "no changes, record {} already at {}", record_id, target)
            }
            Self::WouldCreate { target } => {
                write!(f, "[DRY-RUN] would create with target {}", target)
            }
            Self::WouldUpdate {
                record_id,
                previous,
                target,
            } => write!(
                f,
                "[DRY-RUN] would update record {} {} => {}",
                record_id, previous, target
            ),
        }
    }
}

/// Single-record reconciler
///
/// In dry-run mode the reads happen as usual, but the mutating call is
/// skipped; the outcome is then one of the `Would*` variants.
pub struct Reconciler {
    /// Public IP resolver
    ip_source: Box<dyn IpSource>,

    /// Zone API transport
    api: Box<dyn DnsApi>,

    /// The managed record
    identity: RecordIdentity,

    /// Skip mutating calls
    dry_run: bool,
}

impl Reconciler {
    pub fn new(
        ip_source: Box<dyn IpSource>,
        api: Box<dyn DnsApi>,
        identity: RecordIdentity,
    ) -> Self {
        Self {
            ip_source,
            api,
            identity,
            dry_run: false,
        }
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn identity(&self) -> &RecordIdentity {
        &self.identity
    }

    /// Run one full pass: observe, decide, apply
    ///
    /// A successful pass logs exactly one outcome line.
    pub async fn reconcile(&self) -> Result<ReconcileOutcome> {
        let state = self.observe().await?;
        let outcome = self.apply(&state).await?;
        info!("{}: {}", self.identity, outcome);
        Ok(outcome)
    }

    /// Gather the inputs of the decision.
    ///
    /// The IP is resolved first so that a resolver failure issues no API
    /// call at all.
    pub async fn observe(&self) -> Result<RecordState> {
        let actual_ip = self
            .ip_source
            .current()
            .await
            .and_then(|raw| normalize_ip(&raw))
            .map_err(|e| e.at(Step::ResolveIp))?;
        debug!(
            "Resolved public IP via {}: {}",
            self.ip_source.source_name(),
            actual_ip
        );

        let existing = match zone::find_record_id(self.api.as_ref(), &self.identity)
            .await
            .map_err(|e| e.at(Step::Lookup))?
        {
            Some(id) => {
                let detail = zone::fetch_record_detail(self.api.as_ref(), &self.identity, id)
                    .await
                    .map_err(|e| e.at(Step::FetchDetail))?;
                Some(ExistingRecord {
                    id,
                    target: detail.target,
                })
            }
            None => None,
        };

        RecordState::new(existing, &actual_ip)
    }

    /// Decide for `state` and carry the decision out
    async fn apply(&self, state: &RecordState) -> Result<ReconcileOutcome> {
        let decision = decide(state);
        debug!("Decision for {}: {:?}", self.identity, decision);

        let target = state.actual_ip().to_string();

        match (decision, state.existing()) {
            (Decision::Create, _) => {
                if self.dry_run {
                    return Ok(ReconcileOutcome::WouldCreate { target });
                }
                zone::create_record(self.api.as_ref(), &self.identity, &target)
                    .await
                    .map_err(|e| e.at(Step::Create))?;
                Ok(ReconcileOutcome::Created { target })
            }
            (Decision::NoOp { record_id }, _) => Ok(ReconcileOutcome::Unchanged { record_id, target }),
            (Decision::Update { record_id }, Some(existing)) => {
                let previous = existing.target.clone();
                if self.dry_run {
                    return Ok(ReconcileOutcome::WouldUpdate {
                        record_id,
                        previous,
                        target,
                    });
                }
                zone::update_record(self.api.as_ref(), &self.identity, record_id, &target)
                    .await
                    .map_err(|e| e.at(Step::Update))?;
                Ok(ReconcileOutcome::Updated {
                    record_id,
                    previous,
                    target,
                })
            }
            // decide() only updates an existing record
            (Decision::Update { record_id }, None) => Err(crate::Error::Other(format!(
                "update decided for record {} that was not observed",
                record_id
            ))),
        }
    }
}
