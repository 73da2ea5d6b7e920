//! Zone record resources and the calls the reconciler makes against them
//!
//! ```text
//! GET  /domain/zone/{zone}/record?fieldType={type}&subDomain={sub}   -> [id, ...]
//! GET  /domain/zone/{zone}/record/{id}                               -> RecordDetail
//! POST /domain/zone/{zone}/record        {fieldType, subDomain, target}
//! PUT  /domain/zone/{zone}/record/{id}   {target, subDomain}
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::decision::RecordIdentity;
use crate::error::{Error, Result};
use crate::traits::DnsApi;

/// Record detail as returned by the zone API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDetail {
    pub id: u64,
    pub zone: String,
    pub sub_domain: String,
    pub field_type: String,
    pub target: String,
    #[serde(default)]
    pub ttl: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewRecord<'a> {
    field_type: &'a str,
    sub_domain: &'a str,
    target: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordChange<'a> {
    target: &'a str,
    sub_domain: &'a str,
}

pub(crate) fn records_path(zone: &str) -> String {
    format!("/domain/zone/{}/record", zone)
}

pub(crate) fn record_path(zone: &str, id: u64) -> String {
    format!("/domain/zone/{}/record/{}", zone, id)
}

pub(crate) fn lookup_path(identity: &RecordIdentity) -> String {
    format!(
        "{}?fieldType={}&subDomain={}",
        records_path(&identity.zone),
        identity.field_type,
        identity.sub_domain
    )
}

/// Find the id of the record matching `identity`.
///
/// The provider filters on type and subdomain. If several records match,
/// the first id of the returned list is used. The provider does not document
/// its listing order, so duplicates are logged.
pub async fn find_record_id(api: &dyn DnsApi, identity: &RecordIdentity) -> Result<Option<u64>> {
    let path = lookup_path(identity);
    debug!("Looking up record ids: {}", path);

    let body = api.get(&path).await?;
    let ids: Vec<u64> = serde_json::from_value(body)
        .map_err(|e| Error::read(format!("unexpected record list for {}: {}", identity, e)))?;

    if ids.len() > 1 {
        warn!(
            "{} records match {}: {:?}; using the first one",
            ids.len(),
            identity,
            ids
        );
    }

    Ok(ids.first().copied())
}

/// Read the record `id` in the identity's zone
pub async fn fetch_record_detail(
    api: &dyn DnsApi,
    identity: &RecordIdentity,
    id: u64,
) -> Result<RecordDetail> {
    let path = record_path(&identity.zone, id);
    debug!("Fetching record detail: {}", path);

    let body = api.get(&path).await?;
    serde_json::from_value(body)
        .map_err(|e| Error::read(format!("unexpected record detail for id {}: {}", id, e)))
}

/// Create the record with `target`
pub async fn create_record(api: &dyn DnsApi, identity: &RecordIdentity, target: &str) -> Result<()> {
    let body = serde_json::to_value(NewRecord {
        field_type: &identity.field_type,
        sub_domain: &identity.sub_domain,
        target,
    })?;

    api.post(&records_path(&identity.zone), &body).await?;
    Ok(())
}

/// Point the existing record `id` at `target`
pub async fn update_record(
    api: &dyn DnsApi,
    identity: &RecordIdentity,
    id: u64,
    target: &str,
) -> Result<()> {
    let body = serde_json::to_value(RecordChange {
        target,
        sub_domain: &identity.sub_domain,
    })?;

    api.put(&record_path(&identity.zone, id), &body).await?;
    Ok(())
}
