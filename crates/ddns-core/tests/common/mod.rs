//! Test doubles and common utilities for reconciliation contract tests
//!
//! The doubles count and record every call so tests can assert exactly
//! which network operations a pass issued.

#![allow(dead_code)]

use ddns_core::RecordIdentity;
use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsApi, IpSource};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An IpSource that always returns the same text
pub struct FixedIpSource {
    ip: String,
    call_count: Arc<AtomicUsize>,
}

impl FixedIpSource {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times current() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Create a new FixedIpSource that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            ip: other.ip.clone(),
            call_count: Arc::clone(&other.call_count),
        }
    }
}

#[async_trait::async_trait]
impl IpSource for FixedIpSource {
    async fn current(&self) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip.clone())
    }

    fn source_name(&self) -> &'static str {
        "fixed"
    }
}

/// An IpSource whose every call fails with a transport error
pub struct FailingIpSource;

#[async_trait::async_trait]
impl IpSource for FailingIpSource {
    async fn current(&self) -> Result<String> {
        Err(Error::transport("ip echo unreachable"))
    }

    fn source_name(&self) -> &'static str {
        "failing"
    }
}

/// One request seen by [`MockDnsApi`]
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

/// A scripted DnsApi
///
/// GET responses are keyed by exact path; unknown paths fail like a 404.
/// Clones share the recorded calls and the scripted responses.
#[derive(Clone, Default)]
pub struct MockDnsApi {
    responses: Arc<Mutex<HashMap<String, Value>>>,
    failures: Arc<Mutex<Vec<(&'static str, String)>>>,
    calls: Arc<Mutex<Vec<ApiCall>>>,
}

impl MockDnsApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the response for a GET on `path`
    pub fn respond(self, path: impl Into<String>, body: Value) -> Self {
        self.responses.lock().unwrap().insert(path.into(), body);
        self
    }

    /// Script the id listing for `identity`
    pub fn with_ids(self, identity: &RecordIdentity, ids: &[u64]) -> Self {
        self.respond(lookup_path(identity), json!(ids))
    }

    /// Script the detail of record `id`
    pub fn with_record(self, identity: &RecordIdentity, id: u64, target: &str) -> Self {
        self.respond(
            record_path(identity, id),
            json!({
                "id": id,
                "zone": identity.zone,
                "subDomain": identity.sub_domain,
                "fieldType": identity.field_type,
                "target": target,
                "ttl": 0
            }),
        )
    }

    /// Make every `method` call on `path` fail with a transport error
    pub fn fail_on(self, method: &'static str, path: impl Into<String>) -> Self {
        self.failures.lock().unwrap().push((method, path.into()));
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_with(&self, method: &str) -> Vec<ApiCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    /// Number of POST and PUT calls
    pub fn mutation_count(&self) -> usize {
        self.calls_with("POST").len() + self.calls_with("PUT").len()
    }

    fn record(&self, method: &'static str, path: &str, body: Option<&Value>) -> Result<()> {
        self.calls.lock().unwrap().push(ApiCall {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });

        let failing = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .any(|(m, p)| *m == method && p == path);
        if failing {
            return Err(Error::provider("mock", format!("{} {} -> 500", method, path)));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DnsApi for MockDnsApi {
    async fn get(&self, path: &str) -> Result<Value> {
        self.record("GET", path, None)?;
        self.responses
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| Error::provider("mock", format!("GET {} -> 404", path)))
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.record("POST", path, Some(body))?;
        Ok(Value::Null)
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.record("PUT", path, Some(body))?;
        Ok(Value::Null)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// The identity used throughout the contract tests
pub fn home_a() -> RecordIdentity {
    RecordIdentity::new("example.com", "home", "A")
}

pub fn lookup_path(identity: &RecordIdentity) -> String {
    format!(
        "/domain/zone/{}/record?fieldType={}&subDomain={}",
        identity.zone, identity.field_type, identity.sub_domain
    )
}

pub fn records_path(identity: &RecordIdentity) -> String {
    format!("/domain/zone/{}/record", identity.zone)
}

pub fn record_path(identity: &RecordIdentity, id: u64) -> String {
    format!("/domain/zone/{}/record/{}", identity.zone, id)
}
