//! Contract Test: Reconciliation Decisions
//!
//! Constraints verified:
//! - A missing record is created with the identity and the actual IP
//! - A stale record is updated in place, by the id the lookup returned
//! - A record already pointing at the actual IP is left alone
//! - At most one of create/update is issued per pass
//! - With several matching ids the first one is used
//!
//! If this test fails, the reconciler mutates the zone incorrectly.

mod common;

use common::*;
use ddns_core::{ReconcileOutcome, Reconciler};
use serde_json::json;

fn reconciler(ip: &str, api: &MockDnsApi) -> Reconciler {
    Reconciler::new(
        Box::new(FixedIpSource::new(ip)),
        Box::new(api.clone()),
        home_a(),
    )
}

#[tokio::test]
async fn missing_record_is_created() {
    let identity = home_a();
    let api = MockDnsApi::new().with_ids(&identity, &[]);

    let outcome = reconciler("203.0.113.7", &api).reconcile().await.unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::Created {
            target: "203.0.113.7".to_string()
        }
    );

    let posts = api.calls_with("POST");
    assert_eq!(posts.len(), 1, "exactly one create call");
    assert_eq!(posts[0].path, records_path(&identity));
    assert_eq!(
        posts[0].body,
        Some(json!({"fieldType": "A", "subDomain": "home", "target": "203.0.113.7"}))
    );
    assert!(api.calls_with("PUT").is_empty(), "no update on create");

    // No detail fetch for a record that does not exist
    assert_eq!(api.calls_with("GET").len(), 1);
}

#[tokio::test]
async fn stale_record_is_updated() {
    let identity = home_a();
    let api = MockDnsApi::new()
        .with_ids(&identity, &[42])
        .with_record(&identity, 42, "203.0.113.1");

    let outcome = reconciler("203.0.113.7", &api).reconcile().await.unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::Updated {
            record_id: 42,
            previous: "203.0.113.1".to_string(),
            target: "203.0.113.7".to_string(),
        }
    );

    let puts = api.calls_with("PUT");
    assert_eq!(puts.len(), 1, "exactly one update call");
    assert_eq!(puts[0].path, record_path(&identity, 42));
    assert_eq!(
        puts[0].body,
        Some(json!({"target": "203.0.113.7", "subDomain": "home"}))
    );
    assert!(api.calls_with("POST").is_empty(), "no create on update");
}

#[tokio::test]
async fn current_record_is_left_alone() {
    let identity = home_a();
    let api = MockDnsApi::new()
        .with_ids(&identity, &[42])
        .with_record(&identity, 42, "203.0.113.7");

    let outcome = reconciler("203.0.113.7", &api).reconcile().await.unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::Unchanged {
            record_id: 42,
            target: "203.0.113.7".to_string()
        }
    );
    assert_eq!(api.mutation_count(), 0);
}

#[tokio::test]
async fn echo_whitespace_is_ignored() {
    let identity = home_a();
    let api = MockDnsApi::new()
        .with_ids(&identity, &[42])
        .with_record(&identity, 42, "203.0.113.7");

    reconciler("  203.0.113.7\n", &api)
        .reconcile()
        .await
        .unwrap();

    assert_eq!(api.mutation_count(), 0);
}

#[tokio::test]
async fn first_matching_id_wins() {
    let identity = home_a();
    let api = MockDnsApi::new()
        .with_ids(&identity, &[7, 8])
        .with_record(&identity, 7, "203.0.113.1")
        .with_record(&identity, 8, "203.0.113.2");

    reconciler("203.0.113.7", &api).reconcile().await.unwrap();

    let gets: Vec<String> = api.calls_with("GET").into_iter().map(|c| c.path).collect();
    assert_eq!(gets, vec![lookup_path(&identity), record_path(&identity, 7)]);

    let puts = api.calls_with("PUT");
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].path, record_path(&identity, 7));
}

#[tokio::test]
async fn calls_are_issued_in_pipeline_order() {
    let identity = home_a();
    let api = MockDnsApi::new()
        .with_ids(&identity, &[42])
        .with_record(&identity, 42, "203.0.113.1");

    reconciler("203.0.113.7", &api).reconcile().await.unwrap();

    let methods: Vec<&str> = api.calls().iter().map(|c| c.method).collect();
    assert_eq!(methods, vec!["GET", "GET", "PUT"]);
}
