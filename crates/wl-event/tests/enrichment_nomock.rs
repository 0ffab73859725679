//! Integration tests for wl-event: real threads, no mocks.
//!
//! These tests verify:
//! - Concurrent enrichment from fanned-out workers lands on one event
//! - Capacity behavior under concurrent load
//! - The façade stays silent on scopes without an installed event

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use serde_json::json;
use wl_event::{enrich, ErrorInfo, ErrorKind, RequestMeta, RequestScope, UserInfo, WideEvent};

fn new_scope() -> (RequestScope, Arc<WideEvent>) {
    let event = Arc::new(WideEvent::new(RequestMeta::new(
        "req-int-1",
        "POST",
        "/v1/checkout",
        "192.168.1.50",
        "integration-test",
    )));
    (RequestScope::empty().install(Arc::clone(&event)), event)
}

#[test]
fn test_concurrent_workers_enrich_one_event() {
    let (scope, event) = new_scope();
    let workers = 32;

    let handles: Vec<_> = (0..workers)
        .map(|i| {
            let scope = scope.clone();
            thread::spawn(move || {
                // Each worker writes a distinct key and races on a shared one.
                enrich::add(&scope, format!("worker_{i}"), json!(i));
                enrich::add(&scope, "last_worker", json!(i));
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked");
    }

    let data = event.business_data();
    for i in 0..workers {
        assert_eq!(data[&format!("worker_{i}")], json!(i), "worker_{i} missing");
    }

    // The racing key holds some worker's value; which one is unspecified.
    let last = data["last_worker"].as_i64().expect("last_worker is a number");
    assert!((0..workers as i64).contains(&last));
    assert_eq!(data.len(), workers + 1);
}

#[test]
fn test_concurrent_load_respects_capacity() {
    let event = Arc::new(
        WideEvent::new(RequestMeta::new("req-cap", "GET", "/", "127.0.0.1", "t"))
            .with_max_entries(100),
    );
    let scope = RequestScope::empty().install(Arc::clone(&event));

    let handles: Vec<_> = (0..8)
        .map(|w| {
            let scope = scope.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    enrich::add(&scope, format!("w{w}_k{i}"), json!(i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked");
    }

    // 400 distinct keys attempted; exactly the cap survive.
    assert_eq!(event.len(), 100);
    assert_eq!(event.dropped_entries(), 300);
}

#[test]
fn test_mixed_shapes_from_service_layers() {
    let (scope, event) = new_scope();

    // Handler layer: single pairs and headers.
    enrich::add(&scope, "cart_items", json!(3));
    let headers: HashMap<String, String> = [
        ("Accept".to_string(), "application/json".to_string()),
        ("X-Api-Key".to_string(), "sk_live_777".to_string()),
    ]
    .into();
    enrich::add_headers(&scope, "request_headers", &headers);

    // Service layer: a safe batch with credentials inside.
    enrich::add_map_safe(
        &scope,
        HashMap::from([
            ("payment_method".to_string(), json!("card")),
            ("card_number".to_string(), json!("4111111111111111")),
        ]),
    );

    // Repository layer: flat pairs.
    enrich::add_pairs(&scope, &[json!("rows_touched"), json!(2)]);

    // Identity layer.
    enrich::set_user(&scope, UserInfo::new("u-55").with_subscription("pro"));
    enrich::set_trace_id(&scope, "trace-abc");

    let data = event.business_data();
    assert_eq!(data["cart_items"], json!(3));
    assert_eq!(data["request_headers"]["X-Api-Key"], "***MASKED***");
    assert_eq!(data["payment_method"], json!("card"));
    assert_eq!(data["card_number"], json!("4111...***MASKED***"));
    assert_eq!(data["rows_touched"], json!(2));
    assert_eq!(event.user().map(|u| u.id), Some("u-55".to_string()));
    assert_eq!(event.trace_id().as_deref(), Some("trace-abc"));

    let rendered = serde_json::to_string(&data).expect("snapshot serializes");
    assert!(!rendered.contains("sk_live_777"));
    assert!(!rendered.contains("4111111111111111"));
}

#[test]
fn test_uninstalled_scope_is_inert_everywhere() {
    let scope = RequestScope::empty();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let scope = scope.clone();
            thread::spawn(move || {
                enrich::add(&scope, format!("k{i}"), json!(i));
                enrich::attach_error(&scope, ErrorInfo::new(ErrorKind::Internal, "ignored"));
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("no-op worker panicked");
    }

    assert!(scope.event().is_none());
    assert!(enrich::current_error(&scope).is_none());
}
