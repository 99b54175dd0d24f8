//! Burst behavior of the concurrency runner.

mod common;

use common::context_for;

use std::time::{Duration, Instant};

use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};
use wt_harness::{AllOf, BurstCheck, Check, ConcurrencyRunner, FollowUp, RequestSpec};

#[tokio::test]
async fn test_healthy_server_serves_all_concurrent_requests() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(5)
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);

    let outcome = ConcurrencyRunner::new(ctx.client().clone())
        .run("/", 5, 5, Duration::from_secs(5))
        .await;

    assert_eq!(outcome.dispatched, 5);
    assert_eq!(outcome.succeeded, 5);
    assert_eq!(outcome.failed(), 0);
}

#[tokio::test]
async fn test_requests_run_concurrently_within_pool() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);

    let started = Instant::now();
    let outcome = ConcurrencyRunner::new(ctx.client().clone())
        .run("/", 10, 10, Duration::from_secs(5))
        .await;

    assert_eq!(outcome.succeeded, 10);
    // Sequential execution would take 3s
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_timeouts_count_as_failures_without_aborting_others() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);

    let outcome = ConcurrencyRunner::new(ctx.client().clone())
        .run("/", 4, 2, Duration::from_millis(200))
        .await;

    assert_eq!(outcome.dispatched, 4);
    assert_eq!(outcome.succeeded, 0);
    assert!(!outcome.meets(1));
}

#[tokio::test]
async fn test_error_statuses_are_not_successes() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);

    let outcome = ConcurrencyRunner::new(ctx.client().clone())
        .run("/", 3, 3, Duration::from_secs(2))
        .await;

    assert_eq!(outcome.succeeded, 0);
}

#[tokio::test]
async fn test_burst_check_with_follow_up_passes_on_healthy_server() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);

    let check = BurstCheck::new("Stress test survival", 10, 10, Duration::from_secs(5), 8)
        .with_follow_up(FollowUp {
            settle: Duration::from_millis(10),
            request: RequestSpec::get("/"),
            expect: AllOf::status(200),
        });
    let verdict = check.run(&ctx).await.unwrap();

    assert!(verdict.passed, "{}", verdict.detail);
    assert!(verdict.detail.contains("10/10 requests succeeded (need 8)"));
    assert!(verdict.detail.contains("after burst: Status: 200"));
}

#[tokio::test]
async fn test_burst_check_below_threshold_fails() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);

    let check = BurstCheck::new("Concurrent connections", 5, 5, Duration::from_secs(2), 4);
    let verdict = check.run(&ctx).await.unwrap();

    assert!(!verdict.passed);
    assert!(check.critical());
}
