//! Integration tests for single-flight token renewal
//!
//! Concurrent callers on a multi-threaded runtime must share one token
//! request, and abandoning a caller must not abandon the request.

#![cfg(feature = "runtime")]

use std::sync::Arc;
use std::time::Duration;

use basalam_common::auth::{AuthContext, AuthError, ClientCredentials, OAuthConfig};
use basalam_common::testing::{MockClock, MockTransport};
use futures::future::join_all;
use serde_json::json;

const TOKEN_URL: &str = "https://auth.test/oauth/token";
const CALLERS: usize = 32;

fn context(transport: &MockTransport, clock: &MockClock) -> AuthContext<ClientCredentials> {
    let strategy = ClientCredentials::with_clock(
        OAuthConfig::new("c", "s").with_token_url(TOKEN_URL),
        Arc::new(transport.clone()),
        Arc::new(clock.clone()),
    )
    .expect("valid config");
    AuthContext::with_clock(strategy, Arc::new(clock.clone()))
        .with_refresh_margin(Duration::from_secs(5))
}

/// Validates that concurrent callers on an expired token trigger one refresh.
///
/// # Test Steps
/// 1. Obtain `tok1` and expire it by advancing the clock
/// 2. Slow the transport down so every caller arrives while the refresh is
///    outstanding
/// 3. Spawn many callers on a multi-threaded runtime
/// 4. Verify exactly one refresh request and that every caller got `tok2`
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_one_refresh() {
    let transport = MockTransport::new();
    let clock = MockClock::new();
    transport.push_json(TOKEN_URL, 200, json!({"access_token": "tok1", "expires_in": 10}));
    transport.push_json(TOKEN_URL, 200, json!({"access_token": "tok2", "expires_in": 10}));
    let context = context(&transport, &clock);

    context.get_valid_token().await.expect("initial token");
    clock.advance(Duration::from_secs(11));
    transport.set_delay(Duration::from_millis(100));

    let handles = (0..CALLERS).map(|_| {
        let context = context.clone();
        tokio::spawn(async move { context.get_valid_token().await })
    });
    let results = join_all(handles).await;

    for result in results {
        assert_eq!(result.expect("task joined").expect("token"), "tok2");
    }
    assert_eq!(transport.request_count(TOKEN_URL), 2);
}

/// Validates that concurrent first-time callers share one acquire.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_one_acquire() {
    let transport = MockTransport::new();
    let clock = MockClock::new();
    transport.set_delay(Duration::from_millis(50));
    transport.push_json(TOKEN_URL, 200, json!({"access_token": "tok1", "expires_in": 3600}));
    let context = context(&transport, &clock);

    let results = join_all((0..CALLERS).map(|_| context.get_valid_token())).await;

    assert!(results.iter().all(|r| r.as_deref() == Ok("tok1")));
    assert_eq!(transport.request_count(TOKEN_URL), 1);
}

/// Validates that every waiter sees the same failure.
///
/// # Test Steps
/// 1. Script one failing response behind a delay
/// 2. Call concurrently
/// 3. Verify each caller got the error and only one request was made
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_failure() {
    let transport = MockTransport::new();
    let clock = MockClock::new();
    transport.set_delay(Duration::from_millis(50));
    transport.push_json(TOKEN_URL, 500, json!({"error": "server_error"}));
    let context = context(&transport, &clock);

    let results = join_all((0..8).map(|_| context.get_valid_token())).await;

    for result in results {
        assert!(matches!(result, Err(AuthError::ServerError(_))));
    }
    assert_eq!(transport.request_count(TOKEN_URL), 1);
}

/// Validates that cancelling a caller does not cancel the refresh.
///
/// # Test Steps
/// 1. Start a caller against a slow token endpoint and abort it mid-request
/// 2. Wait for the transport delay to elapse
/// 3. Verify the record was still stored and no second request is needed
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancelled_caller_does_not_cancel_refresh() {
    let transport = MockTransport::new();
    let clock = MockClock::new();
    transport.set_delay(Duration::from_millis(100));
    transport.push_json(TOKEN_URL, 200, json!({"access_token": "tok1", "expires_in": 3600}));
    let context = context(&transport, &clock);

    let caller = {
        let context = context.clone();
        tokio::spawn(async move { context.get_valid_token().await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    caller.abort();
    assert!(caller.await.expect_err("aborted").is_cancelled());

    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(context.current_record().expect("stored").access_token(), "tok1");
    assert_eq!(context.get_valid_token().await.expect("cached"), "tok1");
    assert_eq!(transport.request_count(TOKEN_URL), 1);
}

/// Validates that `force_refresh` joins a renewal that is already running.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_force_refresh_joins_in_flight() {
    let transport = MockTransport::new();
    let clock = MockClock::new();
    transport.push_json(TOKEN_URL, 200, json!({"access_token": "tok1", "expires_in": 10}));
    transport.push_json(TOKEN_URL, 200, json!({"access_token": "tok2", "expires_in": 10}));
    let context = context(&transport, &clock);
    context.get_valid_token().await.expect("initial token");
    clock.advance(Duration::from_secs(11));
    transport.set_delay(Duration::from_millis(100));

    let (valid, forced) = tokio::join!(context.get_valid_token(), context.force_refresh());

    assert_eq!(valid.expect("valid"), "tok2");
    assert_eq!(forced.expect("forced"), "tok2");
    assert_eq!(transport.request_count(TOKEN_URL), 2);
}
